use std::sync::Arc;

use crate::entity::EntryType;
use crate::store::SyncEngine;

/// The free-text notepad: a single scalar blob, not a collection.
pub struct NotepadRepository {
    engine: Arc<SyncEngine>,
}

impl NotepadRepository {
    pub fn new(engine: Arc<SyncEngine>) -> Self {
        Self { engine }
    }

    /// Current notepad text, empty string when never written.
    pub fn get(&self) -> String {
        self.engine.read_scalar(EntryType::NotepadContent)
    }

    /// Replace the notepad text.
    pub fn set(&self, content: &str) {
        self.engine.write_scalar(EntryType::NotepadContent, content);
    }
}
