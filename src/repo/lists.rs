use std::sync::Arc;

use crate::entity::{List, ListPatch, NewList};
use crate::error::Result;
use crate::store::SyncEngine;

use super::{Repository, TaskRepository};

/// Custom list CRUD. Deleting a list reassigns its tasks to the inbox
/// rather than deleting them.
pub struct ListRepository {
    lists: Repository<List>,
    tasks: TaskRepository,
}

impl ListRepository {
    pub fn new(engine: Arc<SyncEngine>) -> Self {
        Self {
            lists: Repository::new(Arc::clone(&engine)),
            tasks: TaskRepository::new(engine),
        }
    }

    pub fn list(&self) -> Vec<List> {
        self.lists.list()
    }

    pub fn get(&self, id: &str) -> Option<List> {
        self.lists.get(id)
    }

    pub fn create(&self, draft: NewList) -> List {
        self.lists.create(draft)
    }

    pub fn update(&self, id: &str, patch: ListPatch) -> Result<List> {
        self.lists.update(id, patch)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.lists.delete(id)?;
        self.tasks.reassign_to_inbox(id);
        Ok(())
    }
}
