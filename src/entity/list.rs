use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, EntryType, Persistable};

/// Every account has an implicit inbox list; tasks whose list is deleted
/// are reassigned here rather than deleted.
pub const INBOX_LIST_ID: &str = "inbox";

/// A user-defined task list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload for a list
#[derive(Debug, Clone, Default)]
pub struct NewList {
    pub name: String,
    pub color: Option<String>,
}

/// Update payload for a list
#[derive(Debug, Default)]
pub struct ListPatch {
    pub name: Option<String>,
    pub color: Option<Option<String>>, // Some(None) to clear
}

impl Persistable for List {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for List {
    type Draft = NewList;
    type Patch = ListPatch;

    fn entry_type() -> EntryType {
        EntryType::CustomLists
    }

    fn build(draft: NewList, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            color: draft.color,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: ListPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        self.updated_at = now;
    }
}
