use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, EntryType, Persistable};

/// A label tasks can carry. Tags are referenced by id from
/// `Task::tag_ids`; deleting a tag does not touch tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload for a tag
#[derive(Debug, Clone, Default)]
pub struct NewTag {
    pub name: String,
    pub color: Option<String>,
}

/// Update payload for a tag
#[derive(Debug, Default)]
pub struct TagPatch {
    pub name: Option<String>,
    pub color: Option<Option<String>>, // Some(None) to clear
}

impl Persistable for Tag {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Tag {
    type Draft = NewTag;
    type Patch = TagPatch;

    fn entry_type() -> EntryType {
        EntryType::Tags
    }

    fn build(draft: NewTag, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            color: draft.color,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: TagPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        self.updated_at = now;
    }
}
