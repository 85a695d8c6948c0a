use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, EntryType, Persistable, INBOX_LIST_ID};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub list_id: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub tag_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload for a task
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub notes: Option<String>,
    /// Defaults to the inbox when not set
    pub list_id: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub tag_ids: Vec<String>,
}

/// Update payload for a task
#[derive(Debug, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub notes: Option<Option<String>>, // Some(None) to clear, Some(Some(s)) to set
    pub list_id: Option<String>,
    pub completed: Option<bool>,
    pub due_date: Option<Option<NaiveDate>>, // Some(None) to clear, Some(Some(date)) to set
    pub tag_ids: Option<Vec<String>>,
}

impl Persistable for Task {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Task {
    type Draft = NewTask;
    type Patch = TaskPatch;

    fn entry_type() -> EntryType {
        EntryType::Tasks
    }

    fn build(draft: NewTask, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            notes: draft.notes,
            list_id: draft.list_id.unwrap_or_else(|| INBOX_LIST_ID.to_string()),
            completed: false,
            due_date: draft.due_date,
            tag_ids: draft.tag_ids,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: TaskPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(list_id) = patch.list_id {
            self.list_id = list_id;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(tag_ids) = patch.tag_ids {
            self.tag_ids = tag_ids;
        }
        self.updated_at = now;
    }
}
