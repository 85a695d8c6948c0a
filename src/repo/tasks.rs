use std::sync::Arc;

use chrono::Utc;

use crate::entity::{EntryType, NewTask, Task, TaskPatch, INBOX_LIST_ID};
use crate::error::{HorizonsError, Result};
use crate::store::SyncEngine;

use super::Repository;

/// Task CRUD plus completion toggling. Tasks are the only collection
/// other repositories reach into (list deletion reassigns them).
pub struct TaskRepository {
    engine: Arc<SyncEngine>,
    tasks: Repository<Task>,
}

impl TaskRepository {
    pub fn new(engine: Arc<SyncEngine>) -> Self {
        Self {
            tasks: Repository::new(Arc::clone(&engine)),
            engine,
        }
    }

    pub fn list(&self) -> Vec<Task> {
        self.tasks.list()
    }

    pub fn get(&self, id: &str) -> Option<Task> {
        self.tasks.get(id)
    }

    pub fn create(&self, draft: NewTask) -> Task {
        self.tasks.create(draft)
    }

    pub fn update(&self, id: &str, patch: TaskPatch) -> Result<Task> {
        self.tasks.update(id, patch)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.tasks.delete(id)
    }

    /// Flip the completion flag and stamp `updated_at`.
    pub fn toggle_completion(&self, id: &str) -> Result<Task> {
        self.engine.with_entry_lock(EntryType::Tasks, || {
            let mut tasks: Vec<Task> = self.engine.read_collection(EntryType::Tasks);
            let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
                return Err(HorizonsError::EntityNotFound(id.to_string()));
            };
            task.completed = !task.completed;
            task.updated_at = Utc::now();
            let toggled = task.clone();
            self.engine.write_collection(EntryType::Tasks, &tasks);
            Ok(toggled)
        })
    }

    /// List-deletion cascade: move every task filed under the deleted
    /// list back to the inbox. Tasks are never deleted with their list.
    pub(crate) fn reassign_to_inbox(&self, list_id: &str) {
        self.engine.with_entry_lock(EntryType::Tasks, || {
            let mut tasks: Vec<Task> = self.engine.read_collection(EntryType::Tasks);
            let mut changed = false;
            for task in tasks.iter_mut().filter(|t| t.list_id == list_id) {
                task.list_id = INBOX_LIST_ID.to_string();
                changed = true;
            }
            if changed {
                self.engine.write_collection(EntryType::Tasks, &tasks);
            }
        })
    }
}
