use std::sync::Arc;

use crate::entity::{NewTag, Tag, TagPatch};
use crate::error::Result;
use crate::store::SyncEngine;

use super::Repository;

/// Tag CRUD. Tasks reference tags by id; deleting a tag leaves those
/// references in place.
pub struct TagRepository {
    tags: Repository<Tag>,
}

impl TagRepository {
    pub fn new(engine: Arc<SyncEngine>) -> Self {
        Self {
            tags: Repository::new(engine),
        }
    }

    pub fn list(&self) -> Vec<Tag> {
        self.tags.list()
    }

    pub fn get(&self, id: &str) -> Option<Tag> {
        self.tags.get(id)
    }

    pub fn create(&self, draft: NewTag) -> Tag {
        self.tags.create(draft)
    }

    pub fn update(&self, id: &str, patch: TagPatch) -> Result<Tag> {
        self.tags.update(id, patch)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.tags.delete(id)
    }
}
