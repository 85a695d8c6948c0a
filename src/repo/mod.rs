//! Domain repositories over the sync engine.
//!
//! Each collection gets one repository built on a shared generic core:
//! read the whole collection, mutate it in memory, write the whole
//! collection back. Repositories own id generation, timestamp stamping,
//! and the cascade rules that fire when a parent entity is deleted.

mod goals;
mod lists;
mod notepad;
mod plans;
mod tags;
mod targets;
mod tasks;

pub use goals::GoalRepository;
pub use lists::ListRepository;
pub use notepad::NotepadRepository;
pub use plans::PlanRepository;
pub use tags::TagRepository;
pub use targets::TargetRepository;
pub use tasks::TaskRepository;

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::entity::{new_entity_id, Entity};
use crate::error::{HorizonsError, Result};
use crate::store::SyncEngine;

/// Uniform result envelope for external consumers of the repository
/// API, used by the CLI's JSON output.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Generic CRUD over one collection.
///
/// Every mutation runs a full read-modify-write cycle under the entry
/// type's writer lock. Reads and writes never fail at the storage layer,
/// so the only error these operations surface is `EntityNotFound`.
pub struct Repository<T: Entity> {
    engine: Arc<SyncEngine>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> Repository<T> {
    pub fn new(engine: Arc<SyncEngine>) -> Self {
        Self {
            engine,
            _entity: PhantomData,
        }
    }

    pub fn list(&self) -> Vec<T> {
        self.engine.read_collection(T::entry_type())
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.list().into_iter().find(|item| item.id() == id)
    }

    /// Create an entity from its draft payload. Assigns a fresh id and
    /// `created_at == updated_at`, appends, writes the collection back.
    /// Cannot fail: a degraded write still committed to the cache.
    pub fn create(&self, draft: T::Draft) -> T {
        self.engine.with_entry_lock(T::entry_type(), || {
            let mut items: Vec<T> = self.engine.read_collection(T::entry_type());
            let entity = T::build(draft, new_entity_id(), Utc::now());
            items.push(entity.clone());
            self.engine.write_collection(T::entry_type(), &items);
            entity
        })
    }

    /// Merge a patch into the entity with this id and stamp `updated_at`.
    pub fn update(&self, id: &str, patch: T::Patch) -> Result<T> {
        self.engine.with_entry_lock(T::entry_type(), || {
            let mut items: Vec<T> = self.engine.read_collection(T::entry_type());
            let Some(entity) = items.iter_mut().find(|item| item.id() == id) else {
                return Err(HorizonsError::EntityNotFound(id.to_string()));
            };
            entity.apply(patch, Utc::now());
            let updated = entity.clone();
            self.engine.write_collection(T::entry_type(), &items);
            Ok(updated)
        })
    }

    /// Remove the entity with this id. No tombstone: the entity is
    /// physically absent from every subsequent read.
    pub fn delete(&self, id: &str) -> Result<()> {
        self.engine.with_entry_lock(T::entry_type(), || {
            let mut items: Vec<T> = self.engine.read_collection(T::entry_type());
            let len_before = items.len();
            items.retain(|item| item.id() != id);
            if items.len() == len_before {
                return Err(HorizonsError::EntityNotFound(id.to_string()));
            }
            self.engine.write_collection(T::entry_type(), &items);
            Ok(())
        })
    }
}

/// All repositories wired to one injected engine. What the binary and
/// the tests construct.
pub struct Workspace {
    pub tasks: TaskRepository,
    pub lists: ListRepository,
    pub goals: GoalRepository,
    pub targets: TargetRepository,
    pub plans: PlanRepository,
    pub tags: TagRepository,
    pub notepad: NotepadRepository,
}

impl Workspace {
    pub fn new(engine: Arc<SyncEngine>) -> Self {
        Self {
            tasks: TaskRepository::new(Arc::clone(&engine)),
            lists: ListRepository::new(Arc::clone(&engine)),
            goals: GoalRepository::new(Arc::clone(&engine)),
            targets: TargetRepository::new(Arc::clone(&engine)),
            plans: PlanRepository::new(Arc::clone(&engine)),
            tags: TagRepository::new(Arc::clone(&engine)),
            notepad: NotepadRepository::new(engine),
        }
    }
}

#[cfg(test)]
pub(crate) fn test_workspace() -> (Workspace, Arc<crate::store::MemoryRemote>) {
    let remote = Arc::new(crate::store::MemoryRemote::new());
    let cache = crate::store::LocalCache::open_in_memory().unwrap();
    let remote_store: Arc<dyn crate::store::RemoteStore> = remote.clone();
    let engine = Arc::new(SyncEngine::new(cache, remote_store));
    (Workspace::new(engine), remote)
}
