use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entity::EntryType;

/// Failure talking to the remote store. Absorbed by the sync engine;
/// never reaches repository callers.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("no authenticated session")]
    NoSession,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("remote rejected request: {0}")]
    Rejected(String),
}

/// One row in the remote store: an opaque id, the entry type it belongs
/// to, and the serialized content blob (one entity as JSON, or raw
/// scalar text).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRecord {
    pub id: String,
    pub entry_type: String,
    pub content: String,
}

/// Network record store, reachable only inside an authenticated session.
///
/// The concrete transport is an external collaborator and is injected;
/// everything here is the contract the sync engine depends on. Records
/// are scoped to the authenticated principal by the transport.
pub trait RemoteStore: Send + Sync {
    /// True only while an authenticated session exists. Every other
    /// operation is skipped by callers when this is false.
    fn has_session(&self) -> bool;

    /// All records tagged with the entry type.
    fn select_by_type(&self, entry_type: EntryType) -> Result<Vec<RemoteRecord>, RemoteError>;

    /// Append-only batch insert. Partial failure is possible and is not
    /// rolled back.
    fn insert_many(&self, records: Vec<RemoteRecord>) -> Result<(), RemoteError>;

    /// Delete every record tagged with the entry type.
    fn delete_by_type(&self, entry_type: EntryType) -> Result<(), RemoteError>;

    /// Update the single record for the entry type if one exists, else
    /// insert it.
    fn upsert_scalar(&self, entry_type: EntryType, content: &str) -> Result<(), RemoteError>;
}

/// The remote a signed-out process sees: no session, every call refused.
/// Wired in by the binary, where session acquisition belongs to the
/// external auth collaborator.
pub struct SignedOutRemote;

impl RemoteStore for SignedOutRemote {
    fn has_session(&self) -> bool {
        false
    }

    fn select_by_type(&self, _entry_type: EntryType) -> Result<Vec<RemoteRecord>, RemoteError> {
        Err(RemoteError::NoSession)
    }

    fn insert_many(&self, _records: Vec<RemoteRecord>) -> Result<(), RemoteError> {
        Err(RemoteError::NoSession)
    }

    fn delete_by_type(&self, _entry_type: EntryType) -> Result<(), RemoteError> {
        Err(RemoteError::NoSession)
    }

    fn upsert_scalar(&self, _entry_type: EntryType, _content: &str) -> Result<(), RemoteError> {
        Err(RemoteError::NoSession)
    }
}

/// In-process remote holding records in a plain Vec. Drives the sync
/// engine in the test suite and in embedding callers that bring their
/// own persistence.
#[derive(Default)]
pub struct MemoryRemote {
    session: AtomicBool,
    failing: AtomicBool,
    records: Mutex<Vec<RemoteRecord>>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// A remote that already has an authenticated session.
    pub fn signed_in() -> Self {
        let remote = Self::default();
        remote.session.store(true, Ordering::SeqCst);
        remote
    }

    pub fn set_session(&self, active: bool) {
        self.session.store(active, Ordering::SeqCst);
    }

    /// When set, every data operation fails with a transport error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of the records for one entry type, in insertion order.
    pub fn records_of_type(&self, entry_type: EntryType) -> Vec<RemoteRecord> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .filter(|r| r.entry_type == entry_type.as_str())
            .cloned()
            .collect()
    }

    /// Insert records directly, bypassing the session and failure flags.
    pub fn seed(&self, records: Vec<RemoteRecord>) {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .extend(records);
    }

    fn check(&self) -> Result<(), RemoteError> {
        if !self.session.load(Ordering::SeqCst) {
            return Err(RemoteError::NoSession);
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(RemoteError::Transport("simulated outage".to_string()));
        }
        Ok(())
    }
}

impl RemoteStore for MemoryRemote {
    fn has_session(&self) -> bool {
        self.session.load(Ordering::SeqCst)
    }

    fn select_by_type(&self, entry_type: EntryType) -> Result<Vec<RemoteRecord>, RemoteError> {
        self.check()?;
        Ok(self.records_of_type(entry_type))
    }

    fn insert_many(&self, records: Vec<RemoteRecord>) -> Result<(), RemoteError> {
        self.check()?;
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .extend(records);
        Ok(())
    }

    fn delete_by_type(&self, entry_type: EntryType) -> Result<(), RemoteError> {
        self.check()?;
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .retain(|r| r.entry_type != entry_type.as_str());
        Ok(())
    }

    fn upsert_scalar(&self, entry_type: EntryType, content: &str) -> Result<(), RemoteError> {
        self.check()?;
        let mut records = self
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(existing) = records
            .iter_mut()
            .find(|r| r.entry_type == entry_type.as_str())
        {
            existing.content = content.to_string();
        } else {
            records.push(RemoteRecord {
                id: crate::entity::new_entity_id(),
                entry_type: entry_type.as_str().to_string(),
                content: content.to_string(),
            });
        }
        Ok(())
    }
}
