use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::entity::{EntryType, Persistable};
use crate::store::local::LocalCache;
use crate::store::remote::{RemoteRecord, RemoteStore};

/// Where a write landed. Internal bookkeeping only: repository callers
/// never see it, tests assert on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    pub cache_ok: bool,
    pub remote_ok: bool,
}

/// Orchestrates reads and writes across the local cache and the remote
/// store for whole collections and scalar blobs.
///
/// The remote is authoritative when reachable: a successful, non-empty
/// remote read is written through to the cache and returned. Everything
/// else - no session, transport failure, empty result - falls back to
/// the cache. Writes commit to the cache first and push to the remote
/// opportunistically by replacing all records of the entry type; remote
/// failures are logged and swallowed, so neither operation can fail.
pub struct SyncEngine {
    cache: Mutex<LocalCache>,
    remote: Arc<dyn RemoteStore>,
    entry_locks: Mutex<HashMap<EntryType, Arc<Mutex<()>>>>,
}

impl SyncEngine {
    pub fn new(cache: LocalCache, remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            cache: Mutex::new(cache),
            remote,
            entry_locks: Mutex::new(HashMap::new()),
        }
    }

    fn cache(&self) -> MutexGuard<'_, LocalCache> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `f` while holding this entry type's writer lock.
    ///
    /// Every read-modify-write cycle over a collection must run inside
    /// this, otherwise two concurrent cycles on the same entry type can
    /// overwrite each other's replace-all write and silently drop an
    /// entity.
    pub fn with_entry_lock<R>(&self, entry_type: EntryType, f: impl FnOnce() -> R) -> R {
        let slot = {
            let mut locks = self
                .entry_locks
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            Arc::clone(locks.entry(entry_type).or_default())
        };
        let _guard = slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f()
    }

    /// Read a collection: remote first when a session exists, cache
    /// otherwise. Remote records that fail to parse are skipped, not
    /// fatal. An empty remote result falls back to the cache the same
    /// way a transport failure does.
    pub fn read_collection<T: Persistable>(&self, entry_type: EntryType) -> Vec<T> {
        if self.remote.has_session() {
            match self.remote.select_by_type(entry_type) {
                Ok(records) if !records.is_empty() => {
                    let items: Vec<T> = records
                        .iter()
                        .filter_map(|record| match serde_json::from_str(&record.content) {
                            Ok(item) => Some(item),
                            Err(e) => {
                                warn!(
                                    key = entry_type.as_str(),
                                    id = %record.id,
                                    error = %e,
                                    "skipping unreadable remote record"
                                );
                                None
                            }
                        })
                        .collect();
                    self.cache().put(entry_type, &items);
                    return items;
                }
                Ok(_) => {
                    debug!(key = entry_type.as_str(), "remote returned no records, using cache");
                }
                Err(e) => {
                    warn!(key = entry_type.as_str(), error = %e, "remote read failed, using cache");
                }
            }
        }
        self.cached_collection(entry_type)
    }

    /// Write a collection: cache first (the commit point), then replace
    /// all remote records of this type when a session exists.
    pub fn write_collection<T: Persistable>(
        &self,
        entry_type: EntryType,
        items: &[T],
    ) -> SyncOutcome {
        let cache_ok = self.cache().put(entry_type, items);
        let remote_ok = self.push_collection(entry_type, items);
        SyncOutcome { cache_ok, remote_ok }
    }

    /// Read a scalar blob with the same remote-first, cache-fallback
    /// policy as collections.
    pub fn read_scalar(&self, entry_type: EntryType) -> String {
        if self.remote.has_session() {
            match self.remote.select_by_type(entry_type) {
                Ok(records) => {
                    if let Some(record) = records.into_iter().find(|r| !r.content.is_empty()) {
                        self.cache().put_scalar(entry_type, &record.content);
                        return record.content;
                    }
                    debug!(key = entry_type.as_str(), "remote returned no content, using cache");
                }
                Err(e) => {
                    warn!(key = entry_type.as_str(), error = %e, "remote read failed, using cache");
                }
            }
        }
        self.cached_scalar(entry_type)
    }

    /// Write a scalar blob: cache first, then upsert the single remote
    /// record when a session exists.
    pub fn write_scalar(&self, entry_type: EntryType, content: &str) -> SyncOutcome {
        let cache_ok = self.cache().put_scalar(entry_type, content);
        let remote_ok = if self.remote.has_session() {
            match self.remote.upsert_scalar(entry_type, content) {
                Ok(()) => true,
                Err(e) => {
                    warn!(
                        key = entry_type.as_str(),
                        error = %e,
                        "remote upsert failed, content kept in cache only"
                    );
                    false
                }
            }
        } else {
            false
        };
        SyncOutcome { cache_ok, remote_ok }
    }

    fn push_collection<T: Persistable>(&self, entry_type: EntryType, items: &[T]) -> bool {
        if !self.remote.has_session() {
            return false;
        }
        // Replace-all: clear the type, then re-insert the full collection.
        if let Err(e) = self.remote.delete_by_type(entry_type) {
            warn!(
                key = entry_type.as_str(),
                error = %e,
                "remote clear failed, collection kept in cache only"
            );
            return false;
        }
        if items.is_empty() {
            return true;
        }
        let records: Vec<RemoteRecord> = items
            .iter()
            .filter_map(|item| match serde_json::to_string(item) {
                Ok(content) => Some(RemoteRecord {
                    id: item.id().to_string(),
                    entry_type: entry_type.as_str().to_string(),
                    content,
                }),
                Err(e) => {
                    warn!(
                        key = entry_type.as_str(),
                        id = item.id(),
                        error = %e,
                        "skipping unserializable entity"
                    );
                    None
                }
            })
            .collect();
        match self.remote.insert_many(records) {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    key = entry_type.as_str(),
                    error = %e,
                    "remote insert failed, collection kept in cache only"
                );
                false
            }
        }
    }

    /// Cache read with read-triggered migration from the entry type's
    /// deprecated alias key. The alias value is copied verbatim, so once
    /// the new key holds data the alias is never consulted again.
    fn cached_collection<T: Persistable>(&self, entry_type: EntryType) -> Vec<T> {
        let cache = self.cache();
        let items: Vec<T> = cache.get(entry_type);
        if !items.is_empty() {
            return items;
        }
        let Some(alias) = entry_type.deprecated_alias() else {
            return items;
        };
        let Some(raw) = cache.get_raw(alias) else {
            return items;
        };
        debug!(key = entry_type.as_str(), alias, "migrating deprecated cache key");
        cache.put_raw(entry_type.as_str(), &raw);
        match serde_json::from_str(&raw) {
            Ok(migrated) => migrated,
            Err(e) => {
                warn!(key = entry_type.as_str(), alias, error = %e, "discarding unreadable legacy collection");
                Vec::new()
            }
        }
    }

    fn cached_scalar(&self, entry_type: EntryType) -> String {
        let cache = self.cache();
        let value = cache.get_scalar(entry_type);
        if !value.is_empty() {
            return value;
        }
        let Some(alias) = entry_type.deprecated_alias() else {
            return value;
        };
        let Some(raw) = cache.get_raw(alias) else {
            return value;
        };
        debug!(key = entry_type.as_str(), alias, "migrating deprecated cache key");
        cache.put_raw(entry_type.as_str(), &raw);
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity as _, NewTask, Task};
    use crate::store::remote::MemoryRemote;

    fn task(title: &str) -> Task {
        Task::build(
            NewTask {
                title: title.to_string(),
                ..Default::default()
            },
            crate::entity::new_entity_id(),
            chrono::Utc::now(),
        )
    }

    fn engine_with(remote: Arc<MemoryRemote>) -> SyncEngine {
        SyncEngine::new(LocalCache::open_in_memory().unwrap(), remote)
    }

    #[test]
    fn test_write_is_durable_in_cache_without_session() {
        let remote = Arc::new(MemoryRemote::new());
        let engine = engine_with(Arc::clone(&remote));

        let tasks = vec![task("offline")];
        let outcome = engine.write_collection(EntryType::Tasks, &tasks);

        assert!(outcome.cache_ok);
        assert!(!outcome.remote_ok);

        let loaded: Vec<Task> = engine.read_collection(EntryType::Tasks);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].title, "offline");
        assert!(remote.records_of_type(EntryType::Tasks).is_empty());
    }

    #[test]
    fn test_replace_all_leaves_no_residual_records() {
        let remote = Arc::new(MemoryRemote::signed_in());
        let engine = engine_with(Arc::clone(&remote));

        let first = vec![task("a"), task("b"), task("c")];
        let outcome = engine.write_collection(EntryType::Tasks, &first);
        assert!(outcome.cache_ok && outcome.remote_ok);
        assert_eq!(remote.records_of_type(EntryType::Tasks).len(), 3);

        let second = vec![task("d")];
        engine.write_collection(EntryType::Tasks, &second);

        let records = remote.records_of_type(EntryType::Tasks);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, second[0].id);
    }

    #[test]
    fn test_empty_collection_clears_remote() {
        let remote = Arc::new(MemoryRemote::signed_in());
        let engine = engine_with(Arc::clone(&remote));

        engine.write_collection(EntryType::Tasks, &[task("gone soon")]);
        let outcome = engine.write_collection::<Task>(EntryType::Tasks, &[]);

        assert!(outcome.remote_ok);
        assert!(remote.records_of_type(EntryType::Tasks).is_empty());
    }

    #[test]
    fn test_read_prefers_remote_and_writes_through() {
        let remote = Arc::new(MemoryRemote::signed_in());
        let engine = engine_with(Arc::clone(&remote));

        let remote_task = task("from remote");
        remote.seed(vec![RemoteRecord {
            id: remote_task.id.clone(),
            entry_type: "tasks".to_string(),
            content: serde_json::to_string(&remote_task).unwrap(),
        }]);

        let loaded: Vec<Task> = engine.read_collection(EntryType::Tasks);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].title, "from remote");

        // The remote result is now cached: drop the session and re-read.
        remote.set_session(false);
        let cached: Vec<Task> = engine.read_collection(EntryType::Tasks);
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].title, "from remote");
    }

    #[test]
    fn test_remote_failure_falls_back_to_cache() {
        let remote = Arc::new(MemoryRemote::signed_in());
        let engine = engine_with(Arc::clone(&remote));

        engine.write_collection(EntryType::Tasks, &[task("cached")]);

        remote.set_failing(true);
        let loaded: Vec<Task> = engine.read_collection(EntryType::Tasks);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].title, "cached");
    }

    #[test]
    fn test_remote_empty_falls_back_to_cache() {
        let remote = Arc::new(MemoryRemote::new());
        let engine = engine_with(Arc::clone(&remote));

        // Populate the cache while signed out, then sign in with an
        // empty remote: the cached items must win over the empty result.
        engine.write_collection(EntryType::Tasks, &[task("kept"), task("also kept")]);
        remote.set_session(true);

        let loaded: Vec<Task> = engine.read_collection(EntryType::Tasks);
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn test_unparseable_remote_records_are_skipped() {
        let remote = Arc::new(MemoryRemote::signed_in());
        let engine = engine_with(Arc::clone(&remote));

        let good = task("good");
        remote.seed(vec![
            RemoteRecord {
                id: "bad".to_string(),
                entry_type: "tasks".to_string(),
                content: "{garbage".to_string(),
            },
            RemoteRecord {
                id: good.id.clone(),
                entry_type: "tasks".to_string(),
                content: serde_json::to_string(&good).unwrap(),
            },
        ]);

        let loaded: Vec<Task> = engine.read_collection(EntryType::Tasks);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].title, "good");
    }

    #[test]
    fn test_degraded_write_still_commits_to_cache() {
        let remote = Arc::new(MemoryRemote::signed_in());
        let engine = engine_with(Arc::clone(&remote));

        remote.set_failing(true);
        let outcome = engine.write_collection(EntryType::Tasks, &[task("local only")]);

        assert!(outcome.cache_ok);
        assert!(!outcome.remote_ok);

        remote.set_session(false);
        let loaded: Vec<Task> = engine.read_collection(EntryType::Tasks);
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn test_legacy_alias_migration_is_idempotent() {
        let remote = Arc::new(MemoryRemote::new());
        let engine = engine_with(remote);

        let legacy = vec![task("from the old key")];
        let raw = serde_json::to_string(&legacy).unwrap();
        engine.cache().put_raw("todos", &raw);

        let first: Vec<Task> = engine.read_collection(EntryType::Tasks);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].title, "from the old key");

        // Clear the alias; the migrated key must now stand on its own.
        engine.cache().put_raw("todos", "[]");
        let second: Vec<Task> = engine.read_collection(EntryType::Tasks);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].title, "from the old key");
    }

    #[test]
    fn test_scalar_round_trip_and_alias_migration() {
        let remote = Arc::new(MemoryRemote::new());
        let engine = engine_with(remote);

        assert_eq!(engine.read_scalar(EntryType::NotepadContent), "");

        engine.cache().put_raw("notepad", "legacy scribbles");
        assert_eq!(engine.read_scalar(EntryType::NotepadContent), "legacy scribbles");

        let outcome = engine.write_scalar(EntryType::NotepadContent, "fresh scribbles");
        assert!(outcome.cache_ok);
        assert_eq!(engine.read_scalar(EntryType::NotepadContent), "fresh scribbles");
    }

    #[test]
    fn test_scalar_upserts_single_remote_record() {
        let remote = Arc::new(MemoryRemote::signed_in());
        let engine = engine_with(Arc::clone(&remote));

        engine.write_scalar(EntryType::NotepadContent, "one");
        engine.write_scalar(EntryType::NotepadContent, "two");

        let records = remote.records_of_type(EntryType::NotepadContent);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].content, "two");

        assert_eq!(engine.read_scalar(EntryType::NotepadContent), "two");
    }

    #[test]
    fn test_with_entry_lock_serializes_cycles() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let remote = Arc::new(MemoryRemote::new());
        let engine = Arc::new(engine_with(remote));
        let in_flight = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let engine = Arc::clone(&engine);
                let in_flight = Arc::clone(&in_flight);
                std::thread::spawn(move || {
                    engine.with_entry_lock(EntryType::Tasks, || {
                        assert_eq!(in_flight.fetch_add(1, Ordering::SeqCst), 0);
                        let mut items: Vec<Task> = engine.read_collection(EntryType::Tasks);
                        items.push(task(&format!("task {}", i)));
                        engine.write_collection(EntryType::Tasks, &items);
                        in_flight.fetch_sub(1, Ordering::SeqCst);
                    });
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let items: Vec<Task> = engine.read_collection(EntryType::Tasks);
        assert_eq!(items.len(), 4);
    }
}
