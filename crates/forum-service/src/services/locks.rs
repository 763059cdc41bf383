//! Per-entity mutation locks
//!
//! Serializes effective mutations per entity: votes, soft deletes, and
//! membership changes are read-modify-write cycles over whole persisted
//! states, so two interleaved writers would silently drop one change.
//! A writer that cannot take the lock within the bounded wait fails with
//! a conflict instead of queueing indefinitely.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::timeout;

use forum_core::DomainError;

/// Registry of keyed async locks, one per entity currently under mutation
///
/// Keys name the entity as `<kind>:<id>` (`post:42`, `comment:7`,
/// `team:3`). Entries are created on first use and removed when the last
/// holder releases, so the map only carries entities with an active or
/// contended mutation.
#[derive(Clone)]
pub struct EntityLocks {
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
    wait: Duration,
}

impl EntityLocks {
    /// Create a registry with the given bounded wait for contended locks
    pub fn new(wait: Duration) -> Self {
        Self {
            locks: Arc::new(DashMap::new()),
            wait,
        }
    }

    /// Acquire the lock for an entity key, waiting at most the configured
    /// bound. Returns `DomainError::MutationConflict` when the wait expires.
    pub async fn acquire(&self, key: &str) -> Result<EntityGuard, DomainError> {
        let lock = self
            .locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        match timeout(self.wait, lock.lock_owned()).await {
            Ok(guard) => Ok(EntityGuard {
                key: key.to_string(),
                locks: Arc::clone(&self.locks),
                guard: Some(guard),
            }),
            Err(_) => Err(DomainError::MutationConflict(key.to_string())),
        }
    }

    /// Number of entities currently tracked (held or contended)
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no entity is currently under mutation
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl std::fmt::Debug for EntityLocks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityLocks")
            .field("entries", &self.locks.len())
            .field("wait", &self.wait)
            .finish()
    }
}

/// Held entity lock; releasing drops the mutex and prunes the registry
/// entry when no other task is waiting on it.
pub struct EntityGuard {
    key: String,
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl EntityGuard {
    /// The entity key this guard serializes
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for EntityGuard {
    fn drop(&mut self) {
        // Release the mutex (and our Arc clone) before inspecting the
        // refcount; remove_if holds the shard lock, so no new waiter can
        // clone the entry between the check and the removal.
        self.guard.take();
        self.locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl std::fmt::Debug for EntityGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityGuard").field("key", &self.key).finish()
    }
}
