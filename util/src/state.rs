//! Application state container shared across Axum route handlers and services.
//!
//! This struct holds shared resources such as the database connection and the per-question
//! rebuild locks. It is cheap to clone and passed into route handlers via Axum's `State<T>`
//! extractor.

use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;

/// One async lock per question, so only one batch rebuild per question runs at a time.
///
/// Rebuilds of different questions do not block each other. Entries nobody holds or waits on are
/// dropped on the next `acquire`, so the map only tracks questions with a rebuild in flight.
#[derive(Clone, Default)]
pub struct RebuildLocks {
    inner: Arc<Mutex<HashMap<i64, Arc<tokio::sync::Mutex<()>>>>>,
}

impl RebuildLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for and take the rebuild lock of `question_id`.
    pub async fn acquire(&self, question_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self
                .inner
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            // A strong count of 1 means only the map references the lock.
            map.retain(|id, lock| *id == question_id || Arc::strong_count(lock) > 1);
            map.entry(question_id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Whether a rebuild of `question_id` is currently in flight.
    pub fn is_locked(&self, question_id: i64) -> bool {
        let map = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        map.get(&question_id)
            .is_some_and(|lock| lock.try_lock().is_err())
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

/// Central application state shared across the server.
///
/// This includes:
/// - A cloned, thread-safe database connection for use with SeaORM.
/// - The per-question [`RebuildLocks`].
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    rebuild_locks: RebuildLocks,
}

impl AppState {
    /// Creates a new `AppState` with the given database connection and fresh rebuild locks.
    ///
    /// # Arguments
    ///
    /// * `db` - A SeaORM `DatabaseConnection`, typically cloned from the main pool.
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            rebuild_locks: RebuildLocks::new(),
        }
    }

    /// Returns a shared reference to the internal `DatabaseConnection`.
    ///
    /// This is ideal when the caller does not need ownership.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn rebuild_locks(&self) -> &RebuildLocks {
        &self.rebuild_locks
    }
}
