//! Per-user serialization of mutating IAM calls.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Mutex as AsyncMutex;

/// Serializes mutating IAM operations.
///
/// Two levels of locking apply to every call:
/// - a registry-wide write gate, so all mutating IAM calls in the process are
///   totally ordered;
/// - a per-user lock, created the first time a user name is seen and kept
///   for the life of the registry.
///
/// The gate is always taken before the user lock. Both are released when the
/// callback's future completes or is dropped. Waiters are served in FIFO
/// order.
///
/// The registry is an ordinary value owned by the [`Provider`](crate::Provider);
/// independent registries never contend with each other.
///
/// ## Example
///
/// ```rust
/// use seaweedfs_provider::UserLockRegistry;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let locks = UserLockRegistry::new();
/// let out = locks.with_user_lock("alice", || async { 42 }).await;
/// assert_eq!(out, 42);
/// assert_eq!(locks.lock_count(), 1);
/// # }
/// ```
#[derive(Debug, Default)]
pub struct UserLockRegistry {
    write_gate: AsyncMutex<()>,
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl UserLockRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` while holding the write gate and the lock for `user_name`.
    ///
    /// The callback's output is returned unchanged.
    pub async fn with_user_lock<F, Fut, T>(&self, user_name: &str, f: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let _gate = self.write_gate.lock().await;
        let user_lock = self.user_lock(user_name);
        let _user = user_lock.lock().await;
        f().await
    }

    /// Number of distinct user names seen so far.
    pub fn lock_count(&self) -> usize {
        self.locks.lock().len()
    }

    fn user_lock(&self, user_name: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock();
        Arc::clone(locks.entry(user_name.to_owned()).or_default())
    }
}
