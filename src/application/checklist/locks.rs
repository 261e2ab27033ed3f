//! Per-service-order serialization of checklist operations
//!
//! `start`, `patch_answers` and `finish` each read the instance, decide, then
//! write. Holding the order's lock across that sequence keeps two requests
//! for the same order from interleaving inside one process. Entries are
//! dropped from the map once nobody holds or waits on them.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockMap = DashMap<String, Arc<Mutex<()>>>;

#[derive(Clone, Default)]
pub struct ChecklistLocks {
    inner: Arc<LockMap>,
}

impl ChecklistLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `service_order_id`.
    pub async fn acquire(&self, service_order_id: &str) -> ChecklistLockGuard {
        let mutex = self
            .inner
            .entry(service_order_id.to_string())
            .or_default()
            .clone();
        let guard = mutex.lock_owned().await;

        ChecklistLockGuard {
            guard: Some(guard),
            map: Arc::clone(&self.inner),
            key: service_order_id.to_string(),
        }
    }

    /// Number of orders with a live lock entry.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

pub struct ChecklistLockGuard {
    guard: Option<OwnedMutexGuard<()>>,
    map: Arc<LockMap>,
    key: String,
}

impl Drop for ChecklistLockGuard {
    fn drop(&mut self) {
        // Release first so our own Arc no longer counts.
        self.guard.take();
        self.map
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_order_is_serialized() {
        let locks = ChecklistLocks::new();
        let first = locks.acquire("so-1").await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _g = locks.acquire("so-1").await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(first);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn different_orders_do_not_block() {
        let locks = ChecklistLocks::new();
        let _a = locks.acquire("so-1").await;
        tokio::time::timeout(Duration::from_millis(100), locks.acquire("so-2"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn idle_entries_are_removed() {
        let locks = ChecklistLocks::new();
        {
            let _g = locks.acquire("so-1").await;
            assert_eq!(locks.len(), 1);
        }
        assert!(locks.is_empty());
    }
}
