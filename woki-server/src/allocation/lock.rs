//! Key-Scoped Async Locks (按键互斥)
//!
//! In-process mutual exclusion keyed by string. Two booking attempts that
//! target the same slot (or carry the same idempotency key) serialize; all
//! other attempts proceed in parallel. Entries are removed once the last
//! holder releases, so the map only holds keys under contention.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of per-key async mutexes
#[derive(Debug, Default)]
pub struct LockRegistry {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `key`, waiting if another holder has it.
    /// Waiters are served in arrival order.
    pub async fn acquire(&self, key: &str) -> KeyGuard<'_> {
        let slot = self
            .locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = slot.lock_owned().await;
        KeyGuard {
            registry: self,
            key: key.to_string(),
            guard: Some(guard),
        }
    }

    /// Number of live lock entries
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Held lock; releases and cleans up its registry entry on drop
pub struct KeyGuard<'a> {
    registry: &'a LockRegistry,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        // Release before cleanup so our own Arc clone is gone when we count.
        drop(self.guard.take());
        self.registry
            .locks
            .remove_if(&self.key, |_, slot| Arc::strong_count(slot) == 1);
    }
}

/// Canonical lock key for a slot: restaurant, sector, sorted table ids, start
pub fn slot_lock_key(
    restaurant_id: &str,
    sector_id: &str,
    table_ids: &[String],
    start: DateTime<Utc>,
) -> String {
    let mut sorted: Vec<&str> = table_ids.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    format!(
        "{restaurant_id}|{sector_id}|{}|{}",
        sorted.join("+"),
        start.to_rfc3339()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread")]
    async fn same_key_holders_are_mutually_exclusive() {
        let registry = Arc::new(LockRegistry::new());
        let active = Arc::new(AtomicU32::new(0));
        let peak = Arc::new(AtomicU32::new(0));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let registry = registry.clone();
            let active = active.clone();
            let peak = peak.clone();
            handles.push(tokio::spawn(async move {
                let _guard = registry.acquire("slot").await;
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(2)).await;
                active.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn distinct_keys_run_in_parallel() {
        let registry = Arc::new(LockRegistry::new());
        let r1 = registry.clone();
        let r2 = registry.clone();

        let a = tokio::spawn(async move {
            let _guard = r1.acquire("a").await;
            tokio::time::sleep(Duration::from_millis(20)).await;
        });
        // b must complete while a still holds its lock
        let b = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(2)).await;
            let _guard = r2.acquire("b").await;
        });

        tokio::time::timeout(Duration::from_millis(15), b)
            .await
            .expect("second key blocked behind the first")
            .unwrap();
        a.await.unwrap();
    }

    #[tokio::test]
    async fn registry_is_empty_after_release() {
        let registry = LockRegistry::new();
        {
            let _guard = registry.acquire("k").await;
            assert_eq!(registry.len(), 1);
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn slot_key_is_order_independent() {
        let start = chrono::Utc::now();
        let a = slot_lock_key("r1", "s1", &["t2".into(), "t1".into()], start);
        let b = slot_lock_key("r1", "s1", &["t1".into(), "t2".into()], start);
        assert_eq!(a, b);
        assert!(a.contains("t1+t2"));
    }
}
