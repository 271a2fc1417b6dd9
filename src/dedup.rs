// Dedup tracker — the loop breaker.
//
// Every status id this process emits is recorded here. When a status comes
// back on the inbound stream, a successful consume means "that was our own
// echo, drop it". The set lives for the process lifetime only; ids from a
// previous run are forgotten, which matches the no-persistence design.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;

/// Process-lifetime set of status ids emitted by this relay.
///
/// Shared between the notification consumer (which adds ids as it posts
/// chunks) and the status consumer (which checks-and-removes on every
/// inbound message). The mutex makes check-and-remove atomic with respect
/// to concurrent adds.
#[derive(Clone, Default)]
pub struct DedupTracker {
    inner: Arc<Mutex<HashSet<u64>>>,
}

impl DedupTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an id this process just emitted.
    pub async fn add(&self, id: u64) {
        self.inner.lock().await.insert(id);
    }

    /// Remove `id` if present. `true` means the id was ours — discard the
    /// message. Each id can be consumed at most once; a second observation
    /// of the same id finds nothing and is treated as foreign.
    pub async fn try_consume(&self, id: u64) -> bool {
        self.inner.lock().await.remove(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn added_id_is_consumed_exactly_once() {
        let tracker = DedupTracker::new();
        tracker.add(42).await;
        assert!(tracker.try_consume(42).await);
        // Second observation is foreign.
        assert!(!tracker.try_consume(42).await);
    }

    #[tokio::test]
    async fn consuming_absent_id_returns_false_and_leaves_set_unchanged() {
        let tracker = DedupTracker::new();
        tracker.add(1).await;
        assert!(!tracker.try_consume(2).await);
        // The unrelated entry is untouched.
        assert!(tracker.try_consume(1).await);
    }

    #[tokio::test]
    async fn clones_share_the_same_set() {
        let tracker = DedupTracker::new();
        let other = tracker.clone();
        tracker.add(7).await;
        assert!(other.try_consume(7).await);
        assert!(!tracker.try_consume(7).await);
    }

    #[tokio::test]
    async fn concurrent_adds_and_consumes_stay_consistent() {
        let tracker = DedupTracker::new();
        let adder = {
            let t = tracker.clone();
            tokio::spawn(async move {
                for id in 0..100u64 {
                    t.add(id).await;
                }
            })
        };
        adder.await.unwrap();

        let mut consumed = 0;
        for id in 0..100u64 {
            if tracker.try_consume(id).await {
                consumed += 1;
            }
        }
        assert_eq!(consumed, 100);
    }
}
