//! ClaimLoop - 優先度付きキューから 1 件を排他的に claim する
//!
//! # フロー
//! 1. 最高優先度のキューから順に、非ブロッキングの rpoplpush を試す
//! 2. 空なら次の優先度へ（一周したら先頭に戻る）。試行ごとに yield する
//! 3. 最初に取れた item を返す
//! 4. 前回の claim から idle_timeout を超えたら `WorkerError::IdleTimeout`
//!
//! 排他性は store の rpoplpush の atomic 性だけに依存します。

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::domain::{Priority, QueueKeys, WorkerError};
use crate::ports::QueueStore;

/// A raw payload moved into the tracking list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claimed {
    pub queue: String,
    pub priority: Priority,
    pub payload: Vec<u8>,
}

pub struct ClaimLoop {
    store: Arc<dyn QueueStore>,
    keys: QueueKeys,
    tracking_list: String,
    idle_timeout: Duration,
    poll_interval: Duration,
}

impl ClaimLoop {
    pub fn new(
        store: Arc<dyn QueueStore>,
        keys: QueueKeys,
        tracking_list: impl Into<String>,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            store,
            keys,
            tracking_list: tracking_list.into(),
            idle_timeout,
            poll_interval: Duration::ZERO,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn keys(&self) -> &QueueKeys {
        &self.keys
    }

    pub fn tracking_list(&self) -> &str {
        &self.tracking_list
    }

    /// Claim the next item, highest priority first.
    ///
    /// Store errors propagate as-is. Returns `IdleTimeout` once nothing has
    /// been claimed for longer than the idle threshold.
    pub async fn claim_next(&self) -> Result<Claimed, WorkerError> {
        debug!("waiting for actions");
        let start = Instant::now();
        let mut attempt = 0usize;

        loop {
            let (priority, queue) = self.keys.at(attempt);
            if let Some(payload) = self.store.rpoplpush(queue, &self.tracking_list).await? {
                debug!(queue, %priority, "claimed action");
                return Ok(Claimed {
                    queue: queue.to_string(),
                    priority,
                    payload,
                });
            }
            attempt += 1;

            if attempt % self.keys.len() == 0 && !self.poll_interval.is_zero() {
                tokio::time::sleep(self.poll_interval).await;
            } else {
                tokio::task::yield_now().await;
            }

            if start.elapsed() > self.idle_timeout {
                warn!(idle_for = ?self.idle_timeout, "no work within idle timeout");
                return Err(WorkerError::IdleTimeout(self.idle_timeout));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{QueueStoreError, WorkerIdentity};
    use crate::impls::InMemoryQueueStore;
    use async_trait::async_trait;

    fn keys() -> QueueKeys {
        QueueKeys::for_identity(&WorkerIdentity::new("Sample", "1"))
    }

    fn claim_loop(store: Arc<dyn QueueStore>, idle: Duration) -> ClaimLoop {
        ClaimLoop::new(store, keys(), "actions-in-process", idle)
    }

    #[tokio::test]
    async fn claims_from_any_priority_and_tracks_it() {
        let store = Arc::new(InMemoryQueueStore::new());
        store.lpush("Sample-1-2", b"low".to_vec()).await.unwrap();

        let cl = claim_loop(store.clone(), Duration::from_secs(5));
        let claimed = cl.claim_next().await.unwrap();

        assert_eq!(claimed.payload, b"low");
        assert_eq!(claimed.queue, "Sample-1-2");
        assert_eq!(claimed.priority.level(), 2);
        assert_eq!(store.len("Sample-1-2").await, 0);
        assert_eq!(store.snapshot("actions-in-process").await, vec![b"low".to_vec()]);
    }

    #[tokio::test]
    async fn higher_priority_wins_when_both_are_ready() {
        let store = Arc::new(InMemoryQueueStore::new());
        for i in 0..10u8 {
            store.lpush("Sample-1-5", vec![b'h', i]).await.unwrap();
            store.lpush("Sample-1-1", vec![b'l', i]).await.unwrap();
        }

        let cl = claim_loop(store.clone(), Duration::from_secs(5));
        let mut high = 0;
        let mut low = 0;
        for _ in 0..15 {
            match cl.claim_next().await.unwrap().priority.level() {
                5 => high += 1,
                1 => low += 1,
                other => panic!("unexpected priority {other}"),
            }
        }
        assert!(high > low, "high={high} low={low}");
        assert_eq!(high, 10);
    }

    #[tokio::test]
    async fn idle_queues_time_out() {
        let store = Arc::new(InMemoryQueueStore::new());
        let cl = claim_loop(store.clone(), Duration::from_millis(50));

        let started = std::time::Instant::now();
        let err = cl.claim_next().await.unwrap_err();

        assert!(matches!(err, WorkerError::IdleTimeout(_)));
        assert_eq!(err.exit_code(), 1);
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert_eq!(store.len("actions-in-process").await, 0);
    }

    #[tokio::test]
    async fn poll_interval_still_times_out() {
        let store = Arc::new(InMemoryQueueStore::new());
        let cl = claim_loop(store, Duration::from_millis(30))
            .with_poll_interval(Duration::from_millis(5));
        assert!(matches!(cl.claim_next().await, Err(WorkerError::IdleTimeout(_))));
    }

    struct DownStore;

    #[async_trait]
    impl QueueStore for DownStore {
        async fn rpoplpush(&self, _: &str, _: &str) -> Result<Option<Vec<u8>>, QueueStoreError> {
            Err(QueueStoreError::Connection("connection refused".into()))
        }

        async fn lpush(&self, _: &str, _: Vec<u8>) -> Result<(), QueueStoreError> {
            Err(QueueStoreError::Connection("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn store_errors_propagate() {
        let cl = claim_loop(Arc::new(DownStore), Duration::from_secs(5));
        let err = cl.claim_next().await.unwrap_err();
        assert!(matches!(err, WorkerError::QueueStore(QueueStoreError::Connection(_))));
    }

    #[tokio::test]
    async fn concurrent_claimers_never_share_an_item() {
        let store = Arc::new(InMemoryQueueStore::new());
        store.lpush("Sample-1-3", b"only".to_vec()).await.unwrap();

        let mut joins = Vec::new();
        for _ in 0..4 {
            let cl = claim_loop(store.clone(), Duration::from_millis(100));
            joins.push(tokio::spawn(async move { cl.claim_next().await }));
        }

        let mut winners = 0;
        for j in joins {
            if j.await.unwrap().is_ok() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
        assert_eq!(store.len("Sample-1-3").await, 0);
        assert_eq!(store.len("actions-in-process").await, 1);
    }
}
