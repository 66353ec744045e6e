//! QueueStore port - 共有キューストア（Redis または InMemory）
//!
//! worker 間の排他は store 側の atomic な `rpoplpush` だけで保証します。
//! この crate 側ではロックを持ちません。

use async_trait::async_trait;

use crate::domain::QueueStoreError;

/// A distributed list store shared by many worker processes.
///
/// List semantics follow Redis: `lpush` adds to the head, `rpoplpush` takes
/// from the tail, so a list fed by `lpush` drains in FIFO order.
#[async_trait]
pub trait QueueStore: Send + Sync {
    /// Atomically pop the tail of `source` and push it onto the head of
    /// `destination`. Non-blocking: `Ok(None)` when `source` is empty.
    async fn rpoplpush(
        &self,
        source: &str,
        destination: &str,
    ) -> Result<Option<Vec<u8>>, QueueStoreError>;

    /// Push `payload` onto the head of `key`.
    async fn lpush(&self, key: &str, payload: Vec<u8>) -> Result<(), QueueStoreError>;
}
