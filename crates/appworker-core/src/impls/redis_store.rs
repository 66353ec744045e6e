//! RedisQueueStore - 本番用の共有キューストア
//!
//! RPOPLPUSH による reliable queue パターンです。
//! ConnectionManager は multiplexed な 1 本の接続を clone して共有し、
//! 切断時は自動で再接続します。

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::info;

use crate::domain::QueueStoreError;
use crate::ports::QueueStore;

#[derive(Clone)]
pub struct RedisQueueStore {
    conn: ConnectionManager,
}

impl RedisQueueStore {
    /// Connect to `url` and verify the connection with PING.
    pub async fn connect(url: &str) -> Result<Self, QueueStoreError> {
        let client =
            redis::Client::open(url).map_err(|e| QueueStoreError::Connection(e.to_string()))?;
        let mut conn = ConnectionManager::new(client)
            .await
            .map_err(|e| QueueStoreError::Connection(e.to_string()))?;

        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| QueueStoreError::Connection(e.to_string()))?;

        info!(url, "connected to queue store");
        Ok(Self { conn })
    }
}

fn command_error(e: redis::RedisError) -> QueueStoreError {
    if e.is_io_error() || e.is_connection_dropped() || e.is_connection_refusal() {
        QueueStoreError::Connection(e.to_string())
    } else {
        QueueStoreError::Command(e.to_string())
    }
}

#[async_trait]
impl QueueStore for RedisQueueStore {
    async fn rpoplpush(
        &self,
        source: &str,
        destination: &str,
    ) -> Result<Option<Vec<u8>>, QueueStoreError> {
        let mut conn = self.conn.clone();
        conn.rpoplpush(source, destination)
            .await
            .map_err(command_error)
    }

    async fn lpush(&self, key: &str, payload: Vec<u8>) -> Result<(), QueueStoreError> {
        let mut conn = self.conn.clone();
        conn.lpush::<_, _, ()>(key, payload)
            .await
            .map_err(command_error)
    }
}
