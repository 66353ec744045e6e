//! InMemoryQueueStore - 開発・テスト用の共有キューストア
//!
//! # 実装詳細
//! - HashMap<String, VecDeque<Vec<u8>>> で key ごとのリストを管理
//! - tokio::sync::Mutex を 1 操作の間だけ保持するので、rpoplpush は atomic
//! - head = VecDeque の front, tail = back（Redis の LPUSH/RPOP と同じ向き）

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::QueueStoreError;
use crate::ports::QueueStore;

#[derive(Default)]
pub struct InMemoryQueueStore {
    lists: Mutex<HashMap<String, VecDeque<Vec<u8>>>>,
}

impl InMemoryQueueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self, key: &str) -> usize {
        self.lists.lock().await.get(key).map_or(0, VecDeque::len)
    }

    /// Items of `key`, head first.
    pub async fn snapshot(&self, key: &str) -> Vec<Vec<u8>> {
        self.lists
            .lock()
            .await
            .get(key)
            .map(|list| list.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl QueueStore for InMemoryQueueStore {
    async fn rpoplpush(
        &self,
        source: &str,
        destination: &str,
    ) -> Result<Option<Vec<u8>>, QueueStoreError> {
        let mut lists = self.lists.lock().await;
        let Some(item) = lists.get_mut(source).and_then(VecDeque::pop_back) else {
            return Ok(None);
        };
        lists
            .entry(destination.to_string())
            .or_default()
            .push_front(item.clone());
        Ok(Some(item))
    }

    async fn lpush(&self, key: &str, payload: Vec<u8>) -> Result<(), QueueStoreError> {
        self.lists
            .lock()
            .await
            .entry(key.to_string())
            .or_default()
            .push_front(payload);
        Ok(())
    }
}
