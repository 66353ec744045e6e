//! ResultReporter - status メッセージを workflow ごとの result channel に push する
//!
//! 失敗してもリトライしません。呼び出し側（実行タスク）にそのまま返します。

use std::sync::Arc;

use tracing::trace;

use crate::domain::{ActionStatus, QueueStoreError};
use crate::ports::QueueStore;
use crate::typed::ActionCodec;

pub struct ResultReporter {
    store: Arc<dyn QueueStore>,
    default_channel: String,
}

impl ResultReporter {
    pub fn new(store: Arc<dyn QueueStore>, default_channel: impl Into<String>) -> Self {
        Self {
            store,
            default_channel: default_channel.into(),
        }
    }

    /// The channel a status for `workflow_execution_id` is published on.
    pub fn channel_for<'a>(&'a self, workflow_execution_id: &'a str) -> &'a str {
        if workflow_execution_id.is_empty() {
            &self.default_channel
        } else {
            workflow_execution_id
        }
    }

    pub async fn report(&self, status: &ActionStatus) -> Result<(), QueueStoreError> {
        let channel = self.channel_for(&status.workflow_execution_id);
        let payload = ActionCodec::encode_status(status)
            .map_err(|e| QueueStoreError::Command(format!("encode status: {e}")))?;
        trace!(channel, action_id = %status.action_id, status = ?status.status, "publishing status");
        self.store.lpush(channel, payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Action, StatusKind};
    use crate::impls::InMemoryQueueStore;
    use chrono::Utc;

    #[tokio::test]
    async fn publishes_on_the_workflow_channel() {
        let store = Arc::new(InMemoryQueueStore::new());
        let reporter = ResultReporter::new(store.clone(), "action-results");
        let action = Action::new("a1", "echo", "w1");

        reporter.report(&ActionStatus::started(&action, Utc::now())).await.unwrap();

        let published = store.snapshot("w1").await;
        assert_eq!(published.len(), 1);
        let msg = ActionCodec::decode_status(&published[0]).unwrap();
        assert_eq!(msg.status, StatusKind::Started);
        assert_eq!(msg.action_id, "a1");
        assert_eq!(store.len("action-results").await, 0);
    }

    #[tokio::test]
    async fn falls_back_to_default_channel() {
        let store = Arc::new(InMemoryQueueStore::new());
        let reporter = ResultReporter::new(store.clone(), "action-results");
        let action = Action::new("a1", "echo", "");

        reporter
            .report(&ActionStatus::success(&action, serde_json::json!(1), Utc::now()))
            .await
            .unwrap();

        assert_eq!(store.len("action-results").await, 1);
    }
}
