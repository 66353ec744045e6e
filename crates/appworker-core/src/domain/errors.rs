//! Errors - エラー型と分類
//!
//! # 分類
//! - プロセス全体に致命的: `QueueStoreError`, `IdleTimeout`（`WorkerError` に集約）
//! - 1 件の実行に閉じる: `DecodeError`, `CapabilityError`（status として報告する）

use std::time::Duration;

use thiserror::Error;

/// Connectivity or protocol failure talking to the shared queue store.
#[derive(Debug, Clone, Error)]
pub enum QueueStoreError {
    #[error("queue store connection failed: {0}")]
    Connection(String),

    #[error("queue store command failed: {0}")]
    Command(String),
}

/// A claimed payload that is not a well-formed Action.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed action payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("action payload is missing `{0}`")]
    MissingField(&'static str),
}

/// Failure while invoking a resolved capability.
///
/// Each variant ends up as the description in a FAILURE status.
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("Action not callable")]
    NotCallable,

    #[error("argument binding failed: {0}")]
    Binding(String),

    #[error("{0:#}")]
    Invocation(anyhow::Error),

    #[error("handler panicked: {0}")]
    Panicked(String),

    #[error("handler output could not be serialized: {0}")]
    Output(serde_json::Error),
}

/// Why one execution task stopped early.
///
/// `Decode` stays local to the task. `Report` is escalated to the claim loop.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("failed to report status: {0}")]
    Report(#[from] QueueStoreError),
}

/// Errors that end the worker process.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error(transparent)]
    QueueStore(#[from] QueueStoreError),

    #[error("no action claimed for {0:?}; exiting")]
    IdleTimeout(Duration),
}

impl WorkerError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            WorkerError::IdleTimeout(_) => 1,
            WorkerError::QueueStore(_) => 2,
        }
    }
}
