//! WorkerBuilder - worker type の構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）

use std::sync::Arc;

use crate::app::config::WorkerConfig;
use crate::app::worker::Worker;
use crate::domain::WorkerIdentity;
use crate::ports::{Clock, QueueStore, SystemClock};
use crate::typed::{ActionArgs, CapabilityRegistry, Handler, RegistryError};

/// WorkerBuilder は worker type の capability 表を組み立てる
///
/// # 使用例
/// ```ignore
/// let worker = WorkerBuilder::new(WorkerIdentity::new("Sample", "1"))
///     .register::<Echo, _>(EchoHandler)?
///     .expect_capabilities(&["echo"])
///     .config(WorkerConfig::from_env()?)
///     .build(store)?;
/// ```
///
/// # Fail-fast 設計
/// - expect_capabilities() で期待される capability 名を登録
/// - build() 時に「期待集合 ⊆ 登録済み集合」をチェック
pub struct WorkerBuilder {
    identity: WorkerIdentity,
    registry: CapabilityRegistry,
    expected: Option<Vec<String>>,
    config: WorkerConfig,
    clock: Arc<dyn Clock>,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing capabilities: {0:?}. These were expected but not registered.")]
    MissingCapabilities(Vec<String>),
}

impl WorkerBuilder {
    pub fn new(identity: WorkerIdentity) -> Self {
        Self {
            identity,
            registry: CapabilityRegistry::new(),
            expected: None,
            config: WorkerConfig::default(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn register<A: ActionArgs, H: Handler<A> + 'static>(
        mut self,
        handler: H,
    ) -> Result<Self, RegistryError> {
        self.registry.register::<A, H>(handler)?;
        Ok(self)
    }

    pub fn expose(
        mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Result<Self, RegistryError> {
        self.registry.expose(name, value)?;
        Ok(self)
    }

    pub fn expect_capabilities(mut self, names: &[&str]) -> Self {
        self.expected = Some(names.iter().map(|n| n.to_string()).collect());
        self
    }

    pub fn config(mut self, config: WorkerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn build(self, store: Arc<dyn QueueStore>) -> Result<Worker, BuildError> {
        if let Some(expected) = &self.expected {
            let missing: Vec<String> = expected
                .iter()
                .filter(|name| !self.registry.contains(name))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(BuildError::MissingCapabilities(missing));
            }
        }
        Ok(Worker::new(
            self.identity,
            self.registry,
            self.config,
            self.clock,
            store,
        ))
    }
}
