//! appworker-core
//!
//! 共有キューから action を claim し、名前で解決した capability を実行して、
//! 結果を workflow ごとの result channel に返す worker の部品群です。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（Action, ActionStatus, queue key, errors）
//! - **ports**: 抽象化レイヤー（QueueStore, Clock, IdGenerator）
//! - **impls**: 実装（InMemoryQueueStore, RedisQueueStore）
//! - **typed**: 型付き capability API（ActionArgs, Handler, CapabilityRegistry, ActionCodec）
//! - **app**: アプリケーションロジック（ClaimLoop, Dispatcher, ResultReporter, Worker）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod typed;

pub use app::{Worker, WorkerBuilder, WorkerConfig};
pub use domain::{Action, ActionStatus, Argument, StatusKind, WorkerError, WorkerIdentity};
pub use typed::{ActionArgs, Handler};
