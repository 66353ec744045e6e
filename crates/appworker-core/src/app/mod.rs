//! App - アプリケーション層
//!
//! ports を組み合わせて worker の実行ロジックを実装します。
//!
//! # 主要コンポーネント
//! - **ClaimLoop**: 優先度順に 1 件を排他的に claim
//! - **Dispatcher**: action_name → capability の解決と実行
//! - **ResultReporter**: status を result channel に push
//! - **Worker**: claim ごとに実行タスクを spawn する composition root
//! - **WorkerBuilder**: capability 表の構築と起動時検証

pub mod builder;
pub mod claim_loop;
pub mod config;
pub mod dispatcher;
pub mod reporter;
pub mod stats;
pub mod worker;

pub use self::builder::{BuildError, WorkerBuilder};
pub use self::claim_loop::{ClaimLoop, Claimed};
pub use self::config::{ConfigError, WorkerConfig};
pub use self::dispatcher::{DispatchOutcome, Dispatcher};
pub use self::reporter::ResultReporter;
pub use self::stats::{StatsSnapshot, WorkerStats};
pub use self::worker::Worker;
