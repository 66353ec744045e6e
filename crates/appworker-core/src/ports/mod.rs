//! Ports - 抽象化レイヤー
//!
//! 外部システム（共有キューストア、時刻、ID 生成）へのインターフェースです。
//! 実装は `impls` に置きます。

pub mod clock;
pub mod id_generator;
pub mod queue_store;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::queue_store::QueueStore;
