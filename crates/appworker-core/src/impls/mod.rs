//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryQueueStore**: 開発・テスト用
//! - **RedisQueueStore**: 本番用

pub mod inmem_store;
pub mod redis_store;

pub use self::inmem_store::InMemoryQueueStore;
pub use self::redis_store::RedisQueueStore;
