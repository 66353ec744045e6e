//! Typed - 型付き capability API
//!
//! action_name による名前解決（late binding）はそのままに、
//! 各 Handler の引数の型はコンパイル時に保証します。
//!
//! # 二層構造
//! - **表層（Typed）**: `ActionArgs` trait, `Handler<A>` trait - 型安全
//! - **内部（Dyn）**: `DynHandler` trait - object-safe, type erasure

pub mod args;
pub mod codec;
pub mod handler;
pub mod registry;

#[cfg(test)]
pub(crate) mod fixtures;

pub use self::args::ActionArgs;
pub use self::codec::ActionCodec;
pub use self::handler::{DynHandler, Handler, TypedHandler, bind};
pub use self::registry::{Capability, CapabilityRegistry, RegistryError};
