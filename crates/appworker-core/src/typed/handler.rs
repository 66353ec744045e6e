//! Handler trait - capability を実行する Handler の定義
//!
//! # 学習ポイント
//! - ジェネリック trait (Handler<A>)
//! - Object-safe trait (DynHandler)
//! - Type erasure パターン (TypedHandler<A, H> → DynHandler)

use std::collections::HashSet;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde::Serialize;

use super::args::ActionArgs;
use crate::domain::{Argument, CapabilityError};

/// Handler は型付きの引数を受け取って capability を実行する
///
/// # 使用例
/// ```ignore
/// struct EchoHandler;
///
/// #[async_trait]
/// impl Handler<Echo> for EchoHandler {
///     type Output = String;
///
///     async fn handle(&self, args: Echo) -> anyhow::Result<String> {
///         Ok(args.text)
///     }
/// }
/// ```
///
/// 同じ Handler が複数の action から同時に呼ばれることがあります。
/// 内部状態を書き換える場合の同期は Handler 側の責任です。
#[async_trait]
pub trait Handler<A: ActionArgs>: Send + Sync {
    type Output: Serialize + Send;

    async fn handle(&self, args: A) -> anyhow::Result<Self::Output>;
}

/// DynHandler は object-safe な Handler の抽象化
///
/// `HashMap<String, Capability>` に格納するため、引数は `Argument` の列、
/// 戻り値は `serde_json::Value` に揃えています。
#[async_trait]
pub trait DynHandler: Send + Sync {
    async fn call(&self, arguments: Vec<Argument>) -> Result<serde_json::Value, CapabilityError>;

    fn action_name(&self) -> &'static str;

    fn param_names(&self) -> &'static [&'static str];
}

pub struct TypedHandler<A: ActionArgs, H: Handler<A>> {
    handler: H,
    _marker: PhantomData<fn() -> A>,
}

impl<A: ActionArgs, H: Handler<A>> TypedHandler<A, H> {
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<A: ActionArgs, H: Handler<A>> DynHandler for TypedHandler<A, H> {
    async fn call(&self, arguments: Vec<Argument>) -> Result<serde_json::Value, CapabilityError> {
        let args: A = bind(arguments, A::PARAM_NAMES)?;
        let output = self
            .handler
            .handle(args)
            .await
            .map_err(CapabilityError::Invocation)?;
        serde_json::to_value(output).map_err(CapabilityError::Output)
    }

    fn action_name(&self) -> &'static str {
        A::ACTION_NAME
    }

    fn param_names(&self) -> &'static [&'static str] {
        A::PARAM_NAMES
    }
}

/// Bind an ordered argument list to the declared parameter set.
///
/// 1. 名前の重複・未宣言の名前をチェック
/// 2. `{name: value}` の object を組み立てる
/// 3. serde で `A` にデシリアライズ（不足・型違いはここで失敗）
pub fn bind<A: ActionArgs>(
    arguments: Vec<Argument>,
    declared: &[&str],
) -> Result<A, CapabilityError> {
    let mut seen = HashSet::with_capacity(arguments.len());
    let mut object = serde_json::Map::with_capacity(arguments.len());

    for Argument { name, value } in arguments {
        if !declared.contains(&name.as_str()) {
            return Err(CapabilityError::Binding(format!(
                "unexpected argument '{name}' for {}",
                A::ACTION_NAME
            )));
        }
        if !seen.insert(name.clone()) {
            return Err(CapabilityError::Binding(format!(
                "argument '{name}' given more than once"
            )));
        }
        object.insert(name, value);
    }

    serde_json::from_value(serde_json::Value::Object(object))
        .map_err(|e| CapabilityError::Binding(format!("{}: {e}", A::ACTION_NAME)))
}
