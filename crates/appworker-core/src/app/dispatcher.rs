//! Dispatcher - action_name を capability に解決して実行する
//!
//! 結果は必ず `DispatchOutcome` に変換します。Handler のエラーや panic が
//! dispatch の外に漏れることはありません。

use std::sync::Arc;

use tracing::error;

use crate::domain::{Action, CapabilityError};
use crate::typed::{Capability, CapabilityRegistry};

/// Result of dispatching one action.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Success(serde_json::Value),
    Failure(String),
    NotFound(String),
}

#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<CapabilityRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<CapabilityRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    pub fn resolve(&self, action_name: &str) -> Option<Capability> {
        self.registry.get(action_name).cloned()
    }

    /// Invoke a resolved capability with the action's parameters.
    ///
    /// The handler runs on its own task so a panic is contained to it.
    pub async fn invoke(
        &self,
        capability: Capability,
        action: &Action,
    ) -> Result<serde_json::Value, CapabilityError> {
        let handler = match capability {
            Capability::Callable(handler) => handler,
            Capability::Attribute(_) => return Err(CapabilityError::NotCallable),
        };

        let arguments = action.parameters.clone();
        match tokio::spawn(async move { handler.call(arguments).await }).await {
            Ok(result) => result,
            Err(join_err) if join_err.is_panic() => {
                let panic = join_err.into_panic();
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic payload".to_string());
                Err(CapabilityError::Panicked(message))
            }
            Err(join_err) => Err(CapabilityError::Panicked(join_err.to_string())),
        }
    }

    /// Resolve and invoke in one step.
    pub async fn dispatch(&self, action: &Action) -> DispatchOutcome {
        let Some(capability) = self.resolve(&action.action_name) else {
            return DispatchOutcome::NotFound(not_found_message(&action.action_name));
        };
        match self.invoke(capability, action).await {
            Ok(value) => DispatchOutcome::Success(value),
            Err(e) => {
                error!(action_id = %action.id, action_name = %action.action_name, error = %e, "action failed");
                DispatchOutcome::Failure(e.to_string())
            }
        }
    }
}

pub fn not_found_message(action_name: &str) -> String {
    format!("Action '{action_name}' does not exist")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typed::fixtures::{
        Echo, EchoHandler, Explode, ExplodeHandler, Panic, PanicHandler, Ping, PingHandler,
    };
    use serde_json::json;

    fn dispatcher() -> Dispatcher {
        let mut registry = CapabilityRegistry::new();
        registry.register::<Echo, _>(EchoHandler).unwrap();
        registry.register::<Ping, _>(PingHandler).unwrap();
        registry.register::<Explode, _>(ExplodeHandler).unwrap();
        registry.register::<Panic, _>(PanicHandler).unwrap();
        registry.expose("version", "1.0.0").unwrap();
        Dispatcher::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn success_carries_return_value() {
        let action = Action::new("a1", "echo", "w1").with_argument("text", "hi");
        assert_eq!(dispatcher().dispatch(&action).await, DispatchOutcome::Success(json!("hi")));
    }

    #[tokio::test]
    async fn zero_parameters_invokes_without_arguments() {
        let action = Action::new("a1", "ping", "w1");
        assert_eq!(dispatcher().dispatch(&action).await, DispatchOutcome::Success(json!("pong")));
    }

    #[tokio::test]
    async fn missing_capability_is_not_found() {
        let action = Action::new("a1", "missing", "w1");
        assert_eq!(
            dispatcher().dispatch(&action).await,
            DispatchOutcome::NotFound("Action 'missing' does not exist".into())
        );
    }

    #[tokio::test]
    async fn attribute_is_not_callable() {
        let action = Action::new("a1", "version", "w1");
        assert_eq!(
            dispatcher().dispatch(&action).await,
            DispatchOutcome::Failure("Action not callable".into())
        );
    }

    #[tokio::test]
    async fn handler_error_is_failure() {
        let action = Action::new("a1", "explode", "w1").with_argument("reason", "kaboom");
        assert_eq!(
            dispatcher().dispatch(&action).await,
            DispatchOutcome::Failure("kaboom".into())
        );
    }

    #[tokio::test]
    async fn handler_panic_is_failure() {
        let action = Action::new("a1", "panic", "w1");
        let DispatchOutcome::Failure(msg) = dispatcher().dispatch(&action).await else {
            panic!("expected failure");
        };
        assert!(msg.contains("handler blew up"), "{msg}");
    }

    #[tokio::test]
    async fn bad_arguments_are_failure() {
        let action = Action::new("a1", "echo", "w1").with_argument("nope", 1);
        let DispatchOutcome::Failure(msg) = dispatcher().dispatch(&action).await else {
            panic!("expected failure");
        };
        assert!(msg.starts_with("argument binding failed"), "{msg}");
    }
}
