//! CapabilityRegistry - capability の登録と名前解決
//!
//! # 学習ポイント
//! - HashMap での型消去された trait object の管理
//! - Generic methods での登録と型安全性
//! - Arc による共有所有権
//!
//! worker type の定義時に一度だけ組み立て、実行中は読み取り専用で使います。

use std::collections::HashMap;
use std::sync::Arc;

use super::args::ActionArgs;
use super::handler::{DynHandler, Handler, TypedHandler};

/// A named member a worker type exposes.
#[derive(Clone)]
pub enum Capability {
    /// An invokable handler.
    Callable(Arc<dyn DynHandler>),

    /// A plain value (e.g. a version string). Resolvable by name, but
    /// invoking it yields "Action not callable".
    Attribute(serde_json::Value),
}

impl Capability {
    pub fn is_callable(&self) -> bool {
        matches!(self, Capability::Callable(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("capability '{0}' is already registered")]
    AlreadyRegistered(String),
}

#[derive(Default, Clone)]
pub struct CapabilityRegistry {
    capabilities: HashMap<String, Capability>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<A: ActionArgs, H: Handler<A> + 'static>(
        &mut self,
        handler: H,
    ) -> Result<(), RegistryError> {
        let typed_handler = TypedHandler::<A, H>::new(handler);
        self.insert(A::ACTION_NAME, Capability::Callable(Arc::new(typed_handler)))
    }

    /// Expose a non-callable attribute under `name`.
    pub fn expose(
        &mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Result<(), RegistryError> {
        self.insert(name, Capability::Attribute(value.into()))
    }

    fn insert(&mut self, name: impl Into<String>, capability: Capability) -> Result<(), RegistryError> {
        let name = name.into();
        if self.capabilities.contains_key(&name) {
            return Err(RegistryError::AlreadyRegistered(name));
        }
        self.capabilities.insert(name, capability);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Capability> {
        self.capabilities.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.capabilities.contains_key(name)
    }

    /// Names of every registered capability, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.capabilities.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typed::fixtures::{Add, AddHandler, Echo, EchoHandler};

    #[test]
    fn register_and_get() {
        let mut registry = CapabilityRegistry::new();
        registry.register::<Echo, _>(EchoHandler).unwrap();

        let cap = registry.get("echo").unwrap();
        assert!(cap.is_callable());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn double_registration_is_rejected() {
        let mut registry = CapabilityRegistry::new();
        registry.register::<Echo, _>(EchoHandler).unwrap();
        let result = registry.register::<Echo, _>(EchoHandler);
        assert!(matches!(result, Err(RegistryError::AlreadyRegistered(name)) if name == "echo"));
    }

    #[test]
    fn attribute_collides_with_handler_name() {
        let mut registry = CapabilityRegistry::new();
        registry.register::<Add, _>(AddHandler).unwrap();
        assert!(registry.expose("add", 1).is_err());
    }

    #[test]
    fn attributes_are_not_callable() {
        let mut registry = CapabilityRegistry::new();
        registry.expose("version", "1.0.0").unwrap();
        let cap = registry.get("version").unwrap();
        assert!(!cap.is_callable());
    }

    #[test]
    fn names_are_sorted() {
        let mut registry = CapabilityRegistry::new();
        registry.register::<Echo, _>(EchoHandler).unwrap();
        registry.register::<Add, _>(AddHandler).unwrap();
        registry.expose("version", "1").unwrap();
        assert_eq!(registry.names(), vec!["add", "echo", "version"]);
        assert_eq!(registry.len(), 3);
    }
}
