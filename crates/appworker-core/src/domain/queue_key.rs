//! Queue keys - `{WorkerTypeName}-{Version}-{Priority}`
//!
//! キー集合はプロセス起動時に一度だけ作り、以後は変更しません。

use std::fmt;

/// Priority tier of a source queue (5 = highest, 1 = lowest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Priority(u8);

impl Priority {
    pub const HIGHEST: Priority = Priority(5);
    pub const LOWEST: Priority = Priority(1);

    /// Returns `None` outside `1..=5`.
    pub fn new(level: u8) -> Option<Self> {
        (Self::LOWEST.0..=Self::HIGHEST.0)
            .contains(&level)
            .then_some(Self(level))
    }

    pub fn level(&self) -> u8 {
        self.0
    }

    /// All tiers, highest first.
    pub fn descending() -> impl Iterator<Item = Priority> {
        (Self::LOWEST.0..=Self::HIGHEST.0).rev().map(Priority)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identity of a worker type: the name and version its queues are keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkerIdentity {
    name: String,
    version: String,
}

impl WorkerIdentity {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn queue_key(&self, priority: Priority) -> String {
        format!("{}-{}-{}", self.name, self.version, priority)
    }
}

impl fmt::Display for WorkerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.version)
    }
}

/// The fixed, highest-first tuple of source queue keys for one worker type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueKeys {
    keys: Vec<(Priority, String)>,
}

impl QueueKeys {
    pub fn for_identity(identity: &WorkerIdentity) -> Self {
        let keys = Priority::descending()
            .map(|p| (p, identity.queue_key(p)))
            .collect();
        Self { keys }
    }

    /// Key at sweep position `attempt` (wraps around).
    pub fn at(&self, attempt: usize) -> (Priority, &str) {
        let (priority, key) = &self.keys[attempt % self.keys.len()];
        (*priority, key.as_str())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|(_, k)| k.as_str())
    }
}
