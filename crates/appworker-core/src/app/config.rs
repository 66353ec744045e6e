//! WorkerConfig - 環境変数ベースの設定

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_REDIS_URI: &str = "redis://localhost";
pub const DEFAULT_ACTIONS_IN_PROCESS: &str = "actions-in-process";
pub const DEFAULT_ACTION_RESULT_CH: &str = "action-results";
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Address of the shared queue store.
    pub redis_uri: String,

    /// Tracking list every claimed item is moved into.
    pub actions_in_process: String,

    /// Result channel for actions without a workflow execution id.
    pub action_result_ch: String,

    /// No claim for this long ends the process.
    pub idle_timeout: Duration,

    /// Sleep after a full sweep of empty queues. Zero only yields.
    pub poll_interval: Duration,

    /// Cap on concurrently executing actions. `None` = unbounded.
    pub max_in_flight: Option<usize>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            redis_uri: DEFAULT_REDIS_URI.to_string(),
            actions_in_process: DEFAULT_ACTIONS_IN_PROCESS.to_string(),
            action_result_ch: DEFAULT_ACTION_RESULT_CH.to_string(),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            poll_interval: Duration::ZERO,
            max_in_flight: None,
        }
    }
}

impl WorkerConfig {
    /// Read `REDIS_URI`, `ACTIONS_IN_PROCESS`, `ACTION_RESULT_CH`,
    /// `IDLE_TIMEOUT_SECS`, `POLL_INTERVAL_MS` and `MAX_IN_FLIGHT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = lookup("REDIS_URI") {
            config.redis_uri = v;
        }
        if let Some(v) = lookup("ACTIONS_IN_PROCESS") {
            config.actions_in_process = v;
        }
        if let Some(v) = lookup("ACTION_RESULT_CH") {
            config.action_result_ch = v;
        }
        if let Some(v) = lookup("IDLE_TIMEOUT_SECS") {
            config.idle_timeout = Duration::from_secs(parse("IDLE_TIMEOUT_SECS", &v)?);
        }
        if let Some(v) = lookup("POLL_INTERVAL_MS") {
            config.poll_interval = Duration::from_millis(parse("POLL_INTERVAL_MS", &v)?);
        }
        if let Some(v) = lookup("MAX_IN_FLIGHT") {
            let n: usize = parse("MAX_IN_FLIGHT", &v)?;
            if n == 0 {
                return Err(ConfigError::Invalid { key: "MAX_IN_FLIGHT", value: v });
            }
            config.max_in_flight = Some(n);
        }

        Ok(config)
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}
