//! ActionStatus - result messages published back to the orchestrator.
//!
//! Every message carries the same envelope (`action_id`, `workflow_execution_id`,
//! `timestamp`, `status`, `payload`) so the orchestrator can read a result
//! channel without knowing which worker produced it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::action::Action;

/// Status tag of a result message.
///
/// Serialized as SCREAMING_SNAKE_CASE: STARTED / SUCCESS / FAILURE / NOT_FOUND.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusKind {
    Started,
    Success,
    Failure,
    NotFound,
}

impl StatusKind {
    /// Success, Failure and NotFound end an action's lifecycle.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StatusKind::Started)
    }
}

/// A result message for one action.
///
/// `payload` is the return value for SUCCESS, an error description for
/// FAILURE / NOT_FOUND, and `null` for STARTED.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionStatus {
    pub action_id: String,
    pub workflow_execution_id: String,
    pub name: String,
    pub action_name: String,
    pub timestamp: DateTime<Utc>,
    pub status: StatusKind,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl ActionStatus {
    fn from_action(
        action: &Action,
        status: StatusKind,
        payload: serde_json::Value,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            action_id: action.id.clone(),
            workflow_execution_id: action.workflow_execution_id.clone(),
            name: action.name.clone(),
            action_name: action.action_name.clone(),
            timestamp,
            status,
            payload,
        }
    }

    pub fn started(action: &Action, timestamp: DateTime<Utc>) -> Self {
        Self::from_action(action, StatusKind::Started, serde_json::Value::Null, timestamp)
    }

    pub fn success(action: &Action, result: serde_json::Value, timestamp: DateTime<Utc>) -> Self {
        Self::from_action(action, StatusKind::Success, result, timestamp)
    }

    pub fn failure(action: &Action, error: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self::from_action(
            action,
            StatusKind::Failure,
            serde_json::Value::String(error.into()),
            timestamp,
        )
    }

    pub fn not_found(action: &Action, error: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self::from_action(
            action,
            StatusKind::NotFound,
            serde_json::Value::String(error.into()),
            timestamp,
        )
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[rstest]
    #[case(StatusKind::Started, "\"STARTED\"")]
    #[case(StatusKind::Success, "\"SUCCESS\"")]
    #[case(StatusKind::Failure, "\"FAILURE\"")]
    #[case(StatusKind::NotFound, "\"NOT_FOUND\"")]
    fn status_kind_serializes_as_screaming_snake(#[case] kind: StatusKind, #[case] expected: &str) {
        assert_eq!(serde_json::to_string(&kind).unwrap(), expected);
    }

    #[test]
    fn only_started_is_non_terminal() {
        assert!(!StatusKind::Started.is_terminal());
        assert!(StatusKind::Success.is_terminal());
        assert!(StatusKind::Failure.is_terminal());
        assert!(StatusKind::NotFound.is_terminal());
    }

    #[test]
    fn started_has_null_payload() {
        let action = Action::new("a1", "echo", "w1");
        let msg = ActionStatus::started(&action, at());
        assert_eq!(msg.payload, serde_json::Value::Null);
        assert_eq!(msg.action_id, "a1");
        assert_eq!(msg.workflow_execution_id, "w1");
    }

    #[test]
    fn success_keeps_mixed_payload_types() {
        let action = Action::new("a1", "stats", "w1");
        let result = serde_json::json!({ "count": 3, "ratio": 0.5, "ok": true, "label": null });
        let msg = ActionStatus::success(&action, result.clone(), at());

        let wire = serde_json::to_string(&msg).unwrap();
        let back: ActionStatus = serde_json::from_str(&wire).unwrap();
        assert_eq!(back.payload, result);
        assert_eq!(back.timestamp, at());
    }

    #[test]
    fn failure_payload_is_the_description() {
        let action = Action::new("a1", "explode", "w1");
        let msg = ActionStatus::failure(&action, "boom", at());
        assert_eq!(msg.status, StatusKind::Failure);
        assert_eq!(msg.payload, "boom");
    }
}
