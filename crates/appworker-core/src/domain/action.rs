//! Action - オーケストレータから届く 1 件の実行単位
//!
//! Action は decode された後は immutable として扱います。
//! フィールド名はキュー上の JSON と 1:1 で対応します。

use serde::{Deserialize, Serialize};

/// A named argument for a capability invocation.
///
/// `value` is whatever the handler expects; binding to the handler's typed
/// parameters happens in [`crate::typed::handler`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl Argument {
    pub fn new(name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One scheduled unit of work.
///
/// - `id`: unique per scheduled action instance
/// - `action_name`: the capability the worker must expose
/// - `workflow_execution_id`: routing key for result messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(alias = "id_")]
    pub id: String,

    #[serde(default)]
    pub name: String,

    pub action_name: String,

    pub workflow_execution_id: String,

    #[serde(default)]
    pub parameters: Vec<Argument>,
}

impl Action {
    pub fn new(
        id: impl Into<String>,
        action_name: impl Into<String>,
        workflow_execution_id: impl Into<String>,
    ) -> Self {
        let action_name = action_name.into();
        Self {
            id: id.into(),
            name: action_name.clone(),
            action_name,
            workflow_execution_id: workflow_execution_id.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.parameters.push(Argument::new(name, value));
        self
    }
}
