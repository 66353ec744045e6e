//! ActionCodec - キュー上の bytes と Action / ActionStatus の相互変換
//!
//! # デシリアライズフロー
//! 1. claim された raw payload（JSON bytes）を受け取る
//! 2. serde_json で Action にデシリアライズ
//! 3. 必須フィールドが空なら DecodeError
//!
//! I/O はしません（pure）。

use crate::domain::{Action, ActionStatus, DecodeError};

#[derive(Debug, Clone, Copy, Default)]
pub struct ActionCodec;

impl ActionCodec {
    pub fn decode(raw: &[u8]) -> Result<Action, DecodeError> {
        let action: Action = serde_json::from_slice(raw)?;
        if action.id.is_empty() {
            return Err(DecodeError::MissingField("id"));
        }
        if action.action_name.is_empty() {
            return Err(DecodeError::MissingField("action_name"));
        }
        Ok(action)
    }

    pub fn encode(action: &Action) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(action)
    }

    pub fn encode_status(status: &ActionStatus) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(status)
    }

    pub fn decode_status(raw: &[u8]) -> Result<ActionStatus, serde_json::Error> {
        serde_json::from_slice(raw)
    }
}
