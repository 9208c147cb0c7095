//! Request message construction for the FCM legacy send API
//!
//! A message targets either a single registration token or an ordered batch
//! of tokens, never both. The optional `notification` and `data` payloads are
//! validated to be JSON objects at construction time; their contents are
//! passed through opaquely.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::{FcmError, FcmResult};

/// Maximum number of registration ids the FCM legacy API accepts per request
pub const MAX_REG_TOKENS: usize = 1000;

/// Recipient addressing for one message
///
/// Serializes as the `to` key for a single token and the `registration_ids`
/// key for a batch, so exactly one of the two appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Target {
    /// One registration token, sent as `"to"`
    #[serde(rename = "to")]
    Single(String),
    /// An ordered batch of registration tokens, sent as `"registration_ids"`
    #[serde(rename = "registration_ids")]
    Batch(Vec<String>),
}

/// A single FCM send request payload
///
/// Serialization emits exactly the fields that were set; unset optional
/// fields produce no key at all.
#[derive(Debug, Clone, Serialize)]
pub struct FcmMessage {
    #[serde(flatten)]
    target: Target,
    #[serde(skip_serializing_if = "Option::is_none")]
    condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notification: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Map<String, Value>>,
}

impl FcmMessage {
    /// Build a message for the given target
    ///
    /// Fails with `InvalidArgument` when `notification` or `data` is supplied
    /// but is not a JSON object, or when a batch target carries no tokens.
    pub fn new(
        target: Target,
        notification: Option<Value>,
        data: Option<Value>,
    ) -> FcmResult<Self> {
        if let Target::Batch(ids) = &target {
            if ids.is_empty() {
                return Err(FcmError::invalid_argument(
                    "registration_ids",
                    "at least one registration id is required",
                ));
            }
        }

        Ok(Self {
            target,
            condition: None,
            notification: require_object("notification", notification)?,
            data: require_object("data", data)?,
        })
    }

    /// Attach a topic-condition expression
    ///
    /// The expression is passed through to the API unmodified. Note that
    /// reply `results` are still paired against the token target only; there
    /// is no condition-result pairing scheme.
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// The recipient addressing of this message
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Serialize this message to its JSON wire form
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

fn require_object(
    field: &'static str,
    value: Option<Value>,
) -> FcmResult<Option<Map<String, Value>>> {
    match value {
        None => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(FcmError::invalid_argument(
            field,
            format!("must be a JSON object, got {}", json_kind(&other)),
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
