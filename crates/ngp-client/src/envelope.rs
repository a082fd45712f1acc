//! Mapping of `{statusCode, message, metadata}` response envelopes.

use serde::Deserialize;
use serde_json::Value;

use ngp_core::{ActionReply, ApiError, NodeStatus, PingReply, Profile};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    #[serde(default)]
    status_code: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
    #[serde(default)]
    metadata: Option<Value>,
}

impl Envelope {
    fn status_code(&self) -> Option<u16> {
        self.status_code.as_ref().and_then(as_u16)
    }

    fn message(&self) -> String {
        self.message.as_ref().map(message_text).unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileMetadata {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    reward_point: Option<Value>,
    #[serde(default)]
    social_task: Option<Vec<Value>>,
    #[serde(default)]
    nodes: Option<Vec<NodeMetadata>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeMetadata {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    total_point: Option<Value>,
    #[serde(default)]
    today_point: Option<Value>,
    #[serde(default)]
    is_active: Option<bool>,
}

fn decode(body: &str) -> Result<Envelope, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Malformed(format!("invalid JSON envelope: {e}")))
}

pub(crate) fn parse_profile(body: &str) -> Result<Profile, ApiError> {
    let envelope = decode(body)?;
    let metadata = envelope
        .metadata
        .ok_or_else(|| ApiError::Malformed("profile response has no metadata".to_string()))?;
    let meta: ProfileMetadata = serde_json::from_value(metadata)
        .map_err(|e| ApiError::Malformed(format!("unexpected profile metadata: {e}")))?;

    let completed_task_codes = meta
        .social_task
        .unwrap_or_default()
        .iter()
        .filter_map(task_code)
        .collect();

    let nodes = meta
        .nodes
        .unwrap_or_default()
        .into_iter()
        .map(|node| NodeStatus {
            id: node.id.as_ref().map(value_to_string).unwrap_or_default(),
            total_points: node.total_point.as_ref().and_then(as_f64).unwrap_or(0.0),
            today_points: node.today_point.as_ref().and_then(as_f64).unwrap_or(0.0),
            is_active: node.is_active.unwrap_or(false),
        })
        .collect();

    Ok(Profile {
        username: meta.username.unwrap_or_default(),
        email: meta.email.unwrap_or_default(),
        total_points: meta.reward_point.as_ref().and_then(as_f64).unwrap_or(0.0),
        completed_task_codes,
        nodes,
    })
}

pub(crate) fn parse_action(http_status: u16, body: &str) -> Result<ActionReply, ApiError> {
    let envelope = decode(body)?;
    Ok(ActionReply {
        result_code: envelope.status_code().unwrap_or(http_status),
        message: envelope.message(),
    })
}

pub(crate) fn parse_ping(http_status: u16, body: &str) -> Result<PingReply, ApiError> {
    let envelope = decode(body)?;
    let remote_id = envelope
        .metadata
        .as_ref()
        .and_then(|m| m.get("id"))
        .filter(|id| !id.is_null())
        .map(value_to_string);
    Ok(PingReply {
        result_code: envelope.status_code().unwrap_or(http_status),
        message: envelope.message(),
        remote_id,
    })
}

/// Build the structured error for a non-2xx response, preferring the
/// envelope's own status and message over the HTTP-level ones.
pub(crate) fn normalize_failure(http_status: u16, body: &str) -> ApiError {
    // Read fields individually: error bodies are not guaranteed to match the
    // success envelope (validation errors send `message` as a list).
    let body: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let result_code = body
        .get("statusCode")
        .and_then(as_u16)
        .unwrap_or(http_status);
    let message = body
        .get("message")
        .map(message_text)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("Request failed with status code {http_status}"));
    ApiError::Remote {
        result_code,
        message,
    }
}

fn task_code(entry: &Value) -> Option<String> {
    match entry {
        Value::String(code) => Some(code.clone()),
        Value::Object(map) => ["code", "taskId", "id"]
            .iter()
            .find_map(|key| map.get(*key))
            .map(value_to_string),
        _ => None,
    }
}

/// Upstream messages are usually strings; validation failures send a list.
fn message_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(message_text)
            .filter(|m| !m.is_empty())
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}

fn as_u16(value: &Value) -> Option<u16> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
