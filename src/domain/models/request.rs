#[cfg(test)]
#[path = "request_test.rs"]
mod tests;

use std::time::Instant;

use serde_json::Value;

pub const NETWORK_ERROR: &str = "Network error";
pub const UNAUTHORIZED: u16 = 401;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
}

/// Describes one outbound call. `dispatched_at` is filled in by the request
/// pipeline right before the call hits the wire.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub dispatched_at: Option<Instant>,
}

impl ApiRequest {
    pub fn get(path: &str) -> ApiRequest {
        return ApiRequest {
            method: Method::Get,
            path: path.to_string(),
            query: vec![],
            body: None,
            dispatched_at: None,
        };
    }

    pub fn post(path: &str, body: Value) -> ApiRequest {
        return ApiRequest {
            method: Method::Post,
            path: path.to_string(),
            query: vec![],
            body: Some(body),
            dispatched_at: None,
        };
    }

    /// Adds a query parameter, skipping absent values.
    pub fn with_query(mut self, key: &str, value: Option<&str>) -> ApiRequest {
        if let Some(val) = value {
            self.query.push((key.to_string(), val.to_string()));
        }

        return self;
    }
}

/// Normalized failure handed back to callers of the request pipeline.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct RequestError {
    pub status: Option<u16>,
    pub message: String,
    pub data: Option<Value>,
}

impl RequestError {
    /// Builds the error, preferring the server supplied `message` field, then
    /// the transport error text, then a generic network error.
    pub fn from_parts(status: Option<u16>, data: Option<Value>, transport: &str) -> RequestError {
        let message = data
            .as_ref()
            .and_then(server_message)
            .or_else(|| {
                if transport.trim().is_empty() {
                    return None;
                }
                return Some(transport.to_string());
            })
            .unwrap_or_else(|| return NETWORK_ERROR.to_string());

        return RequestError {
            status,
            message,
            data,
        };
    }

    /// The server rejected the credential. The session has already been
    /// cleared by the time a caller sees this.
    pub fn is_session_expired(&self) -> bool {
        return self.status == Some(UNAUTHORIZED);
    }
}

fn server_message(data: &Value) -> Option<String> {
    match data.get("message")? {
        Value::String(text) if !text.is_empty() => return Some(text.to_string()),
        Value::Array(items) => {
            let parts = items
                .iter()
                .filter_map(|e| return e.as_str())
                .collect::<Vec<&str>>();
            if parts.is_empty() {
                return None;
            }
            return Some(parts.join(", "));
        }
        _ => return None,
    }
}
