//! Standard JSON response envelope

use serde::{Deserialize, Serialize};

/// Fixed wrapper for JSON API responses.
///
/// Wire shape is `{"error": bool, "message": string, "data"?: any}`; the
/// `data` key is omitted entirely when absent, never emitted as `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub error: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Envelope {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            error: false,
            message: message.into(),
            data: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}
