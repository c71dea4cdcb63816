//! JSON push to remote endpoints

use axum::http::{header, StatusCode};
use serde::Serialize;

use crate::toolkit::Toolkit;

#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("request to remote endpoint failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl PushError {
    /// HTTP status this error should surface as.
    pub fn status(&self) -> StatusCode {
        match self {
            PushError::Serialize(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PushError::Request(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl Toolkit {
    /// Serialize `payload` and POST it to `uri` as `application/json`.
    ///
    /// Returns the raw response and its status. The response body is not
    /// read or drained here; the caller owns its lifecycle (read it, or drop
    /// it to release the connection). The client is the toolkit-owned one,
    /// replaceable via [`Toolkit::with_http_client`].
    pub async fn push_json<T: Serialize + ?Sized>(
        &self,
        uri: &str,
        payload: &T,
    ) -> Result<(reqwest::Response, StatusCode), PushError> {
        let body = serde_json::to_vec(payload)?;

        let response = self
            .http_client
            .post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        Ok((response, status))
    }
}
