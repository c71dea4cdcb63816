//! HTTP error-response conversion
//!
//! `IntoResponse` impls for the toolkit's error types, so embedding handlers
//! can return `Result<_, JsonError>` (or the upload/push equivalents) with
//! `?` and get the standard envelope at the right status.

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::envelope::Envelope;
use crate::json::JsonError;
use crate::push::PushError;
use crate::upload::UploadError;

/// Render `message` in the error envelope at `status`; plain-text 500 if the
/// envelope itself cannot be encoded.
pub(crate) fn envelope_response(status: StatusCode, message: &str) -> Response {
    match serde_json::to_vec(&Envelope::failure(message)) {
        Ok(buf) => {
            let mut response = Response::new(Body::from(buf));
            *response.status_mut() = status;
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            response
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to encode error envelope");
            let mut response = Response::new(Body::from(message.to_owned()));
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        }
    }
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        envelope_response(self.status(), &self.to_string())
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        envelope_response(self.status(), &self.to_string())
    }
}

impl IntoResponse for PushError {
    fn into_response(self) -> Response {
        envelope_response(self.status(), &self.to_string())
    }
}
