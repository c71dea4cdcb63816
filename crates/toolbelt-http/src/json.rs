//! Strict JSON request decoding and response writing

use axum::body::{to_bytes, Body};
use axum::extract::Request;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::error::Category;

use crate::envelope::Envelope;
use crate::toolkit::Toolkit;

/// Decode/encode failures, one variant per condition a caller can act on.
#[derive(Debug, thiserror::Error)]
pub enum JsonError {
    #[error("body contains badly formed JSON (at line {line}, column {column})")]
    Malformed { line: usize, column: usize },

    #[error("body contains badly formed JSON")]
    MalformedTruncated,

    #[error("body contains an incorrect JSON type (at line {line}, column {column})")]
    TypeMismatch { line: usize, column: usize },

    #[error("body must not be empty")]
    EmptyBody,

    #[error("body contains unknown key \"{field}\"")]
    UnknownField { field: String },

    #[error("body must not be larger than {limit} bytes")]
    BodyTooLarge { limit: usize },

    #[error("body must contain exactly one JSON value")]
    MultipleValues,

    #[error("failed to read request body: {0}")]
    Read(#[source] axum::Error),

    #[error("failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl JsonError {
    /// HTTP status this error should surface as.
    pub fn status(&self) -> StatusCode {
        match self {
            JsonError::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            JsonError::Serialize(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl Toolkit {
    /// Decode the request body into `T`, enforcing the configured size cap,
    /// the unknown-field policy, and the exactly-one-value rule.
    pub async fn read_json<T: DeserializeOwned>(&self, req: Request) -> Result<T, JsonError> {
        let limit = self.config.json_limit();

        let body = to_bytes(req.into_body(), limit).await.map_err(|err| {
            if err.to_string().contains("length limit") {
                JsonError::BodyTooLarge { limit }
            } else {
                JsonError::Read(err)
            }
        })?;

        self.decode_json(&body)
    }

    /// Body-bytes form of [`Toolkit::read_json`]; the size cap is assumed to
    /// have been applied by whoever produced the buffer.
    pub fn decode_json<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, JsonError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(JsonError::EmptyBody);
        }

        let mut de = serde_json::Deserializer::from_slice(body);

        let result = if self.config.allow_unknown_json_fields {
            T::deserialize(&mut de)
        } else {
            let mut unknown: Option<String> = None;
            let result = serde_ignored::deserialize(&mut de, |path| {
                if unknown.is_none() {
                    unknown = Some(path.to_string());
                }
            });
            // An ignored key precedes any later decode failure in stream
            // order, so it wins.
            if let Some(field) = unknown {
                return Err(JsonError::UnknownField { field });
            }
            result
        };

        let value = result.map_err(classify_decode_error)?;

        de.end().map_err(|_| JsonError::MultipleValues)?;

        Ok(value)
    }

    /// Serialize `payload` into a response with `Content-Type:
    /// application/json`, any caller-supplied headers applied first.
    pub fn write_json<T: Serialize>(
        &self,
        status: StatusCode,
        payload: &T,
        headers: Option<HeaderMap>,
    ) -> Result<Response, JsonError> {
        let buf = serde_json::to_vec(payload)?;

        let mut response = Response::new(Body::from(buf));
        *response.status_mut() = status;

        if let Some(extra) = headers {
            for (name, value) in extra.iter() {
                response.headers_mut().append(name, value.clone());
            }
        }
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        Ok(response)
    }

    /// Render `err` in the standard envelope, status 400 unless overridden.
    pub fn error_json(
        &self,
        err: &dyn std::error::Error,
        status: Option<StatusCode>,
    ) -> Result<Response, JsonError> {
        let status = status.unwrap_or(StatusCode::BAD_REQUEST);
        self.write_json(status, &Envelope::failure(err.to_string()), None)
    }
}

fn classify_decode_error(err: serde_json::Error) -> JsonError {
    match err.classify() {
        Category::Syntax => JsonError::Malformed {
            line: err.line(),
            column: err.column(),
        },
        Category::Eof => JsonError::MalformedTruncated,
        Category::Data => JsonError::TypeMismatch {
            line: err.line(),
            column: err.column(),
        },
        Category::Io => JsonError::Other(err.to_string()),
    }
}
