//! Toolbelt HTTP surface
//!
//! Helper utilities for web-service handlers: multipart upload handling,
//! strict JSON request/response encoding, static file download responses,
//! and JSON push to remote endpoints. Everything is invoked from the
//! caller's own handlers; the crate spawns no background work and installs
//! no tracing subscriber.

pub mod envelope;
pub mod error;
pub mod json;
pub mod push;
pub mod static_file;
pub mod toolkit;
pub mod upload;

// Re-export commonly used types
pub use envelope::Envelope;
pub use json::JsonError;
pub use push::PushError;
pub use static_file::download_static_file;
pub use toolkit::Toolkit;
pub use upload::{UploadError, UploadErrorKind, UploadedFile};
