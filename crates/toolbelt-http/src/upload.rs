//! Multipart upload pipeline
//!
//! Buffers the request body under the configured size bound, walks the file
//! parts through sniffing and allow-list validation, and persists each one
//! under the caller's directory. Validation runs against sniffed bytes, not
//! the client's claimed content type.

use std::path::Path;

use axum::body::{to_bytes, Body};
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{header, HeaderMap, StatusCode};
use tokio::io::AsyncWriteExt;

use toolbelt_core::{detect_content_type, fsutil};

use crate::toolkit::Toolkit;

const RENAME_TOKEN_LEN: usize = 25;

/// Metadata for one persisted part.
///
/// The file on disk outlives this record; cleaning it up is the caller's
/// responsibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub new_name: String,
    pub original_name: String,
    pub size_bytes: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadErrorKind {
    #[error("uploaded content is too large")]
    TooLarge,

    #[error("failed to create upload directory: {0}")]
    Dir(#[source] std::io::Error),

    #[error("malformed multipart request: {0}")]
    Multipart(String),

    #[error("uploaded file type {detected} is not permitted")]
    UnsupportedType { detected: String },

    #[error("failed to persist uploaded file: {0}")]
    Io(#[source] std::io::Error),
}

/// Pipeline failure carrying the records persisted before the failing part.
///
/// The pipeline is fail-fast: the first rejected or unwritable part aborts
/// the call, but files already on disk stay there and their records travel
/// in `completed`.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct UploadError {
    pub kind: UploadErrorKind,
    pub completed: Vec<UploadedFile>,
}

impl UploadError {
    fn new(kind: UploadErrorKind) -> Self {
        Self {
            kind,
            completed: Vec::new(),
        }
    }

    /// HTTP status this error should surface as.
    pub fn status(&self) -> StatusCode {
        match self.kind {
            UploadErrorKind::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            UploadErrorKind::UnsupportedType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            UploadErrorKind::Multipart(_) => StatusCode::BAD_REQUEST,
            UploadErrorKind::Dir(_) | UploadErrorKind::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Toolkit {
    /// Persist every file part of a `multipart/form-data` request under
    /// `upload_dir`.
    ///
    /// With `rename` set, each file gets a 25-character random name keeping
    /// the original extension. Otherwise the client-supplied filename is used
    /// verbatim: the caller accepts the collision/overwrite risk and the
    /// path-traversal exposure of unsanitized names.
    pub async fn upload_files(
        &self,
        req: Request,
        upload_dir: &Path,
        rename: bool,
    ) -> Result<Vec<UploadedFile>, UploadError> {
        let limit = self.config.upload_limit();

        if content_length(req.headers()).is_some_and(|length| length > limit) {
            return Err(UploadError::new(UploadErrorKind::TooLarge));
        }

        // Buffer under the bound before any per-file work so an oversized
        // body fails with TooLarge and nothing is persisted.
        let (parts, body) = req.into_parts();
        let buffered = to_bytes(body, usize::try_from(limit).unwrap_or(usize::MAX))
            .await
            .map_err(|err| {
                if err.to_string().contains("length limit") {
                    UploadError::new(UploadErrorKind::TooLarge)
                } else {
                    UploadError::new(UploadErrorKind::Multipart(err.to_string()))
                }
            })?;
        let req = Request::from_parts(parts, Body::from(buffered));

        let mut multipart = Multipart::from_request(req, &())
            .await
            .map_err(|err| UploadError::new(UploadErrorKind::Multipart(err.to_string())))?;

        fsutil::ensure_dir(upload_dir)
            .await
            .map_err(|err| UploadError::new(UploadErrorKind::Dir(err)))?;

        let mut uploaded = Vec::new();

        loop {
            let field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(err) => {
                    return Err(UploadError {
                        kind: UploadErrorKind::Multipart(err.to_string()),
                        completed: uploaded,
                    })
                }
            };

            // Non-file fields are not the pipeline's concern.
            let Some(original_name) = field.file_name().map(str::to_owned) else {
                continue;
            };

            let data = match field.bytes().await {
                Ok(data) => data,
                Err(err) => {
                    return Err(UploadError {
                        kind: UploadErrorKind::Multipart(err.to_string()),
                        completed: uploaded,
                    })
                }
            };

            let detected = detect_content_type(&data);
            if !self.config.is_content_type_allowed(detected) {
                tracing::debug!(
                    content_type = detected,
                    file = %original_name,
                    "rejected upload by sniffed content type"
                );
                return Err(UploadError {
                    kind: UploadErrorKind::UnsupportedType {
                        detected: detected.to_string(),
                    },
                    completed: uploaded,
                });
            }

            let new_name = if rename {
                format!(
                    "{}{}",
                    self.tokens.random_string(RENAME_TOKEN_LEN),
                    file_extension(&original_name)
                )
            } else {
                original_name.clone()
            };

            let dest = upload_dir.join(&new_name);
            if let Err(err) = write_file(&dest, &data).await {
                return Err(UploadError {
                    kind: UploadErrorKind::Io(err),
                    completed: uploaded,
                });
            }

            tracing::debug!(
                path = %dest.display(),
                size_bytes = data.len(),
                "persisted uploaded file"
            );

            uploaded.push(UploadedFile {
                new_name,
                original_name,
                size_bytes: data.len() as u64,
            });
        }

        Ok(uploaded)
    }

    /// Single-file form of [`Toolkit::upload_files`]: expects exactly one
    /// file part and returns its record.
    pub async fn upload_file(
        &self,
        req: Request,
        upload_dir: &Path,
        rename: bool,
    ) -> Result<UploadedFile, UploadError> {
        let mut files = self.upload_files(req, upload_dir, rename).await?;
        if files.is_empty() {
            return Err(UploadError::new(UploadErrorKind::Multipart(
                "no file part in request".to_string(),
            )));
        }
        Ok(files.remove(0))
    }
}

/// Extension including the dot, or empty when the name has none.
fn file_extension(name: &str) -> String {
    Path::new(name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

async fn write_file(dest: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(dest).await?;
    file.write_all(data).await?;
    Ok(())
}
