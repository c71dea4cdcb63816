//! Toolkit configuration
//!
//! All configuration is passed in-memory by the embedding caller; there are
//! no environment variables or config files.

const DEFAULT_MAX_UPLOAD_BYTES: u64 = 1024 * 1024 * 1024;
const DEFAULT_MAX_JSON_BYTES: usize = 1024 * 1024;

/// Caller-supplied limits and policies for the toolkit.
///
/// Zero-valued limits select the defaults (1 GiB for uploads, 1 MiB for JSON
/// bodies). An empty `allowed_content_types` list means no restriction.
#[derive(Clone, Debug, Default)]
pub struct ToolkitConfig {
    /// Upper bound on a multipart upload body, in bytes. 0 selects the default.
    pub max_upload_bytes: u64,
    /// Accepted sniffed content types, matched case-insensitively.
    pub allowed_content_types: Vec<String>,
    /// Upper bound on a JSON request body, in bytes. 0 selects the default.
    pub max_json_bytes: usize,
    /// Accept JSON object keys the target type does not know about.
    pub allow_unknown_json_fields: bool,
}

impl ToolkitConfig {
    /// Effective upload size bound with the default applied.
    pub fn upload_limit(&self) -> u64 {
        if self.max_upload_bytes == 0 {
            DEFAULT_MAX_UPLOAD_BYTES
        } else {
            self.max_upload_bytes
        }
    }

    /// Effective JSON body size bound with the default applied.
    pub fn json_limit(&self) -> usize {
        if self.max_json_bytes == 0 {
            DEFAULT_MAX_JSON_BYTES
        } else {
            self.max_json_bytes
        }
    }

    /// Whether a sniffed content type passes the allow-list.
    pub fn is_content_type_allowed(&self, content_type: &str) -> bool {
        if self.allowed_content_types.is_empty() {
            return true;
        }
        self.allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(content_type))
    }
}
