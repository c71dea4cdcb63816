//! Filesystem helpers

use std::io;
use std::path::Path;

/// Create `path` and any missing ancestors, mode 0755 on Unix.
///
/// No-op when the directory already exists; safe to call concurrently for
/// the same path (a lost exists/create race is not an error).
pub async fn ensure_dir(path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();

    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o755);

    builder.create(path).await
}
