//! Static file download responses

use std::path::Path;

use axum::body::Body;
use axum::extract::Request;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tower::ServiceExt;
use tower_http::services::ServeFile;

/// Everything outside `[A-Za-z0-9-_.~]` is escaped in the disposition
/// filename.
const FILENAME_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Serve `directory/stored_name` as an attachment named `display_name`.
///
/// Delegates to [`ServeFile`], so conditional and range requests behave the
/// way the underlying primitive defines (304/404/416 surface as response
/// statuses, not returned errors), then stamps the content-disposition
/// header onto whatever came back.
pub async fn download_static_file(
    req: Request,
    directory: &Path,
    stored_name: &str,
    display_name: &str,
) -> Response {
    let encoded = utf8_percent_encode(display_name, FILENAME_ESCAPE);
    let disposition = format!("attachment; filename=\"{encoded}\"");

    let mut response = match ServeFile::new(directory.join(stored_name)).oneshot(req).await {
        Ok(response) => response.map(Body::new),
        Err(err) => {
            tracing::error!(error = %err, "static file service failed");
            let mut response = Response::new(Body::empty());
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        }
    };

    if let Ok(value) = HeaderValue::from_str(&disposition) {
        response
            .headers_mut()
            .insert(header::CONTENT_DISPOSITION, value);
    }

    response
}
