//! Static file responder integration tests

use axum::body::{to_bytes, Body};
use axum::extract::Request;
use axum::http::StatusCode;
use toolbelt_http::download_static_file;

const FILE_BYTES: &[u8] = b"not really a jpeg, but bytes all the same";

async fn write_fixture(dir: &std::path::Path, name: &str) {
    tokio::fs::write(dir.join(name), FILE_BYTES).await.unwrap();
}

fn get(uri: &str) -> Request {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn serves_file_as_attachment_with_display_name() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "stored.jpg").await;

    let response = download_static_file(get("/download"), dir.path(), "stored.jpg", "image.jpg").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-disposition").unwrap(),
        "attachment; filename=\"image.jpg\""
    );
    assert_eq!(
        response
            .headers()
            .get("content-length")
            .unwrap()
            .to_str()
            .unwrap(),
        FILE_BYTES.len().to_string()
    );

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], FILE_BYTES);
}

#[tokio::test]
async fn display_name_is_percent_encoded() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "stored.jpg").await;

    let response =
        download_static_file(get("/download"), dir.path(), "stored.jpg", "my cat photo.jpg").await;

    assert_eq!(
        response.headers().get("content-disposition").unwrap(),
        "attachment; filename=\"my%20cat%20photo.jpg\""
    );
}

#[tokio::test]
async fn missing_file_surfaces_as_response_status() {
    let dir = tempfile::tempdir().unwrap();

    let response = download_static_file(get("/download"), dir.path(), "absent.jpg", "gone.jpg").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn range_requests_are_honored() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "stored.jpg").await;

    let req = Request::builder()
        .method("GET")
        .uri("/download")
        .header("range", "bytes=0-3")
        .body(Body::empty())
        .unwrap();

    let response = download_static_file(req, dir.path(), "stored.jpg", "image.jpg").await;

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], &FILE_BYTES[0..4]);
}
