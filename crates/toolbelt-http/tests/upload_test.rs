//! Upload pipeline integration tests
//!
//! Requests are built with hand-rolled multipart bodies so the tests control
//! boundaries and part ordering exactly.

use axum::body::Body;
use axum::extract::Request;
use toolbelt_core::ToolkitConfig;
use toolbelt_http::{Toolkit, UploadErrorKind};

const BOUNDARY: &str = "toolbelt-test-boundary";

const JPEG_BYTES: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00, 0x00,
    0x01, 0x00, 0x01, 0x00, 0x00,
];

const PNG_BYTES: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D',
    b'R',
];

fn toolkit(config: ToolkitConfig) -> Toolkit {
    Toolkit::new(config).unwrap()
}

fn multipart_request(parts: &[(&str, &[u8])]) -> Request {
    let mut body = Vec::new();
    for (filename, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n")
                .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn dir_entry_count(dir: &std::path::Path) -> usize {
    let mut entries = tokio::fs::read_dir(dir).await.unwrap();
    let mut count = 0;
    while entries.next_entry().await.unwrap().is_some() {
        count += 1;
    }
    count
}

#[tokio::test]
async fn allowed_upload_with_rename_persists_file() {
    let root = tempfile::tempdir().unwrap();
    let upload_dir = root.path().join("uploads");

    let toolkit = toolkit(ToolkitConfig {
        allowed_content_types: vec!["image/jpeg".to_string(), "image/png".to_string()],
        ..Default::default()
    });

    let files = toolkit
        .upload_files(multipart_request(&[("cat.jpg", JPEG_BYTES)]), &upload_dir, true)
        .await
        .unwrap();

    assert_eq!(files.len(), 1);
    let record = &files[0];
    assert_eq!(record.original_name, "cat.jpg");
    assert_ne!(record.new_name, record.original_name);
    assert!(record.new_name.ends_with(".jpg"));
    assert_eq!(record.new_name.len(), 25 + ".jpg".len());
    assert_eq!(record.size_bytes, JPEG_BYTES.len() as u64);

    let on_disk = tokio::fs::read(upload_dir.join(&record.new_name))
        .await
        .unwrap();
    assert_eq!(on_disk, JPEG_BYTES);
}

#[tokio::test]
async fn upload_without_rename_keeps_original_name() {
    let root = tempfile::tempdir().unwrap();
    let upload_dir = root.path().join("uploads");

    let toolkit = toolkit(ToolkitConfig {
        allowed_content_types: vec!["image/jpeg".to_string()],
        ..Default::default()
    });

    let files = toolkit
        .upload_files(
            multipart_request(&[("cat.jpg", JPEG_BYTES)]),
            &upload_dir,
            false,
        )
        .await
        .unwrap();

    assert_eq!(files[0].new_name, "cat.jpg");
    assert!(upload_dir.join("cat.jpg").exists());
}

#[tokio::test]
async fn rejected_type_fails_fast_and_persists_nothing() {
    let root = tempfile::tempdir().unwrap();
    let upload_dir = root.path().join("uploads");

    let toolkit = toolkit(ToolkitConfig {
        allowed_content_types: vec!["image/png".to_string()],
        ..Default::default()
    });

    let err = toolkit
        .upload_files(multipart_request(&[("cat.jpg", JPEG_BYTES)]), &upload_dir, true)
        .await
        .unwrap_err();

    match &err.kind {
        UploadErrorKind::UnsupportedType { detected } => assert_eq!(detected, "image/jpeg"),
        other => panic!("expected UnsupportedType, got {other:?}"),
    }
    assert!(err.completed.is_empty());
    assert_eq!(dir_entry_count(&upload_dir).await, 0);
}

#[tokio::test]
async fn failing_part_reports_partial_progress() {
    let root = tempfile::tempdir().unwrap();
    let upload_dir = root.path().join("uploads");

    let toolkit = toolkit(ToolkitConfig {
        allowed_content_types: vec!["image/png".to_string()],
        ..Default::default()
    });

    let err = toolkit
        .upload_files(
            multipart_request(&[("a.png", PNG_BYTES), ("b.jpg", JPEG_BYTES)]),
            &upload_dir,
            true,
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err.kind,
        UploadErrorKind::UnsupportedType { .. }
    ));
    assert_eq!(err.completed.len(), 1);
    assert_eq!(err.completed[0].original_name, "a.png");
    assert!(upload_dir.join(&err.completed[0].new_name).exists());
    assert_eq!(dir_entry_count(&upload_dir).await, 1);
}

#[tokio::test]
async fn oversized_body_fails_before_any_work() {
    let root = tempfile::tempdir().unwrap();
    let upload_dir = root.path().join("uploads");

    let toolkit = toolkit(ToolkitConfig {
        max_upload_bytes: 64,
        ..Default::default()
    });

    let big = vec![0xFF; 512];
    let err = toolkit
        .upload_files(multipart_request(&[("big.bin", &big)]), &upload_dir, true)
        .await
        .unwrap_err();

    assert!(matches!(err.kind, UploadErrorKind::TooLarge));
    assert!(err.completed.is_empty());
    assert!(!upload_dir.exists());
}

#[tokio::test]
async fn renaming_gives_batch_unique_names() {
    let root = tempfile::tempdir().unwrap();
    let upload_dir = root.path().join("uploads");

    let toolkit = toolkit(ToolkitConfig::default());

    let files = toolkit
        .upload_files(
            multipart_request(&[("same.jpg", JPEG_BYTES), ("same.jpg", JPEG_BYTES)]),
            &upload_dir,
            true,
        )
        .await
        .unwrap();

    assert_eq!(files.len(), 2);
    assert_ne!(files[0].new_name, files[1].new_name);
    assert!(upload_dir.join(&files[0].new_name).exists());
    assert!(upload_dir.join(&files[1].new_name).exists());
}

#[tokio::test]
async fn upload_file_returns_the_single_record() {
    let root = tempfile::tempdir().unwrap();
    let upload_dir = root.path().join("uploads");

    let toolkit = toolkit(ToolkitConfig::default());

    let record = toolkit
        .upload_file(multipart_request(&[("cat.jpg", JPEG_BYTES)]), &upload_dir, true)
        .await
        .unwrap();

    assert_eq!(record.original_name, "cat.jpg");
    assert!(upload_dir.join(&record.new_name).exists());
}

#[tokio::test]
async fn upload_file_without_a_file_part_is_an_error() {
    let root = tempfile::tempdir().unwrap();
    let upload_dir = root.path().join("uploads");

    let toolkit = toolkit(ToolkitConfig::default());

    let err = toolkit
        .upload_file(multipart_request(&[]), &upload_dir, true)
        .await
        .unwrap_err();

    assert!(matches!(err.kind, UploadErrorKind::Multipart(_)));
}
