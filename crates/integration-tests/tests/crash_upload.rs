//! Crash Upload Integration Tests
//!
//! Dump location on real directory trees and multipart uploads against a local collector.

use std::path::PathBuf;
use std::sync::Arc;

use ssm_env_core::application::{CrashReportService, Supervisor};
use ssm_env_core::domain::{DumpUploadConfig, ExitOutcome, ProcessSpec};
use ssm_env_core::port::{CrashReportError, SupervisorError};
use ssm_env_infra_system::{locate_dump, DumpReporter, MultipartUploader};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// One-shot HTTP collector: captures the request, answers with `status`
async fn collector(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 8192];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            // End of a chunked body
            if request.ends_with(b"0\r\n\r\n") {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        String::from_utf8_lossy(&request).into_owned()
    });

    (url, handle)
}

fn uploader() -> MultipartUploader {
    MultipartUploader::with_client(reqwest::Client::builder().no_proxy().build().unwrap())
}

fn dump_tree() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let crash_dir = dir.path().join("crash");
    std::fs::create_dir_all(&crash_dir).unwrap();
    let dump = crash_dir.join("core.4242");
    std::fs::write(&dump, b"MINIDUMP-CONTENT").unwrap();
    (dir, dump)
}

#[tokio::test]
async fn test_locate_first_dump() {
    let (dir, dump) = dump_tree();

    assert_eq!(locate_dump(dir.path()).await.unwrap(), dump);
}

#[tokio::test]
async fn test_upload_accepted() {
    let (_dir, dump) = dump_tree();
    let (url, server) = collector("202 Accepted", "queued").await;

    let body = uploader()
        .send_file(
            "upload_file_minidump",
            &dump,
            &format!("{}/minidump?api_key=abc", url),
        )
        .await
        .unwrap();

    assert_eq!(body, "queued");
    let request = server.await.unwrap();
    assert!(request.starts_with("POST /minidump?api_key=abc HTTP/1.1"));
    assert!(request.contains("multipart/form-data; boundary="));
    assert!(request.contains("name=\"upload_file_minidump\"; filename=\"core.4242\""));
    assert!(request.contains("MINIDUMP-CONTENT"));
}

#[tokio::test]
async fn test_upload_rejected_status() {
    let (_dir, dump) = dump_tree();
    let (url, server) = collector("500 Internal Server Error", "boom").await;

    let result = uploader()
        .send_file("upload_file_minidump", &dump, &format!("{}/minidump", url))
        .await;

    match result {
        Err(CrashReportError::UnexpectedStatus { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected UnexpectedStatus, got {:?}", other),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn test_crashed_child_uploads_dump() {
    let (dir, _dump) = dump_tree();
    let (url, server) = collector("202 Accepted", "").await;
    let reports = CrashReportService::new(
        Arc::new(DumpReporter::new(uploader())),
        DumpUploadConfig {
            api_key: "abc".to_string(),
            dump_search_path: dir.path().to_path_buf(),
            collector_url: url,
        },
    );
    let supervisor =
        Supervisor::new(Arc::new(ssm_env_infra_system::TokioProcessLauncher::new()))
            .with_crash_reports(reports);

    let result = supervisor
        .run(ProcessSpec::new(
            "sh",
            vec!["-c".to_string(), "kill -ABRT $$".to_string()],
        ))
        .await;

    assert!(matches!(
        result,
        Err(SupervisorError::ChildExit(ExitOutcome::Signaled(6)))
    ));
    let request = server.await.unwrap();
    assert!(request.contains("MINIDUMP-CONTENT"));
}
