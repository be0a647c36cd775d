//! Integration test harness for a mock OCR service
//!
//! This module provides utilities for running the client and the full
//! upload workflow against a mockito server instead of a real backend.

use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::json;

pub const UPLOAD_PATH: &str = "/api/v1/upload/";

pub fn result_path(task_id: &str) -> String {
    format!("/api/v1/result/{}/", task_id)
}

/// A test harness that sets up a mock OCR service
pub struct TestHarness {
    pub server: ServerGuard,
}

impl TestHarness {
    /// Create a new test harness with a mock server
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        Self { server }
    }

    /// Get the mock server URL
    pub fn url(&self) -> String {
        self.server.url()
    }

    /// Mock a successful multipart upload returning `task_id`
    pub async fn mock_upload_success(&mut self, task_id: &str) -> Mock {
        self.server.mock("POST", UPLOAD_PATH)
            .match_header("content-type", Matcher::Regex(r"^multipart/form-data; boundary=.+".to_string()))
            .match_body(Matcher::Regex(r#"name="file""#.to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({
                "message": "File uploaded successfully",
                "task_id": task_id
            }).to_string())
            .expect(1)
            .create_async()
            .await
    }

    /// Mock the upload endpoint with an arbitrary status and JSON body
    pub async fn mock_upload_response(&mut self, status: usize, body: serde_json::Value) -> Mock {
        self.server.mock("POST", UPLOAD_PATH)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(1)
            .create_async()
            .await
    }

    /// Mock the result endpoint for `task_id`
    pub async fn mock_result_success(&mut self, task_id: &str, text: &str) -> Mock {
        self.server.mock("GET", result_path(task_id).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "ocr_text": text }).to_string())
            .expect(1)
            .create_async()
            .await
    }

    /// Mock the result endpoint with an arbitrary status and JSON body
    pub async fn mock_result_response(
        &mut self,
        task_id: &str,
        status: usize,
        body: serde_json::Value,
    ) -> Mock {
        self.server.mock("GET", result_path(task_id).as_str())
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(1)
            .create_async()
            .await
    }

    /// Mock any result request that must never arrive
    pub async fn mock_result_never_called(&mut self) -> Mock {
        self.server.mock("GET", Matcher::Regex(r"^/api/v1/result/".to_string()))
            .expect(0)
            .create_async()
            .await
    }

    /// Mock the root liveness route
    pub async fn mock_service_status(&mut self, message: &str) -> Mock {
        self.server.mock("GET", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "message": message }).to_string())
            .create_async()
            .await
    }
}

/// Address that accepts connections and never answers
pub async fn silent_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    format!("http://{}", addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::ocr_client::{OcrApi, OcrServiceClient};
    use crate::orchestrator::{UploadOrchestrator, WorkflowTimings};
    use crate::status_sink::MemorySink;
    use crate::types::{OutcomeKind, Phase, SourceFile, WorkflowOutcome, STATUS_COMPLETED};
    use std::time::Duration;

    fn sample_file() -> SourceFile {
        SourceFile::new("scan.png", b"fake png content".to_vec())
    }

    /// Short waits so the workflow runs quickly against the mock server
    fn fast_timings() -> WorkflowTimings {
        WorkflowTimings {
            upload_timeout: Duration::from_secs(5),
            processing_delay: Duration::from_millis(10),
            result_timeout: Duration::from_secs(5),
        }
    }

    fn orchestrator(url: String, timings: WorkflowTimings) -> UploadOrchestrator<OcrServiceClient> {
        UploadOrchestrator::new(OcrServiceClient::new(url), timings)
    }

    #[tokio::test]
    async fn test_client_upload_with_mock_server() {
        let mut harness = TestHarness::new().await;
        let mock = harness.mock_upload_success("task-123").await;

        let client = OcrServiceClient::new(harness.url());
        let task = client.upload(sample_file()).await.unwrap();

        assert_eq!(task.task_id, "task-123");
        assert_eq!(task.filename, "scan.png");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_client_upload_sends_filename_and_content_type() {
        let mut harness = TestHarness::new().await;
        let mock = harness.server.mock("POST", UPLOAD_PATH)
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"filename="scan.png""#.to_string()),
                Matcher::Regex(r"(?i)content-type: image/png".to_string()),
                Matcher::Regex("fake png content".to_string()),
            ]))
            .with_status(200)
            .with_body(json!({ "task_id": "task-1" }).to_string())
            .create_async()
            .await;

        let client = OcrServiceClient::new(harness.url());
        assert!(client.upload(sample_file()).await.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_client_upload_rejected_with_error_field() {
        let mut harness = TestHarness::new().await;
        let _mock = harness
            .mock_upload_response(413, json!({ "error": "File too large" }))
            .await;

        let client = OcrServiceClient::new(harness.url());
        match client.upload(sample_file()).await {
            Err(ApiError::Rejected { status, message }) => {
                assert_eq!(status, 413);
                assert_eq!(message, "File too large");
            }
            other => panic!("Expected Rejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_client_fetch_result() {
        let mut harness = TestHarness::new().await;
        let _mock = harness.mock_result_success("task-123", "Invoice #42").await;

        let client = OcrServiceClient::new(harness.url());
        assert_eq!(client.fetch_result("task-123").await.unwrap(), "Invoice #42");
    }

    #[tokio::test]
    async fn test_client_service_status() {
        let mut harness = TestHarness::new().await;
        let _mock = harness.mock_service_status("Smart OCR Agent is live!").await;

        let client = OcrServiceClient::new(harness.url());
        assert_eq!(client.service_status().await.unwrap(), "Smart OCR Agent is live!");
    }

    #[tokio::test]
    async fn test_workflow_round_trip() {
        let mut harness = TestHarness::new().await;
        let upload = harness.mock_upload_success("abc123").await;
        let result = harness.mock_result_success("abc123", "Hello World").await;

        let sink = MemorySink::new();
        let outcome = orchestrator(harness.url(), fast_timings())
            .run(Some(sample_file()), &sink)
            .await;

        assert_eq!(outcome, WorkflowOutcome::Success { text: "Hello World".to_string() });
        upload.assert_async().await;
        result.assert_async().await;

        let display = sink.snapshot();
        assert_eq!(display.result, "Hello World");
        assert_eq!(display.status, STATUS_COMPLETED);
    }

    #[tokio::test]
    async fn test_workflow_upload_error_field_surfaced() {
        let mut harness = TestHarness::new().await;
        let _upload = harness
            .mock_upload_response(400, json!({ "error": "Unsupported file type" }))
            .await;
        let result = harness.mock_result_never_called().await;

        let sink = MemorySink::new();
        let outcome = orchestrator(harness.url(), fast_timings())
            .run(Some(sample_file()), &sink)
            .await;

        assert_eq!(
            outcome,
            WorkflowOutcome::UploadFailed { message: "Unsupported file type".to_string() }
        );
        assert_eq!(sink.snapshot().status, "❌ Upload failed: Unsupported file type");
        result.assert_async().await;
    }

    #[tokio::test]
    async fn test_workflow_upload_error_without_error_field() {
        let mut harness = TestHarness::new().await;
        let _upload = harness
            .mock_upload_response(500, json!({ "detail": "Internal Server Error" }))
            .await;

        let outcome = orchestrator(harness.url(), fast_timings())
            .run(Some(sample_file()), &MemorySink::new())
            .await;

        assert_eq!(
            outcome,
            WorkflowOutcome::UploadFailed { message: "Unknown error".to_string() }
        );
    }

    #[tokio::test]
    async fn test_workflow_upload_error_not_json() {
        let mut harness = TestHarness::new().await;
        let _upload = harness.server.mock("POST", UPLOAD_PATH)
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create_async()
            .await;

        let outcome = orchestrator(harness.url(), fast_timings())
            .run(Some(sample_file()), &MemorySink::new())
            .await;

        assert_eq!(outcome.kind(), OutcomeKind::Unexpected);
    }

    #[tokio::test]
    async fn test_workflow_missing_task_id() {
        let mut harness = TestHarness::new().await;
        let _upload = harness
            .mock_upload_response(200, json!({ "message": "File uploaded successfully" }))
            .await;
        let result = harness.mock_result_never_called().await;

        let outcome = orchestrator(harness.url(), fast_timings())
            .run(Some(sample_file()), &MemorySink::new())
            .await;

        assert_eq!(outcome.kind(), OutcomeKind::Unexpected);
        result.assert_async().await;
    }

    #[tokio::test]
    async fn test_workflow_result_error() {
        let mut harness = TestHarness::new().await;
        let _upload = harness.mock_upload_success("abc123").await;
        let _result = harness
            .mock_result_response("abc123", 404, json!({ "error": "Task not found" }))
            .await;

        let sink = MemorySink::new();
        let outcome = orchestrator(harness.url(), fast_timings())
            .run(Some(sample_file()), &sink)
            .await;

        assert_eq!(
            outcome,
            WorkflowOutcome::ResultFailed { message: "Task not found".to_string() }
        );
        assert_eq!(sink.snapshot().status, "❌ Failed to fetch OCR result: Task not found");
    }

    #[tokio::test]
    async fn test_workflow_missing_ocr_text() {
        let mut harness = TestHarness::new().await;
        let _upload = harness.mock_upload_success("abc123").await;
        let _result = harness
            .mock_result_response("abc123", 200, json!({ "status": "processing" }))
            .await;

        let sink = MemorySink::new();
        let outcome = orchestrator(harness.url(), fast_timings())
            .run(Some(sample_file()), &sink)
            .await;

        assert_eq!(outcome.kind(), OutcomeKind::Unexpected);
        assert_eq!(sink.snapshot().result, "");
    }

    #[tokio::test]
    async fn test_workflow_no_file_makes_no_requests() {
        let mut harness = TestHarness::new().await;
        let upload = harness.server.mock("POST", UPLOAD_PATH)
            .expect(0)
            .create_async()
            .await;
        let result = harness.mock_result_never_called().await;

        let outcome = orchestrator(harness.url(), fast_timings())
            .run(None, &MemorySink::new())
            .await;

        assert_eq!(outcome, WorkflowOutcome::NoFileSelected);
        upload.assert_async().await;
        result.assert_async().await;
    }

    #[tokio::test]
    async fn test_workflow_upload_timeout_against_silent_server() {
        let url = silent_server().await;
        let timings = WorkflowTimings {
            upload_timeout: Duration::from_millis(200),
            ..fast_timings()
        };

        let outcome = orchestrator(url, timings)
            .run(Some(sample_file()), &MemorySink::new())
            .await;

        assert_eq!(outcome, WorkflowOutcome::TimedOut { phase: Phase::Upload });
    }

    #[tokio::test]
    async fn test_transport_timeout_becomes_timed_out() {
        let url = silent_server().await;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();
        let client = OcrServiceClient::with_client(url, http, None);

        // The workflow deadline is far away, so the transport gives up first
        let err = client.upload(sample_file()).await.unwrap_err();
        assert!(err.is_timeout(), "expected transport timeout, got {:?}", err);

        let outcome = UploadOrchestrator::new(client, fast_timings())
            .run(Some(sample_file()), &MemorySink::new())
            .await;

        assert_eq!(outcome, WorkflowOutcome::TimedOut { phase: Phase::Upload });
    }

    #[tokio::test]
    async fn test_workflow_connection_refused_is_unexpected() {
        // Bind then drop to get a port nobody listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let outcome = orchestrator(url, fast_timings())
            .run(Some(sample_file()), &MemorySink::new())
            .await;

        assert_eq!(outcome.kind(), OutcomeKind::Unexpected);
    }
}
