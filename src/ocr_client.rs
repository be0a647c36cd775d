use crate::api_contracts::{ErrorBody, OcrResultResponse, ServiceStatusResponse, UploadResponse};
use crate::debug_logger::DebugLogger;
use crate::error::ApiError;
use crate::types::{SourceFile, SubmissionTask};
use async_trait::async_trait;
use std::sync::Arc;

/// The two remote operations the upload workflow is built from
#[async_trait]
pub trait OcrApi: Send + Sync {
    /// Upload a document and return the task the server created for it
    async fn upload(&self, file: SourceFile) -> Result<SubmissionTask, ApiError>;

    /// Fetch the extracted text for a task (single request, no retry)
    async fn fetch_result(&self, task_id: &str) -> Result<String, ApiError>;
}

/// HTTP client for the Smart OCR service
pub struct OcrServiceClient {
    base_url: String,
    client: reqwest::Client,
    logger: Option<Arc<DebugLogger>>,
}

impl OcrServiceClient {
    /// Create a new client without diagnostic logging
    pub fn new(base_url: String) -> Self {
        Self::with_logger(base_url, None)
    }

    /// Create a new client with an optional logger
    pub fn with_logger(base_url: String, logger: Option<Arc<DebugLogger>>) -> Self {
        // No client-wide timeout: each workflow phase carries its own deadline
        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("SmartOcrClient/{}", version);

        let client = reqwest::Client::builder()
            .user_agent(&user_agent)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self::with_client(base_url, client, logger)
    }

    /// Wrap an already configured reqwest client (proxies, TLS, transport timeouts)
    pub fn with_client(
        base_url: String,
        client: reqwest::Client,
        logger: Option<Arc<DebugLogger>>,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            logger,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn upload_url(&self) -> String {
        format!("{}/api/v1/upload/", self.base_url)
    }

    fn result_url(&self, task_id: &str) -> Result<reqwest::Url, ApiError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;

        // Task ids are opaque; push them as a path segment so they get percent-encoded
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["api", "v1", "result", task_id, ""]);

        Ok(url)
    }

    fn debug(&self, message: String) {
        if let Some(ref logger) = self.logger {
            logger.debug(message);
        }
    }

    /// Fetch the liveness message served at the root route
    pub async fn service_status(&self) -> Result<String, ApiError> {
        let url = format!("{}/", self.base_url);
        self.debug(format!("Checking service status at: {}", url));

        let response = self.client.get(&url).send().await?;
        let data: ServiceStatusResponse = read_json(response).await?;
        Ok(data.message)
    }
}

/// Read a response body, turning non-2xx statuses into `ApiError::Rejected`
async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        let error = ErrorBody::parse(&body)?;
        return Err(ApiError::Rejected {
            status: status.as_u16(),
            message: error.message(),
        });
    }

    Ok(serde_json::from_slice(&body)?)
}

#[async_trait]
impl OcrApi for OcrServiceClient {
    async fn upload(&self, file: SourceFile) -> Result<SubmissionTask, ApiError> {
        let url = self.upload_url();
        self.debug(format!(
            "Uploading {} ({} bytes, {}) to: {}",
            file.filename,
            file.contents.len(),
            file.mime_type,
            url
        ));

        let filename = file.filename;
        let part = reqwest::multipart::Part::bytes(file.contents)
            .file_name(filename.clone())
            .mime_str(&file.mime_type)?;

        let form = reqwest::multipart::Form::new()
            .part("file", part);

        let response = self.client
            .post(&url)
            .multipart(form)
            .send()
            .await?;

        let data: UploadResponse = read_json(response).await?;
        let task_id = data.task_id.ok_or(ApiError::MissingField("task_id"))?;

        self.debug(format!("Upload accepted, task id: {}", task_id));

        Ok(SubmissionTask { task_id, filename })
    }

    async fn fetch_result(&self, task_id: &str) -> Result<String, ApiError> {
        let url = self.result_url(task_id)?;
        self.debug(format!("Fetching OCR result from: {}", url));

        let response = self.client
            .get(url)
            .send()
            .await?;

        let data: OcrResultResponse = read_json(response).await?;
        data.ocr_text.ok_or(ApiError::MissingField("ocr_text"))
    }
}
