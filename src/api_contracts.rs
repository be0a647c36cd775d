/**
 * API Contract Types for the Smart OCR client
 *
 * These types define the JSON bodies exchanged with the OCR service
 * (FastAPI backend under `/api/v1`).
 *
 * Principles:
 * - Fields the server may omit are `Option<T>` so a malformed body is
 *   reported as a missing field instead of a parse failure
 * - Unknown fields are ignored
 */

use serde::{Deserialize, Serialize};

// =============================================================================
// Upload Endpoint
// =============================================================================

/// Response from POST /api/v1/upload/
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UploadResponse {
    pub task_id: Option<String>,
    pub message: Option<String>,     // e.g. "File uploaded successfully"
}

// =============================================================================
// Result Endpoint
// =============================================================================

/// Response from GET /api/v1/result/{task_id}/
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct OcrResultResponse {
    pub ocr_text: Option<String>,   // May be empty when nothing was recognized
}

// =============================================================================
// Errors and Service Status
// =============================================================================

/// Body of a non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ErrorBody {
    pub error: Option<String>,
}

pub const UNKNOWN_ERROR: &str = "Unknown error";

impl ErrorBody {
    /// Parse an error body, keeping `error` only when it is a string.
    ///
    /// Bodies that are valid JSON but not shaped like `{"error": "..."}`
    /// (FastAPI's `{"detail": ...}`, arrays, `{"error": 42}`) fall back to
    /// an empty `ErrorBody`. Bodies that are not JSON at all are an error.
    pub fn parse(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_slice(bytes)?;
        let error = value
            .get("error")
            .and_then(|e| e.as_str())
            .map(String::from);
        Ok(Self { error })
    }

    /// The server-supplied message, or the generic fallback
    pub fn message(&self) -> String {
        self.error
            .clone()
            .unwrap_or_else(|| UNKNOWN_ERROR.to_string())
    }
}

/// Response from GET / (liveness message)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceStatusResponse {
    pub message: String,
}

// =============================================================================
// Tests
// =============================================================================
