//! Wire types for submission and status responses.

use beautygen_core::decode;
use serde::{Deserialize, Serialize};

/// Response from the three submission endpoints.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    /// Whether the server accepted the job.
    #[serde(default = "default_true")]
    pub success: bool,
    /// Server-assigned job identifier.
    #[serde(default)]
    pub prompt_id: Option<String>,
    /// The prompt text the server built (or echoed) for this job.
    #[serde(default)]
    pub prompt: Option<String>,
    /// Initial job status, when reported.
    #[serde(default)]
    pub status: Option<String>,
    /// Error description when `success` is false.
    #[serde(default)]
    pub error: Option<String>,
}

fn default_true() -> bool {
    true
}

/// One generated image as referenced by a completed status response.
///
/// The filename is a server-side opaque name; together with `subfolder`
/// and `kind` it locates the image for download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subfolder: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// One status response, after robust decoding.
///
/// Unusable responses (undecodable bytes, protection pages) are mapped
/// to a soft `error` status here so the polling loop owns the retry
/// policy; see [`StatusReport::from_bytes`].
#[derive(Debug, Clone, Deserialize)]
pub struct StatusReport {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    /// Present only when `status` is `completed`.
    #[serde(default)]
    pub images: Option<Vec<ImageRef>>,
}

impl StatusReport {
    /// A soft error report; retried by the polling loop.
    pub fn soft_error(message: impl Into<String>) -> Self {
        Self {
            status: beautygen_core::poll::STATUS_ERROR.to_string(),
            message: Some(message.into()),
            images: None,
        }
    }

    /// Decode a raw status body, degrading to a soft error instead of
    /// failing.
    ///
    /// Tries the ordered encoding fallback first; if nothing parses,
    /// distinguishes a protection page from a generally undecodable
    /// body in the report message.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if let Some(report) = decode::decode_json::<StatusReport>(bytes) {
            return report;
        }
        if decode::looks_like_protection_page(bytes) {
            StatusReport::soft_error("Server protection detected")
        } else {
            StatusReport::soft_error("Failed to decode status response")
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_report_carries_images() {
        let body = br#"{
            "status": "completed",
            "images": [
                {"filename": "img_001.png", "subfolder": "", "type": "output"},
                {"filename": "img_002.png"}
            ]
        }"#;
        let report = StatusReport::from_bytes(body);
        assert_eq!(report.status, "completed");
        let images = report.images.unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].filename, "img_001.png");
        assert_eq!(images[0].kind.as_deref(), Some("output"));
        assert!(images[1].subfolder.is_none());
    }

    #[test]
    fn protection_page_becomes_soft_error() {
        let report = StatusReport::from_bytes(b"<html><body>cloudflare says no</body></html>");
        assert_eq!(report.status, "error");
        assert_eq!(report.message.as_deref(), Some("Server protection detected"));
    }

    #[test]
    fn garbage_becomes_soft_error() {
        let report = StatusReport::from_bytes(b"\x00\xff\xfe not json");
        assert_eq!(report.status, "error");
        assert_eq!(
            report.message.as_deref(),
            Some("Failed to decode status response")
        );
    }

    #[test]
    fn submit_response_defaults_success_true() {
        let parsed: SubmitResponse =
            serde_json::from_str(r#"{"prompt_id": "abc", "prompt": "x"}"#).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.prompt_id.as_deref(), Some("abc"));
    }
}
