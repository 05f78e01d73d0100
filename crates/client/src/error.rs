//! Error taxonomy for the generation client.

use beautygen_core::error::CoreError;

/// Errors from the Beauty Generation protocol client.
///
/// During polling, `Decode` and `Blocked` conditions are absorbed into
/// the retry loop as soft errors rather than surfaced; they appear here
/// for operations where they are terminal (e.g. downloads).
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request failed local validation before submission.
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] CoreError),

    /// HTTP 401 -- the API key was rejected.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// HTTP 429 -- too many requests.
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// Any other non-2xx API response.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Decoded response body for debugging.
        body: String,
    },

    /// The HTTP request itself failed (connection, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// No text-encoding candidate produced parseable data.
    #[error("Failed to decode response body")]
    Decode,

    /// The response was a CDN-protection challenge page.  Distinct from
    /// [`ClientError::Download`] so callers can retry later instead of
    /// treating it as a hard failure.
    #[error("Blocked by server protection: {0}")]
    Blocked(String),

    /// The server reported the generation job as failed.
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// The job did not reach a terminal state before the deadline.
    #[error("Generation timed out after {0} seconds")]
    Timeout(u64),

    /// An image download returned a non-2xx response.
    #[error("Image download failed ({status}): {message}")]
    Download {
        /// HTTP status code.
        status: u16,
        /// Truncated server message.
        message: String,
    },

    /// Writing a downloaded image to disk failed.
    #[error("Failed to write image to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
