//! Client-facing job and result types.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::Serialize;

use beautygen_core::manifest::ManifestEntry;

use crate::status::ImageRef;

/// One server-side generation job.
///
/// The `prompt_id` is assigned by the server at submission and never
/// changes; `status` reflects the most recent report and only moves
/// forward (the polling loop returns on the first terminal status).
#[derive(Debug, Clone)]
pub struct GenerationJob {
    pub prompt_id: String,
    pub status: String,
    pub message: Option<String>,
    /// Prompt text the server built for this job, when reported.
    pub prompt: Option<String>,
    /// Populated once the job completes.
    pub images: Vec<ImageRef>,
}

/// An image fetched to local disk.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadedImage {
    pub path: PathBuf,
    pub bytes: u64,
    pub source: ImageRef,
}

/// Outcome of one job run end to end: the terminal job state, every
/// downloaded image, manifest entries for the caller's metadata file,
/// and timing.
#[derive(Debug)]
pub struct GenerationResult {
    pub job: GenerationJob,
    pub images: Vec<DownloadedImage>,
    pub manifest: Vec<ManifestEntry>,
    pub submitted_at: DateTime<Local>,
    pub completed_at: DateTime<Local>,
    pub elapsed_secs: f64,
}
