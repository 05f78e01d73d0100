//! Output naming conventions.
//!
//! Deterministic names for output directories, per-job labels, and
//! downloaded image files.

use std::path::PathBuf;

use chrono::{DateTime, Local};

/// Timestamp stamp used in output directory names, e.g. `2026-08-30-142501`.
pub fn dir_stamp(now: DateTime<Local>) -> String {
    now.format("%Y-%m-%d-%H%M%S").to_string()
}

/// Default output directory: `tmp/beauty-generation-<stamp>` under the
/// current working directory.
pub fn default_output_dir(now: DateTime<Local>) -> PathBuf {
    PathBuf::from("tmp").join(format!("beauty-generation-{}", dir_stamp(now)))
}

/// Name for job number `index` (zero-based) in a batch, e.g. `random-2`.
pub fn batch_job_name(mode_label: &str, index: usize) -> String {
    format!("{}-{}", mode_label, index + 1)
}

/// File name for image `index` (zero-based) of a job, e.g.
/// `standard-1-2.webp`.
pub fn image_file_name(job_name: &str, index: usize, format: &str) -> String {
    format!("{}-{}.{}", job_name, index + 1, format)
}
