//! Metadata manifest written alongside downloaded images.
//!
//! One JSON array, one entry per successfully downloaded image.

use serde::{Deserialize, Serialize};

/// File name of the manifest inside the output directory.
pub const MANIFEST_FILENAME: &str = "generation_metadata.json";

/// One downloaded image's metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManifestEntry {
    /// Job name, e.g. `standard-1` or `preset-modern-korean-2`.
    pub name: String,
    /// Local file name relative to the output directory.
    pub file: String,
    /// Prompt text the server reported for this generation.
    pub prompt: String,
    /// The submitted request body (flat parameter map).
    pub params: serde_json::Value,
    /// Server-side file name the image was downloaded from.
    pub original_filename: String,
}

/// Serialize manifest entries as a pretty-printed JSON array.
pub fn to_json(entries: &[ManifestEntry]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(entries)
}
