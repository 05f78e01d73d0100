//! Image download: URL assembly, opaque byte transfer, local write.

use std::path::Path;

use beautygen_core::decode;

use crate::api::{GenerationApi, API_KEY_HEADER};
use crate::error::ClientError;
use crate::job::DownloadedImage;
use crate::status::ImageRef;

/// Character budget for server messages embedded in download errors.
const ERROR_MESSAGE_MAX_CHARS: usize = 100;

impl GenerationApi {
    /// Download one generated image to `dest`.
    ///
    /// The URL is built from the base URL, the server-side filename, and
    /// the `format`/`subfolder`/`type` query parameters with empty
    /// values omitted.  Missing parent directories are created; the body
    /// is written as opaque bytes (image payloads are binary, never text
    /// decoded), and an existing file at `dest` is overwritten.
    pub async fn fetch_image(
        &self,
        image: &ImageRef,
        dest: &Path,
        format: &str,
    ) -> Result<DownloadedImage, ClientError> {
        let mut query: Vec<(&str, &str)> = Vec::with_capacity(3);
        if !format.is_empty() {
            query.push(("format", format));
        }
        if let Some(subfolder) = image.subfolder.as_deref() {
            if !subfolder.is_empty() {
                query.push(("subfolder", subfolder));
            }
        }
        if let Some(kind) = image.kind.as_deref() {
            if !kind.is_empty() {
                query.push(("type", kind));
            }
        }

        let response = self
            .http()
            .get(format!("{}/api/image/{}", self.base_url(), image.filename))
            .header(API_KEY_HEADER, self.api_key())
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if decode::looks_like_protection_page(&bytes) {
            tracing::warn!(filename = %image.filename, "Image download intercepted by protection page");
            return Err(ClientError::Blocked(
                "Image download blocked by server protection. Try again later.".to_string(),
            ));
        }
        if !status.is_success() {
            let message =
                decode::truncate_message(&decode::decode_text(&bytes), ERROR_MESSAGE_MAX_CHARS);
            return Err(ClientError::Download {
                status: status.as_u16(),
                message,
            });
        }

        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|source| ClientError::Write {
                        path: parent.display().to_string(),
                        source,
                    })?;
            }
        }
        tokio::fs::write(dest, &bytes)
            .await
            .map_err(|source| ClientError::Write {
                path: dest.display().to_string(),
                source,
            })?;

        tracing::info!(
            filename = %image.filename,
            path = %dest.display(),
            bytes = bytes.len(),
            "Image downloaded",
        );

        Ok(DownloadedImage {
            path: dest.to_path_buf(),
            bytes: bytes.len() as u64,
            source: image.clone(),
        })
    }
}
