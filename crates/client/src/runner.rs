//! End-to-end execution of one generation job:
//! submit -> wait -> download -> assemble the result.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use tokio::time::Instant;

use beautygen_core::manifest::ManifestEntry;
use beautygen_core::naming;
use beautygen_core::poll::PollConfig;
use beautygen_core::request::GenerationRequest;

use crate::api::GenerationApi;
use crate::error::ClientError;
use crate::job::GenerationResult;

/// Per-job run options.
#[derive(Debug, Clone)]
pub struct JobOptions {
    /// Job name used in file names and the manifest, e.g. `standard-1`.
    pub name: String,
    /// Directory downloaded images are written into.
    pub out_dir: PathBuf,
    /// Image format requested at download time (`webp`, `png`, `jpeg`).
    pub format: String,
    /// Overall deadline for the polling phase.
    pub max_wait: Duration,
    pub poll: PollConfig,
}

/// Run one job from submission to downloaded images.
///
/// Strictly sequential: the submit completes before polling starts, and
/// images are fetched one at a time.  Each [`crate::status::ImageRef`]
/// produces exactly one downloaded file and one manifest entry.  Errors
/// terminate this job only; batch callers decide whether to continue
/// with their remaining jobs.
pub async fn run_job(
    api: &GenerationApi,
    request: &GenerationRequest,
    opts: &JobOptions,
) -> Result<GenerationResult, ClientError> {
    let submitted_at = Local::now();
    let started = Instant::now();

    let job = api.submit(request).await?;
    tracing::info!(name = %opts.name, prompt_id = %job.prompt_id, "Job running");

    let mut finished = api
        .wait_for_completion(&job.prompt_id, opts.max_wait, &opts.poll)
        .await?;
    // Keep the prompt the submission reported; status responses do not
    // repeat it.
    finished.prompt = job.prompt.clone();

    let params = request.body()?;
    let mut images = Vec::with_capacity(finished.images.len());
    let mut manifest = Vec::with_capacity(finished.images.len());

    for (index, image) in finished.images.iter().enumerate() {
        let file_name = naming::image_file_name(&opts.name, index, &opts.format);
        let dest = opts.out_dir.join(&file_name);

        let downloaded = api.fetch_image(image, &dest, &opts.format).await?;
        manifest.push(ManifestEntry {
            name: opts.name.clone(),
            file: file_name,
            prompt: finished.prompt.clone().unwrap_or_default(),
            params: params.clone(),
            original_filename: image.filename.clone(),
        });
        images.push(downloaded);
    }

    let completed_at = Local::now();
    let elapsed_secs = started.elapsed().as_secs_f64();
    tracing::info!(
        name = %opts.name,
        images = images.len(),
        elapsed_secs = format!("{elapsed_secs:.1}"),
        "Job finished",
    );

    Ok(GenerationResult {
        job: finished,
        images,
        manifest,
        submitted_at,
        completed_at,
        elapsed_secs,
    })
}
