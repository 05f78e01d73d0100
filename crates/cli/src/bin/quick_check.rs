//! `quick-check` -- one-shot smoke test against a live deployment.
//!
//! Submits a single random generation, times the generation and
//! download phases separately, and writes a `quick_test_results.json`
//! report next to the downloaded images.  Intended as a fast sanity
//! check that the API, the key, and the image pipeline all work.

use std::time::Duration;

use anyhow::{bail, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use beautygen_cli::config::ClientConfig;
use beautygen_client::GenerationApi;
use beautygen_core::naming;
use beautygen_core::poll::PollConfig;
use beautygen_core::request::{GenerationMode, GenerationRequest};

/// Tighter-than-default timeout; a healthy deployment answers fast.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Upper bound on the whole generation phase.
const MAX_WAIT: Duration = Duration::from_secs(60);

const RESULTS_FILENAME: &str = "quick_test_results.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quick_check=info,beautygen_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env();
    let Some(api_key) = config.api_key else {
        bail!("API key required: set BEAUTY_API_KEY");
    };

    let api = GenerationApi::new(&config.api_base, api_key, REQUEST_TIMEOUT)
        .context("failed to build HTTP client")?;

    let out_dir = naming::default_output_dir(chrono::Local::now());
    tokio::fs::create_dir_all(&out_dir)
        .await
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    println!("Quick generation test");
    println!("  API:    {}", api.base_url());
    println!("  Output: {}", out_dir.display());

    let request = GenerationRequest::new(GenerationMode::Random);
    let started = tokio::time::Instant::now();

    // Generation phase: submit and poll to completion.
    let job = api.submit(&request).await.context("submission failed")?;
    println!("  Job:    {}", job.prompt_id);

    let finished = api
        .wait_for_completion(&job.prompt_id, MAX_WAIT, &PollConfig::default())
        .await
        .context("generation did not complete")?;
    let generation_time = started.elapsed().as_secs_f64();
    println!(
        "  Generated {} image(s) in {generation_time:.1}s",
        finished.images.len()
    );

    // Download phase, timed separately.
    let download_started = tokio::time::Instant::now();
    let mut files = Vec::with_capacity(finished.images.len());
    for (index, image) in finished.images.iter().enumerate() {
        let file_name = naming::image_file_name("quick-test", index, "webp");
        let dest = out_dir.join(&file_name);
        let downloaded = api
            .fetch_image(image, &dest, "webp")
            .await
            .with_context(|| format!("download of {} failed", image.filename))?;
        println!("  Saved {file_name} ({} bytes)", downloaded.bytes);
        files.push(serde_json::json!({
            "file": file_name,
            "path": downloaded.path,
            "size": downloaded.bytes,
        }));
    }
    let download_time = download_started.elapsed().as_secs_f64();
    let total_time = started.elapsed().as_secs_f64();

    let report = serde_json::json!({
        "timestamp": chrono::Local::now().to_rfc3339(),
        "total_time": total_time,
        "generation_time": generation_time,
        "download_time": download_time,
        "files": files,
        "generation_type": "random",
        "params": request.body()?,
        "generated_prompt": job.prompt,
        "success": true,
    });
    let report_path = out_dir.join(RESULTS_FILENAME);
    tokio::fs::write(&report_path, serde_json::to_string_pretty(&report)?)
        .await
        .with_context(|| format!("failed to write {}", report_path.display()))?;

    println!("  Report: {}", report_path.display());
    println!("OK: total {total_time:.1}s (generation {generation_time:.1}s, download {download_time:.1}s)");
    Ok(())
}
