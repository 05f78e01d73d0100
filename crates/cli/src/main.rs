//! `beautygen` -- command-line client for the Beauty Generation API.
//!
//! Submits generation jobs (standard, random, custom-prompt, or
//! preset-based), waits for completion, downloads the resulting images,
//! and writes a `generation_metadata.json` manifest next to them.
//!
//! # Environment variables
//!
//! | Variable                  | Required | Default                           |
//! |---------------------------|----------|-----------------------------------|
//! | `BEAUTY_API_BASE`         | no       | `https://gen1.diversityfaces.org` |
//! | `BEAUTY_API_KEY`          | yes*     | --                                |
//! | `REQUEST_TIMEOUT_SECS`    | no       | `30`                              |
//! | `GENERATION_TIMEOUT_SECS` | no       | `300`                             |
//!
//! *May instead be passed via `--api-key`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgGroup, Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use beautygen_cli::config::ClientConfig;
use beautygen_client::runner::{run_job, JobOptions};
use beautygen_client::GenerationApi;
use beautygen_core::manifest::{self, ManifestEntry, MANIFEST_FILENAME};
use beautygen_core::naming;
use beautygen_core::poll::PollConfig;
use beautygen_core::preset;
use beautygen_core::request::{
    GenerationMode, GenerationRequest, StyleParams, FIXED_SAMPLING_STEPS,
};

/// Requested download format for generated images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ImageFormat {
    Webp,
    Png,
    Jpeg,
}

impl ImageFormat {
    fn as_str(self) -> &'static str {
        match self {
            ImageFormat::Webp => "webp",
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "beautygen",
    about = "Generate AI portraits using the Beauty Generation API",
    group = ArgGroup::new("mode").multiple(false)
)]
struct Args {
    /// Standard generation with explicit parameters.
    #[arg(long, group = "mode")]
    standard: bool,

    /// Random generation (server picks the style).
    #[arg(long, group = "mode")]
    random: bool,

    /// Custom generation from a full prompt.
    #[arg(long, group = "mode", value_name = "PROMPT")]
    custom: Option<String>,

    /// Use a predefined style preset (see --list-presets).
    #[arg(long, group = "mode", value_name = "NAME")]
    preset: Option<String>,

    // Style attributes. Any of these set on top of --preset override the
    // preset's value for that field.
    #[arg(long)]
    style: Option<String>,
    #[arg(long)]
    age: Option<String>,
    #[arg(long)]
    nationality: Option<String>,
    #[arg(long)]
    clothing: Option<String>,
    #[arg(long)]
    clothing_color: Option<String>,
    #[arg(long)]
    scene: Option<String>,
    #[arg(long)]
    mood: Option<String>,
    #[arg(long)]
    hair_style: Option<String>,
    #[arg(long)]
    hair_color: Option<String>,
    #[arg(long)]
    skin_tone: Option<String>,
    #[arg(long)]
    accessories: Option<String>,

    /// Image width in pixels.
    #[arg(long, default_value_t = 1024)]
    width: u32,

    /// Image height in pixels.
    #[arg(long, default_value_t = 1024)]
    height: u32,

    /// Random seed; -1 lets the server choose.
    #[arg(long, default_value_t = -1, allow_hyphen_values = true)]
    seed: i64,

    /// Output directory (default: timestamped directory under ./tmp).
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Image download format.
    #[arg(long, value_enum, default_value_t = ImageFormat::Webp)]
    format: ImageFormat,

    /// Number of images to generate.
    #[arg(long, default_value_t = 1)]
    count: u32,

    /// API base URL (overrides BEAUTY_API_BASE).
    #[arg(long)]
    api_base: Option<String>,

    /// API key (overrides BEAUTY_API_KEY).
    #[arg(long)]
    api_key: Option<String>,

    /// Per-job generation timeout in seconds
    /// (overrides GENERATION_TIMEOUT_SECS; default 300).
    #[arg(long)]
    timeout: Option<u64>,

    /// List the built-in style presets and exit.
    #[arg(long)]
    list_presets: bool,

    /// Fetch and print the server's parameter categories and exit.
    #[arg(long)]
    show_params: bool,

    /// Print the resolved parameters without generating.
    #[arg(long)]
    dry_run: bool,
}

impl Args {
    fn mode(&self) -> Option<GenerationMode> {
        if self.standard {
            Some(GenerationMode::Standard)
        } else if self.random {
            Some(GenerationMode::Random)
        } else if self.custom.is_some() {
            Some(GenerationMode::Custom)
        } else {
            self.preset.clone().map(GenerationMode::Preset)
        }
    }

    fn style_params(&self) -> StyleParams {
        StyleParams {
            style: self.style.clone(),
            age: self.age.clone(),
            nationality: self.nationality.clone(),
            clothing: self.clothing.clone(),
            clothing_color: self.clothing_color.clone(),
            scene: self.scene.clone(),
            mood: self.mood.clone(),
            hair_style: self.hair_style.clone(),
            hair_color: self.hair_color.clone(),
            skin_tone: self.skin_tone.clone(),
            accessories: self.accessories.clone(),
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "beautygen=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    if args.list_presets {
        list_presets();
        return;
    }

    let config = ClientConfig::from_env();
    let api_base = args
        .api_base
        .clone()
        .unwrap_or_else(|| config.api_base.clone());
    let api_key = args.api_key.clone().or_else(|| config.api_key.clone());

    if args.show_params {
        show_params(&api_base, api_key, config.request_timeout_secs).await;
        return;
    }

    let Some(mode) = args.mode() else {
        eprintln!("Error: one of --standard, --random, --custom, or --preset is required");
        std::process::exit(2);
    };

    let request = GenerationRequest {
        mode,
        prompt: args.custom.clone(),
        style: args.style_params(),
        width: args.width,
        height: args.height,
        seed: args.seed,
    };

    if args.dry_run {
        dry_run(&request);
        return;
    }

    let Some(api_key) = api_key else {
        eprintln!(
            "Error: API key required. Set BEAUTY_API_KEY or pass --api-key"
        );
        std::process::exit(1);
    };

    let api = match GenerationApi::new(
        &api_base,
        api_key,
        Duration::from_secs(config.request_timeout_secs),
    ) {
        Ok(api) => api,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build HTTP client");
            std::process::exit(1);
        }
    };

    let out_dir = args
        .out_dir
        .clone()
        .unwrap_or_else(|| naming::default_output_dir(chrono::Local::now()));
    if let Err(e) = tokio::fs::create_dir_all(&out_dir).await {
        tracing::error!(dir = %out_dir.display(), error = %e, "Failed to create output directory");
        std::process::exit(1);
    }

    tracing::info!(
        api_base = %api.base_url(),
        out_dir = %out_dir.display(),
        count = args.count,
        "Starting generation batch",
    );

    // Jobs run strictly sequentially; a failed job is logged and
    // skipped, the batch continues.
    let mut entries: Vec<ManifestEntry> = Vec::new();
    let label = request.mode.label();

    for index in 0..args.count as usize {
        let opts = JobOptions {
            name: naming::batch_job_name(&label, index),
            out_dir: out_dir.clone(),
            format: args.format.as_str().to_string(),
            max_wait: Duration::from_secs(
                args.timeout.unwrap_or(config.generation_timeout_secs),
            ),
            poll: PollConfig::default(),
        };

        match run_job(&api, &request, &opts).await {
            Ok(result) => {
                for entry in &result.manifest {
                    println!("Saved: {}", entry.file);
                }
                entries.extend(result.manifest);
            }
            Err(e) => {
                tracing::error!(job = %opts.name, error = %e, "Job failed, continuing batch");
            }
        }
    }

    if entries.is_empty() {
        eprintln!("No images were generated.");
        std::process::exit(1);
    }

    let manifest_path = out_dir.join(MANIFEST_FILENAME);
    match manifest::to_json(&entries) {
        Ok(text) => {
            if let Err(e) = tokio::fs::write(&manifest_path, text).await {
                tracing::error!(path = %manifest_path.display(), error = %e, "Failed to write manifest");
                std::process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize manifest");
            std::process::exit(1);
        }
    }

    println!(
        "\nGenerated {} images in: {}",
        entries.len(),
        out_dir.display()
    );
    println!("Metadata saved to: {MANIFEST_FILENAME}");
}

fn list_presets() {
    println!("Available style presets:");
    for (name, params) in preset::builtin_presets() {
        println!("  {name}:");
        if let Ok(serde_json::Value::Object(map)) = serde_json::to_value(&params) {
            for (key, value) in map {
                if let Some(value) = value.as_str() {
                    println!("    {key}: {value}");
                }
            }
        }
        println!();
    }
}

async fn show_params(api_base: &str, api_key: Option<String>, timeout_secs: u64) {
    let Some(api_key) = api_key else {
        eprintln!("Error: API key required. Set BEAUTY_API_KEY or pass --api-key");
        std::process::exit(1);
    };

    let api = match GenerationApi::new(api_base, api_key, Duration::from_secs(timeout_secs)) {
        Ok(api) => api,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build HTTP client");
            std::process::exit(1);
        }
    };

    match api.get_presets().await {
        Ok(categories) => {
            println!("Available parameters:");
            for (category, values) in categories {
                if let Some(values) = values.as_array() {
                    let names: Vec<&str> =
                        values.iter().filter_map(|v| v.as_str()).take(10).collect();
                    let suffix = if values.len() > 10 { "..." } else { "" };
                    println!("  {category}: {}{suffix}", names.join(", "));
                }
            }
        }
        Err(e) => {
            eprintln!("Failed to fetch parameters: {e}");
            std::process::exit(1);
        }
    }
}

fn dry_run(request: &GenerationRequest) {
    match request.body() {
        Ok(body) => {
            println!("{} generation parameters:", request.mode.label());
            if let serde_json::Value::Object(map) = &body {
                for (key, value) in map {
                    println!("  {key}: {value}");
                }
            }
            println!("Fixed steps: {FIXED_SAMPLING_STEPS} (server-side)");
        }
        Err(e) => {
            eprintln!("Invalid request: {e}");
            std::process::exit(2);
        }
    }
}
