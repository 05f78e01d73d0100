//! Generation request model and wire-body construction.
//!
//! A [`GenerationRequest`] captures everything the caller controls: the
//! submission mode, optional free-text prompt, named style attributes,
//! and image parameters.  [`GenerationRequest::body`] turns it into the
//! flat JSON map the API expects, resolving preset defaults first.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::preset::{self, apply_preset};

/// Sampling step count enforced server-side.  It is documented here so
/// callers know the knob exists, but it is never transmitted -- the
/// server ignores client-supplied step counts.
pub const FIXED_SAMPLING_STEPS: u32 = 4;

/// Sentinel seed value meaning "let the server choose".
pub const SEED_SERVER_CHOICE: i64 = -1;

/// How a generation job is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationMode {
    /// Explicit style parameters, `/api/generate`.
    Standard,
    /// Server picks the style parameters, `/api/generate/random`.
    Random,
    /// Caller supplies the full prompt text, `/api/generate/custom`.
    Custom,
    /// A named built-in preset merged under caller overrides; submits
    /// through the standard endpoint.
    Preset(String),
}

impl GenerationMode {
    /// Short label used in output file names and logs
    /// (e.g. `standard`, `preset-modern-korean`).
    pub fn label(&self) -> String {
        match self {
            GenerationMode::Standard => "standard".to_string(),
            GenerationMode::Random => "random".to_string(),
            GenerationMode::Custom => "custom".to_string(),
            GenerationMode::Preset(name) => format!("preset-{name}"),
        }
    }
}

/// The eleven named style attributes understood by the API.
///
/// All fields are optional; absent fields are omitted from the wire
/// body entirely so the server applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clothing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clothing_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hair_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hair_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skin_tone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessories: Option<String>,
}

/// One generation job as requested by the caller.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub mode: GenerationMode,
    /// Free-text prompt; required for [`GenerationMode::Custom`].
    pub prompt: Option<String>,
    pub style: StyleParams,
    pub width: u32,
    pub height: u32,
    pub seed: i64,
}

impl GenerationRequest {
    /// Request with default image parameters (1024x1024, server seed).
    pub fn new(mode: GenerationMode) -> Self {
        Self {
            mode,
            prompt: None,
            style: StyleParams::default(),
            width: 1024,
            height: 1024,
            seed: SEED_SERVER_CHOICE,
        }
    }

    /// Validate caller-controlled fields before submission.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.width == 0 || self.height == 0 {
            return Err(CoreError::Validation(
                "Image width and height must be positive".to_string(),
            ));
        }
        if matches!(self.mode, GenerationMode::Custom)
            && self.prompt.as_deref().map_or(true, str::is_empty)
        {
            return Err(CoreError::Validation(
                "Custom mode requires a non-empty prompt".to_string(),
            ));
        }
        if let GenerationMode::Preset(name) = &self.mode {
            if preset::find_preset(name).is_none() {
                return Err(CoreError::UnknownPreset(name.clone()));
            }
        }
        Ok(())
    }

    /// Style attributes with preset defaults resolved.
    ///
    /// For preset mode this merges the named preset **under** the
    /// caller's explicit values; for every other mode it is the caller's
    /// values unchanged.
    pub fn resolved_style(&self) -> Result<StyleParams, CoreError> {
        match &self.mode {
            GenerationMode::Preset(name) => {
                let preset = preset::find_preset(name)
                    .ok_or_else(|| CoreError::UnknownPreset(name.clone()))?;
                Ok(apply_preset(&self.style, &preset))
            }
            _ => Ok(self.style.clone()),
        }
    }

    /// Build the flat JSON request body for submission.
    ///
    /// Always contains `width`, `height`, and `seed`; style attributes
    /// are added only when set (after preset resolution); custom mode
    /// additionally carries `full_prompt`.
    pub fn body(&self) -> Result<serde_json::Value, CoreError> {
        self.validate()?;

        let style = self.resolved_style()?;
        let mut body = match serde_json::to_value(&style) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };

        body.insert("width".to_string(), self.width.into());
        body.insert("height".to_string(), self.height.into());
        body.insert("seed".to_string(), self.seed.into());

        if matches!(self.mode, GenerationMode::Custom) {
            if let Some(prompt) = &self.prompt {
                body.insert("full_prompt".to_string(), prompt.clone().into());
            }
        }

        Ok(serde_json::Value::Object(body))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
