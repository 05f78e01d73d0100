//! Client configuration loaded from environment variables.

/// Default API base URL.
pub const DEFAULT_API_BASE: &str = "https://gen1.diversityfaces.org";

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default per-job generation timeout in seconds.
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 300;

/// Configuration for talking to a Beauty Generation deployment.
///
/// The API key deliberately has no default: it must come from the
/// environment or an explicit flag.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (default: [`DEFAULT_API_BASE`]).
    pub api_base: String,
    /// API key; `None` until supplied by the caller.
    pub api_key: Option<String>,
    /// Per-request HTTP timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Overall per-job generation timeout in seconds (default: `300`).
    pub generation_timeout_secs: u64,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                   | Required | Default                  |
    /// |---------------------------|----------|--------------------------|
    /// | `BEAUTY_API_BASE`         | no       | `DEFAULT_API_BASE`       |
    /// | `BEAUTY_API_KEY`          | yes      | --                       |
    /// | `REQUEST_TIMEOUT_SECS`    | no       | `30`                     |
    /// | `GENERATION_TIMEOUT_SECS` | no       | `300`                    |
    pub fn from_env() -> Self {
        let api_base =
            std::env::var("BEAUTY_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        let api_key = std::env::var("BEAUTY_API_KEY").ok().filter(|k| !k.is_empty());

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let generation_timeout_secs: u64 = std::env::var("GENERATION_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_GENERATION_TIMEOUT_SECS);

        Self {
            api_base,
            api_key,
            request_timeout_secs,
            generation_timeout_secs,
        }
    }
}
