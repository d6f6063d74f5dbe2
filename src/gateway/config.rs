use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_ANALYST_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_GROUNDING_MODEL: &str = "gemini-2.5-flash";

/// Configuration for the AI gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gemini API key. Absence is only reported when the first call is made.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Model used for structured SQL translation
    pub analyst_model: String,

    /// Model used for web and map grounded searches (grounding needs the 2.5 series)
    pub grounding_model: String,

    /// Base URL of the generative language API
    pub api_base: String,

    /// Request timeout in seconds. `None` leaves the HTTP client default in place.
    pub timeout_secs: Option<u64>,

    /// Enable debug logging of request and response sizes
    pub debug: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            analyst_model: DEFAULT_ANALYST_MODEL.to_string(),
            grounding_model: DEFAULT_GROUNDING_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: None,
            debug: false,
        }
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables, reading `.env` first if present
    pub fn from_env() -> Self {
        let _ = dotenv::dotenv();
        Self::from_env_internal()
    }

    /// Load configuration from a specific dotenv file plus the process environment
    pub fn from_env_file(path: &Path) -> Result<Self, String> {
        dotenv::from_path(path)
            .map_err(|e| format!("Failed to load env file {}: {}", path.display(), e))?;
        Ok(Self::from_env_internal())
    }

    fn from_env_internal() -> Self {
        let mut config = Self::default();

        config.api_key = env::var("GEMINI_API_KEY")
            .ok()
            .or_else(|| env::var("API_KEY").ok())
            .filter(|key| !key.trim().is_empty());

        if let Ok(model) = env::var("ESTATEMIND_ANALYST_MODEL") {
            config.analyst_model = model;
        }

        if let Ok(model) = env::var("ESTATEMIND_GROUNDING_MODEL") {
            config.grounding_model = model;
        }

        if let Ok(api_base) = env::var("GEMINI_API_BASE") {
            config.api_base = api_base.trim_end_matches('/').to_string();
        }

        if let Ok(timeout) = env::var("ESTATEMIND_REQUEST_TIMEOUT") {
            if let Ok(timeout_secs) = timeout.parse::<u64>() {
                config.timeout_secs = Some(timeout_secs);
            }
        }

        if let Ok(debug) = env::var("ESTATEMIND_DEBUG") {
            config.debug = debug.to_lowercase() == "true" || debug == "1";
        }

        config
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Validate the configuration. The API key is deliberately not checked here.
    pub fn validate(&self) -> Result<(), String> {
        if self.analyst_model.trim().is_empty() {
            return Err("Analyst model name is empty".to_string());
        }

        if self.grounding_model.trim().is_empty() {
            return Err("Grounding model name is empty".to_string());
        }

        if !(self.api_base.starts_with("https://") || self.api_base.starts_with("http://")) {
            return Err(format!("API base must be an http(s) URL, got '{}'", self.api_base));
        }

        if self.timeout_secs == Some(0) {
            return Err("Timeout must be greater than 0 seconds".to_string());
        }

        if !self.grounding_model.to_lowercase().contains("gemini-2.5")
            && !self.grounding_model.to_lowercase().contains("gemini-3")
        {
            tracing::warn!(
                "Grounding model '{}' may not support search or maps grounding",
                self.grounding_model
            );
        }

        Ok(())
    }
}
