use crate::gateway::config::GatewayConfig;
use crate::gateway::gemini::GeminiTransport;
use crate::gateway::prompts::{self, NearbyKind};
use crate::gateway::transport::{
    CompletionTransport, GenerateRequest, Grounding, SourceRef, TransportError,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Returned when a grounded search produced no text
pub const NO_RESULTS_TEXT: &str = "No results found.";

/// Returned when a grounded search could not reach the service
pub const SEARCH_UNAVAILABLE_TEXT: &str =
    "Search is unavailable right now. Please ensure your API key is configured correctly.";

/// Errors that can occur in the AI gateway
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API key was rejected (HTTP {status})")]
    Credential { status: u16 },

    #[error("Service unavailable (HTTP {status})")]
    ServiceUnavailable { status: u16 },

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl GatewayError {
    pub fn is_credential(&self) -> bool {
        matches!(self, GatewayError::Credential { .. })
    }
}

impl From<TransportError> for GatewayError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::MissingApiKey => GatewayError::Config(
                "No API key configured. Set GEMINI_API_KEY in the environment or .env file".to_string(),
            ),
            TransportError::Status { status, reason, message } => {
                if matches!(status, 401 | 403 | 404) || reason.as_deref() == Some("API_KEY_INVALID") {
                    GatewayError::Credential { status }
                } else if status >= 500 {
                    GatewayError::ServiceUnavailable { status }
                } else {
                    GatewayError::Api { status, message }
                }
            }
            TransportError::Network(message) => GatewayError::Network(message),
            TransportError::Decode(message) => GatewayError::MalformedResponse(message),
        }
    }
}

/// Callback fired whenever the service rejects the credential
pub type CredentialHook = Arc<dyn Fn(&GatewayError) + Send + Sync>;

/// Result of a natural language to SQL translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlAnalysis {
    #[serde(rename = "sql")]
    pub query: String,
    pub explanation: String,
}

/// How a grounded search ended
#[derive(Debug, Clone, PartialEq)]
pub enum SearchStatus {
    Answered,
    NoResults,
    Failed(GatewayError),
}

impl SearchStatus {
    pub fn is_answered(&self) -> bool {
        matches!(self, SearchStatus::Answered)
    }

    pub fn error(&self) -> Option<&GatewayError> {
        match self {
            SearchStatus::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// Prose answer plus citations from a web-grounded search
#[derive(Debug, Clone, PartialEq)]
pub struct GroundedSearch {
    pub text: String,
    pub sources: Vec<SourceRef>,
    pub status: SearchStatus,
}

/// Prose answer from a map-grounded search
#[derive(Debug, Clone, PartialEq)]
pub struct LocationSearch {
    pub text: String,
    pub status: SearchStatus,
}

/// Typed interface between the application and the completion service.
///
/// Every operation performs exactly one request. The gateway holds no
/// mutable state, so calls are independent of each other.
pub struct AiGateway {
    transport: Arc<dyn CompletionTransport>,
    analyst_model: String,
    grounding_model: String,
    on_credential_error: Option<CredentialHook>,
}

impl fmt::Debug for AiGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiGateway")
            .field("transport", &self.transport.name())
            .field("analyst_model", &self.analyst_model)
            .field("grounding_model", &self.grounding_model)
            .field("credential_hook", &self.on_credential_error.is_some())
            .finish()
    }
}

impl AiGateway {
    /// Create a gateway around an existing transport
    pub fn new(transport: Arc<dyn CompletionTransport>, config: &GatewayConfig) -> Self {
        Self {
            transport,
            analyst_model: config.analyst_model.clone(),
            grounding_model: config.grounding_model.clone(),
            on_credential_error: None,
        }
    }

    /// Create a gateway backed by the Gemini REST transport
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        config.validate().map_err(GatewayError::Config)?;
        let transport = GeminiTransport::new(config).map_err(|e| GatewayError::Config(e.to_string()))?;
        Ok(Self::new(Arc::new(transport), config))
    }

    /// Create a gateway from environment variables
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::from_config(&GatewayConfig::from_env())
    }

    /// Register a callback invoked on every credential failure
    pub fn with_credential_hook(mut self, hook: CredentialHook) -> Self {
        self.on_credential_error = Some(hook);
        self
    }

    async fn dispatch(&self, request: &GenerateRequest) -> Result<Option<String>, GatewayError> {
        match self.transport.generate(request).await {
            Ok(response) => Ok(response.text),
            Err(e) => Err(self.report(e.into())),
        }
    }

    fn report(&self, error: GatewayError) -> GatewayError {
        if error.is_credential() {
            if let Some(hook) = &self.on_credential_error {
                hook(&error);
            }
        }
        error
    }

    /// Translate a natural language question into SQL against the fixed schema.
    ///
    /// Failures propagate; the generated query is returned verbatim.
    pub async fn translate_to_query(&self, question: &str) -> Result<SqlAnalysis, GatewayError> {
        if question.trim().is_empty() {
            return Err(GatewayError::InvalidInput("Question is empty".to_string()));
        }

        let request = GenerateRequest::new(&self.analyst_model, question)
            .with_system_instruction(prompts::analyst_system_instruction())
            .with_response_schema(prompts::analyst_response_schema());

        let text = self.dispatch(&request).await.map_err(|e| {
            tracing::error!("SQL translation failed: {}", e);
            e
        })?;

        let body = strip_code_fences(text.as_deref().unwrap_or("{}"));
        serde_json::from_str::<SqlAnalysis>(body).map_err(|e| {
            tracing::error!("SQL translation returned malformed JSON: {}", e);
            GatewayError::MalformedResponse(e.to_string())
        })
    }

    /// Web-grounded search. Never fails: failures become the unavailable text.
    pub async fn search_grounded(&self, topic: &str, category: &str) -> GroundedSearch {
        let prompt = prompts::grounded_search_prompt(topic, category);
        let request = GenerateRequest::new(&self.grounding_model, &prompt)
            .with_grounding(Grounding::WebSearch);

        match self.transport.generate(&request).await {
            Ok(response) => match response.text.filter(|t| !t.trim().is_empty()) {
                Some(text) => GroundedSearch {
                    text,
                    sources: response.sources,
                    status: SearchStatus::Answered,
                },
                None => GroundedSearch {
                    text: NO_RESULTS_TEXT.to_string(),
                    sources: Vec::new(),
                    status: SearchStatus::NoResults,
                },
            },
            Err(e) => {
                let error = self.report(e.into());
                tracing::warn!("Grounded search failed: {}", error);
                GroundedSearch {
                    text: SEARCH_UNAVAILABLE_TEXT.to_string(),
                    sources: Vec::new(),
                    status: SearchStatus::Failed(error),
                }
            }
        }
    }

    /// Map-grounded search around a coordinate. Never fails.
    pub async fn search_grounded_by_location(
        &self,
        latitude: f64,
        longitude: f64,
        kind: NearbyKind,
    ) -> LocationSearch {
        if let Err(error) = validate_coordinates(latitude, longitude) {
            tracing::warn!("Location search rejected: {}", error);
            return LocationSearch {
                text: SEARCH_UNAVAILABLE_TEXT.to_string(),
                status: SearchStatus::Failed(error),
            };
        }

        let prompt = prompts::location_prompt(latitude, longitude, kind);
        let request = GenerateRequest::new(&self.grounding_model, &prompt)
            .with_grounding(Grounding::Maps { latitude, longitude });

        match self.dispatch(&request).await {
            Ok(Some(text)) if !text.trim().is_empty() => LocationSearch {
                text,
                status: SearchStatus::Answered,
            },
            Ok(_) => LocationSearch {
                text: NO_RESULTS_TEXT.to_string(),
                status: SearchStatus::NoResults,
            },
            Err(error) => {
                tracing::warn!("Location search failed: {}", error);
                LocationSearch {
                    text: SEARCH_UNAVAILABLE_TEXT.to_string(),
                    status: SearchStatus::Failed(error),
                }
            }
        }
    }
}

fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), GatewayError> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(GatewayError::InvalidInput(format!("Latitude {} out of range", latitude)));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(GatewayError::InvalidInput(format!("Longitude {} out of range", longitude)));
    }
    Ok(())
}

/// Remove a surrounding markdown code fence such as ```json ... ```
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
