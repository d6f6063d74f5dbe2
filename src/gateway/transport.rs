use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors reported by a completion transport
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    #[error("No API key configured")]
    MissingApiKey,

    #[error("Service returned HTTP {status}: {message}")]
    Status {
        status: u16,
        /// Machine-readable reason from the service error body, e.g. `API_KEY_INVALID`
        reason: Option<String>,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Could not decode service response: {0}")]
    Decode(String),
}

/// Retrieval capability attached to a request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Grounding {
    WebSearch,
    Maps { latitude: f64, longitude: f64 },
}

/// One `generateContent` call, independent of the wire format
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub system_instruction: Option<String>,
    /// When set, the response is constrained to JSON matching this schema
    pub response_schema: Option<Value>,
    pub grounding: Option<Grounding>,
}

impl GenerateRequest {
    pub fn new(model: &str, prompt: &str) -> Self {
        Self {
            model: model.to_string(),
            prompt: prompt.to_string(),
            system_instruction: None,
            response_schema: None,
            grounding: None,
        }
    }

    pub fn with_system_instruction(mut self, instruction: String) -> Self {
        self.system_instruction = Some(instruction);
        self
    }

    pub fn with_response_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    pub fn with_grounding(mut self, grounding: Grounding) -> Self {
        self.grounding = Some(grounding);
        self
    }
}

/// Citation attached by the service to a grounded answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub uri: String,
    pub title: String,
}

/// Parsed service answer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateResponse {
    /// Concatenated text parts of the first candidate, `None` when there were none
    pub text: Option<String>,
    pub sources: Vec<SourceRef>,
}

impl GenerateResponse {
    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            sources: Vec::new(),
        }
    }
}

/// A single request/response round trip to the completion service
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, TransportError>;

    fn name(&self) -> &'static str;
}
