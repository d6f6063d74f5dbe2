pub mod config;
pub mod gemini;
pub mod nearby;
pub mod prompts;
pub mod service;
pub mod transport;

pub use config::GatewayConfig;
pub use gemini::GeminiTransport;
pub use prompts::NearbyKind;
pub use service::{
    AiGateway, CredentialHook, GatewayError, GroundedSearch, LocationSearch, SearchStatus,
    SqlAnalysis, NO_RESULTS_TEXT, SEARCH_UNAVAILABLE_TEXT,
};
pub use transport::{CompletionTransport, GenerateRequest, GenerateResponse, Grounding, SourceRef, TransportError};
