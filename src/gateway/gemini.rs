use crate::gateway::config::GatewayConfig;
use crate::gateway::transport::{
    CompletionTransport, GenerateRequest, GenerateResponse, Grounding, SourceRef, TransportError,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Completion transport speaking the Gemini `generateContent` REST format
pub struct GeminiTransport {
    client: Client,
    api_key: Option<String>,
    api_base: String,
    debug: bool,
}

impl GeminiTransport {
    pub fn new(config: &GatewayConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout_secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            debug: config.debug,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.api_base, model)
    }
}

/// Build the JSON request body for a `generateContent` call
pub fn request_body(request: &GenerateRequest) -> Value {
    let mut body = json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": request.prompt }]
        }]
    });

    if let Some(instruction) = &request.system_instruction {
        body["systemInstruction"] = json!({ "parts": [{ "text": instruction }] });
    }

    if let Some(schema) = &request.response_schema {
        body["generationConfig"] = json!({
            "responseMimeType": "application/json",
            "responseSchema": schema,
        });
    }

    match request.grounding {
        Some(Grounding::WebSearch) => {
            body["tools"] = json!([{ "googleSearch": {} }]);
        }
        Some(Grounding::Maps { latitude, longitude }) => {
            body["tools"] = json!([{ "googleMaps": {} }]);
            body["toolConfig"] = json!({
                "retrievalConfig": {
                    "latLng": { "latitude": latitude, "longitude": longitude }
                }
            });
        }
        None => {}
    }

    body
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    #[serde(default)]
    web: Option<ChunkSource>,
    #[serde(default)]
    maps: Option<ChunkSource>,
}

#[derive(Debug, Deserialize)]
struct ChunkSource {
    uri: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    reason: Option<String>,
}

/// Convert a decoded service body into a transport-neutral response
fn into_response(body: GeminiResponse) -> GenerateResponse {
    let Some(candidate) = body.candidates.into_iter().next() else {
        return GenerateResponse::default();
    };

    let text = candidate.content.and_then(|content| {
        let parts: Vec<String> = content.parts.into_iter().filter_map(|p| p.text).collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.concat())
        }
    });

    let sources = candidate
        .grounding_metadata
        .map(|metadata| {
            metadata
                .grounding_chunks
                .into_iter()
                .filter_map(|chunk| chunk.web.or(chunk.maps))
                .filter_map(|source| {
                    let uri = source.uri?;
                    let title = source.title.unwrap_or_else(|| uri.clone());
                    Some(SourceRef { uri, title })
                })
                .collect()
        })
        .unwrap_or_default();

    GenerateResponse { text, sources }
}

/// Map a non-success HTTP response body to a status error
fn status_error(status: u16, body: &str) -> TransportError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => {
            let reason = envelope
                .error
                .details
                .into_iter()
                .find_map(|detail| detail.reason)
                .or(envelope.error.status);
            TransportError::Status {
                status,
                reason,
                message: envelope.error.message,
            }
        }
        Err(_) => TransportError::Status {
            status,
            reason: None,
            message: body.trim().to_string(),
        },
    }
}

#[async_trait]
impl CompletionTransport for GeminiTransport {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, TransportError> {
        let api_key = self.api_key.as_deref().ok_or(TransportError::MissingApiKey)?;
        let body = request_body(request);

        if self.debug {
            tracing::debug!(
                "Sending request to Gemini: model={}, prompt_chars={}, grounding={:?}",
                request.model,
                request.prompt.len(),
                request.grounding
            );
        }

        let response = self
            .client
            .post(self.endpoint(&request.model))
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(status_error(status.as_u16(), &text));
        }

        let decoded: GeminiResponse =
            serde_json::from_str(&text).map_err(|e| TransportError::Decode(e.to_string()))?;
        let parsed = into_response(decoded);

        if self.debug {
            tracing::debug!(
                "Received response: {} chars, {} sources",
                parsed.text.as_ref().map(|t| t.len()).unwrap_or(0),
                parsed.sources.len()
            );
        }

        Ok(parsed)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport_for(server: &MockServer, api_key: Option<&str>) -> GeminiTransport {
        let mut config = GatewayConfig::default().with_api_base(server.uri());
        config.api_key = api_key.map(str::to_string);
        GeminiTransport::new(&config).unwrap()
    }

    #[test]
    fn test_request_body_structured() {
        let request = GenerateRequest::new("m", "How many condos?")
            .with_system_instruction("Be terse".to_string())
            .with_response_schema(json!({"type": "OBJECT"}));

        let body = request_body(&request);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "How many condos?");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be terse");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_request_body_maps_grounding() {
        let request = GenerateRequest::new("m", "nearby").with_grounding(Grounding::Maps {
            latitude: 12.97,
            longitude: 77.59,
        });

        let body = request_body(&request);
        assert!(body["tools"][0].get("googleMaps").is_some());
        assert_eq!(body["toolConfig"]["retrievalConfig"]["latLng"]["latitude"], 12.97);
        assert_eq!(body["toolConfig"]["retrievalConfig"]["latLng"]["longitude"], 77.59);
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_into_response_collects_web_and_maps_sources() {
        let body: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [{"text": "Hello "}, {"text": "world"}]},
                "groundingMetadata": {
                    "groundingChunks": [
                        {"web": {"uri": "https://a.example", "title": "A"}},
                        {"maps": {"uri": "https://maps.example/b"}},
                        {"web": {"title": "no uri"}}
                    ]
                }
            }]
        }))
        .unwrap();

        let response = into_response(body);
        assert_eq!(response.text.as_deref(), Some("Hello world"));
        assert_eq!(response.sources.len(), 2);
        assert_eq!(response.sources[0].title, "A");
        assert_eq!(response.sources[1].title, "https://maps.example/b");
    }

    #[test]
    fn test_into_response_without_candidates() {
        let body: GeminiResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(into_response(body), GenerateResponse::default());
    }

    #[test]
    fn test_status_error_reads_structured_reason() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT",
            "details":[{"@type":"type.googleapis.com/google.rpc.ErrorInfo","reason":"API_KEY_INVALID"}]}}"#;

        match status_error(400, body) {
            TransportError::Status { status, reason, message } => {
                assert_eq!(status, 400);
                assert_eq!(reason.as_deref(), Some("API_KEY_INVALID"));
                assert_eq!(message, "API key not valid.");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_status_error_plain_body() {
        match status_error(502, "Bad Gateway\n") {
            TransportError::Status { reason, message, .. } => {
                assert_eq!(reason, None);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_request() {
        let server = MockServer::start().await;
        let transport = transport_for(&server, None);

        let result = transport.generate(&GenerateRequest::new("m", "hi")).await;
        assert_eq!(result, Err(TransportError::MissingApiKey));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generate_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "secret"))
            .and(body_partial_json(json!({"tools": [{"googleSearch": {}}]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"parts": [{"text": "Three listings found."}]},
                    "groundingMetadata": {
                        "groundingChunks": [{"web": {"uri": "https://99acres.com/x", "title": "99acres"}}]
                    }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let transport = transport_for(&server, Some("secret"));
        let request = GenerateRequest::new("gemini-2.5-flash", "villas in Pune")
            .with_grounding(Grounding::WebSearch);

        let response = transport.generate(&request).await.unwrap();
        assert_eq!(response.text.as_deref(), Some("Three listings found."));
        assert_eq!(
            response.sources,
            vec![SourceRef {
                uri: "https://99acres.com/x".to_string(),
                title: "99acres".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_generate_not_found_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"code": 404, "message": "Requested entity was not found.", "status": "NOT_FOUND"}
            })))
            .mount(&server)
            .await;

        let transport = transport_for(&server, Some("secret"));
        let result = transport.generate(&GenerateRequest::new("m", "hi")).await;

        assert_eq!(
            result,
            Err(TransportError::Status {
                status: 404,
                reason: Some("NOT_FOUND".to_string()),
                message: "Requested entity was not found.".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_generate_undecodable_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let transport = transport_for(&server, Some("secret"));
        let result = transport.generate(&GenerateRequest::new("m", "hi")).await;
        assert!(matches!(result, Err(TransportError::Decode(_))));
    }
}
