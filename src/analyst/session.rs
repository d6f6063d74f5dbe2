use crate::analyst::templates::{find_template, AnalysisTemplate, TEMPLATES};
use crate::gateway::AiGateway;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

pub const GREETING: &str = "Hello! I'm your Real Estate SQL Analyst. Use the quick analysis templates \
    to perform complex property & agent optimizations, or ask me a custom question.";

pub const ERROR_REPLY: &str = "I encountered an error connecting to the analysis engine. \
    Please ensure your API Key is configured correctly.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Model,
}

/// One bubble in the analyst chat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlMessage {
    pub id: Uuid,
    pub role: MessageRole,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    #[serde(default)]
    pub is_error: bool,
    pub timestamp: DateTime<Utc>,
}

impl SqlMessage {
    fn new(role: MessageRole, text: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.to_string(),
            sql: None,
            is_error: false,
            timestamp: Utc::now(),
        }
    }

    pub fn user(text: &str) -> Self {
        Self::new(MessageRole::User, text)
    }

    pub fn model(text: &str) -> Self {
        Self::new(MessageRole::Model, text)
    }

    fn with_sql(mut self, sql: String) -> Self {
        self.sql = Some(sql);
        self
    }

    fn as_error(mut self) -> Self {
        self.is_error = true;
        self
    }
}

/// Chat history for the SQL analyst
pub struct AnalystSession {
    gateway: Arc<AiGateway>,
    messages: Vec<SqlMessage>,
}

impl AnalystSession {
    pub fn new(gateway: Arc<AiGateway>) -> Self {
        Self {
            gateway,
            messages: vec![SqlMessage::model(GREETING)],
        }
    }

    pub fn messages(&self) -> &[SqlMessage] {
        &self.messages
    }

    pub fn templates(&self) -> &'static [AnalysisTemplate] {
        TEMPLATES
    }

    /// Ask a question and append the exchange to the history.
    ///
    /// Blank input is ignored and returns `None`. Gateway failures become an
    /// error bubble rather than an `Err`.
    pub async fn ask(&mut self, text: &str) -> Option<&SqlMessage> {
        let question = text.trim();
        if question.is_empty() {
            return None;
        }

        self.messages.push(SqlMessage::user(question));

        let reply = match self.gateway.translate_to_query(question).await {
            Ok(analysis) => SqlMessage::model(&analysis.explanation).with_sql(analysis.query),
            Err(e) => {
                tracing::warn!("Analyst question failed: {}", e);
                SqlMessage::model(ERROR_REPLY).as_error()
            }
        };

        self.messages.push(reply);
        self.messages.last()
    }

    /// Run a quick analysis template by id
    pub async fn ask_template(&mut self, id: &str) -> Option<&SqlMessage> {
        let template = find_template(id)?;
        self.ask(template.query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{
        CompletionTransport, GatewayConfig, GenerateRequest, GenerateResponse, TransportError,
    };
    use async_trait::async_trait;

    struct CannedTransport(Result<GenerateResponse, TransportError>);

    #[async_trait]
    impl CompletionTransport for CannedTransport {
        async fn generate(&self, _request: &GenerateRequest) -> Result<GenerateResponse, TransportError> {
            self.0.clone()
        }

        fn name(&self) -> &'static str {
            "canned"
        }
    }

    fn session(reply: Result<GenerateResponse, TransportError>) -> AnalystSession {
        let gateway = AiGateway::new(Arc::new(CannedTransport(reply)), &GatewayConfig::default());
        AnalystSession::new(Arc::new(gateway))
    }

    #[test]
    fn test_new_session_starts_with_greeting() {
        let session = session(Ok(GenerateResponse::default()));
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].role, MessageRole::Model);
        assert_eq!(session.messages()[0].text, GREETING);
        assert_eq!(session.templates().len(), 9);
    }

    #[tokio::test]
    async fn test_ask_appends_user_and_model_turns() {
        let mut session = session(Ok(GenerateResponse::text(
            r#"{"sql":"SELECT * FROM Agents","explanation":"Lists every agent."}"#,
        )));

        let reply = session.ask("  show all agents ").await.unwrap();
        assert_eq!(reply.text, "Lists every agent.");
        assert_eq!(reply.sql.as_deref(), Some("SELECT * FROM Agents"));
        assert!(!reply.is_error);

        let messages = session.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, MessageRole::User);
        assert_eq!(messages[1].text, "show all agents");
    }

    #[tokio::test]
    async fn test_ask_failure_becomes_error_bubble() {
        let mut session = session(Err(TransportError::Network("connection refused".to_string())));

        let reply = session.ask("top agents").await.unwrap();
        assert!(reply.is_error);
        assert_eq!(reply.text, ERROR_REPLY);
        assert_eq!(reply.sql, None);
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let mut session = session(Ok(GenerateResponse::default()));

        assert!(session.ask("   ").await.is_none());
        assert_eq!(session.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_ask_template() {
        let mut session = session(Ok(GenerateResponse::text(r#"{"sql":"SELECT 1","explanation":"ok"}"#)));

        assert!(session.ask_template("nope").await.is_none());
        session.ask_template("i").await.unwrap();
        assert!(session.messages()[1].text.starts_with("Use EXISTS instead of IN"));
    }

    #[test]
    fn test_message_serialization() {
        let message = SqlMessage::model("hi").with_sql("SELECT 1".to_string());
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["role"], "model");
        assert_eq!(json["sql"], "SELECT 1");
        assert_eq!(json["is_error"], false);

        let plain = serde_json::to_value(SqlMessage::user("q")).unwrap();
        assert!(plain.get("sql").is_none());
    }
}
