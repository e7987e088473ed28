//! Completion provider implementations.
//!
//! Both providers are request/response: submit one prompt, receive the raw
//! textual content. The search provider speaks the OpenAI-compatible chat
//! format (Perplexity); the conversational provider speaks Anthropic's
//! Messages format. Calls are never retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, error};
use wayfarer_core::{Error, Result};

use crate::config::ServiceConfig;
use crate::types::{ChatMessage, ServiceKind};

pub const PERPLEXITY_URL: &str = "https://api.perplexity.ai/chat/completions";
pub const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Sampling temperature for the search service.
pub const SEARCH_TEMPERATURE: f64 = 0.1;
/// Sampling temperature for the conversational service.
pub const CONVERSATIONAL_TEMPERATURE: f64 = 0.7;
pub const MAX_TOKENS: usize = 4000;

pub const RESEARCH_SYSTEM_PROMPT: &str = "You are a location research expert. \
Provide accurate, real-world information about locations, including exact coordinates \
and verified details. Format responses as JSON when requested.";

/// Submit a textual prompt, receive raw textual content.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Which service this client talks to, for logs and errors.
    fn service(&self) -> ServiceKind;
}

fn build_http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::Transport(format!("Failed to build HTTP client: {}", e)))
}

/// Send a prepared request and return the JSON body of a successful response.
async fn send_json(service: ServiceKind, request: reqwest::RequestBuilder) -> Result<Value> {
    let response = request
        .send()
        .await
        .map_err(|e| Error::Transport(format!("{} request failed: {}", service, e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        error!("{} API error {}: {}", service, status, body);
        return Err(Error::Transport(format!(
            "{} API error {}: {}",
            service, status, body
        )));
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| Error::Transport(format!("{} response unreadable: {}", service, e)))
}

// ---------------------------------------------------------------
// Search-augmented completion (OpenAI-compatible)
// ---------------------------------------------------------------

/// Search-augmented completion client (Perplexity).
#[derive(Clone)]
pub struct SearchCompletionClient {
    client: Client,
    url: String,
    model: String,
    api_key: String,
}

impl SearchCompletionClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            url: PERPLEXITY_URL.to_string(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let key = config.api_key(ServiceKind::Search)?;
        Self::new(key, config.search_model.clone(), config.timeout())
    }

    /// Point at a different OpenAI-compatible endpoint.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    fn request_body(&self, prompt: &str) -> Value {
        let messages = [ChatMessage::system(RESEARCH_SYSTEM_PROMPT), ChatMessage::user(prompt)];
        json!({
            "model": self.model,
            "messages": messages,
            "temperature": SEARCH_TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        })
    }
}

#[async_trait]
impl CompletionClient for SearchCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!("Sending prompt to {} with model {}", self.url, self.model);

        let request = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&self.request_body(prompt));

        let body = send_json(ServiceKind::Search, request).await?;
        let content = openai_content(&body)
            .ok_or_else(|| Error::Transport("No content in search response".into()))?;
        debug!("Search response content: {}", content);
        Ok(content)
    }

    fn service(&self) -> ServiceKind {
        ServiceKind::Search
    }
}

/// Pull `choices[0].message.content` out of an OpenAI-compatible response.
pub fn openai_content(body: &Value) -> Option<String> {
    body["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.to_string())
}

// ---------------------------------------------------------------
// Conversational completion (Anthropic Messages)
// ---------------------------------------------------------------

/// Conversational completion client (Anthropic).
#[derive(Clone)]
pub struct ConversationalClient {
    client: Client,
    url: String,
    model: String,
    api_key: String,
}

impl ConversationalClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            url: ANTHROPIC_URL.to_string(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let key = config.api_key(ServiceKind::Conversational)?;
        Self::new(key, config.conversational_model.clone(), config.timeout())
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    fn request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [ChatMessage::user(prompt)],
            "temperature": CONVERSATIONAL_TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        })
    }
}

#[async_trait]
impl CompletionClient for ConversationalClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!("Sending prompt to Anthropic with model {}", self.model);

        let request = self
            .client
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&self.request_body(prompt));

        let body = send_json(ServiceKind::Conversational, request).await?;
        let content = anthropic_content(&body)
            .ok_or_else(|| Error::Transport("No content in conversational response".into()))?;
        debug!("Conversational response content: {}", content);
        Ok(content)
    }

    fn service(&self) -> ServiceKind {
        ServiceKind::Conversational
    }
}

/// Concatenate the text blocks of an Anthropic Messages response.
pub fn anthropic_content(body: &Value) -> Option<String> {
    let blocks = body["content"].as_array()?;
    let text: String = blocks
        .iter()
        .filter(|b| b["type"].as_str() == Some("text"))
        .filter_map(|b| b["text"].as_str())
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_content() {
        let body = json!({
            "choices": [{"message": {"role": "assistant", "content": "```json\n{}\n```"}}]
        });
        assert_eq!(openai_content(&body).as_deref(), Some("```json\n{}\n```"));
        assert_eq!(openai_content(&json!({"choices": []})), None);
    }

    #[test]
    fn test_anthropic_content_joins_text_blocks() {
        let body = json!({
            "content": [
                {"type": "text", "text": "Here you go:\n"},
                {"type": "tool_use", "id": "x"},
                {"type": "text", "text": "```json\n{\"scores\": {}}\n```"}
            ]
        });
        assert_eq!(
            anthropic_content(&body).as_deref(),
            Some("Here you go:\n```json\n{\"scores\": {}}\n```")
        );
        assert_eq!(anthropic_content(&json!({"content": []})), None);
    }

    #[test]
    fn test_search_request_body() {
        let client =
            SearchCompletionClient::new("key", "sonar", Duration::from_secs(5)).unwrap();
        let body = client.request_body("List places");
        assert_eq!(body["model"], "sonar");
        assert_eq!(body["temperature"], SEARCH_TEMPERATURE);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "List places");
    }

    #[test]
    fn test_conversational_request_body() {
        let client =
            ConversationalClient::new("key", "claude", Duration::from_secs(5)).unwrap();
        let body = client.request_body("Rate it");
        assert_eq!(body["temperature"], CONVERSATIONAL_TEMPERATURE);
        assert_eq!(body["max_tokens"], MAX_TOKENS);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = ServiceConfig::default();
        assert!(matches!(
            SearchCompletionClient::from_config(&config),
            Err(Error::Config(_))
        ));
    }
    mod http {
        use super::*;
        use axum::http::{HeaderMap, StatusCode};
        use axum::routing::post;
        use axum::{Json, Router};

        /// Serve `router` on a local port and return its root URL.
        async fn spawn(router: Router) -> String {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, router).await.unwrap();
            });
            format!("http://{}/", addr)
        }

        fn search_client(url: &str) -> SearchCompletionClient {
            SearchCompletionClient::new("pplx-key", "sonar", Duration::from_secs(5))
                .unwrap()
                .with_url(url)
        }

        fn conversational_client(url: &str) -> ConversationalClient {
            ConversationalClient::new("sk-ant", "claude", Duration::from_secs(5))
                .unwrap()
                .with_url(url)
        }

        fn answering(body: Value) -> Router {
            Router::new().route("/", post(move || async move { Json(body) }))
        }

        #[tokio::test]
        async fn test_search_complete() {
            let router = Router::new().route(
                "/",
                post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                    assert_eq!(headers["authorization"], "Bearer pplx-key");
                    assert_eq!(body["model"], "sonar");
                    Json(json!({"choices": [{"message": {"content": "```json\n{}\n```"}}]}))
                }),
            );
            let url = spawn(router).await;

            let content = search_client(&url).complete("List places").await.unwrap();
            assert_eq!(content, "```json\n{}\n```");
        }

        #[tokio::test]
        async fn test_search_empty_completion_is_transport() {
            let url = spawn(answering(json!({"choices": []}))).await;
            match search_client(&url).complete("List places").await {
                Err(Error::Transport(message)) => {
                    assert_eq!(message, "No content in search response")
                }
                other => panic!("unexpected result: {other:?}"),
            }
        }

        #[tokio::test]
        async fn test_search_error_status_is_transport() {
            let router = Router::new().route(
                "/",
                post(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
            );
            let url = spawn(router).await;
            match search_client(&url).complete("List places").await {
                Err(Error::Transport(message)) => {
                    assert!(message.contains("429"));
                    assert!(message.contains("slow down"));
                }
                other => panic!("unexpected result: {other:?}"),
            }
        }

        #[tokio::test]
        async fn test_conversational_complete() {
            let router = Router::new().route(
                "/",
                post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                    assert_eq!(headers["x-api-key"], "sk-ant");
                    assert_eq!(headers["anthropic-version"], ANTHROPIC_VERSION);
                    assert_eq!(body["messages"][0]["content"], "Rate it");
                    Json(json!({"content": [
                        {"type": "text", "text": "Ratings:"},
                        {"type": "text", "text": " done"}
                    ]}))
                }),
            );
            let url = spawn(router).await;

            let content = conversational_client(&url).complete("Rate it").await.unwrap();
            assert_eq!(content, "Ratings: done");
        }

        #[tokio::test]
        async fn test_conversational_empty_completion_is_transport() {
            let url = spawn(answering(json!({"content": [{"type": "tool_use", "id": "x"}]}))).await;
            match conversational_client(&url).complete("Rate it").await {
                Err(Error::Transport(message)) => {
                    assert_eq!(message, "No content in conversational response")
                }
                other => panic!("unexpected result: {other:?}"),
            }
        }

        #[tokio::test]
        async fn test_conversational_error_status_is_transport() {
            let router = Router::new().route(
                "/",
                post(|| async { (StatusCode::UNAUTHORIZED, "invalid x-api-key") }),
            );
            let url = spawn(router).await;
            match conversational_client(&url).complete("Rate it").await {
                Err(Error::Transport(message)) => assert!(message.contains("401")),
                other => panic!("unexpected result: {other:?}"),
            }
        }
    }
}
