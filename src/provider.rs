//! Chat-completion provider transport.
//!
//! [`Provider`] is the seam between summarisation logic and the hosted model:
//! [`OpenAiProvider`] talks to an OpenAI-compatible HTTP API with reqwest,
//! tests substitute stubs that capture requests.

use crate::config::ProviderConfig;
use crate::credential::Credential;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// User-Agent string identifying this client
const USER_AGENT: &str = concat!("precis/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("provider returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ProviderError {
    /// HTTP status of the failure, if the provider answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ProviderError::Decode(error.to_string())
        } else {
            ProviderError::Transport(error.to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Body of a chat-completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// A response carrying a single completion, handy for stubs.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            choices: vec![Choice {
                message: ResponseMessage {
                    content: Some(content.into()),
                },
            }],
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// A hosted chat-completion service.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Cheap authenticated call used to check that a credential is accepted.
    async fn list_models(&self, credential: &Credential) -> Result<(), ProviderError>;

    /// Run one chat completion.
    async fn complete(
        &self,
        credential: &Credential,
        request: &ChatRequest,
    ) -> Result<ChatResponse, ProviderError>;
}

/// OpenAI-compatible HTTP provider.
pub struct OpenAiProvider {
    client: Client,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    async fn list_models(&self, credential: &Credential) -> Result<(), ProviderError> {
        info!(base_url = %self.base_url, "validating API key");
        let response = self
            .client
            .get(self.url("models"))
            .bearer_auth(credential.expose())
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn complete(
        &self,
        credential: &Credential,
        request: &ChatRequest,
    ) -> Result<ChatResponse, ProviderError> {
        info!(model = %request.model, messages = request.messages.len(), "requesting completion");
        let response = self
            .client
            .post(self.url("chat/completions"))
            .bearer_auth(credential.expose())
            .json(request)
            .send()
            .await?;
        let response = check_status(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

/// Turn a non-2xx response into [`ProviderError::Status`].
async fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), body = %body, "provider rejected request");
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown error").to_string());

    Err(ProviderError::Status {
        status: status.as_u16(),
        message,
    })
}
