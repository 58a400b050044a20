// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! OpenAI-compatible chat completions provider
//!
//! Sends each commit subject to `<base_url>/chat/completions` and returns the
//! model's one-sentence impact summary.

use std::fmt;

use async_trait::async_trait;
use chronicle_git::Commit;
use reqwest::Client;
use reqwest::header::RETRY_AFTER;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::AnalysisError;
use crate::provider::AnalysisProvider;

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Upper bound on tokens generated per commit
const MAX_TOKENS: u32 = 100;

/// Wait suggested when a 429 response carries no usable `retry-after`
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

const SYSTEM_PROMPT: &str = "You are a helpful assistant that analyzes git commits.";

/// Hosted model provider speaking the OpenAI chat completions protocol
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl OpenAiProvider {
    /// Create a provider for the default endpoint and model
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::Config` if the key is empty or the HTTP client
    /// cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self, AnalysisError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AnalysisError::Config("OpenAI API key is required".to_string()));
        }

        let client = Client::builder()
            .user_agent(concat!("chronicle/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AnalysisError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Use a different model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Use a different OpenAI-compatible endpoint
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// The configured model
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The configured endpoint
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn prompt(commit: &Commit) -> String {
        let mut prompt = format!(
            "Analyze this git commit and explain its impact on the codebase in one sentence. \
             Commit message: '{}'.",
            commit.message()
        );
        if let Some(stats) = commit.stats() {
            prompt.push_str(&format!(
                " It changed {} file(s) (+{} -{}): {}.",
                stats.files_changed(),
                stats.added(),
                stats.removed(),
                stats.files().join(", ")
            ));
        }
        prompt
    }

    fn request_body(&self, commit: &Commit) -> ChatRequest<'_> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: Self::prompt(commit),
                },
            ],
            max_tokens: MAX_TOKENS,
        }
    }
}

#[async_trait]
impl AnalysisProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn analyze(&self, commit: &Commit) -> Result<String, AnalysisError> {
        debug!(hash = commit.hash(), model = %self.model, "Requesting commit analysis");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.request_body(commit))
            .send()
            .await
            .map_err(|e| {
                error!(hash = commit.hash(), error = %e, "Chat completion request failed");
                AnalysisError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            let body = response.text().await.unwrap_or_default();
            error!(hash = commit.hash(), status = status.as_u16(), "Chat completion rejected");

            return Err(match status.as_u16() {
                401 | 403 => AnalysisError::Auth,
                429 => AnalysisError::RateLimited { retry_after },
                code => AnalysisError::Api {
                    status: code,
                    message: api_error_message(&body),
                },
            });
        }

        let completion: ChatResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(AnalysisError::EmptyResponse)
    }
}

/// Pull `error.message` out of an error body, falling back to the raw text
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}
