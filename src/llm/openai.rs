//! OpenAI Chat Completions Client
//!
//! Sends the conversation together with `tools` (`type: "function"`) and
//! `tool_choice: "auto"`, and maps the returned assistant message, including
//! any `tool_calls`, back onto [`ChatMessage`].
//!
//! Any OpenAI-compatible endpoint works through
//! [`OpenAiConfig::with_base_url`].
//!
//! # Example
//!
//! ```rust,ignore
//! let config = OpenAiConfig::from_env("gpt-4.1-mini")?;
//! let client = OpenAiClient::new(config)?;
//! ```

use crate::llm::{
    ChatClient, ChatFuture, ChatMessage, ChatRequest, ChatResponse, LlmError, Role, TokenCost,
    TokenUsage, ToolCall,
};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default OpenAI API URL
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

/// Environment variable holding the API key
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Environment variable overriding the base URL
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";

/// Connection settings for the OpenAI endpoint
#[derive(Clone)]
pub struct OpenAiConfig {
    /// API key sent as a bearer token
    pub api_key: String,
    /// Model name (e.g., "gpt-4.1-mini")
    pub model: String,
    /// Base URL without trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl OpenAiConfig {
    /// Create a config with an explicit API key
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: DEFAULT_OPENAI_URL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Read the API key (and optional base URL) from the environment
    pub fn from_env(model: &str) -> Result<Self, LlmError> {
        let api_key = env::var(API_KEY_VAR)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::MissingCredential {
                variable: API_KEY_VAR.to_string(),
            })?;

        let config = Self::new(&api_key, model);
        Ok(match env::var(BASE_URL_VAR) {
            Ok(url) if !url.trim().is_empty() => config.with_base_url(&url),
            _ => config,
        })
    }

    /// Set custom base URL (for proxies or compatible APIs)
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// OpenAI chat client with tool calling
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    base_url: String,
    model: String,
    timeout: Duration,
    /// HTTP client with auth headers
    client: Client,
    cost: TokenCost,
}

impl OpenAiClient {
    /// Build a client from a config
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .map_err(|e| LlmError::InvalidResponse(format!("Invalid API key format: {}", e)))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| LlmError::NetworkError(format!("Failed to create client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url,
            cost: Self::model_cost(&config.model),
            model: config.model,
            timeout: config.timeout,
            client,
        })
    }

    /// USD per 1K tokens by model family
    fn model_cost(model: &str) -> TokenCost {
        match model {
            m if m.starts_with("gpt-4.1-nano") => TokenCost::new(0.0001, 0.0004),
            m if m.starts_with("gpt-4.1-mini") => TokenCost::new(0.0004, 0.0016),
            m if m.starts_with("gpt-4.1") => TokenCost::new(0.002, 0.008),
            m if m.starts_with("gpt-4o-mini") => TokenCost::new(0.00015, 0.0006),
            m if m.starts_with("gpt-4o") => TokenCost::new(0.0025, 0.01),
            _ => TokenCost::new(0.001, 0.002),
        }
    }
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
    temperature: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type", default = "function_kind")]
    kind: String,
    function: WireFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Serialize)]
struct WireTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunction<'a>,
}

#[derive(Debug, Serialize)]
struct WireFunction<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: WireUsage,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Debug, Default, Deserialize)]
struct WireUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

fn function_kind() -> String {
    "function".to_string()
}

impl From<&ChatMessage> for WireMessage {
    fn from(msg: &ChatMessage) -> Self {
        let tool_calls = if msg.tool_calls.is_empty() {
            None
        } else {
            Some(
                msg.tool_calls
                    .iter()
                    .map(|call| WireToolCall {
                        id: call.id.clone(),
                        kind: function_kind(),
                        function: WireFunctionCall {
                            name: call.name.clone(),
                            arguments: call.arguments.clone(),
                        },
                    })
                    .collect(),
            )
        };

        Self {
            role: msg.role,
            content: msg.content.clone(),
            tool_calls,
            tool_call_id: msg.tool_call_id.clone(),
        }
    }
}

impl From<WireMessage> for ChatMessage {
    fn from(wire: WireMessage) -> Self {
        let tool_calls = wire
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ToolCall::new(call.id, call.function.name, call.function.arguments))
            .collect();

        ChatMessage::assistant(wire.content.filter(|c| !c.is_empty()), tool_calls)
    }
}

impl ChatClient for OpenAiClient {
    fn chat<'a>(&'a self, request: &'a ChatRequest) -> ChatFuture<'a> {
        Box::pin(async move {
            let start = Instant::now();

            let body = WireRequest {
                model: &self.model,
                messages: request.messages.iter().map(WireMessage::from).collect(),
                tools: request
                    .tools
                    .iter()
                    .map(|tool| WireTool {
                        kind: "function",
                        function: WireFunction {
                            name: &tool.name,
                            description: &tool.description,
                            parameters: &tool.parameters,
                        },
                    })
                    .collect(),
                tool_choice: if request.tools.is_empty() {
                    None
                } else {
                    Some("auto")
                },
                temperature: request.temperature,
            };

            let url = format!("{}/chat/completions", self.base_url);
            debug!(url = %url, messages = body.messages.len(), "Sending chat request");

            let response = self
                .client
                .post(&url)
                .json(&body)
                .timeout(self.timeout)
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        LlmError::Timeout
                    } else if e.is_connect() {
                        LlmError::NetworkError(format!("Connection failed: {}", e))
                    } else {
                        LlmError::NetworkError(e.to_string())
                    }
                })?;

            let status = response.status();

            if status.as_u16() == 429 {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .map(Duration::from_secs);

                return Err(LlmError::RateLimited { retry_after });
            }

            if !status.is_success() {
                let error_body: Result<ErrorResponse, _> = response.json().await;
                let message = error_body
                    .map(|e| e.error.message)
                    .unwrap_or_else(|_| "Unknown error".to_string());

                return Err(LlmError::ApiError {
                    status: status.as_u16(),
                    message,
                });
            }

            let wire: WireResponse = response.json().await.map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                }
            })?;

            let message = wire
                .choices
                .into_iter()
                .next()
                .map(|choice| ChatMessage::from(choice.message))
                .ok_or_else(|| LlmError::InvalidResponse("Response had no choices".to_string()))?;

            Ok(ChatResponse {
                message,
                tokens: TokenUsage::new(wire.usage.prompt_tokens, wire.usage.completion_tokens),
                latency: start.elapsed(),
            })
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn cost_per_1k_tokens(&self) -> TokenCost {
        self.cost
    }
}
