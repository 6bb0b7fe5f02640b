//! Model Endpoint Abstraction
//!
//! The driver talks to a language model through the [`ChatClient`] trait:
//! one request carries the conversation so far plus the tool definitions, one
//! response carries the assistant's next message, which may contain tool
//! calls.
//!
//! ```text
//! ToolDriver → ChatClient → [OpenAiClient, ScriptedClient]
//! ```

pub mod openai;
pub mod retry;
pub mod scripted;

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Author of a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions set by the driver
    System,
    /// State updates and nudges from the driver
    User,
    /// The model
    Assistant,
    /// Result of a tool call
    Tool,
}

/// A tool invocation requested by the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Endpoint-assigned identifier, echoed back in the result message
    pub id: String,
    /// Name of the requested tool
    pub name: String,
    /// Raw JSON arguments as produced by the model
    pub arguments: String,
}

impl ToolCall {
    /// Create a tool call
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// One message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author
    pub role: Role,
    /// Text content (absent for pure tool-call turns)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Tool calls requested by an assistant message
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// Call this message answers (tool messages only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    /// System instruction
    pub fn system(content: impl Into<String>) -> Self {
        Self::text(Role::System, content)
    }

    /// User message
    pub fn user(content: impl Into<String>) -> Self {
        Self::text(Role::User, content)
    }

    /// Assistant message with optional text and tool calls
    pub fn assistant(content: Option<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content,
            tool_calls,
            tool_call_id: None,
        }
    }

    /// Result of the tool call `tool_call_id`
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }
}

/// A callable action advertised to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Name the model uses to call the tool
    pub name: String,
    /// What the tool does
    pub description: String,
    /// JSON Schema of the arguments object
    pub parameters: serde_json::Value,
}

/// Everything the endpoint needs for one turn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    /// Conversation so far
    pub messages: Vec<ChatMessage>,
    /// Tools the model may call
    pub tools: Vec<ToolDefinition>,
    /// Sampling temperature
    pub temperature: f64,
}

/// The model's reply to one request
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    /// Assistant message (text and/or tool calls)
    pub message: ChatMessage,
    /// Token usage for cost calculation
    pub tokens: TokenUsage,
    /// API call latency
    pub latency: Duration,
}

/// Token usage breakdown for cost calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Input/prompt tokens
    pub input: usize,
    /// Output/completion tokens
    pub output: usize,
}

impl TokenUsage {
    /// Create new token usage
    pub fn new(input: usize, output: usize) -> Self {
        Self { input, output }
    }

    /// Total tokens (input + output)
    pub fn total(&self) -> usize {
        self.input + self.output
    }
}

impl std::ops::AddAssign for TokenUsage {
    fn add_assign(&mut self, rhs: Self) {
        self.input += rhs.input;
        self.output += rhs.output;
    }
}

/// Cost per 1K tokens (input, output) in USD
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenCost {
    /// Cost per 1K input tokens
    pub input_per_1k: f64,
    /// Cost per 1K output tokens
    pub output_per_1k: f64,
}

impl TokenCost {
    /// Create new token cost
    pub fn new(input_per_1k: f64, output_per_1k: f64) -> Self {
        Self {
            input_per_1k,
            output_per_1k,
        }
    }

    /// Calculate cost for given token usage
    pub fn calculate(&self, usage: TokenUsage) -> f64 {
        (usage.input as f64 * self.input_per_1k / 1000.0)
            + (usage.output as f64 * self.output_per_1k / 1000.0)
    }
}

/// Errors that can occur while calling the model endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum LlmError {
    /// No API credential was configured
    MissingCredential {
        /// Environment variable that was expected
        variable: String,
    },
    /// Rate limited by the API (429)
    RateLimited {
        /// Suggested retry delay from Retry-After header
        retry_after: Option<Duration>,
    },
    /// Request timed out
    Timeout,
    /// Network connectivity issue
    NetworkError(String),
    /// API returned an error response
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },
    /// Response could not be parsed
    InvalidResponse(String),
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmError::MissingCredential { variable } => {
                write!(f, "{} environment variable not set", variable)
            }
            LlmError::RateLimited { retry_after } => {
                if let Some(d) = retry_after {
                    write!(f, "Rate limited, retry after {:?}", d)
                } else {
                    write!(f, "Rate limited")
                }
            }
            LlmError::Timeout => write!(f, "Request timed out"),
            LlmError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            LlmError::ApiError { status, message } => {
                write!(f, "API error {}: {}", status, message)
            }
            LlmError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    /// Check if this error is retryable
    ///
    /// Retryable: RateLimited, Timeout, NetworkError, 5xx ApiErrors.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::RateLimited { .. } => true,
            LlmError::Timeout => true,
            LlmError::NetworkError(_) => true,
            LlmError::ApiError { status, .. } => *status >= 500 || *status == 429,
            LlmError::MissingCredential { .. } | LlmError::InvalidResponse(_) => false,
        }
    }
}

/// Boxed future returned by [`ChatClient::chat`]
pub type ChatFuture<'a> = Pin<Box<dyn Future<Output = Result<ChatResponse, LlmError>> + Send + 'a>>;

/// A model endpoint that supports tool calling
///
/// Object-safe through explicit boxing of the async return type, so the
/// driver can hold a `Box<dyn ChatClient>`.
pub trait ChatClient: Send + Sync {
    /// Send the conversation and tool list, get the next assistant message
    fn chat<'a>(&'a self, request: &'a ChatRequest) -> ChatFuture<'a>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;

    /// Get cost per 1K tokens (input, output)
    fn cost_per_1k_tokens(&self) -> TokenCost;
}
