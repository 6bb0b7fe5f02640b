//! Scripted Client
//!
//! A [`ChatClient`] that replays a fixed list of replies instead of calling a
//! model. It records every request it receives, so tests can assert on what
//! the driver sent as well as on what it did with the answers.

use crate::llm::{
    ChatClient, ChatFuture, ChatMessage, ChatRequest, ChatResponse, LlmError, TokenCost,
    TokenUsage, ToolCall,
};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Client that answers from a queue of prepared replies
///
/// Once the queue is empty every further request gets an assistant message
/// with neither text nor tool calls.
#[derive(Debug, Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<ChatMessage, LlmError>>>,
    requests: Mutex<Vec<ChatRequest>>,
    tokens_per_reply: TokenUsage,
}

impl ScriptedClient {
    /// Create a client with an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply with one tool call per `(name, arguments)` pair
    pub fn with_tool_calls(self, calls: &[(&str, &str)]) -> Self {
        let start = self.queued();
        let calls = calls
            .iter()
            .enumerate()
            .map(|(i, (name, args))| ToolCall::new(format!("call_{}_{}", start, i), *name, *args))
            .collect();
        self.with_reply(Ok(ChatMessage::assistant(None, calls)))
    }

    /// Queue a `move` call for each `(source, destination)` pair, one per reply
    pub fn with_moves(mut self, moves: &[(&str, &str)]) -> Self {
        for (source, destination) in moves {
            let args = serde_json::json!({"source": source, "destination": destination});
            self = self.with_tool_calls(&[("move", &args.to_string())]);
        }
        self
    }

    /// Queue a plain text reply
    pub fn with_text(self, text: &str) -> Self {
        self.with_reply(Ok(ChatMessage::assistant(Some(text.to_string()), Vec::new())))
    }

    /// Queue an endpoint failure
    pub fn with_error(self, error: LlmError) -> Self {
        self.with_reply(Err(error))
    }

    /// Report this usage for every reply
    pub fn with_tokens_per_reply(mut self, usage: TokenUsage) -> Self {
        self.tokens_per_reply = usage;
        self
    }

    /// Queue an arbitrary reply
    pub fn with_reply(self, reply: Result<ChatMessage, LlmError>) -> Self {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
        self
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Replies not yet consumed
    pub fn remaining(&self) -> usize {
        self.queued()
    }

    fn queued(&self) -> usize {
        self.replies.lock().map(|r| r.len()).unwrap_or(0)
    }
}

impl ChatClient for ScriptedClient {
    fn chat<'a>(&'a self, request: &'a ChatRequest) -> ChatFuture<'a> {
        Box::pin(async move {
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(request.clone());
            }

            let next = self
                .replies
                .lock()
                .ok()
                .and_then(|mut replies| replies.pop_front());

            let message = match next {
                Some(reply) => reply?,
                None => ChatMessage::assistant(None, Vec::new()),
            };

            Ok(ChatResponse {
                message,
                tokens: self.tokens_per_reply,
                latency: Duration::ZERO,
            })
        })
    }

    fn model_name(&self) -> &str {
        "scripted"
    }

    fn cost_per_1k_tokens(&self) -> TokenCost {
        TokenCost::new(0.0, 0.0)
    }
}
