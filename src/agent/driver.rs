//! Tool-Calling Driver
//!
//! Runs the turn loop between a [`ChatClient`] and a [`GameState`]:
//!
//! 1. Append a user message describing the towers
//! 2. Send the transcript plus the tool definitions to the model
//! 3. Execute every tool call in the reply, in order, appending one tool
//!    result per call
//! 4. Stop as soon as the target tower holds every disk, or when the turn
//!    budget is spent
//!
//! Illegal moves and malformed calls are answered in the transcript and the
//! loop goes on. Only an endpoint failure (after retries) ends a run early.

use crate::agent::config::DriverConfig;
use crate::agent::tools::{dispatch, tool_definitions, ToolOutcome, CHECK_SOLVED, GET_STATE, MOVE};
use crate::core::{GameState, MoveRecord, TowerId, TowerSnapshot};
use crate::events::{EventBus, HanoiEvent};
use crate::llm::retry::call_with_retry;
use crate::llm::{ChatClient, ChatMessage, ChatRequest, LlmError, TokenUsage};
use crate::render::describe_state;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    /// The target tower holds every disk
    Solved,
    /// Every disk ended up on the spare tower
    SolvedOnWrongTower {
        /// Tower holding the complete stack
        tower: TowerId,
    },
    /// The turn budget ran out first
    BudgetExhausted,
}

impl RunOutcome {
    /// Short snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            RunOutcome::Solved => "solved",
            RunOutcome::SolvedOnWrongTower { .. } => "solved_on_wrong_tower",
            RunOutcome::BudgetExhausted => "budget_exhausted",
        }
    }

    /// True only for [`RunOutcome::Solved`]
    pub fn is_solved(&self) -> bool {
        matches!(self, RunOutcome::Solved)
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Solved => write!(f, "solved"),
            RunOutcome::SolvedOnWrongTower { tower } => {
                write!(f, "all disks stacked on the wrong tower ({})", tower)
            }
            RunOutcome::BudgetExhausted => write!(f, "turn budget exhausted"),
        }
    }
}

/// Summary of one driver run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Model the endpoint client reported
    pub model: String,
    /// How the run ended
    pub outcome: RunOutcome,
    /// Round-trips made with the model
    pub turns: usize,
    /// Every move the model attempted
    pub moves: MoveRecord,
    /// Moves accepted during this run
    pub move_count: u64,
    /// Tool calls that were malformed
    pub invalid_calls: usize,
    /// Tokens reported by the endpoint
    pub usage: TokenUsage,
    /// Estimated cost in USD
    pub cost_usd: f64,
    /// Wall-clock time of the run
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    /// Towers when the run ended
    pub final_state: TowerSnapshot,
}

fn serialize_secs<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64())
}

/// Errors that end a run early
#[derive(Debug, Clone, PartialEq)]
pub enum DriverError {
    /// Source and target are the same tower
    InvalidConfiguration {
        /// What is wrong
        reason: String,
    },
    /// The model endpoint failed and retries were exhausted
    Endpoint(LlmError),
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::InvalidConfiguration { reason } => {
                write!(f, "Invalid driver configuration: {}", reason)
            }
            DriverError::Endpoint(err) => write!(f, "Model endpoint failed: {}", err),
        }
    }
}

impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DriverError::Endpoint(err) => Some(err),
            DriverError::InvalidConfiguration { .. } => None,
        }
    }
}

impl From<LlmError> for DriverError {
    fn from(err: LlmError) -> Self {
        DriverError::Endpoint(err)
    }
}

/// System instruction for an `n_disks` puzzle
pub fn system_prompt(n_disks: u32, source: TowerId, target: TowerId) -> String {
    format!(
        "You are an expert at solving the Tower of Hanoi puzzle.\n\
         Your task is to solve a {n}-disk Tower of Hanoi puzzle by moving every disk \
         from Tower {source} to Tower {target}. The towers are labelled A, B and C. \
         Disks are numbered by size, 1 being the smallest, and each tower is listed \
         from bottom to top.\n\n\
         Remember the rules:\n\
         1. Only one disk can be moved at a time\n\
         2. Each move takes the top disk from one tower and places it on another tower\n\
         3. A larger disk can never be placed on top of a smaller disk\n\n\
         You can use the following tools:\n\
         - {get_state}: see every tower and the number of moves made\n\
         - {mv}: move the top disk from one tower to another\n\
         - {check}: check whether the puzzle is solved\n\n\
         Please solve the puzzle as quickly as possible. \
         If the minimum number of moves is already surpassed, proceed anyway.",
        n = n_disks,
        source = source,
        target = target,
        get_state = GET_STATE,
        mv = MOVE,
        check = CHECK_SOLVED,
    )
}

/// Drives a model through the puzzle via tool calls
pub struct ToolDriver {
    client: Arc<dyn ChatClient>,
    config: DriverConfig,
    events: Option<EventBus>,
    transcript: Vec<ChatMessage>,
}

impl ToolDriver {
    /// Create a driver for `client`
    pub fn new(client: Arc<dyn ChatClient>, config: DriverConfig) -> Self {
        Self {
            client,
            config,
            events: None,
            transcript: Vec::new(),
        }
    }

    /// Publish progress on `bus`
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    /// Driver settings
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Conversation of the most recent run
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    fn emit(&self, event: HanoiEvent) {
        if let Some(bus) = &self.events {
            bus.emit(event);
        }
    }

    /// Play `state` until it is solved on the target tower or turns run out
    pub async fn run(&mut self, state: &mut GameState) -> Result<RunReport, DriverError> {
        let target = self.config.target;
        if state.source() == target {
            return Err(DriverError::InvalidConfiguration {
                reason: format!("source and target are both tower {}", target),
            });
        }
        if state.source() != self.config.source {
            return Err(DriverError::InvalidConfiguration {
                reason: format!(
                    "puzzle starts on tower {} but the run expects tower {}",
                    state.source(),
                    self.config.source
                ),
            });
        }

        let started = Instant::now();
        let tools = tool_definitions();
        let mut moves = MoveRecord::new();
        let mut usage = TokenUsage::default();
        let mut invalid_calls = 0usize;
        let mut turns = 0usize;

        self.transcript = vec![ChatMessage::system(system_prompt(
            state.n_disks(),
            state.source(),
            target,
        ))];

        info!(
            model = %self.client.model_name(),
            disks = state.n_disks(),
            max_turns = self.config.max_turns,
            "Starting tool-calling run"
        );

        while !state.is_solved(target) && turns < self.config.max_turns {
            turns += 1;
            self.emit(HanoiEvent::turn_started(turns, state.move_count()));
            debug!(turn = turns, moves = state.move_count(), "Turn started");

            self.transcript.push(ChatMessage::user(format!(
                "Current state of the towers:\n{}\n\nPlease make the next move to solve the puzzle.",
                describe_state(state)
            )));

            let request = ChatRequest {
                messages: self.transcript.clone(),
                tools: tools.clone(),
                temperature: self.config.temperature,
            };

            let client = self.client.as_ref();
            let req = &request;
            let response = match call_with_retry(move || client.chat(req), &self.config.retry).await
            {
                Ok(response) => response,
                Err(err) => {
                    warn!(turn = turns, error = %err, "Model endpoint failed");
                    return Err(DriverError::Endpoint(err));
                }
            };

            usage += response.tokens;
            let calls = response.message.tool_calls.clone();
            if calls.is_empty() {
                debug!(
                    turn = turns,
                    content = response.message.content.as_deref().unwrap_or(""),
                    "Reply without tool calls"
                );
            }
            self.transcript.push(response.message);

            for call in &calls {
                let outcome = dispatch(state, target, call);

                if let Some((mv, legal)) = outcome.attempted_move() {
                    moves.push(mv, legal);
                }
                match &outcome {
                    ToolOutcome::Rejected { mv, violation } => {
                        self.emit(HanoiEvent::move_rejected(
                            turns,
                            mv.source,
                            mv.destination,
                            violation.code(),
                        ));
                    }
                    ToolOutcome::Invalid(err) => {
                        invalid_calls += 1;
                        debug!(turn = turns, tool = %call.name, error = %err, "Invalid tool call");
                    }
                    _ => {}
                }
                self.emit(HanoiEvent::tool_call_executed(
                    turns,
                    &call.name,
                    outcome.is_success(),
                ));

                self.transcript
                    .push(ChatMessage::tool(call.id.clone(), outcome.to_json().to_string()));

                if state.is_solved(target) {
                    break;
                }
            }
        }

        let outcome = if state.is_solved(target) {
            RunOutcome::Solved
        } else {
            match state.full_tower() {
                Some(tower) if tower != state.source() => RunOutcome::SolvedOnWrongTower { tower },
                _ => RunOutcome::BudgetExhausted,
            }
        };

        let report = RunReport {
            model: self.client.model_name().to_string(),
            outcome,
            turns,
            move_count: moves.accepted() as u64,
            invalid_calls,
            cost_usd: self.client.cost_per_1k_tokens().calculate(usage),
            usage,
            elapsed: started.elapsed(),
            final_state: state.snapshot(),
            moves,
        };

        self.emit(HanoiEvent::run_finished(
            outcome.as_str(),
            turns,
            report.move_count,
            invalid_calls,
        ));
        info!(
            outcome = outcome.as_str(),
            turns = turns,
            moves = report.move_count,
            invalid_calls = invalid_calls,
            "Tool-calling run finished"
        );

        Ok(report)
    }
}
