//! Logging Observer
//!
//! Writes driver events through `tracing`:
//! - INFO: RunFinished
//! - WARN: MoveRejected
//! - DEBUG: TurnStarted, ToolCallExecuted

use crate::events::{EventBus, HanoiEvent};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Observer that logs driver events using tracing
pub struct LoggingObserver {
    receiver: broadcast::Receiver<HanoiEvent>,
}

impl LoggingObserver {
    /// Create a new logging observer subscribed to the event bus
    pub fn new(bus: &EventBus) -> Self {
        Self {
            receiver: bus.subscribe(),
        }
    }

    /// Run the observer, logging events until the channel closes
    ///
    /// ```rust,ignore
    /// tokio::spawn(observer.run());
    /// ```
    pub async fn run(mut self) {
        loop {
            match self.receiver.recv().await {
                Ok(event) => Self::log_event(&event),
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("EventBus closed, logging observer stopping");
                    break;
                }
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(skipped = count, "Logging observer lagged");
                }
            }
        }
    }

    /// Log a single event at the appropriate level
    pub fn log_event(event: &HanoiEvent) {
        match event {
            HanoiEvent::TurnStarted { turn, moves, .. } => {
                debug!(turn = turn, moves = moves, "Turn started");
            }

            HanoiEvent::ToolCallExecuted {
                turn,
                tool,
                success,
                ..
            } => {
                debug!(turn = turn, tool = %tool, success = success, "Tool call executed");
            }

            HanoiEvent::MoveRejected {
                turn,
                source,
                destination,
                rule,
                ..
            } => {
                warn!(
                    turn = turn,
                    source = %source,
                    destination = %destination,
                    rule = %rule,
                    "Move rejected"
                );
            }

            HanoiEvent::RunFinished {
                outcome,
                turns,
                moves,
                invalid_calls,
                ..
            } => {
                info!(
                    outcome = %outcome,
                    turns = turns,
                    moves = moves,
                    invalid_calls = invalid_calls,
                    "Run finished"
                );
            }
        }
    }
}
