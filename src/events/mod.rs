//! Driver Events
//!
//! The tool-calling driver reports its progress as [`HanoiEvent`]s on an
//! optional [`EventBus`]. Observers subscribe without slowing the loop down:
//!
//! ```text
//! ToolDriver → EventBus → [LoggingObserver, ...]
//! ```

pub mod bus;
pub mod observers;

use crate::core::TowerId;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Everything the driver reports while it runs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum HanoiEvent {
    /// A request is about to be sent to the model
    TurnStarted {
        /// Turn number, starting at 1
        turn: usize,
        /// Accepted moves before this turn
        moves: u64,
        /// When the turn started
        #[serde(with = "system_time_serde")]
        timestamp: SystemTime,
    },

    /// A tool call from the model was dispatched
    ToolCallExecuted {
        /// Turn the call arrived in
        turn: usize,
        /// Tool name as sent by the model
        tool: String,
        /// False if the call was malformed or the move illegal
        success: bool,
        /// When the call finished
        #[serde(with = "system_time_serde")]
        timestamp: SystemTime,
    },

    /// The state machine refused a move
    MoveRejected {
        /// Turn the move arrived in
        turn: usize,
        /// Requested source
        source: TowerId,
        /// Requested destination
        destination: TowerId,
        /// Code of the broken rule
        rule: String,
        /// When the move was refused
        #[serde(with = "system_time_serde")]
        timestamp: SystemTime,
    },

    /// The loop ended
    RunFinished {
        /// Outcome name
        outcome: String,
        /// Turns used
        turns: usize,
        /// Accepted moves
        moves: u64,
        /// Malformed tool calls
        invalid_calls: usize,
        /// When the run ended
        #[serde(with = "system_time_serde")]
        timestamp: SystemTime,
    },
}

impl HanoiEvent {
    /// Create a TurnStarted event
    pub fn turn_started(turn: usize, moves: u64) -> Self {
        Self::TurnStarted {
            turn,
            moves,
            timestamp: SystemTime::now(),
        }
    }

    /// Create a ToolCallExecuted event
    pub fn tool_call_executed(turn: usize, tool: &str, success: bool) -> Self {
        Self::ToolCallExecuted {
            turn,
            tool: tool.to_string(),
            success,
            timestamp: SystemTime::now(),
        }
    }

    /// Create a MoveRejected event
    pub fn move_rejected(turn: usize, source: TowerId, destination: TowerId, rule: &str) -> Self {
        Self::MoveRejected {
            turn,
            source,
            destination,
            rule: rule.to_string(),
            timestamp: SystemTime::now(),
        }
    }

    /// Create a RunFinished event
    pub fn run_finished(outcome: &str, turns: usize, moves: u64, invalid_calls: usize) -> Self {
        Self::RunFinished {
            outcome: outcome.to_string(),
            turns,
            moves,
            invalid_calls,
            timestamp: SystemTime::now(),
        }
    }

    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::TurnStarted { .. } => "TurnStarted",
            Self::ToolCallExecuted { .. } => "ToolCallExecuted",
            Self::MoveRejected { .. } => "MoveRejected",
            Self::RunFinished { .. } => "RunFinished",
        }
    }

    /// Get the timestamp of the event
    pub fn timestamp(&self) -> SystemTime {
        match self {
            Self::TurnStarted { timestamp, .. }
            | Self::ToolCallExecuted { timestamp, .. }
            | Self::MoveRejected { timestamp, .. }
            | Self::RunFinished { timestamp, .. } => *timestamp,
        }
    }
}

/// Serde module for SystemTime serialization (epoch millis)
mod system_time_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    pub fn serialize<S>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let duration = time.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO);
        let millis = duration.as_millis() as u64;
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SystemTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(UNIX_EPOCH + Duration::from_millis(millis))
    }
}

pub use bus::EventBus;

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================
    // Event Creation Tests
    // ==========================================

    #[test]
    fn test_move_rejected_creation() {
        let event = HanoiEvent::move_rejected(4, TowerId::A, TowerId::B, "larger_on_smaller");

        match event {
            HanoiEvent::MoveRejected {
                turn,
                source,
                destination,
                rule,
                ..
            } => {
                assert_eq!(turn, 4);
                assert_eq!(source, TowerId::A);
                assert_eq!(destination, TowerId::B);
                assert_eq!(rule, "larger_on_smaller");
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn test_event_type_name() {
        assert_eq!(HanoiEvent::turn_started(1, 0).event_type(), "TurnStarted");
        assert_eq!(
            HanoiEvent::tool_call_executed(1, "move", true).event_type(),
            "ToolCallExecuted"
        );
        assert_eq!(
            HanoiEvent::run_finished("solved", 3, 7, 0).event_type(),
            "RunFinished"
        );
    }

    #[test]
    fn test_event_has_timestamp() {
        let before = SystemTime::now();
        let event = HanoiEvent::turn_started(1, 0);
        let after = SystemTime::now();

        let ts = event.timestamp();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    // ==========================================
    // Serialization Tests
    // ==========================================

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = HanoiEvent::move_rejected(2, TowerId::C, TowerId::A, "empty_source");
        let json = serde_json::to_string(&event).unwrap();

        assert!(json.contains(r#""type":"MoveRejected""#));
        assert!(json.contains(r#""source":"C""#));
        assert!(json.contains(r#""rule":"empty_source""#));
    }

    #[test]
    fn test_event_deserializes_from_json() {
        let json = r#"{
            "type": "RunFinished",
            "outcome": "budget_exhausted",
            "turns": 100,
            "moves": 42,
            "invalid_calls": 3,
            "timestamp": 1704067200000
        }"#;

        let event: HanoiEvent = serde_json::from_str(json).unwrap();
        match event {
            HanoiEvent::RunFinished {
                outcome,
                turns,
                invalid_calls,
                ..
            } => {
                assert_eq!(outcome, "budget_exhausted");
                assert_eq!(turns, 100);
                assert_eq!(invalid_calls, 3);
            }
            _ => panic!("Wrong event type"),
        }
    }
}
