//! Tool Definitions and Dispatch
//!
//! The model can call exactly three tools:
//!
//! | Tool           | Arguments                  | Effect                      |
//! |----------------|----------------------------|-----------------------------|
//! | `get_state`    | none                       | all three towers            |
//! | `move`         | `source`, `destination`    | apply one move              |
//! | `check_solved` | none                       | win check on the target     |
//!
//! Every call produces a JSON result for the transcript. Malformed calls
//! are answered with an `invalid_tool_call` result and never mutate state.

use crate::core::{GameState, HanoiError, Move, MoveApplied, MoveViolation, TowerId, TowerSnapshot};
use crate::llm::{ToolCall, ToolDefinition};
use serde_json::{json, Value};
use std::fmt;

/// Name of the inspection tool
pub const GET_STATE: &str = "get_state";

/// Name of the move tool
pub const MOVE: &str = "move";

/// Name of the win-check tool
pub const CHECK_SOLVED: &str = "check_solved";

/// The three tools advertised to the model
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: GET_STATE.to_string(),
            description: "Get the disks on every tower (bottom to top) and the number of moves made so far.".to_string(),
            parameters: json!({"type": "object", "properties": {}, "required": []}),
        },
        ToolDefinition {
            name: MOVE.to_string(),
            description: "Move the top disk from one tower to another.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "source": {
                        "type": "string",
                        "enum": ["A", "B", "C"],
                        "description": "Tower to take the top disk from"
                    },
                    "destination": {
                        "type": "string",
                        "enum": ["A", "B", "C"],
                        "description": "Tower to place the disk on"
                    }
                },
                "required": ["source", "destination"]
            }),
        },
        ToolDefinition {
            name: CHECK_SOLVED.to_string(),
            description: "Check whether every disk is on the target tower.".to_string(),
            parameters: json!({"type": "object", "properties": {}, "required": []}),
        },
    ]
}

/// Why a tool call could not be executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCallError {
    /// The model asked for a tool that does not exist
    UnknownTool {
        /// Requested tool name
        name: String,
    },
    /// Arguments were not a JSON object
    MalformedArguments {
        /// Parser message
        reason: String,
    },
    /// A required argument was absent or not a string
    MissingArgument {
        /// Argument name
        argument: &'static str,
    },
    /// A tower label was not A, B or C
    UnknownTower {
        /// The rejected label
        label: String,
    },
}

impl ToolCallError {
    /// Stable machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            ToolCallError::UnknownTool { .. } => "unknown_tool",
            ToolCallError::MalformedArguments { .. } => "malformed_arguments",
            ToolCallError::MissingArgument { .. } => "missing_argument",
            ToolCallError::UnknownTower { .. } => "unknown_tower",
        }
    }
}

impl fmt::Display for ToolCallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolCallError::UnknownTool { name } => write!(
                f,
                "Unknown tool '{}': available tools are {}, {} and {}",
                name, GET_STATE, MOVE, CHECK_SOLVED
            ),
            ToolCallError::MalformedArguments { reason } => {
                write!(f, "Arguments are not a valid JSON object: {}", reason)
            }
            ToolCallError::MissingArgument { argument } => {
                write!(f, "Missing string argument '{}'", argument)
            }
            ToolCallError::UnknownTower { label } => {
                write!(f, "Unknown tower '{}': expected A, B or C", label)
            }
        }
    }
}

impl std::error::Error for ToolCallError {}

/// What happened when a tool call was dispatched
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    /// `get_state` answered
    State(TowerSnapshot),
    /// `move` was applied
    Moved(MoveApplied),
    /// `move` broke a rule; the state is unchanged
    Rejected {
        /// The attempted move
        mv: Move,
        /// Rule that was broken
        violation: MoveViolation,
    },
    /// `check_solved` answered
    Checked {
        /// True iff the target holds every disk
        solved: bool,
        /// Tower that was checked
        target: TowerId,
        /// Accepted moves so far
        moves: u64,
    },
    /// The call was malformed
    Invalid(ToolCallError),
}

impl ToolOutcome {
    /// False for rejected moves and malformed calls
    pub fn is_success(&self) -> bool {
        !matches!(self, ToolOutcome::Rejected { .. } | ToolOutcome::Invalid(_))
    }

    /// The move this call attempted, if it got as far as the state machine
    pub fn attempted_move(&self) -> Option<(Move, bool)> {
        match self {
            ToolOutcome::Moved(applied) => {
                Some((Move::new(applied.source, applied.destination), true))
            }
            ToolOutcome::Rejected { mv, .. } => Some((*mv, false)),
            _ => None,
        }
    }

    /// JSON result returned to the model
    pub fn to_json(&self) -> Value {
        match self {
            ToolOutcome::State(snapshot) => json!({
                "success": true,
                "towers": {"A": snapshot.a, "B": snapshot.b, "C": snapshot.c},
                "moves": snapshot.moves,
            }),
            ToolOutcome::Moved(applied) => json!({
                "success": true,
                "message": format!(
                    "Moved disk {} from {} to {}",
                    applied.disk, applied.source, applied.destination
                ),
                "tops": applied.tops,
            }),
            ToolOutcome::Rejected { mv, violation } => json!({
                "success": false,
                "error": "illegal_move",
                "rule": violation.code(),
                "message": format!("Illegal move {}: {}", mv, violation),
            }),
            ToolOutcome::Checked {
                solved,
                target,
                moves,
            } => json!({
                "success": true,
                "solved": solved,
                "target": target,
                "moves": moves,
            }),
            ToolOutcome::Invalid(err) => json!({
                "success": false,
                "error": "invalid_tool_call",
                "kind": err.kind(),
                "message": err.to_string(),
            }),
        }
    }
}

/// Execute one tool call against `state`
pub fn dispatch(state: &mut GameState, target: TowerId, call: &ToolCall) -> ToolOutcome {
    match call.name.as_str() {
        GET_STATE => ToolOutcome::State(state.snapshot()),
        CHECK_SOLVED => ToolOutcome::Checked {
            solved: state.is_solved(target),
            target,
            moves: state.move_count(),
        },
        MOVE => match parse_move(&call.arguments) {
            Ok(mv) => apply_parsed(state, mv),
            Err(err) => ToolOutcome::Invalid(err),
        },
        other => ToolOutcome::Invalid(ToolCallError::UnknownTool {
            name: other.to_string(),
        }),
    }
}

/// Apply a move given as tower labels, answering the way the `move` tool does
pub fn move_by_labels(state: &mut GameState, source: &str, destination: &str) -> ToolOutcome {
    match (tower_label(source), tower_label(destination)) {
        (Ok(source), Ok(destination)) => apply_parsed(state, Move::new(source, destination)),
        (Err(err), _) | (_, Err(err)) => ToolOutcome::Invalid(err),
    }
}

fn apply_parsed(state: &mut GameState, mv: Move) -> ToolOutcome {
    match state.apply(mv) {
        Ok(applied) => ToolOutcome::Moved(applied),
        Err(HanoiError::IllegalMove { violation, .. }) => ToolOutcome::Rejected { mv, violation },
        Err(other) => ToolOutcome::Invalid(ToolCallError::MalformedArguments {
            reason: other.to_string(),
        }),
    }
}

/// Parse `{"source": "A", "destination": "C"}` into a [`Move`]
pub fn parse_move(arguments: &str) -> Result<Move, ToolCallError> {
    let value: Value = serde_json::from_str(arguments).map_err(|e| {
        ToolCallError::MalformedArguments {
            reason: e.to_string(),
        }
    })?;

    let Value::Object(args) = value else {
        return Err(ToolCallError::MalformedArguments {
            reason: "expected an object".to_string(),
        });
    };

    let source = tower_argument(&args, "source")?;
    let destination = tower_argument(&args, "destination")?;
    Ok(Move::new(source, destination))
}

fn tower_argument(
    args: &serde_json::Map<String, Value>,
    argument: &'static str,
) -> Result<TowerId, ToolCallError> {
    let label = args
        .get(argument)
        .and_then(Value::as_str)
        .ok_or(ToolCallError::MissingArgument { argument })?;

    tower_label(label)
}

fn tower_label(label: &str) -> Result<TowerId, ToolCallError> {
    label.parse().map_err(|_| ToolCallError::UnknownTower {
        label: label.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: &str) -> ToolCall {
        ToolCall::new("call_0", name, args)
    }

    // ==========================================
    // Definition Tests
    // ==========================================

    #[test]
    fn test_exactly_three_tools() {
        let names: Vec<String> = tool_definitions().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["get_state", "move", "check_solved"]);
    }

    #[test]
    fn test_move_schema_requires_both_towers() {
        let defs = tool_definitions();
        let mv = defs.iter().find(|t| t.name == MOVE).unwrap();
        assert_eq!(
            mv.parameters["required"],
            json!(["source", "destination"])
        );
    }

    // ==========================================
    // Dispatch Tests
    // ==========================================

    #[test]
    fn test_get_state() {
        let mut state = GameState::new(3).unwrap();
        let outcome = dispatch(&mut state, TowerId::C, &call(GET_STATE, "{}"));
        let json = outcome.to_json();
        assert_eq!(json["towers"]["A"], json!([3, 2, 1]));
        assert_eq!(json["towers"]["C"], json!([]));
        assert_eq!(json["moves"], 0);
    }

    #[test]
    fn test_get_state_ignores_empty_arguments() {
        let mut state = GameState::new(1).unwrap();
        let outcome = dispatch(&mut state, TowerId::C, &call(GET_STATE, ""));
        assert!(outcome.is_success());
    }

    #[test]
    fn test_legal_move() {
        let mut state = GameState::new(2).unwrap();
        let outcome = dispatch(
            &mut state,
            TowerId::C,
            &call(MOVE, r#"{"source":"A","destination":"B"}"#),
        );
        assert!(matches!(outcome, ToolOutcome::Moved(MoveApplied { disk: 1, .. })));
        assert_eq!(
            outcome.attempted_move(),
            Some((Move::new(TowerId::A, TowerId::B), true))
        );
        assert_eq!(outcome.to_json()["message"], "Moved disk 1 from A to B");
        assert_eq!(state.peek(TowerId::B), &[1]);
    }

    #[test]
    fn test_lowercase_labels_accepted() {
        let mut state = GameState::new(1).unwrap();
        let outcome = dispatch(
            &mut state,
            TowerId::C,
            &call(MOVE, r#"{"source":"a","destination":"c"}"#),
        );
        assert!(outcome.is_success());
        assert!(state.is_solved(TowerId::C));
    }

    #[test]
    fn test_illegal_move_reports_rule() {
        let mut state = GameState::new(2).unwrap();
        state.apply_move(TowerId::A, TowerId::B).unwrap();
        let before = state.clone();

        let outcome = dispatch(
            &mut state,
            TowerId::C,
            &call(MOVE, r#"{"source":"A","destination":"B"}"#),
        );

        assert_eq!(
            outcome,
            ToolOutcome::Rejected {
                mv: Move::new(TowerId::A, TowerId::B),
                violation: MoveViolation::LargerOnSmaller { disk: 2, onto: 1 },
            }
        );
        let json = outcome.to_json();
        assert_eq!(json["success"], false);
        assert_eq!(json["rule"], "larger_on_smaller");
        assert_eq!(state, before);
    }

    #[test]
    fn test_unknown_tower_is_invalid_call() {
        let mut state = GameState::new(3).unwrap();
        let before = state.clone();

        let outcome = dispatch(
            &mut state,
            TowerId::C,
            &call(MOVE, r#"{"source":"A","destination":"D"}"#),
        );

        assert_eq!(
            outcome,
            ToolOutcome::Invalid(ToolCallError::UnknownTower {
                label: "D".to_string()
            })
        );
        assert_eq!(outcome.attempted_move(), None);
        assert_eq!(outcome.to_json()["kind"], "unknown_tower");
        assert_eq!(state, before);
    }

    #[test]
    fn test_missing_argument() {
        let mut state = GameState::new(3).unwrap();
        let outcome = dispatch(&mut state, TowerId::C, &call(MOVE, r#"{"source":"A"}"#));
        assert_eq!(
            outcome,
            ToolOutcome::Invalid(ToolCallError::MissingArgument {
                argument: "destination"
            })
        );
    }

    #[test]
    fn test_non_string_argument_is_missing() {
        assert_eq!(
            parse_move(r#"{"source":1,"destination":"C"}"#),
            Err(ToolCallError::MissingArgument { argument: "source" })
        );
    }

    #[test]
    fn test_unparseable_arguments() {
        assert!(matches!(
            parse_move("{source: A"),
            Err(ToolCallError::MalformedArguments { .. })
        ));
        assert!(matches!(
            parse_move(r#"["A","C"]"#),
            Err(ToolCallError::MalformedArguments { .. })
        ));
    }

    #[test]
    fn test_move_by_labels() {
        let mut state = GameState::new(2).unwrap();
        assert!(move_by_labels(&mut state, "A", "B").is_success());
        assert_eq!(
            move_by_labels(&mut state, "x", "C"),
            ToolOutcome::Invalid(ToolCallError::UnknownTower {
                label: "x".to_string()
            })
        );
        assert!(matches!(
            move_by_labels(&mut state, "A", "B"),
            ToolOutcome::Rejected { .. }
        ));
        assert_eq!(state.move_count(), 1);
    }

    #[test]
    fn test_unknown_tool() {
        let mut state = GameState::new(3).unwrap();
        let outcome = dispatch(&mut state, TowerId::C, &call("teleport", "{}"));
        assert_eq!(outcome.to_json()["kind"], "unknown_tool");
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_check_solved() {
        let mut state = GameState::new(1).unwrap();
        let before = dispatch(&mut state, TowerId::C, &call(CHECK_SOLVED, "{}"));
        assert_eq!(before.to_json()["solved"], false);

        state.apply_move(TowerId::A, TowerId::C).unwrap();
        let after = dispatch(&mut state, TowerId::C, &call(CHECK_SOLVED, "{}"));
        let json = after.to_json();
        assert_eq!(json["solved"], true);
        assert_eq!(json["target"], "C");
        assert_eq!(json["moves"], 1);
    }
}
