//! This module defines the core data structures and types used throughout the simulator,
//! including machine descriptions, transitions, run results, configuration enums and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::Rule;

/// A single tape cell value.
pub type Symbol = char;

/// The blank symbol used when a document does not declare one.
pub const DEFAULT_BLANK_SYMBOL: Symbol = '_';
/// Placeholder shown for an empty auxiliary memory register.
pub const EMPTY_MEMORY_GLYPH: &str = "_";
/// Token used in documents to mark a wildcard memory condition.
pub const MEMORY_WILDCARD: &str = "*";
/// The maximum allowed size for a machine description in bytes.
pub const MAX_PROGRAM_SIZE: usize = 65536; // 64KB
/// Default step budget for table-flavored documents.
pub const MAX_EXECUTION_STEPS: usize = 10000;
/// Default step budget for delta-flavored documents.
pub const DELTA_MAX_EXECUTION_STEPS: usize = 2000;
/// Cells shown on each side of the head by the tuple ID format.
pub const DEFAULT_WINDOW_RADIUS: usize = 40;
/// Largest `window_radius` a description may ask for.
pub const MAX_WINDOW_RADIUS: usize = 1000;

/// A machine description as produced by a loader, before validation.
///
/// This is plain data: nothing here has been checked yet. `Program::new` validates it
/// and compiles the transition table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MachineDescription {
    /// A human readable name for the machine.
    pub name: String,
    /// Every state label, in declaration order.
    pub states: Vec<String>,
    /// The state each run starts in.
    pub initial_state: String,
    /// Accepting states.
    pub final_states: Vec<String>,
    pub input_alphabet: Vec<Symbol>,
    pub tape_alphabet: Vec<Symbol>,
    /// The symbol filling every unwritten cell.
    pub blank: Symbol,
    /// Transition rules in registration order.
    pub transitions: Vec<Transition>,
    /// Whether the machine carries an auxiliary memory register.
    pub memory: bool,
    /// Input strings to run in a batch.
    pub inputs: Vec<String>,
    /// Step budget for a run.
    pub max_steps: usize,
    pub mode: Mode,
    pub match_policy: MatchPolicy,
    pub input_mode: InputMode,
    pub id_format: IdFormat,
    /// Cells always shown around the head in rendered IDs.
    pub window_radius: Option<usize>,
}

/// How duplicate transition rules are handled while building a table.
///
/// - `Normal` (default): duplicates are kept, the first registered rule wins.
/// - `Strict`: duplicates are a configuration error.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Normal,
    Strict,
}

/// How a memory table picks between several matching rules.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// A rule guarded by the exact memory value beats a wildcard rule.
    #[default]
    Specific,
    /// The first matching rule in registration order wins.
    FirstRegistered,
}

/// How input strings are placed on the tape.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// Every input character must belong to the tape alphabet.
    #[default]
    Validated,
    /// One cell per character, no membership check.
    Bare,
}

/// Textual convention for instantaneous descriptions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IdFormat {
    /// `(<state>, <tape-window>, <local-head-index>)`
    Tuple,
    /// `ID: state=<s> mem_cache=<m> tape=<...[x]...>`
    Labeled,
}

impl FromStr for IdFormat {
    type Err = TuringMachineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tuple" => Ok(IdFormat::Tuple),
            "labeled" | "labelled" => Ok(IdFormat::Labeled),
            other => Err(TuringMachineError::ConfigurationError(format!(
                "Unknown ID format: {other}"
            ))),
        }
    }
}

/// Represents the possible directions the head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// The head displacement for this direction.
    pub fn offset(self) -> i64 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
            Direction::Stay => 0,
        }
    }
}

impl FromStr for Direction {
    type Err = TuringMachineError;

    /// Supports 'L' or '<' for Left, 'R' or '>' for Right, and 'N', 'S' or '-' for Stay.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" | "<" => Ok(Direction::Left),
            "R" | ">" => Ok(Direction::Right),
            "N" | "S" | "-" => Ok(Direction::Stay),
            other => Err(TuringMachineError::ConfigurationError(format!(
                "Invalid move token: {other:?}"
            ))),
        }
    }
}

/// Condition on the auxiliary memory register.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemoryGuard {
    /// Matches any register value, including an empty register.
    #[default]
    Any,
    /// Matches only this exact value.
    Equals(String),
}

impl MemoryGuard {
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            MemoryGuard::Any => true,
            MemoryGuard::Equals(expected) => value == Some(expected.as_str()),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, MemoryGuard::Any)
    }
}

impl fmt::Display for MemoryGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryGuard::Any => f.write_str(MEMORY_WILDCARD),
            MemoryGuard::Equals(value) => f.write_str(value),
        }
    }
}

/// What a transition does once it fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The state the machine moves to.
    pub next_state: String,
    /// The symbol written under the head.
    pub write: Symbol,
    pub direction: Direction,
    /// The new register value. `None` clears the register.
    pub memory: Option<String>,
}

/// A single transition rule.
///
/// A transition fires when the machine is in `state`, reads `read` under the head and
/// the auxiliary register satisfies `guard`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub state: String,
    pub read: Symbol,
    pub guard: MemoryGuard,
    pub action: Action,
}

impl Transition {
    /// Whether this rule reads or writes the auxiliary register.
    pub fn uses_memory(&self) -> bool {
        !self.guard.is_wildcard() || self.action.memory.is_some()
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}", self.state, self.read)?;
        if !self.guard.is_wildcard() {
            write!(f, ", {}", self.guard)?;
        }
        write!(
            f,
            ") -> ({}, {}, {:?})",
            self.action.next_state, self.action.write, self.action.direction
        )
    }
}

/// Represents the outcome of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A transition was applied.
    Applied,
    /// No rule matches the current configuration. Nothing was changed.
    NoTransition,
}

/// The three mutually exclusive results of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Accepted,
    Rejected,
    StepLimitExceeded,
}

impl fmt::Display for Outcome {
    /// Writes the status line used at the end of trace files.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::Accepted => "ACCEPTED",
            Outcome::Rejected => "REJECTED",
            Outcome::StepLimitExceeded => "STEP LIMIT REACHED",
        })
    }
}

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// An input has been loaded and nothing has been executed yet.
    Ready,
    Running,
    Halted(Outcome),
}

/// The result of `TuringMachine::run`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the machine was in a final state when the run ended.
    pub accepted: bool,
    /// Transitions applied since the input was loaded.
    pub steps: usize,
    /// Whether the run was cut off by the step budget.
    pub step_limit_hit: bool,
    /// Every ID recorded since the input was loaded, the initial one included.
    pub ids: Vec<String>,
}

impl Verdict {
    /// Collapses the verdict into one label. Acceptance wins over the step limit.
    pub fn outcome(&self) -> Outcome {
        if self.accepted {
            Outcome::Accepted
        } else if self.step_limit_hit {
            Outcome::StepLimitExceeded
        } else {
            Outcome::Rejected
        }
    }
}

/// Represents the errors that can occur while building or running a machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// The description cannot be turned into a machine.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    /// An input string contains a symbol outside the tape alphabet.
    #[error("Invalid input symbol {symbol:?} at position {position}")]
    InvalidInputSymbol { symbol: Symbol, position: usize },
    /// A flat transition key such as `(q0, 1)` is malformed.
    #[error("Transition key parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// The document is not valid YAML/JSON or has the wrong shape.
    #[error("Document error: {0}")]
    DocumentError(String),
    /// Indicates an error related to file system operations.
    #[error("File error: {0}")]
    FileError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serialization() {
        let left = Direction::Left;
        let right = Direction::Right;

        let left_json = serde_json::to_string(&left).unwrap();
        let right_json = serde_json::to_string(&right).unwrap();

        assert_eq!(left_json, "\"Left\"");
        assert_eq!(right_json, "\"Right\"");

        let left_deserialized: Direction = serde_json::from_str(&left_json).unwrap();
        assert_eq!(left, left_deserialized);
    }

    #[test]
    fn test_direction_tokens() {
        assert_eq!("L".parse::<Direction>().unwrap(), Direction::Left);
        assert_eq!("<".parse::<Direction>().unwrap(), Direction::Left);
        assert_eq!("r".parse::<Direction>().unwrap(), Direction::Right);
        assert_eq!("N".parse::<Direction>().unwrap(), Direction::Stay);
        assert_eq!("S".parse::<Direction>().unwrap(), Direction::Stay);
        assert_eq!(" - ".parse::<Direction>().unwrap(), Direction::Stay);

        let error = "X".parse::<Direction>().unwrap_err();
        assert!(matches!(error, TuringMachineError::ConfigurationError(_)));
        assert!(error.to_string().contains("Invalid move token"));
    }

    #[test]
    fn test_direction_offset() {
        assert_eq!(Direction::Left.offset(), -1);
        assert_eq!(Direction::Right.offset(), 1);
        assert_eq!(Direction::Stay.offset(), 0);
    }

    #[test]
    fn test_memory_guard_matching() {
        assert!(MemoryGuard::Any.matches(None));
        assert!(MemoryGuard::Any.matches(Some("x")));

        let guard = MemoryGuard::Equals("x".into());
        assert!(guard.matches(Some("x")));
        assert!(!guard.matches(Some("y")));
        assert!(!guard.matches(None));
    }

    #[test]
    fn test_verdict_outcome() {
        let mut verdict = Verdict {
            accepted: true,
            steps: 5,
            step_limit_hit: true,
            ids: vec![],
        };
        assert_eq!(verdict.outcome(), Outcome::Accepted);

        verdict.accepted = false;
        assert_eq!(verdict.outcome(), Outcome::StepLimitExceeded);

        verdict.step_limit_hit = false;
        assert_eq!(verdict.outcome(), Outcome::Rejected);
    }

    #[test]
    fn test_outcome_status_lines() {
        assert_eq!(Outcome::Accepted.to_string(), "ACCEPTED");
        assert_eq!(Outcome::Rejected.to_string(), "REJECTED");
        assert_eq!(Outcome::StepLimitExceeded.to_string(), "STEP LIMIT REACHED");
    }

    #[test]
    fn test_transition_display() {
        let transition = Transition {
            state: "q0".to_string(),
            read: 'a',
            guard: MemoryGuard::Equals("m".into()),
            action: Action {
                next_state: "q1".to_string(),
                write: 'b',
                direction: Direction::Right,
                memory: None,
            },
        };

        assert_eq!(transition.to_string(), "(q0, a, m) -> (q1, b, Right)");
        assert!(transition.uses_memory());
    }

    #[test]
    fn test_error_display() {
        let error = TuringMachineError::InvalidInputSymbol {
            symbol: 'z',
            position: 3,
        };

        let error_msg = format!("{}", error);
        assert!(error_msg.contains("'z'"));
        assert!(error_msg.contains("position 3"));
    }
}
