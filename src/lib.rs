//! This crate provides the execution engine for single-tape Turing machines.
//! It includes modules for parsing machine documents, validating them, running
//! machines step by step under a step budget, recording instantaneous descriptions,
//! exporting traces and managing a collection of built-in programs.

pub mod analyzer;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod recorder;
pub mod table;
pub mod tape;
pub mod trace;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the validated `Program` and its runner `TuringMachine`.
pub use machine::{Program, TuringMachine};
/// Re-exports the document parsing entry points.
pub use parser::{parse, parse_description};
/// Re-exports `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramInfo, ProgramManager, PROGRAMS};
pub use recorder::IdRecorder;
pub use table::TransitionTable;
pub use tape::{DenseTape, SparseTape, Tape};
/// Re-exports the types describing machines and their runs.
pub use types::{
    Action, Direction, IdFormat, InputMode, MachineDescription, MatchPolicy, MemoryGuard, Mode,
    Outcome, Status, Step, Symbol, Transition, TuringMachineError, Verdict, MAX_EXECUTION_STEPS,
    MAX_PROGRAM_SIZE,
};
