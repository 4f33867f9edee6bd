//! This module provides functions for analyzing machine descriptions before a `Program` is
//! built from them. Fatal checks cover states, alphabets and transition rules; non-fatal
//! findings (such as unreachable states) are reported separately so callers can log them.

use crate::types::{MachineDescription, Symbol, TuringMachineError, MAX_WINDOW_RADIUS};
use std::collections::HashSet;

/// Represents the problems that can be found while analyzing a description.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// The description declares no states at all.
    NoStates,
    /// A state label is declared more than once.
    DuplicateState(String),
    /// The initial state is not among the declared states.
    InvalidStartState(String),
    /// No accepting state is declared.
    NoFinalStates,
    /// Final states that are not declared states.
    UndeclaredFinalStates(Vec<String>),
    /// The blank symbol is missing from the tape alphabet.
    BlankNotInTapeAlphabet(Symbol),
    /// Input symbols that are missing from the tape alphabet.
    InputNotInTapeAlphabet(Vec<Symbol>),
    /// Rules that reference undeclared states, rendered as `rule -> state`.
    UndefinedStates(Vec<String>),
    /// Rules that read or write symbols outside the tape alphabet.
    InvalidRuleSymbols(Vec<String>),
    /// The requested ID window is wider than `MAX_WINDOW_RADIUS`.
    WindowRadiusTooLarge(usize),
}

impl From<AnalysisError> for TuringMachineError {
    /// Converts an `AnalysisError` into a `TuringMachineError::ConfigurationError`.
    fn from(error: AnalysisError) -> Self {
        let message = match error {
            AnalysisError::NoStates => "No states declared".to_string(),
            AnalysisError::DuplicateState(state) => format!("Duplicate state: {state}"),
            AnalysisError::InvalidStartState(state) => {
                format!("Initial state {state} is not a declared state")
            }
            AnalysisError::NoFinalStates => "At least one final state is required".to_string(),
            AnalysisError::UndeclaredFinalStates(states) => {
                format!("Final states are not declared states: {states:?}")
            }
            AnalysisError::BlankNotInTapeAlphabet(blank) => {
                format!("The tape alphabet must contain the blank symbol {blank:?}")
            }
            AnalysisError::InputNotInTapeAlphabet(symbols) => format!(
                "The tape alphabet must contain the input alphabet, missing {symbols:?}"
            ),
            AnalysisError::UndefinedStates(rules) => {
                format!("Transitions reference undefined states: {rules:?}")
            }
            AnalysisError::InvalidRuleSymbols(rules) => {
                format!("Transitions use symbols outside the tape alphabet: {rules:?}")
            }
            AnalysisError::WindowRadiusTooLarge(radius) => {
                format!("window_radius {radius} exceeds the maximum of {MAX_WINDOW_RADIUS}")
            }
        };

        TuringMachineError::ConfigurationError(message)
    }
}

/// Analyzes a description for errors that make it impossible to build a machine.
///
/// Every check runs; the first error found is returned.
pub fn analyze(description: &MachineDescription) -> Result<(), TuringMachineError> {
    let errors = [
        check_states,
        check_valid_start_state,
        check_final_states,
        check_alphabets,
        check_rule_states,
        check_rule_symbols,
        check_window_radius,
    ]
    .iter()
    .filter_map(|f| f(description).err())
    .collect::<Vec<_>>();

    match errors.into_iter().next() {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}

/// Returns the declared states that cannot be reached from the initial state.
///
/// Unreachable states do not prevent a machine from running, so this is kept apart from
/// `analyze`.
pub fn unreachable_states(description: &MachineDescription) -> Vec<String> {
    let mut visited = HashSet::new();
    let mut queue = vec![description.initial_state.as_str()];

    while let Some(state) = queue.pop() {
        if !visited.insert(state) {
            continue;
        }

        for transition in &description.transitions {
            if transition.state == state && !visited.contains(transition.action.next_state.as_str())
            {
                queue.push(&transition.action.next_state);
            }
        }
    }

    let mut unreachable: Vec<String> = description
        .states
        .iter()
        .filter(|state| !visited.contains(state.as_str()))
        .cloned()
        .collect();
    unreachable.sort();
    unreachable.dedup();
    unreachable
}

fn check_states(description: &MachineDescription) -> Result<(), AnalysisError> {
    if description.states.is_empty() {
        return Err(AnalysisError::NoStates);
    }

    let mut seen = HashSet::new();
    for state in &description.states {
        if !seen.insert(state) {
            return Err(AnalysisError::DuplicateState(state.clone()));
        }
    }

    Ok(())
}

fn check_valid_start_state(description: &MachineDescription) -> Result<(), AnalysisError> {
    if !description.states.contains(&description.initial_state) {
        return Err(AnalysisError::InvalidStartState(
            description.initial_state.clone(),
        ));
    }

    Ok(())
}

fn check_final_states(description: &MachineDescription) -> Result<(), AnalysisError> {
    if description.final_states.is_empty() {
        return Err(AnalysisError::NoFinalStates);
    }

    let undeclared: Vec<String> = description
        .final_states
        .iter()
        .filter(|state| !description.states.contains(state))
        .cloned()
        .collect();

    if !undeclared.is_empty() {
        return Err(AnalysisError::UndeclaredFinalStates(undeclared));
    }

    Ok(())
}

/// Checks that the blank and the input alphabet both belong to the tape alphabet.
fn check_alphabets(description: &MachineDescription) -> Result<(), AnalysisError> {
    if !description.tape_alphabet.contains(&description.blank) {
        return Err(AnalysisError::BlankNotInTapeAlphabet(description.blank));
    }

    let mut missing: Vec<Symbol> = description
        .input_alphabet
        .iter()
        .filter(|symbol| !description.tape_alphabet.contains(symbol))
        .copied()
        .collect();

    if !missing.is_empty() {
        missing.sort();
        missing.dedup();
        return Err(AnalysisError::InputNotInTapeAlphabet(missing));
    }

    Ok(())
}

fn check_rule_states(description: &MachineDescription) -> Result<(), AnalysisError> {
    let declared: HashSet<&str> = description.states.iter().map(String::as_str).collect();

    let mut undefined = Vec::new();
    for t in &description.transitions {
        for state in [&t.state, &t.action.next_state] {
            if !declared.contains(state.as_str()) {
                undefined.push(format!("{t} -> {state}"));
            }
        }
    }

    if !undefined.is_empty() {
        return Err(AnalysisError::UndefinedStates(undefined));
    }

    Ok(())
}

fn check_rule_symbols(description: &MachineDescription) -> Result<(), AnalysisError> {
    let invalid: Vec<String> = description
        .transitions
        .iter()
        .filter(|t| {
            !description.tape_alphabet.contains(&t.read)
                || !description.tape_alphabet.contains(&t.action.write)
        })
        .map(ToString::to_string)
        .collect();

    if !invalid.is_empty() {
        return Err(AnalysisError::InvalidRuleSymbols(invalid));
    }

    Ok(())
}

fn check_window_radius(description: &MachineDescription) -> Result<(), AnalysisError> {
    match description.window_radius {
        Some(radius) if radius > MAX_WINDOW_RADIUS => {
            Err(AnalysisError::WindowRadiusTooLarge(radius))
        }
        _ => Ok(()),
    }
}
