//! This module turns machine documents into `MachineDescription`s.
//!
//! Documents are YAML (JSON works too, being a subset) in one of two flavors:
//!
//! * the table flavor, with `states`, `tape_alphabet`, `blank_symbol` and a `transitions`
//!   mapping, either nested (`state -> symbol -> [next, write, move]`) or flat
//!   (`"(state, symbol)" -> [next, write, move]`);
//! * the delta flavor, with `q_states` and a `delta` list of `params`/`output` entries
//!   driving a memory register.
//!
//! Flat transition keys are parsed with the `pest` grammar in `grammar.pest`.

use crate::machine::Program;
use crate::types::{
    Action, Direction, IdFormat, InputMode, MachineDescription, MatchPolicy, MemoryGuard, Mode,
    Symbol, Transition, TuringMachineError, DEFAULT_BLANK_SYMBOL, DEFAULT_WINDOW_RADIUS,
    DELTA_MAX_EXECUTION_STEPS, MAX_EXECUTION_STEPS, MAX_PROGRAM_SIZE, MEMORY_WILDCARD,
};
use pest::{iterators::Pair, Parser as PestParser};
use pest_derive::Parser as PestParser;
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::fmt;

/// Derives a `PestParser` for flat transition keys, defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct TransitionKeyParser;

/// Parses a document and builds a validated `Program` from it.
pub fn parse(input: &str) -> Result<Program, TuringMachineError> {
    Program::new(parse_description(input)?)
}

/// Parses a document into an unvalidated `MachineDescription`.
///
/// # Returns
///
/// * `Err(TuringMachineError::DocumentError)` if the text is not YAML or has the wrong shape.
/// * `Err(TuringMachineError::ConfigurationError)` if a rule or symbol is malformed.
/// * `Err(TuringMachineError::ParseError)` if a flat transition key is malformed.
pub fn parse_description(input: &str) -> Result<MachineDescription, TuringMachineError> {
    if input.len() > MAX_PROGRAM_SIZE {
        return Err(TuringMachineError::DocumentError(format!(
            "Document is larger than {MAX_PROGRAM_SIZE} bytes"
        )));
    }

    let document: Value = serde_yaml::from_str(input).map_err(document_error)?;
    if !document.is_mapping() {
        return Err(TuringMachineError::DocumentError(
            "Expected a mapping at the top level".to_string(),
        ));
    }

    if document.get("delta").is_some() {
        parse_delta_document(serde_yaml::from_value(document).map_err(document_error)?)
    } else {
        parse_table_document(serde_yaml::from_value(document).map_err(document_error)?)
    }
}

/// Parses a flat transition key such as `(q0, 1)` or `('q0', 'a', *)`.
///
/// Returns the state, the read symbol and the optional memory condition, unconverted.
pub fn parse_transition_key(
    key: &str,
) -> Result<(String, String, Option<String>), TuringMachineError> {
    let root = TransitionKeyParser::parse(Rule::transition_key, key.trim())
        .map_err(|e| TuringMachineError::ParseError(Box::new(e)))?
        .next()
        .ok_or_else(|| invalid_key(key))?;

    let mut fields = root
        .into_inner()
        .filter(|pair| pair.as_rule() == Rule::field)
        .map(parse_field);

    match (fields.next(), fields.next(), fields.next()) {
        (Some(state), Some(symbol), memory) => Ok((state, symbol, memory)),
        _ => Err(invalid_key(key)),
    }
}

/// Extracts the text of a `field`, without its quotes.
fn parse_field(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .next()
        .map(|inner| inner.as_str().to_string())
        .unwrap_or_default()
}

/// A scalar document value. Numbers and booleans are kept as their text; null and missing
/// values are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
struct Token(Option<String>);

impl Token {
    /// Text of the token, with empty strings treated like null.
    fn text(&self) -> Option<&str> {
        self.0.as_deref().filter(|s| !s.is_empty())
    }
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TokenVisitor;

        impl<'de> Visitor<'de> for TokenVisitor {
            type Value = Token;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a string, number, boolean or null")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Token, E> {
                Ok(Token(Some(v.to_string())))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Token, E> {
                Ok(Token(Some(v)))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Token, E> {
                Ok(Token(Some(v.to_string())))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Token, E> {
                Ok(Token(Some(v.to_string())))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Token, E> {
                Ok(Token(Some(v.to_string())))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Token, E> {
                Ok(Token(Some(v.to_string())))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Token, E> {
                Ok(Token(None))
            }

            fn visit_none<E: de::Error>(self) -> Result<Token, E> {
                Ok(Token(None))
            }

            fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Token, D::Error> {
                Token::deserialize(deserializer)
            }
        }

        deserializer.deserialize_any(TokenVisitor)
    }
}

/// A field that may hold one label or a list of them, like `final: q2` or `final: [q2]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Token>),
    One(Token),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<Token> {
        match self {
            OneOrMany::Many(tokens) => tokens,
            OneOrMany::One(token) => vec![token],
        }
    }
}

/// Keys shared by both document flavors.
#[derive(Debug, Default, Deserialize)]
struct Options {
    #[serde(default)]
    mode: Mode,
    #[serde(default)]
    match_policy: MatchPolicy,
    #[serde(default)]
    input_mode: InputMode,
    id_format: Option<IdFormat>,
    window_radius: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct TableDocument {
    name: Option<String>,
    states: Vec<Token>,
    #[serde(default)]
    input_alphabet: Vec<Token>,
    tape_alphabet: Vec<Token>,
    #[serde(default)]
    blank_symbol: Token,
    initial_state: Token,
    final_states: OneOrMany,
    transitions: Mapping,
    #[serde(default)]
    inputs: Vec<Token>,
    max_steps: Option<usize>,
    #[serde(default)]
    memory: bool,
    #[serde(flatten)]
    options: Options,
}

#[derive(Debug, Deserialize)]
struct DeltaDocument {
    name: Option<String>,
    q_states: QStates,
    #[serde(default)]
    alphabet: Vec<Token>,
    #[serde(default)]
    tape_alphabet: Vec<Token>,
    #[serde(default)]
    blank_symbol: Token,
    delta: Vec<DeltaEntry>,
    #[serde(default)]
    simulation_strings: Vec<Token>,
    max_steps: Option<usize>,
    #[serde(flatten)]
    options: Options,
}

#[derive(Debug, Deserialize)]
struct QStates {
    #[serde(default)]
    q_list: Vec<Token>,
    initial: Token,
    #[serde(rename = "final")]
    finals: OneOrMany,
}

#[derive(Debug, Deserialize)]
struct DeltaEntry {
    params: DeltaParams,
    output: DeltaOutput,
}

#[derive(Debug, Deserialize)]
struct DeltaParams {
    initial_state: Token,
    #[serde(default)]
    mem_cache_value: Token,
    #[serde(default)]
    tape_input: Token,
}

#[derive(Debug, Deserialize)]
struct DeltaOutput {
    final_state: Token,
    #[serde(default)]
    mem_cache_value: Token,
    #[serde(default)]
    tape_output: Token,
    #[serde(default)]
    tape_displacement: Token,
}

/// Converts a table-flavored document.
fn parse_table_document(doc: TableDocument) -> Result<MachineDescription, TuringMachineError> {
    let blank = parse_symbol(&doc.blank_symbol, DEFAULT_BLANK_SYMBOL, "blank_symbol")?;
    let transitions = parse_transitions(&doc.transitions, blank)?;
    let memory = doc.memory || transitions.iter().any(Transition::uses_memory);
    let id_format = doc.options.id_format.unwrap_or(IdFormat::Tuple);
    let window_radius = match doc.options.window_radius {
        Some(radius) => Some(radius),
        None if id_format == IdFormat::Tuple => Some(DEFAULT_WINDOW_RADIUS),
        None => None,
    };

    Ok(MachineDescription {
        name: doc.name.unwrap_or_else(|| "Untitled".to_string()),
        states: parse_labels(&doc.states, "states")?,
        initial_state: parse_label(&doc.initial_state, "initial_state")?,
        final_states: parse_labels(&doc.final_states.into_vec(), "final_states")?,
        input_alphabet: parse_symbols(&doc.input_alphabet, blank, "input_alphabet")?,
        tape_alphabet: parse_symbols(&doc.tape_alphabet, blank, "tape_alphabet")?,
        blank,
        transitions,
        memory,
        inputs: parse_inputs(&doc.inputs),
        max_steps: doc.max_steps.unwrap_or(MAX_EXECUTION_STEPS),
        mode: doc.options.mode,
        match_policy: doc.options.match_policy,
        input_mode: doc.options.input_mode,
        id_format,
        window_radius,
    })
}

/// Converts a delta-flavored document. The blank is implied and always part of the tape
/// alphabet.
fn parse_delta_document(doc: DeltaDocument) -> Result<MachineDescription, TuringMachineError> {
    let blank = parse_symbol(&doc.blank_symbol, DEFAULT_BLANK_SYMBOL, "blank_symbol")?;

    let mut tape_alphabet = parse_symbols(&doc.tape_alphabet, blank, "tape_alphabet")?;
    if !tape_alphabet.contains(&blank) {
        tape_alphabet.push(blank);
    }

    let transitions = doc
        .delta
        .iter()
        .enumerate()
        .map(|(i, entry)| parse_delta_entry(entry, blank, &format!("delta[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MachineDescription {
        name: doc.name.unwrap_or_else(|| "Untitled".to_string()),
        states: parse_labels(&doc.q_states.q_list, "q_states.q_list")?,
        initial_state: parse_label(&doc.q_states.initial, "q_states.initial")?,
        final_states: parse_labels(&doc.q_states.finals.into_vec(), "q_states.final")?,
        input_alphabet: parse_symbols(&doc.alphabet, blank, "alphabet")?,
        tape_alphabet,
        blank,
        transitions,
        memory: true,
        inputs: parse_inputs(&doc.simulation_strings),
        max_steps: doc.max_steps.unwrap_or(DELTA_MAX_EXECUTION_STEPS),
        mode: doc.options.mode,
        match_policy: doc.options.match_policy,
        input_mode: doc.options.input_mode,
        id_format: doc.options.id_format.unwrap_or(IdFormat::Labeled),
        window_radius: doc.options.window_radius,
    })
}

fn parse_delta_entry(
    entry: &DeltaEntry,
    blank: Symbol,
    context: &str,
) -> Result<Transition, TuringMachineError> {
    let direction = match entry.output.tape_displacement.text() {
        Some(token) => parse_direction(token, context)?,
        None => Direction::Stay,
    };

    Ok(Transition {
        state: parse_label(&entry.params.initial_state, context)?,
        read: parse_symbol(&entry.params.tape_input, blank, context)?,
        guard: parse_guard(entry.params.mem_cache_value.text()),
        action: Action {
            next_state: parse_label(&entry.output.final_state, context)?,
            write: parse_symbol(&entry.output.tape_output, blank, context)?,
            direction,
            memory: entry.output.mem_cache_value.text().map(str::to_string),
        },
    })
}

/// Parses the `transitions` mapping of a table document, in either nested or flat form.
fn parse_transitions(map: &Mapping, blank: Symbol) -> Result<Vec<Transition>, TuringMachineError> {
    let nested = map.values().filter(|v| v.is_mapping()).count();
    if nested != 0 && nested != map.len() {
        return Err(TuringMachineError::ConfigurationError(
            "Inconsistent transition format: nested and flat rules are mixed".to_string(),
        ));
    }

    let mut transitions = Vec::new();
    for (key, value) in map {
        if let Value::Mapping(inner) = value {
            let state = parse_label(&token(key)?, "transitions")?;
            for (symbol, values) in inner {
                let context = format!("({state}, {})", token(symbol)?.text().unwrap_or(""));
                let read = parse_symbol(&token(symbol)?, blank, &context)?;
                transitions.push(parse_rule(
                    state.clone(),
                    read,
                    MemoryGuard::Any,
                    values,
                    blank,
                    &context,
                )?);
            }
        } else {
            let key = token(key)?
                .0
                .ok_or_else(|| invalid_key("null"))?;
            let (state, symbol, memory) = parse_transition_key(&key)?;
            let read = parse_symbol(&Token(Some(symbol)), blank, &key)?;
            let guard = parse_guard(memory.as_deref().filter(|m| !m.is_empty()));
            transitions.push(parse_rule(state, read, guard, value, blank, &key)?);
        }
    }

    Ok(transitions)
}

/// Parses `[next, write, move]` or `[next, write, move, memory]`.
fn parse_rule(
    state: String,
    read: Symbol,
    guard: MemoryGuard,
    values: &Value,
    blank: Symbol,
    context: &str,
) -> Result<Transition, TuringMachineError> {
    let values: Vec<Token> = serde_yaml::from_value(values.clone()).map_err(|_| {
        TuringMachineError::ConfigurationError(format!(
            "Malformed transition for {context}: expected a list of values"
        ))
    })?;

    if values.len() != 3 && values.len() != 4 {
        return Err(TuringMachineError::ConfigurationError(format!(
            "Malformed transition for {context}: expected 3 or 4 values, found {}",
            values.len()
        )));
    }

    let direction = parse_direction(values[2].text().unwrap_or(""), context)?;

    Ok(Transition {
        state,
        read,
        guard,
        action: Action {
            next_state: parse_label(&values[0], context)?,
            write: parse_symbol(&values[1], blank, context)?,
            direction,
            memory: values
                .get(3)
                .and_then(Token::text)
                .map(str::to_string),
        },
    })
}

fn parse_direction(token: &str, context: &str) -> Result<Direction, TuringMachineError> {
    token.parse().map_err(|_| {
        TuringMachineError::ConfigurationError(format!("Invalid move {token:?} in {context}"))
    })
}

fn parse_guard(memory: Option<&str>) -> MemoryGuard {
    match memory {
        None | Some(MEMORY_WILDCARD) => MemoryGuard::Any,
        Some(value) => MemoryGuard::Equals(value.to_string()),
    }
}

/// Converts a token into a symbol. Null and empty tokens stand for the blank.
fn parse_symbol(token: &Token, blank: Symbol, context: &str) -> Result<Symbol, TuringMachineError> {
    let Some(text) = token.text() else {
        return Ok(blank);
    };

    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => Err(TuringMachineError::ConfigurationError(format!(
            "Symbol {text:?} in {context} must be a single character"
        ))),
    }
}

fn parse_symbols(
    tokens: &[Token],
    blank: Symbol,
    context: &str,
) -> Result<Vec<Symbol>, TuringMachineError> {
    tokens
        .iter()
        .map(|token| parse_symbol(token, blank, context))
        .collect()
}

fn parse_label(token: &Token, context: &str) -> Result<String, TuringMachineError> {
    token.text().map(str::to_string).ok_or_else(|| {
        TuringMachineError::ConfigurationError(format!("Missing state label in {context}"))
    })
}

fn parse_labels(tokens: &[Token], context: &str) -> Result<Vec<String>, TuringMachineError> {
    tokens.iter().map(|token| parse_label(token, context)).collect()
}

fn parse_inputs(tokens: &[Token]) -> Vec<String> {
    tokens
        .iter()
        .map(|token| token.0.clone().unwrap_or_default())
        .collect()
}

fn token(value: &Value) -> Result<Token, TuringMachineError> {
    serde_yaml::from_value(value.clone()).map_err(document_error)
}

fn invalid_key(key: &str) -> TuringMachineError {
    TuringMachineError::ConfigurationError(format!("Invalid transition key: {key}"))
}

fn document_error(error: serde_yaml::Error) -> TuringMachineError {
    TuringMachineError::DocumentError(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NESTED: &str = r#"
name: Unary increment
states: [q0, qf]
input_alphabet: ['1']
tape_alphabet: ['1', '_']
blank_symbol: '_'
initial_state: q0
final_states: [qf]
transitions:
  q0:
    '1': [q0, '1', R]
    '_': [qf, '1', N]
inputs: ['111', '']
"#;

    #[test]
    fn test_parse_nested_table() {
        let desc = parse_description(NESTED).unwrap();

        assert_eq!(desc.name, "Unary increment");
        assert_eq!(desc.states, vec!["q0", "qf"]);
        assert_eq!(desc.blank, '_');
        assert_eq!(desc.inputs, vec!["111", ""]);
        assert_eq!(desc.max_steps, MAX_EXECUTION_STEPS);
        assert_eq!(desc.id_format, IdFormat::Tuple);
        assert_eq!(desc.window_radius, Some(DEFAULT_WINDOW_RADIUS));
        assert!(!desc.memory);
        assert_eq!(desc.transitions.len(), 2);
        assert_eq!(
            desc.transitions[1].action,
            Action {
                next_state: "qf".to_string(),
                write: '1',
                direction: Direction::Stay,
                memory: None,
            }
        );
    }

    #[test]
    fn test_parse_flat_table() {
        let input = r#"
states: [q0, q1, q2]
input_alphabet: [0, 1]
tape_alphabet: [0, 1, B]
blank_symbol: B
initial_state: q0
final_states: q2
transitions:
  "(q0, 0)": [q0, 0, R]
  "('q0', '1')": [q1, 1, R]
  "(q1, B)": [q2, B, L]
max_steps: 50
"#;
        let desc = parse_description(input).unwrap();

        assert_eq!(desc.input_alphabet, vec!['0', '1']);
        assert_eq!(desc.final_states, vec!["q2"]);
        assert_eq!(desc.max_steps, 50);
        assert_eq!(desc.transitions[1].state, "q0");
        assert_eq!(desc.transitions[1].read, '1');
        assert_eq!(desc.transitions[2].action.direction, Direction::Left);
    }

    #[test]
    fn test_parse_flat_table_with_memory() {
        let input = r#"
states: [q0, q1]
tape_alphabet: [a, _]
initial_state: q0
final_states: [q1]
transitions:
  "(q0, a, *)": [q0, a, R, x]
  "(q0, _, x)": [q1, _, S]
"#;
        let desc = parse_description(input).unwrap();

        assert!(desc.memory);
        assert_eq!(desc.transitions[0].guard, MemoryGuard::Any);
        assert_eq!(desc.transitions[0].action.memory.as_deref(), Some("x"));
        assert_eq!(desc.transitions[1].guard, MemoryGuard::Equals("x".into()));
    }

    #[test]
    fn test_parse_delta_document() {
        let input = r#"
q_states:
  q_list: ['0', '1']
  initial: '0'
  final: '1'
alphabet: [a]
tape_alphabet: [a, X]
delta:
  - params:
      initial_state: '0'
      mem_cache_value: ''
      tape_input: a
    output:
      final_state: '0'
      mem_cache_value: a
      tape_output: X
      tape_displacement: R
  - params:
      initial_state: '0'
      tape_input: ''
    output:
      final_state: '1'
simulation_strings: [aa, '']
"#;
        let desc = parse_description(input).unwrap();

        assert!(desc.memory);
        assert_eq!(desc.states, vec!["0", "1"]);
        assert_eq!(desc.final_states, vec!["1"]);
        assert_eq!(desc.tape_alphabet, vec!['a', 'X', '_']);
        assert_eq!(desc.max_steps, DELTA_MAX_EXECUTION_STEPS);
        assert_eq!(desc.id_format, IdFormat::Labeled);
        assert_eq!(desc.window_radius, None);
        assert_eq!(desc.transitions[0].guard, MemoryGuard::Any);
        assert_eq!(desc.transitions[0].action.memory.as_deref(), Some("a"));
        assert_eq!(desc.transitions[1].read, '_');
        assert_eq!(desc.transitions[1].action.write, '_');
        assert_eq!(desc.transitions[1].action.direction, Direction::Stay);
        assert_eq!(desc.inputs, vec!["aa", ""]);
    }

    #[test]
    fn test_parse_numeric_symbols() {
        let input = r#"
states: [q0, 1]
input_alphabet: [1]
tape_alphabet: [1, 0, _]
initial_state: q0
final_states: [1]
transitions:
  q0:
    1: [1, 0, R]
inputs: [111]
"#;
        let desc = parse_description(input).unwrap();

        assert_eq!(desc.states, vec!["q0", "1"]);
        assert_eq!(desc.transitions[0].read, '1');
        assert_eq!(desc.transitions[0].action.write, '0');
        assert_eq!(desc.inputs, vec!["111"]);
    }

    #[test]
    fn test_parse_options() {
        let input = format!(
            "{NESTED}mode: strict\nmatch_policy: first_registered\n\
             input_mode: bare\nid_format: labeled\n"
        );
        let desc = parse_description(&input).unwrap();

        assert_eq!(desc.mode, Mode::Strict);
        assert_eq!(desc.match_policy, MatchPolicy::FirstRegistered);
        assert_eq!(desc.input_mode, InputMode::Bare);
        assert_eq!(desc.id_format, IdFormat::Labeled);
        assert_eq!(desc.window_radius, None);
    }

    #[test]
    fn test_parse_oversized_window_radius() {
        let input = r#"
states: [q0, qf]
tape_alphabet: ['1', '_']
initial_state: q0
final_states: [qf]
window_radius: 18446744073709551615
transitions:
  q0:
    '1': [q0, '1', L]
    '_': [qf, '_', N]
"#;
        // The value itself fits a usize; building the program rejects it.
        let desc = parse_description(input).unwrap();
        assert_eq!(desc.window_radius, Some(usize::MAX));

        let error = parse(input).unwrap_err();
        assert!(matches!(error, TuringMachineError::ConfigurationError(_)));
        assert!(error.to_string().contains("window_radius"));

        let program = parse(&input.replace("18446744073709551615", "1")).unwrap();
        let verdict = program.run_batch(&["1"]).remove(0).unwrap();
        assert_eq!(verdict.ids, vec!["(q0, _1_, 1)", "(q0, __1, 1)", "(qf, __1, 1)"]);
    }

    #[test]
    fn test_parse_wrong_arity() {
        let input = NESTED.replace("[q0, '1', R]", "[q0, '1']");
        let error = parse_description(&input).unwrap_err();

        assert!(matches!(error, TuringMachineError::ConfigurationError(_)));
        assert!(error
            .to_string()
            .contains("Malformed transition for (q0, 1): expected 3 or 4 values, found 2"));
    }

    #[test]
    fn test_parse_invalid_move() {
        let input = NESTED.replace("[q0, '1', R]", "[q0, '1', X]");
        let error = parse_description(&input).unwrap_err();

        assert!(error.to_string().contains("Invalid move \"X\" in (q0, 1)"));
    }

    #[test]
    fn test_parse_multi_character_symbol() {
        let input = NESTED.replace("tape_alphabet: ['1', '_']", "tape_alphabet: ['11', '_']");
        let error = parse_description(&input).unwrap_err();

        assert!(error.to_string().contains("must be a single character"));
    }

    #[test]
    fn test_parse_mixed_transition_forms() {
        let input = r#"
states: [q0]
tape_alphabet: [a, _]
initial_state: q0
final_states: [q0]
transitions:
  q0:
    a: [q0, a, R]
  "(q0, _)": [q0, _, R]
"#;
        let error = parse_description(input).unwrap_err();
        assert!(error.to_string().contains("Inconsistent transition format"));
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let error = parse_description("states: [q0").unwrap_err();
        assert!(matches!(error, TuringMachineError::DocumentError(_)));

        let error = parse_description("- just\n- a list").unwrap_err();
        assert!(matches!(error, TuringMachineError::DocumentError(_)));
    }

    #[test]
    fn test_parse_missing_section() {
        let error = parse_description("states: [q0]\ntape_alphabet: [_]").unwrap_err();
        assert!(matches!(error, TuringMachineError::DocumentError(_)));
    }

    #[test]
    fn test_parse_validates_program() {
        let input = NESTED.replace("tape_alphabet: ['1', '_']", "tape_alphabet: ['1']");

        // The description itself parses; building the program fails.
        assert!(parse_description(&input).is_ok());
        let error = parse(&input).unwrap_err();
        assert!(error.to_string().contains("blank symbol"));
    }

    #[test]
    fn test_transition_keys() {
        assert_eq!(
            parse_transition_key("(q0, 1)").unwrap(),
            ("q0".to_string(), "1".to_string(), None)
        );
        assert_eq!(
            parse_transition_key("('q0', \"a\", *)").unwrap(),
            ("q0".to_string(), "a".to_string(), Some("*".to_string()))
        );
        assert_eq!(
            parse_transition_key("(q0, '')").unwrap(),
            ("q0".to_string(), String::new(), None)
        );
    }

    #[test]
    fn test_invalid_transition_keys() {
        for key in ["q0, 1", "(q0)", "(q0, 1, 2, 3)", "(q0, 1"] {
            let error = parse_transition_key(key).unwrap_err();
            assert!(
                matches!(error, TuringMachineError::ParseError(_)),
                "{key} should not parse"
            );
        }
    }
}
