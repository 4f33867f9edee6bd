//! Transition tables.
//!
//! A `TransitionTable` resolves `(state, symbol, memory)` to an `Action`. Plain machines use
//! the `Exact` variant, machines with an auxiliary memory register use `WithMemory`, which
//! allows wildcard memory guards. The engine only calls `lookup`, so it does not care which
//! flavor it is driving.

use crate::types::{
    Action, MatchPolicy, MemoryGuard, Mode, Symbol, Transition, TuringMachineError,
};
use std::collections::HashMap;

/// Rules keyed by state, then by read symbol. Lookups borrow the state label.
type Rules<V> = HashMap<String, HashMap<Symbol, V>>;

/// A compiled set of transition rules.
#[derive(Debug, Clone)]
pub enum TransitionTable {
    /// One rule per `(state, symbol)`.
    Exact {
        rules: Rules<Action>,
        mode: Mode,
    },
    /// Rules per `(state, symbol)` in registration order, each with a memory guard.
    WithMemory {
        rules: Rules<Vec<(MemoryGuard, Action)>>,
        mode: Mode,
        policy: MatchPolicy,
    },
}

impl TransitionTable {
    /// Creates an empty table without a memory register.
    pub fn exact(mode: Mode) -> Self {
        TransitionTable::Exact {
            rules: HashMap::new(),
            mode,
        }
    }

    /// Creates an empty table whose rules read and write the memory register.
    pub fn with_memory(mode: Mode, policy: MatchPolicy) -> Self {
        TransitionTable::WithMemory {
            rules: HashMap::new(),
            mode,
            policy,
        }
    }

    /// Registers a rule.
    ///
    /// A duplicate key is an error in `Mode::Strict`. In `Mode::Normal` the first
    /// registered rule keeps winning and the duplicate is only logged.
    pub fn add(&mut self, transition: Transition) -> Result<(), TuringMachineError> {
        match self {
            TransitionTable::Exact { rules, mode } => {
                if transition.uses_memory() {
                    return Err(TuringMachineError::ConfigurationError(format!(
                        "Rule {transition} uses the memory register but the machine has none"
                    )));
                }

                let by_symbol = rules.entry(transition.state.clone()).or_default();
                if by_symbol.contains_key(&transition.read) {
                    return duplicate(&transition, *mode);
                }
                by_symbol.insert(transition.read, transition.action);
            }
            TransitionTable::WithMemory { rules, mode, .. } => {
                let candidates = rules
                    .entry(transition.state.clone())
                    .or_default()
                    .entry(transition.read)
                    .or_default();

                if candidates.iter().any(|(guard, _)| *guard == transition.guard) {
                    return duplicate(&transition, *mode);
                }
                candidates.push((transition.guard, transition.action));
            }
        }

        Ok(())
    }

    /// Finds the action for the given configuration.
    ///
    /// For memory tables a candidate matches when its guard is the wildcard or equals
    /// `memory`; ties are broken by the table's `MatchPolicy`.
    pub fn lookup(&self, state: &str, symbol: Symbol, memory: Option<&str>) -> Option<&Action> {
        match self {
            TransitionTable::Exact { rules, .. } => rules.get(state)?.get(&symbol),
            TransitionTable::WithMemory { rules, policy, .. } => {
                let candidates = rules.get(state)?.get(&symbol)?;
                let mut matching = candidates
                    .iter()
                    .filter(|(guard, _)| guard.matches(memory));

                match policy {
                    MatchPolicy::FirstRegistered => matching.next(),
                    MatchPolicy::Specific => matching
                        .clone()
                        .find(|(guard, _)| !guard.is_wildcard())
                        .or_else(|| matching.next()),
                }
                .map(|(_, action)| action)
            }
        }
    }

    /// Whether rules in this table read and write the memory register.
    pub fn has_memory(&self) -> bool {
        matches!(self, TransitionTable::WithMemory { .. })
    }

    /// Total number of registered rules.
    pub fn len(&self) -> usize {
        match self {
            TransitionTable::Exact { rules, .. } => rules.values().map(HashMap::len).sum(),
            TransitionTable::WithMemory { rules, .. } => rules
                .values()
                .flat_map(HashMap::values)
                .map(Vec::len)
                .sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handles a rule whose key is already registered.
fn duplicate(transition: &Transition, mode: Mode) -> Result<(), TuringMachineError> {
    match mode {
        Mode::Strict => Err(TuringMachineError::ConfigurationError(format!(
            "Duplicate transition rule: {transition}"
        ))),
        Mode::Normal => {
            tracing::warn!(rule = %transition, "duplicate transition ignored, first rule wins");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    fn rule(
        state: &str,
        read: char,
        guard: MemoryGuard,
        next: &str,
        memory: Option<&str>,
    ) -> Transition {
        Transition {
            state: state.to_string(),
            read,
            guard,
            action: Action {
                next_state: next.to_string(),
                write: read,
                direction: Direction::Right,
                memory: memory.map(str::to_string),
            },
        }
    }

    fn exact(state: &str, read: char, next: &str) -> Transition {
        rule(state, read, MemoryGuard::Any, next, None)
    }

    #[test]
    fn test_exact_lookup() {
        let mut table = TransitionTable::exact(Mode::Normal);
        table.add(exact("q0", 'a', "q1")).unwrap();
        table.add(exact("q0", 'b', "q2")).unwrap();

        assert_eq!(table.lookup("q0", 'a', None).unwrap().next_state, "q1");
        assert_eq!(table.lookup("q0", 'b', Some("ignored")).unwrap().next_state, "q2");
        assert!(table.lookup("q0", 'c', None).is_none());
        assert!(table.lookup("q1", 'a', None).is_none());
        assert_eq!(table.len(), 2);
        assert!(!table.has_memory());
    }

    #[test]
    fn test_exact_duplicate_first_wins() {
        let mut table = TransitionTable::exact(Mode::Normal);
        table.add(exact("q0", 'a', "first")).unwrap();
        table.add(exact("q0", 'a', "second")).unwrap();

        assert_eq!(table.lookup("q0", 'a', None).unwrap().next_state, "first");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_exact_duplicate_strict() {
        let mut table = TransitionTable::exact(Mode::Strict);
        table.add(exact("q0", 'a', "first")).unwrap();

        let error = table.add(exact("q0", 'a', "second")).unwrap_err();
        assert!(error.to_string().contains("Duplicate transition rule: (q0, a)"));
    }

    #[test]
    fn test_exact_rejects_memory_rules() {
        let mut table = TransitionTable::exact(Mode::Normal);
        let result = table.add(rule("q0", 'a', MemoryGuard::Equals("x".into()), "q1", None));

        assert!(matches!(
            result,
            Err(TuringMachineError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_specific_guard_beats_wildcard() {
        for wildcard_first in [true, false] {
            let mut table = TransitionTable::with_memory(Mode::Normal, MatchPolicy::Specific);
            let wildcard = rule("q0", 'a', MemoryGuard::Any, "wild", None);
            let specific = rule("q0", 'a', MemoryGuard::Equals("x".into()), "exact", None);

            if wildcard_first {
                table.add(wildcard).unwrap();
                table.add(specific).unwrap();
            } else {
                table.add(specific).unwrap();
                table.add(wildcard).unwrap();
            }

            assert_eq!(table.lookup("q0", 'a', Some("x")).unwrap().next_state, "exact");
            assert_eq!(table.lookup("q0", 'a', Some("y")).unwrap().next_state, "wild");
            assert_eq!(table.lookup("q0", 'a', None).unwrap().next_state, "wild");
        }
    }

    #[test]
    fn test_first_registered_policy() {
        let mut table = TransitionTable::with_memory(Mode::Normal, MatchPolicy::FirstRegistered);
        table.add(rule("q0", 'a', MemoryGuard::Any, "wild", None)).unwrap();
        table
            .add(rule("q0", 'a', MemoryGuard::Equals("x".into()), "exact", None))
            .unwrap();

        assert_eq!(table.lookup("q0", 'a', Some("x")).unwrap().next_state, "wild");
    }

    #[test]
    fn test_memory_guard_without_wildcard() {
        let mut table = TransitionTable::with_memory(Mode::Normal, MatchPolicy::Specific);
        table
            .add(rule("q0", 'a', MemoryGuard::Equals("x".into()), "q1", Some("y")))
            .unwrap();

        assert_eq!(
            table.lookup("q0", 'a', Some("x")).unwrap().memory.as_deref(),
            Some("y")
        );
        assert!(table.lookup("q0", 'a', Some("z")).is_none());
        assert!(table.lookup("q0", 'a', None).is_none());
        assert!(table.has_memory());
    }

    #[test]
    fn test_memory_duplicate_strict() {
        let mut table = TransitionTable::with_memory(Mode::Strict, MatchPolicy::Specific);
        table.add(rule("q0", 'a', MemoryGuard::Any, "q1", None)).unwrap();
        table
            .add(rule("q0", 'a', MemoryGuard::Equals("x".into()), "q1", None))
            .unwrap();

        let result = table.add(rule("q0", 'a', MemoryGuard::Any, "q2", None));
        assert!(result.is_err());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_memory_duplicate_first_wins() {
        let mut table = TransitionTable::with_memory(Mode::Normal, MatchPolicy::Specific);
        table
            .add(rule("q0", 'a', MemoryGuard::Equals("x".into()), "first", None))
            .unwrap();
        table
            .add(rule("q0", 'a', MemoryGuard::Equals("x".into()), "second", None))
            .unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("q0", 'a', Some("x")).unwrap().next_state, "first");
    }
}
