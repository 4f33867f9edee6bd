//! This module defines the `Program` struct, the validated and immutable definition of a
//! single-tape Turing Machine, and the `TuringMachine` struct, which simulates one run of a
//! program: tape contents, head position, memory register, step count and the ID log.

use crate::analyzer::{analyze, unreachable_states};
use crate::recorder::IdRecorder;
use crate::table::TransitionTable;
use crate::tape::{SparseTape, Tape};
use crate::types::{
    IdFormat, InputMode, MachineDescription, Outcome, Status, Step, Symbol, TuringMachineError,
    Verdict,
};
use std::collections::HashSet;

/// A validated machine definition.
///
/// A program never changes once built. Any number of `TuringMachine` runs can borrow the
/// same program.
#[derive(Debug, Clone)]
pub struct Program {
    name: String,
    states: Vec<String>,
    initial_state: String,
    final_states: HashSet<String>,
    input_alphabet: Vec<Symbol>,
    tape_alphabet: Vec<Symbol>,
    blank: Symbol,
    table: TransitionTable,
    inputs: Vec<String>,
    max_steps: usize,
    input_mode: InputMode,
    recorder: IdRecorder,
}

impl Program {
    /// Validates a description and compiles its transition table.
    ///
    /// # Returns
    ///
    /// * `Ok(Program)` if the description is well formed.
    /// * `Err(TuringMachineError::ConfigurationError)` naming the first problem found.
    pub fn new(description: MachineDescription) -> Result<Self, TuringMachineError> {
        analyze(&description)?;

        let unreachable = unreachable_states(&description);
        if !unreachable.is_empty() {
            tracing::warn!(
                machine = %description.name,
                states = ?unreachable,
                "unreachable states"
            );
        }

        let mut table = if description.memory {
            TransitionTable::with_memory(description.mode, description.match_policy)
        } else {
            TransitionTable::exact(description.mode)
        };
        for transition in description.transitions {
            table.add(transition)?;
        }

        tracing::debug!(
            machine = %description.name,
            states = description.states.len(),
            rules = table.len(),
            "program built"
        );

        Ok(Self {
            name: description.name,
            states: description.states,
            initial_state: description.initial_state,
            final_states: description.final_states.into_iter().collect(),
            input_alphabet: description.input_alphabet,
            tape_alphabet: description.tape_alphabet,
            blank: description.blank,
            table,
            inputs: description.inputs,
            max_steps: description.max_steps,
            input_mode: description.input_mode,
            recorder: IdRecorder::new(description.id_format, description.window_radius),
        })
    }

    /// Replaces the ID format. Meant for front ends that let the user pick one.
    pub fn with_id_format(mut self, format: IdFormat, radius: Option<usize>) -> Self {
        self.recorder = IdRecorder::new(format, radius);
        self
    }

    /// Replaces the default step budget.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    /// Checks if `state` is an accepting state.
    pub fn is_final(&self, state: &str) -> bool {
        self.final_states.contains(state)
    }

    pub fn input_alphabet(&self) -> &[Symbol] {
        &self.input_alphabet
    }

    pub fn tape_alphabet(&self) -> &[Symbol] {
        &self.tape_alphabet
    }

    pub fn blank(&self) -> Symbol {
        self.blank
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// Input strings declared by the description.
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    /// The step budget used by `TuringMachine::run_default`.
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    pub fn recorder(&self) -> &IdRecorder {
        &self.recorder
    }

    /// Runs every input on a fresh machine with the default step budget.
    ///
    /// Each input gets its own result, so a rejected input symbol does not affect the
    /// other runs.
    pub fn run_batch<S: AsRef<str>>(
        &self,
        inputs: &[S],
    ) -> Vec<Result<Verdict, TuringMachineError>> {
        inputs
            .iter()
            .map(|input| {
                let mut machine = TuringMachine::<SparseTape>::new(self);
                machine.reset(input.as_ref())?;
                Ok(machine.run_default())
            })
            .collect()
    }
}

/// One run of a `Program` on a single tape.
///
/// The tape representation is a type parameter; the engine only uses the `Tape` trait.
pub struct TuringMachine<'p, T: Tape = SparseTape> {
    program: &'p Program,
    state: String,
    tape: T,
    head: i64,
    memory: Option<String>,
    step_count: usize,
    ids: Vec<String>,
    status: Status,
}

impl<'p, T: Tape> TuringMachine<'p, T> {
    /// Creates a machine for `program`, loaded with the empty input.
    pub fn new(program: &'p Program) -> Self {
        let mut machine = Self {
            program,
            state: program.initial_state.clone(),
            tape: T::new(program.blank),
            head: 0,
            memory: None,
            step_count: 0,
            ids: Vec::new(),
            status: Status::Ready,
        };
        machine.load("");
        machine
    }

    /// Loads an input string and resets the run.
    ///
    /// The input is written left-aligned from position 0 on a fresh tape; an empty input
    /// leaves a single blank cell under the head. State, head, memory, step count and ID
    /// log are reset and the initial ID is recorded.
    ///
    /// # Returns
    ///
    /// * `Err(TuringMachineError::InvalidInputSymbol)` if the program validates input and a
    ///   character is outside the tape alphabet. The machine is left untouched.
    pub fn reset(&mut self, input: &str) -> Result<(), TuringMachineError> {
        if self.program.input_mode == InputMode::Validated {
            if let Some((position, symbol)) = input
                .chars()
                .enumerate()
                .find(|(_, c)| !self.program.tape_alphabet.contains(c))
            {
                return Err(TuringMachineError::InvalidInputSymbol { symbol, position });
            }
        }

        self.load(input);
        tracing::debug!(machine = %self.program.name, input, "input loaded");
        Ok(())
    }

    fn load(&mut self, input: &str) {
        self.tape = T::new(self.program.blank);
        for (position, symbol) in input.chars().enumerate() {
            self.tape.write(position as i64, symbol);
        }
        if input.is_empty() {
            self.tape.write(0, self.program.blank);
        }

        self.head = 0;
        self.state = self.program.initial_state.clone();
        self.memory = None;
        self.step_count = 0;
        self.status = Status::Ready;
        self.ids = vec![self.current_id()];
    }

    /// Executes a single step.
    ///
    /// Reads the symbol under the head and looks up a rule for the current state, symbol
    /// and memory register. When a rule matches, its symbol is written, the register is
    /// updated (memory programs only), the head moves, the state changes and the new ID is
    /// appended to the log.
    ///
    /// # Returns
    ///
    /// * `Step::Applied` if a rule was applied.
    /// * `Step::NoTransition` if no rule matches. Nothing is changed.
    pub fn step(&mut self) -> Step {
        let symbol = self.tape.read(self.head);
        let Some(action) = self
            .program
            .table
            .lookup(&self.state, symbol, self.memory.as_deref())
        else {
            return Step::NoTransition;
        };

        if self.status == Status::Ready {
            self.status = Status::Running;
        }

        self.tape.write(self.head, action.write);
        if self.program.table.has_memory() {
            self.memory = action.memory.clone();
        }
        self.head += action.direction.offset();
        self.state = action.next_state.clone();
        self.step_count += 1;
        self.ids.push(self.current_id());

        tracing::debug!(
            step = self.step_count,
            state = %self.state,
            head = self.head,
            "step applied"
        );
        Step::Applied
    }

    /// Runs until the machine accepts, rejects or uses up `budget` steps.
    ///
    /// Acceptance is checked before every step attempt: entering a final state accepts
    /// even when a rule could still fire from it. A machine that stops in a non-final state
    /// is rejected. The budget counts every step applied since the input was loaded.
    pub fn run(&mut self, budget: usize) -> Verdict {
        self.status = Status::Running;

        let (accepted, step_limit_hit) = loop {
            if self.is_accepting() {
                break (true, false);
            }
            if self.step_count >= budget {
                break (false, true);
            }

            match self.step() {
                Step::NoTransition => break (false, false),
                Step::Applied if self.step_count >= budget => break (self.is_accepting(), true),
                Step::Applied => {}
            }
        };

        let verdict = Verdict {
            accepted,
            steps: self.step_count,
            step_limit_hit,
            ids: self.ids.clone(),
        };
        self.status = Status::Halted(verdict.outcome());

        tracing::debug!(
            machine = %self.program.name,
            outcome = %verdict.outcome(),
            steps = verdict.steps,
            "run finished"
        );
        verdict
    }

    /// Runs with the program's default step budget.
    pub fn run_default(&mut self) -> Verdict {
        self.run(self.program.max_steps)
    }

    /// Renders the current configuration as an ID.
    pub fn current_id(&self) -> String {
        self.program
            .recorder
            .render(&self.state, &self.tape, self.head, self.memory.as_deref())
    }

    /// Checks if the current state is an accepting state.
    pub fn is_accepting(&self) -> bool {
        self.program.is_final(&self.state)
    }

    /// Returns the outcome of the last run, if it has finished.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.status {
            Status::Halted(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn program(&self) -> &Program {
        self.program
    }

    /// Returns the current state of the machine.
    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn tape(&self) -> &T {
        &self.tape
    }

    pub fn head(&self) -> i64 {
        self.head
    }

    /// Returns the symbol under the head.
    pub fn symbol(&self) -> Symbol {
        self.tape.read(self.head)
    }

    pub fn memory(&self) -> Option<&str> {
        self.memory.as_deref()
    }

    /// Returns the number of steps applied since the input was loaded.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Every ID recorded since the input was loaded.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// The ID log, one ID per line.
    pub fn export_ids(&self) -> String {
        self.ids.join("\n")
    }
}
