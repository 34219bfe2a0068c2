//! Execution engine
//!
//! Drives one run over a program, line by line:
//!
//! ```text
//! raw line → parse → (EMPTY: nothing) → policy → effect or refusal → audit event
//! ```
//!
//! The interpreter is `RUNNING` until an `END` line halts it; no later line
//! is processed. A run never fails: unknown lines are skipped and blocked
//! lines are recorded as refusals.

pub mod sink;

pub use sink::{ActionSink, ConsoleSink, NullSink};

use crate::audit::AuditLog;
use crate::config::PolicyConfig;
use crate::parser::{first_integer, first_integer_text, parse_line};
use crate::policy::{decide, Decision, PolicyInput, RandomSource, SeededRandom};
use crate::types::{Command, ExecEvent, ExecStatus, Instruction, RunState};
use std::time::Duration;

/// Upper bound on a single `WAIT`, in milliseconds
pub const WAIT_CAP_MS: u64 = 2000;

/// Prompt used by `ASK` without an argument
pub const DEFAULT_ASK_PROMPT: &str = "Could you clarify?";

/// Task name announced by `DO` without an argument
pub const UNSPECIFIED_TASK: &str = "(unspecified task)";

const UNRECOGNIZED: &str = "unrecognized instruction";
const END_OF_PROGRAM: &str = "end of program";
const MINDFUL_PAUSE: &str = "mindful pause";

/// Interpreter for one policy configuration.
///
/// The random source is seeded once at construction. Every call to
/// [`Interpreter::run`] starts from a fresh [`RunState`] and audit log.
#[derive(Debug)]
pub struct Interpreter<R = SeededRandom, S = ConsoleSink> {
    config: PolicyConfig,
    random: R,
    sink: S,
    state: RunState,
    log: AuditLog,
}

impl Interpreter {
    /// Create an interpreter that prints to the console and draws from a
    /// generator seeded with `config.random_seed`.
    #[must_use]
    pub fn new(config: PolicyConfig) -> Self {
        let random = SeededRandom::new(config.random_seed);
        Self::with_parts(config, random, ConsoleSink::new())
    }
}

impl<S: ActionSink> Interpreter<SeededRandom, S> {
    /// Seeded interpreter with a custom sink
    #[must_use]
    pub fn with_sink(config: PolicyConfig, sink: S) -> Self {
        let random = SeededRandom::new(config.random_seed);
        Self::with_parts(config, random, sink)
    }
}

impl<R: RandomSource, S: ActionSink> Interpreter<R, S> {
    /// Create with custom random source and sink
    #[must_use]
    pub fn with_parts(config: PolicyConfig, random: R, sink: S) -> Self {
        Self {
            config,
            random,
            sink,
            state: RunState::new(),
            log: AuditLog::new(),
        }
    }

    /// Run a whole program and return its audit events in line order.
    ///
    /// Processing stops after an `END` line or when input is exhausted.
    pub fn run<I, L>(&mut self, lines: I) -> Vec<ExecEvent>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        self.state = RunState::new();
        self.log = AuditLog::new();
        tracing::info!(
            seed = self.config.random_seed,
            max_actions = self.config.max_actions_without_pause,
            "Starting run"
        );

        for (index, raw) in lines.into_iter().enumerate() {
            if self.state.halted {
                break;
            }
            self.exec_line(index + 1, raw.as_ref());
        }

        tracing::info!(
            events = self.log.len(),
            halted = self.state.halted,
            "Run finished"
        );
        self.log.events().to_vec()
    }

    /// Process one line and append its event, if any.
    ///
    /// Returns `None` for blank and comment lines and once halted.
    pub fn exec_line(&mut self, line_number: usize, raw: &str) -> Option<ExecEvent> {
        if self.state.halted {
            return None;
        }
        let instr = parse_line(raw);
        tracing::debug!(line = line_number, command = %instr.command, "Parsed line");

        let event = self.step(line_number, raw, &instr)?;
        self.log.append(event.clone());
        Some(event)
    }

    fn step(&mut self, line_number: usize, raw: &str, instr: &Instruction) -> Option<ExecEvent> {
        let event = |status, message: String| {
            ExecEvent::new(line_number, raw, instr.command, status, message)
        };

        match instr.command {
            Command::Empty => return None,
            Command::Invalid => return Some(event(ExecStatus::Skipped, UNRECOGNIZED.into())),
            Command::End => {
                self.state.halt();
                return Some(event(ExecStatus::Done, END_OF_PROGRAM.into()));
            }
            _ => {}
        }

        let input = PolicyInput {
            text: instr.argument.as_deref().unwrap_or(raw),
            has_urgency: instr.has_urgency,
            needs_context: instr.needs_context(),
            effectful: instr.command.is_effectful(),
        };
        if let Decision::PreferNot(rule) = decide(&input, &self.state, &self.config, &mut self.random) {
            tracing::debug!(line = line_number, rule = %rule, "Prefer not to");
            return Some(
                event(ExecStatus::PreferNot, rule.message().into()).with_context_needed(rule.context_prompt()),
            );
        }

        let argument = instr.argument.as_deref();
        let message = match instr.command {
            Command::Say => {
                let text = argument.unwrap_or_default();
                self.sink.say(text);
                self.state.record_action();
                format!("msg=\"{text}\"")
            }
            Command::Do => {
                self.sink.perform(argument.unwrap_or(UNSPECIFIED_TASK));
                self.state.record_action();
                format!("task=\"{}\"", argument.unwrap_or_default())
            }
            Command::Wait => {
                let requested = first_integer(raw);
                self.sink.wait(Duration::from_millis(requested.min(WAIT_CAP_MS)));
                self.state.record_action();
                format!("wait_ms={}", first_integer_text(raw))
            }
            Command::Ask => {
                let prompt = argument.unwrap_or(DEFAULT_ASK_PROMPT);
                self.sink.ask(prompt);
                self.state.record_action();
                format!("ask=\"{prompt}\"")
            }
            Command::Pause => {
                self.state.pause();
                MINDFUL_PAUSE.to_string()
            }
            // Resolved before the policy check
            Command::End | Command::Invalid | Command::Empty => return None,
        };
        Some(event(ExecStatus::Done, message))
    }

    /// Configuration this interpreter was built with
    #[must_use]
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// State of the current (or last) run
    #[must_use]
    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Audit log of the current (or last) run
    #[must_use]
    pub fn audit_log(&self) -> &AuditLog {
        &self.log
    }

    /// Sink receiving the effects
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Random source used by the pause rule
    #[must_use]
    pub fn random(&self) -> &R {
        &self.random
    }

    /// Whether an `END` line has been processed
    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.state.halted
    }
}
