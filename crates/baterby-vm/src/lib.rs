//! Baterby VM
//!
//! A line-oriented interpreter for a tiny scripting language that can
//! *prefer not to* run an instruction. Each line is parsed, checked against
//! a priority chain of refusal rules, then either executed or recorded as a
//! structured refusal in an audit log.
//!
//! # Language
//!
//! ```text
//! SAY "text"     emit text
//! DO  "task"     simulate performing a task
//! WAIT ms        suspend for up to 2000 ms
//! PAUSE          conscious pause, resets action fatigue
//! ASK "question" emit a clarification request
//! END            halt
//! ```
//!
//! A trailing `!` marks urgency, a trailing `?` marks uncertainty.
//!
//! # Example
//!
//! ```rust
//! use baterby_vm::prelude::*;
//!
//! let config = PolicyConfig::new().with_prefer_not_probability(0.0);
//! let mut vm = Interpreter::with_sink(config, NullSink);
//! let events = vm.run(["SAY \"hi\"", "DO!", "END"]);
//!
//! assert_eq!(events[0].status, ExecStatus::Done);
//! assert_eq!(events[1].status, ExecStatus::PreferNot);
//! assert!(vm.is_halted());
//! ```

#![warn(unreachable_pub)]

// Core modules
pub mod audit;
pub mod config;
pub mod engine;
pub mod error;
pub mod parser;
pub mod policy;
pub mod program;
pub mod types;

// Re-exports for convenience
pub use audit::AuditLog;
pub use config::{PolicyConfig, DEFAULT_SENSITIVE_KEYWORDS};
pub use engine::{ActionSink, ConsoleSink, Interpreter, NullSink, WAIT_CAP_MS};
pub use error::{BaterbyError, ConfigError, ProgramError};
pub use parser::{first_integer, first_integer_text, parse_line};
pub use policy::{decide, Decision, PolicyInput, RandomSource, Rule, SeededRandom};
pub use types::{Command, ExecEvent, ExecStatus, Instruction, RunState};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running programs
    pub use crate::{
        ActionSink, AuditLog, Command, ConsoleSink, ExecEvent, ExecStatus, Instruction,
        Interpreter, NullSink, PolicyConfig, RandomSource, Rule, RunState, SeededRandom,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
