//! Core data types shared by the parser, the policy engine and the executor.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Command keyword recognised at the start of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Command {
    /// Emit the argument as output
    Say,
    /// Simulate performing a task
    Do,
    /// Suspend for a bounded number of milliseconds
    Wait,
    /// Emit a request for clarification
    Ask,
    /// Conscious pause, resets action fatigue
    Pause,
    /// Halt the program
    End,
    /// Line with no recognised keyword
    Invalid,
    /// Blank line or comment
    Empty,
}

impl Command {
    /// Keywords accepted at the start of a line, in match order
    pub const KEYWORDS: [Command; 6] = [
        Command::Say,
        Command::Do,
        Command::Wait,
        Command::Pause,
        Command::Ask,
        Command::End,
    ];

    /// Upper-case name as written in programs and audit lines
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Command::Say => "SAY",
            Command::Do => "DO",
            Command::Wait => "WAIT",
            Command::Ask => "ASK",
            Command::Pause => "PAUSE",
            Command::End => "END",
            Command::Invalid => "INVALID",
            Command::Empty => "EMPTY",
        }
    }

    /// Whether a successful run of this command counts toward fatigue
    #[inline]
    #[must_use]
    pub const fn is_effectful(self) -> bool {
        matches!(self, Command::Say | Command::Do | Command::Wait | Command::Ask)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed form of one program line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Recognised keyword, or `Empty`/`Invalid`
    pub command: Command,
    /// Contents of the first quoted span, or the whole line for `Invalid`
    pub argument: Option<String>,
    /// Line ends with `!`
    pub has_urgency: bool,
    /// Line ends with `?`
    pub has_uncertainty: bool,
}

impl Instruction {
    /// Instruction produced by blank and comment lines
    #[must_use]
    pub fn empty() -> Self {
        Self {
            command: Command::Empty,
            argument: None,
            has_urgency: false,
            has_uncertainty: false,
        }
    }

    /// Instruction produced by a line with no known keyword
    #[must_use]
    pub fn invalid(line: impl Into<String>) -> Self {
        Self {
            command: Command::Invalid,
            argument: Some(line.into()),
            has_urgency: false,
            has_uncertainty: false,
        }
    }

    /// Whether the policy should ask for more context before running.
    ///
    /// Only `DO` can lack context: either it names no task, or the line
    /// carries the uncertainty suffix.
    #[inline]
    #[must_use]
    pub fn needs_context(&self) -> bool {
        self.command == Command::Do && (self.argument.is_none() || self.has_uncertainty)
    }

    /// Serialize back to a program line.
    ///
    /// Whitespace is normalised; parsing the result yields an equivalent
    /// instruction as long as the argument contains no `"`.
    #[must_use]
    pub fn to_line(&self) -> String {
        let mut line = match self.command {
            Command::Empty => return String::new(),
            Command::Invalid => return self.argument.clone().unwrap_or_default(),
            command => command.as_str().to_string(),
        };
        if let Some(argument) = &self.argument {
            line.push_str(" \"");
            line.push_str(argument);
            line.push('"');
        }
        if self.has_urgency {
            line.push('!');
        } else if self.has_uncertainty {
            line.push('?');
        }
        line
    }
}

/// Observational outcome of one processed line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecStatus {
    /// Effect executed
    Done,
    /// Unrecognised instruction, no effect
    Skipped,
    /// Blocked by the policy engine, no effect
    PreferNot,
}

impl ExecStatus {
    /// Name used in the audit line
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ExecStatus::Done => "done",
            ExecStatus::Skipped => "skipped",
            ExecStatus::PreferNot => "prefer_not",
        }
    }
}

impl fmt::Display for ExecStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit record, appended per processed non-empty line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecEvent {
    /// 1-based line number in the program
    pub line_number: usize,
    /// Line as read, untrimmed
    pub raw_text: String,
    pub action: Command,
    pub status: ExecStatus,
    /// Effect summary or refusal reason
    pub message: String,
    /// Follow-up prompt, present only on refusals
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_needed: Option<String>,
}

impl ExecEvent {
    pub(crate) fn new(
        line_number: usize,
        raw_text: &str,
        action: Command,
        status: ExecStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            line_number,
            raw_text: raw_text.to_string(),
            action,
            status,
            message: message.into(),
            context_needed: None,
        }
    }

    pub(crate) fn with_context_needed(mut self, prompt: impl Into<String>) -> Self {
        self.context_needed = Some(prompt.into());
        self
    }
}

impl fmt::Display for ExecEvent {
    /// Audit line: `L<nn> [<action>] <status> -> <message>[ | needs: <prompt>]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "L{:02} [{}] {} -> {}",
            self.line_number, self.action, self.status, self.message
        )?;
        if let Some(prompt) = &self.context_needed {
            write!(f, " | needs: {prompt}")?;
        }
        Ok(())
    }
}

/// Mutable per-run state, owned by the interpreter for one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    /// Successful effectful actions since the last `PAUSE`
    pub actions_since_pause: u32,
    /// Set by `END`; no further lines are processed
    pub halted: bool,
    /// Reserved for context tracking; no rule reads it yet
    pub global_context: BTreeMap<String, serde_json::Value>,
}

impl RunState {
    /// State at the start of a run
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_action(&mut self) {
        self.actions_since_pause = self.actions_since_pause.saturating_add(1);
    }

    pub(crate) fn pause(&mut self) {
        self.actions_since_pause = 0;
    }

    pub(crate) fn halt(&mut self) {
        self.halted = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audit_line_without_context() {
        let event = ExecEvent::new(1, "SAY \"hi\"", Command::Say, ExecStatus::Done, "msg=\"hi\"");
        assert_eq!(event.to_string(), "L01 [SAY] done -> msg=\"hi\"");
    }

    #[test]
    fn audit_line_with_context() {
        let event = ExecEvent::new(12, "DO!", Command::Do, ExecStatus::PreferNot, "no")
            .with_context_needed("why?");
        assert_eq!(event.to_string(), "L12 [DO] prefer_not -> no | needs: why?");
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&ExecStatus::PreferNot).unwrap();
        assert_eq!(json, "\"prefer_not\"");
    }

    #[test]
    fn needs_context_only_for_do() {
        let mut instr = Instruction {
            command: Command::Do,
            argument: Some("task".into()),
            has_urgency: false,
            has_uncertainty: false,
        };
        assert!(!instr.needs_context());

        instr.has_uncertainty = true;
        assert!(instr.needs_context());

        instr.command = Command::Say;
        assert!(!instr.needs_context());

        let bare_do = Instruction {
            command: Command::Do,
            argument: None,
            has_urgency: true,
            has_uncertainty: false,
        };
        assert!(bare_do.needs_context());
    }

    #[test]
    fn to_line_places_modifier_after_argument() {
        let instr = Instruction {
            command: Command::Do,
            argument: Some("ship it".into()),
            has_urgency: true,
            has_uncertainty: false,
        };
        assert_eq!(instr.to_line(), "DO \"ship it\"!");
        assert_eq!(Instruction::empty().to_line(), "");
        assert_eq!(Instruction::invalid("FLY away").to_line(), "FLY away");
    }
}
