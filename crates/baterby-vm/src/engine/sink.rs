//! Side effects of executed commands
//!
//! The executor never prints or sleeps directly; it calls an
//! [`ActionSink`]. The console sink is the default.

use std::io::Write;
use std::time::Duration;

/// Receives the effects of successfully executed commands, in line order.
pub trait ActionSink {
    /// `SAY`: emit text
    fn say(&mut self, text: &str);

    /// `DO`: announce the task being performed
    fn perform(&mut self, task: &str);

    /// `ASK`: emit a clarification request (never blocks for input)
    fn ask(&mut self, prompt: &str);

    /// `WAIT`: suspend the run. The duration is already capped.
    fn wait(&mut self, duration: Duration);
}

/// Prints to stdout and really sleeps
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ConsoleSink {
    /// Console sink writing to stdout
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn emit(line: std::fmt::Arguments<'_>) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = out.write_fmt(line).and_then(|()| out.write_all(b"\n")) {
            tracing::warn!("Failed to write action output: {}", e);
        }
    }
}

impl ActionSink for ConsoleSink {
    fn say(&mut self, text: &str) {
        Self::emit(format_args!("{text}"));
    }

    fn perform(&mut self, task: &str) {
        Self::emit(format_args!("[doing] {task}"));
    }

    fn ask(&mut self, prompt: &str) {
        Self::emit(format_args!("[ask] {prompt}"));
    }

    fn wait(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Discards output and skips sleeping
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ActionSink for NullSink {
    fn say(&mut self, _text: &str) {}

    fn perform(&mut self, _task: &str) {}

    fn ask(&mut self, _prompt: &str) {}

    fn wait(&mut self, _duration: Duration) {}
}

impl<S: ActionSink + ?Sized> ActionSink for Box<S> {
    fn say(&mut self, text: &str) {
        (**self).say(text);
    }

    fn perform(&mut self, task: &str) {
        (**self).perform(task);
    }

    fn ask(&mut self, prompt: &str) {
        (**self).ask(prompt);
    }

    fn wait(&mut self, duration: Duration) {
        (**self).wait(duration);
    }
}
