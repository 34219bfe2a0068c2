//! Testing utilities for the Baterby workspace
//!
//! Shared test helpers, fixtures, and stubs.

#![allow(missing_docs)]

use baterby_vm::{ActionSink, Interpreter, PolicyConfig, RandomSource};
use std::collections::VecDeque;
use std::time::Duration;

/// Random source that replays a script, then repeats a fallback value
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    script: VecDeque<f64>,
    fallback: f64,
    draws: usize,
}

impl ScriptedRandom {
    pub fn new(script: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallback,
            draws: 0,
        }
    }

    /// Never triggers a random pause
    pub fn calm() -> Self {
        Self::new([], 0.999_999)
    }

    /// Always triggers a random pause when the probability is non-zero
    pub fn restless() -> Self {
        Self::new([], 0.0)
    }

    /// Number of values handed out so far
    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        self.draws += 1;
        self.script.pop_front().unwrap_or(self.fallback)
    }
}

/// One recorded side effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Said(String),
    Performed(String),
    Asked(String),
    Waited(Duration),
}

/// Records effects instead of printing and sleeping
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub effects: Vec<Effect>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total time the program asked to sleep, after capping
    pub fn total_wait(&self) -> Duration {
        self.effects
            .iter()
            .filter_map(|e| match e {
                Effect::Waited(d) => Some(*d),
                _ => None,
            })
            .sum()
    }
}

impl ActionSink for RecordingSink {
    fn say(&mut self, text: &str) {
        self.effects.push(Effect::Said(text.to_string()));
    }

    fn perform(&mut self, task: &str) {
        self.effects.push(Effect::Performed(task.to_string()));
    }

    fn ask(&mut self, prompt: &str) {
        self.effects.push(Effect::Asked(prompt.to_string()));
    }

    fn wait(&mut self, duration: Duration) {
        self.effects.push(Effect::Waited(duration));
    }
}

pub type TestInterpreter = Interpreter<ScriptedRandom, RecordingSink>;

/// Interpreter whose random rule never fires
pub fn calm_interpreter(config: PolicyConfig) -> TestInterpreter {
    Interpreter::with_parts(config, ScriptedRandom::calm(), RecordingSink::new())
}

/// Interpreter with a scripted random sequence
pub fn scripted_interpreter(config: PolicyConfig, script: impl IntoIterator<Item = f64>) -> TestInterpreter {
    Interpreter::with_parts(config, ScriptedRandom::new(script, 0.999_999), RecordingSink::new())
}

/// Default config with the random rule disabled
pub fn no_random_config() -> PolicyConfig {
    PolicyConfig::default().with_prefer_not_probability(0.0)
}

/// The walk-through program from the documentation
pub fn scenario_program() -> Vec<&'static str> {
    vec!["SAY \"hi\"", "DO \"task\"?", "WAIT 5000", "PAUSE", "END"]
}

/// Three actions followed by a fourth that should hit the fatigue rule
pub fn fatigue_program() -> Vec<&'static str> {
    vec!["SAY \"one\"", "DO \"two\"", "WAIT 1", "SAY \"four\""]
}
