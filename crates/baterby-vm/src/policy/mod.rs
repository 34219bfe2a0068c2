//! "Prefer not to" policy engine
//!
//! Before an instruction's effect runs, the engine walks a fixed priority
//! chain of rules. The first rule that matches wins and no later rule is
//! evaluated:
//!
//! | Priority | Rule                            | Trigger                                          |
//! |----------|---------------------------------|--------------------------------------------------|
//! | 1        | [`Rule::SensitiveContent`]      | text contains a sensitive keyword                |
//! | 2        | [`Rule::ActionFatigue`]         | effectful and `actions_since_pause >= max`       |
//! | 3        | [`Rule::UrgencyWithoutContext`] | urgent line that needs context                   |
//! | 4        | [`Rule::RandomPause`]           | one random draw below the configured probability |
//!
//! Only instructions that reach priority 4 consume a random draw.

pub mod random;

pub use random::{RandomSource, SeededRandom};

use crate::config::PolicyConfig;
use crate::types::RunState;
use std::fmt;

/// What the policy looks at for one instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyInput<'a> {
    /// The argument, or the raw line when there is none
    pub text: &'a str,
    /// Trailing `!`
    pub has_urgency: bool,
    /// See [`crate::Instruction::needs_context`]
    pub needs_context: bool,
    /// Whether the instruction would count toward fatigue; `PAUSE` does not
    pub effectful: bool,
}

/// A refusal rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Sensitive keyword in the instruction text
    SensitiveContent,
    /// Too many actions without a pause
    ActionFatigue,
    /// Urgent request that lacks context
    UrgencyWithoutContext,
    /// Seeded random pause
    RandomPause,
}

impl Rule {
    /// Evaluation order; earlier rules win
    pub const PRIORITY: [Rule; 4] = [
        Rule::SensitiveContent,
        Rule::ActionFatigue,
        Rule::UrgencyWithoutContext,
        Rule::RandomPause,
    ];

    /// Short code used in logs
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Rule::UrgencyWithoutContext => "R1",
            Rule::SensitiveContent => "R2",
            Rule::ActionFatigue => "R3",
            Rule::RandomPause => "R4",
        }
    }

    /// Human-readable refusal reason
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Rule::SensitiveContent => {
                "I would prefer not to: the instruction touches a sensitive topic."
            }
            Rule::ActionFatigue => "I would prefer not to: we need a pause before continuing.",
            Rule::UrgencyWithoutContext => {
                "I would prefer not to: urgent request without enough context."
            }
            Rule::RandomPause => "I would prefer not to: a random pause to preserve presence.",
        }
    }

    /// Follow-up clarification prompt
    #[must_use]
    pub const fn context_prompt(self) -> &'static str {
        match self {
            Rule::SensitiveContent => "Could you clarify the purpose and safe limits?",
            Rule::ActionFatigue => "Insert a PAUSE or justify continuing without rest.",
            Rule::UrgencyWithoutContext => "What is the purpose, scope, and time limit?",
            Rule::RandomPause => "Shall we continue after a breath and a sip of water?",
        }
    }

    fn matches(
        self,
        input: &PolicyInput<'_>,
        state: &RunState,
        config: &PolicyConfig,
        random: &mut dyn RandomSource,
    ) -> bool {
        match self {
            Rule::SensitiveContent => contains_sensitive(input.text, &config.sensitive_keywords),
            Rule::ActionFatigue => {
                input.effectful && state.actions_since_pause >= config.max_actions_without_pause
            }
            Rule::UrgencyWithoutContext => input.has_urgency && input.needs_context,
            Rule::RandomPause => {
                let draw = random.next_unit();
                tracing::trace!(draw, threshold = config.random_prefer_not_probability, "Random pause draw");
                draw < config.random_prefer_not_probability
            }
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Outcome of the policy check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// No rule matched; run the effect
    Proceed,
    /// A rule matched; record a refusal instead
    PreferNot(Rule),
}

impl Decision {
    /// True for any `PreferNot`
    #[inline]
    #[must_use]
    pub fn is_refusal(&self) -> bool {
        matches!(self, Decision::PreferNot(_))
    }

    /// Refusal reason, if refused
    #[must_use]
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Decision::Proceed => None,
            Decision::PreferNot(rule) => Some(rule.message()),
        }
    }

    /// Clarification prompt, if refused
    #[must_use]
    pub fn context_needed(&self) -> Option<&'static str> {
        match self {
            Decision::Proceed => None,
            Decision::PreferNot(rule) => Some(rule.context_prompt()),
        }
    }
}

/// Run the priority chain for one instruction.
///
/// `state` is read before the instruction would touch it, so the fatigue
/// rule sees the count of actions already performed.
pub fn decide(
    input: &PolicyInput<'_>,
    state: &RunState,
    config: &PolicyConfig,
    random: &mut dyn RandomSource,
) -> Decision {
    Rule::PRIORITY
        .into_iter()
        .find(|rule| rule.matches(input, state, config, random))
        .map_or(Decision::Proceed, Decision::PreferNot)
}

fn contains_sensitive(text: &str, keywords: &[String]) -> bool {
    let text = text.to_lowercase();
    keywords
        .iter()
        .any(|keyword| text.contains(&keyword.to_lowercase()))
}
