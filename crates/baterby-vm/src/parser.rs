//! Line parser
//!
//! One raw line becomes one [`Instruction`]. The grammar is small enough
//! to dispatch by hand:
//!
//! ```text
//! line     := blank | comment | keyword rest
//! comment  := '#' any*
//! keyword  := SAY | DO | WAIT | PAUSE | ASK | END     (case-insensitive,
//!                                                      followed by a non-word char or EOL)
//! argument := first '"' ... next '"' anywhere on the line
//! modifier := trailing '!' (urgency) | trailing '?' (uncertainty)
//! ```
//!
//! Parsing never fails; unknown lines become [`Command::Invalid`].

use crate::types::{Command, Instruction};

/// Parse one raw program line.
#[must_use]
pub fn parse_line(raw: &str) -> Instruction {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return Instruction::empty();
    }

    let Some(command) = match_keyword(line) else {
        return Instruction::invalid(line);
    };

    Instruction {
        command,
        argument: first_quoted_span(line).map(str::to_string),
        has_urgency: line.ends_with('!'),
        has_uncertainty: line.ends_with('?'),
    }
}

/// Match the leading keyword, requiring a word boundary after it.
fn match_keyword(line: &str) -> Option<Command> {
    Command::KEYWORDS.into_iter().find(|command| {
        let keyword = command.as_str();
        let Some(head) = line.get(..keyword.len()) else {
            return false;
        };
        head.eq_ignore_ascii_case(keyword)
            && line[keyword.len()..]
                .chars()
                .next()
                .map_or(true, |next| !is_word_char(next))
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Contents of the first `"..."` span. An unterminated quote yields `None`.
fn first_quoted_span(line: &str) -> Option<&str> {
    let open = line.find('"')?;
    let rest = &line[open + 1..];
    let close = rest.find('"')?;
    Some(&rest[..close])
}

/// First run of ASCII digits on the line, without leading zeros.
///
/// No digits yields `"0"`. The text is kept even when it does not fit a
/// `u64`, so the audit can record the value as written.
#[must_use]
pub fn first_integer_text(raw: &str) -> &str {
    let Some(start) = raw.find(|c: char| c.is_ascii_digit()) else {
        return "0";
    };
    let digits = &raw[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    match digits[..end].trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    }
}

/// First run of ASCII digits on the line as milliseconds.
///
/// Missing digits yield 0; a value too large for `u64` saturates.
#[must_use]
pub fn first_integer(raw: &str) -> u64 {
    first_integer_text(raw).parse().unwrap_or(u64::MAX)
}
