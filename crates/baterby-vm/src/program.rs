//! Program sources

use crate::error::ProgramError;
use std::path::Path;

/// Sample program printed by the CLI when no program is given
pub const SAMPLE_PROGRAM: &str = r#"SAY "Starting gently"
DO  "Publish post"?
PAUSE
DO!
WAIT 500
SAY "Done. Now it is fine.""#;

/// Split program text into lines. Both `\n` and `\r\n` endings are accepted.
#[must_use]
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

/// Read a UTF-8 program file into lines.
///
/// # Errors
/// Returns [`ProgramError::Io`] if the file cannot be read or is not UTF-8.
pub fn read_program(path: impl AsRef<Path>) -> Result<Vec<String>, ProgramError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| ProgramError::io_error(path, e))?;
    let lines = split_lines(&text);
    tracing::debug!(path = %path.display(), lines = lines.len(), "Read program");
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_handles_crlf() {
        assert_eq!(split_lines("SAY \"a\"\r\nEND\r\n"), vec!["SAY \"a\"", "END"]);
    }

    #[test]
    fn sample_program_has_six_lines() {
        assert_eq!(split_lines(SAMPLE_PROGRAM).len(), 6);
    }
}
