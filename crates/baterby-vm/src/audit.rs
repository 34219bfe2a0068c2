//! Append-only audit log of execution events

use crate::types::{ExecEvent, ExecStatus};

/// Ordered record of per-line outcomes for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditLog {
    events: Vec<ExecEvent>,
}

impl AuditLog {
    /// Empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one event. Events are never reordered or removed.
    pub fn append(&mut self, event: ExecEvent) {
        tracing::trace!(line = event.line_number, status = %event.status, "Audit event");
        self.events.push(event);
    }

    /// Events in append order
    #[must_use]
    pub fn events(&self) -> &[ExecEvent] {
        &self.events
    }

    /// Iterate events in append order
    pub fn iter(&self) -> impl Iterator<Item = &ExecEvent> {
        self.events.iter()
    }

    /// Number of events
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True before the first append
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of events with the given status
    #[must_use]
    pub fn count(&self, status: ExecStatus) -> usize {
        self.events.iter().filter(|e| e.status == status).count()
    }

    /// Take ownership of the events
    #[must_use]
    pub fn into_events(self) -> Vec<ExecEvent> {
        self.events
    }

    /// Audit trail, one line per event
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for event in &self.events {
            out.push_str(&event.to_string());
            out.push('\n');
        }
        out
    }

    /// Events as a pretty-printed JSON array
    ///
    /// # Errors
    /// Propagates `serde_json` serialization failures.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.events)
    }
}

impl<'a> IntoIterator for &'a AuditLog {
    type Item = &'a ExecEvent;
    type IntoIter = std::slice::Iter<'a, ExecEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Command;

    fn sample_log() -> AuditLog {
        let mut log = AuditLog::new();
        log.append(ExecEvent::new(1, "SAY \"a\"", Command::Say, ExecStatus::Done, "msg=\"a\""));
        log.append(ExecEvent::new(3, "JUMP", Command::Invalid, ExecStatus::Skipped, "unrecognized instruction"));
        log
    }

    #[test]
    fn append_preserves_order() {
        let log = sample_log();
        let lines: Vec<usize> = log.iter().map(|e| e.line_number).collect();
        assert_eq!(lines, vec![1, 3]);
        assert_eq!(log.count(ExecStatus::Skipped), 1);
    }

    #[test]
    fn into_events_hands_back_the_same_order() {
        let events = sample_log().into_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].action, Command::Say);
        assert_eq!(events[1].status, ExecStatus::Skipped);
    }

    #[test]
    fn render_emits_one_line_per_event() {
        let rendered = sample_log().render();
        assert_eq!(
            rendered,
            "L01 [SAY] done -> msg=\"a\"\nL03 [INVALID] skipped -> unrecognized instruction\n"
        );
    }

    #[test]
    fn json_omits_missing_context() {
        let json = sample_log().to_json().unwrap();
        assert!(json.contains("\"status\": \"skipped\""));
        assert!(!json.contains("context_needed"));
    }
}
