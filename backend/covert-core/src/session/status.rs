//! Operator-facing session log.

const ERROR_PREFIX: &str = "[ERROR]: ";
const RECEIVED_PREFIX: &str = "Covert message received: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Status,
    Received,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub kind: LogKind,
    pub text: String,
}

/// Append-only, insertion-ordered list of status lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionLog {
    entries: Vec<LogEntry>,
}

impl SessionLog {
    pub fn push_status(&mut self, text: impl Into<String>) {
        self.push(LogKind::Status, text.into());
    }

    pub fn push_received(&mut self, message: &str) {
        self.push(LogKind::Received, format!("{RECEIVED_PREFIX}{message}"));
    }

    pub fn push_error(&mut self, message: &str) {
        self.push(LogKind::Error, format!("{ERROR_PREFIX}{message}"));
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries appended after the first `seen`.
    pub fn since(&self, seen: usize) -> &[LogEntry] {
        self.entries.get(seen..).unwrap_or_default()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.text.as_str())
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All lines joined with newlines, as a read-only text area shows them.
    pub fn render(&self) -> String {
        self.lines().collect::<Vec<_>>().join("\n")
    }

    fn push(&mut self, kind: LogKind, text: String) {
        self.entries.push(LogEntry { kind, text });
    }
}
