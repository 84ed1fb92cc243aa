mod display;

use serde::Serialize;

/// How serious a diagnostic entry is. `Error` is fatal: validation keeps
/// running, but the tree walk stops descending below the value that produced
/// it and callers should reject the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Deprecation,
    Warning,
    Error,
}

/// A resolved location in the source document. Line and column are 1-based;
/// `(0, 0)` is the unset sentinel meaning "no position known yet". The
/// highlight is the source text the diagnostic points at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub highlight: String,
}

impl Position {
    pub fn unset() -> Self {
        Self::default()
    }

    pub fn new(line: usize, column: usize, highlight: impl Into<String>) -> Self {
        Self {
            line,
            column,
            highlight: highlight.into(),
        }
    }

    pub fn is_unset(&self) -> bool {
        self.line == 0 && self.column == 0
    }
}

/// A single diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub severity: Severity,
    pub message: String,
    #[serde(flatten)]
    pub position: Position,
}

impl Entry {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            position: Position::unset(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn deprecation(message: impl Into<String>) -> Self {
        Self::new(Severity::Deprecation, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}

/// An ordered collection of diagnostics. Order is discovery order; it only
/// matters for deterministic output, never for correctness.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Report {
    entries: Vec<Entry>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// Appends all of `other`'s entries, preserving their order.
    pub fn merge(&mut self, other: Report) {
        self.entries.extend(other.entries);
    }

    /// Backfills unset positions: returns a report in which every entry still
    /// at the unset sentinel takes on `position`'s line and column, and its
    /// highlight if the entry's own highlight is empty. Entries whose position
    /// was already set by a deeper node are left untouched, so repeated
    /// backfilling while the recursion unwinds is deepest-wins.
    #[must_use]
    pub fn with_position(mut self, position: &Position) -> Report {
        for entry in &mut self.entries {
            if !entry.position.is_unset() {
                continue;
            }
            entry.position.line = position.line;
            entry.position.column = position.column;
            if entry.position.highlight.is_empty() {
                entry.position.highlight = position.highlight.clone();
            }
        }
        self
    }

    /// True iff any entry is an `Error`.
    pub fn is_fatal(&self) -> bool {
        self.entries.iter().any(|e| e.severity == Severity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }
}
