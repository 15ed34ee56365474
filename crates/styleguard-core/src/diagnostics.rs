//! Core types for reported violations and their collection.

use miette::{Diagnostic as MietteDiagnostic, SourceSpan};
use serde::{Deserialize, Serialize};

/// Severity level for reported violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Should be addressed; does not fail the check run.
    Warning,
    /// Must be fixed; fails the check run.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source position of a violation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Identifier of the file, as handed to the engine.
    pub file: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset in the file (for span rendering).
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a location without span information.
    #[must_use]
    pub fn new(file: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

/// One reported rule violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Rule code (e.g., "SG001").
    pub code: String,
    /// Rule name (e.g., "array-declaration").
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Position of the violation.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
        }
    }

    /// Formats the diagnostic for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} {} at {}:{}:{}\n",
            self.code, self.rule, self.location.file, self.location.line, self.location.column,
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        output
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file,
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// Converts a [`Diagnostic`] to a miette diagnostic for rich display.
#[derive(Debug, thiserror::Error, MietteDiagnostic)]
#[error("{message}")]
pub struct DiagnosticReport {
    message: String,
    #[label("{label}")]
    span: SourceSpan,
    label: String,
}

impl From<&Diagnostic> for DiagnosticReport {
    fn from(d: &Diagnostic) -> Self {
        Self {
            message: format!("[{}] {}", d.code, d.message),
            span: SourceSpan::from((d.location.offset, d.location.length)),
            label: d.rule.clone(),
        }
    }
}

/// Accumulates diagnostics across one or more files.
///
/// Entries are kept in discovery order and never deduplicated, so the
/// output of a check run is reproducible token-for-token. Severity
/// counters are maintained on insert; reading them is O(1).
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Collector {
    /// All diagnostics in discovery order.
    diagnostics: Vec<Diagnostic>,
    errors: usize,
    warnings: usize,
    /// Number of files fed through the engine.
    files_checked: usize,
}

impl Collector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a diagnostic, updating the running counters.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
        }
        self.diagnostics.push(diagnostic);
    }

    /// Records that one more file has been processed.
    pub fn file_checked(&mut self) {
        self.files_checked += 1;
    }

    /// Number of error-severity diagnostics.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors
    }

    /// Number of warning-severity diagnostics.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings
    }

    /// Number of files processed.
    #[must_use]
    pub fn files_checked(&self) -> usize {
        self.files_checked
    }

    /// True when any error-severity diagnostic was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// All diagnostics in discovery order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Diagnostics for one file, in discovery order.
    #[must_use]
    pub fn for_file(&self, file: &str) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.location.file == file)
            .collect()
    }

    /// Formats the summary line for terminal output.
    #[must_use]
    pub fn format_summary(&self) -> String {
        format!(
            "Found {} error(s), {} warning(s) in {} file(s)",
            self.errors, self.warnings, self.files_checked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make(severity: Severity, file: &str) -> Diagnostic {
        Diagnostic::new(
            "SG006",
            "semicolon-spacing",
            severity,
            Location::new(file, 3, 12),
            "Space found before semicolon",
        )
    }

    #[test]
    fn counters_track_inserts() {
        let mut log = Collector::new();
        log.report(make(Severity::Error, "a.php"));
        log.report(make(Severity::Warning, "a.php"));
        log.report(make(Severity::Warning, "b.php"));
        assert_eq!(log.error_count(), 1);
        assert_eq!(log.warning_count(), 2);
        assert!(log.has_errors());
    }

    #[test]
    fn for_file_preserves_discovery_order() {
        let mut log = Collector::new();
        let mut first = make(Severity::Warning, "a.php");
        first.message = "first".into();
        let mut second = make(Severity::Error, "a.php");
        second.message = "second".into();
        log.report(first);
        log.report(make(Severity::Error, "b.php"));
        log.report(second);

        let for_a: Vec<&str> = log
            .for_file("a.php")
            .iter()
            .map(|d| d.message.as_str())
            .collect();
        assert_eq!(for_a, vec!["first", "second"]);
    }

    #[test]
    fn duplicates_are_kept() {
        let mut log = Collector::new();
        log.report(make(Severity::Error, "a.php"));
        log.report(make(Severity::Error, "a.php"));
        assert_eq!(log.diagnostics().len(), 2);
    }

    #[test]
    fn display_is_one_line() {
        let d = make(Severity::Warning, "src/a.php");
        assert_eq!(
            d.to_string(),
            "src/a.php:3:12: warning [SG006] Space found before semicolon"
        );
    }

    #[test]
    fn summary_counts_files() {
        let mut log = Collector::new();
        log.file_checked();
        log.file_checked();
        log.report(make(Severity::Error, "a.php"));
        assert_eq!(log.format_summary(), "Found 1 error(s), 0 warning(s) in 2 file(s)");
    }
}
