//! Rule limiting line length.
//!
//! # Configuration
//!
//! - `line_limit`: lines longer than this warn (default: 180; 0 disables)
//! - `absolute_line_limit`: lines longer than this error (default: 0, disabled)
//!
//! Line ends live inside whitespace and comment tokens, so the rule
//! listens to those kinds and measures each line a token terminates.

use styleguard_core::{
    ConfigError, Diagnostic, FileContext, Location, Rule, RuleConfig, Severity, TokenKind,
};

/// Rule code for line-length.
pub const CODE: &str = "SG009";

/// Rule name for line-length.
pub const NAME: &str = "line-length";

/// Flags lines exceeding the configured limits.
#[derive(Debug, Clone)]
pub struct LineLength {
    /// Lines longer than this warn; 0 disables the soft limit.
    pub line_limit: usize,
    /// Lines longer than this error; 0 disables the hard limit.
    pub absolute_line_limit: usize,
}

impl Default for LineLength {
    fn default() -> Self {
        Self::new()
    }
}

impl LineLength {
    /// Creates a new rule with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self {
            line_limit: 180,
            absolute_line_limit: 0,
        }
    }

    /// Sets the soft (warning) limit.
    #[must_use]
    pub fn line_limit(mut self, limit: usize) -> Self {
        self.line_limit = limit;
        self
    }

    /// Sets the hard (error) limit.
    #[must_use]
    pub fn absolute_line_limit(mut self, limit: usize) -> Self {
        self.absolute_line_limit = limit;
        self
    }

    /// Builds the rule from its configuration section.
    ///
    /// # Errors
    ///
    /// Returns an error when a limit option is not a non-negative
    /// integer.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        let defaults = Self::new();
        Ok(Self {
            line_limit: config.get_limit(NAME, "line_limit", defaults.line_limit)?,
            absolute_line_limit: config.get_limit(
                NAME,
                "absolute_line_limit",
                defaults.absolute_line_limit,
            )?,
        })
    }

    fn check_line(&self, ctx: &FileContext<'_>, line: usize, length: usize) -> Option<Diagnostic> {
        let location = Location::new(ctx.file, line, 1);
        if self.absolute_line_limit > 0 && length > self.absolute_line_limit {
            return Some(Diagnostic::new(
                CODE,
                NAME,
                Severity::Error,
                location,
                format!(
                    "Line exceeds maximum limit of {} characters; contains {length} characters",
                    self.absolute_line_limit
                ),
            ));
        }
        if self.line_limit > 0 && length > self.line_limit {
            return Some(Diagnostic::new(
                CODE,
                NAME,
                Severity::Warning,
                location,
                format!(
                    "Line exceeds {} characters; contains {length} characters",
                    self.line_limit
                ),
            ));
        }
        None
    }
}

impl Rule for LineLength {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Limits the length of lines"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn kinds(&self) -> &'static [TokenKind] {
        &[
            TokenKind::Whitespace,
            TokenKind::Comment,
            TokenKind::DocComment,
        ]
    }

    fn check(&self, ctx: &FileContext<'_>, at: usize) -> Vec<Diagnostic> {
        let token = ctx.token(at);
        if !token.text.contains('\n') {
            return Vec::new();
        }

        let mut diagnostics = Vec::new();
        let mut line = token.line;
        // Characters already on the line before this token.
        let mut length = token.column - 1;
        for c in token.text.chars() {
            if c == '\n' {
                diagnostics.extend(self.check_line(ctx, line, length));
                line += 1;
                length = 0;
            } else {
                length += 1;
            }
        }
        diagnostics
    }
}
