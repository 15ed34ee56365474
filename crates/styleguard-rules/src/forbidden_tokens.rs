//! Rule forbidding legacy control-flow and output keywords.
//!
//! # Rationale
//!
//! `print`, `goto`, and `eval` bypass the structured control and output
//! conventions the rest of the standard enforces; they are denied
//! outright, independent of context.
//!
//! # Configuration
//!
//! - `error`: report as an error rather than a warning (default: true)

use styleguard_core::{
    ConfigError, Diagnostic, FileContext, Rule, RuleConfig, Severity, TokenKind,
};

/// Rule code for forbidden-tokens.
pub const CODE: &str = "SG003";

/// Rule name for forbidden-tokens.
pub const NAME: &str = "forbidden-tokens";

/// Flags every occurrence of a denylisted keyword.
#[derive(Debug, Clone)]
pub struct ForbiddenTokens {
    /// Report as an error; otherwise a warning.
    pub error: bool,
}

impl Default for ForbiddenTokens {
    fn default() -> Self {
        Self::new()
    }
}

impl ForbiddenTokens {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self { error: true }
    }

    /// Sets whether occurrences are errors or warnings.
    #[must_use]
    pub fn error(mut self, error: bool) -> Self {
        self.error = error;
        self
    }

    /// Builds the rule from its configuration section.
    ///
    /// # Errors
    ///
    /// Never fails today; the signature matches the other configurable
    /// rules so callers treat them uniformly.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            error: config.get_bool("error", true),
        })
    }
}

impl Rule for ForbiddenTokens {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids print, goto, and eval"
    }

    fn kinds(&self) -> &'static [TokenKind] {
        &[
            TokenKind::KeywordPrint,
            TokenKind::KeywordGoto,
            TokenKind::KeywordEval,
        ]
    }

    fn check(&self, ctx: &FileContext<'_>, at: usize) -> Vec<Diagnostic> {
        let word = ctx.token(at).text.to_lowercase();
        let severity = if self.error {
            Severity::Error
        } else {
            Severity::Warning
        };
        vec![Diagnostic::new(
            CODE,
            NAME,
            severity,
            ctx.location(at),
            format!("The use of {word} is forbidden"),
        )]
    }
}
