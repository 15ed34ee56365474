//! Rule discouraging the `@` error-silencing prefix.
//!
//! ```text
//! if (@in_array($array, $needle)) {
//!     doSomething();
//! }
//! ```
//!
//! # Configuration
//!
//! - `error`: report as an error rather than a warning (default: false)

use styleguard_core::{
    ConfigError, Diagnostic, FileContext, Rule, RuleConfig, Severity, TokenKind,
};

/// Rule code for no-silenced-errors.
pub const CODE: &str = "SG004";

/// Rule name for no-silenced-errors.
pub const NAME: &str = "no-silenced-errors";

/// Flags every `@` silencing prefix.
#[derive(Debug, Clone)]
pub struct SilencedErrors {
    /// Report as an error; otherwise a warning.
    pub error: bool,
}

impl Default for SilencedErrors {
    fn default() -> Self {
        Self::new()
    }
}

impl SilencedErrors {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self { error: false }
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
            error: config.get_bool("error", false),
        })
    }
}

impl Rule for SilencedErrors {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Discourages silencing errors with the @ prefix"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn kinds(&self) -> &'static [TokenKind] {
        &[TokenKind::Silencer]
    }

    fn check(&self, ctx: &FileContext<'_>, at: usize) -> Vec<Diagnostic> {
        let (severity, verdict) = if self.error {
            (Severity::Error, "forbidden")
        } else {
            (Severity::Warning, "discouraged")
        };
        vec![Diagnostic::new(
            CODE,
            NAME,
            severity,
            ctx.location(at),
            format!("Silencing errors is {verdict}"),
        )]
    }
}
