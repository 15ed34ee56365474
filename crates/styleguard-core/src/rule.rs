//! Rule trait for defining token-based style rules.

use crate::context::FileContext;
use crate::diagnostics::{Diagnostic, Severity};
use crate::token::TokenKind;

/// A style rule dispatched over a token stream.
///
/// A rule declares the token kinds it wants to observe; the engine
/// invokes [`Rule::check`] once per matching token during its single
/// pass over a file. Rules navigate around the given index through the
/// context's stream and structure notes, and return any violations
/// found. They are constructed once at startup and shared across
/// files, so a rule holds configuration, never per-file state.
///
/// # Example
///
/// ```ignore
/// use styleguard_core::{Diagnostic, FileContext, Rule, Severity, TokenKind};
///
/// pub struct NoSilencedErrors;
///
/// impl Rule for NoSilencedErrors {
///     fn name(&self) -> &'static str { "no-silenced-errors" }
///     fn code(&self) -> &'static str { "SG004" }
///     fn kinds(&self) -> &'static [TokenKind] { &[TokenKind::Silencer] }
///
///     fn check(&self, ctx: &FileContext, at: usize) -> Vec<Diagnostic> {
///         vec![Diagnostic::new(
///             self.code(),
///             self.name(),
///             Severity::Warning,
///             ctx.location(at),
///             "Silencing errors is discouraged",
///         )]
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "line-length").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "SG009").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Returns the token kinds this rule wants to observe.
    ///
    /// The engine only calls [`Rule::check`] at tokens of these kinds.
    fn kinds(&self) -> &'static [TokenKind];

    /// Checks the token at `at` and returns any violations found.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The annotated stream being checked
    /// * `at` - Index of the token that matched this rule's kinds
    fn check(&self, ctx: &FileContext<'_>, at: usize) -> Vec<Diagnostic>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::TokenStream;
    use crate::structure::StructureIndex;

    struct TestRule;

    impl Rule for TestRule {
        fn name(&self) -> &'static str {
            "test-rule"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn description(&self) -> &'static str {
            "A test rule"
        }
        fn kinds(&self) -> &'static [TokenKind] {
            &[TokenKind::Semicolon]
        }

        fn check(&self, ctx: &FileContext<'_>, at: usize) -> Vec<Diagnostic> {
            vec![Diagnostic::new(
                self.code(),
                self.name(),
                self.default_severity(),
                ctx.location(at),
                "Test violation",
            )]
        }
    }

    #[test]
    fn test_rule_trait() {
        let rule = TestRule;
        assert_eq!(rule.name(), "test-rule");
        assert_eq!(rule.code(), "TEST001");
        assert_eq!(rule.default_severity(), Severity::Error);
        assert_eq!(rule.kinds(), &[TokenKind::Semicolon]);
    }

    #[test]
    fn check_reports_at_the_given_token() {
        let stream = TokenStream::from_source("f();");
        let index = StructureIndex::build(&stream).expect("balanced");
        let ctx = FileContext::new("test.php", &stream, &index);
        let diags = TestRule.check(&ctx, 3);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].location.column, 4);
    }
}
