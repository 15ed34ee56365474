//! Rule ensuring no whitespace appears before a semicolon.
//!
//! The message reconstructs the statement tail so the report shows
//! exactly what was written and what was expected.

use styleguard_core::{Diagnostic, FileContext, Rule, Severity, TokenKind};

/// Rule code for semicolon-spacing.
pub const CODE: &str = "SG006";

/// Rule name for semicolon-spacing.
pub const NAME: &str = "semicolon-spacing";

/// Flags whitespace between a statement and its semicolon.
#[derive(Debug, Clone, Default)]
pub struct SemicolonSpacing;

impl SemicolonSpacing {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for SemicolonSpacing {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Ensures there is no whitespace before a semicolon"
    }

    fn kinds(&self) -> &'static [TokenKind] {
        &[TokenKind::Semicolon]
    }

    fn check(&self, ctx: &FileContext<'_>, at: usize) -> Vec<Diagnostic> {
        let Some(prev) = at.checked_sub(1) else {
            return Vec::new();
        };
        if !ctx.token(prev).kind.is_empty_kind() {
            return Vec::new();
        }
        let Some(anchor) = prev
            .checked_sub(1)
            .and_then(|p| ctx.stream.prev_non_empty(p))
        else {
            return Vec::new();
        };

        let expected = format!("{};", ctx.token(anchor).text);
        let found = format!("{};", ctx.stream.tokens_as_string(anchor, at - anchor));
        vec![Diagnostic::new(
            CODE,
            NAME,
            Severity::Error,
            ctx.location(at),
            format!("Space found before semicolon; expected \"{expected}\" but found \"{found}\""),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{messages, run_rule};

    #[test]
    fn flags_a_space_before_the_semicolon() {
        let found = messages(&SemicolonSpacing::new(), "f() ;");
        assert_eq!(
            found,
            vec!["Space found before semicolon; expected \");\" but found \") ;\""]
        );
    }

    #[test]
    fn tight_semicolons_pass() {
        assert!(run_rule(&SemicolonSpacing::new(), "f();\n$a = 1;").is_empty());
    }

    #[test]
    fn reconstructs_multi_token_gaps() {
        let found = messages(&SemicolonSpacing::new(), "$a = 1  ;");
        assert_eq!(
            found,
            vec!["Space found before semicolon; expected \"1;\" but found \"1  ;\""]
        );
    }

    #[test]
    fn newline_before_semicolon_counts_as_space() {
        let found = run_rule(&SemicolonSpacing::new(), "$a = 1\n;");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].location.line, 2);
    }
}
