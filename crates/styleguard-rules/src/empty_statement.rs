//! Rule detecting control structures with empty bodies.
//!
//! A body counts as empty when it contains nothing, or only whitespace
//! and comments. One diagnostic is reported per construct, at the
//! keyword, regardless of how many blank lines the body spans.

use styleguard_core::{Diagnostic, FileContext, Rule, Severity, TokenKind};

/// Rule code for empty-statement.
pub const CODE: &str = "SG005";

/// Rule name for empty-statement.
pub const NAME: &str = "empty-statement";

/// Flags control structures whose body holds no code.
#[derive(Debug, Clone, Default)]
pub struct EmptyStatement;

impl EmptyStatement {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for EmptyStatement {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Detects control structures with empty bodies"
    }

    fn kinds(&self) -> &'static [TokenKind] {
        TokenKind::CONTROL
    }

    fn check(&self, ctx: &FileContext<'_>, at: usize) -> Vec<Diagnostic> {
        let note = ctx.note(at);
        // Constructs without a braced body (single-statement forms,
        // the while of a do-while) are not checked.
        let (Some(opener), Some(closer)) = (note.owned_opener, note.owned_closer) else {
            return Vec::new();
        };

        let has_content = ctx
            .stream
            .find_next(TokenKind::EMPTY, opener + 1, Some(closer), true)
            .is_some();
        if has_content {
            return Vec::new();
        }

        let name = ctx.token(at).text.to_uppercase();
        vec![Diagnostic::new(
            CODE,
            NAME,
            Severity::Error,
            ctx.location(at),
            format!("Empty {name} statement detected"),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{messages, run_rule};

    #[test]
    fn flags_an_empty_if_body() {
        let found = messages(&EmptyStatement::new(), "if ($a) { }");
        assert_eq!(found, vec!["Empty IF statement detected"]);
    }

    #[test]
    fn comments_do_not_count_as_content() {
        let source = "if ($a) {\n  // later\n\n  /* nothing yet */\n}";
        let found = run_rule(&EmptyStatement::new(), source);
        // Exactly one diagnostic at the keyword, not one per blank line.
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].location.line, found[0].location.column), (1, 1));
    }

    #[test]
    fn bodies_with_code_pass() {
        assert!(run_rule(&EmptyStatement::new(), "if ($a) { f(); }").is_empty());
    }

    #[test]
    fn braceless_forms_are_skipped() {
        assert!(run_rule(&EmptyStatement::new(), "while ($a < 3) $a = next($a);").is_empty());
    }

    #[test]
    fn each_empty_construct_reports_once() {
        let found = messages(
            &EmptyStatement::new(),
            "foreach ($a as $b) { } while ($c) { }",
        );
        assert_eq!(
            found,
            vec![
                "Empty FOREACH statement detected",
                "Empty WHILE statement detected",
            ]
        );
    }

    #[test]
    fn else_and_try_are_covered() {
        let found = messages(
            &EmptyStatement::new(),
            "if ($a) { f(); } else { }\ntry { g(); } catch (E $e) { }",
        );
        assert_eq!(
            found,
            vec![
                "Empty ELSE statement detected",
                "Empty CATCH statement detected",
            ]
        );
    }
}
