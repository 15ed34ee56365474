//! Rule checking that doc comment asterisks line up.
//!
//! Continuation lines of a `/** */` block must align their asterisk one
//! column past the opening slash, and tag lines must put exactly one
//! space between the asterisk and the tag.

use styleguard_core::utils::spacing::space_word;
use styleguard_core::{Diagnostic, FileContext, Location, Rule, Severity, TokenKind};

/// Rule code for doc-comment-alignment.
pub const CODE: &str = "SG007";

/// Rule name for doc-comment-alignment.
pub const NAME: &str = "doc-comment-alignment";

/// Flags misaligned asterisks and tag spacing in doc comments.
#[derive(Debug, Clone, Default)]
pub struct DocCommentAlignment;

impl DocCommentAlignment {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for DocCommentAlignment {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Checks that the stars in a doc comment align correctly"
    }

    fn kinds(&self) -> &'static [TokenKind] {
        &[TokenKind::DocComment]
    }

    fn check(&self, ctx: &FileContext<'_>, at: usize) -> Vec<Diagnostic> {
        let token = ctx.token(at);
        // The asterisk of `/**` sits one past the opening slash.
        let required_column = token.column + 1;

        let mut diagnostics = Vec::new();
        for (offset, line) in token.text.lines().enumerate().skip(1) {
            let Some(star) = line.find('*') else {
                continue;
            };
            // Continuation lines start at column 1 of their own line.
            let column = line[..star].chars().count() + 1;
            let line_number = token.line + offset;

            if column != required_column {
                diagnostics.push(Diagnostic::new(
                    CODE,
                    NAME,
                    Severity::Error,
                    Location::new(ctx.file, line_number, column),
                    format!(
                        "Expected {} before asterisk; {} found",
                        space_word(required_column - 1),
                        column - 1
                    ),
                ));
            }

            let rest = &line[star + 1..];
            if let Some(found) = tag_spacing(rest) {
                if found != 1 {
                    diagnostics.push(Diagnostic::new(
                        CODE,
                        NAME,
                        Severity::Error,
                        Location::new(ctx.file, line_number, column),
                        format!("Expected 1 space between asterisk and tag; {found} found"),
                    ));
                }
            }
        }
        diagnostics
    }
}

/// For a tag line, the number of spaces between the asterisk and the
/// `@`; `None` when the line carries no tag.
fn tag_spacing(rest: &str) -> Option<usize> {
    let spaces = rest.chars().take_while(|c| *c == ' ' || *c == '\t').count();
    let after: String = rest.chars().skip(spaces).collect();
    after.starts_with('@').then_some(spaces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{messages, run_rule};

    #[test]
    fn aligned_blocks_pass() {
        let source = "/**\n * Does the thing\n *\n * @return integer\n */\nfunction f() { return 1; }";
        assert!(run_rule(&DocCommentAlignment::new(), source).is_empty());
    }

    #[test]
    fn misaligned_star_reports_expected_and_found() {
        let source = "/**\n   * Does the thing\n */\nfunction f() { return 1; }";
        let found = run_rule(&DocCommentAlignment::new(), source);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].message, "Expected 1 space before asterisk; 3 found");
        assert_eq!(found[0].location.line, 2);
    }

    #[test]
    fn indented_blocks_align_against_their_own_opener() {
        let source = "class C {\n  /**\n   * Does the thing\n   */\n  function f() { return 1; }\n}";
        assert!(run_rule(&DocCommentAlignment::new(), source).is_empty());
    }

    #[test]
    fn tag_needs_exactly_one_space() {
        let source = "/**\n * Does the thing\n *\n *   @return integer\n */\nfunction f() { return 1; }";
        let found = messages(&DocCommentAlignment::new(), source);
        assert_eq!(
            found,
            vec!["Expected 1 space between asterisk and tag; 3 found"]
        );
    }

    #[test]
    fn tagless_lines_are_not_tag_checked() {
        let source = "/**\n * mail@example.com is fine here\n */\nfunction f() { return 1; }";
        assert!(run_rule(&DocCommentAlignment::new(), source).is_empty());
    }

    #[test]
    fn single_line_doc_comments_pass() {
        assert!(run_rule(&DocCommentAlignment::new(), "/** terse */\nfunction f() { return 1; }").is_empty());
    }
}
