//! Rule flagging whitespace that carries no meaning.
//!
//! Checks that no whitespace precedes the first content of the file,
//! none trails after the last content, none trails content on any
//! line, and that function bodies do not contain consecutive blank
//! lines.

use styleguard_core::{Diagnostic, FileContext, Rule, Severity, TokenKind};

/// Rule code for superfluous-whitespace.
pub const CODE: &str = "SG010";

/// Rule name for superfluous-whitespace.
pub const NAME: &str = "superfluous-whitespace";

/// Flags leading, trailing, and doubled-up whitespace.
#[derive(Debug, Clone, Default)]
pub struct SuperfluousWhitespace;

impl SuperfluousWhitespace {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for SuperfluousWhitespace {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Flags whitespace at file boundaries, line ends, and doubled blank lines"
    }

    fn kinds(&self) -> &'static [TokenKind] {
        &[TokenKind::Whitespace]
    }

    fn check(&self, ctx: &FileContext<'_>, at: usize) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let token = ctx.token(at);

        if at == 0 {
            diagnostics.push(Diagnostic::new(
                CODE,
                NAME,
                Severity::Error,
                ctx.location(at),
                "Additional whitespace found at start of file",
            ));
        }

        // Spaces or tabs directly before a line break are trailing
        // whitespace; a run that is only a line break is fine.
        if token.text.ends_with('\n') && token.text.chars().count() > 1 && at != 0 {
            let is_blank_line = prev_ends_line(ctx, at);
            if !is_blank_line {
                diagnostics.push(Diagnostic::new(
                    CODE,
                    NAME,
                    Severity::Error,
                    ctx.location(at),
                    "Whitespace found at end of line",
                ));
            }
        }

        if at + 1 == ctx.stream.len() && at > 0 && ctx.token(at - 1).kind == TokenKind::Whitespace
        {
            diagnostics.push(Diagnostic::new(
                CODE,
                NAME,
                Severity::Error,
                ctx.location(at),
                "Additional whitespace found at end of file",
            ));
        }

        if self.starts_second_blank_line(ctx, at) && inside_function(ctx, at) {
            diagnostics.push(Diagnostic::new(
                CODE,
                NAME,
                Severity::Error,
                ctx.location(at),
                "Function contains multiple empty lines in a row",
            ));
        }

        diagnostics
    }
}

impl SuperfluousWhitespace {
    /// True when `at` is the line break of a second consecutive blank
    /// line: this token and the two before it all end a line with no
    /// content between them.
    fn starts_second_blank_line(&self, ctx: &FileContext<'_>, at: usize) -> bool {
        if !ctx.token(at).text.ends_with('\n') || at < 2 {
            return false;
        }
        let before = ctx.token(at - 1);
        let further = ctx.token(at - 2);
        before.kind == TokenKind::Whitespace
            && before.text.ends_with('\n')
            && further.kind == TokenKind::Whitespace
            && further.text.ends_with('\n')
    }
}

/// True when the token before `at` already ended its line, i.e. `at`
/// is a blank line rather than trailing whitespace after content.
fn prev_ends_line(ctx: &FileContext<'_>, at: usize) -> bool {
    let Some(prev) = at.checked_sub(1) else {
        return false;
    };
    let token = ctx.token(prev);
    token.kind == TokenKind::Whitespace && token.text.ends_with('\n')
}

fn inside_function(ctx: &FileContext<'_>, at: usize) -> bool {
    ctx.note(at)
        .conditions
        .iter()
        .any(|&kw| ctx.token(kw).kind == TokenKind::KeywordFunction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{messages, run_rule};

    #[test]
    fn clean_files_pass() {
        assert!(run_rule(&SuperfluousWhitespace::new(), "$a = 1;\n$b = 2;\n").is_empty());
    }

    #[test]
    fn leading_whitespace_is_flagged() {
        let found = messages(&SuperfluousWhitespace::new(), "\n$a = 1;\n");
        assert_eq!(found, vec!["Additional whitespace found at start of file"]);
    }

    #[test]
    fn trailing_line_whitespace_is_flagged() {
        let found = messages(&SuperfluousWhitespace::new(), "$a = 1;  \n$b = 2;\n");
        assert_eq!(found, vec!["Whitespace found at end of line"]);
    }

    #[test]
    fn blank_lines_at_end_of_file_are_flagged() {
        let found = messages(&SuperfluousWhitespace::new(), "$a = 1;\n\n");
        assert_eq!(found, vec!["Additional whitespace found at end of file"]);
    }

    #[test]
    fn single_blank_lines_in_functions_pass() {
        let source = "function f($a) {\ng();\n\nh();\n}\n";
        assert!(run_rule(&SuperfluousWhitespace::new(), source).is_empty());
    }

    #[test]
    fn doubled_blank_lines_in_functions_are_flagged() {
        let source = "function f($a) {\ng();\n\n\nh();\n}\n";
        let found = messages(&SuperfluousWhitespace::new(), source);
        assert_eq!(found, vec!["Function contains multiple empty lines in a row"]);
    }

    #[test]
    fn doubled_blank_lines_outside_functions_pass() {
        assert!(run_rule(&SuperfluousWhitespace::new(), "g();\n\n\nh();\n").is_empty());
    }
}
