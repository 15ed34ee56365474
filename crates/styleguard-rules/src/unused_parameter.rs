//! Rule reporting function parameters the body never uses.
//!
//! Empty bodies and bare-return stubs are exempt: implementations of an
//! interface often only need some of the declared parameters.

use crate::helpers::signature_params;
use styleguard_core::{Diagnostic, FileContext, Rule, Severity, TokenKind};

/// Rule code for unused-parameter.
pub const CODE: &str = "SG011";

/// Rule name for unused-parameter.
pub const NAME: &str = "unused-parameter";

/// Warns when a declared parameter is never read in the body.
#[derive(Debug, Clone, Default)]
pub struct UnusedParameter;

impl UnusedParameter {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for UnusedParameter {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Warns about function parameters the body never uses"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn kinds(&self) -> &'static [TokenKind] {
        &[TokenKind::KeywordFunction]
    }

    fn check(&self, ctx: &FileContext<'_>, at: usize) -> Vec<Diagnostic> {
        let note = ctx.note(at);
        let (Some(opener), Some(closer)) = (note.owned_opener, note.owned_closer) else {
            return Vec::new();
        };

        let params = signature_params(ctx, at);
        if params.is_empty() {
            return Vec::new();
        }

        let Some(first) = ctx
            .stream
            .find_next(TokenKind::EMPTY, opener + 1, Some(closer), true)
        else {
            // Empty body: nothing could use the parameters.
            return Vec::new();
        };
        if is_stub_body(ctx, first, closer) {
            return Vec::new();
        }

        let mut diagnostics = Vec::new();
        for &param in &params {
            let name = &ctx.token(param).text;
            let used = ((opener + 1)..closer).any(|i| {
                let token = ctx.token(i);
                token.kind == TokenKind::Variable && token.text == *name
            });
            if !used {
                diagnostics.push(Diagnostic::new(
                    CODE,
                    NAME,
                    Severity::Warning,
                    ctx.location(param),
                    format!("Unused function parameter {name}"),
                ));
            }
        }
        diagnostics
    }
}

/// A body whose only statement is `return <literal>;` (or a bare
/// `return;`) is an interface stub, not a real implementation.
fn is_stub_body(ctx: &FileContext<'_>, first: usize, closer: usize) -> bool {
    if ctx.token(first).kind != TokenKind::KeywordReturn {
        return false;
    }
    let Some(end) = ctx
        .stream
        .find_next(&[TokenKind::Semicolon], first + 1, Some(closer), false)
    else {
        return false;
    };
    let only_literals = ((first + 1)..end).all(|i| {
        matches!(
            ctx.token(i).kind,
            TokenKind::Whitespace
                | TokenKind::Comment
                | TokenKind::Number
                | TokenKind::StringLiteral
        )
    });
    only_literals && ctx.stream.next_non_empty(end + 1).map_or(true, |n| n >= closer)
}
