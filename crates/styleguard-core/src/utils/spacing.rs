//! Spacing and alignment math shared across rules.
//!
//! Several rules measure exact whitespace runs and column positions;
//! the arithmetic lives here as free functions so rules stay small.

use crate::stream::TokenStream;
use crate::token::TokenKind;

/// Column of the first non-whitespace token on the line containing
/// `at`. This anchors alignment checks: closers and entries of a
/// multi-line construct line up against it.
#[must_use]
pub fn line_start_column(stream: &TokenStream, at: usize) -> usize {
    let line = stream.token(at).line;
    let mut column = stream.token(at).column;
    let mut i = at;
    loop {
        let token = stream.token(i);
        if token.line != line {
            break;
        }
        if token.kind != TokenKind::Whitespace {
            column = token.column;
        }
        if i == 0 {
            break;
        }
        i -= 1;
    }
    column
}

/// Width in characters of the whitespace run immediately after `at`,
/// or 0 when the next token is not whitespace.
#[must_use]
pub fn whitespace_after(stream: &TokenStream, at: usize) -> usize {
    match stream.get(at + 1) {
        Some(token) if token.kind == TokenKind::Whitespace => token.width(),
        _ => 0,
    }
}

/// Width in characters of the whitespace run immediately before `at`,
/// or 0 when the previous token is not whitespace.
#[must_use]
pub fn whitespace_before(stream: &TokenStream, at: usize) -> usize {
    match at.checked_sub(1).and_then(|i| stream.get(i)) {
        Some(token) if token.kind == TokenKind::Whitespace => token.width(),
        _ => 0,
    }
}

/// Formats a count of spaces the way messages phrase it: "1 space",
/// "0 spaces", "4 spaces".
#[must_use]
pub fn space_word(count: usize) -> String {
    if count == 1 {
        "1 space".to_string()
    } else {
        format!("{count} spaces")
    }
}
