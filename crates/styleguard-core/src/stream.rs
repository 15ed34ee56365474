//! Token stream and navigation primitives.

use crate::lexer::tokenize;
use crate::token::{Token, TokenKind};

/// The ordered token sequence for exactly one source file.
///
/// Indices are contiguous and stable for the stream's lifetime. The
/// stream is created per file-check invocation and discarded with it;
/// nothing here survives across files.
#[derive(Debug)]
pub struct TokenStream {
    tokens: Vec<Token>,
    /// Byte offset of each token's first character, for span rendering.
    offsets: Vec<usize>,
}

impl TokenStream {
    /// Wraps an already-lexed token sequence.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut offsets = Vec::with_capacity(tokens.len());
        let mut offset = 0;
        for token in &tokens {
            offsets.push(offset);
            offset += token.text.len();
        }
        Self { tokens, offsets }
    }

    /// Lexes source text into a stream.
    #[must_use]
    pub fn from_source(source: &str) -> Self {
        Self::new(tokenize(source))
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True when the file lexed to nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// All tokens in order.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The token at `index`.
    ///
    /// # Panics
    ///
    /// Panics when `index` is out of bounds; rule callbacks only ever
    /// see indices the dispatcher handed them.
    #[must_use]
    pub fn token(&self, index: usize) -> &Token {
        &self.tokens[index]
    }

    /// The token at `index`, or `None` past the end.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Byte offset of the token's first character in the source.
    #[must_use]
    pub fn byte_offset(&self, index: usize) -> usize {
        self.offsets.get(index).copied().unwrap_or(0)
    }

    /// Scans forward from `from` for the first token whose kind is in
    /// `kinds` (or, with `negate`, the first whose kind is not).
    ///
    /// The scan stops before `until` when given, otherwise at the end
    /// of the stream. Returns `None` when nothing matches; a match at
    /// index 0 is never conflated with "not found".
    #[must_use]
    pub fn find_next(
        &self,
        kinds: &[TokenKind],
        from: usize,
        until: Option<usize>,
        negate: bool,
    ) -> Option<usize> {
        let end = until.unwrap_or(self.tokens.len()).min(self.tokens.len());
        (from..end).find(|&i| kinds.contains(&self.tokens[i].kind) != negate)
    }

    /// Scans backward from `from` (inclusive) down to `until`
    /// (inclusive, default 0), mirroring [`Self::find_next`].
    #[must_use]
    pub fn find_previous(
        &self,
        kinds: &[TokenKind],
        from: usize,
        until: Option<usize>,
        negate: bool,
    ) -> Option<usize> {
        if self.tokens.is_empty() {
            return None;
        }
        let start = from.min(self.tokens.len() - 1);
        let floor = until.unwrap_or(0);
        (floor..=start)
            .rev()
            .find(|&i| kinds.contains(&self.tokens[i].kind) != negate)
    }

    /// First token at or after `from` that is not whitespace or a
    /// comment.
    #[must_use]
    pub fn next_non_empty(&self, from: usize) -> Option<usize> {
        self.find_next(TokenKind::EMPTY, from, None, true)
    }

    /// Last token at or before `from` that is not whitespace or a
    /// comment.
    #[must_use]
    pub fn prev_non_empty(&self, from: usize) -> Option<usize> {
        self.find_previous(TokenKind::EMPTY, from, None, true)
    }

    /// Concatenates the raw text of `count` tokens starting at `start`.
    ///
    /// Used to reconstruct source snippets for messages; slices past
    /// the end are clipped.
    #[must_use]
    pub fn tokens_as_string(&self, start: usize, count: usize) -> String {
        self.tokens
            .iter()
            .skip(start)
            .take(count)
            .map(|t| t.text.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(source: &str) -> TokenStream {
        TokenStream::from_source(source)
    }

    #[test]
    fn find_next_respects_bounds_and_negation() {
        // 0:a 1:ws 2:, 3:ws 4:b 5:, 6:c
        let s = stream("a , b,c");
        assert_eq!(s.find_next(&[TokenKind::Comma], 0, None, false), Some(2));
        assert_eq!(s.find_next(&[TokenKind::Comma], 3, None, false), Some(5));
        assert_eq!(s.find_next(&[TokenKind::Comma], 3, Some(5), false), None);
        // Negated: first non-whitespace from index 1.
        assert_eq!(
            s.find_next(&[TokenKind::Whitespace], 1, None, true),
            Some(2)
        );
    }

    #[test]
    fn find_previous_mirrors_find_next() {
        let s = stream("a , b,c");
        assert_eq!(s.find_previous(&[TokenKind::Comma], 6, None, false), Some(5));
        assert_eq!(s.find_previous(&[TokenKind::Comma], 4, None, false), Some(2));
        assert_eq!(s.find_previous(&[TokenKind::Comma], 4, Some(3), false), None);
    }

    #[test]
    fn match_at_index_zero_is_found() {
        let s = stream(",x");
        assert_eq!(s.find_previous(&[TokenKind::Comma], 1, None, false), Some(0));
        assert_eq!(s.find_next(&[TokenKind::Comma], 0, None, false), Some(0));
    }

    #[test]
    fn search_never_overruns_the_stream() {
        let s = stream("a");
        assert_eq!(s.find_next(&[TokenKind::Comma], 5, None, false), None);
        assert_eq!(s.find_previous(&[TokenKind::Comma], 99, None, false), None);
        assert_eq!(
            s.find_previous(&[TokenKind::Identifier], 99, None, false),
            Some(0)
        );
    }

    #[test]
    fn non_empty_skips_comments_too() {
        // 0:a 1:ws 2:comment 3:ws(newline) 4:b
        let s = stream("a // hi\nb");
        assert_eq!(s.next_non_empty(1), Some(4));
        assert_eq!(s.prev_non_empty(3), Some(0));
    }

    #[test]
    fn tokens_as_string_rebuilds_slices() {
        let s = stream("foo ($bar)");
        assert_eq!(s.tokens_as_string(0, 3), "foo (");
        assert_eq!(s.tokens_as_string(3, 99), "$bar)");
    }

    #[test]
    fn byte_offsets_are_cumulative() {
        let s = stream("ab  cd");
        assert_eq!(s.byte_offset(0), 0);
        assert_eq!(s.byte_offset(1), 2);
        assert_eq!(s.byte_offset(2), 4);
    }
}
