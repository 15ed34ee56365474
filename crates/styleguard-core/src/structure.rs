//! Scope and structure indexing.
//!
//! One left-to-right pass over a token stream annotates every token
//! with its delimiter partner, brace nesting depth, enclosing
//! parenthesis count, innermost enclosing scope pair, and the chain of
//! construct keywords it sits inside. Rules read these notes instead of
//! re-deriving structure.

use thiserror::Error;

use crate::stream::TokenStream;
use crate::token::TokenKind;

/// Structural defects that make a file unprocessable.
///
/// Any of these aborts rule dispatch for the file; the engine surfaces
/// the error as a single diagnostic rather than a crash.
#[derive(Debug, Error)]
pub enum StructureError {
    /// A closing delimiter with no open construct to close.
    #[error("unexpected '{found}' at {line}:{column} with no matching opener")]
    UnmatchedCloser {
        /// The closer that was found.
        found: char,
        /// 1-based line of the closer.
        line: usize,
        /// 1-based column of the closer.
        column: usize,
    },

    /// A closing delimiter of the wrong kind for the innermost opener.
    #[error("'{found}' at {line}:{column} does not close '{opened}' opened at {opened_line}:{opened_column}")]
    MismatchedPair {
        /// The closer that was found.
        found: char,
        /// 1-based line of the closer.
        line: usize,
        /// 1-based column of the closer.
        column: usize,
        /// The innermost open delimiter.
        opened: char,
        /// 1-based line of the opener.
        opened_line: usize,
        /// 1-based column of the opener.
        opened_column: usize,
    },

    /// An opener that never closes before the end of the file.
    #[error("unclosed '{opened}' opened at {line}:{column}")]
    UnclosedOpener {
        /// The delimiter left open.
        opened: char,
        /// 1-based line of the opener.
        line: usize,
        /// 1-based column of the opener.
        column: usize,
    },
}

impl StructureError {
    /// Position to anchor the resulting diagnostic at.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        match *self {
            Self::UnmatchedCloser { line, column, .. }
            | Self::MismatchedPair { line, column, .. }
            | Self::UnclosedOpener { line, column, .. } => (line, column),
        }
    }
}

/// Structural facts for one token.
///
/// Tokens stay immutable; everything derived lives here, one note per
/// token index.
#[derive(Debug, Clone, Default)]
pub struct TokenNote {
    /// Count of brace scopes enclosing this token. A brace pair carries
    /// the depth outside itself; contained tokens are one deeper.
    pub depth: usize,
    /// Count of parenthesis pairs enclosing this token, under the same
    /// convention as `depth`.
    pub paren_depth: usize,
    /// For delimiter tokens, the index of the matching partner.
    pub partner: Option<usize>,
    /// For delimiter tokens, the construct keyword owning the pair.
    pub owner: Option<usize>,
    /// Opening brace of the innermost enclosing scope, if any.
    pub scope_opener: Option<usize>,
    /// Closing brace of the innermost enclosing scope, if any.
    pub scope_closer: Option<usize>,
    /// For construct keywords, the parenthesis pair they own
    /// (`if (...)`, `array (...)`).
    pub paren_opener: Option<usize>,
    /// Closer of the owned parenthesis pair.
    pub paren_closer: Option<usize>,
    /// For scope-owning keywords, the opening brace of their body.
    pub owned_opener: Option<usize>,
    /// For scope-owning keywords, the closing brace of their body.
    pub owned_closer: Option<usize>,
    /// Construct keyword indices enclosing this token, outermost first:
    /// the "inside function X inside class Y" chain.
    pub conditions: Vec<usize>,
}

/// Per-token structural annotations for one stream.
#[derive(Debug)]
pub struct StructureIndex {
    notes: Vec<TokenNote>,
}

impl StructureIndex {
    /// Runs the indexing pass.
    ///
    /// # Errors
    ///
    /// Returns a [`StructureError`] when delimiters are unbalanced or
    /// interleaved; the stream is unusable for rule dispatch then.
    pub fn build(stream: &TokenStream) -> Result<Self, StructureError> {
        Indexer::new(stream).run()
    }

    /// The note for the token at `index`.
    ///
    /// # Panics
    ///
    /// Panics when `index` is out of bounds for the indexed stream.
    #[must_use]
    pub fn note(&self, index: usize) -> &TokenNote {
        &self.notes[index]
    }

    /// Number of annotated tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// True when the indexed stream was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

struct Indexer<'a> {
    stream: &'a TokenStream,
    notes: Vec<TokenNote>,
    /// Open delimiters, innermost last.
    stack: Vec<usize>,
    /// Open braces only, for enclosing-scope lookup.
    brace_stack: Vec<usize>,
    /// Owned-scope keywords currently open, outermost first.
    conditions: Vec<usize>,
    paren_count: usize,
}

impl<'a> Indexer<'a> {
    fn new(stream: &'a TokenStream) -> Self {
        Self {
            stream,
            notes: vec![TokenNote::default(); stream.len()],
            stack: Vec::new(),
            brace_stack: Vec::new(),
            conditions: Vec::new(),
            paren_count: 0,
        }
    }

    fn run(mut self) -> Result<StructureIndex, StructureError> {
        for i in 0..self.stream.len() {
            let kind = self.stream.token(i).kind;
            if kind.is_opener() {
                self.open(i, kind);
            } else if kind.is_closer() {
                self.close(i, kind)?;
            } else {
                self.annotate(i);
            }
        }

        if let Some(&open) = self.stack.last() {
            let token = self.stream.token(open);
            return Err(StructureError::UnclosedOpener {
                opened: delimiter_char(token.kind),
                line: token.line,
                column: token.column,
            });
        }

        // The closer of each enclosing pair is the opener's partner;
        // fill it in now that every partner is known.
        for i in 0..self.notes.len() {
            if let Some(opener) = self.notes[i].scope_opener {
                let closer = self.notes[opener].partner;
                self.notes[i].scope_closer = closer;
            }
        }

        Ok(StructureIndex { notes: self.notes })
    }

    /// Depth/scope/condition facts for a token outside any delimiter
    /// transition.
    fn annotate(&mut self, i: usize) {
        self.notes[i].depth = self.brace_stack.len();
        self.notes[i].paren_depth = self.paren_count;
        self.notes[i].scope_opener = self.brace_stack.last().copied();
        self.notes[i].conditions.clone_from(&self.conditions);
    }

    fn open(&mut self, i: usize, kind: TokenKind) {
        // The opener itself sits outside the pair it creates.
        self.annotate(i);

        match kind {
            TokenKind::OpenParen => {
                if let Some(owner) = self.paren_owner(i) {
                    self.notes[i].owner = Some(owner);
                    if self.notes[owner].paren_opener.is_none() {
                        self.notes[owner].paren_opener = Some(i);
                    }
                }
                self.paren_count += 1;
            }
            TokenKind::OpenBrace => {
                if let Some(owner) = self.brace_owner(i) {
                    self.notes[i].owner = Some(owner);
                    self.notes[owner].owned_opener = Some(i);
                    self.conditions.push(owner);
                }
                self.brace_stack.push(i);
            }
            _ => {}
        }
        self.stack.push(i);
    }

    fn close(&mut self, i: usize, kind: TokenKind) -> Result<(), StructureError> {
        let token = self.stream.token(i);
        let Some(open) = self.stack.pop() else {
            return Err(StructureError::UnmatchedCloser {
                found: delimiter_char(kind),
                line: token.line,
                column: token.column,
            });
        };

        let open_token = self.stream.token(open);
        if open_token.kind.matching_closer() != Some(kind) {
            return Err(StructureError::MismatchedPair {
                found: delimiter_char(kind),
                line: token.line,
                column: token.column,
                opened: delimiter_char(open_token.kind),
                opened_line: open_token.line,
                opened_column: open_token.column,
            });
        }

        match kind {
            TokenKind::CloseParen => {
                self.paren_count -= 1;
                if let Some(owner) = self.notes[open].owner {
                    self.notes[i].owner = Some(owner);
                    if self.notes[owner].paren_closer.is_none() {
                        self.notes[owner].paren_closer = Some(i);
                    }
                }
            }
            TokenKind::CloseBrace => {
                self.brace_stack.pop();
                if let Some(owner) = self.notes[open].owner {
                    self.notes[i].owner = Some(owner);
                    self.notes[owner].owned_closer = Some(i);
                    self.conditions.pop();
                }
            }
            _ => {}
        }

        self.notes[i].partner = Some(open);
        self.notes[open].partner = Some(i);
        // The closer carries the depth outside the pair, same as its
        // opener.
        self.annotate(i);
        Ok(())
    }

    /// Construct keyword owning a parenthesis pair opening at `i`,
    /// if any: `array (`, `if (`, `function name (`, ...
    fn paren_owner(&self, i: usize) -> Option<usize> {
        let prev = self.stream.prev_non_empty(i.checked_sub(1)?)?;
        let kind = self.stream.token(prev).kind;
        if kind == TokenKind::KeywordArray || TokenKind::SCOPE_OWNERS.contains(&kind) {
            return Some(prev);
        }
        if kind == TokenKind::Identifier {
            let before = self.stream.prev_non_empty(prev.checked_sub(1)?)?;
            if self.stream.token(before).kind == TokenKind::KeywordFunction {
                return Some(before);
            }
        }
        None
    }

    /// Scope-owning keyword for a brace opening at `i`, if any.
    ///
    /// Walks back over the construct head: a condition parenthesis
    /// pair (`if (...) {`), a declaration name (`class Foo {`,
    /// `function foo() {`), or a bare keyword (`else {`, `do {`,
    /// `try {`).
    fn brace_owner(&self, i: usize) -> Option<usize> {
        let prev = self.stream.prev_non_empty(i.checked_sub(1)?)?;
        let kind = self.stream.token(prev).kind;

        match kind {
            TokenKind::CloseParen => {
                let open = self.notes[prev].partner?;
                let before = self.stream.prev_non_empty(open.checked_sub(1)?)?;
                let before_kind = self.stream.token(before).kind;
                if TokenKind::SCOPE_OWNERS.contains(&before_kind) {
                    return Some(before);
                }
                if before_kind == TokenKind::Identifier {
                    let head = self.stream.prev_non_empty(before.checked_sub(1)?)?;
                    if self.stream.token(head).kind == TokenKind::KeywordFunction {
                        return Some(head);
                    }
                }
                None
            }
            TokenKind::Identifier => {
                let head = self.stream.prev_non_empty(prev.checked_sub(1)?)?;
                let head_kind = self.stream.token(head).kind;
                matches!(
                    head_kind,
                    TokenKind::KeywordClass | TokenKind::KeywordInterface
                )
                .then_some(head)
            }
            TokenKind::KeywordElse | TokenKind::KeywordDo | TokenKind::KeywordTry => Some(prev),
            _ => None,
        }
    }
}

fn delimiter_char(kind: TokenKind) -> char {
    match kind {
        TokenKind::OpenParen => '(',
        TokenKind::CloseParen => ')',
        TokenKind::OpenBrace => '{',
        TokenKind::CloseBrace => '}',
        TokenKind::OpenBracket => '[',
        _ => ']',
    }
}
