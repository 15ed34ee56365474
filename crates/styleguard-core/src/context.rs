//! Context handed to rule invocations.

use crate::diagnostics::Location;
use crate::stream::TokenStream;
use crate::structure::{StructureIndex, TokenNote};
use crate::token::Token;

/// Everything a rule may look at while checking one file.
///
/// The context is built once per file and passed explicitly into every
/// rule call; there is no ambient token table. Rules receive it behind
/// a shared reference, so neither tokens nor notes can be mutated from
/// a check.
#[derive(Debug, Clone, Copy)]
pub struct FileContext<'a> {
    /// Identifier of the file being checked.
    pub file: &'a str,
    /// The token stream.
    pub stream: &'a TokenStream,
    /// Structural annotations for the stream.
    pub index: &'a StructureIndex,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(file: &'a str, stream: &'a TokenStream, index: &'a StructureIndex) -> Self {
        Self {
            file,
            stream,
            index,
        }
    }

    /// The token at `at`.
    #[must_use]
    pub fn token(&self, at: usize) -> &Token {
        self.stream.token(at)
    }

    /// The structural note for the token at `at`.
    #[must_use]
    pub fn note(&self, at: usize) -> &TokenNote {
        self.index.note(at)
    }

    /// A diagnostic location pointing at the token at `at`, span
    /// included.
    #[must_use]
    pub fn location(&self, at: usize) -> Location {
        let token = self.stream.token(at);
        Location::new(self.file, token.line, token.column)
            .with_span(self.stream.byte_offset(at), token.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_carries_span_information() {
        let stream = TokenStream::from_source("ab cd");
        let index = StructureIndex::build(&stream).expect("balanced");
        let ctx = FileContext::new("x.php", &stream, &index);

        let location = ctx.location(2);
        assert_eq!(location.file, "x.php");
        assert_eq!((location.line, location.column), (1, 4));
        assert_eq!((location.offset, location.length), (3, 2));
    }
}
