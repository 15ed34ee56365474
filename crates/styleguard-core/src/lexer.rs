//! Lexer producing the token sequence for one source file.
//!
//! Tokenizing is total: every input character lands in exactly one
//! token's text, so concatenating the texts reproduces the input.
//! Malformed constructs (unterminated strings or comments) lex to the
//! end of input instead of failing; delimiter balance is checked later
//! by the structure indexer, not here.

use crate::token::{Token, TokenKind};

/// Characters that merge into a single [`TokenKind::Operator`] run.
const OPERATOR_CHARS: &str = "+-*/%=<>!&|^.~?:";

/// Tokenizes raw source text.
#[must_use]
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).run()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    fn peek(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    /// Consumes one character into `text`, updating line/column.
    fn bump(&mut self, text: &mut String) {
        let c = self.chars[self.pos];
        self.pos += 1;
        text.push(c);
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    fn run(mut self) -> Vec<Token> {
        while self.pos < self.chars.len() {
            let line = self.line;
            let column = self.column;
            let (kind, text) = self.next_token();
            let index = self.tokens.len();
            self.tokens.push(Token {
                kind,
                text,
                line,
                column,
                index,
            });
        }
        self.tokens
    }

    fn next_token(&mut self) -> (TokenKind, String) {
        let mut text = String::new();
        let c = self.chars[self.pos];

        if c.is_whitespace() {
            return (self.lex_whitespace(&mut text), text);
        }
        if c == '$' && self.peek(1).is_some_and(|n| n.is_alphanumeric() || n == '_') {
            self.bump(&mut text);
            self.take_word(&mut text);
            return (TokenKind::Variable, text);
        }
        if c.is_alphabetic() || c == '_' {
            self.take_word(&mut text);
            let kind = TokenKind::keyword(&text).unwrap_or(TokenKind::Identifier);
            return (kind, text);
        }
        if c.is_ascii_digit() {
            return (self.lex_number(&mut text), text);
        }
        if c == '\'' || c == '"' {
            return (self.lex_string(c, &mut text), text);
        }
        if c == '/' && matches!(self.peek(1), Some('/' | '*')) {
            return (self.lex_slash_comment(&mut text), text);
        }
        if c == '#' {
            return (self.lex_line_comment(&mut text), text);
        }
        if c == '=' && self.peek(1) == Some('>') {
            self.bump(&mut text);
            self.bump(&mut text);
            return (TokenKind::DoubleArrow, text);
        }

        let kind = match c {
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            '{' => TokenKind::OpenBrace,
            '}' => TokenKind::CloseBrace,
            '[' => TokenKind::OpenBracket,
            ']' => TokenKind::CloseBracket,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '@' => TokenKind::Silencer,
            _ if OPERATOR_CHARS.contains(c) => {
                return (self.lex_operator(&mut text), text);
            }
            _ => TokenKind::Unknown,
        };
        self.bump(&mut text);
        (kind, text)
    }

    /// A whitespace run never spans a line break: it ends with the
    /// newline it reaches, and the next line's indent starts a fresh
    /// token. Spacing and line-oriented rules depend on this shape.
    fn lex_whitespace(&mut self, text: &mut String) -> TokenKind {
        while let Some(c) = self.peek(0) {
            if !c.is_whitespace() {
                break;
            }
            let is_newline = c == '\n';
            self.bump(text);
            if is_newline {
                break;
            }
        }
        TokenKind::Whitespace
    }

    fn take_word(&mut self, text: &mut String) {
        while let Some(c) = self.peek(0) {
            if c.is_alphanumeric() || c == '_' {
                self.bump(text);
            } else {
                break;
            }
        }
    }

    fn lex_number(&mut self, text: &mut String) -> TokenKind {
        let mut seen_dot = false;
        while let Some(c) = self.peek(0) {
            if c.is_ascii_digit() {
                self.bump(text);
            } else if c == '.' && !seen_dot && self.peek(1).is_some_and(|n| n.is_ascii_digit()) {
                seen_dot = true;
                self.bump(text);
            } else {
                break;
            }
        }
        TokenKind::Number
    }

    fn lex_string(&mut self, quote: char, text: &mut String) -> TokenKind {
        self.bump(text);
        while let Some(c) = self.peek(0) {
            if c == '\\' && self.peek(1).is_some() {
                self.bump(text);
                self.bump(text);
                continue;
            }
            self.bump(text);
            if c == quote {
                break;
            }
        }
        TokenKind::StringLiteral
    }

    fn lex_slash_comment(&mut self, text: &mut String) -> TokenKind {
        self.bump(text);
        if self.peek(0) == Some('/') {
            return self.lex_line_comment(text);
        }
        // Block comment; runs to the closing marker or end of input.
        self.bump(text);
        while let Some(c) = self.peek(0) {
            if c == '*' && self.peek(1) == Some('/') {
                self.bump(text);
                self.bump(text);
                break;
            }
            self.bump(text);
        }
        if text.starts_with("/**") && text.chars().count() > 4 {
            TokenKind::DocComment
        } else {
            TokenKind::Comment
        }
    }

    fn lex_line_comment(&mut self, text: &mut String) -> TokenKind {
        while let Some(c) = self.peek(0) {
            if c == '\n' {
                break;
            }
            self.bump(text);
        }
        TokenKind::Comment
    }

    fn lex_operator(&mut self, text: &mut String) -> TokenKind {
        while let Some(c) = self.peek(0) {
            if !OPERATOR_CHARS.contains(c) {
                break;
            }
            // Stop before a double arrow so `1=>2` still yields one.
            if c == '=' && self.peek(1) == Some('>') && !text.is_empty() {
                break;
            }
            self.bump(text);
        }
        TokenKind::Operator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn round_trips_every_byte() {
        let source = "if ($a == 1) {\n  // note\n  foo($b, 'x\\'y');\n}\n";
        let rebuilt: String = tokenize(source).iter().map(|t| t.text.as_str()).collect();
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn classifies_a_simple_statement() {
        assert_eq!(
            kinds("foo($a, 2);"),
            vec![
                TokenKind::Identifier,
                TokenKind::OpenParen,
                TokenKind::Variable,
                TokenKind::Comma,
                TokenKind::Whitespace,
                TokenKind::Number,
                TokenKind::CloseParen,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn keywords_keep_their_raw_spelling() {
        let tokens = tokenize("Array(1)");
        assert_eq!(tokens[0].kind, TokenKind::KeywordArray);
        assert_eq!(tokens[0].text, "Array");
    }

    #[test]
    fn whitespace_breaks_at_newlines() {
        let tokens = tokenize("a  \n    b");
        assert_eq!(tokens[1].kind, TokenKind::Whitespace);
        assert_eq!(tokens[1].text, "  \n");
        assert_eq!(tokens[2].kind, TokenKind::Whitespace);
        assert_eq!(tokens[2].text, "    ");
        assert_eq!(tokens[3].line, 2);
        assert_eq!(tokens[3].column, 5);
    }

    #[test]
    fn comments_are_first_class() {
        let tokens = tokenize("// line\n/* block */\n/** doc */");
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].text, "// line");
        assert_eq!(tokens[2].kind, TokenKind::Comment);
        assert_eq!(tokens[4].kind, TokenKind::DocComment);
    }

    #[test]
    fn double_arrow_and_silencer() {
        assert_eq!(
            kinds("'k'=>@f()"),
            vec![
                TokenKind::StringLiteral,
                TokenKind::DoubleArrow,
                TokenKind::Silencer,
                TokenKind::Identifier,
                TokenKind::OpenParen,
                TokenKind::CloseParen,
            ]
        );
    }

    #[test]
    fn unterminated_string_lexes_to_end_of_input() {
        let tokens = tokenize("'oops");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].text, "'oops");
    }

    #[test]
    fn positions_are_one_based() {
        let tokens = tokenize("a\nbb");
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[2].line, tokens[2].column), (2, 1));
    }
}
