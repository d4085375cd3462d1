//! Token types produced by the scanner.

use std::fmt;

/// Why the scanner could not produce a regular token.
///
/// Errors are encoded as a token kind rather than a `Result::Err`: the scanner
/// has no failure mode and leaves reporting to the generator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LexError {
    /// A byte that starts no token (e.g. `@`, `{`, non-ASCII).
    UnexpectedCharacter,
    /// A `"` with no closing quote before end of input.
    UnterminatedString,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnexpectedCharacter => write!(f, "Unexpected character."),
            LexError::UnterminatedString => write!(f, "Unterminated string."),
        }
    }
}

/// Kind of a scanned token.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Punctuation
    Semicolon,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Comma,
    Dot,

    // Operators
    Equal,
    EqualEqual,
    BangEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Plus,
    Minus,
    Star,
    Slash,
    Bang,

    // Literals
    String,
    Number,
    Identifier,

    // Keywords
    Print,
    Include,
    True,
    False,
    Nil,

    /// Input the scanner could not make sense of.
    Error(LexError),
    /// End of input. Returned forever once reached.
    Eof,
}

impl TokenKind {
    /// Whether this kind begins a statement, used when resynchronizing
    /// after an error.
    #[inline]
    pub fn starts_statement(self) -> bool {
        matches!(self, TokenKind::Print | TokenKind::Include)
    }
}

/// A token borrowed from the source text.
///
/// For string literals `text` excludes the surrounding quotes; for every other
/// kind it is the exact lexeme. `line` is 1-based.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub line: u32,
}

impl<'src> Token<'src> {
    #[inline]
    pub fn new(kind: TokenKind, text: &'src str, line: u32) -> Self {
        Token { kind, text, line }
    }

    /// Placeholder used before the first token has been scanned.
    #[inline]
    pub fn none() -> Self {
        Token::new(TokenKind::Eof, "", 0)
    }

    #[inline]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}
