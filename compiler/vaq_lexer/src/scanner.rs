//! Lazy, line-tracking scanner built on logos.
//!
//! Whitespace and `#` line comments are skipped. Newlines are counted through
//! the lexer extras so every token carries the line it starts on.

use logos::{Lexer, Logos, Skip};

use crate::token::{LexError, Token, TokenKind};

/// Line bookkeeping carried in the logos extras.
///
/// `pending` holds newlines found inside the token just matched (multi-line
/// strings); they are applied after that token's line has been read.
#[derive(Clone, Copy, Debug, Default)]
struct LineTracker {
    line: u32,
    pending: u32,
}

/// Raw token from logos, before keyword/literal post-processing.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(extras = LineTracker)]
#[logos(skip r"[ \t\r\f]+|#[^\n]*")]
enum RawToken {
    #[token("\n", newline)]
    Newline,

    #[token(";")]
    Semicolon,
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("[")]
    LeftBracket,
    #[token("]")]
    RightBracket,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,

    #[token("=")]
    Equal,
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    BangEqual,
    #[token("<")]
    Less,
    #[token("<=")]
    LessEqual,
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEqual,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("!")]
    Bang,

    #[token("print")]
    Print,
    #[token("include")]
    Include,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("nil")]
    Nil,

    // No escape processing: everything up to the next quote is content.
    #[regex(r#""[^"]*""#, string_lines)]
    String,

    #[regex(r#""[^"]*"#, string_lines)]
    UnterminatedString,

    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,
}

fn newline(lex: &mut Lexer<'_, RawToken>) -> Skip {
    lex.extras.line += 1;
    Skip
}

fn string_lines(lex: &mut Lexer<'_, RawToken>) {
    let newlines = lex.slice().bytes().filter(|&b| b == b'\n').count();
    lex.extras.pending = u32::try_from(newlines).unwrap_or(u32::MAX);
}

/// Scanner over one source file.
///
/// Tokens are produced on demand by [`Scanner::scan_token`]; once the input
/// is exhausted every further call returns an [`TokenKind::Eof`] token.
pub struct Scanner<'src> {
    lexer: Lexer<'src, RawToken>,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Scanner {
            lexer: RawToken::lexer(source),
        }
    }

    /// 1-based line the scanner is currently on.
    #[inline]
    pub fn line(&self) -> u32 {
        self.lexer.extras.line + 1
    }

    /// Produce the next token.
    pub fn scan_token(&mut self) -> Token<'src> {
        let Some(result) = self.lexer.next() else {
            return Token::new(TokenKind::Eof, "", self.line());
        };

        let line = self.line();
        let pending = std::mem::take(&mut self.lexer.extras.pending);
        self.lexer.extras.line += pending;

        let slice = self.lexer.slice();
        match result {
            Ok(RawToken::String) => Token::new(TokenKind::String, &slice[1..slice.len() - 1], line),
            Ok(RawToken::UnterminatedString) => Token::new(
                TokenKind::Error(LexError::UnterminatedString),
                slice,
                line,
            ),
            Ok(raw) => Token::new(convert(raw), slice, line),
            Err(()) => Token::new(TokenKind::Error(LexError::UnexpectedCharacter), slice, line),
        }
    }
}

impl<'src> Iterator for Scanner<'src> {
    type Item = Token<'src>;

    /// Yields every token up to, but not including, end of input.
    fn next(&mut self) -> Option<Token<'src>> {
        let token = self.scan_token();
        (token.kind != TokenKind::Eof).then_some(token)
    }
}

fn convert(raw: RawToken) -> TokenKind {
    match raw {
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::LeftParen => TokenKind::LeftParen,
        RawToken::RightParen => TokenKind::RightParen,
        RawToken::LeftBracket => TokenKind::LeftBracket,
        RawToken::RightBracket => TokenKind::RightBracket,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Equal => TokenKind::Equal,
        RawToken::EqualEqual => TokenKind::EqualEqual,
        RawToken::BangEqual => TokenKind::BangEqual,
        RawToken::Less => TokenKind::Less,
        RawToken::LessEqual => TokenKind::LessEqual,
        RawToken::Greater => TokenKind::Greater,
        RawToken::GreaterEqual => TokenKind::GreaterEqual,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Bang => TokenKind::Bang,
        RawToken::Print => TokenKind::Print,
        RawToken::Include => TokenKind::Include,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::Nil => TokenKind::Nil,
        RawToken::String => TokenKind::String,
        RawToken::UnterminatedString => TokenKind::Error(LexError::UnterminatedString),
        RawToken::Number => TokenKind::Number,
        RawToken::Identifier => TokenKind::Identifier,
        // Newlines are skipped by their callback and never surface.
        RawToken::Newline => TokenKind::Error(LexError::UnexpectedCharacter),
    }
}
