//! Scanner for the vaq-make build description language.
//!
//! Turns source text into a lazy sequence of [`Token`]s. Malformed input never
//! fails the scan: it produces [`TokenKind::Error`] tokens and leaves reporting
//! to the caller.

mod scanner;
mod token;

pub use scanner::Scanner;
pub use token::{LexError, Token, TokenKind};
