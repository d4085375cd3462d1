//! Core diagnostic types.

use std::fmt::{self, Write};
use std::path::{Path, PathBuf};

use crate::paths::display_relative;

/// Category attached to every diagnostic.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorContext {
    /// Malformed token stream.
    Syntax,
    /// Well-formed script that is semantically invalid.
    User,
    /// A native function rejected its arguments.
    Native,
    /// A runtime invariant broke.
    Internal,
}

impl ErrorContext {
    /// Syntax and User errors are reported and generation continues.
    #[inline]
    pub fn is_recoverable(self) -> bool {
        matches!(self, ErrorContext::Syntax | ErrorContext::User)
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorContext::Syntax => write!(f, "syntax"),
            ErrorContext::User => write!(f, "user"),
            ErrorContext::Native => write!(f, "native"),
            ErrorContext::Internal => write!(f, "internal"),
        }
    }
}

/// What the diagnostic points at within its line.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Anchor {
    /// The offending lexeme.
    Lexeme(String),
    /// End of input.
    End,
    /// Nothing to quote, e.g. a scanner error whose message says it all.
    #[default]
    None,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    pub context: ErrorContext,
    pub message: String,
    /// Absolute path of the file being processed, if any.
    pub file: Option<PathBuf>,
    /// 1-based line. `None` when no token was available.
    pub line: Option<u32>,
    pub anchor: Anchor,
    /// Files that included `file`, most recent first.
    pub include_trace: Vec<PathBuf>,
}

impl Diagnostic {
    pub fn new(context: ErrorContext, message: impl Into<String>) -> Self {
        Diagnostic {
            context,
            message: message.into(),
            file: None,
            line: None,
            anchor: Anchor::None,
            include_trace: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    #[must_use]
    pub fn at(mut self, line: u32, anchor: Anchor) -> Self {
        self.line = Some(line);
        self.anchor = anchor;
        self
    }

    #[must_use]
    pub fn with_include_trace(mut self, trace: Vec<PathBuf>) -> Self {
        self.include_trace = trace;
        self
    }

    /// Render as printed to stderr, with paths shown relative to `cwd`.
    pub fn render(&self, cwd: &Path) -> String {
        let mut out = String::new();
        let header = match self.context {
            ErrorContext::Syntax | ErrorContext::User => self
                .file
                .as_deref()
                .map_or_else(|| "unknown".to_owned(), |file| display_relative(file, cwd)),
            ErrorContext::Native => "native".to_owned(),
            ErrorContext::Internal => "internal".to_owned(),
        };

        let _ = write!(out, "[{header}");
        match self.line.filter(|_| self.context.is_recoverable()) {
            Some(line) => {
                let _ = write!(out, ":{line}] ERROR");
                match &self.anchor {
                    Anchor::Lexeme(lexeme) => {
                        let _ = write!(out, " at '{lexeme}'");
                    }
                    Anchor::End => out.push_str(" at end"),
                    Anchor::None => {}
                }
            }
            None => out.push_str("] ERROR"),
        }
        let _ = write!(out, ": {}", self.message);

        for file in &self.include_trace {
            let _ = write!(out, "\n  included from {}", display_relative(file, cwd));
        }
        out
    }
}
