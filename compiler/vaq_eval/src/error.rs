//! Errors that stop generation.
//!
//! Syntax and User errors are reported through the runtime and never appear
//! here. Everything in [`FatalError`] unwinds to the driver, which prints the
//! carried diagnostic and exits.

use std::io;
use std::path::PathBuf;

use vaq_diagnostic::{Diagnostic, ErrorContext};

#[derive(Debug, thiserror::Error)]
pub enum FatalError {
    /// A file included itself, directly or through other files.
    #[error("cyclic include of {}", path.display())]
    CyclicInclude {
        path: PathBuf,
        diagnostic: Box<Diagnostic>,
    },

    /// A native function rejected its arguments.
    #[error("{}", diagnostic.message)]
    Native { diagnostic: Box<Diagnostic> },

    /// An evaluator invariant broke.
    #[error("{}", diagnostic.message)]
    Internal { diagnostic: Box<Diagnostic> },

    /// A script file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
        diagnostic: Box<Diagnostic>,
    },
}

impl FatalError {
    pub fn internal(diagnostic: Diagnostic) -> Self {
        debug_assert_eq!(diagnostic.context, ErrorContext::Internal);
        FatalError::Internal {
            diagnostic: Box::new(diagnostic),
        }
    }

    pub fn native(diagnostic: Diagnostic) -> Self {
        debug_assert_eq!(diagnostic.context, ErrorContext::Native);
        FatalError::Native {
            diagnostic: Box::new(diagnostic),
        }
    }

    /// The diagnostic to print for this error.
    pub fn diagnostic(&self) -> &Diagnostic {
        match self {
            FatalError::CyclicInclude { diagnostic, .. }
            | FatalError::Native { diagnostic }
            | FatalError::Internal { diagnostic }
            | FatalError::Read { diagnostic, .. } => diagnostic,
        }
    }
}
