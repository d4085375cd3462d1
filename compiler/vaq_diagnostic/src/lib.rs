//! Diagnostics for vaq-make.
//!
//! A [`Diagnostic`] carries an [`ErrorContext`], the file and line it points
//! at, the offending lexeme and the include chain that led to the file.
//! Rendering is plain text:
//!
//! ```text
//! [./src/app.vmake:3] ERROR at 'x': Expected numbers for subtraction.
//!   included from ./build.vmake
//! ```

mod diagnostic;
pub mod emitter;
pub mod paths;

pub use diagnostic::{Anchor, Diagnostic, ErrorContext};
pub use emitter::{DiagnosticEmitter, SilentEmitter, TerminalEmitter};
