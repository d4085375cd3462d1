//! Diagnostic emitters.

use std::io::{self, Write};
use std::path::PathBuf;

use crate::Diagnostic;

/// Sink for diagnostics as they are reported.
pub trait DiagnosticEmitter {
    fn emit(&mut self, diagnostic: &Diagnostic);

    fn flush(&mut self) {}
}

/// Writes rendered diagnostics, one block per diagnostic.
///
/// Paths are shown relative to `cwd`.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    cwd: PathBuf,
}

impl TerminalEmitter<io::Stderr> {
    pub fn stderr(cwd: impl Into<PathBuf>) -> Self {
        TerminalEmitter::new(io::stderr(), cwd)
    }
}

impl<W: Write> TerminalEmitter<W> {
    pub fn new(writer: W, cwd: impl Into<PathBuf>) -> Self {
        TerminalEmitter {
            writer,
            cwd: cwd.into(),
        }
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        // Nowhere left to report a failed diagnostic write.
        let _ = writeln!(self.writer, "{}", diagnostic.render(&self.cwd));
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }
}

/// Discards everything. For callers that inspect collected diagnostics
/// instead of printing them.
#[derive(Copy, Clone, Debug, Default)]
pub struct SilentEmitter;

impl DiagnosticEmitter for SilentEmitter {
    fn emit(&mut self, _diagnostic: &Diagnostic) {}
}
