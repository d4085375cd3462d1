//! State shared by every file of one generation run.
//!
//! The runtime owns the heap, the globals, the include stack and the target
//! list. One [`Generator`] at a time borrows it mutably; `include` recurses
//! through [`Runtime::process_file`] with the same runtime.

use std::path::{Path, PathBuf};

use vaq_diagnostic::{Diagnostic, DiagnosticEmitter, ErrorContext, SilentEmitter, TerminalEmitter};
use vaq_runtime::{ObjRef, Table, Value};

use crate::error::FatalError;
use crate::generator::Generator;
use crate::loader::{FileLoader, FsLoader};
use crate::natives::{self, NativeClasses};
use crate::print_handler::{stdout_handler, SharedPrintHandler};

/// Heap whose natives receive a `&mut Runtime`.
pub type Heap = vaq_runtime::Heap<Runtime>;

pub struct Runtime {
    pub heap: Heap,
    pub(crate) globals: Table,
    /// Canonical paths of the files being processed, innermost last.
    include_stack: Vec<PathBuf>,
    targets: Vec<Value>,
    classes: NativeClasses,
    had_error: bool,
    diagnostics: Vec<Diagnostic>,
    emitter: Box<dyn DiagnosticEmitter>,
    print: SharedPrintHandler,
    pub(crate) loader: Box<dyn FileLoader>,
}

impl Runtime {
    /// Runtime printing to stdout, reporting to stderr relative to `cwd`,
    /// and reading from the real filesystem.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Runtime::with_parts(
            Box::new(TerminalEmitter::stderr(cwd)),
            stdout_handler(),
            Box::new(FsLoader),
        )
    }

    /// Runtime that collects diagnostics without printing them.
    pub fn silent(print: SharedPrintHandler) -> Self {
        Runtime::with_parts(Box::new(SilentEmitter), print, Box::new(FsLoader))
    }

    pub fn with_parts(
        emitter: Box<dyn DiagnosticEmitter>,
        print: SharedPrintHandler,
        loader: Box<dyn FileLoader>,
    ) -> Self {
        let mut heap = Heap::new();
        let mut globals = Table::new();
        let classes = natives::register(&mut heap, &mut globals);
        Runtime {
            heap,
            globals,
            include_stack: Vec::new(),
            targets: Vec::new(),
            classes,
            had_error: false,
            diagnostics: Vec::new(),
            emitter,
            print,
            loader,
        }
    }

    /// Read and evaluate the script at `path`.
    ///
    /// `path` should be canonical: it is the identity used for cycle
    /// detection and the base for relative paths inside the script.
    pub fn process_file(&mut self, path: &Path) -> Result<(), FatalError> {
        self.check_cycle(path)?;
        let source = match self.loader.read(path) {
            Ok(source) => source,
            Err(source) => {
                let diagnostic = Diagnostic::new(
                    ErrorContext::User,
                    format!("Could not read file: {source}."),
                )
                .with_file(path)
                .with_include_trace(self.trace_from(self.include_stack.len()));
                return Err(FatalError::Read {
                    path: path.to_path_buf(),
                    source,
                    diagnostic: Box::new(diagnostic),
                });
            }
        };
        self.process_source(path, &source)
    }

    /// Evaluate `source` as if it were the contents of `path`.
    #[tracing::instrument(level = "debug", skip(self, source), fields(path = %path.display()))]
    pub fn process_source(&mut self, path: &Path, source: &str) -> Result<(), FatalError> {
        self.enter_file(path)?;
        let result = Generator::new(self, path.to_path_buf(), source).run();
        self.leave_file();
        result
    }

    /// Push `path` onto the include stack, rejecting cycles.
    pub(crate) fn enter_file(&mut self, path: &Path) -> Result<(), FatalError> {
        self.check_cycle(path)?;
        self.include_stack.push(path.to_path_buf());
        Ok(())
    }

    pub(crate) fn leave_file(&mut self) {
        self.include_stack.pop();
    }

    fn check_cycle(&self, path: &Path) -> Result<(), FatalError> {
        if !self.include_stack.iter().any(|p| p == path) {
            return Ok(());
        }
        let diagnostic = Diagnostic::new(ErrorContext::User, "Cyclic include detected.")
            .with_file(path)
            .with_include_trace(self.trace_from(self.include_stack.len()));
        Err(FatalError::CyclicInclude {
            path: path.to_path_buf(),
            diagnostic: Box::new(diagnostic),
        })
    }

    /// The first `len` include stack entries, most recent first.
    fn trace_from(&self, len: usize) -> Vec<PathBuf> {
        self.include_stack[..len].iter().rev().cloned().collect()
    }

    /// Files that included the current one, most recent first.
    pub fn include_trace(&self) -> Vec<PathBuf> {
        self.trace_from(self.include_stack.len().saturating_sub(1))
    }

    /// The file currently being evaluated.
    pub fn current_file(&self) -> Option<&Path> {
        self.include_stack.last().map(PathBuf::as_path)
    }

    /// Record a recoverable diagnostic.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.emitter.emit(&diagnostic);
        self.diagnostics.push(diagnostic);
        self.had_error = true;
    }

    /// Emit a fatal error's diagnostic through the runtime's emitter.
    pub fn report_fatal(&mut self, error: &FatalError) {
        self.emitter.emit(error.diagnostic());
        self.emitter.flush();
    }

    #[inline]
    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Targets in the order they were constructed.
    pub fn targets(&self) -> &[Value] {
        &self.targets
    }

    pub(crate) fn push_target(&mut self, target: Value) {
        self.targets.push(target);
    }

    #[inline]
    pub fn classes(&self) -> &NativeClasses {
        &self.classes
    }

    /// Value of the global `name`, if defined.
    pub fn global(&mut self, name: &str) -> Option<Value> {
        let key = self.heap.intern(name);
        self.globals.get(Value::Object(key)).copied()
    }

    /// Field of an instance by name.
    pub fn field(&mut self, instance: ObjRef, name: &str) -> Option<Value> {
        let key = self.heap.intern(name);
        self.heap
            .as_instance(instance)?
            .fields
            .get(Value::Object(key))
            .copied()
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print
    }
}

#[cfg(test)]
mod tests;
