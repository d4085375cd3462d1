//! Evaluator for the vaq-make build language.
//!
//! [`Runtime`] holds everything shared across files: heap, globals, the
//! include stack and the constructed targets. [`Generator`] parses and
//! evaluates one file in a single pass against a runtime.
//!
//! ```text
//! let mut rt = Runtime::new(cwd);
//! rt.process_file(&script)?;
//! for target in rt.targets() { ... }
//! ```

mod error;
mod generator;
mod loader;
mod natives;
pub mod print_handler;
mod runtime;
mod stack;

pub use error::FatalError;
pub use generator::{Generator, Operand, Place, MAX_NESTING};
pub use loader::{FileLoader, FsLoader};
pub use natives::NativeClasses;
pub use print_handler::{buffer_handler, silent_handler, stdout_handler, PrintHandler, SharedPrintHandler};
pub use runtime::{Heap, Runtime};
pub use stack::ensure_sufficient_stack;
