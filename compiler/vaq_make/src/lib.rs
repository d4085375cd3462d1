//! vaq-make driver: evaluate a build script, then write Makefiles.
//!
//! ```text
//! args ──► parse_args ──► Config
//!                           │
//!              Runtime::process_file(script)
//!                           │
//!                collect_targets ──► write_makefiles
//! ```

mod config;
mod emit;

use std::path::{Path, PathBuf};
use std::sync::Once;

use vaq_eval::{FatalError, Runtime};

pub use config::{parse_args, Command, Config, ConfigError};
pub use emit::{collect_targets, write_makefiles, EmitError, Executable};

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Fatal(#[from] FatalError),

    /// Errors were reported while evaluating; nothing was written.
    #[error("generation failed with {count} error(s)")]
    Reported { count: usize },

    #[error(transparent)]
    Emit(#[from] EmitError),
}

/// Evaluate `config.script` in `rt` and write the Makefiles.
///
/// Returns the paths written. Nothing is written if evaluation reported
/// any error.
#[tracing::instrument(level = "debug", skip_all, fields(script = %config.script.display()))]
pub fn generate(rt: &mut Runtime, config: &Config, vmake: &Path) -> Result<Vec<PathBuf>, GenerateError> {
    rt.process_file(&config.script)?;
    if rt.had_error() {
        return Err(GenerateError::Reported {
            count: rt.diagnostics().len(),
        });
    }

    let targets = collect_targets(rt)?;
    tracing::debug!(count = targets.len(), "collected targets");
    Ok(write_makefiles(config, &targets, vmake)?)
}

static TRACING_INIT: Once = Once::new();

/// Install a stderr subscriber, once, when `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
                .with(filter)
                .init();
        }
    });
}
