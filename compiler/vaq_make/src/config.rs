//! Command-line configuration.

use std::io;
use std::path::{Path, PathBuf};

use vaq_diagnostic::{Diagnostic, ErrorContext};

/// What the command line asked for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Generate(Config),
    Help,
    Version,
}

/// Inputs of one generation run. All paths are canonical.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub script: PathBuf,
    pub source_dir: PathBuf,
    pub build_dir: PathBuf,
    /// Arguments that reproduce this run, written into the Makefile's
    /// regeneration rule.
    pub args: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Usage: {program} [vmake_file] [source_directory] [build_directory]")]
    Usage { program: String },

    #[error("Could not find script at '{path}': {source}.")]
    Script {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Directory at '{0}' doesn't exist.")]
    MissingDirectory(String),
}

impl ConfigError {
    /// Diagnostic for errors other than [`ConfigError::Usage`], which is
    /// printed as plain text.
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        match self {
            ConfigError::Usage { .. } => None,
            _ => Some(Diagnostic::new(ErrorContext::User, self.to_string())),
        }
    }
}

/// Parse `args` (including the program name) relative to `cwd`.
pub fn parse_args(args: &[String], cwd: &Path) -> Result<Command, ConfigError> {
    let program = args.first().map_or("vaq-make", String::as_str);
    let usage = || ConfigError::Usage {
        program: program.to_owned(),
    };

    match args.get(1..).unwrap_or_default() {
        [flag] if matches!(flag.as_str(), "help" | "--help" | "-h") => Ok(Command::Help),
        [flag] if matches!(flag.as_str(), "version" | "--version" | "-V") => Ok(Command::Version),
        [script] => {
            let script = canonical_script(script, cwd)?;
            let build_dir = script.parent().unwrap_or(cwd).to_path_buf();
            Ok(Command::Generate(Config {
                args: vec![script.display().to_string()],
                script,
                source_dir: cwd.to_path_buf(),
                build_dir,
            }))
        }
        [script, source_dir, build_dir] => {
            let script = canonical_script(script, cwd)?;
            let source_dir = canonical_dir(source_dir, cwd)?;
            let build_dir = canonical_dir(build_dir, cwd)?;
            Ok(Command::Generate(Config {
                args: vec![
                    script.display().to_string(),
                    source_dir.display().to_string(),
                    build_dir.display().to_string(),
                ],
                script,
                source_dir,
                build_dir,
            }))
        }
        _ => Err(usage()),
    }
}

fn canonical_script(path: &str, cwd: &Path) -> Result<PathBuf, ConfigError> {
    cwd.join(path)
        .canonicalize()
        .map_err(|source| ConfigError::Script {
            path: path.to_owned(),
            source,
        })
}

fn canonical_dir(path: &str, cwd: &Path) -> Result<PathBuf, ConfigError> {
    cwd.join(path)
        .canonicalize()
        .ok()
        .filter(|dir| dir.is_dir())
        .ok_or_else(|| ConfigError::MissingDirectory(path.to_owned()))
}

#[cfg(test)]
mod tests;
