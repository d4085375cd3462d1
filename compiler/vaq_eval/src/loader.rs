//! Filesystem access needed by the evaluator.

use std::io;
use std::path::{Path, PathBuf};

/// Resolves and reads script files.
///
/// `resolve` is relative to the directory containing `from`, not the working
/// directory, and yields a canonical absolute path.
pub trait FileLoader {
    fn resolve(&self, from: &Path, path: &str) -> io::Result<PathBuf>;

    fn read(&self, path: &Path) -> io::Result<String>;
}

/// [`FileLoader`] over the real filesystem.
#[derive(Copy, Clone, Debug, Default)]
pub struct FsLoader;

impl FileLoader for FsLoader {
    fn resolve(&self, from: &Path, path: &str) -> io::Result<PathBuf> {
        let path = Path::new(path);
        if path.is_absolute() {
            return path.canonicalize();
        }
        let base = if from.is_dir() {
            from
        } else {
            from.parent().unwrap_or_else(|| Path::new("."))
        };
        base.join(path).canonicalize()
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}
