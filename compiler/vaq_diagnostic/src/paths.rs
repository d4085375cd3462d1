//! Path display relative to the invocation directory.

use std::path::{Component, Path};

/// Render `path` relative to `base` the way diagnostics show it.
///
/// Paths inside `base` become `./sub/file`; paths elsewhere climb with
/// `../` from the deepest shared ancestor. Relative inputs are shown as-is.
pub fn display_relative(path: &Path, base: &Path) -> String {
    if !path.is_absolute() || !base.is_absolute() {
        return path.display().to_string();
    }
    if let Ok(rest) = path.strip_prefix(base) {
        return if rest.as_os_str().is_empty() {
            ".".to_owned()
        } else {
            format!("./{}", rest.display())
        };
    }

    let path_parts: Vec<Component<'_>> = path.components().collect();
    let base_parts: Vec<Component<'_>> = base.components().collect();
    let shared = path_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = "../".repeat(base_parts.len() - shared);
    let rest: Vec<String> = path_parts[shared..]
        .iter()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    out.push_str(&rest.join("/"));
    out
}

#[cfg(test)]
mod tests;
