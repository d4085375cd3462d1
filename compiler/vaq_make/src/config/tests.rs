#![allow(clippy::unwrap_used, clippy::expect_used, reason = "tests unwrap for brevity")]

use std::fs;

use pretty_assertions::assert_eq;

use super::*;

fn args(list: &[&str]) -> Vec<String> {
    std::iter::once("vaq-make")
        .chain(list.iter().copied())
        .map(str::to_owned)
        .collect()
}

#[test]
fn test_help_and_version() {
    let cwd = Path::new("/");
    for flag in ["help", "--help", "-h"] {
        assert_eq!(parse_args(&args(&[flag]), cwd).unwrap(), Command::Help);
    }
    for flag in ["version", "--version", "-V"] {
        assert_eq!(parse_args(&args(&[flag]), cwd).unwrap(), Command::Version);
    }
}

#[test]
fn test_wrong_argument_count_is_usage_error() {
    let cwd = Path::new("/");
    for list in [&[][..], &["a", "b"][..], &["a", "b", "c", "d"][..]] {
        let err = parse_args(&args(list), cwd).unwrap_err();
        assert!(matches!(err, ConfigError::Usage { .. }));
        assert_eq!(
            err.to_string(),
            "Usage: vaq-make [vmake_file] [source_directory] [build_directory]"
        );
        assert!(err.diagnostic().is_none());
    }
}

#[test]
fn test_single_argument_uses_script_dir_for_build() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    fs::create_dir(root.join("proj")).unwrap();
    fs::write(root.join("proj/build.vmake"), "").unwrap();

    let Command::Generate(config) = parse_args(&args(&["proj/build.vmake"]), &root).unwrap() else {
        panic!("expected a generate command");
    };
    assert_eq!(config.script, root.join("proj/build.vmake"));
    assert_eq!(config.build_dir, root.join("proj"));
    assert_eq!(config.source_dir, root);
    assert_eq!(config.args, vec![root.join("proj/build.vmake").display().to_string()]);
}

#[test]
fn test_three_arguments_canonicalize_directories() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    fs::create_dir(root.join("src")).unwrap();
    fs::create_dir(root.join("build")).unwrap();
    fs::write(root.join("build.vmake"), "").unwrap();

    let command = parse_args(&args(&["build.vmake", "./src/../src", "build"]), &root).unwrap();
    let Command::Generate(config) = command else {
        panic!("expected a generate command");
    };
    assert_eq!(config.source_dir, root.join("src"));
    assert_eq!(config.build_dir, root.join("build"));
    assert_eq!(config.args.len(), 3);
}

#[test]
fn test_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    fs::write(root.join("build.vmake"), "").unwrap();

    let err = parse_args(&args(&["build.vmake", "nope", "."]), &root).unwrap_err();
    assert_eq!(err.to_string(), "Directory at 'nope' doesn't exist.");
    let diag = err.diagnostic().unwrap();
    assert_eq!(diag.render(&root), "[unknown] ERROR: Directory at 'nope' doesn't exist.");
}

#[test]
fn test_file_is_not_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    fs::write(root.join("build.vmake"), "").unwrap();

    let err = parse_args(&args(&["build.vmake", "build.vmake", "."]), &root).unwrap_err();
    assert!(matches!(err, ConfigError::MissingDirectory(_)));
}

#[test]
fn test_missing_script() {
    let dir = tempfile::tempdir().unwrap();
    let err = parse_args(&args(&["missing.vmake"]), dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Script { .. }));
}
