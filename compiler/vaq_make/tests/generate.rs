//! End-to-end generation: script on disk in, Makefiles on disk out.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "tests unwrap for brevity")]

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use vaq_eval::{buffer_handler, FatalError, Runtime};
use vaq_make::{generate, parse_args, Command, Config, GenerateError};

fn project(files: &[(&str, &str)]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    for (name, contents) in files {
        let path = root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }
    (dir, root)
}

fn config(root: &Path, script: &str) -> Config {
    let args = vec!["vaq-make".to_owned(), script.to_owned()];
    match parse_args(&args, root).unwrap() {
        Command::Generate(config) => config,
        other => panic!("expected a generate command, got {other:?}"),
    }
}

#[test]
fn test_generate_with_includes() {
    let (_dir, root) = project(&[
        ("build.vmake", r#"include "lib/lib.vmake"; executable(name = "app", sources = ["main.c"]);"#),
        ("lib/lib.vmake", r#"print("configuring " + "lib"); executable(name = "lib", sources = ["lib.c"]);"#),
        ("main.c", ""),
        ("lib/lib.c", ""),
    ]);
    let config = config(&root, "build.vmake");
    let print = buffer_handler();
    let mut rt = Runtime::silent(print.clone());

    let written = generate(&mut rt, &config, Path::new("vaq-make")).unwrap();
    assert_eq!(print.get_output(), "configuring lib\n");
    assert_eq!(written.last(), Some(&root.join("Makefile")));

    let makefile = fs::read_to_string(root.join("Makefile")).unwrap();
    assert!(makefile.contains("all: lib app\n"));
    let lib = fs::read_to_string(root.join("target.lib/build.make")).unwrap();
    assert!(lib.contains(&format!("{}/objects/lib/lib.o: {}/lib/lib.c\n", root.display(), root.display())));
}

#[test]
fn test_reported_errors_write_nothing() {
    let (_dir, root) = project(&[("build.vmake", "x = 1 + \"a\";")]);
    let config = config(&root, "build.vmake");
    let mut rt = Runtime::silent(buffer_handler());

    let err = generate(&mut rt, &config, Path::new("vaq-make")).unwrap_err();
    assert!(matches!(err, GenerateError::Reported { count: 1 }));
    assert!(!root.join("Makefile").exists());
}

#[test]
fn test_cyclic_include_is_fatal() {
    let (_dir, root) = project(&[
        ("build.vmake", r#"include "other.vmake";"#),
        ("other.vmake", r#"include "build.vmake";"#),
    ]);
    let config = config(&root, "build.vmake");
    let mut rt = Runtime::silent(buffer_handler());

    let err = generate(&mut rt, &config, Path::new("vaq-make")).unwrap_err();
    let GenerateError::Fatal(fatal) = err else {
        panic!("expected a fatal error");
    };
    assert!(matches!(fatal, FatalError::CyclicInclude { .. }));
    assert_eq!(
        fatal.diagnostic().render(&root),
        "[./build.vmake] ERROR: Cyclic include detected.\n  included from ./other.vmake\n  included from ./build.vmake"
    );
    assert!(!root.join("Makefile").exists());
}
