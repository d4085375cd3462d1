#![allow(clippy::unwrap_used, clippy::expect_used, reason = "tests unwrap for brevity")]

use std::fs;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use super::*;
use crate::print_handler::{buffer_handler, SharedPrintHandler};

/// Temporary directory of scripts, addressed by canonical paths.
struct Scripts {
    _dir: TempDir,
    root: PathBuf,
}

impl Scripts {
    fn new(files: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        for (name, contents) in files {
            let path = root.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, contents).unwrap();
        }
        Scripts { _dir: dir, root }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

fn runtime() -> (Runtime, SharedPrintHandler) {
    let print = buffer_handler();
    (Runtime::silent(print.clone()), print)
}

#[test]
fn test_diamond_include_succeeds() {
    let scripts = Scripts::new(&[
        ("a.vmake", r#"include "b.vmake"; include "c.vmake"; print("a");"#),
        ("b.vmake", r#"include "d.vmake"; print("b");"#),
        ("c.vmake", r#"include "d.vmake"; print("c");"#),
        ("d.vmake", r#"print("d");"#),
    ]);
    let (mut rt, print) = runtime();
    rt.process_file(&scripts.path("a.vmake")).unwrap();

    assert_eq!(print.get_output(), "d\nb\nd\nc\na\n");
    assert!(!rt.had_error());
    assert_eq!(rt.current_file(), None);
}

#[test]
fn test_cyclic_include_is_fatal() {
    let scripts = Scripts::new(&[
        ("a.vmake", r#"include "b.vmake";"#),
        ("b.vmake", r#"print("in b"); include "a.vmake"; print("unreachable");"#),
    ]);
    let (mut rt, print) = runtime();
    let err = rt.process_file(&scripts.path("a.vmake")).unwrap_err();

    let FatalError::CyclicInclude { path, diagnostic } = &err else {
        panic!("expected cyclic include, got {err:?}");
    };
    assert_eq!(path, &scripts.path("a.vmake"));
    assert_eq!(
        diagnostic.include_trace,
        vec![scripts.path("b.vmake"), scripts.path("a.vmake")]
    );
    assert_eq!(print.get_output(), "in b\n");
}

#[test]
fn test_self_include_is_fatal() {
    let scripts = Scripts::new(&[("a.vmake", r#"include "a.vmake";"#)]);
    let (mut rt, _) = runtime();
    let err = rt.process_file(&scripts.path("a.vmake")).unwrap_err();
    assert!(matches!(err, FatalError::CyclicInclude { .. }));
}

#[test]
fn test_cycle_detected_across_path_spellings() {
    let scripts = Scripts::new(&[
        ("a.vmake", r#"include "sub/b.vmake";"#),
        ("sub/b.vmake", r#"include "../sub/../a.vmake";"#),
    ]);
    let (mut rt, _) = runtime();
    let err = rt.process_file(&scripts.path("a.vmake")).unwrap_err();

    let FatalError::CyclicInclude { path, diagnostic } = &err else {
        panic!("expected cyclic include, got {err:?}");
    };
    assert_eq!(path, &scripts.path("a.vmake"));
    assert_eq!(
        diagnostic.include_trace,
        vec![scripts.path("sub/b.vmake"), scripts.path("a.vmake")]
    );

    let scripts = Scripts::new(&[("sub/c.vmake", ""), ("a.vmake", r#"include "./sub/../a.vmake";"#)]);
    let err = runtime().0.process_file(&scripts.path("a.vmake")).unwrap_err();
    assert!(matches!(err, FatalError::CyclicInclude { .. }));
}

#[test]
fn test_include_through_subdirectory_resolves_against_including_file() {
    let scripts = Scripts::new(&[
        ("a.vmake", r#"include "lib/b.vmake";"#),
        ("lib/b.vmake", r#"include "c.vmake";"#),
        ("lib/c.vmake", r#"print("c");"#),
    ]);
    let (mut rt, print) = runtime();
    rt.process_file(&scripts.path("a.vmake")).unwrap();
    assert_eq!(print.get_output(), "c\n");
}

#[test]
fn test_missing_include_is_reported() {
    let scripts = Scripts::new(&[("a.vmake", r#"include "nope.vmake"; print(1);"#)]);
    let (mut rt, print) = runtime();
    rt.process_file(&scripts.path("a.vmake")).unwrap();

    assert_eq!(
        rt.diagnostics()[0].message,
        "No file with path 'nope.vmake' was found."
    );
    assert_eq!(print.get_output(), "1\n");
}

#[test]
fn test_include_requires_string() {
    let scripts = Scripts::new(&[("a.vmake", "include 5; print(2);")]);
    let (mut rt, print) = runtime();
    rt.process_file(&scripts.path("a.vmake")).unwrap();

    assert_eq!(rt.diagnostics()[0].message, "Expected string after 'include'.");
    assert_eq!(print.get_output(), "2\n");
}

#[test]
fn test_included_file_shares_globals() {
    let scripts = Scripts::new(&[
        ("a.vmake", r#"name = "app"; include "b.vmake"; print(greeting);"#),
        ("b.vmake", r#"greeting = "hello " + name;"#),
    ]);
    let (mut rt, print) = runtime();
    rt.process_file(&scripts.path("a.vmake")).unwrap();
    assert_eq!(print.get_output(), "hello app\n");
}

#[test]
fn test_error_in_included_file_carries_trace() {
    let scripts = Scripts::new(&[
        ("a.vmake", r#"include "b.vmake";"#),
        ("b.vmake", "\n1 - \"x\";"),
    ]);
    let (mut rt, _) = runtime();
    rt.process_file(&scripts.path("a.vmake")).unwrap();

    let diag = &rt.diagnostics()[0];
    assert_eq!(diag.file, Some(scripts.path("b.vmake")));
    assert_eq!(diag.line, Some(2));
    assert_eq!(diag.include_trace, vec![scripts.path("a.vmake")]);
    assert_eq!(
        diag.render(&scripts.root),
        "[./b.vmake:2] ERROR at '-': Expected numbers for subtraction.\n  included from ./a.vmake"
    );
}

#[test]
fn test_unreadable_root_is_fatal() {
    let scripts = Scripts::new(&[]);
    let (mut rt, _) = runtime();
    let err = rt.process_file(&scripts.path("missing.vmake")).unwrap_err();
    assert!(matches!(err, FatalError::Read { .. }));
}

#[test]
fn test_include_trace_excludes_current_file() {
    let (mut rt, _) = runtime();
    assert!(rt.include_trace().is_empty());
    rt.enter_file(Path::new("/x/a.vmake")).unwrap();
    rt.enter_file(Path::new("/x/b.vmake")).unwrap();
    assert_eq!(rt.include_trace(), vec![PathBuf::from("/x/a.vmake")]);
    assert_eq!(rt.current_file(), Some(Path::new("/x/b.vmake")));
    rt.leave_file();
    rt.leave_file();
}
