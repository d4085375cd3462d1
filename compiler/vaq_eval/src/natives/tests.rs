#![allow(clippy::unwrap_used, clippy::expect_used, reason = "tests unwrap for brevity")]

use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use vaq_diagnostic::ErrorContext;
use vaq_runtime::{Object, ObjRef, Value};

use crate::error::FatalError;
use crate::print_handler::{buffer_handler, SharedPrintHandler};
use crate::runtime::Runtime;

/// A project directory with a few empty C sources and a `build.vmake`.
struct Project {
    _dir: TempDir,
    root: PathBuf,
}

impl Project {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        fs::write(root.join("a.c"), "").unwrap();
        fs::write(root.join("b.c"), "").unwrap();
        fs::create_dir(root.join("include")).unwrap();
        Project { _dir: dir, root }
    }

    fn run(&self, script: &str) -> (Runtime, SharedPrintHandler, Result<(), FatalError>) {
        let path = self.root.join("build.vmake");
        fs::write(&path, script).unwrap();
        let print = buffer_handler();
        let mut rt = Runtime::silent(print.clone());
        let result = rt.process_file(&path);
        (rt, print, result)
    }
}

fn strings(rt: &Runtime, value: Value) -> Vec<String> {
    let array = value.as_object().and_then(|r| rt.heap.as_array(r)).unwrap();
    array
        .iter()
        .map(|&v| rt.heap.value_str(v).unwrap().to_owned())
        .collect()
}

fn only_target(rt: &Runtime) -> ObjRef {
    assert_eq!(rt.targets().len(), 1);
    rt.targets()[0].as_object().unwrap()
}

#[test]
fn test_executable_builds_target() {
    let project = Project::new();
    let (mut rt, print, result) = project.run(
        r#"exe = executable(name = "app", sources = ["a.c", "b.c"]);
print(exe.name);
print(exe.get_name());
print(exe);"#,
    );
    result.unwrap();
    assert!(!rt.had_error());
    assert_eq!(print.get_output(), "app\napp\n<instance 'Executable'>\n");

    let target = only_target(&rt);
    assert_eq!(rt.heap.class_name(target), Some("Executable"));
    let sources = rt.field(target, "sources").unwrap();
    assert_eq!(
        strings(&rt, sources),
        vec![
            project.root.join("a.c").to_string_lossy().into_owned(),
            project.root.join("b.c").to_string_lossy().into_owned(),
        ]
    );
    assert!(matches!(rt.field(target, "include_directories"), Some(Value::Nil)));
    assert!(matches!(rt.field(target, "link_libraries"), Some(Value::Nil)));
}

#[test]
fn test_get_sources_returns_resolved_paths() {
    let project = Project::new();
    let (_, print, result) = project.run(
        r#"exe = executable(name = "app", sources = ["a.c"]);
print(exe.get_sources());"#,
    );
    result.unwrap();
    let expected = format!("[{}]\n", project.root.join("a.c").display());
    assert_eq!(print.get_output(), expected);
}

#[test]
fn test_optional_arguments() {
    let project = Project::new();
    let (mut rt, _, result) = project.run(
        r#"executable(name = "app", sources = ["a.c"], include_directories = ["include"], link_libraries = ["m", "pthread"]);"#,
    );
    result.unwrap();

    let target = only_target(&rt);
    let dirs = rt.field(target, "include_directories").unwrap();
    assert_eq!(
        strings(&rt, dirs),
        vec![project.root.join("include").to_string_lossy().into_owned()]
    );
    let libs = rt.field(target, "link_libraries").unwrap();
    assert_eq!(strings(&rt, libs), vec!["m", "pthread"]);
}

#[test]
fn test_explicit_nil_counts_as_absent() {
    let project = Project::new();
    let (mut rt, _, result) =
        project.run(r#"executable(name = "app", sources = ["a.c"], link_libraries = nil);"#);
    result.unwrap();
    let target = only_target(&rt);
    assert!(matches!(rt.field(target, "link_libraries"), Some(Value::Nil)));
}

#[test]
fn test_targets_keep_construction_order() {
    let project = Project::new();
    let (mut rt, _, result) = project.run(
        r#"executable(name = "one", sources = ["a.c"]);
executable(name = "two", sources = ["b.c"]);"#,
    );
    result.unwrap();
    let names: Vec<String> = rt
        .targets()
        .to_vec()
        .into_iter()
        .map(|t| {
            let name = rt.field(t.as_object().unwrap(), "name").unwrap();
            rt.heap.value_str(name).unwrap().to_owned()
        })
        .collect();
    assert_eq!(names, vec!["one", "two"]);
}

fn native_error(result: Result<(), FatalError>) -> String {
    let err = result.unwrap_err();
    assert!(matches!(err, FatalError::Native { .. }), "got {err:?}");
    assert_eq!(err.diagnostic().context, ErrorContext::Native);
    err.diagnostic().message.clone()
}

#[test]
fn test_missing_source_is_fatal() {
    let project = Project::new();
    let (rt, print, result) = project.run(
        r#"executable(name = "app", sources = ["missing.c"]); print("unreachable");"#,
    );
    assert_eq!(native_error(result), "Could not find file at 'missing.c'.");
    assert_eq!(print.get_output(), "");
    assert!(rt.targets().is_empty());
}

#[test]
fn test_wrong_argument_type_is_fatal() {
    let project = Project::new();
    let (_, _, result) = project.run(r#"executable(name = 1, sources = ["a.c"]);"#);
    assert_eq!(
        native_error(result),
        "Expected string for 'name' but found number instead."
    );

    let (_, _, result) = project.run(r#"executable(name = "app", sources = "a.c");"#);
    assert_eq!(
        native_error(result),
        "Expected array for 'sources' but found string instead."
    );

    let (_, _, result) = project.run(r#"executable(name = "app", sources = ["a.c", 2]);"#);
    assert_eq!(
        native_error(result),
        "Expected string for 'sources' but found number instead."
    );
}

#[test]
fn test_missing_required_argument_is_fatal() {
    let project = Project::new();
    let (_, _, result) = project.run(r#"executable(sources = ["a.c"]);"#);
    assert_eq!(native_error(result), "Missing required argument 'name'.");
}

#[test]
fn test_unexpected_keyword_is_fatal() {
    let project = Project::new();
    let (_, _, result) =
        project.run(r#"executable(name = "app", sources = ["a.c"], flags = ["-O2"]);"#);
    assert_eq!(native_error(result), "Unexpected keyword argument 'flags'.");
}

#[test]
fn test_duplicate_keyword_is_reported() {
    let project = Project::new();
    let (rt, _, result) =
        project.run(r#"executable(name = "a", name = "b", sources = ["a.c"]);"#);
    result.unwrap();
    assert_eq!(rt.diagnostics()[0].message, "Duplicate keyword argument 'name'.");
    assert!(rt.targets().is_empty());
}

#[test]
fn test_method_must_be_called() {
    let project = Project::new();
    let (rt, print, result) = project.run(
        r#"exe = executable(name = "app", sources = ["a.c"]);
f = exe.get_name;
print("next");"#,
    );
    result.unwrap();
    assert_eq!(rt.diagnostics()[0].message, "Methods must be called immediately.");
    assert_eq!(rt.diagnostics()[0].context, ErrorContext::Syntax);
    assert_eq!(print.get_output(), "next\n");
}

#[test]
fn test_undefined_property() {
    let project = Project::new();
    let (rt, _, result) = project.run(
        r#"exe = executable(name = "app", sources = ["a.c"]);
exe.nope;"#,
    );
    result.unwrap();
    assert_eq!(rt.diagnostics()[0].message, "Undefined property 'nope' on 'Executable'.");
}

#[test]
fn test_method_arity() {
    let project = Project::new();
    let (rt, _, result) = project.run(
        r#"exe = executable(name = "app", sources = ["a.c"]);
exe.get_name(1);"#,
    );
    result.unwrap();
    assert_eq!(
        rt.diagnostics()[0].message,
        "Expected 0 arguments for method 'get_name' but found 1 instead."
    );
}

#[test]
fn test_get_properties_returns_table_view() {
    let project = Project::new();
    let (mut rt, _, result) = project.run(
        r#"exe = executable(name = "app", sources = ["a.c"]);
props = get_properties(exe);"#,
    );
    result.unwrap();

    let props = rt.global("props").and_then(Value::as_object).unwrap();
    let Object::TableView(table) = rt.heap.get(props) else {
        panic!("expected a table view");
    };
    assert_eq!(table.len(), 4);
}

#[test]
fn test_get_properties_rejects_non_instance() {
    let project = Project::new();
    let (_, _, result) = project.run("get_properties(1);");
    assert_eq!(
        native_error(result),
        "Expected instance for 'instance' but found number instead."
    );
}

#[test]
fn test_target_fields_are_not_writable_through_subscripts() {
    let project = Project::new();
    let (mut rt, print, result) = project.run(
        r#"libs = ["m"];
exe = executable(name = "app", sources = ["a.c"], link_libraries = libs);
exe.sources[0] = "/does/not/exist.c";
exe.get_sources()[0] = "x";
libs[0] = "pthread";
print(exe.link_libraries);"#,
    );
    result.unwrap();
    assert_eq!(
        rt.diagnostics()
            .iter()
            .map(|d| d.message.as_str())
            .collect::<Vec<_>>(),
        vec!["Invalid assignment target.", "Invalid assignment target."]
    );
    assert_eq!(print.get_output(), "[m]\n");

    let target = only_target(&rt);
    let sources = rt.field(target, "sources").unwrap();
    assert_eq!(
        strings(&rt, sources),
        vec![project.root.join("a.c").to_string_lossy().into_owned()]
    );
    let libs = rt.field(target, "link_libraries").unwrap();
    assert_eq!(strings(&rt, libs), vec!["m"]);
}
