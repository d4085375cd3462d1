//! Native functions: target constructors and introspection.

use vaq_runtime::{Arguments, NativeResult, Table, Value};

use super::{
    check_keywords, define_global, expect_instance, expect_string, expect_string_array, keyword,
    required, resolve_paths,
};
use crate::runtime::{Heap, Runtime};

const EXECUTABLE_PARAMS: &[&str] = &["name", "sources", "include_directories", "link_libraries"];

pub(super) fn define(heap: &mut Heap, globals: &mut Table) {
    let executable_fn = heap.new_native("executable", 0, executable);
    define_global(heap, globals, "executable", executable_fn);

    let get_properties_fn = heap.new_native("get_properties", 1, get_properties);
    define_global(heap, globals, "get_properties", get_properties_fn);
}

/// `executable(name=, sources=, include_directories=?, link_libraries=?)`
///
/// Sources and include directories are resolved against the calling file.
/// The new instance is appended to the target list.
fn executable(rt: &mut Runtime, args: &Arguments) -> NativeResult {
    check_keywords(rt, args, EXECUTABLE_PARAMS)?;

    let name_arg = required(rt, args, "name")?;
    let name = expect_string(rt, name_arg, "name")?;

    let sources_arg = required(rt, args, "sources")?;
    let sources = expect_string_array(rt, sources_arg, "sources")?;
    let sources = resolve_paths(rt, &sources)?;

    let include_directories = match keyword(rt, args, "include_directories") {
        Some(value) => {
            let dirs = expect_string_array(rt, value, "include_directories")?;
            resolve_paths(rt, &dirs)?
        }
        None => Value::Nil,
    };

    let link_libraries = match keyword(rt, args, "link_libraries") {
        Some(value) => {
            let libs = expect_string_array(rt, value, "link_libraries")?;
            let libs = libs.into_iter().map(Value::Object).collect();
            Value::Object(rt.heap.new_array(libs))
        }
        None => Value::Nil,
    };

    let class = rt.classes().executable;
    let instance = rt.heap.new_instance(class);
    rt.heap.set_field(instance, "name", Value::Object(name));
    rt.heap.set_field(instance, "sources", sources);
    rt.heap.set_field(instance, "include_directories", include_directories);
    rt.heap.set_field(instance, "link_libraries", link_libraries);

    let target = Value::Object(instance);
    rt.push_target(target);
    tracing::debug!(name = ?rt.heap.as_str(name), "executable target");
    Ok(target)
}

/// `get_properties(instance)`: a table view of the instance's fields.
fn get_properties(rt: &mut Runtime, args: &Arguments) -> NativeResult {
    let arg = args.positional(0).unwrap_or_default();
    let instance = expect_instance(rt, arg, "instance")?;
    let fields = rt
        .heap
        .as_instance(instance)
        .map(|instance| instance.fields.clone())
        .unwrap_or_default();
    Ok(Value::Object(rt.heap.new_table_view(fields)))
}
