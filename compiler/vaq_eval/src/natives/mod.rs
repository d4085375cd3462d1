//! Native functions and classes exposed to scripts as globals.

mod classes;
mod functions;

use vaq_runtime::{Arguments, NativeError, ObjRef, Object, Table, Value};

use crate::runtime::{Heap, Runtime};

/// Classes the runtime needs to recognize, e.g. when emitting targets.
#[derive(Copy, Clone, Debug)]
pub struct NativeClasses {
    pub executable: ObjRef,
}

/// Define every native in `globals`.
pub(crate) fn register(heap: &mut Heap, globals: &mut Table) -> NativeClasses {
    functions::define(heap, globals);
    let classes = NativeClasses {
        executable: classes::define_executable(heap, globals),
    };
    tracing::debug!(count = globals.len(), "registered natives");
    classes
}

/// Store `object` in `globals` under the interned `name`.
fn define_global(heap: &mut Heap, globals: &mut Table, name: &str, object: ObjRef) {
    let key = heap.intern(name);
    globals.put(Value::Object(key), Value::Object(object));
}

/// Keyword argument `param`, treating an explicit `nil` as absent.
fn keyword(rt: &mut Runtime, args: &Arguments, param: &str) -> Option<Value> {
    let key = rt.heap.intern(param);
    args.keyword(key).filter(|value| !value.is_nil())
}

fn required(rt: &mut Runtime, args: &Arguments, param: &str) -> Result<Value, NativeError> {
    keyword(rt, args, param)
        .ok_or_else(|| NativeError::new(format!("Missing required argument '{param}'.")))
}

/// Reject keyword arguments not named in `allowed`.
fn check_keywords(rt: &Runtime, args: &Arguments, allowed: &[&str]) -> Result<(), NativeError> {
    for (key, _) in args.keywords.iter() {
        let name = rt.heap.value_str(key).unwrap_or_default();
        if !allowed.contains(&name) {
            return Err(NativeError::new(format!(
                "Unexpected keyword argument '{name}'."
            )));
        }
    }
    Ok(())
}

fn mismatch(rt: &Runtime, expected: &str, param: &str, found: Value) -> NativeError {
    NativeError::type_mismatch(expected, param, rt.heap.type_name(found))
}

fn expect_string(rt: &Runtime, value: Value, param: &str) -> Result<ObjRef, NativeError> {
    match value {
        Value::Object(r) if rt.heap.as_str(r).is_some() => Ok(r),
        _ => Err(mismatch(rt, "string", param, value)),
    }
}

/// Elements of an array argument, each of which must be a string.
fn expect_string_array(rt: &Runtime, value: Value, param: &str) -> Result<Vec<ObjRef>, NativeError> {
    let elements = match value {
        Value::Object(r) => rt.heap.as_array(r),
        _ => None,
    }
    .ok_or_else(|| mismatch(rt, "array", param, value))?;

    elements
        .iter()
        .map(|&element| expect_string(rt, element, param))
        .collect()
}

fn expect_instance(rt: &Runtime, value: Value, param: &str) -> Result<ObjRef, NativeError> {
    match value {
        Value::Object(r) if matches!(rt.heap.get(r), Object::Instance(_)) => Ok(r),
        _ => Err(mismatch(rt, "instance", param, value)),
    }
}

/// New array holding each path resolved against the calling file.
fn resolve_paths(rt: &mut Runtime, paths: &[ObjRef]) -> Result<Value, NativeError> {
    let from = rt
        .current_file()
        .map(std::path::Path::to_path_buf)
        .ok_or_else(|| NativeError::new("No file is being processed."))?;

    let mut resolved = Vec::with_capacity(paths.len());
    for &path in paths {
        let text = rt.heap.as_str(path).unwrap_or_default().to_owned();
        let absolute = rt
            .loader
            .resolve(&from, &text)
            .map_err(|_| NativeError::new(format!("Could not find file at '{text}'.")))?;
        let interned = rt.heap.intern(&absolute.to_string_lossy());
        resolved.push(Value::Object(interned));
    }
    Ok(Value::Object(rt.heap.new_array(resolved)))
}

#[cfg(test)]
mod tests;
