//! Native classes.

use vaq_runtime::{Arguments, NativeResult, ObjRef, Table};

use super::define_global;
use crate::runtime::{Heap, Runtime};

/// Define `Executable` and return its class object.
pub(super) fn define_executable(heap: &mut Heap, globals: &mut Table) -> ObjRef {
    let class = heap.new_class("Executable");
    heap.add_method(class, "get_name", 0, executable_get_name);
    heap.add_method(class, "get_sources", 0, executable_get_sources);
    define_global(heap, globals, "Executable", class);
    class
}

fn executable_get_name(rt: &mut Runtime, this: ObjRef, _args: &Arguments) -> NativeResult {
    Ok(rt.field(this, "name").unwrap_or_default())
}

fn executable_get_sources(rt: &mut Runtime, this: ObjRef, _args: &Arguments) -> NativeResult {
    Ok(rt.field(this, "sources").unwrap_or_default())
}
