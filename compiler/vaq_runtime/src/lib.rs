//! Runtime object model for vaq-make.
//!
//! - [`Value`]: tagged scalar, `Copy`, referring to heap data by [`ObjRef`]
//! - [`Heap`]: arena owning every object, with string interning
//! - [`Table`]: open-addressed hash table with tombstones, keyed by `Value`
//! - [`native`]: calling convention shared with the evaluator's natives

mod hash;
mod heap;
pub mod native;
mod object;
mod table;
mod value;

pub use hash::fnv1a;
pub use heap::{Heap, ValueDisplay};
pub use native::{Arguments, NativeError, NativeFn, NativeMethodFn, NativeResult};
pub use object::{Class, Instance, NativeFunction, NativeMethod, Object, ObjectKind, StringObject};
pub use table::{Table, MIN_CAPACITY};
pub use value::{EmptyValueError, ObjRef, Value};
