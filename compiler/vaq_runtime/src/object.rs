//! Heap object variants.

use std::fmt;

use crate::native::{NativeFn, NativeMethodFn};
use crate::table::Table;
use crate::value::{ObjRef, Value};

/// Interned string content with its cached FNV-1a hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringObject {
    chars: Box<str>,
    hash: u32,
}

impl StringObject {
    pub(crate) fn new(chars: Box<str>, hash: u32) -> Self {
        StringObject { chars, hash }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.chars
    }

    #[inline]
    pub fn hash(&self) -> u32 {
        self.hash
    }
}

pub struct NativeFunction<Cx> {
    pub name: ObjRef,
    pub arity: usize,
    pub function: NativeFn<Cx>,
}

/// A native method. Reachable only through its class and always called
/// immediately; it is never stored as a value.
pub struct NativeMethod<Cx> {
    pub name: ObjRef,
    pub arity: usize,
    pub method: NativeMethodFn<Cx>,
}

// Manual impls: derives would demand `Cx: Clone`.
impl<Cx> Clone for NativeFunction<Cx> {
    fn clone(&self) -> Self {
        NativeFunction {
            name: self.name,
            arity: self.arity,
            function: self.function,
        }
    }
}

impl<Cx> Clone for NativeMethod<Cx> {
    fn clone(&self) -> Self {
        NativeMethod {
            name: self.name,
            arity: self.arity,
            method: self.method,
        }
    }
}

/// A native class. `methods` maps interned names to method objects.
#[derive(Clone, Debug)]
pub struct Class {
    pub name: ObjRef,
    pub methods: Table,
}

/// An instance of a native class.
#[derive(Clone, Debug)]
pub struct Instance {
    pub class: ObjRef,
    pub fields: Table,
}

pub enum Object<Cx> {
    String(StringObject),
    Array(Vec<Value>),
    Native(NativeFunction<Cx>),
    Class(Class),
    Instance(Instance),
    Method(NativeMethod<Cx>),
    /// Read-only snapshot of a table, e.g. an instance's fields.
    TableView(Table),
}

impl<Cx> Object<Cx> {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Object::String(_) => ObjectKind::String,
            Object::Array(_) => ObjectKind::Array,
            Object::Native(_) => ObjectKind::Native,
            Object::Class(_) => ObjectKind::Class,
            Object::Instance(_) => ObjectKind::Instance,
            Object::Method(_) => ObjectKind::Method,
            Object::TableView(_) => ObjectKind::TableView,
        }
    }
}

impl<Cx> fmt::Debug for Object<Cx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::String(s) => f.debug_tuple("String").field(&s.as_str()).finish(),
            Object::Array(elements) => f.debug_tuple("Array").field(elements).finish(),
            Object::Native(native) => f
                .debug_struct("Native")
                .field("name", &native.name)
                .field("arity", &native.arity)
                .finish_non_exhaustive(),
            Object::Class(class) => f.debug_tuple("Class").field(class).finish(),
            Object::Instance(instance) => f.debug_tuple("Instance").field(instance).finish(),
            Object::Method(method) => f
                .debug_struct("Method")
                .field("name", &method.name)
                .field("arity", &method.arity)
                .finish_non_exhaustive(),
            Object::TableView(table) => f.debug_tuple("TableView").field(table).finish(),
        }
    }
}

/// Object type tag, used in diagnostics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    String,
    Array,
    Native,
    Class,
    Instance,
    Method,
    TableView,
}

impl ObjectKind {
    pub fn name(self) -> &'static str {
        match self {
            ObjectKind::String => "string",
            ObjectKind::Array => "array",
            ObjectKind::Native => "native function",
            ObjectKind::Class => "class",
            ObjectKind::Instance => "instance",
            ObjectKind::Method => "method",
            ObjectKind::TableView => "table",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
