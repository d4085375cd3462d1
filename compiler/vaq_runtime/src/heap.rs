//! Object arena and string interning.
//!
//! Every object lives in one `Vec` owned by the runtime and is addressed by
//! [`ObjRef`]. Nothing is freed individually; dropping the heap releases
//! everything at once.

use std::fmt;

use crate::hash::fnv1a;
use crate::native::{NativeFn, NativeMethodFn};
use crate::object::{Class, Instance, NativeFunction, NativeMethod, Object, StringObject};
use crate::table::Table;
use crate::value::{ObjRef, Value};

pub struct Heap<Cx> {
    objects: Vec<Object<Cx>>,
    /// Intern set: every string object, keyed by itself.
    strings: Table,
}

impl<Cx> Default for Heap<Cx> {
    fn default() -> Self {
        Heap {
            objects: Vec::new(),
            strings: Table::new(),
        }
    }
}

impl<Cx> fmt::Debug for Heap<Cx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Heap")
            .field("objects", &self.objects.len())
            .field("strings", &self.strings.len())
            .finish()
    }
}

impl<Cx> Heap<Cx> {
    pub fn new() -> Self {
        Heap::default()
    }

    /// Number of live allocations.
    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    #[inline]
    pub fn get(&self, r: ObjRef) -> &Object<Cx> {
        &self.objects[r.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, r: ObjRef) -> &mut Object<Cx> {
        &mut self.objects[r.index()]
    }

    fn push(&mut self, object: Object<Cx>, hash: Option<u32>) -> ObjRef {
        let index = self.objects.len();
        // Non-string objects hash by identity.
        let hash = hash.unwrap_or_else(|| fnv1a(&index.to_le_bytes()));
        self.objects.push(object);
        ObjRef::new(index, hash)
    }

    /// Canonical string object for `text`.
    ///
    /// Equal content always yields the same [`ObjRef`], so string equality is
    /// handle equality.
    pub fn intern(&mut self, text: &str) -> ObjRef {
        let hash = fnv1a(text.as_bytes());
        let objects = &self.objects;
        let found = self.strings.find_string(hash, |r| {
            matches!(&objects[r.index()], Object::String(s) if s.as_str() == text)
        });
        if let Some(r) = found {
            return r;
        }
        let r = self.push(
            Object::String(StringObject::new(text.into(), hash)),
            Some(hash),
        );
        self.strings.put(Value::Object(r), Value::Nil);
        r
    }

    /// Interned concatenation of two strings.
    pub fn concat(&mut self, a: ObjRef, b: ObjRef) -> Option<ObjRef> {
        let joined = format!("{}{}", self.as_str(a)?, self.as_str(b)?);
        Some(self.intern(&joined))
    }

    pub fn new_array(&mut self, elements: Vec<Value>) -> ObjRef {
        self.push(Object::Array(elements), None)
    }

    pub fn new_native(&mut self, name: &str, arity: usize, function: NativeFn<Cx>) -> ObjRef {
        let name = self.intern(name);
        self.push(
            Object::Native(NativeFunction {
                name,
                arity,
                function,
            }),
            None,
        )
    }

    pub fn new_class(&mut self, name: &str) -> ObjRef {
        let name = self.intern(name);
        self.push(
            Object::Class(Class {
                name,
                methods: Table::new(),
            }),
            None,
        )
    }

    /// Attach a native method to `class`. Does nothing if `class` is not a
    /// class object.
    pub fn add_method(&mut self, class: ObjRef, name: &str, arity: usize, method: NativeMethodFn<Cx>) {
        let name = self.intern(name);
        let method = self.push(
            Object::Method(NativeMethod {
                name,
                arity,
                method,
            }),
            None,
        );
        if let Object::Class(class) = self.get_mut(class) {
            class.methods.put(Value::Object(name), Value::Object(method));
        }
    }

    pub fn new_instance(&mut self, class: ObjRef) -> ObjRef {
        self.push(
            Object::Instance(Instance {
                class,
                fields: Table::new(),
            }),
            None,
        )
    }

    /// Set a field on an instance. Does nothing for other objects.
    pub fn set_field(&mut self, instance: ObjRef, name: &str, value: Value) {
        let name = self.intern(name);
        if let Object::Instance(instance) = self.get_mut(instance) {
            instance.fields.put(Value::Object(name), value);
        }
    }

    pub fn new_table_view(&mut self, table: Table) -> ObjRef {
        self.push(Object::TableView(table), None)
    }

    #[inline]
    pub fn as_str(&self, r: ObjRef) -> Option<&str> {
        match self.get(r) {
            Object::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self, r: ObjRef) -> Option<&[Value]> {
        match self.get(r) {
            Object::Array(elements) => Some(elements),
            _ => None,
        }
    }

    #[inline]
    pub fn as_instance(&self, r: ObjRef) -> Option<&Instance> {
        match self.get(r) {
            Object::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    /// String content of `value`, if it is a string.
    #[inline]
    pub fn value_str(&self, value: Value) -> Option<&str> {
        self.as_str(value.as_object()?)
    }

    /// Name of an instance's class.
    pub fn class_name(&self, instance: ObjRef) -> Option<&str> {
        let class = self.as_instance(instance)?.class;
        match self.get(class) {
            Object::Class(class) => self.as_str(class.name),
            _ => None,
        }
    }

    /// Type name of `value` for diagnostics.
    pub fn type_name(&self, value: Value) -> &'static str {
        match value {
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
            Value::Nil => "nil",
            Value::Empty => "empty",
            Value::Object(r) => self.get(r).kind().name(),
        }
    }

    /// Printable form of `value`, as written by `print`.
    pub fn display(&self, value: Value) -> ValueDisplay<'_, Cx> {
        ValueDisplay { heap: self, value }
    }

    fn write_value(&self, f: &mut fmt::Formatter<'_>, value: Value, open: &mut Vec<ObjRef>) -> fmt::Result {
        match value {
            Value::Number(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Nil => f.write_str("nil"),
            Value::Empty => f.write_str("empty"),
            Value::Object(r) => self.write_object(f, r, open),
        }
    }

    fn write_object(&self, f: &mut fmt::Formatter<'_>, r: ObjRef, open: &mut Vec<ObjRef>) -> fmt::Result {
        let name = |name: ObjRef| self.as_str(name).unwrap_or("?");
        match self.get(r) {
            Object::String(s) => f.write_str(s.as_str()),
            Object::Native(native) => write!(f, "<native '{}'>", name(native.name)),
            Object::Method(method) => write!(f, "<method '{}'>", name(method.name)),
            Object::Class(class) => write!(f, "<class '{}'>", name(class.name)),
            Object::Instance(_) => {
                write!(f, "<instance '{}'>", self.class_name(r).unwrap_or("?"))
            }
            // Containers can hold themselves through subscript assignment.
            Object::Array(_) | Object::TableView(_) if open.contains(&r) => f.write_str("..."),
            Object::Array(elements) => {
                open.push(r);
                f.write_str("[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    self.write_value(f, *element, open)?;
                }
                open.pop();
                f.write_str("]")
            }
            Object::TableView(table) => {
                open.push(r);
                f.write_str("{")?;
                for (i, (key, value)) in table.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    self.write_value(f, key, open)?;
                    f.write_str(": ")?;
                    self.write_value(f, value, open)?;
                }
                open.pop();
                f.write_str("}")
            }
        }
    }
}

/// [`fmt::Display`] adapter returned by [`Heap::display`].
pub struct ValueDisplay<'h, Cx> {
    heap: &'h Heap<Cx>,
    value: Value,
}

impl<Cx> fmt::Display for ValueDisplay<'_, Cx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.heap.write_value(f, self.value, &mut Vec::new())
    }
}
