//! Calling convention for native functions and methods.
//!
//! Natives are plain function pointers. They are generic over the context the
//! evaluator passes in, so the object model does not depend on the evaluator.

use smallvec::SmallVec;

use crate::table::Table;
use crate::value::{ObjRef, Value};

/// A native rejected its arguments or failed to do its work.
///
/// Always fatal to the generation run.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct NativeError {
    message: String,
}

impl NativeError {
    pub fn new(message: impl Into<String>) -> Self {
        NativeError {
            message: message.into(),
        }
    }

    /// `Expected <expected> for '<param>' but found <found> instead.`
    pub fn type_mismatch(expected: &str, param: &str, found: &str) -> Self {
        NativeError::new(format!(
            "Expected {expected} for '{param}' but found {found} instead."
        ))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub type NativeResult = Result<Value, NativeError>;

/// `callee(positional..., name = value...)`
pub type NativeFn<Cx> = fn(&mut Cx, &Arguments) -> NativeResult;

/// `receiver.name(positional..., name = value...)`
pub type NativeMethodFn<Cx> = fn(&mut Cx, ObjRef, &Arguments) -> NativeResult;

/// Evaluated call arguments.
///
/// Keyword names are interned strings.
#[derive(Clone, Debug, Default)]
pub struct Arguments {
    pub positional: SmallVec<[Value; 4]>,
    pub keywords: Table,
}

impl Arguments {
    pub fn new() -> Self {
        Arguments::default()
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.positional.len()
    }

    #[inline]
    pub fn positional(&self, index: usize) -> Option<Value> {
        self.positional.get(index).copied()
    }

    /// Keyword argument by its interned name.
    #[inline]
    pub fn keyword(&self, name: ObjRef) -> Option<Value> {
        self.keywords.get(Value::Object(name)).copied()
    }
}
