//! Tagged scalar values.
//!
//! A [`Value`] is `Copy`: heap data is reached through an [`ObjRef`] into the
//! runtime's [`Heap`](crate::Heap). `Empty` is reserved for the hash table's
//! unused-slot marker and is rejected by hashing and equality.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Handle to an object in the heap arena.
///
/// Carries the object's hash so tables can probe without touching the heap.
/// For strings the hash is the FNV-1a hash of the content; for every other
/// object it is derived from the arena index. Two handles are equal iff they
/// name the same allocation.
#[derive(Copy, Clone)]
pub struct ObjRef {
    index: usize,
    hash: u32,
}

impl ObjRef {
    #[inline]
    pub(crate) const fn new(index: usize, hash: u32) -> Self {
        ObjRef { index, hash }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.index
    }

    #[inline]
    pub const fn hash(self) -> u32 {
        self.hash
    }
}

impl PartialEq for ObjRef {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for ObjRef {}

impl Hash for ObjRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl fmt::Debug for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjRef({})", self.index)
    }
}

/// A tagged runtime value.
#[derive(Copy, Clone, Debug, Default)]
pub enum Value {
    Number(f64),
    Bool(bool),
    #[default]
    Nil,
    /// Hash-table sentinel. Never produced by evaluation.
    Empty,
    Object(ObjRef),
}

/// `Empty` reached an operation that only accepts user-visible values.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("the empty sentinel is not a comparable value")]
pub struct EmptyValueError;

impl Value {
    #[inline]
    pub fn is_nil(self) -> bool {
        matches!(self, Value::Nil)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        matches!(self, Value::Empty)
    }

    #[inline]
    pub fn as_number(self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object(self) -> Option<ObjRef> {
        match self {
            Value::Object(r) => Some(r),
            _ => None,
        }
    }

    /// Table hash of this value, or `None` for `Empty`.
    ///
    /// Numbers hash the bit pattern of `n + 1.0` folded to 32 bits, so `0.0`
    /// and `-0.0` land in the same bucket.
    pub fn hash_code(self) -> Option<u32> {
        match self {
            Value::Bool(b) => Some(u32::from(b)),
            Value::Nil => Some(3),
            Value::Number(n) => {
                let bits = (n + 1.0).to_bits();
                #[allow(clippy::cast_possible_truncation)]
                Some((bits as u32).wrapping_add((bits >> 32) as u32))
            }
            Value::Object(r) => Some(r.hash()),
            Value::Empty => None,
        }
    }

    /// Language-level equality.
    ///
    /// Values of different kinds are unequal, objects compare by identity
    /// (sound for strings because they are interned). `Empty` is rejected.
    pub fn equals(self, other: Value) -> Result<bool, EmptyValueError> {
        match (self, other) {
            (Value::Empty, _) | (_, Value::Empty) => Err(EmptyValueError),
            (Value::Number(a), Value::Number(b)) => Ok(a == b),
            (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
            (Value::Nil, Value::Nil) => Ok(true),
            (Value::Object(a), Value::Object(b)) => Ok(a == b),
            _ => Ok(false),
        }
    }

    /// Three-way comparison for relational operators.
    ///
    /// Only numbers are ordered. `None` for any other pairing, and for NaN.
    pub fn compare(self, other: Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(&b),
            _ => None,
        }
    }

    /// Key identity used by the hash table. `Empty` matches nothing.
    #[inline]
    pub(crate) fn same_key(self, other: Value) -> bool {
        self.equals(other).unwrap_or(false)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<ObjRef> for Value {
    fn from(r: ObjRef) -> Self {
        Value::Object(r)
    }
}
