//! Dynamically typed MessagePack values

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

/// A decoded MessagePack value
///
/// Owns its whole tree; there are no back-references, so values can be
/// cloned and shared across threads freely.
///
/// Equality is structural with three refinements: `Int` and `UInt` compare
/// by numeric value (the encoder writes non-negative integers with the
/// smallest unsigned tag), floats compare by bit pattern (so `NaN == NaN`
/// and `0.0 != -0.0`), and maps compare as multisets of pairs. A map keeps
/// the pair order it was decoded or built with, but that order never affects
/// equality.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// nil
    #[default]
    Nil,
    /// true / false
    Bool(bool),
    /// Any signed-width integer tag, widened
    Int(i64),
    /// Any unsigned-width integer tag, widened
    UInt(u64),
    /// Single precision float
    Float(f32),
    /// Double precision float
    Double(f64),
    /// Text bytes, not validated as UTF-8 until accessed
    String(Vec<u8>),
    /// Raw bytes
    Binary(Vec<u8>),
    /// Ordered items
    Array(Vec<Value>),
    /// Key/value pairs in encounter order
    Map(Vec<(Value, Value)>),
    /// Application-defined type code and opaque payload
    Extension(i8, Vec<u8>),
}

impl Value {
    /// Check for nil
    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Boolean payload
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Integer payload as i64, if it fits
    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int(n) => Some(n),
            Value::UInt(n) => i64::try_from(n).ok(),
            _ => None,
        }
    }

    /// Integer payload as u64, if it fits
    #[inline]
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Value::UInt(n) => Some(n),
            Value::Int(n) => u64::try_from(n).ok(),
            _ => None,
        }
    }

    /// Float payload, widening single precision
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Float(f) => Some(f as f64),
            Value::Double(f) => Some(f),
            _ => None,
        }
    }

    /// String payload, if it is valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(bytes) => core::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }

    /// Raw bytes of a string or binary value
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::String(bytes) | Value::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Array items
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Map pairs in stored order
    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Extension type code and payload
    pub fn as_ext(&self) -> Option<(i8, &[u8])> {
        match self {
            Value::Extension(code, payload) => Some((*code, payload)),
            _ => None,
        }
    }

    /// Look up the first value stored under `key` in a map
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

/// Multiset comparison of map pairs
fn map_eq(a: &[(Value, Value)], b: &[(Value, Value)]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    if a == b {
        return true;
    }

    let mut matched = vec![false; b.len()];
    for pair in a {
        let hit = b
            .iter()
            .enumerate()
            .position(|(i, other)| !matched[i] && other == pair);
        match hit {
            Some(i) => matched[i] = true,
            None => return false,
        }
    }
    true
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::Int(a), Value::UInt(b)) | (Value::UInt(b), Value::Int(a)) => {
                u64::try_from(*a).map_or(false, |a| a == *b)
            }
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Binary(a), Value::Binary(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => map_eq(a, b),
            (Value::Extension(ta, a), Value::Extension(tb, b)) => ta == tb && a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Int(n as i64)
            }
        })*
    };
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::UInt(n as u64)
            }
        })*
    };
}

from_signed!(i8, i16, i32, i64);
from_unsigned!(u8, u16, u32, u64);

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Double(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s.into_bytes())
    }
}

impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Value::Binary(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Binary(bytes)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Vec<(Value, Value)>> for Value {
    fn from(pairs: Vec<(Value, Value)>) -> Self {
        Value::Map(pairs)
    }
}
