//! Values passed through type handler chains, and the fields that store them.

use std::any::Any;
use std::path::PathBuf;
use std::time::Duration;

use regex::Regex;

/// A value produced by a type handler.
///
/// Every chain starts with [`Value::Strings`] holding the tokens after the key.
/// Handlers for caller-defined types return [`Value::Other`].
#[derive(Debug)]
pub enum Value {
    /// Raw tokens.
    Strings(Vec<String>),
    /// A single string.
    String(String),
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// An unsigned integer.
    UInt(u64),
    /// A floating point number.
    Float(f64),
    /// A list of signed integers.
    Ints(Vec<i64>),
    /// A filesystem path.
    Path(PathBuf),
    /// A time span.
    Duration(Duration),
    /// A compiled regular expression.
    Regex(Regex),
    /// Any other type; retrieved with a downcast in [`FieldValue::from_value`].
    Other(Box<dyn Any + Send>),
}

impl Value {
    /// Wrap a caller-defined value.
    pub fn other<T: Any + Send>(value: T) -> Self {
        Self::Other(Box::new(value))
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Strings(_) => "strings",
            Self::String(_) => "string",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Float(_) => "float",
            Self::Ints(_) => "ints",
            Self::Path(_) => "path",
            Self::Duration(_) => "duration",
            Self::Regex(_) => "regex",
            Self::Other(_) => "other",
        }
    }
}

/// A type that can be stored in a destination field.
///
/// `TYPE_NAME` is the key the type handlers are registered under. Sequence
/// types override [`FieldValue::store`] so repeated keys append.
pub trait FieldValue: Sized {
    /// Registry key for this type.
    const TYPE_NAME: &'static str;

    /// Convert the final value of a handler chain.
    ///
    /// Returns `None` if the value has the wrong kind for this type.
    fn from_value(value: Value) -> Option<Self>;

    /// Store a converted value into the field. Replaces by default.
    fn store(&mut self, value: Self) {
        *self = value;
    }
}

macro_rules! scalar_field {
    ($ty:ty, $name:literal, $pattern:pat => $out:expr) => {
        impl FieldValue for $ty {
            const TYPE_NAME: &'static str = $name;

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    $pattern => $out,
                    _ => None,
                }
            }
        }
    };
}

scalar_field!(String, "String", Value::String(s) => Some(s));
scalar_field!(bool, "bool", Value::Bool(b) => Some(b));
scalar_field!(i64, "i64", Value::Int(n) => Some(n));
scalar_field!(i32, "i32", Value::Int(n) => i32::try_from(n).ok());
scalar_field!(u16, "u16", Value::UInt(n) => u16::try_from(n).ok());
scalar_field!(u32, "u32", Value::UInt(n) => u32::try_from(n).ok());
scalar_field!(u64, "u64", Value::UInt(n) => Some(n));
scalar_field!(usize, "usize", Value::UInt(n) => usize::try_from(n).ok());
scalar_field!(f64, "f64", Value::Float(f) => Some(f));
scalar_field!(PathBuf, "PathBuf", Value::Path(p) => Some(p));
scalar_field!(Duration, "Duration", Value::Duration(d) => Some(d));
scalar_field!(Regex, "Regex", Value::Regex(r) => Some(r));

impl FieldValue for Vec<String> {
    const TYPE_NAME: &'static str = "Vec<String>";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Strings(v) => Some(v),
            _ => None,
        }
    }

    fn store(&mut self, value: Self) {
        self.extend(value);
    }
}

impl FieldValue for Vec<i64> {
    const TYPE_NAME: &'static str = "Vec<i64>";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Ints(v) => Some(v),
            _ => None,
        }
    }

    fn store(&mut self, value: Self) {
        self.extend(value);
    }
}

/// Optional fields use the handlers of the inner type.
impl<T: FieldValue> FieldValue for Option<T> {
    const TYPE_NAME: &'static str = T::TYPE_NAME;

    fn from_value(value: Value) -> Option<Self> {
        T::from_value(value).map(Some)
    }

    fn store(&mut self, value: Self) {
        match value {
            Some(new) => match self {
                Some(current) => current.store(new),
                None => *self = Some(new),
            },
            None => *self = None,
        }
    }
}
