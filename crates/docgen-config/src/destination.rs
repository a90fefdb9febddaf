//! Records that configuration lines are bound to.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::{FieldValue, Value};

/// A record the loader writes configuration values into.
///
/// Structured records list their fields by name (see [`naming`](crate::naming)
/// for how keys map to names) together with the type name used to look up
/// type handlers. Most records implement this with [`destination!`](crate::destination):
///
/// ```
/// use docgen_config::destination;
///
/// #[derive(Default)]
/// struct Settings {
///     title: String,
///     tags: Vec<String>,
/// }
///
/// destination!(Settings {
///     "Title" => title,
///     "Tags" => tags,
/// });
/// ```
///
/// Fields only ever set through field handlers can be declared by
/// implementing the trait by hand.
pub trait Destination {
    /// Type name of `field`, or `None` if the record has no such field.
    fn field_type(&self, field: &str) -> Option<&'static str>;

    /// Store the final value of a type handler chain into `field`.
    ///
    /// Returns `false` if the field doesn't exist or the value has the wrong
    /// kind for it.
    fn set_field(&mut self, field: &str, value: Value) -> bool;

    /// Key/value view for mapping records.
    ///
    /// When this returns `Some`, every line is stored under its key as-is and
    /// no field resolution or handlers run.
    fn as_map(&mut self) -> Option<&mut dyn MapDestination> {
        None
    }
}

/// A key/value mapping record.
pub trait MapDestination {
    /// Store `values` under `key`, replacing any earlier entry.
    fn insert_values(&mut self, key: String, values: Vec<String>);
}

impl<S: BuildHasher> MapDestination for HashMap<String, Vec<String>, S> {
    fn insert_values(&mut self, key: String, values: Vec<String>) {
        self.insert(key, values);
    }
}

impl MapDestination for BTreeMap<String, Vec<String>> {
    fn insert_values(&mut self, key: String, values: Vec<String>) {
        self.insert(key, values);
    }
}

impl<S: BuildHasher> Destination for HashMap<String, Vec<String>, S> {
    fn field_type(&self, _field: &str) -> Option<&'static str> {
        None
    }

    fn set_field(&mut self, _field: &str, _value: Value) -> bool {
        false
    }

    fn as_map(&mut self) -> Option<&mut dyn MapDestination> {
        Some(self)
    }
}

impl Destination for BTreeMap<String, Vec<String>> {
    fn field_type(&self, _field: &str) -> Option<&'static str> {
        None
    }

    fn set_field(&mut self, _field: &str, _value: Value) -> bool {
        false
    }

    fn as_map(&mut self) -> Option<&mut dyn MapDestination> {
        Some(self)
    }
}

/// Type name of a field, as used by [`destination!`](crate::destination).
pub fn type_name_of<T: FieldValue>(_field: &T) -> &'static str {
    T::TYPE_NAME
}

/// Convert `value` and store it into `field`, as used by
/// [`destination!`](crate::destination).
///
/// Returns `false` if the value has the wrong kind for the field.
pub fn store<T: FieldValue>(field: &mut T, value: Value) -> bool {
    match T::from_value(value) {
        Some(converted) => {
            field.store(converted);
            true
        }
        None => false,
    }
}

/// Implement [`Destination`] for a struct from a field table.
///
/// Each entry maps a field name, as derived from configuration keys, to a
/// struct field whose type implements [`FieldValue`].
#[macro_export]
macro_rules! destination {
    ($ty:ty { $($name:literal => $field:ident),* $(,)? }) => {
        impl $crate::Destination for $ty {
            fn field_type(&self, field: &str) -> ::std::option::Option<&'static str> {
                match field {
                    $($name => ::std::option::Option::Some($crate::type_name_of(&self.$field)),)*
                    _ => ::std::option::Option::None,
                }
            }

            fn set_field(&mut self, field: &str, value: $crate::Value) -> bool {
                match field {
                    $($name => $crate::store(&mut self.$field, value),)*
                    _ => false,
                }
            }
        }
    };
}
