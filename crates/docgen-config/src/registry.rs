//! Type handler registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::handlers;
use crate::{HandlerError, Value};

/// Conversion function for one field type.
///
/// Handlers are chained: the first receives [`Value::Strings`], each following
/// handler receives the previous output.
pub type TypeHandler = Arc<dyn Fn(Value) -> Result<Value, HandlerError> + Send + Sync>;

/// Wrap a function or closure as a [`TypeHandler`].
pub fn handler<F>(f: F) -> TypeHandler
where
    F: Fn(Value) -> Result<Value, HandlerError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Handler chains keyed by field type name.
///
/// Build one at start-up, register everything, then share it read-only with
/// every [`Loader`](crate::Loader).
///
/// ```
/// use docgen_config::{handler, handlers, TypeRegistry};
///
/// let mut registry = TypeRegistry::with_defaults();
/// registry.register(
///     "String",
///     [handler(handlers::validate_single_value), handler(handlers::to_string)],
/// );
/// assert!(registry.contains("String"));
/// ```
#[derive(Clone, Default)]
pub struct TypeRegistry {
    handlers: HashMap<String, Vec<TypeHandler>>,
}

impl TypeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with handlers for the built-in field types.
    ///
    /// See [`handlers`] for the conversions.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register("String", [handler(handlers::to_string)]);
        registry.register(
            "bool",
            [
                handlers::validate_value_limit(0, 1),
                handler(handlers::to_bool),
            ],
        );
        registry.register(
            "i64",
            [
                handler(handlers::validate_single_value),
                handler(handlers::to_int),
            ],
        );
        registry.register(
            "i32",
            [
                handler(handlers::validate_single_value),
                handlers::to_int_in::<i32>(),
            ],
        );
        registry.register(
            "u64",
            [
                handler(handlers::validate_single_value),
                handler(handlers::to_uint),
            ],
        );
        registry.register(
            "u32",
            [
                handler(handlers::validate_single_value),
                handlers::to_uint_in::<u32>(),
            ],
        );
        registry.register(
            "u16",
            [
                handler(handlers::validate_single_value),
                handlers::to_uint_in::<u16>(),
            ],
        );
        registry.register(
            "usize",
            [
                handler(handlers::validate_single_value),
                handlers::to_uint_in::<usize>(),
            ],
        );
        registry.register(
            "f64",
            [
                handler(handlers::validate_single_value),
                handler(handlers::to_float),
            ],
        );
        registry.register("Vec<String>", [handler(handlers::to_strings)]);
        registry.register("Vec<i64>", [handler(handlers::to_ints)]);
        registry.register("PathBuf", [handler(handlers::to_path)]);
        registry.register(
            "Duration",
            [
                handler(handlers::validate_single_value),
                handler(handlers::to_duration),
            ],
        );
        registry.register("Regex", [handler(handlers::to_regex)]);

        registry
    }

    /// Set the handler chain for `type_name`.
    ///
    /// An existing chain for the same type is replaced, not extended.
    pub fn register<I>(&mut self, type_name: impl Into<String>, handlers: I)
    where
        I: IntoIterator<Item = TypeHandler>,
    {
        self.handlers
            .insert(type_name.into(), handlers.into_iter().collect());
    }

    /// Whether a chain is registered for `type_name`.
    pub fn contains(&self, type_name: &str) -> bool {
        self.handlers.contains_key(type_name)
    }

    /// Handler chain registered for `type_name`.
    pub fn get(&self, type_name: &str) -> Option<&[TypeHandler]> {
        self.handlers.get(type_name).map(Vec::as_slice)
    }

    /// Run the chain for `type_name` on raw values.
    ///
    /// Returns `None` if no chain is registered. Stops at the first error.
    pub fn convert(&self, type_name: &str, values: &[String]) -> Option<Result<Value, HandlerError>> {
        let chain = self.get(type_name)?;
        let mut value = Value::Strings(values.to_vec());
        for h in chain {
            value = match h(value) {
                Ok(v) => v,
                Err(e) => return Some(Err(e)),
            };
        }
        Some(Ok(value))
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.handlers.keys().collect();
        types.sort();
        f.debug_struct("TypeRegistry").field("types", &types).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|&s| s.to_owned()).collect()
    }

    #[test]
    fn test_defaults_registered() {
        let registry = TypeRegistry::with_defaults();
        for name in ["String", "bool", "i64", "u16", "Vec<String>", "Duration", "Regex"] {
            assert!(registry.contains(name), "missing {name}");
        }
        assert!(!TypeRegistry::new().contains("String"));
    }

    #[test]
    fn test_chain_feeds_output_forward() {
        let mut registry = TypeRegistry::new();
        registry.register(
            "upper",
            [
                handler(handlers::to_string),
                handler(|v| match v {
                    Value::String(s) => Ok(Value::String(s.to_uppercase())),
                    other => Err(format!("unexpected {}", other.kind()).into()),
                }),
            ],
        );

        let value = registry
            .convert("upper", &strings(&["a", "b"]))
            .unwrap()
            .unwrap();

        assert!(matches!(value, Value::String(s) if s == "A B"));
    }

    #[test]
    fn test_chain_stops_at_first_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut registry = TypeRegistry::new();
        registry.register(
            "t",
            [
                handler(handlers::validate_single_value),
                handler(move |v| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(v)
                }),
            ],
        );

        let result = registry.convert("t", &strings(&["a", "b"])).unwrap();

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_register_overwrites() {
        let mut registry = TypeRegistry::with_defaults();
        registry.register("String", [handler(|_| Ok(Value::String("fixed".to_owned())))]);

        let value = registry
            .convert("String", &strings(&["x"]))
            .unwrap()
            .unwrap();

        assert!(matches!(value, Value::String(s) if s == "fixed"));
        assert_eq!(registry.get("String").map(<[_]>::len), Some(1));
    }

    #[test]
    fn test_convert_unknown_type() {
        let registry = TypeRegistry::with_defaults();
        assert!(registry.convert("Vec<Group>", &[]).is_none());
    }

    #[test]
    fn test_debug_lists_types() {
        let mut registry = TypeRegistry::new();
        registry.register("b", Vec::new());
        registry.register("a", Vec::new());
        assert_eq!(format!("{registry:?}"), r#"TypeRegistry { types: ["a", "b"] }"#);
    }
}
