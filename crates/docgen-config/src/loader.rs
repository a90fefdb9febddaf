//! Binding of configuration lines to a destination record.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::naming::{field_name, toggle_plural};
use crate::reader::{Line, read_lines};
use crate::{ConfigError, Destination, HandlerError, ParseErrorKind, TypeRegistry};

/// Per-call override for one field.
///
/// Receives the destination and the values after the key. It sets whatever it
/// needs on the destination itself.
pub type FieldHandler<'a, D> = Box<dyn FnMut(&mut D, &[String]) -> Result<(), HandlerError> + 'a>;

/// Field handlers keyed by field name (`MainTitle`, not `main-title`).
pub struct FieldHandlers<'a, D: ?Sized> {
    handlers: HashMap<String, FieldHandler<'a, D>>,
}

impl<'a, D: ?Sized> FieldHandlers<'a, D> {
    /// Create an empty set of handlers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Add a handler for `field`, replacing any existing one.
    #[must_use]
    pub fn on<F>(mut self, field: impl Into<String>, handler: F) -> Self
    where
        F: FnMut(&mut D, &[String]) -> Result<(), HandlerError> + 'a,
    {
        self.insert(field, handler);
        self
    }

    /// Add a handler for `field`, replacing any existing one.
    pub fn insert<F>(&mut self, field: impl Into<String>, handler: F)
    where
        F: FnMut(&mut D, &[String]) -> Result<(), HandlerError> + 'a,
    {
        self.handlers.insert(field.into(), Box::new(handler));
    }

    fn get_mut(&mut self, field: &str) -> Option<&mut FieldHandler<'a, D>> {
        self.handlers.get_mut(field)
    }
}

impl<D: ?Sized> Default for FieldHandlers<'_, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: ?Sized> fmt::Debug for FieldHandlers<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<_> = self.handlers.keys().collect();
        fields.sort();
        f.debug_struct("FieldHandlers")
            .field("fields", &fields)
            .finish()
    }
}

/// Reads configuration files into destination records.
///
/// ```no_run
/// use docgen_config::{destination, Loader, TypeRegistry};
///
/// #[derive(Default)]
/// struct Settings {
///     main_title: String,
///     scan: Vec<String>,
/// }
///
/// destination!(Settings {
///     "MainTitle" => main_title,
///     "Scan" => scan,
/// });
///
/// let registry = TypeRegistry::with_defaults();
/// let mut settings = Settings::default();
/// Loader::new(&registry).parse(&mut settings, "docgen.conf", None)?;
/// # Ok::<(), docgen_config::ConfigError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Loader<'r> {
    registry: &'r TypeRegistry,
    safe_mode: bool,
}

impl<'r> Loader<'r> {
    /// Create a loader that converts values with `registry`.
    #[must_use]
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            safe_mode: true,
        }
    }

    /// Set safe mode (enabled by default).
    ///
    /// In safe mode a handler chain that produces a value its field can't hold
    /// is reported as [`ParseErrorKind::ValueMismatch`]. With safe mode off the
    /// loader panics instead, which gives a backtrace while debugging handlers.
    #[must_use]
    pub fn safe_mode(mut self, enabled: bool) -> Self {
        self.safe_mode = enabled;
        self
    }

    /// Read `path` and bind every entry to `dest`.
    ///
    /// Lines are bound in file order and the first error stops parsing. Fields
    /// bound before the failing line keep their new values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read or is malformed, or if a line
    /// can't be bound (see [`Loader::bind`]).
    pub fn parse<D>(
        &self,
        dest: &mut D,
        path: impl AsRef<Path>,
        handlers: Option<&mut FieldHandlers<'_, D>>,
    ) -> Result<(), ConfigError>
    where
        D: Destination + ?Sized,
    {
        let path = path.as_ref();
        let lines = read_lines(path)?;
        tracing::debug!(file = %path.display(), entries = lines.len(), "Read configuration file");
        self.bind(dest, &lines, handlers)
    }

    /// Like [`Loader::parse`], for configuration that must load at start-up.
    ///
    /// # Panics
    ///
    /// Panics with the error message if parsing fails.
    pub fn must_parse<D>(
        &self,
        dest: &mut D,
        path: impl AsRef<Path>,
        handlers: Option<&mut FieldHandlers<'_, D>>,
    ) where
        D: Destination + ?Sized,
    {
        if let Err(err) = self.parse(dest, path, handlers) {
            panic!("{err}");
        }
    }

    /// Bind already-read lines to `dest`.
    ///
    /// For each line the key is resolved to a field, then the field handler
    /// for that field runs if there is one; otherwise the type handler chain
    /// for the field's type converts the values and the result is stored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for an unknown key, a failing handler, a
    /// field type without handlers, or (in safe mode) a converted value that
    /// doesn't fit its field.
    pub fn bind<D>(
        &self,
        dest: &mut D,
        lines: &[Line],
        mut handlers: Option<&mut FieldHandlers<'_, D>>,
    ) -> Result<(), ConfigError>
    where
        D: Destination + ?Sized,
    {
        for line in lines {
            let mut tokens = line.content.split(' ');
            let key = tokens.next().unwrap_or_default();
            let values: Vec<String> = tokens.map(str::to_owned).collect();
            let fail = |reason| ConfigError::Parse {
                file: line.file.clone(),
                line: line.number,
                key: key.to_owned(),
                reason,
            };

            if let Some(map) = dest.as_map() {
                map.insert_values(key.to_owned(), values);
                continue;
            }

            let (field, type_name) = resolve_field(dest, key).map_err(fail)?;
            tracing::debug!(
                file = %line.file.display(),
                line = line.number,
                key,
                field = %field,
                "Binding configuration value"
            );

            if let Some(handler) = handlers.as_mut().and_then(|h| h.get_mut(&field)) {
                handler(&mut *dest, &values).map_err(|e| fail(ParseErrorKind::FieldHandler(e)))?;
                continue;
            }

            let value = match self.registry.convert(type_name, &values) {
                Some(Ok(value)) => value,
                Some(Err(e)) => return Err(fail(ParseErrorKind::TypeHandler(e))),
                None => return Err(fail(ParseErrorKind::NoHandler { type_name })),
            };

            let found = value.kind();
            if !dest.set_field(&field, value) {
                let reason = ParseErrorKind::ValueMismatch {
                    field,
                    type_name,
                    found,
                };
                let err = fail(reason);
                if !self.safe_mode {
                    panic!("{err}");
                }
                return Err(err);
            }
        }

        Ok(())
    }
}

/// Resolve `key` to a field of `dest` and that field's type name.
///
/// Tries the derived field name first, then its plural/singular variant.
fn resolve_field<D>(dest: &D, key: &str) -> Result<(String, &'static str), ParseErrorKind>
where
    D: Destination + ?Sized,
{
    let field = field_name(key);
    if let Some(type_name) = dest.field_type(&field) {
        return Ok((field, type_name));
    }

    let variant = toggle_plural(&field);
    match dest.field_type(&variant) {
        Some(type_name) => Ok((variant, type_name)),
        None => Err(ParseErrorKind::UnknownOption { field, variant }),
    }
}
