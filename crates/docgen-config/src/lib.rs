//! Configuration loading for docgen.
//!
//! Reads a simple line-oriented format and binds it onto a record:
//!
//! ```text
//! # Comments start with #; escape a literal one as \#
//! organisation Teamwork 1234
//! main-title   Teamwork Go documentation
//!
//! # Indented lines continue the previous entry
//! group Libraries Shared packages ---
//!     cache
//!     utils
//!
//! # Splice in another file
//! source /etc/docgen/credentials.conf
//! ```
//!
//! The first word of each entry is the key, the rest are its values. Keys map
//! to field names (`main-title` → `MainTitle`, see [`naming`]), and values are
//! converted by the type handlers registered for the field's type in a
//! [`TypeRegistry`], unless a per-call field handler takes over.
//!
//! ```no_run
//! use docgen_config::{destination, find_config, Loader, TypeRegistry};
//!
//! #[derive(Default)]
//! struct Settings {
//!     organisation: Vec<String>,
//!     main_title: String,
//!     skip_clone: bool,
//! }
//!
//! destination!(Settings {
//!     "Organisation" => organisation,
//!     "MainTitle" => main_title,
//!     "SkipClone" => skip_clone,
//! });
//!
//! let registry = TypeRegistry::with_defaults();
//! let path = find_config("docgen.conf").unwrap_or_else(|| "config".into());
//! let mut settings = Settings::default();
//! Loader::new(&registry).parse(&mut settings, &path, None)?;
//! # Ok::<(), docgen_config::ConfigError>(())
//! ```

mod destination;
mod error;
mod find;
pub mod handlers;
mod loader;
pub mod naming;
pub mod reader;
mod registry;
mod value;

pub use destination::{Destination, MapDestination, store, type_name_of};
pub use error::{ConfigError, HandlerError, ParseErrorKind};
pub use find::find_config;
pub use loader::{FieldHandler, FieldHandlers, Loader};
pub use reader::{Line, read_lines};
pub use registry::{TypeHandler, TypeRegistry, handler};
pub use value::{FieldValue, Value};
