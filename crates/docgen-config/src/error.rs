//! Error types for configuration loading.

use std::path::PathBuf;

/// Error returned by type and field handlers.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file (or a sourced file) could not be opened or read.
    #[error("cannot read {}: {source}", path.display())]
    File {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Structural violation of the file format.
    #[error("{} line {line}: first line can't be indented", path.display())]
    Format {
        /// File containing the indented line.
        path: PathBuf,
        /// 1-based physical line number.
        line: usize,
    },
    /// A `source` directive includes a file that is already being read.
    #[error("source cycle: {}", format_chain(.chain))]
    SourceCycle {
        /// Inclusion chain, ending with the file that closes the cycle.
        chain: Vec<PathBuf>,
    },
    /// A line could not be bound to the destination.
    #[error("{} line {line}: error parsing {key}: {reason}", file.display())]
    Parse {
        /// File the offending line came from.
        file: PathBuf,
        /// 1-based line number within `file`.
        line: usize,
        /// Key as written in the file.
        key: String,
        /// What went wrong.
        reason: ParseErrorKind,
    },
}

/// Reason a single configuration line failed to bind.
#[derive(Debug, thiserror::Error)]
pub enum ParseErrorKind {
    /// Neither the field name nor its plural/singular variant exists.
    #[error("unknown option (field {field} or {variant} is missing)")]
    UnknownOption {
        /// Field name derived from the key.
        field: String,
        /// Plural-toggled variant that was also tried.
        variant: String,
    },
    /// A per-call field handler failed.
    #[error("{0} (from handler)")]
    FieldHandler(#[source] HandlerError),
    /// A type handler in the registered chain failed.
    #[error("{0}")]
    TypeHandler(#[source] HandlerError),
    /// No field handler and no type handler for the field's type.
    #[error("don't know how to set fields of the type {type_name}")]
    NoHandler {
        /// Type name declared by the destination.
        type_name: &'static str,
    },
    /// The handler chain produced a value the field cannot hold.
    #[error("handler produced {found} for field {field} of type {type_name}")]
    ValueMismatch {
        /// Destination field name.
        field: String,
        /// Type name declared by the destination.
        type_name: &'static str,
        /// Kind of value the handler chain returned.
        found: &'static str,
    },
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
