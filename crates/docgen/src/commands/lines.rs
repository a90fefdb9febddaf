//! `docgen lines` command implementation.

use std::path::PathBuf;

use clap::Args;
use docgen_config::{Line, read_lines};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the lines command.
#[derive(Args)]
pub(crate) struct LinesArgs {
    /// Configuration file (default: auto-discover docgen.conf).
    path: Option<PathBuf>,
}

impl LinesArgs {
    /// Print every entry as `file:line: content`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read or is malformed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let path = super::resolve_config(self.path.as_deref());

        for line in read_lines(&path)? {
            output.data(&format_line(&line))?;
        }

        Ok(())
    }
}

/// `file:line: content`, as printed by `docgen lines`.
fn format_line(line: &Line) -> String {
    format!("{}:{}: {}", line.file.display(), line.number, line.content)
}
