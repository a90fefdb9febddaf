//! CLI command implementations.

use std::path::{Path, PathBuf};

use docgen_config::find_config;

pub(crate) mod check;
pub(crate) mod lines;

pub(crate) use check::CheckArgs;
pub(crate) use lines::LinesArgs;

/// Name looked up in the config directories.
const CONFIG_NAME: &str = "docgen.conf";

/// Fallback when nothing else is found.
const DEFAULT_CONFIG: &str = "./config";

/// Resolve the config path: explicit path, then discovery, then `./config`.
fn resolve_config(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| find_config(CONFIG_NAME))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG))
}
