//! `docgen check` command implementation.

use std::path::PathBuf;

use clap::Args;

use crate::error::CliError;
use crate::output::Output;
use crate::site::SiteConfig;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Path to configuration file (default: auto-discover docgen.conf).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Don't clone repositories (overrides config).
    #[arg(long)]
    skip_clone: bool,

    /// Print the loaded settings as JSON.
    #[arg(long)]
    json: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration can't be loaded or is invalid.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let path = super::resolve_config(self.config.as_deref());
        tracing::info!(path = %path.display(), "Loading configuration");

        let mut config = SiteConfig::load(&path)?;
        if self.skip_clone {
            config.skip_clone = true;
        }
        config.validate()?;

        if self.json {
            output.data(&serde_json::to_string_pretty(&config)?)?;
            return Ok(());
        }

        output.highlight(&format!("Configuration: {}", path.display()));
        output.info(&format!("  Organisation: {}", config.organisation.join(" ")));
        output.info(&format!("  Title:        {}", config.main_title));
        output.info(&format!("  Output:       {}", config.outdir.display()));
        output.info(&format!("  Scan:         {}", config.scan.join(", ")));
        for (name, projects) in config.group_summary() {
            output.info(&format!("  Group {name}: {projects} project(s)"));
        }
        if config.skip_clone {
            output.warning("  Cloning disabled");
        }
        output.success("Configuration is valid");

        Ok(())
    }
}
