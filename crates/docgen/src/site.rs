//! Settings of the documentation site generator.
//!
//! Loaded from a `docgen.conf` file such as:
//!
//! ```text
//! organisation   Teamwork 1234
//! outdir         _site
//! clonedir       _clone
//! scan           github.com/teamwork/...
//! relative-to    github.com/teamwork
//! main-title     Teamwork Go documentation
//! rewrite-source github
//!
//! group Libraries Packages shared between projects --- cache utils
//! group Services  Deployed applications --- desk projects
//! ```

use std::env;
use std::path::{Path, PathBuf};

use docgen_config::{
    FieldHandlers, FieldValue, HandlerError, Loader, TypeRegistry, Value, destination, handler,
    handlers,
};
use serde::Serialize;

use crate::error::CliError;

/// Environment variable used when `pass` is not set in the file.
const PASS_ENV: &str = "GITHUB_PASS";

/// Separates a group's description from its projects.
const GROUP_SEPARATOR: &str = "---";

/// A group of projects on the home page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub(crate) struct Group {
    pub name: String,
    pub desc: String,
    /// Import path prefixes of the projects in this group.
    pub projects: Vec<String>,
}

/// Groups in the order they appear in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub(crate) struct Groups(pub Vec<Group>);

impl FieldValue for Groups {
    const TYPE_NAME: &'static str = "Vec<Group>";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Other(any) => any.downcast::<Group>().ok().map(|g| Self(vec![*g])),
            _ => None,
        }
    }

    fn store(&mut self, value: Self) {
        self.0.extend(value.0);
    }
}

/// Parse `group <name> <description…> --- <project…>`.
fn parse_group(value: Value) -> Result<Value, HandlerError> {
    let values = match value {
        Value::Strings(values) => values,
        other => return Err(format!("expected raw values, got {}", other.kind()).into()),
    };
    let Some((name, rest)) = values.split_first() else {
        return Err("group needs a name".into());
    };

    let (desc, projects) = match rest.iter().position(|v| v == GROUP_SEPARATOR) {
        Some(i) => (&rest[..i], rest[i + 1..].to_vec()),
        None => (rest, Vec::new()),
    };

    Ok(Value::other(Group {
        name: name.clone(),
        desc: desc.join(" "),
        projects,
    }))
}

/// Type registry with the generator's own types registered.
pub(crate) fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::with_defaults();
    registry.register(Groups::TYPE_NAME, [handler(parse_group)]);
    registry
}

/// Generator settings.
#[derive(Debug, Default, Serialize)]
pub(crate) struct SiteConfig {
    /// Organisation name and numeric ID on GitHub.
    pub organisation: Vec<String>,
    pub outdir: PathBuf,
    pub clonedir: PathBuf,
    /// Package patterns to document.
    pub scan: Vec<String>,
    /// Import path prefix stripped from package paths.
    pub relative_to: String,
    pub main_title: String,
    pub user: String,
    #[serde(skip_serializing)]
    pub pass: String,
    pub groups: Groups,
    /// Repositories that are never cloned.
    pub exclude: Vec<String>,
    pub skip_clone: bool,
    pub home_text: String,
    pub bundle: bool,
    /// Where source links point to; empty or `github`.
    pub rewrite_source: String,
    pub shallow_clone: bool,
}

destination!(SiteConfig {
    "Organisation" => organisation,
    "Outdir" => outdir,
    "Clonedir" => clonedir,
    "Scan" => scan,
    "RelativeTo" => relative_to,
    "MainTitle" => main_title,
    "User" => user,
    "Pass" => pass,
    "Groups" => groups,
    "Exclude" => exclude,
    "SkipClone" => skip_clone,
    "HomeText" => home_text,
    "Bundle" => bundle,
    "RewriteSource" => rewrite_source,
    "ShallowClone" => shallow_clone,
});

impl SiteConfig {
    /// Load settings from `path`.
    ///
    /// `pass` may reference environment variables (`${GITHUB_TOKEN}`).
    pub(crate) fn load(path: &Path) -> Result<Self, CliError> {
        let registry = registry();
        let mut field_handlers = FieldHandlers::new().on("Pass", |c: &mut Self, values: &[String]| {
            let expanded = handlers::expand_env(Value::Strings(values.to_vec()))?;
            c.pass = match handlers::to_string(expanded)? {
                Value::String(s) => s,
                other => return Err(format!("unexpected {}", other.kind()).into()),
            };
            Ok(())
        });

        let mut config = Self::default();
        Loader::new(&registry).parse(&mut config, path, Some(&mut field_handlers))?;
        Ok(config)
    }

    /// Check the settings and fill in the password from the environment.
    pub(crate) fn validate(&mut self) -> Result<(), CliError> {
        self.validate_with(PASS_ENV)
    }

    /// Like [`SiteConfig::validate`], reading the password from `pass_env`.
    fn validate_with(&mut self, pass_env: &str) -> Result<(), CliError> {
        if self.organisation.is_empty() {
            return Err(CliError::Validation("organisation must be set".to_owned()));
        }
        if !matches!(self.rewrite_source.as_str(), "" | "github") {
            return Err(CliError::Validation(format!(
                "rewrite-source must be empty or \"github\", not {:?}",
                self.rewrite_source
            )));
        }

        if !self.skip_clone && self.pass.is_empty() {
            self.pass = env::var(pass_env).unwrap_or_default();
            if self.pass.is_empty() {
                return Err(CliError::Validation(format!(
                    "no password set; please set 'pass' in config or use the {pass_env} env variable"
                )));
            }
        }

        Ok(())
    }

    /// Group names with the number of projects in each.
    pub(crate) fn group_summary(&self) -> Vec<(&str, usize)> {
        self.groups
            .0
            .iter()
            .map(|g| (g.name.as_str(), g.projects.len()))
            .collect()
    }
}
