//! Discovery of configuration files in conventional locations.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

/// Find `file` in the usual configuration locations.
///
/// Checked in this order:
///
/// - `$XDG_CONFIG/<file>`, or `$HOME/.config/<file>` if `XDG_CONFIG` is unset
/// - `$HOME/.<file>`
/// - `/etc/<file>`
/// - `/usr/local/etc/<file>`
/// - `/usr/pkg/etc/<file>`
/// - `./<file>`
///
/// Returns the first path that exists.
pub fn find_config(file: &str) -> Option<PathBuf> {
    let found = candidates(file, env::var_os("XDG_CONFIG"), env::var_os("HOME"))
        .into_iter()
        .find(|path| path.exists());
    if let Some(path) = &found {
        tracing::debug!(path = %path.display(), "Found configuration file");
    }
    found
}

/// Candidate paths for `file`, in search order.
fn candidates(file: &str, xdg: Option<OsString>, home: Option<OsString>) -> Vec<PathBuf> {
    let file = file.trim_start_matches('/');
    let xdg = xdg.filter(|v| !v.is_empty());
    let home = home.filter(|v| !v.is_empty());

    let mut paths = Vec::new();
    if let Some(xdg) = &xdg {
        paths.push(PathBuf::from(xdg).join(file));
    }
    if let Some(home) = home {
        let home = PathBuf::from(home);
        if xdg.is_none() {
            paths.push(home.join(".config").join(file));
        }
        paths.push(home.join(format!(".{file}")));
    }
    for dir in ["/etc", "/usr/local/etc", "/usr/pkg/etc", "."] {
        paths.push(PathBuf::from(dir).join(file));
    }
    paths
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_candidates_with_home_only() {
        let paths = candidates("docgen.conf", None, Some("/home/ann".into()));
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/home/ann/.config/docgen.conf"),
                PathBuf::from("/home/ann/.docgen.conf"),
                PathBuf::from("/etc/docgen.conf"),
                PathBuf::from("/usr/local/etc/docgen.conf"),
                PathBuf::from("/usr/pkg/etc/docgen.conf"),
                PathBuf::from("./docgen.conf"),
            ]
        );
    }

    #[test]
    fn test_candidates_prefer_xdg() {
        let paths = candidates("docgen.conf", Some("/xdg".into()), Some("/home/ann".into()));
        assert_eq!(paths[0], PathBuf::from("/xdg/docgen.conf"));
        assert_eq!(paths[1], PathBuf::from("/home/ann/.docgen.conf"));
        assert_eq!(paths.len(), 6);
    }

    #[test]
    fn test_candidates_without_env() {
        let paths = candidates("/docgen.conf", Some("".into()), None);
        assert_eq!(paths[0], PathBuf::from("/etc/docgen.conf"));
        assert_eq!(paths.len(), 4);
    }

    #[test]
    fn test_find_config_missing() {
        assert!(find_config("docgen-test-does-not-exist.conf").is_none());
    }
}
