//! Line reader for the configuration format.
//!
//! Turns a file into a list of logical [`Line`]s:
//!
//! - blank lines and lines starting with `#` are skipped;
//! - a `#` starts a trailing comment unless escaped as `\#`;
//! - runs of whitespace collapse into a single space (`\ ` keeps a literal
//!   space, `\\` a literal backslash);
//! - a line starting with whitespace continues the previous entry;
//! - `source <path>` splices in the lines of another file.
//!
//! Line numbers are 1-based and refer to the physical line in the file the
//! entry was read from, so entries spliced in by `source` keep the name and
//! numbering of the sourced file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Directive that includes another file.
const SOURCE_DIRECTIVE: &str = "source ";

/// A logical configuration entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// File the entry was read from.
    pub file: PathBuf,
    /// 1-based number of the physical line that started the entry.
    pub number: usize,
    /// Normalized content; tokens are separated by single spaces.
    pub content: String,
}

impl Line {
    /// Split the content into tokens. The first token is the key.
    pub fn tokens(&self) -> Vec<&str> {
        self.content.split(' ').collect()
    }
}

/// Read and normalize a configuration file.
///
/// `source` directives are resolved eagerly. A file that (directly or
/// indirectly) sources itself fails with [`ConfigError::SourceCycle`].
///
/// # Errors
///
/// Returns [`ConfigError::File`] if this file or a sourced file can't be read,
/// and [`ConfigError::Format`] if a file starts with an indented line.
pub fn read_lines(path: &Path) -> Result<Vec<Line>, ConfigError> {
    let mut stack = Vec::new();
    read_file(path, &mut stack)
}

fn read_file(path: &Path, stack: &mut Vec<PathBuf>) -> Result<Vec<Line>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::File {
        path: path.to_path_buf(),
        source,
    })?;

    let identity = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if stack.contains(&identity) {
        let mut chain = stack.clone();
        chain.push(identity);
        return Err(ConfigError::SourceCycle { chain });
    }

    stack.push(identity);
    let lines = read_content(&content, path, stack);
    stack.pop();
    lines
}

fn read_content(
    content: &str,
    path: &Path,
    stack: &mut Vec<PathBuf>,
) -> Result<Vec<Line>, ConfigError> {
    let mut lines: Vec<Line> = Vec::new();
    // Continuations attach to the last entry of this file, which may be the
    // last entry spliced in by a `source` directive.
    let mut has_entry = false;

    for (index, raw) in content.lines().enumerate() {
        let number = index + 1;
        let is_continuation = raw.starts_with(char::is_whitespace);

        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let normalized = normalize(trimmed);
        if normalized.is_empty() {
            tracing::trace!(file = %path.display(), line = number, "Skipping empty line");
            continue;
        }

        if is_continuation {
            let previous = match lines.last_mut() {
                Some(previous) if has_entry => previous,
                _ => {
                    return Err(ConfigError::Format {
                        path: path.to_path_buf(),
                        line: number,
                    });
                }
            };
            previous.content.push(' ');
            previous.content.push_str(&normalized);
            continue;
        }

        has_entry = true;
        if let Some(target) = normalized.strip_prefix(SOURCE_DIRECTIVE) {
            tracing::debug!(
                file = %path.display(),
                line = number,
                source = target,
                "Including configuration file"
            );
            lines.extend(read_file(Path::new(target), stack)?);
        } else {
            lines.push(Line {
                file: path.to_path_buf(),
                number,
                content: normalized,
            });
        }
    }

    Ok(lines)
}

/// Remove the trailing comment and collapse whitespace of a trimmed line.
fn normalize(line: &str) -> String {
    collapse_whitespace(&strip_comment(line))
}

/// Truncate `line` at the first unescaped `#`.
///
/// `\#` produces a literal `#`; the escaping backslash is removed. Other
/// backslashes are left for [`collapse_whitespace`].
pub fn strip_comment(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'#') => {
                out.push('#');
                chars.next();
            }
            '#' => break,
            _ => out.push(c),
        }
    }

    out
}

/// Collapse runs of whitespace into single spaces.
///
/// `\` followed by whitespace keeps that character literally and `\\` yields
/// one backslash; any other backslash is dropped. Leading and trailing
/// whitespace are removed.
pub fn collapse_whitespace(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    let mut pending_space = false;

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek().copied() {
                Some(next) if next == '\\' || next.is_whitespace() => {
                    chars.next();
                    push(&mut out, &mut pending_space, next);
                }
                _ => {}
            }
        } else if c.is_whitespace() {
            pending_space = true;
        } else {
            push(&mut out, &mut pending_space, c);
        }
    }

    out
}

/// Push `c`, emitting a single separating space first if one is pending.
fn push(out: &mut String, pending_space: &mut bool, c: char) {
    if *pending_space && !out.is_empty() {
        out.push(' ');
    }
    *pending_space = false;
    out.push(c);
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use tempfile::{NamedTempFile, TempDir};

    use super::*;

    fn write_conf(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn contents(lines: &[Line]) -> Vec<(usize, &str)> {
        lines
            .iter()
            .map(|l| (l.number, l.content.as_str()))
            .collect()
    }

    #[test]
    fn test_collapse_differing_spacing() {
        assert_eq!(collapse_whitespace("key value1   value2"), "key value1 value2");
        assert_eq!(collapse_whitespace("key  value1 value2"), "key value1 value2");
        assert_eq!(collapse_whitespace("key\tvalue1 \t value2"), "key value1 value2");
    }

    #[test]
    fn test_collapse_is_idempotent() {
        for line in [
            "key value",
            "key   a    b  c",
            "a\t\tb",
            "single",
            "trailing   ",
        ] {
            let once = collapse_whitespace(line);
            assert_eq!(collapse_whitespace(&once), once, "input: {line:?}");
        }
    }

    #[test]
    fn test_collapse_escapes() {
        assert_eq!(collapse_whitespace(r"a\\b"), r"a\b");
        assert_eq!(collapse_whitespace(r"a \ \ b"), "a   b");
        assert_eq!(collapse_whitespace(r"a\b"), "ab");
    }

    #[test]
    fn test_collapse_drops_trailing_whitespace() {
        assert_eq!(collapse_whitespace("key value  "), "key value");
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("key value # comment"), "key value ");
        assert_eq!(strip_comment("key value"), "key value");
        assert_eq!(strip_comment(r"key a \# b"), "key a # b");
        assert_eq!(strip_comment(r"key a \# b # c"), "key a # b ");
    }

    #[test]
    fn test_strip_comment_escaped_hash_at_start() {
        assert_eq!(strip_comment(r"\#key"), "#key");
        assert_eq!(strip_comment("#"), "");
    }

    #[test]
    fn test_escaped_comment_tokens() {
        let file = write_conf("key a \\# b\n");
        let lines = read_lines(file.path()).unwrap();
        assert_eq!(lines[0].tokens(), vec!["key", "a", "#", "b"]);
    }

    #[test]
    fn test_skips_blank_and_comment_lines() {
        let file = write_conf("# header\n\nkey value\n   # indented comment\nother x # trailing\n");
        let lines = read_lines(file.path()).unwrap();
        assert_eq!(contents(&lines), vec![(3, "key value"), (5, "other x")]);
    }

    #[test]
    fn test_continuation_line() {
        let file = write_conf("key value1\n  value2\n\tvalue3\nnext 1\n");
        let lines = read_lines(file.path()).unwrap();
        assert_eq!(
            contents(&lines),
            vec![(1, "key value1 value2 value3"), (4, "next 1")]
        );
        assert_eq!(lines[0].tokens(), vec!["key", "value1", "value2", "value3"]);
    }

    #[test]
    fn test_first_line_indented_fails() {
        let file = write_conf("  key value\n");
        let err = read_lines(file.path()).unwrap_err();
        assert!(
            matches!(err, ConfigError::Format { line: 1, .. }),
            "Expected ConfigError::Format, got {err:?}"
        );
    }

    #[test]
    fn test_first_entry_indented_after_comments_fails() {
        let file = write_conf("# comment\n\n  key value\n");
        let err = read_lines(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Format { line: 3, .. }));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.conf");
        let err = read_lines(&path).unwrap_err();
        assert!(matches!(err, ConfigError::File { .. }));
        assert!(err.to_string().contains("missing.conf"));
    }

    #[test]
    fn test_source_splices_lines() {
        let dir = TempDir::new().unwrap();
        let other = dir.path().join("other.conf");
        fs::write(&other, "b 1\n\nc 2\n").unwrap();
        let main = dir.path().join("main.conf");
        fs::write(
            &main,
            format!("a 0\nsource {}\nd 3\n", other.display()),
        )
        .unwrap();

        let lines = read_lines(&main).unwrap();

        assert_eq!(
            contents(&lines),
            vec![(1, "a 0"), (1, "b 1"), (3, "c 2"), (3, "d 3")]
        );
        assert_eq!(lines[1].file, other);
        assert_eq!(lines[3].file, main);
    }

    #[test]
    fn test_continuation_after_source_extends_sourced_entry() {
        let dir = TempDir::new().unwrap();
        let other = dir.path().join("other.conf");
        fs::write(&other, "b 1\n").unwrap();
        let main = dir.path().join("main.conf");
        fs::write(&main, format!("source {}\n  2\n", other.display())).unwrap();

        let lines = read_lines(&main).unwrap();

        assert_eq!(contents(&lines), vec![(1, "b 1 2")]);
    }

    #[test]
    fn test_source_missing_file() {
        let dir = TempDir::new().unwrap();
        let main = dir.path().join("main.conf");
        fs::write(&main, "source /nonexistent/docgen/other.conf\n").unwrap();

        let err = read_lines(&main).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/docgen/other.conf"));
    }

    #[test]
    fn test_source_cycle_detected() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.conf");
        let b = dir.path().join("b.conf");
        fs::write(&a, format!("x 1\nsource {}\n", b.display())).unwrap();
        fs::write(&b, format!("source {}\n", a.display())).unwrap();

        let err = read_lines(&a).unwrap_err();

        match err {
            ConfigError::SourceCycle { chain } => assert_eq!(chain.len(), 3),
            other => panic!("Expected ConfigError::SourceCycle, got {other:?}"),
        }
    }

    #[test]
    fn test_same_file_sourced_twice_is_not_a_cycle() {
        let dir = TempDir::new().unwrap();
        let common = dir.path().join("common.conf");
        fs::write(&common, "x 1\n").unwrap();
        let main = dir.path().join("main.conf");
        fs::write(
            &main,
            format!("source {0}\nsource {0}\n", common.display()),
        )
        .unwrap();

        let lines = read_lines(&main).unwrap();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_source_prefix_is_case_sensitive() {
        let file = write_conf("Source other.conf\nsources a\n");
        let lines = read_lines(file.path()).unwrap();
        assert_eq!(
            contents(&lines),
            vec![(1, "Source other.conf"), (2, "sources a")]
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let file = write_conf("key value\r\nother x\r\n");
        let lines = read_lines(file.path()).unwrap();
        assert_eq!(contents(&lines), vec![(1, "key value"), (2, "other x")]);
    }
}
