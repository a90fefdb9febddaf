//! Mapping of configuration keys to field names.
//!
//! Keys are written in lower case with `-` or `_` separators; fields use
//! `PascalCase` with common initialisms in capitals:
//!
//! | Key | Field |
//! |---|---|
//! | `main-title` | `MainTitle` |
//! | `api-url` | `APIURL` |
//! | `html_id` | `HTMLID` |

/// Initialisms written in capitals in field names.
///
/// Replaced in this order, so `Https` wins over `Http`.
pub const ACRONYMS: &[&str] = &[
    "Api", "Ascii", "Cpu", "Css", "Dns", "Eof", "Guid", "Html", "Https", "Http", "Id", "Ip", "Json",
    "Lhs", "Qps", "Ram", "Rhs", "Rpc", "Sla", "Smtp", "Sql", "Ssh", "Tcp", "Tls", "Ttl", "Udp",
    "Ui", "Uid", "Uuid", "Uri", "Url", "Utf8", "Vm", "Xml", "Xsrf", "Xss",
];

/// Field name for a configuration key.
pub fn field_name(key: &str) -> String {
    ACRONYMS
        .iter()
        .fold(camelize(key), |name, acronym| {
            name.replace(acronym, &acronym.to_uppercase())
        })
}

/// Upper-case the first letter of every `-`/`_` separated word and join them.
fn camelize(key: &str) -> String {
    key.split(['-', '_'])
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// Add a trailing `s`, or remove it if there is one.
pub fn toggle_plural(name: &str) -> String {
    match name.strip_suffix('s') {
        Some(singular) => singular.to_owned(),
        None => format!("{name}s"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_name_camelizes() {
        assert_eq!(field_name("outdir"), "Outdir");
        assert_eq!(field_name("main-title"), "MainTitle");
        assert_eq!(field_name("skip_clone"), "SkipClone");
        assert_eq!(field_name("relativeTo"), "RelativeTo");
    }

    #[test]
    fn test_field_name_uppercases_acronyms() {
        assert_eq!(field_name("api-url"), "APIURL");
        assert_eq!(field_name("html-id"), "HTMLID");
        assert_eq!(field_name("https-port"), "HTTPSPort");
        assert_eq!(field_name("ssh-key"), "SSHKey");
    }

    #[test]
    fn test_field_name_ignores_empty_words() {
        assert_eq!(field_name("home--text"), "HomeText");
        assert_eq!(field_name("-tag"), "Tag");
    }

    #[test]
    fn test_toggle_plural() {
        assert_eq!(toggle_plural("Group"), "Groups");
        assert_eq!(toggle_plural("Groups"), "Group");
        assert_eq!(toggle_plural(""), "s");
    }
}
