//! `key: value` directives embedded in free-text model annotations.
//!
//! ```text
//! EffectiveRole (table: effective_roles) represents an effective role.
//!
//! order by: "user_id, role_id"
//! ```
//!
//! Keys are runs of letters, digits, `_`, `-` and spaces. A value is either a
//! bare run of letters, digits, `_` and spaces, or a double quoted string in
//! which `""` stands for a literal quote. Text that does not match is ignored.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static DIRECTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z0-9_\- ]+):\s*([A-Za-z0-9_][A-Za-z0-9_ ]*|"(?:[^"]|"")*")"#)
        .expect("directive pattern is valid")
});

/// Parsed directives; later occurrences of a key replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives(BTreeMap<String, String>);

impl Directives {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// The value of the first key in `keys` that is present and non-empty.
    pub fn first_of(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .filter_map(|k| self.get(k))
            .find(|v| !v.is_empty())
    }

    /// A boolean directive. Unparseable values yield `None`.
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(parse_bool)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn into_map(self) -> BTreeMap<String, String> {
        self.0
    }
}

/// Find every `key: value` directive in `text`.
pub fn parse_directives(text: &str) -> Directives {
    let mut out = BTreeMap::new();
    for caps in DIRECTIVE_RE.captures_iter(text) {
        let key = caps[1].trim();
        if key.is_empty() {
            continue;
        }
        out.insert(key.to_string(), unquote(&caps[2]));
    }
    Directives(out)
}

fn unquote(value: &str) -> String {
    match value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
    {
        Some(inner) => inner.replace("\"\"", "\""),
        None => value.trim_end().to_string(),
    }
}

/// Boolean literals as accepted by the generator: `1 t T TRUE true True` and
/// `0 f F FALSE false False`.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
