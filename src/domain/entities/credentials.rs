//! Credential entities
//!
//! `CredentialSet` is the ordered name → value mapping persisted in the
//! credential store. `CredentialSpec` says how a missing name gets its value.

use serde::Serialize;

/// How the value of a missing credential is produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Fresh secret from the CSPRNG
    Generated,
    /// Fixed default (e.g. a database user name)
    Fixed(String),
}

/// A credential the active profile requires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialSpec {
    pub name: String,
    pub source: CredentialSource,
}

impl CredentialSpec {
    pub fn generated(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: CredentialSource::Generated,
        }
    }

    pub fn fixed(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: CredentialSource::Fixed(value.into()),
        }
    }
}

/// Malformed credential store line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based line number
    pub line: usize,
    pub message: String,
}

/// Ordered credential mapping, insertion order preserved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialSet {
    entries: Vec<(String, String)>,
}

impl CredentialSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Append a new entry. Existing names are never overwritten; returns
    /// `false` when `name` was already present.
    pub fn insert_if_absent(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.entries.push((name, value.into()));
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Subset containing only `names`, in the order given
    pub fn select<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> CredentialSet {
        let mut out = CredentialSet::new();
        for name in names {
            if let Some(value) = self.get(name) {
                out.insert_if_absent(name, value);
            }
        }
        out
    }

    /// Parse `KEY=value` lines. Blank lines and `#` comments are skipped;
    /// values are taken verbatim.
    pub fn parse(content: &str) -> Result<Self, ParseError> {
        let mut set = CredentialSet::new();
        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim_end_matches('\r');
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(ParseError {
                    line: line_no,
                    message: "expected KEY=value".to_string(),
                });
            };
            let key = key.trim();
            if !is_valid_name(key) {
                return Err(ParseError {
                    line: line_no,
                    message: format!("invalid variable name '{}'", key),
                });
            }
            if !set.insert_if_absent(key, value) {
                return Err(ParseError {
                    line: line_no,
                    message: format!("duplicate variable '{}'", key),
                });
            }
        }
        Ok(set)
    }

    /// Serialize as `KEY=value` lines with a trailing newline
    pub fn to_dotenv(&self) -> String {
        let mut out = String::new();
        for (k, v) in &self.entries {
            out.push_str(k);
            out.push('=');
            out.push_str(v);
            out.push('\n');
        }
        out
    }
}

impl Serialize for CredentialSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
