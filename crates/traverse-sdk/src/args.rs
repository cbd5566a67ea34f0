//! Argument literals and the `k1=v1,k2=v2` mini-syntax used to build Task
//! instances from the command line, plus the `repr`-style formatting used
//! for task identity strings.

use std::fmt;

/// A single argument value. Restricted to the kinds the mini-syntax and the
/// `ARGUMENTS` schema can express: integer, float, boolean, string, or null.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgLiteral {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for ArgLiteral {
    /// Language-independent `repr`: strings double-quoted with standard
    /// escapes, numerics bare, booleans as `True`/`False`, null as `None`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgLiteral::Null => write!(f, "None"),
            ArgLiteral::Bool(true) => write!(f, "True"),
            ArgLiteral::Bool(false) => write!(f, "False"),
            ArgLiteral::Int(v) => write!(f, "{v}"),
            ArgLiteral::Float(v) => write!(f, "{v}"),
            ArgLiteral::Str(s) => {
                write!(f, "\"")?;
                for ch in s.chars() {
                    match ch {
                        '"' => write!(f, "\\\"")?,
                        '\\' => write!(f, "\\\\")?,
                        '\n' => write!(f, "\\n")?,
                        '\t' => write!(f, "\\t")?,
                        '\r' => write!(f, "\\r")?,
                        other => write!(f, "{other}")?,
                    }
                }
                write!(f, "\"")
            }
        }
    }
}

/// An ordered `name -> value` mapping. Preserves insertion order (needed for
/// `str(task)` stringification) while also supporting a sorted view (needed
/// for the identity/deduplication key).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgMap(Vec<(String, ArgLiteral)>);

impl ArgMap {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert or overwrite a value, preserving the position of the first
    /// insertion of `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: ArgLiteral) {
        let key = key.into();
        if let Some(slot) = self.0.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.0.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&ArgLiteral> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgLiteral)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys and values sorted by key, used to build the deduplication key.
    pub fn sorted_pairs(&self) -> Vec<(&str, &ArgLiteral)> {
        let mut pairs: Vec<(&str, &ArgLiteral)> = self.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        pairs
    }

    /// Restrict to only the keys present in `allowed`. Used when building a
    /// parent Task's args from a child's: only keys the parent's `ARGUMENTS`
    /// schema declares are forwarded.
    pub fn restrict_to(&self, allowed: &[String]) -> ArgMap {
        let mut out = ArgMap::new();
        for (k, v) in self.iter() {
            if allowed.iter().any(|a| a == k) {
                out.insert(k, v.clone());
            }
        }
        out
    }

    /// Render as `ClassName(k1=repr(v1),k2=repr(v2),...)`, keys in insertion
    /// order — the task identity string.
    pub fn render(&self, class_name: &str) -> String {
        let mut s = String::new();
        s.push_str(class_name);
        s.push('(');
        for (i, (k, v)) in self.0.iter().enumerate() {
            if i > 0 {
                s.push(',');
            }
            s.push_str(k);
            s.push('=');
            s.push_str(&v.to_string());
        }
        s.push(')');
        s
    }
}

impl<'a> IntoIterator for &'a ArgMap {
    type Item = (&'a str, &'a ArgLiteral);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a ArgLiteral)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ArgParseError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Parse `k1=v1,k2=v2,...` into an [`ArgMap`]. Each `vi` is a literal
/// expression restricted to integer, float, boolean, null, or a
/// double-quoted string. Malformed pairs return [`ArgParseError`].
pub fn args_from_str(s: &str) -> Result<ArgMap, ArgParseError> {
    let mut map = ArgMap::new();
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(map);
    }
    for pair in trimmed.split(',') {
        let mut parts = pair.splitn(2, '=');
        let (key, value) = match (parts.next(), parts.next()) {
            (Some(k), Some(v)) => (k.trim(), v.trim()),
            _ => return Err(ArgParseError::InvalidArgument(pair.to_string())),
        };
        if key.is_empty() {
            return Err(ArgParseError::InvalidArgument(pair.to_string()));
        }
        let literal = parse_literal(value)
            .ok_or_else(|| ArgParseError::InvalidArgument(pair.to_string()))?;
        map.insert(key, literal);
    }
    Ok(map)
}

fn parse_literal(value: &str) -> Option<ArgLiteral> {
    if value == "null" || value == "None" {
        return Some(ArgLiteral::Null);
    }
    if value == "true" || value == "True" {
        return Some(ArgLiteral::Bool(true));
    }
    if value == "false" || value == "False" {
        return Some(ArgLiteral::Bool(false));
    }
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        let inner = &value[1..value.len() - 1];
        return Some(ArgLiteral::Str(unescape(inner)));
    }
    if let Ok(i) = value.parse::<i64>() {
        return Some(ArgLiteral::Int(i));
    }
    if let Ok(f) = value.parse::<f64>() {
        return Some(ArgLiteral::Float(f));
    }
    None
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}
