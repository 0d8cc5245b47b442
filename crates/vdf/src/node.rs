//! Generic VDF tree: an insertion-ordered map of keys to scalars or children.

use std::fmt;

use indexmap::IndexMap;

/// A bare numeric token, kept verbatim so it can still be read as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Number(String);

impl Number {
    /// Returns a `Number` if `token` is an optionally signed integer or decimal.
    pub fn parse(token: &str) -> Option<Self> {
        let digits = token.strip_prefix('-').unwrap_or(token);
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (digits, None),
        };

        if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if let Some(frac) = frac_part
            && (frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()))
        {
            return None;
        }

        Some(Self(token.to_string()))
    }

    /// The token exactly as written in the source.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.0.parse().ok()
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.0.parse().ok()
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A value attached to a key.
#[derive(Debug, Clone, PartialEq)]
pub enum VdfValue {
    /// A quoted scalar, or a bare token that is not numeric.
    String(String),
    /// A bare numeric token.
    Number(Number),
    /// A brace-delimited block.
    Object(VdfNode),
}

impl VdfValue {
    /// Returns the textual form of a scalar. Objects have none.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            VdfValue::String(s) => Some(s),
            VdfValue::Number(n) => Some(n.as_str()),
            VdfValue::Object(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<&VdfNode> {
        match self {
            VdfValue::Object(node) => Some(node),
            _ => None,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, VdfValue::Object(_))
    }
}

/// A VDF block. Iteration follows declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VdfNode {
    entries: IndexMap<String, VdfValue>,
}

impl VdfNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value. A repeated key replaces the earlier value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: VdfValue) -> Option<VdfValue> {
        self.entries.insert(key.into(), value)
    }

    /// Looks up `key` exactly, then ASCII case-insensitively.
    pub fn get(&self, key: &str) -> Option<&VdfValue> {
        self.entries.get(key).or_else(|| {
            self.entries
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v)
        })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VdfValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
