//! Typed reads over a parsed [`VdfNode`].
//!
//! Valve writes most numbers as quoted strings and omits fields freely, so
//! every accessor accepts both scalar forms and treats absence uniformly:
//! optional reads return `None`, required reads fail with
//! [`VdfError::MissingField`], and [`VdfNode::get_big_int`] falls back to 0.

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::VdfError;
use crate::node::{VdfNode, VdfValue};

impl VdfNode {
    /// Returns a scalar's text, whether it was quoted or a bare number.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_str())
    }

    /// Like [`get_string`](Self::get_string), but absence is an error naming
    /// `key` and `context`.
    pub fn get_required_string(&self, key: &str, context: &str) -> Result<&str, VdfError> {
        self.get_string(key)
            .ok_or_else(|| VdfError::missing(key, context))
    }

    /// Parses a scalar into `T`. Unparsable or absent values yield `None`.
    pub fn get_number<T: FromStr>(&self, key: &str) -> Option<T> {
        self.get_string(key).and_then(|s| s.trim().parse().ok())
    }

    /// Reads an unsigned 64-bit value, treating anything unreadable as 0.
    pub fn get_big_int(&self, key: &str) -> u64 {
        self.get_number(key).unwrap_or(0)
    }

    pub fn get_object(&self, key: &str) -> Option<&VdfNode> {
        self.get(key).and_then(|v| v.as_object())
    }

    pub fn get_required_object(&self, key: &str, context: &str) -> Result<&VdfNode, VdfError> {
        self.get_object(key)
            .ok_or_else(|| VdfError::missing(key, context))
    }

    /// Reads a Unix timestamp in seconds. 0 means "never" and yields `None`.
    pub fn get_timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        self.get_number::<i64>(key).and_then(parse_timestamp)
    }

    /// Iterates the children whose key is a decimal index, in file order.
    pub fn numeric_children(&self) -> impl Iterator<Item = (&str, &VdfValue)> {
        self.iter().filter(|(key, _)| is_decimal_index(key))
    }
}

/// Converts Unix seconds to a UTC timestamp; 0 and out-of-range values are absent.
pub fn parse_timestamp(seconds: i64) -> Option<DateTime<Utc>> {
    if seconds == 0 {
        return None;
    }
    DateTime::from_timestamp(seconds, 0)
}

/// Returns `true` for keys made only of ASCII digits, the way VDF encodes
/// list indices (`"0"`, `"1"`, ...).
pub fn is_decimal_index(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}
