//! Parser for Valve's text key/value format (VDF, and the ACF manifests that
//! use it).
//!
//! The crate has two layers:
//!
//! - **Tree**: [`parse`] turns text into a [`VdfNode`], an ordered map whose
//!   values are strings, bare numbers, or child nodes. There are no arrays;
//!   lists are blocks keyed `"0"`, `"1"`, ...
//! - **Accessors**: typed reads on [`VdfNode`] (`get_string`,
//!   `get_big_int`, `get_timestamp`, ...) that absorb the format's
//!   string-or-number ambiguity and its "0 means absent" convention.
//!
//! Nothing here knows about Steam.

pub mod accessors;
pub mod error;
pub mod node;
pub mod parser;

pub use accessors::{is_decimal_index, parse_timestamp};
pub use error::VdfError;
pub use node::{Number, VdfNode, VdfValue};
pub use parser::{parse, parse_file};
