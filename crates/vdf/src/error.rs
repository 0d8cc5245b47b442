//! Error types for VDF parsing and typed field access.

/// Errors produced while reading, parsing, or querying a VDF document.
#[derive(Debug, thiserror::Error)]
pub enum VdfError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("missing required field '{key}' in {context}")]
    MissingField { key: String, context: String },
}

impl VdfError {
    pub(crate) fn syntax(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            column,
            message: message.into(),
        }
    }

    pub(crate) fn missing(key: &str, context: &str) -> Self {
        Self::MissingField {
            key: key.to_string(),
            context: context.to_string(),
        }
    }
}
