//! Error taxonomy for Steam discovery.

use std::fmt;
use std::path::{Path, PathBuf};

use gamefinder_vdf::VdfError;
use serde::Serialize;

/// Machine-checkable kind of a [`GameFinderError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    SteamNotFound,
    VdfParseError,
    VdfInvalidFormat,
    VdfMissingField,
    LibraryReadError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::SteamNotFound => "STEAM_NOT_FOUND",
            ErrorCode::VdfParseError => "VDF_PARSE_ERROR",
            ErrorCode::VdfInvalidFormat => "VDF_INVALID_FORMAT",
            ErrorCode::VdfMissingField => "VDF_MISSING_FIELD",
            ErrorCode::LibraryReadError => "LIBRARY_READ_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors for Steam discovery operations.
#[derive(Debug, thiserror::Error)]
pub enum GameFinderError {
    #[error("steam installation not found (searched: {})", join_paths(.searched))]
    SteamNotFound { searched: Vec<PathBuf> },

    #[error("failed to parse {}: {source}", .path.display())]
    VdfParse {
        path: PathBuf,
        #[source]
        source: VdfError,
    },

    #[error("invalid format in {}: {message}", .path.display())]
    InvalidFormat { path: PathBuf, message: String },

    #[error("missing required field '{key}' in {context}")]
    MissingField { key: String, context: String },

    #[error("no usable library folders in {}: {}", .path.display(), .errors.join("; "))]
    NoLibraryFolders { path: PathBuf, errors: Vec<String> },

    #[error("failed to read library {}: {source}", .path.display())]
    LibraryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("library scan did not complete: {source}")]
    ScanInterrupted {
        #[source]
        source: tokio::task::JoinError,
    },
}

impl GameFinderError {
    /// Returns the taxonomy kind of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            GameFinderError::SteamNotFound { .. } => ErrorCode::SteamNotFound,
            GameFinderError::VdfParse { .. } => ErrorCode::VdfParseError,
            GameFinderError::InvalidFormat { .. } | GameFinderError::NoLibraryFolders { .. } => {
                ErrorCode::VdfInvalidFormat
            }
            GameFinderError::MissingField { .. } => ErrorCode::VdfMissingField,
            GameFinderError::LibraryRead { .. } | GameFinderError::ScanInterrupted { .. } => {
                ErrorCode::LibraryReadError
            }
        }
    }

    /// Attributes a VDF failure to the file it came from.
    pub(crate) fn from_vdf(path: &Path, err: VdfError) -> Self {
        match err {
            VdfError::MissingField { key, context } => GameFinderError::MissingField { key, context },
            other => GameFinderError::VdfParse {
                path: path.to_path_buf(),
                source: other,
            },
        }
    }

    pub(crate) fn invalid_format(path: &Path, message: impl Into<String>) -> Self {
        GameFinderError::InvalidFormat {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "no candidate paths".into();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
