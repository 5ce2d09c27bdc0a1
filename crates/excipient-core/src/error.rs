#![deny(unsafe_code)]

use std::path::PathBuf;

/// Errors raised while loading or compiling a vocabulary.
#[derive(Debug, thiserror::Error)]
pub enum VocabularyError {
    #[error("failed to read vocabulary {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse vocabulary {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid pattern in {field}: {pattern}: {source}")]
    InvalidPattern {
        field: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("vocabulary field {field} must not be empty")]
    EmptyField { field: &'static str },
}

impl VocabularyError {
    pub(crate) fn pattern(field: &'static str, pattern: &str, source: regex::Error) -> Self {
        Self::InvalidPattern {
            field,
            pattern: pattern.to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, VocabularyError>;
