use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("words per minute must be greater than zero (got {0})")]
    InvalidWordsPerMinute(u32),

    #[error("number of words must be greater than zero (got {0})")]
    InvalidNumberOfWords(u32),

    #[error("history record {0} already exists")]
    DuplicateRecord(u64),

    #[error("I/O error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON in {}: {}", .path.display(), .source)]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid TOML in {}: {}", .path.display(), .source)]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("could not serialize settings: {0}")]
    TomlWrite(#[from] toml::ser::Error),
}

impl ReaderError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ReaderError::Io {
            path: path.into(),
            source,
        }
    }
}
