use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Could not read {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Nothing to read in {0}")]
    Empty(String),
}

/// Text ready to be paced, with a short label for where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    pub text: String,
    pub source: String,
}

impl LoadedDocument {
    fn new(text: String, source: String) -> Result<Self, LoadError> {
        if text.trim().is_empty() {
            return Err(LoadError::Empty(source));
        }
        Ok(Self { text, source })
    }
}

pub mod clipboard;
pub mod text;
