use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::error::ReaderError;

pub const DEFAULT_WORDS_PER_MINUTE: u32 = 300;
pub const DEFAULT_NUMBER_OF_WORDS: u32 = 600;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
struct StoredPreferences {
    words_per_minute: Option<u32>,
    number_of_words: Option<u32>,
}

/// User settings changed from the command line, written back on every set.
#[derive(Debug, Clone)]
pub struct Preferences {
    path: PathBuf,
    stored: StoredPreferences,
}

impl Preferences {
    /// Loads preferences from `path`; a missing file means all defaults.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self, ReaderError> {
        let path = path.into();
        let stored = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|e| ReaderError::io(&path, e))?;
            toml::from_str(&contents).map_err(|source| ReaderError::Toml {
                path: path.clone(),
                source,
            })?
        } else {
            StoredPreferences::default()
        };
        Ok(Self { path, stored })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn words_per_minute(&self) -> u32 {
        self.stored
            .words_per_minute
            .unwrap_or(DEFAULT_WORDS_PER_MINUTE)
    }

    pub fn set_words_per_minute(&mut self, value: u32) -> Result<(), ReaderError> {
        if value == 0 {
            return Err(ReaderError::InvalidWordsPerMinute(value));
        }
        self.stored.words_per_minute = Some(value);
        self.save()
    }

    pub fn number_of_words(&self) -> u32 {
        self.stored.number_of_words.unwrap_or(DEFAULT_NUMBER_OF_WORDS)
    }

    pub fn set_number_of_words(&mut self, value: u32) -> Result<(), ReaderError> {
        if value == 0 {
            return Err(ReaderError::InvalidNumberOfWords(value));
        }
        self.stored.number_of_words = Some(value);
        self.save()
    }

    fn save(&self) -> Result<(), ReaderError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ReaderError::io(parent, e))?;
            }
        }
        let contents = toml::to_string(&self.stored)?;
        fs::write(&self.path, contents).map_err(|e| ReaderError::io(&self.path, e))?;
        tracing::debug!(
            wpm = self.words_per_minute(),
            words = self.number_of_words(),
            "preferences saved"
        );
        Ok(())
    }
}
