use crate::engine::error::ReaderError;
use crate::reading::timing::{split_words, wpm_to_milliseconds};

/// Transient state of one pacing run.
///
/// `current_index` only moves forward; the session is finished once it
/// reaches `words.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingSession {
    pub words: Vec<String>,
    pub words_per_minute: u32,
    pub current_index: usize,
    pub paused: bool,
    delay_ms: u64,
}

impl ReadingSession {
    pub fn new(text: &str, words_per_minute: u32) -> Result<Self, ReaderError> {
        let delay_ms = wpm_to_milliseconds(words_per_minute)?;
        Ok(Self {
            words: split_words(text),
            words_per_minute,
            current_index: 0,
            paused: false,
            delay_ms,
        })
    }

    pub fn current_word(&self) -> Option<&str> {
        self.words.get(self.current_index).map(String::as_str)
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn advance(&mut self) {
        if self.current_index < self.words.len() {
            self.current_index += 1;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.current_index >= self.words.len()
    }
}
