// Timing engine - WPM calculation and word splitting

use crate::engine::error::ReaderError;

const MS_PER_MINUTE: u64 = 60_000;

/// Milliseconds each word stays on screen at `wpm` words per minute.
///
/// Integer division: 350 WPM gives 171ms, and anything above 60,000 WPM
/// truncates to 0 (words are then revealed back to back).
pub fn wpm_to_milliseconds(wpm: u32) -> Result<u64, ReaderError> {
    if wpm == 0 {
        return Err(ReaderError::InvalidWordsPerMinute(wpm));
    }
    Ok(MS_PER_MINUTE / u64::from(wpm))
}

/// Splits text on any run of whitespace. Leading and trailing whitespace
/// produce no empty words.
pub fn split_words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}
