use crate::app::mode::AppMode;
use crate::reading::Emission;

/// One-line feedback shown under the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

impl Status {
    pub fn text(&self) -> &str {
        match self {
            Status::Info(text) | Status::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Status::Error(_))
    }
}

/// Render state for UI components
#[derive(Debug, Clone)]
pub struct RenderState {
    pub mode: AppMode,
    pub emission: Option<Emission>,
    pub progress: (usize, usize),
    pub words_per_minute: u32,
    pub number_of_words: u32,
    pub status: Option<Status>,
    /// Multi-line output of the last command (help, history listing)
    pub panel: Vec<String>,
}

impl RenderState {
    /// Create an empty render state for when nothing is being read
    #[cfg(test)]
    pub(crate) fn empty(mode: AppMode) -> Self {
        Self {
            mode,
            emission: None,
            progress: (0, 0),
            words_per_minute: 0,
            number_of_words: 0,
            status: None,
            panel: Vec::new(),
        }
    }

    pub fn current_word(&self) -> Option<&str> {
        self.emission.as_ref().map(|e| e.word.as_str())
    }

    /// Words revealed so far and total, counting the word on screen
    pub fn progress_from(emission: Option<&Emission>) -> (usize, usize) {
        emission.map_or((0, 0), |e| (e.index + 1, e.total))
    }
}
