#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Command,
    Generating,
    Reading,
    Paused,
    Quit,
}

impl AppMode {
    /// True while a pacer session is on screen.
    pub fn is_reading(self) -> bool {
        matches!(self, AppMode::Reading | AppMode::Paused)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_modes() {
        assert!(AppMode::Reading.is_reading());
        assert!(AppMode::Paused.is_reading());
        assert!(!AppMode::Command.is_reading());
        assert!(!AppMode::Generating.is_reading());
        assert!(!AppMode::Quit.is_reading());
    }
}
