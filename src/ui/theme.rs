//! Styles for each element of the reader screen.
//!
//! The reading pane fades with distance from the emphasized word: the
//! word itself is bold, the rows next to it use the body color, and the
//! rest of the text is faded.

use ratatui::style::{Color, Modifier, Style};

const BACKGROUND: Color = Color::Rgb(26, 27, 38);
const BODY: Color = Color::Rgb(169, 177, 214);
const FADED: Color = Color::Rgb(100, 110, 150);
const EMPHASIS: Color = Color::Rgb(247, 118, 142);
const WARNING: Color = Color::Rgb(224, 175, 104);

pub fn screen() -> Style {
    Style::default().bg(BACKGROUND)
}

/// The word being revealed, in the text and in the headline above it.
pub fn emphasis() -> Style {
    Style::default().fg(EMPHASIS).add_modifier(Modifier::BOLD)
}

/// Rows next to the emphasized word, panel output and typed input.
pub fn body() -> Style {
    Style::default().fg(BODY)
}

pub fn faded() -> Style {
    Style::default().fg(FADED)
}

pub fn mode_badge() -> Style {
    Style::default()
        .fg(BACKGROUND)
        .bg(EMPHASIS)
        .add_modifier(Modifier::BOLD)
}

pub fn prompt_marker() -> Style {
    Style::default().fg(EMPHASIS)
}

pub fn status(is_error: bool) -> Style {
    if is_error {
        Style::default().fg(WARNING)
    } else {
        faded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emphasis_stands_out_from_body() {
        assert_ne!(emphasis().fg, body().fg);
        assert!(emphasis().add_modifier.contains(Modifier::BOLD));
        assert!(!body().add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_error_status_is_not_faded() {
        assert_ne!(status(true), status(false));
        assert_eq!(status(false), faded());
    }
}
