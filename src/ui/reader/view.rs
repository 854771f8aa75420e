use std::ops::Range;

use crate::reading::DisplayBuffer;
use crate::ui::theme;
use ratatui::{
    layout::Alignment,
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// A display buffer wrapped to a fixed width. Each row holds byte ranges of
/// the words placed on it; rows are rendered with single spaces between words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedText {
    pub rows: Vec<Vec<Range<usize>>>,
    /// Row holding the start of the emphasized word
    pub emphasis_row: usize,
}

/// Greedy word wrap of `buffer` at `width` columns. Words wider than the
/// row are split on grapheme boundaries.
pub fn wrap_buffer(buffer: &DisplayBuffer, width: usize) -> WrappedText {
    let width = width.max(1);
    let text = buffer.text.as_str();
    let mut rows: Vec<Vec<Range<usize>>> = Vec::new();
    let mut emphasis_row = 0;

    let mut line_start = 0;
    for line in text.split('\n') {
        let mut row: Vec<Range<usize>> = Vec::new();
        let mut row_width = 0;

        for (word_offset, word) in word_indices(line) {
            let start = line_start + word_offset;
            for piece in split_to_width(word, start, width) {
                let piece_width = text[piece.clone()].width();
                let needed = if row.is_empty() { piece_width } else { row_width + 1 + piece_width };
                if !row.is_empty() && needed > width {
                    rows.push(std::mem::take(&mut row));
                    row_width = 0;
                }
                if piece.start == buffer.emphasis.start {
                    emphasis_row = rows.len();
                }
                row_width = if row.is_empty() { piece_width } else { row_width + 1 + piece_width };
                row.push(piece);
            }
        }

        rows.push(row);
        line_start += line.len() + 1;
    }

    WrappedText { rows, emphasis_row }
}

fn word_indices(line: &str) -> impl Iterator<Item = (usize, &str)> {
    line.split(' ').scan(0, |offset, word| {
        let start = *offset;
        *offset += word.len() + 1;
        Some((start, word))
    })
    .filter(|(_, word)| !word.is_empty())
}

/// Splits `word` (found at byte `start`) into pieces no wider than `width`.
fn split_to_width(word: &str, start: usize, width: usize) -> Vec<Range<usize>> {
    if word.width() <= width {
        return vec![start..start + word.len()];
    }

    let mut pieces = Vec::new();
    let mut piece_start = 0;
    let mut piece_width = 0;
    for (offset, grapheme) in word.grapheme_indices(true) {
        let w = grapheme.width();
        if piece_width + w > width && offset > piece_start {
            pieces.push(start + piece_start..start + offset);
            piece_start = offset;
            piece_width = 0;
        }
        piece_width += w;
    }
    pieces.push(start + piece_start..start + word.len());
    pieces
}

/// First row to show so the emphasized row sits in the middle of `height` rows.
pub fn scroll_for(wrapped: &WrappedText, height: usize) -> usize {
    wrapped.emphasis_row.saturating_sub(height / 2)
}

pub fn render_buffer(buffer: &DisplayBuffer, width: u16, height: u16) -> Paragraph<'static> {
    let wrapped = wrap_buffer(buffer, usize::from(width));
    let scroll = scroll_for(&wrapped, usize::from(height));

    let normal = theme::faded();
    let near = theme::body();
    let emphasized = theme::emphasis();

    let lines: Vec<Line<'static>> = wrapped
        .rows
        .iter()
        .enumerate()
        .skip(scroll)
        .take(usize::from(height))
        .map(|(row_index, row)| {
            let row_style = if row_index.abs_diff(wrapped.emphasis_row) <= 1 {
                near
            } else {
                normal
            };
            let mut spans = Vec::with_capacity(row.len() * 2);
            for (i, piece) in row.iter().enumerate() {
                if i > 0 {
                    spans.push(Span::styled(" ", row_style));
                }
                let style = if overlaps(piece, &buffer.emphasis) {
                    emphasized
                } else {
                    row_style
                };
                spans.push(Span::styled(buffer.text[piece.clone()].to_string(), style));
            }
            Line::from(spans)
        })
        .collect();

    Paragraph::new(lines)
        .alignment(Alignment::Left)
        .style(theme::screen())
}

fn overlaps(piece: &Range<usize>, emphasis: &Range<usize>) -> bool {
    piece.start < emphasis.end && emphasis.start < piece.end
}

pub fn render_word_display(word: &str) -> Paragraph<'static> {
    Paragraph::new(Line::from(Span::styled(word.to_string(), theme::emphasis())))
        .alignment(Alignment::Center)
        .style(theme::screen())
}

pub fn render_progress_bar(progress: (usize, usize)) -> Line<'static> {
    let (current, total) = progress;
    let width = if total == 0 {
        0.0
    } else {
        (current as f64 / total as f64) * 100.0
    };

    let filled_len = ((width / 100.0 * 20.0) as usize).min(20);
    let empty_len = 20 - filled_len;

    let mut spans = Vec::new();
    for _ in 0..filled_len {
        spans.push(Span::styled("─", theme::body()));
    }
    for _ in 0..empty_len {
        spans.push(Span::styled("─", theme::faded()));
    }
    spans.push(Span::styled(
        format!(" {current}/{total}"),
        theme::faded(),
    ));

    Line::from(spans).alignment(Alignment::Center)
}
