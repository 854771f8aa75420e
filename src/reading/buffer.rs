use std::ops::Range;

/// Display text for one reveal step, with the current word marked for emphasis.
///
/// The text is `margin_lines` newlines, every word followed by one space,
/// then `margin_lines` newlines again. The padding lets the reader view
/// scroll the first and last words to the centre of the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayBuffer {
    pub text: String,
    /// Byte range of the emphasized word within `text`
    pub emphasis: Range<usize>,
}

impl DisplayBuffer {
    /// Rebuilds the full buffer with `words[index]` emphasized.
    ///
    /// An out-of-range index yields an empty emphasis span at the end of the
    /// words block.
    pub fn build(words: &[String], index: usize, margin_lines: usize) -> Self {
        let words_len: usize = words.iter().map(|w| w.len() + 1).sum();
        let mut text = String::with_capacity(words_len + 2 * margin_lines);
        push_margin(&mut text, margin_lines);

        let mut emphasis = None;
        for (i, word) in words.iter().enumerate() {
            if i == index {
                emphasis = Some(text.len()..text.len() + word.len());
            }
            text.push_str(word);
            text.push(' ');
        }
        let emphasis = emphasis.unwrap_or(text.len()..text.len());

        push_margin(&mut text, margin_lines);

        Self { text, emphasis }
    }

    /// Start of the emphasized word, used by consumers to compute scroll position.
    pub fn emphasis_offset(&self) -> usize {
        self.emphasis.start
    }

    pub fn emphasized(&self) -> &str {
        &self.text[self.emphasis.clone()]
    }
}

fn push_margin(text: &mut String, margin_lines: usize) {
    text.extend(std::iter::repeat('\n').take(margin_lines));
}
