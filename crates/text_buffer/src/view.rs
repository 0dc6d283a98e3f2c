//! Read-only projections of a buffer for display.

use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

use crate::buffer::Buffer;
use crate::error::Result;

/// A window of `height` consecutive lines starting at line `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    start: usize,
    height: usize,
}

impl Viewport {
    pub fn new(height: usize) -> Self {
        Self { start: 0, height }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height;
    }

    /// Rows currently covered, clipped to the buffer.
    pub fn rows(&self, buffer: &Buffer) -> Range<usize> {
        let end = (self.start + self.height).min(buffer.total_lines());
        self.start.min(end)..end
    }

    pub fn scroll_up(&mut self) {
        self.start = self.start.saturating_sub(1);
    }

    pub fn scroll_down(&mut self, buffer: &Buffer) {
        if self.start + self.height < buffer.total_lines() {
            self.start += 1;
        }
    }

    /// Scroll the least amount that brings the cursor row into view.
    pub fn follow_cursor(&mut self, buffer: &Buffer) {
        let (row, _) = buffer.current_position();
        let height = self.height.max(1);
        if row < self.start {
            self.start = row;
        } else if row >= self.start + height {
            self.start = row + 1 - height;
        }
    }

    pub fn lines(&self, buffer: &Buffer) -> Result<Vec<String>> {
        self.rows(buffer).map(|row| buffer.get_line(row)).collect()
    }
}

/// Break `line` into pieces of at most `max_width` grapheme clusters.
///
/// A piece ends at the last space that fits, and that space is dropped;
/// a run with no usable space is cut at exactly `max_width`. A width of `0`
/// disables wrapping.
pub fn wrap_line(line: &str, max_width: usize) -> Vec<String> {
    let graphemes: Vec<&str> = line.graphemes(true).collect();
    if max_width == 0 || graphemes.len() <= max_width {
        return vec![line.to_string()];
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    while graphemes.len() - start > max_width {
        let end = start + max_width;
        // a space right after the full width still allows a clean break
        let space = graphemes[start + 1..=end]
            .iter()
            .rposition(|g| *g == " ")
            .map(|i| start + 1 + i);

        match space {
            Some(space) => {
                pieces.push(graphemes[start..space].concat());
                start = space + 1;
            }
            None => {
                pieces.push(graphemes[start..end].concat());
                start = end;
            }
        }
    }
    pieces.push(graphemes[start..].concat());
    pieces
}

/// Wrapped display lines for `rows` of the buffer, in order.
pub fn wrapped_lines(
    buffer: &Buffer,
    rows: Range<usize>,
    max_width: usize,
) -> Result<Vec<String>> {
    let mut wrapped = Vec::new();
    for row in rows {
        wrapped.extend(wrap_line(&buffer.get_line(row)?, max_width));
    }
    Ok(wrapped)
}
