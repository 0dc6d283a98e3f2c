use std::convert::Infallible;
use std::str::FromStr;

use rope::{Rope, RopeError};

use crate::config::BufferConfig;
use crate::cursor::Cursor;
use crate::edit::EditCommand;
use crate::error::{Error, Result};
use crate::history::EditLog;
use crate::position::PositionIndex;

/// An editable document: the rope, the cursor in it, and the edit history.
///
/// All offsets are in `char`s. Every mutation is recorded in the edit log,
/// and a failing call leaves text, cursor and history as they were.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    rope: Rope,
    cursor: Cursor,
    log: EditLog,
    config: BufferConfig,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BufferConfig) -> Self {
        Self::from_rope(Rope::new(), config)
    }

    pub(crate) fn from_rope(rope: Rope, config: BufferConfig) -> Self {
        Self {
            rope,
            cursor: Cursor::new(),
            log: EditLog::with_limit(config.history_limit),
            config,
        }
    }

    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    /// Replace the whole document. The cursor returns to the origin and the
    /// history is discarded.
    pub fn load_from_text(&mut self, text: &str) {
        self.rope = Rope::from(text);
        self.cursor = Cursor::new();
        self.log.clear();
        tracing::debug!(len = self.rope.len(), "loaded text into buffer");
    }

    pub fn dump_to_text(&self) -> String {
        self.rope.to_string()
    }

    pub fn get_text(&self) -> String {
        self.dump_to_text()
    }

    pub fn insert_at(&mut self, offset: usize, text: &str) -> Result<()> {
        let len = self.rope.len();
        if offset > len {
            return Err(RopeError::OutOfRange { index: offset, len }.into());
        }
        self.apply(vec![EditCommand::insert(offset, text)])?;
        Ok(())
    }

    /// Delete `count` characters starting at `offset`.
    pub fn delete_range(&mut self, offset: usize, count: usize) -> Result<()> {
        let command = EditCommand::delete(&self.rope, offset, count)?;
        self.apply(vec![command])?;
        Ok(())
    }

    pub fn insert_text(&mut self, text: &str) -> Result<()> {
        let offset = self.cursor.offset(&self.rope)?;
        self.insert_at(offset, text)
    }

    pub fn insert_char(&mut self, c: char) -> Result<()> {
        self.insert_text(c.encode_utf8(&mut [0; 4]))
    }

    pub fn new_line(&mut self) -> Result<()> {
        self.insert_char('\n')
    }

    /// Backspace: remove the `count` characters before the cursor.
    pub fn delete_backward(&mut self, count: usize) -> Result<()> {
        let offset = self.cursor.offset(&self.rope)?;
        if count > offset {
            return Err(Error::DeleteBeforeStart { offset, count });
        }
        self.delete_range(offset - count, count)
    }

    /// Vertical steps first, then horizontal ones. Steps past the edges of
    /// the buffer are ignored.
    pub fn move_cursor(&mut self, row_delta: isize, col_delta: isize) -> Result<()> {
        let rows = row_delta.unsigned_abs().min(self.rope.line_count());
        for _ in 0..rows {
            if row_delta < 0 {
                self.cursor.move_up(&self.rope)?;
            } else {
                self.cursor.move_down(&self.rope)?;
            }
        }

        let cols = col_delta.unsigned_abs().min(self.rope.len());
        for _ in 0..cols {
            if col_delta < 0 {
                self.cursor.move_left(&self.rope)?;
            } else {
                self.cursor.move_right(&self.rope)?;
            }
        }
        Ok(())
    }

    pub fn set_cursor(&mut self, row: usize, col: usize) -> Result<()> {
        self.cursor.set_position(&self.rope, row, col)
    }

    pub fn go_to_line(&mut self, row: usize) -> Result<()> {
        self.set_cursor(row, 0)
    }

    /// Offsets of the non-overlapping occurrences of `needle`, left to right.
    pub fn find(&self, needle: &str) -> Vec<usize> {
        if needle.is_empty() {
            return Vec::new();
        }

        let text = self.rope.to_string();
        let mut offsets = Vec::new();
        let (mut byte, mut chars) = (0, 0);
        for (start, _) in text.match_indices(needle) {
            chars += text[byte..start].chars().count();
            byte = start;
            offsets.push(chars);
        }
        offsets
    }

    /// Replace every occurrence of `needle` and return how many there were.
    /// The whole replacement is a single undo step.
    pub fn replace_all(&mut self, needle: &str, replacement: &str) -> Result<usize> {
        let offsets = self.find(needle);
        if offsets.is_empty() {
            return Ok(0);
        }

        // back to front, so earlier offsets stay valid
        let commands = offsets
            .iter()
            .rev()
            .flat_map(|&offset| {
                [
                    EditCommand::Delete {
                        offset,
                        text: needle.to_string(),
                    },
                    EditCommand::insert(offset, replacement),
                ]
            })
            .collect();
        self.apply(commands)?;
        tracing::debug!(count = offsets.len(), "replaced all occurrences");
        Ok(offsets.len())
    }

    pub fn undo(&mut self) -> Result<bool> {
        let undone = self.log.undo(&mut self.rope, &mut self.cursor)?;
        if undone {
            self.maybe_rebalance();
        }
        Ok(undone)
    }

    pub fn redo(&mut self) -> Result<bool> {
        let redone = self.log.redo(&mut self.rope, &mut self.cursor)?;
        if redone {
            self.maybe_rebalance();
        }
        Ok(redone)
    }

    pub fn get_line(&self, row: usize) -> Result<String> {
        PositionIndex::new(&self.rope).line(row)
    }

    pub fn get_text_at(&self, offset: usize, count: usize) -> Result<String> {
        Ok(self.rope.substring(offset..offset.saturating_add(count))?)
    }

    pub fn line_length(&self, row: usize) -> Result<usize> {
        PositionIndex::new(&self.rope).line_length(row)
    }

    pub fn current_position(&self) -> (usize, usize) {
        self.cursor.position()
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn total_lines(&self) -> usize {
        self.rope.line_count()
    }

    pub fn len(&self) -> usize {
        self.rope.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.log.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.log.can_redo()
    }

    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    pub fn rebalance(&mut self) {
        self.rope.rebalance();
    }

    fn apply(&mut self, commands: Vec<EditCommand>) -> Result<bool> {
        let applied = self
            .log
            .apply_all(commands, &mut self.rope, &mut self.cursor)?;
        if applied {
            self.maybe_rebalance();
        }
        Ok(applied)
    }

    fn maybe_rebalance(&mut self) {
        let Some(max_height) = self.config.max_rope_height else {
            return;
        };
        let height = self.rope.height();
        if height > max_height {
            self.rope.rebalance();
            tracing::debug!(
                height,
                max_height,
                rebalanced = self.rope.height(),
                "rope exceeded height limit"
            );
        }
    }
}

impl From<&str> for Buffer {
    fn from(text: &str) -> Self {
        Self::from_rope(Rope::from(text), BufferConfig::default())
    }
}

impl FromStr for Buffer {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}
