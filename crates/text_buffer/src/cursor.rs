use crate::error::Result;
use crate::position::PositionIndex;
use rope::Rope;
use std::cmp;

/// Caret position plus the column vertical movement tries to return to.
///
/// A cursor holds no derived data; every operation takes the rope it is
/// positioned in, so it can never act on line lengths from an older tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    row: usize,
    col: usize,
    preferred_col: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn preferred_col(&self) -> usize {
        self.preferred_col
    }

    pub fn position(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn move_up(&mut self, rope: &Rope) -> Result<()> {
        if self.row > 0 {
            let row = self.row - 1;
            self.col = self.preferred_col_on(rope, row)?;
            self.row = row;
        }
        Ok(())
    }

    pub fn move_down(&mut self, rope: &Rope) -> Result<()> {
        if self.row + 1 < rope.line_count() {
            let row = self.row + 1;
            self.col = self.preferred_col_on(rope, row)?;
            self.row = row;
        }
        Ok(())
    }

    pub fn move_left(&mut self, rope: &Rope) -> Result<()> {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            let row = self.row - 1;
            self.col = PositionIndex::new(rope).line_length(row)?;
            self.row = row;
        }
        self.preferred_col = self.col;
        Ok(())
    }

    pub fn move_right(&mut self, rope: &Rope) -> Result<()> {
        let index = PositionIndex::new(rope);
        if self.col < index.line_length(self.row)? {
            self.col += 1;
        } else if self.row + 1 < index.line_count() {
            self.row += 1;
            self.col = 0;
        }
        self.preferred_col = self.col;
        Ok(())
    }

    /// Jump to `(row, col)`; out-of-range coordinates are rejected, never
    /// clamped.
    pub fn set_position(&mut self, rope: &Rope, row: usize, col: usize) -> Result<()> {
        PositionIndex::new(rope).to_offset(row, col)?;
        self.row = row;
        self.col = col;
        self.preferred_col = col;
        Ok(())
    }

    pub fn offset(&self, rope: &Rope) -> Result<usize> {
        PositionIndex::new(rope).to_offset(self.row, self.col)
    }

    pub(crate) fn place_at_offset(&mut self, rope: &Rope, offset: usize) -> Result<()> {
        let (row, col) = PositionIndex::new(rope).to_row_col(offset)?;
        self.row = row;
        self.col = col;
        self.preferred_col = col;
        Ok(())
    }

    fn preferred_col_on(&self, rope: &Rope, row: usize) -> Result<usize> {
        let len = PositionIndex::new(rope).line_length(row)?;
        Ok(cmp::min(self.preferred_col, len))
    }
}
