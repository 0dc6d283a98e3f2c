use crate::error::{Error, Result};
use rope::Rope;

/// Row/column translation over a borrowed rope.
///
/// Every query descends the rope using the per-branch character and newline
/// weights, so the cost is proportional to the tree depth. Nothing is cached:
/// the borrow guarantees the rope cannot change while an index is alive.
#[derive(Debug, Clone, Copy)]
pub struct PositionIndex<'a> {
    rope: &'a Rope,
}

impl<'a> PositionIndex<'a> {
    pub fn new(rope: &'a Rope) -> Self {
        Self { rope }
    }

    pub fn line_count(&self) -> usize {
        self.rope.line_count()
    }

    pub fn offset_of_line_start(&self, row: usize) -> Result<usize> {
        self.check_row(row)?;
        Ok(self.rope.line_start(row)?)
    }

    /// Length of line `row`, excluding its `'\n'`.
    pub fn line_length(&self, row: usize) -> Result<usize> {
        let start = self.offset_of_line_start(row)?;
        let end = if row + 1 < self.line_count() {
            self.rope.line_start(row + 1)? - 1
        } else {
            self.rope.len()
        };
        Ok(end - start)
    }

    pub fn to_offset(&self, row: usize, col: usize) -> Result<usize> {
        let len = self.line_length(row)?;
        if col > len {
            return Err(Error::ColumnOutOfRange { row, col, len });
        }
        Ok(self.rope.line_start(row)? + col)
    }

    pub fn to_row_col(&self, offset: usize) -> Result<(usize, usize)> {
        let row = self.rope.newlines_before(offset)?;
        let col = offset - self.rope.line_start(row)?;
        Ok((row, col))
    }

    /// Text of line `row` without its terminator.
    pub fn line(&self, row: usize) -> Result<String> {
        let start = self.offset_of_line_start(row)?;
        let len = self.line_length(row)?;
        Ok(self.rope.substring(start..start + len)?)
    }

    fn check_row(&self, row: usize) -> Result<()> {
        let lines = self.line_count();
        if row >= lines {
            return Err(Error::RowOutOfRange { row, lines });
        }
        Ok(())
    }
}
