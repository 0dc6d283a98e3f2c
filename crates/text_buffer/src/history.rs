use crate::cursor::Cursor;
use crate::edit::{Direction, EditCommand};
use crate::error::Result;
use rope::{Rope, RopeError};
use std::collections::VecDeque;

/// One undo step: the commands applied together and the cursor as it was
/// before the first of them ran.
#[derive(Debug, Clone)]
struct Entry {
    commands: Vec<EditCommand>,
    cursor_before: Cursor,
}

/// Undo/redo stacks of applied edits.
///
/// Every mutation of the text goes through the log, so the rope and the
/// stacks cannot disagree. Applying a new edit discards the redo stack.
#[derive(Debug, Clone, Default)]
pub struct EditLog {
    undo: VecDeque<Entry>,
    redo: Vec<Entry>,
    limit: Option<usize>,
}

impl EditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps at most `limit` undo steps, dropping the oldest first.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn apply(
        &mut self,
        command: EditCommand,
        rope: &mut Rope,
        cursor: &mut Cursor,
    ) -> Result<bool> {
        self.apply_all(vec![command], rope, cursor)
    }

    /// Applies `commands` in order as a single undo step. Returns `false` when
    /// there was nothing to do. If any command fails, the ones already applied
    /// are reverted and the log is left as it was.
    pub fn apply_all(
        &mut self,
        commands: Vec<EditCommand>,
        rope: &mut Rope,
        cursor: &mut Cursor,
    ) -> Result<bool> {
        let commands: Vec<_> = commands.into_iter().filter(|c| !c.is_empty()).collect();
        if commands.is_empty() {
            return Ok(false);
        }

        let cursor_before = *cursor;
        let caret = run(&commands, Direction::Forward, rope)?;
        cursor.place_at_offset(rope, caret)?;
        tracing::debug!(commands = commands.len(), caret, "applied edit");

        self.redo.clear();
        self.undo.push_back(Entry {
            commands,
            cursor_before,
        });
        self.trim();
        Ok(true)
    }

    pub fn undo(&mut self, rope: &mut Rope, cursor: &mut Cursor) -> Result<bool> {
        let Some(entry) = self.undo.pop_back() else {
            return Ok(false);
        };
        if let Err(err) = run(&entry.commands, Direction::Backward, rope) {
            self.undo.push_back(entry);
            return Err(err.into());
        }

        *cursor = entry.cursor_before;
        tracing::debug!(commands = entry.commands.len(), "undid edit");
        self.redo.push(entry);
        Ok(true)
    }

    pub fn redo(&mut self, rope: &mut Rope, cursor: &mut Cursor) -> Result<bool> {
        let Some(entry) = self.redo.pop() else {
            return Ok(false);
        };
        let caret = match run(&entry.commands, Direction::Forward, rope) {
            Ok(caret) => caret,
            Err(err) => {
                self.redo.push(entry);
                return Err(err.into());
            }
        };

        cursor.place_at_offset(rope, caret)?;
        tracing::debug!(commands = entry.commands.len(), caret, "redid edit");
        self.undo.push_back(entry);
        self.trim();
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    fn trim(&mut self) {
        if let Some(limit) = self.limit {
            while self.undo.len() > limit {
                self.undo.pop_front();
            }
        }
    }
}

/// Executes `commands` in `direction` (reversed order for `Backward`) and
/// returns the caret of the last one. On failure the executed prefix is
/// reverted before the error is returned.
fn run(
    commands: &[EditCommand],
    direction: Direction,
    rope: &mut Rope,
) -> std::result::Result<usize, RopeError> {
    let (ordered, revert): (Vec<&EditCommand>, Direction) = match direction {
        Direction::Forward => (commands.iter().collect(), Direction::Backward),
        Direction::Backward => (commands.iter().rev().collect(), Direction::Forward),
    };

    let mut caret = 0;
    for (done, command) in ordered.iter().enumerate() {
        match command.execute(direction, rope) {
            Ok(at) => caret = at,
            Err(err) => {
                for applied in ordered[..done].iter().rev() {
                    if let Err(rollback) = applied.execute(revert, rope) {
                        tracing::error!(%rollback, "failed to revert partially applied edit");
                    }
                }
                return Err(err);
            }
        }
    }
    Ok(caret)
}
