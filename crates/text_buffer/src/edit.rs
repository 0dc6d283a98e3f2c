use rope::{Rope, RopeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// A single reversible change to the text.
///
/// Both variants carry the affected text, so a command can be replayed in
/// either direction without consulting the rope it came from. `Delete`
/// captures its payload when it is built, before anything is removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    Insert { offset: usize, text: String },
    Delete { offset: usize, text: String },
}

impl EditCommand {
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        EditCommand::Insert {
            offset,
            text: text.into(),
        }
    }

    /// Records the `count` characters at `offset` that a later `execute` will
    /// remove.
    pub fn delete(rope: &Rope, offset: usize, count: usize) -> Result<Self, RopeError> {
        let text = rope.substring(offset..offset.saturating_add(count))?;
        Ok(EditCommand::Delete { offset, text })
    }

    pub fn offset(&self) -> usize {
        match self {
            EditCommand::Insert { offset, .. } | EditCommand::Delete { offset, .. } => *offset,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            EditCommand::Insert { text, .. } | EditCommand::Delete { text, .. } => text,
        }
    }

    /// Characters in the payload.
    pub fn char_len(&self) -> usize {
        self.text().chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text().is_empty()
    }

    pub fn inverse(&self) -> Self {
        match self {
            EditCommand::Insert { offset, text } => EditCommand::Delete {
                offset: *offset,
                text: text.clone(),
            },
            EditCommand::Delete { offset, text } => EditCommand::Insert {
                offset: *offset,
                text: text.clone(),
            },
        }
    }

    /// Applies the command (or its inverse, for `Backward`) and returns the
    /// caret offset it leaves behind: the end of inserted text, or the start
    /// of removed text.
    pub fn execute(&self, direction: Direction, rope: &mut Rope) -> Result<usize, RopeError> {
        match (self, direction) {
            (EditCommand::Insert { offset, text }, Direction::Forward)
            | (EditCommand::Delete { offset, text }, Direction::Backward) => {
                rope.insert(*offset, text)?;
                Ok(offset + text.chars().count())
            }
            (EditCommand::Delete { offset, text }, Direction::Forward)
            | (EditCommand::Insert { offset, text }, Direction::Backward) => {
                rope.remove(*offset..offset + text.chars().count())?;
                Ok(*offset)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_both_ways() {
        let mut rope = Rope::from("hello world");
        let command = EditCommand::insert(5, ", big");

        assert_eq!(command.execute(Direction::Forward, &mut rope).unwrap(), 10);
        assert_eq!(rope.to_string(), "hello, big world");

        assert_eq!(command.execute(Direction::Backward, &mut rope).unwrap(), 5);
        assert_eq!(rope.to_string(), "hello world");
    }

    #[test]
    fn delete_captures_payload() {
        let mut rope = Rope::from("héllo wörld");
        let command = EditCommand::delete(&rope, 1, 4).unwrap();
        assert_eq!(command.text(), "éllo");

        assert_eq!(command.execute(Direction::Forward, &mut rope).unwrap(), 1);
        assert_eq!(rope.to_string(), "h wörld");

        assert_eq!(command.execute(Direction::Backward, &mut rope).unwrap(), 5);
        assert_eq!(rope.to_string(), "héllo wörld");
    }

    #[test]
    fn delete_past_end_is_rejected() {
        let rope = Rope::from("abc");
        assert!(matches!(
            EditCommand::delete(&rope, 2, 5),
            Err(RopeError::InvalidRange { .. })
        ));
    }

    #[test]
    fn inverse_swaps_variants() {
        let command = EditCommand::insert(3, "xyz");
        let inverse = command.inverse();
        assert_eq!(
            inverse,
            EditCommand::Delete {
                offset: 3,
                text: "xyz".to_string()
            }
        );
        assert_eq!(inverse.inverse(), command);
        assert_eq!(inverse.char_len(), 3);
    }

    #[test]
    fn failed_execute_leaves_rope_alone() {
        let mut rope = Rope::from("abc");
        let command = EditCommand::insert(10, "x");
        assert!(command.execute(Direction::Forward, &mut rope).is_err());
        assert_eq!(rope.to_string(), "abc");
    }
}
