use rope::RopeError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Rope(#[from] RopeError),

    #[error("row {row} is out of range for a buffer of {lines} lines")]
    RowOutOfRange { row: usize, lines: usize },

    #[error("column {col} is out of range for row {row} of length {len}")]
    ColumnOutOfRange { row: usize, col: usize, len: usize },

    #[error("cannot delete {count} characters before offset {offset}")]
    DeleteBeforeStart { offset: usize, count: usize },

    #[error("failed to read `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write `{}`", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// An offset, row or column outside the buffer.
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            Error::RowOutOfRange { .. }
                | Error::ColumnOutOfRange { .. }
                | Error::Rope(RopeError::OutOfRange { .. })
                | Error::Rope(RopeError::LineOutOfRange { .. })
        )
    }

    /// A reversed range, or one that runs past either end of the buffer.
    pub fn is_invalid_range(&self) -> bool {
        matches!(
            self,
            Error::DeleteBeforeStart { .. } | Error::Rope(RopeError::InvalidRange { .. })
        )
    }
}
