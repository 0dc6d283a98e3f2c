use std::io;
use std::num::ParseIntError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Buffer(#[from] text_buffer::Error),

    #[error("no file name given and the buffer has never been saved")]
    NoFileName,

    #[error("terminal i/o failed")]
    Terminal(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command `{0}`, type `h` for help")]
    UnknownCommand(String),

    #[error("`{command}` expects {expected}")]
    MissingArgument {
        command: char,
        expected: &'static str,
    },

    #[error("`{value}` is not a valid number")]
    InvalidNumber {
        value: String,
        #[source]
        source: ParseIntError,
    },
}
