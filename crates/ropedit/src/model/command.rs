use super::error::ParseError;
use std::path::PathBuf;
use std::str::{FromStr, SplitWhitespace};

pub const HELP: &str = "\
rows, columns and offsets count from 0; `\\n`, `\\t` and `\\\\` are unescaped in text
  i <text>          insert text at the cursor
  n                 insert a line break at the cursor
  d [n]             delete n characters before the cursor (default 1)
  x <offset> <n>    delete n characters starting at offset
  m <rows> <cols>   move the cursor by rows, then by columns
  c <row> <col>     put the cursor at row, col
  g <row>           go to the start of row
  p                 print the whole buffer
  l <row>           print one line
  v                 print the viewport
  j / k             scroll the viewport down / up
  u / r             undo / redo
  f <text>          list the offsets of text
  s <old> <new>     replace every old with new
  o <file>          open a file
  w [file]          write the buffer to file (default: the open file)
  h                 this help
  q                 quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Insert(String),
    NewLine,
    DeleteBackward(usize),
    DeleteRange { offset: usize, count: usize },
    Move { rows: isize, cols: isize },
    SetCursor { row: usize, col: usize },
    GoToLine(usize),
    Print,
    PrintLine(usize),
    View,
    ScrollDown,
    ScrollUp,
    Undo,
    Redo,
    Find(String),
    Replace { needle: String, replacement: String },
    Open(PathBuf),
    Write(Option<PathBuf>),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = ParseError;

    /// Parses one input line. Everything after the single space following the
    /// command letter belongs to the arguments, so text keeps its spacing.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_start().trim_end_matches(['\r', '\n']);
        let (name, rest) = line.split_once(' ').unwrap_or((line, ""));

        let mut letters = name.chars();
        let (Some(letter), None) = (letters.next(), letters.next()) else {
            return Err(ParseError::UnknownCommand(name.to_string()));
        };
        let mut args = rest.split_whitespace();

        let command = match letter {
            'i' => Command::Insert(unescape(text(letter, rest, "text to insert")?)),
            'n' => Command::NewLine,
            'd' => Command::DeleteBackward(match args.next() {
                Some(value) => parse_number(value)?,
                None => 1,
            }),
            'x' => Command::DeleteRange {
                offset: number(&mut args, letter, "an offset and a count")?,
                count: number(&mut args, letter, "an offset and a count")?,
            },
            'm' => Command::Move {
                rows: number(&mut args, letter, "a row and a column delta")?,
                cols: number(&mut args, letter, "a row and a column delta")?,
            },
            'c' => Command::SetCursor {
                row: number(&mut args, letter, "a row and a column")?,
                col: number(&mut args, letter, "a row and a column")?,
            },
            'g' => Command::GoToLine(number(&mut args, letter, "a row")?),
            'p' => Command::Print,
            'l' => Command::PrintLine(number(&mut args, letter, "a row")?),
            'v' => Command::View,
            'j' => Command::ScrollDown,
            'k' => Command::ScrollUp,
            'u' => Command::Undo,
            'r' => Command::Redo,
            'f' => Command::Find(unescape(text(letter, rest, "text to find")?)),
            's' => {
                let (needle, replacement) = rest
                    .split_once(' ')
                    .filter(|(needle, _)| !needle.is_empty())
                    .ok_or(ParseError::MissingArgument {
                        command: letter,
                        expected: "the text to replace and its replacement",
                    })?;
                Command::Replace {
                    needle: unescape(needle),
                    replacement: unescape(replacement),
                }
            }
            'o' => Command::Open(PathBuf::from(text(letter, rest.trim(), "a file name")?)),
            'w' => {
                let file = rest.trim();
                Command::Write((!file.is_empty()).then(|| PathBuf::from(file)))
            }
            'h' => Command::Help,
            'q' => Command::Quit,
            _ => return Err(ParseError::UnknownCommand(name.to_string())),
        };
        Ok(command)
    }
}

fn text<'a>(command: char, rest: &'a str, expected: &'static str) -> Result<&'a str, ParseError> {
    if rest.is_empty() {
        return Err(ParseError::MissingArgument { command, expected });
    }
    Ok(rest)
}

fn number<T>(
    args: &mut SplitWhitespace<'_>,
    command: char,
    expected: &'static str,
) -> Result<T, ParseError>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    let value = args
        .next()
        .ok_or(ParseError::MissingArgument { command, expected })?;
    parse_number(value)
}

fn parse_number<T>(value: &str) -> Result<T, ParseError>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    value.parse().map_err(|source| ParseError::InvalidNumber {
        value: value.to_string(),
        source,
    })
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
