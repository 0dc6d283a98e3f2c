use crate::model::command::{Command, HELP};
use crate::model::error::Error;
use std::error::Error as StdError;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use text_buffer::{Buffer, BufferConfig, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    file: Option<PathBuf>,
    buffer: Buffer,
    viewport: Viewport,
    wrap_width: Option<usize>,
    is_dirty: bool,
}

impl App {
    pub fn new(config: BufferConfig, viewport_height: usize, wrap_width: Option<usize>) -> Self {
        Self {
            file: None,
            buffer: Buffer::with_config(config),
            viewport: Viewport::new(viewport_height),
            wrap_width,
            is_dirty: false,
        }
    }

    /// Starts on `path`. A file that does not exist yet becomes the target of
    /// the first write.
    pub fn open(
        path: &Path,
        config: BufferConfig,
        viewport_height: usize,
        wrap_width: Option<usize>,
    ) -> Result<Self, Error> {
        let mut app = Self::new(config, viewport_height, wrap_width);
        if path.exists() {
            app.load(path)?;
        } else {
            tracing::info!(path = %path.display(), "starting a new file");
            app.file = Some(path.to_path_buf());
        }
        Ok(app)
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    /// Reads commands from `input` until `q` or end of input. Command errors
    /// are reported on `out` and the session goes on; only a failure to write
    /// to `out` ends it early.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<(), Error> {
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let result = match line.parse::<Command>() {
                Ok(command) => self.update(command, out),
                Err(err) => {
                    writeln!(out, "error: {err}")?;
                    continue;
                }
            };
            match result {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(Error::Terminal(err)) => return Err(Error::Terminal(err)),
                Err(err) => report(out, &err)?,
            }
        }
        Ok(())
    }

    pub fn update<W: Write>(&mut self, command: Command, out: &mut W) -> Result<Flow, Error> {
        tracing::debug!(?command, "running command");
        match command {
            Command::Insert(text) => {
                self.buffer.insert_text(&text)?;
                self.edited();
            }
            Command::NewLine => {
                self.buffer.new_line()?;
                self.edited();
            }
            Command::DeleteBackward(count) => {
                self.buffer.delete_backward(count)?;
                self.edited();
            }
            Command::DeleteRange { offset, count } => {
                self.buffer.delete_range(offset, count)?;
                self.edited();
            }
            Command::Move { rows, cols } => {
                self.buffer.move_cursor(rows, cols)?;
                self.viewport.follow_cursor(&self.buffer);
                self.status(out)?;
            }
            Command::SetCursor { row, col } => {
                self.buffer.set_cursor(row, col)?;
                self.viewport.follow_cursor(&self.buffer);
                self.status(out)?;
            }
            Command::GoToLine(row) => {
                self.buffer.go_to_line(row)?;
                self.viewport.follow_cursor(&self.buffer);
                self.status(out)?;
            }
            Command::Print => {
                writeln!(out, "{}", self.buffer.rope())?;
                self.status(out)?;
            }
            Command::PrintLine(row) => writeln!(out, "{}", self.buffer.get_line(row)?)?,
            Command::View => self.print_view(out)?,
            Command::ScrollDown => {
                self.viewport.scroll_down(&self.buffer);
                self.print_view(out)?;
            }
            Command::ScrollUp => {
                self.viewport.scroll_up();
                self.print_view(out)?;
            }
            Command::Undo => {
                if self.buffer.undo()? {
                    self.edited();
                } else {
                    writeln!(out, "nothing to undo")?;
                }
            }
            Command::Redo => {
                if self.buffer.redo()? {
                    self.edited();
                } else {
                    writeln!(out, "nothing to redo")?;
                }
            }
            Command::Find(needle) => {
                let offsets = self.buffer.find(&needle);
                if offsets.is_empty() {
                    writeln!(out, "not found")?;
                } else {
                    let offsets: Vec<String> = offsets.iter().map(usize::to_string).collect();
                    writeln!(out, "{}", offsets.join(" "))?;
                }
            }
            Command::Replace {
                needle,
                replacement,
            } => {
                let count = self.buffer.replace_all(&needle, &replacement)?;
                if count > 0 {
                    self.edited();
                }
                writeln!(out, "replaced {count}")?;
            }
            Command::Open(path) => {
                self.load(&path)?;
                let lines = self.buffer.total_lines();
                writeln!(out, "opened {} ({lines} lines)", path.display())?;
            }
            Command::Write(path) => {
                let path = path.or_else(|| self.file.clone()).ok_or(Error::NoFileName)?;
                text_buffer::save_to_path(&self.buffer, &path)?;
                tracing::info!(path = %path.display(), "saved");
                writeln!(out, "wrote {}", path.display())?;
                self.file = Some(path);
                self.is_dirty = false;
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn load(&mut self, path: &Path) -> Result<(), Error> {
        let config = self.buffer.config().clone();
        self.buffer = text_buffer::load_from_path_with_config(path, config)?;
        self.viewport = Viewport::new(self.viewport.height());
        self.file = Some(path.to_path_buf());
        self.is_dirty = false;
        tracing::info!(path = %path.display(), lines = self.buffer.total_lines(), "opened");
        Ok(())
    }

    fn edited(&mut self) {
        self.is_dirty = true;
        self.viewport.follow_cursor(&self.buffer);
    }

    fn status<W: Write>(&self, out: &mut W) -> Result<(), Error> {
        let (row, col) = self.buffer.current_position();
        writeln!(out, "{row}:{col}")?;
        Ok(())
    }

    fn print_view<W: Write>(&self, out: &mut W) -> Result<(), Error> {
        let rows = self.viewport.rows(&self.buffer);
        let width = rows.end.to_string().len();
        for row in rows {
            let line = self.buffer.get_line(row)?;
            let pieces = match self.wrap_width {
                Some(max_width) => text_buffer::wrap_line(&line, max_width),
                None => vec![line],
            };
            for (i, piece) in pieces.iter().enumerate() {
                if i == 0 {
                    writeln!(out, "{row:>width$} | {piece}")?;
                } else {
                    writeln!(out, "{:>width$} | {piece}", "")?;
                }
            }
        }
        Ok(())
    }
}

fn report<W: Write>(out: &mut W, err: &Error) -> Result<(), Error> {
    write!(out, "error: {err}")?;
    let mut source = err.source();
    while let Some(cause) = source {
        write!(out, ": {cause}")?;
        source = cause.source();
    }
    writeln!(out)?;
    Ok(())
}
