mod buffer;
mod buffer_builder;
mod config;
mod cursor;
mod edit;
mod error;
mod history;
mod io;
mod position;
mod view;

pub use crate::buffer::Buffer;
pub use crate::buffer_builder::BufferBuilder;
pub use crate::config::{BufferConfig, DEFAULT_MAX_ROPE_HEIGHT};
pub use crate::cursor::Cursor;
pub use crate::edit::{Direction, EditCommand};
pub use crate::error::{Error, Result};
pub use crate::history::EditLog;
pub use crate::io::{load_from_path, load_from_path_with_config, save_to_path};
pub use crate::position::PositionIndex;
pub use crate::view::{Viewport, wrap_line, wrapped_lines};
pub use rope::{Rope, RopeError};
