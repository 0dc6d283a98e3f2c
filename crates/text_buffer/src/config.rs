use std::env;

/// Rope height past which the buffer rebuilds the tree after an edit. Joins
/// keep the tree height-balanced, so only heavy fragmentation gets here.
pub const DEFAULT_MAX_ROPE_HEIGHT: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferConfig {
    /// Maximum number of undo steps kept; `None` keeps everything.
    pub history_limit: Option<usize>,
    /// `None` leaves rebalancing entirely to the caller.
    pub max_rope_height: Option<usize>,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            history_limit: None,
            max_rope_height: Some(DEFAULT_MAX_ROPE_HEIGHT),
        }
    }
}

impl BufferConfig {
    /// Reads `ROPEDIT_HISTORY_LIMIT` and `ROPEDIT_MAX_ROPE_HEIGHT`. A value of
    /// `0` disables the corresponding limit; unparsable values fall back to
    /// the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            history_limit: limit_from_env("ROPEDIT_HISTORY_LIMIT")
                .unwrap_or(defaults.history_limit),
            max_rope_height: limit_from_env("ROPEDIT_MAX_ROPE_HEIGHT")
                .unwrap_or(defaults.max_rope_height),
        }
    }
}

fn limit_from_env(key: &str) -> Option<Option<usize>> {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .map(|limit| (limit > 0).then_some(limit))
}
