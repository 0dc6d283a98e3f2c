use crate::buffer::Buffer;
use crate::config::BufferConfig;
use rope::Rope;

/// Collects consecutive pieces of text and builds a balanced buffer from them
/// in one pass.
#[derive(Default, Debug)]
pub struct BufferBuilder {
    chunks: Vec<String>,
    config: BufferConfig,
}

impl BufferBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BufferConfig) -> Self {
        Self {
            chunks: Vec::new(),
            config,
        }
    }

    /// Accept a chunk of text (may include multiple lines).
    pub fn accept_chunk(&mut self, chunk: &str) {
        if chunk.is_empty() {
            return;
        }
        self.chunks.push(chunk.to_string());
    }

    pub fn finish(self) -> Buffer {
        Buffer::from_rope(Rope::from_chunks(self.chunks), self.config)
    }
}
