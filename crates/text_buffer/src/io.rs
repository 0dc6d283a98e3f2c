use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
    str,
};

use crate::buffer::Buffer;
use crate::buffer_builder::BufferBuilder;
use crate::config::BufferConfig;
use crate::error::{Error, Result};

const READ_SIZE: usize = 64 * 1024;
const REPLACEMENT: &str = "\u{FFFD}";

pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Buffer> {
    load_from_path_with_config(path, BufferConfig::default())
}

pub fn load_from_path_with_config<P: AsRef<Path>>(
    path: P,
    config: BufferConfig,
) -> Result<Buffer> {
    let path = path.as_ref();
    let read_error = |source| Error::Read {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(read_error)?;
    let mut builder = BufferBuilder::with_config(config);
    read_chunks(BufReader::new(file), READ_SIZE, &mut builder).map_err(read_error)?;

    let buffer = builder.finish();
    tracing::debug!(path = %path.display(), len = buffer.len(), "loaded file");
    Ok(buffer)
}

/// Write the buffer's text to `path`, one rope chunk at a time.
pub fn save_to_path<P: AsRef<Path>>(buffer: &Buffer, path: P) -> Result<()> {
    let path = path.as_ref();
    let write_error = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    for chunk in buffer.rope().chunks() {
        writer.write_all(chunk.as_bytes()).map_err(write_error)?;
    }
    writer.flush().map_err(write_error)?;

    tracing::debug!(path = %path.display(), len = buffer.len(), "saved file");
    Ok(())
}

/// Feed `reader` to `builder` in reads of `read_size` bytes. A code point cut
/// by a read boundary is carried into the next read; invalid sequences become
/// U+FFFD.
fn read_chunks<R: Read>(
    mut reader: R,
    read_size: usize,
    builder: &mut BufferBuilder,
) -> io::Result<()> {
    let mut buf = vec![0u8; read_size];
    let mut carry: Vec<u8> = Vec::new();

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }

        carry.extend_from_slice(&buf[..n]);
        let consumed = decode_valid(&carry, builder);
        carry.drain(..consumed);
    }

    // a sequence still incomplete at end of input is broken
    if !carry.is_empty() {
        builder.accept_chunk(&String::from_utf8_lossy(&carry));
    }
    Ok(())
}

/// Hands every complete sequence in `bytes` to `builder` and returns how many
/// bytes were used. Only a truncated sequence at the very end is left over.
fn decode_valid(bytes: &[u8], builder: &mut BufferBuilder) -> usize {
    let mut rest = bytes;
    loop {
        match str::from_utf8(rest) {
            Ok(text) => {
                builder.accept_chunk(text);
                return bytes.len();
            }
            Err(err) => {
                let (valid, after) = rest.split_at(err.valid_up_to());
                if let Ok(text) = str::from_utf8(valid) {
                    builder.accept_chunk(text);
                }
                match err.error_len() {
                    Some(invalid) => {
                        builder.accept_chunk(REPLACEMENT);
                        rest = &after[invalid..];
                    }
                    None => return bytes.len() - after.len(),
                }
            }
        }
    }
}
