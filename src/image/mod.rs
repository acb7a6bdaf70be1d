use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::mem::{Memory, NUM_MEMORY};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("can't open file {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("error in reading address {address}: {line:?}")]
    Parse { address: usize, line: String },

    #[error("program image exceeds memory capacity of {capacity} words")]
    TooLarge { capacity: usize },
}

/// Reads a program image (one decimal word per line) into fresh memory.
pub fn load_image_file(path: impl AsRef<Path>) -> Result<Memory, LoadError> {
    let path = path.as_ref();
    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_err)?;
    let mem = load_image(BufReader::new(file)).map_err(|e| match e {
        LoadError::Io { source, .. } => io_err(source),
        other => other,
    })?;

    info!(path = %path.display(), words = mem.loaded(), "loaded program image");
    Ok(mem)
}

pub fn load_image<R: BufRead>(reader: R) -> Result<Memory, LoadError> {
    let mut mem = Memory::new();
    for (address, line) in reader.split(b'\n').enumerate() {
        let line = line.map_err(|source| LoadError::Io {
            path: PathBuf::new(),
            source,
        })?;
        let word = parse_word(&line).ok_or_else(|| LoadError::Parse {
            address,
            line: String::from_utf8_lossy(&line).trim_end().to_string(),
        })?;
        mem.push_word(word).map_err(|_| LoadError::TooLarge {
            capacity: NUM_MEMORY,
        })?;
    }
    Ok(mem)
}

/// Parses the leading decimal integer of a line, skipping leading
/// whitespace and ignoring anything after the digits.
pub fn parse_word(line: &[u8]) -> Option<i32> {
    // C isspace: ASCII whitespace plus vertical tab
    let start = line
        .iter()
        .position(|b| !(b.is_ascii_whitespace() || *b == 0x0b))
        .unwrap_or(line.len());
    let s = &line[start..];
    let sign_len = usize::from(matches!(s.first(), Some(b'+' | b'-')));
    let digits = s[sign_len..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    std::str::from_utf8(&s[..sign_len + digits]).ok()?.parse().ok()
}
