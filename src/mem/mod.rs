use std::fmt;

use thiserror::Error;

/// Number of words in the machine's memory.
pub const NUM_MEMORY: usize = 65536;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemError {
    #[error("address out of range: {0}")]
    Oob(i64),
}

/// Word-addressed memory. Code and data share the same array.
pub struct Memory {
    data: Vec<i32>,
    loaded: usize,
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memory")
            .field("loaded", &self.loaded_words())
            .finish_non_exhaustive()
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    pub fn new() -> Self {
        Self {
            data: vec![0; NUM_MEMORY],
            loaded: 0,
        }
    }

    /// Builds memory with `words` placed from address 0 and marked as loaded.
    pub fn from_words(words: &[i32]) -> Result<Self, MemError> {
        let mut mem = Self::new();
        for &word in words {
            mem.push_word(word)?;
        }
        Ok(mem)
    }

    fn check_oob(&self, addr: i64) -> Result<usize, MemError> {
        usize::try_from(addr)
            .ok()
            .filter(|&a| a < self.data.len())
            .ok_or(MemError::Oob(addr))
    }

    pub fn read(&self, addr: i64) -> Result<i32, MemError> {
        let off = self.check_oob(addr)?;
        Ok(self.data[off])
    }

    pub fn write(&mut self, addr: i64, v: i32) -> Result<(), MemError> {
        let off = self.check_oob(addr)?;
        self.data[off] = v;
        Ok(())
    }

    /// Appends a word right after the loaded region.
    pub fn push_word(&mut self, v: i32) -> Result<(), MemError> {
        self.write(self.loaded as i64, v)?;
        self.loaded += 1;
        Ok(())
    }

    /// Number of words populated from the program image.
    pub fn loaded(&self) -> usize {
        self.loaded
    }

    /// The populated prefix of memory.
    pub fn loaded_words(&self) -> &[i32] {
        &self.data[..self.loaded]
    }
}
