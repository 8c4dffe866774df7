use std::path::PathBuf;

use crate::error::{BrcError, Result};

pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;
pub const DEFAULT_MAX_TOKEN_LEN: usize = 4096;
pub const DEFAULT_INPUT: &str = "measurements.txt";

/// Everything a run needs, passed explicitly instead of read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Measurement file to aggregate.
    pub input: PathBuf,
    /// Bytes requested per read.
    pub chunk_size: usize,
    /// Upper bound on a single name or value token, including any carried remainder.
    pub max_token_len: usize,
    /// Log phase timings.
    pub profile: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_token_len: DEFAULT_MAX_TOKEN_LEN,
            profile: false,
        }
    }
}

impl Config {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self { input: input.into(), ..Self::default() }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_max_token_len(mut self, max_token_len: usize) -> Self {
        self.max_token_len = max_token_len;
        self
    }

    pub fn with_profile(mut self, profile: bool) -> Self {
        self.profile = profile;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(BrcError::InvalidConfig("chunk size must be at least 1 byte".into()));
        }
        if self.max_token_len == 0 {
            return Err(BrcError::InvalidConfig("max token length must be at least 1 byte".into()));
        }
        Ok(())
    }
}
