use thiserror::Error;

/// Errors raised while aggregating a measurement stream.
#[derive(Debug, Error)]
pub enum BrcError {
    #[error("failed to read input stream: {0}")]
    StreamRead(#[from] std::io::Error),

    #[error("malformed value {value:?} for station {name:?}")]
    MalformedValue { name: String, value: String },

    /// `len` is the bytes buffered when the limit was crossed. Reads can stop
    /// that count partway through a token, so only `limit` is stable across chunk sizes.
    #[error("token of at least {len} bytes exceeds the {limit}-byte limit")]
    TokenTooLarge { len: usize, limit: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BrcError {
    pub(crate) fn malformed(name: &[u8], value: &[u8]) -> Self {
        BrcError::MalformedValue {
            name: String::from_utf8_lossy(name).into_owned(),
            value: String::from_utf8_lossy(value).into_owned(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BrcError>;
