//! Error types for the strip client and its frame queue.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StripError {
    #[error("failed to encode frame: {0}")]
    Encode(#[from] nd_core::CodecError),

    #[error("socket I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connect timed out after {0:?}")]
    ConnectTimeout(std::time::Duration),
}

pub type Result<T> = std::result::Result<T, StripError>;
