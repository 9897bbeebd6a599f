//! Error Types
//!
//! Covers the pure, local failure modes of [`crate::codec`]: malformed wire bytes
//! and byte-count overflows. Nothing in this crate touches the network or the
//! filesystem, so the error surface is intentionally small.

use thiserror::Error;

/// Errors produced while encoding or decoding a wire frame.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CodecError {
    /// The byte slice ended before a fixed-size header field could be read.
    #[error("truncated frame: needed at least {needed} bytes, have {have}")]
    Truncated {
        /// Minimum number of bytes required to continue parsing.
        needed: usize,
        /// Bytes actually available.
        have: usize,
    },

    /// The command field was not `WIFI_COMMAND_PIXELDATA64`.
    #[error("unexpected command word: {0}")]
    BadCommand(u16),

    /// The outer wrapper's magic number did not match `0x44415645`.
    #[error("bad compressed-wrapper magic: {0:#010x}")]
    BadMagic(u32),

    /// The outer wrapper's reserved identity field did not match `0x12345678`.
    #[error("bad compressed-wrapper reserved field: {0:#010x}")]
    BadReserved(u32),

    /// The declared pixel count does not evenly divide the payload length.
    #[error("payload length {payload_len} is not a multiple of 3 (length field {length})")]
    PayloadLengthMismatch {
        /// Raw payload byte count.
        payload_len: usize,
        /// Declared pixel count from the header.
        length: u32,
    },

    /// DEFLATE decompression of the wrapper's blob failed or produced the wrong size.
    #[error("decompression failed: {0}")]
    Decompress(String),

    /// A pixel count would overflow the `u32` wire field or `usize` payload length.
    #[error("pixel count {0} overflows the wire length field")]
    LengthOverflow(usize),
}

/// Alias for `Result<T, CodecError>`.
pub type Result<T> = std::result::Result<T, CodecError>;
