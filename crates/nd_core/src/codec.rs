//! Wire frame codec: pure functions that pack pixels into the inner pixel
//! message, optionally wrap it in the compressed envelope, and parse both
//! back. Nothing here touches a socket — see `nd_net` for the transport.
//!
//! Inner pixel message (all integers little-endian):
//!
//! | field        | size | notes                                    |
//! |--------------|------|-------------------------------------------|
//! | command      | 2    | `WIFI_COMMAND_PIXELDATA64` = 3             |
//! | channel_mask | 2    | which channels receive this payload        |
//! | length       | 4    | pixel count                                |
//! | seconds      | 8    | intended presentation time, Unix epoch UTC |
//! | micros       | 8    | microseconds part, 0..999_999              |
//! | payload      | 3*n  | R,G,B per pixel, in strip order            |
//!
//! Outer compressed wrapper (used when a strip has `compress = true`):
//!
//! | field              | size | notes                                 |
//! |--------------------|------|-----------------------------------------|
//! | magic              | 4    | `0x44415645`                            |
//! | compressed_size    | 4    | size of `blob`                          |
//! | uncompressed_size  | 4    | size of the inner message before compress|
//! | reserved           | 4    | `0x12345678`, validated by the reader    |
//! | blob               | ..   | raw DEFLATE (no zlib header) of the inner message |

use std::io::{Read, Write};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bytes::{Buf, BufMut, BytesMut};
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::error::{CodecError, Result};
use crate::pixel::Pixel;

/// Command word identifying an inner pixel-data message.
pub const WIFI_COMMAND_PIXELDATA64: u16 = 3;
/// Magic number that opens the compressed outer wrapper.
pub const COMPRESSED_MAGIC: u32 = 0x4441_5645;
/// Fixed identity value in the compressed outer wrapper's reserved field.
pub const COMPRESSED_RESERVED: u32 = 0x1234_5678;
/// How far ahead of "now" a frame's presentation timestamp is set, so the
/// device can smooth jitter in its own local buffer.
pub const BUFFER_LATENCY: Duration = Duration::from_secs(1);

const INNER_HEADER_LEN: usize = 2 + 2 + 4 + 8 + 8;
const OUTER_HEADER_LEN: usize = 4 + 4 + 4 + 4;

/// A decoded inner pixel message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    pub pixels: Vec<Pixel>,
    pub channel_mask: u16,
    pub seconds: u64,
    pub micros: u64,
}

/// `now + BUFFER_LATENCY` as `(seconds, micros)` since the Unix epoch, UTC.
///
/// # Panics
///
/// Panics if `now` is before the Unix epoch, which never happens for a
/// wall-clock read on a correctly configured host.
#[must_use]
pub fn present_time_parts(now: SystemTime) -> (u64, u32) {
    let since_epoch = (now + BUFFER_LATENCY)
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the Unix epoch");
    (since_epoch.as_secs(), since_epoch.subsec_micros())
}

/// Packs `pixels` into the inner pixel message described above.
pub fn encode_inner(pixels: &[Pixel], channel_mask: u16, seconds: u64, micros: u32) -> Result<Vec<u8>> {
    let length = u32::try_from(pixels.len()).map_err(|_| CodecError::LengthOverflow(pixels.len()))?;

    let mut buf = BytesMut::with_capacity(INNER_HEADER_LEN + pixels.len() * 3);
    buf.put_u16_le(WIFI_COMMAND_PIXELDATA64);
    buf.put_u16_le(channel_mask);
    buf.put_u32_le(length);
    buf.put_u64_le(seconds);
    buf.put_u64_le(u64::from(micros));
    for p in pixels {
        buf.put_u8(p.r);
        buf.put_u8(p.g);
        buf.put_u8(p.b);
    }
    Ok(buf.to_vec())
}

/// Encodes `pixels` for the wire, wrapping in the compressed envelope when
/// `compress` is true.
pub fn encode(
    pixels: &[Pixel],
    channel_mask: u16,
    seconds: u64,
    micros: u32,
    compress: bool,
) -> Result<Vec<u8>> {
    let inner = encode_inner(pixels, channel_mask, seconds, micros)?;
    if !compress {
        return Ok(inner);
    }

    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&inner)
        .map_err(|e| CodecError::Decompress(e.to_string()))?;
    let blob = encoder
        .finish()
        .map_err(|e| CodecError::Decompress(e.to_string()))?;

    let compressed_size =
        u32::try_from(blob.len()).map_err(|_| CodecError::LengthOverflow(blob.len()))?;
    let uncompressed_size =
        u32::try_from(inner.len()).map_err(|_| CodecError::LengthOverflow(inner.len()))?;

    let mut buf = BytesMut::with_capacity(OUTER_HEADER_LEN + blob.len());
    buf.put_u32_le(COMPRESSED_MAGIC);
    buf.put_u32_le(compressed_size);
    buf.put_u32_le(uncompressed_size);
    buf.put_u32_le(COMPRESSED_RESERVED);
    buf.extend_from_slice(&blob);
    Ok(buf.to_vec())
}

/// Parses an inner pixel message, verifying the command word and that the
/// payload length is an exact multiple of 3.
pub fn decode_inner(bytes: &[u8]) -> Result<DecodedFrame> {
    if bytes.len() < INNER_HEADER_LEN {
        return Err(CodecError::Truncated {
            needed: INNER_HEADER_LEN,
            have: bytes.len(),
        });
    }
    let mut cur = bytes;
    let command = cur.get_u16_le();
    if command != WIFI_COMMAND_PIXELDATA64 {
        return Err(CodecError::BadCommand(command));
    }
    let channel_mask = cur.get_u16_le();
    let length = cur.get_u32_le();
    let seconds = cur.get_u64_le();
    let micros = cur.get_u64_le();

    let payload = cur;
    let expected_len = length as usize * 3;
    if payload.len() != expected_len {
        return Err(CodecError::PayloadLengthMismatch {
            payload_len: payload.len(),
            length,
        });
    }

    let pixels = payload
        .chunks_exact(3)
        .map(|c| Pixel::new(c[0], c[1], c[2]))
        .collect();

    Ok(DecodedFrame {
        pixels,
        channel_mask,
        seconds,
        micros,
    })
}

fn decode_compressed(bytes: &[u8]) -> Result<DecodedFrame> {
    if bytes.len() < OUTER_HEADER_LEN {
        return Err(CodecError::Truncated {
            needed: OUTER_HEADER_LEN,
            have: bytes.len(),
        });
    }
    let mut cur = bytes;
    let magic = cur.get_u32_le();
    if magic != COMPRESSED_MAGIC {
        return Err(CodecError::BadMagic(magic));
    }
    let compressed_size = cur.get_u32_le() as usize;
    let uncompressed_size = cur.get_u32_le() as usize;
    let reserved = cur.get_u32_le();
    if reserved != COMPRESSED_RESERVED {
        return Err(CodecError::BadReserved(reserved));
    }
    if cur.len() < compressed_size {
        return Err(CodecError::Truncated {
            needed: compressed_size,
            have: cur.len(),
        });
    }

    let blob = &cur[..compressed_size];
    let mut decoder = DeflateDecoder::new(blob);
    let mut inner = Vec::with_capacity(uncompressed_size);
    decoder
        .read_to_end(&mut inner)
        .map_err(|e| CodecError::Decompress(e.to_string()))?;
    if inner.len() != uncompressed_size {
        return Err(CodecError::Decompress(format!(
            "expected {uncompressed_size} decompressed bytes, got {}",
            inner.len()
        )));
    }
    decode_inner(&inner)
}

/// Parses either framing: detects the compressed wrapper by its magic
/// number, otherwise parses `bytes` as a bare inner pixel message.
pub fn decode(bytes: &[u8]) -> Result<DecodedFrame> {
    if bytes.len() >= 4 {
        let maybe_magic = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if maybe_magic == COMPRESSED_MAGIC {
            return decode_compressed(bytes);
        }
    }
    decode_inner(bytes)
}
