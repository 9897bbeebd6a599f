#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

//! Pixel buffer, drawing primitives, and wire frame codec.
//!
//! This crate is pure: no threads, no sockets, no clocks other than the
//! `SystemTime` passed into [`codec::present_time_parts`]. `nd_net` and
//! `nd_site` build the networked, threaded parts of the server on top of it.

pub mod buffer;
pub mod codec;
pub mod error;
pub mod pixel;
pub mod surface;

pub use buffer::PixelBuffer;
pub use codec::{present_time_parts, DecodedFrame, BUFFER_LATENCY};
pub use error::{CodecError, Result};
pub use pixel::Pixel;
pub use surface::GraphicsSurface;
