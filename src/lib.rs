//! # zencool
//!
//! Decoder and encoder for COOL still images: a small bitmap-style container
//! with interchangeable pixel compression schemes.
//!
//! ## Supported Variants
//!
//! | Compression | Bits | Decode | Encode | Output |
//! |---|---|---|---|---|
//! | `Uncompressed8` | 8 | yes | yes | `Gray8` |
//! | `Bitfield16` | 16 | yes | yes | `Rgb565` |
//! | `NibbleRle16` | 16 | yes | yes (4-bit per channel) | `Rgb565` |
//! | `ByteRle4` | 8 | yes, via [`RunLengthEngine`] | no | `Gray8` |
//! | `ByteRle8` | 8 | yes, via [`RunLengthEngine`] | no | `Gray8` |
//!
//! Decoded buffers are always top row first. [`Orientation`] records how the
//! file stored its rows and is what the encoder writes back, so
//! decode → encode keeps the original layout.
//!
//! `NibbleRle16` keeps 4 bits per channel: decoding an encoded image gives
//! every pixel masked with [`QUANT_MASK`].
//!
//! ## Diagnostics
//!
//! Tolerated input problems (header-only file size fields, oversized file
//! size, unpadded rows) are corrected and reported as [`Diagnostic`]s on the
//! decode result, and logged through the `log` facade.
//!
//! ## Non-Goals
//!
//! - Animation, container demuxing, timing
//! - Color management
//! - Multi-threaded decode
//!
//! ## Usage
//!
//! ```no_run
//! use zencool::{CompressionKind, DecodeRequest, EncodeRequest, ImageInfo, Unstoppable};
//!
//! let data: &[u8] = &[]; // your COOL bytes
//!
//! // Probe without decoding
//! let info = ImageInfo::from_bytes(data)?;
//! println!("{}x{} {:?}", info.width, info.height, info.compression);
//!
//! let decoded = DecodeRequest::new(data).decode(Unstoppable)?;
//!
//! // Re-encode with the bespoke run-length scheme
//! let encoded = EncodeRequest::new(CompressionKind::NibbleRle16)
//!     .with_orientation(decoded.orientation)
//!     .encode_slice(&decoded.as_slice(), Unstoppable)?;
//! # Ok::<(), zencool::CoolError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod cursor;
mod diagnostics;
mod error;
mod info;
mod limits;
mod pixel;

pub mod cool;
pub mod rle;

mod decode;
mod encode;

// Re-exports
pub use cool::{
    CompressionKind, ImageHeader, MAX_RUN, QUANT_MASK, RleDepth, RleTarget, RunLengthEngine,
};
pub use decode::{DecodeReport, DecodeRequest, DecodedImage};
pub use diagnostics::Diagnostic;
pub use encode::EncodeRequest;
pub use enough::{Stop, Unstoppable};
pub use error::CoolError;
pub use info::ImageInfo;
pub use limits::Limits;
pub use pixel::{Orientation, PixelBufferMut, PixelLayout, PixelSlice};
pub use rle::ByteRle;

use alloc::vec::Vec;

/// Probe a COOL header.
pub fn probe(data: &[u8]) -> Result<ImageInfo, CoolError> {
    cool::probe(data)
}

/// Decode a COOL file with the default [`ByteRle`] engine.
pub fn decode(data: &[u8], stop: impl Stop) -> Result<DecodedImage, CoolError> {
    DecodeRequest::new(data).decode(stop)
}

/// Encode a decoded image as `compression`, keeping its orientation.
pub fn encode(
    image: &DecodedImage,
    compression: CompressionKind,
    stop: impl Stop,
) -> Result<Vec<u8>, CoolError> {
    EncodeRequest::new(compression)
        .with_orientation(image.orientation)
        .encode_slice(&image.as_slice(), stop)
}
