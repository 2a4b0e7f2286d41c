//! # zentga
//!
//! TGA (Truevision) image decoder and encoder.
//!
//! ## Supported Formats
//!
//! - **Type 1 / 9**: color-mapped (uncompressed / RLE), 8-, 16- or 24-bit
//!   indices into a palette of 8-, 16- or 24-bit entries
//! - **Type 2 / 10**: true-color (uncompressed / RLE)
//! - **Type 3 / 11**: greyscale (uncompressed / RLE)
//!
//! Any depth that is a whole number of bytes up to 128 bits is carried
//! through. Pixel bytes are returned exactly as stored: true-color pixels are
//! BGR(A), 16-bit pixels stay packed 5-5-5-1. Color-mapped images are
//! resolved through their palette unless [`TgaOptions::RETURN_COLOR_MAP`] is
//! set, in which case the indices and the [`ColorMap`] are returned.
//!
//! The origin corner from the header is reported in [`TgaImage::origin`]
//! but never applied. Flips are requested explicitly with
//! [`TgaOptions::FLIP_VERTICALLY`] / [`TgaOptions::FLIP_HORIZONTALLY`] and
//! behave the same on decode and encode.
//!
//! ## Non-Goals
//!
//! - TGA 2.0 extension and developer areas (the footer is ignored)
//! - Color-space conversion or resampling
//! - Partial or progressive decoding
//!
//! ## Usage
//!
//! ```no_run
//! use zentga::{DecodeRequest, EncodeRequest, TgaInfo, TgaOptions};
//! use enough::Unstoppable;
//!
//! let data: &[u8] = &[]; // your TGA bytes
//!
//! // Read the header without decoding
//! let info = TgaInfo::from_bytes(data)?;
//! println!("{}x{} {:?}", info.width, info.height, info.image_type);
//!
//! // Decode, resolving any palette
//! let image = DecodeRequest::new().decode(data, Unstoppable)?;
//!
//! // Re-encode with run-length compression
//! let encoded = EncodeRequest::new()
//!     .with_options(TgaOptions::RLE)
//!     .encode(&image, Unstoppable)?;
//! # Ok::<(), zentga::TgaError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod error;
mod fetch;
mod header;
mod image;
mod info;
mod io;
mod limits;
mod log;
mod memory;
mod options;
mod palette;
mod pixel;
mod remap;
mod rle;

mod decode;
mod encode;

// Re-exports
pub use decode::{DecodeRequest, DecodedInto};
pub use encode::EncodeRequest;
pub use enough::{Stop, Unstoppable};
pub use error::{ErrorKind, TgaError};
pub use header::{ColorMapSpec, ImageSpec, ImageType, TgaHeader};
pub use image::{ColorModel, ImageOrigin, TgaImage};
pub use info::TgaInfo;
#[cfg(feature = "std")]
pub use io::{IoReader, IoWriter};
pub use io::{SliceReader, TgaRead, TgaWrite};
pub use limits::Limits;
pub use memory::{BufferPurpose, DefaultMemoryProvider, MemoryProvider, buffer_len};
pub use options::TgaOptions;
pub use palette::ColorMap;
#[cfg(feature = "rgb")]
pub use pixel::TgaPixel;
pub use pixel::PixelLayout;
pub use remap::Flip;

use alloc::vec::Vec;

/// Decode a TGA file held in memory.
pub fn decode_tga(data: &[u8], options: TgaOptions) -> Result<TgaImage, TgaError> {
    DecodeRequest::new()
        .with_options(options)
        .decode(data, Unstoppable)
}

/// Decode a TGA image from a stream.
#[cfg(feature = "std")]
pub fn decode_tga_reader<R: std::io::Read>(
    reader: R,
    options: TgaOptions,
) -> Result<TgaImage, TgaError> {
    DecodeRequest::new()
        .with_options(options)
        .decode_reader(reader, Unstoppable)
}

/// Open and decode a TGA file.
#[cfg(feature = "std")]
pub fn decode_tga_file<P: AsRef<std::path::Path>>(
    path: P,
    options: TgaOptions,
) -> Result<TgaImage, TgaError> {
    DecodeRequest::new()
        .with_options(options)
        .decode_file(path, Unstoppable)
}

/// Encode an image to TGA bytes.
pub fn encode_tga(image: &TgaImage, options: TgaOptions) -> Result<Vec<u8>, TgaError> {
    EncodeRequest::new()
        .with_options(options)
        .encode(image, Unstoppable)
}

/// Encode an image into a writer.
#[cfg(feature = "std")]
pub fn encode_tga_writer<W: std::io::Write>(
    writer: W,
    image: &TgaImage,
    options: TgaOptions,
) -> Result<(), TgaError> {
    EncodeRequest::new()
        .with_options(options)
        .encode_writer(image, writer, Unstoppable)
}

/// Create a file and encode an image into it.
#[cfg(feature = "std")]
pub fn encode_tga_file<P: AsRef<std::path::Path>>(
    path: P,
    image: &TgaImage,
    options: TgaOptions,
) -> Result<(), TgaError> {
    EncodeRequest::new()
        .with_options(options)
        .encode_file(image, path, Unstoppable)
}
