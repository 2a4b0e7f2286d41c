//! TGA encoding.

use alloc::vec::Vec;
use enough::Stop;

use crate::error::TgaError;
use crate::header::{ImageSpec, ImageType, TgaHeader};
use crate::image::{ColorModel, TgaImage};
use crate::io::TgaWrite;
use crate::limits::Limits;
use crate::log::debug;
use crate::options::TgaOptions;
use crate::palette::{check_entry_size, check_index_size};
use crate::remap::{Flip, Placement};
use crate::rle;

const ROWS_PER_CHECK: usize = 16;

/// Builder for a TGA encode.
///
/// Flip options mirror the stored pixel order exactly as they do on decode,
/// so decoding with the same flags gives back the original buffer.
///
/// ```
/// use zentga::{ColorModel, EncodeRequest, TgaImage, TgaOptions, Unstoppable};
///
/// let image = TgaImage::new(vec![0x20; 4 * 4 * 3], 4, 4, 24, ColorModel::Rgb)?;
/// let bytes = EncodeRequest::new()
///     .with_options(TgaOptions::RLE)
///     .encode(&image, Unstoppable)?;
/// assert_eq!(bytes[2], 10); // RLE true-color
/// # Ok::<(), zentga::TgaError>(())
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct EncodeRequest<'a> {
    options: TgaOptions,
    limits: Option<&'a Limits>,
}

impl<'a> EncodeRequest<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: TgaOptions) -> Self {
        self.options = options;
        self
    }

    /// Reject images over the dimension limits, or whose worst-case encoded
    /// size exceeds `max_memory_bytes`, before anything is written.
    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Encode to a new byte vector.
    pub fn encode(self, image: &TgaImage, stop: impl Stop) -> Result<Vec<u8>, TgaError> {
        let palette_len = image.color_map.as_ref().map_or(0, |m| m.bytes().len());
        let mut out = Vec::with_capacity(TgaHeader::SIZE + palette_len + image.pixels().len());
        self.encode_to(image, &mut out, stop)?;
        Ok(out)
    }

    /// Encode into any [`TgaWrite`] sink.
    pub fn encode_to(
        self,
        image: &TgaImage,
        sink: &mut dyn TgaWrite,
        stop: impl Stop,
    ) -> Result<(), TgaError> {
        encode_stream(image, sink, self.options, self.limits, &stop)
    }

    /// Encode into a `std::io` writer.
    #[cfg(feature = "std")]
    pub fn encode_writer<W: std::io::Write>(
        self,
        image: &TgaImage,
        writer: W,
        stop: impl Stop,
    ) -> Result<(), TgaError> {
        let mut sink = crate::io::IoWriter::new(writer);
        self.encode_to(image, &mut sink, stop)
    }

    /// Create (or truncate) a file and encode into it.
    #[cfg(feature = "std")]
    pub fn encode_file<P: AsRef<std::path::Path>>(
        self,
        image: &TgaImage,
        path: P,
        stop: impl Stop,
    ) -> Result<(), TgaError> {
        use std::io::Write as _;

        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|source| TgaError::CannotOpen {
            path: path.display().to_string(),
            source,
        })?;
        let mut writer = std::io::BufWriter::new(file);
        self.encode_writer(image, &mut writer, stop)?;
        writer.flush()?;
        Ok(())
    }
}

fn encode_stream(
    image: &TgaImage,
    sink: &mut dyn TgaWrite,
    options: TgaOptions,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<(), TgaError> {
    let header = build_header(image, options)?;
    if let Some(limits) = limits {
        limits.check_dimensions(image.width, image.height)?;
        let bound = max_encoded_len(image, options)
            .ok_or(TgaError::DimensionsTooLarge {
                width: image.width,
                height: image.height,
            })?;
        limits.check_bytes("encoded output", bound)?;
    }
    debug!(
        "encoding {}x{} {} bpp as type {}",
        image.width, image.height, image.bits_per_pixel, header.image_type
    );
    stop.check()?;

    header.write(sink)?;
    if let Some(map) = &image.color_map {
        sink.write_all(map.bytes())?;
    }

    let placement = Placement::new(
        Flip::from_options(options),
        image.width as usize,
        image.height as usize,
        image.bytes_per_pixel(),
    );
    if options.contains(TgaOptions::RLE) {
        rle::compress(sink, image.pixels(), &placement, stop)
    } else {
        write_uncompressed(sink, image.pixels(), &placement, stop)
    }
}

/// Largest file `image` can encode to: header, palette, and pixels, plus one
/// packet header per pixel when run-length compressed.
fn max_encoded_len(image: &TgaImage, options: TgaOptions) -> Option<usize> {
    let palette = image.color_map.as_ref().map_or(0, |m| m.bytes().len());
    let pixels = image.width as usize * image.height as usize;
    let mut len = pixels.checked_mul(image.bytes_per_pixel())?;
    if options.contains(TgaOptions::RLE) {
        len = len.checked_add(pixels)?;
    }
    len.checked_add(TgaHeader::SIZE + palette)
}

/// Validate `image` and describe it as a header.
fn build_header(image: &TgaImage, options: TgaOptions) -> Result<TgaHeader, TgaError> {
    image.check_depth()?;
    image.check_len()?;

    let (width, height) = (image.width, image.height);
    if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
        return Err(TgaError::DimensionsTooLarge { width, height });
    }
    if width == 0 || height == 0 {
        return Err(TgaError::InvalidData(alloc::format!(
            "cannot encode an empty {width}x{height} image"
        )));
    }
    let x_origin = u16::try_from(image.x_origin).map_err(|_| {
        TgaError::InvalidData(alloc::format!("x origin {} exceeds 65535", image.x_origin))
    })?;
    let y_origin = u16::try_from(image.y_origin).map_err(|_| {
        TgaError::InvalidData(alloc::format!("y origin {} exceeds 65535", image.y_origin))
    })?;
    if image.attribute_bits > 15 {
        return Err(TgaError::InvalidData(alloc::format!(
            "{} attribute bits (at most 15)",
            image.attribute_bits
        )));
    }

    if let Some(map) = &image.color_map {
        check_entry_size(map.bits_per_entry())?;
        check_index_size(image.bits_per_pixel)?;
    }
    let rle = options.contains(TgaOptions::RLE);
    let image_type = ImageType::for_model(image.color_model, image.color_map.is_some(), rle)
        .ok_or_else(|| match image.color_model {
            ColorModel::Unknown => {
                TgaError::InvalidData("cannot encode an image with unknown color model".into())
            }
            _ => TgaError::InvalidData("greyscale images cannot carry a color map".into()),
        })?;

    let mut header = TgaHeader {
        image_type: image_type.code(),
        image: ImageSpec {
            x_origin,
            y_origin,
            width: width as u16,
            height: height as u16,
            // check_depth bounds this to 128
            bits_per_pixel: image.bits_per_pixel as u8,
            descriptor: ImageSpec::descriptor_for(image.attribute_bits, image.origin),
        },
        ..TgaHeader::default()
    };
    if let Some(map) = &image.color_map {
        header.color_map_type = 1;
        header.color_map = map.spec();
    }
    Ok(header)
}

fn write_uncompressed(
    sink: &mut dyn TgaWrite,
    pixels: &[u8],
    placement: &Placement,
    stop: &dyn Stop,
) -> Result<(), TgaError> {
    let bpp = placement.bytes_per_pixel();
    let row_bytes = placement.width() * bpp;
    let total = placement.pixel_count();

    if placement.is_identity() {
        for band in pixels.chunks(row_bytes * ROWS_PER_CHECK) {
            stop.check()?;
            sink.write_all(band)?;
        }
        return Ok(());
    }

    let mut row = Vec::with_capacity(row_bytes);
    for (r, first) in (0..total).step_by(placement.width()).enumerate() {
        if r % ROWS_PER_CHECK == 0 {
            stop.check()?;
        }
        row.clear();
        for i in first..first + placement.width() {
            let off = placement.offset(i);
            row.extend_from_slice(&pixels[off..off + bpp]);
        }
        sink.write_all(&row)?;
    }
    Ok(())
}
