use crate::error::TgaError;
use crate::header::{ImageType, TgaHeader};
use crate::image::{ColorModel, ImageOrigin};
use crate::io::{SliceReader, TgaRead};
use crate::options::TgaOptions;

/// Image metadata from the TGA header, without decoding pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TgaInfo {
    pub width: u32,
    pub height: u32,
    pub image_type: ImageType,
    pub color_model: ColorModel,
    /// Bits per pixel of the decoded buffer with default options (palette
    /// entry size for color-mapped images).
    pub bits_per_pixel: u32,
    /// Bits per stored pixel or palette index, as in the header.
    pub stored_bits_per_pixel: u32,
    pub attribute_bits: u8,
    pub origin: ImageOrigin,
    pub x_origin: u32,
    pub y_origin: u32,
    /// Color map entries declared by the header (0 if none).
    pub color_map_length: u32,
}

impl TgaInfo {
    /// Read the header at the start of a byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self, TgaError> {
        Self::from_reader(&mut SliceReader::new(data))
    }

    /// Read the 18-byte header from `src` and describe the image.
    pub fn from_reader(src: &mut dyn TgaRead) -> Result<Self, TgaError> {
        let header = TgaHeader::read(src)?;
        Self::from_header(&header, TgaOptions::empty())
    }

    pub(crate) fn from_header(header: &TgaHeader, options: TgaOptions) -> Result<Self, TgaError> {
        let image_type = header.image_type()?;
        let spec = &header.image;
        Ok(Self {
            width: u32::from(spec.width),
            height: u32::from(spec.height),
            image_type,
            color_model: image_type.color_model(),
            bits_per_pixel: effective_bits_per_pixel(header, image_type, options),
            stored_bits_per_pixel: u32::from(spec.bits_per_pixel),
            attribute_bits: spec.attribute_bits(),
            origin: spec.origin(),
            x_origin: u32::from(spec.x_origin),
            y_origin: u32::from(spec.y_origin),
            color_map_length: if header.color_map_type == 1 {
                u32::from(header.color_map.length)
            } else {
                0
            },
        })
    }
}

/// Depth of the decoded buffer: the palette entry size when a color-mapped
/// image is resolved, otherwise the stored depth.
pub(crate) fn effective_bits_per_pixel(
    header: &TgaHeader,
    image_type: ImageType,
    options: TgaOptions,
) -> u32 {
    if image_type.is_color_mapped()
        && header.has_color_map()
        && !options.contains(TgaOptions::RETURN_COLOR_MAP)
    {
        u32::from(header.color_map.entry_size)
    } else {
        u32::from(header.image.bits_per_pixel)
    }
}
