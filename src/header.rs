//! The fixed 18-byte TGA header.
//!
//! Layout (all multi-byte fields little-endian):
//!
//! | offset | size | field                  |
//! |--------|------|------------------------|
//! | 0      | 1    | image ID length        |
//! | 1      | 1    | color map type         |
//! | 2      | 1    | image type             |
//! | 3      | 2    | first color map entry  |
//! | 5      | 2    | color map length       |
//! | 7      | 1    | color map entry size   |
//! | 8      | 2    | x origin               |
//! | 10     | 2    | y origin               |
//! | 12     | 2    | width                  |
//! | 14     | 2    | height                 |
//! | 16     | 1    | bits per pixel         |
//! | 17     | 1    | image descriptor       |

use crate::error::TgaError;
use crate::image::{ColorModel, ImageOrigin};
use crate::io::{TgaRead, TgaWrite};

/// Image type codes understood by the codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ImageType {
    /// 1: uncompressed, color-mapped.
    ColorMapped = 1,
    /// 2: uncompressed, true-color.
    TrueColor = 2,
    /// 3: uncompressed, greyscale.
    Greyscale = 3,
    /// 9: run-length encoded, color-mapped.
    RleColorMapped = 9,
    /// 10: run-length encoded, true-color.
    RleTrueColor = 10,
    /// 11: run-length encoded, greyscale.
    RleGreyscale = 11,
}

impl ImageType {
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            1 => Self::ColorMapped,
            2 => Self::TrueColor,
            3 => Self::Greyscale,
            9 => Self::RleColorMapped,
            10 => Self::RleTrueColor,
            11 => Self::RleGreyscale,
            _ => return None,
        })
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_rle(self) -> bool {
        matches!(
            self,
            Self::RleColorMapped | Self::RleTrueColor | Self::RleGreyscale
        )
    }

    pub fn is_color_mapped(self) -> bool {
        matches!(self, Self::ColorMapped | Self::RleColorMapped)
    }

    /// Color model implied by this image type.
    pub fn color_model(self) -> ColorModel {
        match self {
            Self::ColorMapped | Self::TrueColor | Self::RleColorMapped | Self::RleTrueColor => {
                ColorModel::Rgb
            }
            Self::Greyscale | Self::RleGreyscale => ColorModel::Greyscale,
        }
    }

    /// Pick the type code for a color model, palette presence and compression.
    ///
    /// Returns `None` for combinations TGA cannot express.
    pub fn for_model(model: ColorModel, color_mapped: bool, rle: bool) -> Option<Self> {
        let ty = match (model, color_mapped) {
            (ColorModel::Rgb, true) => Self::ColorMapped,
            (ColorModel::Rgb, false) => Self::TrueColor,
            (ColorModel::Greyscale, false) => Self::Greyscale,
            (ColorModel::Greyscale, true) | (ColorModel::Unknown, _) => return None,
        };
        Some(if rle { ty.with_rle() } else { ty })
    }

    fn with_rle(self) -> Self {
        match self {
            Self::ColorMapped | Self::RleColorMapped => Self::RleColorMapped,
            Self::TrueColor | Self::RleTrueColor => Self::RleTrueColor,
            Self::Greyscale | Self::RleGreyscale => Self::RleGreyscale,
        }
    }
}

/// Color map specification (header bytes 3..8).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColorMapSpec {
    pub first_entry_index: u16,
    pub length: u16,
    /// Bits per color map entry.
    pub entry_size: u8,
}

impl ColorMapSpec {
    /// Bytes the color map occupies on the wire.
    pub fn byte_len(&self) -> usize {
        usize::from(self.length) * usize::from(self.entry_size).div_ceil(8)
    }
}

/// Image specification (header bytes 8..18).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImageSpec {
    pub x_origin: u16,
    pub y_origin: u16,
    pub width: u16,
    pub height: u16,
    pub bits_per_pixel: u8,
    /// Bits 0–3: attribute bits per pixel. Bits 4–5: origin corner.
    pub descriptor: u8,
}

impl ImageSpec {
    pub fn attribute_bits(&self) -> u8 {
        self.descriptor & 0x0F
    }

    pub fn origin(&self) -> ImageOrigin {
        ImageOrigin::from_bits(self.descriptor >> 4)
    }

    /// Build a descriptor byte. `attribute_bits` is truncated to 4 bits.
    pub fn descriptor_for(attribute_bits: u8, origin: ImageOrigin) -> u8 {
        (attribute_bits & 0x0F) | (origin.bits() << 4)
    }
}

/// The 18-byte TGA file header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TgaHeader {
    pub id_length: u8,
    pub color_map_type: u8,
    /// Raw image type code; see [`ImageType`].
    pub image_type: u8,
    pub color_map: ColorMapSpec,
    pub image: ImageSpec,
}

impl TgaHeader {
    pub const SIZE: usize = 18;

    pub fn from_bytes(b: &[u8; Self::SIZE]) -> Self {
        let le = |i: usize| u16::from_le_bytes([b[i], b[i + 1]]);
        Self {
            id_length: b[0],
            color_map_type: b[1],
            image_type: b[2],
            color_map: ColorMapSpec {
                first_entry_index: le(3),
                length: le(5),
                entry_size: b[7],
            },
            image: ImageSpec {
                x_origin: le(8),
                y_origin: le(10),
                width: le(12),
                height: le(14),
                bits_per_pixel: b[16],
                descriptor: b[17],
            },
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut b = [0u8; Self::SIZE];
        b[0] = self.id_length;
        b[1] = self.color_map_type;
        b[2] = self.image_type;
        b[3..5].copy_from_slice(&self.color_map.first_entry_index.to_le_bytes());
        b[5..7].copy_from_slice(&self.color_map.length.to_le_bytes());
        b[7] = self.color_map.entry_size;
        b[8..10].copy_from_slice(&self.image.x_origin.to_le_bytes());
        b[10..12].copy_from_slice(&self.image.y_origin.to_le_bytes());
        b[12..14].copy_from_slice(&self.image.width.to_le_bytes());
        b[14..16].copy_from_slice(&self.image.height.to_le_bytes());
        b[16] = self.image.bits_per_pixel;
        b[17] = self.image.descriptor;
        b
    }

    /// Read the header. A short stream is an I/O-class error.
    pub fn read(src: &mut dyn TgaRead) -> Result<Self, TgaError> {
        let mut b = [0u8; Self::SIZE];
        src.read_exact(&mut b)?;
        Ok(Self::from_bytes(&b))
    }

    pub fn write(&self, sink: &mut dyn TgaWrite) -> Result<(), TgaError> {
        sink.write_all(&self.to_bytes())
    }

    /// The recognized image type, or `InvalidData` for any other code.
    pub fn image_type(&self) -> Result<ImageType, TgaError> {
        ImageType::from_code(self.image_type).ok_or_else(|| {
            TgaError::InvalidData(alloc::format!("unknown image type {}", self.image_type))
        })
    }

    /// True when the header carries a color map section.
    pub fn has_color_map(&self) -> bool {
        self.color_map_type == 1 && self.color_map.length > 0
    }
}
