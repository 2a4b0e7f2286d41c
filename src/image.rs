use alloc::vec::Vec;

#[cfg(feature = "rgb")]
use rgb::AsPixels as _;

use crate::error::TgaError;
use crate::palette::ColorMap;
use crate::pixel::PixelLayout;

/// Pixel buffers hold whole bytes per pixel, at most 16 of them.
pub(crate) fn check_depth(bits_per_pixel: u32) -> Result<(), TgaError> {
    if bits_per_pixel == 0 || bits_per_pixel % 8 != 0 || bits_per_pixel > 128 {
        return Err(TgaError::UnsupportedPixelDepth(alloc::format!(
            "{bits_per_pixel} bits per pixel (must be a multiple of 8, at most 128)"
        )));
    }
    Ok(())
}

/// Corner of the image the first stored pixel belongs to (descriptor bits 4–5).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ImageOrigin {
    #[default]
    BottomLeft,
    BottomRight,
    TopLeft,
    TopRight,
}

impl ImageOrigin {
    /// From the two origin bits (already shifted down); higher bits are ignored.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::BottomLeft,
            0b01 => Self::BottomRight,
            0b10 => Self::TopLeft,
            _ => Self::TopRight,
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            Self::BottomLeft => 0b00,
            Self::BottomRight => 0b01,
            Self::TopLeft => 0b10,
            Self::TopRight => 0b11,
        }
    }
}

/// Interpretation of the pixel bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorModel {
    #[default]
    Unknown,
    Greyscale,
    Rgb,
}

/// A TGA image: pixel bytes exactly as stored in the file (BGR(A) order
/// for true-color), plus header metadata.
///
/// `pixels().len()` is always `width * height * bits_per_pixel / 8` for
/// images produced by the decoder or by [`TgaImage::new`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TgaImage {
    pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Bits per stored pixel; a multiple of 8.
    pub bits_per_pixel: u32,
    /// Alpha/attribute bits per pixel (0–15).
    pub attribute_bits: u8,
    pub origin: ImageOrigin,
    pub x_origin: u32,
    pub y_origin: u32,
    pub color_model: ColorModel,
    /// Palette, present when pixels are palette indices.
    pub color_map: Option<ColorMap>,
}

impl TgaImage {
    /// Create an image from pixel bytes.
    ///
    /// Fails if `bits_per_pixel` is not a multiple of 8 in `8..=128`, or if
    /// `pixels` is not exactly `width * height * bits_per_pixel / 8` bytes.
    pub fn new(
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        bits_per_pixel: u32,
        color_model: ColorModel,
    ) -> Result<Self, TgaError> {
        let image = Self::from_parts(pixels, width, height, bits_per_pixel, color_model);
        image.check_depth()?;
        image.check_len()?;
        Ok(image)
    }

    pub(crate) fn from_parts(
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        bits_per_pixel: u32,
        color_model: ColorModel,
    ) -> Self {
        Self {
            pixels,
            width,
            height,
            bits_per_pixel,
            attribute_bits: 0,
            origin: ImageOrigin::default(),
            x_origin: 0,
            y_origin: 0,
            color_model,
            color_map: None,
        }
    }

    pub fn with_origin(mut self, origin: ImageOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_attribute_bits(mut self, bits: u8) -> Self {
        self.attribute_bits = bits;
        self
    }

    pub fn with_offset(mut self, x: u32, y: u32) -> Self {
        self.x_origin = x;
        self.y_origin = y;
        self
    }

    /// Attach a palette; the pixel bytes are then palette indices.
    pub fn with_color_map(mut self, map: ColorMap) -> Self {
        self.color_map = Some(map);
        self
    }

    /// Access the pixel data.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable access to the pixel data. The length cannot change.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Take ownership of the pixel buffer.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.bits_per_pixel as usize / 8
    }

    /// Whether pixels are palette indices.
    pub fn is_color_mapped(&self) -> bool {
        self.color_map.is_some()
    }

    /// Byte layout, if it is a plain 8-bit-per-channel one.
    pub fn layout(&self) -> Option<PixelLayout> {
        if self.color_map.is_some() {
            return None;
        }
        match (self.color_model, self.bits_per_pixel) {
            (ColorModel::Greyscale, 8) => Some(PixelLayout::Gray8),
            (ColorModel::Rgb, 24) => Some(PixelLayout::Bgr8),
            (ColorModel::Rgb, 32) => Some(PixelLayout::Bgra8),
            _ => None,
        }
    }

    /// Expected pixel buffer length for the current dimensions and depth.
    pub fn expected_len(&self) -> Option<usize> {
        crate::memory::buffer_len(self.bits_per_pixel, self.width, self.height)
    }

    pub(crate) fn check_depth(&self) -> Result<(), TgaError> {
        check_depth(self.bits_per_pixel)
    }

    pub(crate) fn check_len(&self) -> Result<(), TgaError> {
        let expected = self.expected_len().ok_or(TgaError::DimensionsTooLarge {
            width: self.width,
            height: self.height,
        })?;
        if self.pixels.len() != expected {
            return Err(TgaError::InvalidData(alloc::format!(
                "pixel buffer is {} bytes, {}x{} at {} bpp needs {expected}",
                self.pixels.len(),
                self.width,
                self.height,
                self.bits_per_pixel
            )));
        }
        Ok(())
    }

    /// Reinterpret pixel data as a typed pixel slice.
    ///
    /// Returns [`TgaError::InvalidData`] if the layout doesn't match `P`.
    #[cfg(feature = "rgb")]
    pub fn as_pixels<P: crate::TgaPixel>(&self) -> Result<&[P], TgaError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        if self.layout() != Some(P::layout()) {
            return Err(TgaError::InvalidData(alloc::format!(
                "pixel layout mismatch: expected {:?}, got {:?}",
                P::layout(),
                self.layout()
            )));
        }
        Ok(self.pixels().as_pixels())
    }

    /// Zero-copy view as an [`imgref::ImgRef`] of typed pixels.
    #[cfg(feature = "imgref")]
    pub fn as_imgref<P: crate::TgaPixel>(&self) -> Result<imgref::ImgRef<'_, P>, TgaError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        let pixels: &[P] = self.as_pixels()?;
        Ok(imgref::ImgRef::new(
            pixels,
            self.width as usize,
            self.height as usize,
        ))
    }

    /// Copy into an [`imgref::ImgVec`] of typed pixels.
    #[cfg(feature = "imgref")]
    pub fn to_imgvec<P: crate::TgaPixel>(&self) -> Result<imgref::ImgVec<P>, TgaError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        let pixels: &[P] = self.as_pixels()?;
        Ok(imgref::ImgVec::new(
            pixels.to_vec(),
            self.width as usize,
            self.height as usize,
        ))
    }
}
