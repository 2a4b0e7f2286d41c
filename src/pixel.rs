/// Byte layout of a decoded TGA pixel buffer, when it is a plain
/// 8-bit-per-channel layout.
///
/// TGA stores true-color pixels blue first, so 24- and 32-bit RGB images
/// are `Bgr8` / `Bgra8`. 16-bit RGB (5-5-5-1) and wider depths have no
/// byte-per-channel layout and map to no variant.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelLayout {
    /// Single channel, 8-bit greyscale.
    Gray8,
    /// 3 channels, 8-bit BGR.
    Bgr8,
    /// 4 channels, 8-bit BGRA.
    Bgra8,
}

impl PixelLayout {
    /// Bytes per pixel for this layout.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Bgr8 => 3,
            Self::Bgra8 => 4,
        }
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        self.bytes_per_pixel()
    }
}

/// Pixel types an image can be viewed as.
#[cfg(feature = "rgb")]
pub trait TgaPixel: Copy + 'static {
    fn layout() -> PixelLayout;
}

#[cfg(feature = "rgb")]
impl TgaPixel for rgb::alt::BGR8 {
    fn layout() -> PixelLayout {
        PixelLayout::Bgr8
    }
}

#[cfg(feature = "rgb")]
impl TgaPixel for rgb::alt::BGRA8 {
    fn layout() -> PixelLayout {
        PixelLayout::Bgra8
    }
}
