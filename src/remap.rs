//! Orientation transforms shared by decode (scatter) and encode (gather).

use crate::options::TgaOptions;

/// Which axes to mirror.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Flip {
    #[default]
    None,
    /// Reverse row order.
    Vertical,
    /// Reverse column order within each row.
    Horizontal,
    /// Reverse both, i.e. reverse the whole pixel sequence.
    Both,
}

impl Flip {
    pub fn from_options(options: TgaOptions) -> Self {
        match (
            options.contains(TgaOptions::FLIP_VERTICALLY),
            options.contains(TgaOptions::FLIP_HORIZONTALLY),
        ) {
            (false, false) => Self::None,
            (true, false) => Self::Vertical,
            (false, true) => Self::Horizontal,
            (true, true) => Self::Both,
        }
    }
}

/// Maps a row-major pixel index to a byte offset in an image buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Placement {
    flip: Flip,
    width: usize,
    height: usize,
    bytes_per_pixel: usize,
}

impl Placement {
    pub(crate) fn new(flip: Flip, width: usize, height: usize, bytes_per_pixel: usize) -> Self {
        Self {
            flip,
            width,
            height,
            bytes_per_pixel,
        }
    }

    /// Whether pixel `i` always lives at `i * bytes_per_pixel`; the batched
    /// paths are only valid then.
    pub(crate) fn is_identity(&self) -> bool {
        // A single row or column makes one of the flips a no-op.
        match self.flip {
            Flip::None => true,
            Flip::Vertical => self.height <= 1,
            Flip::Horizontal => self.width <= 1,
            Flip::Both => self.width * self.height <= 1,
        }
    }

    pub(crate) fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub(crate) fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_pixel
    }

    pub(crate) fn width(&self) -> usize {
        self.width
    }

    /// Byte offset of pixel `i` (`i < width * height`).
    #[inline]
    pub(crate) fn offset(&self, i: usize) -> usize {
        let pixel = match self.flip {
            Flip::None => i,
            Flip::Vertical => {
                let (row, col) = (i / self.width, i % self.width);
                (self.height - 1 - row) * self.width + col
            }
            Flip::Horizontal => {
                let (row, col) = (i / self.width, i % self.width);
                row * self.width + (self.width - 1 - col)
            }
            Flip::Both => self.width * self.height - 1 - i,
        };
        pixel * self.bytes_per_pixel
    }
}
