//! Pixel-fetch strategies.
//!
//! A [`PixelSource`] turns encoded pixel units from the stream into output
//! pixels. Where each output pixel lands is decided separately by a
//! [`Placement`]; the two are chosen once per decode and combined by
//! [`fetch_pixels`] and [`fetch_repeated`].

use crate::error::TgaError;
use crate::io::TgaRead;
use crate::remap::Placement;

/// Widest pixel the codec handles (128 bits).
pub(crate) const MAX_PIXEL_BYTES: usize = 16;

/// Palette indices resolved per read in the batched palette path.
const INDEX_CHUNK: usize = 256;

/// Resolves encoded pixel units into output pixels.
pub(crate) trait PixelSource {
    /// Bytes per encoded unit in the stream.
    fn input_bytes(&self) -> usize;

    /// Bytes per output pixel.
    fn output_bytes(&self) -> usize;

    /// Resolve one unit (`input.len() == input_bytes()`) into
    /// `out` (`out.len() == output_bytes()`).
    fn resolve(&self, input: &[u8], out: &mut [u8]) -> Result<(), TgaError>;

    /// Read `out.len() / output_bytes()` contiguous units into `out`.
    fn fetch_batch(&self, src: &mut dyn TgaRead, out: &mut [u8]) -> Result<(), TgaError>;
}

/// Copies stream bytes straight through.
pub(crate) struct Direct {
    bytes_per_pixel: usize,
}

impl Direct {
    pub(crate) fn new(bytes_per_pixel: usize) -> Self {
        debug_assert!(bytes_per_pixel <= MAX_PIXEL_BYTES);
        Self { bytes_per_pixel }
    }
}

impl PixelSource for Direct {
    fn input_bytes(&self) -> usize {
        self.bytes_per_pixel
    }

    fn output_bytes(&self) -> usize {
        self.bytes_per_pixel
    }

    fn resolve(&self, input: &[u8], out: &mut [u8]) -> Result<(), TgaError> {
        out.copy_from_slice(input);
        Ok(())
    }

    fn fetch_batch(&self, src: &mut dyn TgaRead, out: &mut [u8]) -> Result<(), TgaError> {
        src.read_exact(out)
    }
}

/// Reads little-endian palette indices and copies the addressed entry.
pub(crate) struct PaletteLookup<'a> {
    index_bytes: usize,
    entry_bytes: usize,
    palette: &'a [u8],
}

impl<'a> PaletteLookup<'a> {
    /// `index_bytes` is 1, 2 or 3; `palette.len()` is a multiple of `entry_bytes`.
    pub(crate) fn new(index_bytes: usize, entry_bytes: usize, palette: &'a [u8]) -> Self {
        debug_assert!((1..=3).contains(&index_bytes));
        Self {
            index_bytes,
            entry_bytes,
            palette,
        }
    }

    fn entries(&self) -> usize {
        self.palette.len() / self.entry_bytes
    }
}

impl PixelSource for PaletteLookup<'_> {
    fn input_bytes(&self) -> usize {
        self.index_bytes
    }

    fn output_bytes(&self) -> usize {
        self.entry_bytes
    }

    fn resolve(&self, input: &[u8], out: &mut [u8]) -> Result<(), TgaError> {
        let index = input
            .iter()
            .rev()
            .fold(0usize, |acc, &b| (acc << 8) | usize::from(b));
        let start = index * self.entry_bytes;
        let entry = self
            .palette
            .get(start..start + self.entry_bytes)
            .ok_or_else(|| {
                TgaError::InvalidData(alloc::format!(
                    "palette index {index} out of range (palette has {} entries)",
                    self.entries()
                ))
            })?;
        out.copy_from_slice(entry);
        Ok(())
    }

    fn fetch_batch(&self, src: &mut dyn TgaRead, out: &mut [u8]) -> Result<(), TgaError> {
        let mut indices = [0u8; INDEX_CHUNK * 3];
        for chunk in out.chunks_mut(INDEX_CHUNK * self.entry_bytes) {
            let count = chunk.len() / self.entry_bytes;
            let raw = &mut indices[..count * self.index_bytes];
            src.read_exact(raw)?;
            for (px, index) in chunk
                .chunks_exact_mut(self.entry_bytes)
                .zip(raw.chunks_exact(self.index_bytes))
            {
                self.resolve(index, px)?;
            }
        }
        Ok(())
    }
}

/// Read `count` consecutive units for pixels `start..start + count`.
///
/// One batched read when the placement is the identity, otherwise one read
/// and one placement per pixel.
pub(crate) fn fetch_pixels(
    src: &mut dyn TgaRead,
    source: &dyn PixelSource,
    placement: &Placement,
    out: &mut [u8],
    start: usize,
    count: usize,
) -> Result<(), TgaError> {
    let ob = source.output_bytes();
    if placement.is_identity() {
        let begin = start * ob;
        return source.fetch_batch(src, &mut out[begin..begin + count * ob]);
    }
    let ib = source.input_bytes();
    let mut unit = [0u8; MAX_PIXEL_BYTES];
    for i in start..start + count {
        src.read_exact(&mut unit[..ib])?;
        let off = placement.offset(i);
        source.resolve(&unit[..ib], &mut out[off..off + ob])?;
    }
    Ok(())
}

/// Read one unit and write it to pixels `start..start + count`.
pub(crate) fn fetch_repeated(
    src: &mut dyn TgaRead,
    source: &dyn PixelSource,
    placement: &Placement,
    out: &mut [u8],
    start: usize,
    count: usize,
) -> Result<(), TgaError> {
    let ib = source.input_bytes();
    let ob = source.output_bytes();
    let mut unit = [0u8; MAX_PIXEL_BYTES];
    src.read_exact(&mut unit[..ib])?;
    let mut pixel = [0u8; MAX_PIXEL_BYTES];
    source.resolve(&unit[..ib], &mut pixel[..ob])?;
    for i in start..start + count {
        let off = placement.offset(i);
        out[off..off + ob].copy_from_slice(&pixel[..ob]);
    }
    Ok(())
}
