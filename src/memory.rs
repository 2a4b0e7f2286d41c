//! Buffer acquisition.
//!
//! The decoder never allocates image or palette storage itself; it asks a
//! [`MemoryProvider`]. Embedders that want arena, pool, or texture-backed
//! storage implement the trait and pass it through
//! [`DecodeRequest::with_memory_provider`](crate::DecodeRequest::with_memory_provider).
//! Pixels can also go straight into a caller-owned slice with
//! [`DecodeRequest::decode_into`](crate::DecodeRequest::decode_into), in
//! which case only palettes are requested here.

use alloc::vec::Vec;

use crate::log::trace;

/// What a requested buffer will hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BufferPurpose {
    /// Decoded pixel data; owned by the returned image.
    ImageData,
    /// Palette returned to the caller with the image.
    PersistentPalette,
    /// Palette used only while pixels are resolved, then handed back
    /// through [`MemoryProvider::release`].
    TransientPalette,
}

/// Allocation capability used by the decoder.
pub trait MemoryProvider {
    /// Return a zeroed buffer of exactly
    /// `bits_per_pixel / 8 * width * height` bytes, or `None` if the
    /// allocation cannot be satisfied.
    ///
    /// Palettes are requested with `width` = entry count and `height` = 1.
    fn allocate(
        &mut self,
        bits_per_pixel: u32,
        width: u32,
        height: u32,
        purpose: BufferPurpose,
    ) -> Option<Vec<u8>>;

    /// Take back a buffer the decoder no longer needs. Only transient
    /// palettes are released. The default drops it.
    fn release(&mut self, buffer: Vec<u8>, purpose: BufferPurpose) {
        let _ = (buffer, purpose);
    }
}

/// Byte size of a buffer request, or `None` on overflow.
pub fn buffer_len(bits_per_pixel: u32, width: u32, height: u32) -> Option<usize> {
    (bits_per_pixel as usize / 8)
        .checked_mul(width as usize)?
        .checked_mul(height as usize)
}

/// Heap provider with a reusable scratch region for small transient palettes.
///
/// Transient palettes of at most [`SCRATCH_THRESHOLD`](Self::SCRATCH_THRESHOLD)
/// bytes reuse one retained buffer across decode calls; anything larger, and
/// all image data and persistent palettes, comes from a fresh fallible heap
/// allocation.
#[derive(Debug, Default)]
pub struct DefaultMemoryProvider {
    scratch: Vec<u8>,
    /// Address and capacity of the scratch buffer while it is lent out.
    lent: Option<(usize, usize)>,
}

impl DefaultMemoryProvider {
    /// Largest transient palette served from the scratch region.
    /// Covers a full 256-entry palette of 32-bit entries.
    pub const SCRATCH_THRESHOLD: usize = 1024;

    pub fn new() -> Self {
        Self::default()
    }

    fn heap(len: usize) -> Option<Vec<u8>> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(len).ok()?;
        buf.resize(len, 0);
        Some(buf)
    }

    fn take_scratch(&mut self, len: usize) -> Option<Vec<u8>> {
        if self.scratch.capacity() < Self::SCRATCH_THRESHOLD {
            self.scratch
                .try_reserve_exact(Self::SCRATCH_THRESHOLD - self.scratch.len())
                .ok()?;
        }
        let mut buf = core::mem::take(&mut self.scratch);
        buf.clear();
        buf.resize(len, 0);
        self.lent = Some((buf.as_ptr() as usize, buf.capacity()));
        Some(buf)
    }
}

impl MemoryProvider for DefaultMemoryProvider {
    fn allocate(
        &mut self,
        bits_per_pixel: u32,
        width: u32,
        height: u32,
        purpose: BufferPurpose,
    ) -> Option<Vec<u8>> {
        let len = buffer_len(bits_per_pixel, width, height)?;
        if purpose == BufferPurpose::TransientPalette
            && len <= Self::SCRATCH_THRESHOLD
            && self.lent.is_none()
        {
            trace!("serving {len}-byte transient palette from scratch");
            return self.take_scratch(len);
        }
        Self::heap(len)
    }

    fn release(&mut self, buffer: Vec<u8>, purpose: BufferPurpose) {
        if purpose == BufferPurpose::TransientPalette
            && self.lent == Some((buffer.as_ptr() as usize, buffer.capacity()))
        {
            self.scratch = buffer;
            self.lent = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_from_depth_and_dimensions() {
        assert_eq!(buffer_len(24, 4, 3), Some(36));
        assert_eq!(buffer_len(8, 0, 100), Some(0));
        let mut p = DefaultMemoryProvider::new();
        let buf = p.allocate(32, 5, 2, BufferPurpose::ImageData).unwrap();
        assert_eq!(buf.len(), 40);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn small_transient_palette_reuses_scratch() {
        let mut p = DefaultMemoryProvider::new();
        let mut first = p
            .allocate(24, 256, 1, BufferPurpose::TransientPalette)
            .unwrap();
        assert_eq!(first.len(), 768);
        first[0] = 0xAB;
        let ptr = first.as_ptr();
        p.release(first, BufferPurpose::TransientPalette);

        let second = p
            .allocate(8, 16, 1, BufferPurpose::TransientPalette)
            .unwrap();
        assert_eq!(second.len(), 16);
        assert_eq!(second.as_ptr(), ptr);
        // Reused storage is handed out zeroed.
        assert_eq!(second[0], 0);
    }

    #[test]
    fn large_transient_palette_goes_to_heap() {
        let mut p = DefaultMemoryProvider::new();
        let big = p
            .allocate(24, 1024, 1, BufferPurpose::TransientPalette)
            .unwrap();
        assert_eq!(big.len(), 3072);
        assert!(p.lent.is_none());
        p.release(big, BufferPurpose::TransientPalette);
        assert!(p.scratch.is_empty());
    }

    #[test]
    fn persistent_palette_never_uses_scratch() {
        let mut p = DefaultMemoryProvider::new();
        let pal = p
            .allocate(24, 4, 1, BufferPurpose::PersistentPalette)
            .unwrap();
        assert_eq!(pal.len(), 12);
        assert!(p.lent.is_none());
    }

    #[test]
    fn scratch_threshold_is_inclusive() {
        let mut p = DefaultMemoryProvider::new();
        let at = p
            .allocate(8, 1024, 1, BufferPurpose::TransientPalette)
            .unwrap();
        assert_eq!(at.len(), 1024);
        assert!(p.lent.is_some());
        p.release(at, BufferPurpose::TransientPalette);
        assert!(p.lent.is_none());

        let over = p
            .allocate(8, 1025, 1, BufferPurpose::TransientPalette)
            .unwrap();
        assert_eq!(over.len(), 1025);
        assert!(p.lent.is_none());
        assert_ne!(over.as_ptr(), p.scratch.as_ptr());
    }

    #[test]
    fn only_the_lent_buffer_restores_scratch() {
        let mut p = DefaultMemoryProvider::new();
        let lent = p
            .allocate(24, 256, 1, BufferPurpose::TransientPalette)
            .unwrap();
        let lent_ptr = lent.as_ptr();

        // Scratch is out, so a second small palette comes from the heap.
        let other = p
            .allocate(8, 1000, 1, BufferPurpose::TransientPalette)
            .unwrap();
        assert_ne!(other.as_ptr(), lent_ptr);
        p.release(other, BufferPurpose::TransientPalette);
        assert!(p.lent.is_some());

        // A foreign buffer of scratch-like capacity is dropped, not adopted.
        let mut foreign = Vec::with_capacity(1500);
        foreign.resize(1500, 0u8);
        p.release(foreign, BufferPurpose::TransientPalette);
        assert!(p.lent.is_some());

        p.release(lent, BufferPurpose::TransientPalette);
        assert!(p.lent.is_none());
        let again = p
            .allocate(8, 4, 1, BufferPurpose::TransientPalette)
            .unwrap();
        assert_eq!(again.as_ptr(), lent_ptr);
    }
}
