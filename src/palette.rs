//! Color maps and the palette loader.

use alloc::vec::Vec;

use crate::error::TgaError;
use crate::header::ColorMapSpec;
use crate::io::TgaRead;
use crate::memory::{BufferPurpose, MemoryProvider, buffer_len};

/// A TGA color map (palette).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorMap {
    bytes: Vec<u8>,
    first_entry_index: u16,
    length: u16,
    bits_per_entry: u8,
}

impl ColorMap {
    /// Wrap raw palette bytes, stored exactly as they appear in the file.
    ///
    /// `bits_per_entry` must be 8, 16 or 24, `length` non-zero, and
    /// `bytes.len()` must equal `length * bits_per_entry / 8`.
    pub fn new(bytes: Vec<u8>, length: u16, bits_per_entry: u8) -> Result<Self, TgaError> {
        check_entry_size(bits_per_entry)?;
        if length == 0 {
            return Err(TgaError::InvalidData("color map has no entries".into()));
        }
        let expected = usize::from(length) * usize::from(bits_per_entry / 8);
        if bytes.len() != expected {
            return Err(TgaError::InvalidData(alloc::format!(
                "color map of {length} x {bits_per_entry}-bit entries needs {expected} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self {
            bytes,
            first_entry_index: 0,
            length,
            bits_per_entry,
        })
    }

    /// Set the header's "first entry index" field carried through encode.
    pub fn with_first_entry_index(mut self, index: u16) -> Self {
        self.first_entry_index = index;
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        usize::from(self.length)
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn bits_per_entry(&self) -> u8 {
        self.bits_per_entry
    }

    pub fn bytes_per_entry(&self) -> usize {
        usize::from(self.bits_per_entry / 8)
    }

    pub fn first_entry_index(&self) -> u16 {
        self.first_entry_index
    }

    /// Raw bytes of entry `index`.
    pub fn entry(&self, index: usize) -> Option<&[u8]> {
        let n = self.bytes_per_entry();
        let start = index.checked_mul(n)?;
        self.bytes.get(start..start.checked_add(n)?)
    }

    /// Header color map section describing this palette.
    pub(crate) fn spec(&self) -> ColorMapSpec {
        ColorMapSpec {
            first_entry_index: self.first_entry_index,
            length: self.length,
            entry_size: self.bits_per_entry,
        }
    }
}

/// Palette entries must be whole bytes, at most 3 of them.
pub(crate) fn check_entry_size(bits: u8) -> Result<(), TgaError> {
    match bits {
        8 | 16 | 24 => Ok(()),
        other => Err(TgaError::UnsupportedPixelDepth(alloc::format!(
            "color map entry size {other} (supported: 8, 16, 24)"
        ))),
    }
}

/// Palette indices are 1, 2 or 3 little-endian bytes.
pub(crate) fn check_index_size(bits: u32) -> Result<(), TgaError> {
    match bits {
        8 | 16 | 24 => Ok(()),
        other => Err(TgaError::UnsupportedPixelDepth(alloc::format!(
            "color map index size {other} (supported: 8, 16, 24)"
        ))),
    }
}

/// Read the color map section into a buffer from `provider`.
///
/// The caller releases transient buffers back to the provider.
pub(crate) fn load_palette(
    src: &mut dyn TgaRead,
    spec: &ColorMapSpec,
    purpose: BufferPurpose,
    provider: &mut dyn MemoryProvider,
) -> Result<Vec<u8>, TgaError> {
    let bits = u32::from(spec.entry_size);
    let entries = u32::from(spec.length);
    let len = buffer_len(bits, entries, 1).ok_or(TgaError::AllocationFailed { bytes: usize::MAX })?;
    let mut buf = provider
        .allocate(bits, entries, 1, purpose)
        .ok_or(TgaError::AllocationFailed { bytes: len })?;
    if buf.len() != len {
        return Err(TgaError::AllocationFailed { bytes: len });
    }
    if let Err(e) = src.read_exact(&mut buf) {
        if purpose == BufferPurpose::TransientPalette {
            provider.release(buf, purpose);
        }
        return Err(e);
    }
    Ok(buf)
}
