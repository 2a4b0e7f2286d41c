//! Byte sources and sinks the codec reads from and writes to.
//!
//! The codec only ever needs three things from a stream: fill a buffer
//! completely, skip forward, and write a buffer completely. [`TgaRead`] and
//! [`TgaWrite`] capture exactly that so the same decode/encode path serves
//! in-memory slices (`no_std`) and `std::io` streams.

use alloc::vec::Vec;

use crate::error::TgaError;

/// A readable, forward-skippable byte source.
pub trait TgaRead {
    /// Fill `buf` completely or fail with an I/O-class error.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), TgaError>;

    /// Advance past `n` bytes.
    fn skip(&mut self, n: usize) -> Result<(), TgaError>;

    fn read_u8(&mut self) -> Result<u8, TgaError> {
        let mut b = [0u8; 1];
        self.read_exact(&mut b)?;
        Ok(b[0])
    }
}

/// A writable byte sink.
pub trait TgaWrite {
    /// Write all of `buf` or fail with an I/O-class error.
    fn write_all(&mut self, buf: &[u8]) -> Result<(), TgaError>;
}

impl<T: TgaRead + ?Sized> TgaRead for &mut T {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), TgaError> {
        (**self).read_exact(buf)
    }

    fn skip(&mut self, n: usize) -> Result<(), TgaError> {
        (**self).skip(n)
    }
}

impl<T: TgaWrite + ?Sized> TgaWrite for &mut T {
    fn write_all(&mut self, buf: &[u8]) -> Result<(), TgaError> {
        (**self).write_all(buf)
    }
}

impl TgaWrite for Vec<u8> {
    fn write_all(&mut self, buf: &[u8]) -> Result<(), TgaError> {
        self.extend_from_slice(buf);
        Ok(())
    }
}

// ── Cursor over &[u8] ───────────────────────────────────────────────

/// In-memory byte source over a borrowed slice.
#[derive(Clone, Debug)]
pub struct SliceReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current read offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

impl TgaRead for SliceReader<'_> {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), TgaError> {
        let end = self
            .pos
            .checked_add(buf.len())
            .ok_or(TgaError::UnexpectedEof)?;
        let src = self.data.get(self.pos..end).ok_or(TgaError::UnexpectedEof)?;
        buf.copy_from_slice(src);
        self.pos = end;
        Ok(())
    }

    fn skip(&mut self, n: usize) -> Result<(), TgaError> {
        let new_pos = self.pos.checked_add(n).ok_or(TgaError::UnexpectedEof)?;
        if new_pos > self.data.len() {
            return Err(TgaError::UnexpectedEof);
        }
        self.pos = new_pos;
        Ok(())
    }

    fn read_u8(&mut self) -> Result<u8, TgaError> {
        let b = *self.data.get(self.pos).ok_or(TgaError::UnexpectedEof)?;
        self.pos += 1;
        Ok(b)
    }
}

// ── std::io adapters ────────────────────────────────────────────────

/// Byte source over any `std::io::Read` stream.
///
/// Skips read and discard, so a stream that ends inside a skipped section
/// fails the same way a short read does.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoReader<R> {
    inner: R,
}

#[cfg(feature = "std")]
impl<R: std::io::Read> IoReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[cfg(feature = "std")]
fn map_read_error(e: std::io::Error) -> TgaError {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        TgaError::UnexpectedEof
    } else {
        TgaError::Io(e)
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read> TgaRead for IoReader<R> {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), TgaError> {
        self.inner.read_exact(buf).map_err(map_read_error)
    }

    fn skip(&mut self, n: usize) -> Result<(), TgaError> {
        use std::io::Read as _;

        let wanted = n as u64;
        let skipped = std::io::copy(&mut (&mut self.inner).take(wanted), &mut std::io::sink())
            .map_err(map_read_error)?;
        if skipped < wanted {
            return Err(TgaError::UnexpectedEof);
        }
        Ok(())
    }
}

/// Byte sink over any `std::io::Write` stream.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoWriter<W> {
    inner: W,
}

#[cfg(feature = "std")]
impl<W: std::io::Write> IoWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(feature = "std")]
impl<W: std::io::Write> TgaWrite for IoWriter<W> {
    fn write_all(&mut self, buf: &[u8]) -> Result<(), TgaError> {
        self.inner.write_all(buf).map_err(TgaError::Io)
    }
}
