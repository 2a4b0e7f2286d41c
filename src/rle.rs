//! TGA run-length packets.
//!
//! Each packet starts with one header byte. If the high bit is set the
//! packet is a run: `(header & 0x7F) + 1` copies of the single pixel that
//! follows. Otherwise it is a raw packet of `(header & 0x7F) + 1` literal
//! pixels. Packets may cross row boundaries.

use alloc::vec::Vec;
use enough::Stop;

use crate::error::TgaError;
use crate::fetch::{PixelSource, fetch_pixels, fetch_repeated};
use crate::io::{TgaRead, TgaWrite};
use crate::log::trace;
use crate::remap::Placement;

/// Most pixels a single packet can describe.
pub(crate) const MAX_PACKET_PIXELS: usize = 128;

const RUN_FLAG: u8 = 0x80;

/// Packets between cancellation checks.
const STOP_INTERVAL: usize = 64;

/// Decode packets until `placement.pixel_count()` pixels are written to `out`.
pub(crate) fn decompress(
    src: &mut dyn TgaRead,
    source: &dyn PixelSource,
    placement: &Placement,
    out: &mut [u8],
    stop: &dyn Stop,
) -> Result<(), TgaError> {
    let total = placement.pixel_count();
    let mut emitted = 0usize;
    let mut packets = 0usize;

    while emitted < total {
        if packets % STOP_INTERVAL == 0 {
            stop.check()?;
        }
        packets += 1;

        let header = src.read_u8()?;
        let count = usize::from(header & 0x7F) + 1;
        let remaining = total - emitted;
        if count > remaining {
            return Err(TgaError::InvalidData(alloc::format!(
                "RLE packet of {count} pixels overruns image ({remaining} pixels left)"
            )));
        }

        if header & RUN_FLAG != 0 {
            fetch_repeated(src, source, placement, out, emitted, count)?;
        } else {
            fetch_pixels(src, source, placement, out, emitted, count)?;
        }
        emitted += count;
    }

    trace!("decoded {total} pixels from {packets} RLE packets");
    Ok(())
}

/// Pixels of an image buffer read in stream order.
struct StreamOrder<'a> {
    pixels: &'a [u8],
    placement: &'a Placement,
}

impl<'a> StreamOrder<'a> {
    #[inline]
    fn get(&self, i: usize) -> &'a [u8] {
        let off = self.placement.offset(i);
        &self.pixels[off..off + self.placement.bytes_per_pixel()]
    }

    /// Length of the run of identical pixels starting at `start`.
    fn run_length(&self, start: usize, end: usize) -> usize {
        let first = self.get(start);
        let limit = (end - start).min(MAX_PACKET_PIXELS);
        let mut n = 1;
        while n < limit && self.get(start + n) == first {
            n += 1;
        }
        n
    }

    /// Length of a raw packet starting at `start`: it grows until the next
    /// pixel would begin a run.
    fn raw_length(&self, start: usize, end: usize) -> usize {
        let limit = (end - start).min(MAX_PACKET_PIXELS);
        let mut n = 1;
        while n < limit {
            let k = start + n;
            if k + 1 < end && self.get(k) == self.get(k + 1) {
                break;
            }
            n += 1;
        }
        n
    }
}

/// Encode `pixels` (laid out per `placement`) as RLE packets in stream order.
///
/// Runs of two or more identical pixels become run packets, everything
/// else raw packets. A single-pixel image yields one raw packet.
pub(crate) fn compress(
    sink: &mut dyn TgaWrite,
    pixels: &[u8],
    placement: &Placement,
    stop: &dyn Stop,
) -> Result<(), TgaError> {
    let total = placement.pixel_count();
    let bpp = placement.bytes_per_pixel();
    let order = StreamOrder { pixels, placement };
    let mut packet = Vec::with_capacity(1 + MAX_PACKET_PIXELS * bpp);
    let mut i = 0usize;
    let mut packets = 0usize;

    while i < total {
        if packets % STOP_INTERVAL == 0 {
            stop.check()?;
        }
        packets += 1;

        packet.clear();
        let run = order.run_length(i, total);
        if run >= 2 {
            packet.push(RUN_FLAG | (run - 1) as u8);
            packet.extend_from_slice(order.get(i));
            i += run;
        } else {
            let raw = order.raw_length(i, total);
            packet.push((raw - 1) as u8);
            for k in i..i + raw {
                packet.extend_from_slice(order.get(k));
            }
            i += raw;
        }
        sink.write_all(&packet)?;
    }

    trace!("encoded {total} pixels into {packets} RLE packets");
    Ok(())
}
