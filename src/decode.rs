//! Decode orchestration: header → depth → palette → buffer → pixels.

use alloc::vec::Vec;
use enough::Stop;

use crate::error::TgaError;
use crate::fetch::{Direct, PaletteLookup, PixelSource, fetch_pixels};
use crate::header::{ImageType, TgaHeader};
use crate::image::{TgaImage, check_depth};
use crate::info::{TgaInfo, effective_bits_per_pixel};
use crate::io::{SliceReader, TgaRead};
use crate::limits::Limits;
use crate::log::{debug, trace, warn};
use crate::memory::{BufferPurpose, DefaultMemoryProvider, MemoryProvider, buffer_len};
use crate::options::TgaOptions;
use crate::palette::{ColorMap, check_entry_size, check_index_size, load_palette};
use crate::remap::{Flip, Placement};
use crate::rle;

/// Rows copied between cancellation checks on uncompressed data.
const ROWS_PER_CHECK: usize = 16;

/// Builder for a TGA decode.
///
/// ```no_run
/// use zentga::{DecodeRequest, TgaOptions, Unstoppable};
///
/// let data: &[u8] = &[]; // your TGA bytes
/// let image = DecodeRequest::new()
///     .with_options(TgaOptions::FLIP_VERTICALLY)
///     .decode(data, Unstoppable)?;
/// println!("{}x{} @ {} bpp", image.width, image.height, image.bits_per_pixel);
/// # Ok::<(), zentga::TgaError>(())
/// ```
#[derive(Default)]
pub struct DecodeRequest<'a> {
    options: TgaOptions,
    limits: Option<&'a Limits>,
    provider: Option<&'a mut dyn MemoryProvider>,
}

/// Outcome of [`DecodeRequest::decode_into`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedInto {
    /// Header metadata. `bits_per_pixel` is the depth written to the buffer.
    pub info: TgaInfo,
    /// The palette, when [`TgaOptions::RETURN_COLOR_MAP`] kept it.
    pub color_map: Option<ColorMap>,
    /// Bytes written at the start of the output buffer.
    pub len: usize,
}

impl<'a> DecodeRequest<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: TgaOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Allocate the image and palette buffers through `provider` instead of
    /// a fresh [`DefaultMemoryProvider`].
    pub fn with_memory_provider(mut self, provider: &'a mut dyn MemoryProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Decode a complete TGA file held in memory.
    pub fn decode(self, data: &[u8], stop: impl Stop) -> Result<TgaImage, TgaError> {
        self.decode_from(&mut SliceReader::new(data), stop)
    }

    /// Decode from any [`TgaRead`] source, leaving it positioned after the
    /// last pixel byte.
    pub fn decode_from(self, src: &mut dyn TgaRead, stop: impl Stop) -> Result<TgaImage, TgaError> {
        self.run(|options, limits, provider| {
            decode_stream(src, options, limits, provider, &stop)
        })
    }

    /// Decode pixels straight into caller-owned memory, such as a mapped
    /// texture or an arena slice.
    ///
    /// `out` must hold at least `width * height * bits_per_pixel / 8` bytes
    /// for the depth being produced (see [`TgaInfo::bits_per_pixel`]; with
    /// [`TgaOptions::RETURN_COLOR_MAP`] it is the stored index depth).
    /// A shorter buffer fails with [`TgaError::AllocationFailed`] before any
    /// pixel is read. Palettes still come from the memory provider.
    pub fn decode_into(
        self,
        data: &[u8],
        out: &mut [u8],
        stop: impl Stop,
    ) -> Result<DecodedInto, TgaError> {
        self.decode_from_into(&mut SliceReader::new(data), out, stop)
    }

    /// [`decode_into`](Self::decode_into) over any [`TgaRead`] source.
    pub fn decode_from_into(
        self,
        src: &mut dyn TgaRead,
        out: &mut [u8],
        stop: impl Stop,
    ) -> Result<DecodedInto, TgaError> {
        self.run(|options, limits, provider| {
            decode_into_stream(src, out, options, limits, provider, &stop)
        })
    }

    /// Decode from a `std::io` stream.
    #[cfg(feature = "std")]
    pub fn decode_reader<R: std::io::Read>(
        self,
        reader: R,
        stop: impl Stop,
    ) -> Result<TgaImage, TgaError> {
        let mut src = crate::io::IoReader::new(reader);
        self.decode_from(&mut src, stop)
    }

    /// Open and decode a file.
    #[cfg(feature = "std")]
    pub fn decode_file<P: AsRef<std::path::Path>>(
        self,
        path: P,
        stop: impl Stop,
    ) -> Result<TgaImage, TgaError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| TgaError::CannotOpen {
            path: path.display().to_string(),
            source,
        })?;
        self.decode_reader(std::io::BufReader::new(file), stop)
    }

    fn run<T>(
        self,
        f: impl FnOnce(TgaOptions, Option<&Limits>, &mut dyn MemoryProvider) -> T,
    ) -> T {
        let mut fallback;
        let provider: &mut dyn MemoryProvider = match self.provider {
            Some(p) => p,
            None => {
                fallback = DefaultMemoryProvider::new();
                &mut fallback
            }
        };
        f(self.options, self.limits, provider)
    }
}

fn decode_stream(
    src: &mut dyn TgaRead,
    options: TgaOptions,
    limits: Option<&Limits>,
    provider: &mut dyn MemoryProvider,
    stop: &dyn Stop,
) -> Result<TgaImage, TgaError> {
    let plan = Plan::read(src, options, limits, stop)?;
    if let Some(limits) = limits {
        limits.check_bytes("image data", plan.len)?;
    }
    let palette = plan.load_palette(src, limits, provider)?;

    let pixels = acquire(provider, &plan).and_then(|mut out| {
        plan.decode_pixels(src, palette.as_deref(), &mut out, stop)?;
        Ok(out)
    });
    let color_map = plan.settle_palette(provider, palette);
    let pixels = pixels?;
    let color_map = color_map?;

    let header = &plan.header;
    let mut image = TgaImage::from_parts(
        pixels,
        plan.width,
        plan.height,
        plan.bits_per_pixel,
        plan.image_type.color_model(),
    );
    image.attribute_bits = header.image.attribute_bits();
    image.origin = header.image.origin();
    image.x_origin = u32::from(header.image.x_origin);
    image.y_origin = u32::from(header.image.y_origin);
    image.color_map = color_map;
    Ok(image)
}

fn decode_into_stream(
    src: &mut dyn TgaRead,
    out: &mut [u8],
    options: TgaOptions,
    limits: Option<&Limits>,
    provider: &mut dyn MemoryProvider,
    stop: &dyn Stop,
) -> Result<DecodedInto, TgaError> {
    let plan = Plan::read(src, options, limits, stop)?;
    if out.len() < plan.len {
        debug!("output buffer holds {} bytes, image needs {}", out.len(), plan.len);
        return Err(TgaError::AllocationFailed { bytes: plan.len });
    }
    let out = &mut out[..plan.len];
    let palette = plan.load_palette(src, limits, provider)?;

    let decoded = plan.decode_pixels(src, palette.as_deref(), out, stop);
    let color_map = plan.settle_palette(provider, palette);
    decoded?;

    Ok(DecodedInto {
        info: TgaInfo::from_header(&plan.header, options)?,
        color_map: color_map?,
        len: plan.len,
    })
}

/// Validated header and the buffer shape it implies.
struct Plan {
    header: TgaHeader,
    image_type: ImageType,
    options: TgaOptions,
    bits_per_pixel: u32,
    width: u32,
    height: u32,
    len: usize,
}

impl Plan {
    /// Read and validate the header, then skip the image ID.
    fn read(
        src: &mut dyn TgaRead,
        options: TgaOptions,
        limits: Option<&Limits>,
        stop: &dyn Stop,
    ) -> Result<Self, TgaError> {
        let header = TgaHeader::read(src)?;
        let image_type = header.image_type()?;

        if image_type.is_color_mapped() {
            if !header.has_color_map() {
                return Err(TgaError::InvalidData(alloc::format!(
                    "image type {} needs a color map, header declares type {} with {} entries",
                    header.image_type,
                    header.color_map_type,
                    header.color_map.length
                )));
            }
            check_entry_size(header.color_map.entry_size)?;
            check_index_size(u32::from(header.image.bits_per_pixel))?;
        }

        let bits_per_pixel = effective_bits_per_pixel(&header, image_type, options);
        check_depth(bits_per_pixel)?;

        let width = u32::from(header.image.width);
        let height = u32::from(header.image.height);
        debug!(
            "tga {width}x{height} type {} stored {} bpp, decoding to {bits_per_pixel} bpp",
            header.image_type, header.image.bits_per_pixel
        );

        if let Some(limits) = limits {
            limits.check_dimensions(width, height)?;
        }
        let len = buffer_len(bits_per_pixel, width, height)
            .ok_or(TgaError::DimensionsTooLarge { width, height })?;
        stop.check()?;

        src.skip(usize::from(header.id_length))?;

        Ok(Self {
            header,
            image_type,
            options,
            bits_per_pixel,
            width,
            height,
            len,
        })
    }

    fn unresolved(&self) -> bool {
        self.options.contains(TgaOptions::RETURN_COLOR_MAP)
    }

    /// Load the palette of a color-mapped image, or skip one attached to
    /// any other type.
    fn load_palette(
        &self,
        src: &mut dyn TgaRead,
        limits: Option<&Limits>,
        provider: &mut dyn MemoryProvider,
    ) -> Result<Option<Vec<u8>>, TgaError> {
        let header = &self.header;
        if !self.image_type.is_color_mapped() {
            if header.color_map_type > 1 {
                warn!("ignoring unknown color map type {}", header.color_map_type);
            }
            if header.has_color_map() {
                trace!(
                    "skipping {} byte color map of a {:?} image",
                    header.color_map.byte_len(),
                    self.image_type
                );
                src.skip(header.color_map.byte_len())?;
            }
            return Ok(None);
        }

        if let Some(limits) = limits {
            limits.check_bytes("palette", header.color_map.byte_len())?;
        }
        let purpose = if self.unresolved() {
            BufferPurpose::PersistentPalette
        } else {
            BufferPurpose::TransientPalette
        };
        load_palette(src, &header.color_map, purpose, provider).map(Some)
    }

    fn decode_pixels(
        &self,
        src: &mut dyn TgaRead,
        palette: Option<&[u8]>,
        out: &mut [u8],
        stop: &dyn Stop,
    ) -> Result<(), TgaError> {
        let out_bytes = self.bits_per_pixel as usize / 8;
        let direct;
        let lookup;
        let source: &dyn PixelSource = match palette {
            Some(palette) if !self.unresolved() => {
                let index_bytes = usize::from(self.header.image.bits_per_pixel / 8);
                lookup = PaletteLookup::new(index_bytes, out_bytes, palette);
                &lookup
            }
            _ => {
                direct = Direct::new(out_bytes);
                &direct
            }
        };
        let placement = Placement::new(
            Flip::from_options(self.options),
            self.width as usize,
            self.height as usize,
            out_bytes,
        );

        if self.image_type.is_rle() {
            rle::decompress(src, source, &placement, out, stop)
        } else {
            read_uncompressed(src, source, &placement, out, stop)
        }
    }

    /// Hand a transient palette back to the provider, or wrap a kept one.
    fn settle_palette(
        &self,
        provider: &mut dyn MemoryProvider,
        palette: Option<Vec<u8>>,
    ) -> Result<Option<ColorMap>, TgaError> {
        let Some(bytes) = palette else {
            return Ok(None);
        };
        if !self.unresolved() {
            provider.release(bytes, BufferPurpose::TransientPalette);
            return Ok(None);
        }
        let spec = &self.header.color_map;
        let map = ColorMap::new(bytes, spec.length, spec.entry_size)?
            .with_first_entry_index(spec.first_entry_index);
        Ok(Some(map))
    }
}

fn acquire(provider: &mut dyn MemoryProvider, plan: &Plan) -> Result<Vec<u8>, TgaError> {
    let buf = provider.allocate(
        plan.bits_per_pixel,
        plan.width,
        plan.height,
        BufferPurpose::ImageData,
    );
    match buf {
        Some(buf) if buf.len() == plan.len => Ok(buf),
        _ => Err(TgaError::AllocationFailed { bytes: plan.len }),
    }
}

fn read_uncompressed(
    src: &mut dyn TgaRead,
    source: &dyn PixelSource,
    placement: &Placement,
    out: &mut [u8],
    stop: &dyn Stop,
) -> Result<(), TgaError> {
    let total = placement.pixel_count();
    let band = placement.width().max(1) * ROWS_PER_CHECK;
    let mut start = 0;
    while start < total {
        stop.check()?;
        let count = band.min(total - start);
        fetch_pixels(src, source, placement, out, start, count)?;
        start += count;
    }
    Ok(())
}
