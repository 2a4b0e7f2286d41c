use crate::error::TgaError;

/// Resource limits for decoding and encoding.
///
/// All fields default to `None` (no limit).
///
/// The dimension limits apply to the header on decode and to the image on
/// encode. `max_memory_bytes` bounds each buffer the decoder requests from
/// its memory provider (image data, palette), and on encode the worst-case
/// size of the encoded file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    pub(crate) fn check_dimensions(&self, width: u32, height: u32) -> Result<(), TgaError> {
        let pixels = u64::from(width) * u64::from(height);
        let checks = [
            ("width", u64::from(width), self.max_width),
            ("height", u64::from(height), self.max_height),
            ("pixel count", pixels, self.max_pixels),
        ];
        for (what, value, limit) in checks {
            match limit {
                Some(limit) if value > limit => {
                    return Err(TgaError::LimitExceeded(alloc::format!(
                        "{what} {value} exceeds limit {limit}"
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// `what` names the buffer in the error message.
    pub(crate) fn check_bytes(&self, what: &str, bytes: usize) -> Result<(), TgaError> {
        match self.max_memory_bytes {
            Some(max) if bytes as u64 > max => Err(TgaError::LimitExceeded(alloc::format!(
                "{what} of {bytes} bytes exceeds memory limit {max}"
            ))),
            _ => Ok(()),
        }
    }
}
