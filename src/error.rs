use alloc::string::String;
use enough::StopReason;

/// Errors from TGA decoding and encoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TgaError {
    #[cfg(feature = "std")]
    #[error("cannot open {path}: {source}")]
    CannotOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[cfg(feature = "std")]
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("allocation of {bytes} bytes failed")]
    AllocationFailed { bytes: usize },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("unsupported pixel depth: {0}")]
    UnsupportedPixelDepth(String),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

/// Coarse error classification, one per failure stage.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The file could not be opened or created.
    CannotOpen,
    /// Short read, short write, or a fault in the underlying stream.
    Io,
    /// The memory provider refused the buffer, or a limit forbade it.
    AllocationFailed,
    /// Malformed or contradictory header or pixel data.
    InvalidData,
    /// Bits per pixel not a multiple of 8, above 128, or an unusable
    /// palette entry/index width.
    UnsupportedPixelDepth,
    /// A [`Stop`](enough::Stop) token ended the call.
    Cancelled,
}

impl TgaError {
    /// The failure class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            #[cfg(feature = "std")]
            Self::CannotOpen { .. } => ErrorKind::CannotOpen,
            #[cfg(feature = "std")]
            Self::Io(_) => ErrorKind::Io,
            Self::UnexpectedEof => ErrorKind::Io,
            Self::AllocationFailed { .. } | Self::LimitExceeded(_) => ErrorKind::AllocationFailed,
            Self::InvalidData(_) | Self::DimensionsTooLarge { .. } => ErrorKind::InvalidData,
            Self::UnsupportedPixelDepth(_) => ErrorKind::UnsupportedPixelDepth,
            Self::Cancelled(_) => ErrorKind::Cancelled,
        }
    }
}

impl From<StopReason> for TgaError {
    fn from(r: StopReason) -> Self {
        TgaError::Cancelled(r)
    }
}
