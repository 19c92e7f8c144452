//! Error types for codec operations.
//!
//! Every codec, the registry and [`crate::Image`] report failures through
//! [`IoError`]. [`IoError::kind`] collapses the variants into the three-way
//! [`ErrorKind`] status callers branch on.

use std::fmt;
use std::io;
use thiserror::Error;

/// Coarse failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller handed over something unusable: a path that cannot be
    /// opened or created, an unknown extension, an empty buffer.
    InvalidArgument,
    /// The on-disk layout is malformed, truncated or unsupported.
    InternalError,
    /// A stream-level I/O failure without a more specific cause.
    Unknown,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InvalidArgument => "invalid argument",
            Self::InternalError => "internal error",
            Self::Unknown => "unknown",
        })
    }
}

/// I/O operation error.
#[derive(Debug, Error)]
pub enum IoError {
    /// Stream I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Path could not be opened or created, or an argument is unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No codec handles this extension or content.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Structurally invalid or unsupported file layout.
    #[error("invalid file: {0}")]
    InvalidFile(String),

    /// Stream ended before the declared data was read.
    #[error("truncated file: {0}")]
    Truncated(String),

    /// Decoding error from a third-party decoder.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Encoding error.
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Unsupported bit depth.
    #[error("unsupported bit depth: {0}")]
    UnsupportedBitDepth(String),

    /// Declared dimensions exceed the configured decode limits.
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// Pixel buffer construction failed.
    #[error(transparent)]
    Core(#[from] raster_core::Error),
}

impl IoError {
    /// Status category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::Unknown,
            Self::InvalidArgument(_) | Self::UnsupportedFormat(_) => ErrorKind::InvalidArgument,
            Self::InvalidFile(_)
            | Self::Truncated(_)
            | Self::DecodeError(_)
            | Self::EncodeError(_)
            | Self::UnsupportedBitDepth(_)
            | Self::LimitExceeded(_)
            | Self::Core(_) => ErrorKind::InternalError,
        }
    }

    /// Maps a read error, reporting early end-of-stream as truncation of `what`.
    pub(crate) fn reading(what: &str) -> impl FnOnce(io::Error) -> IoError + '_ {
        move |e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                IoError::Truncated(what.to_string())
            } else {
                IoError::Io(e)
            }
        }
    }
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;
