//! Error types for container parsing and scanning

use std::collections::TryReserveError;
use std::fmt;
use thiserror::Error;

/// Result type for scan operations
pub type Result<T> = std::result::Result<T, ScanError>;

/// Structural problems in the RIFF/WAVE container
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContainerError {
    /// A four-byte chunk or form id did not match
    #[error("Expected '{expected}' but found '{found}'")]
    BadMagic {
        expected: &'static str,
        found: String,
    },

    /// Declared RIFF and fmt sizes contradict each other
    #[error("WAVE file has illegal chunk sizes. RIFF size: {riff_size}, fmt size: {fmt_size}")]
    InconsistentSizes { riff_size: u32, fmt_size: u32 },

    /// Audio format other than integer PCM
    #[error("Not a PCM WAVE file. audio format: {0}")]
    UnsupportedFormat(u16),

    /// bits_per_sample of zero
    #[error("Illegal value of bits per sample: 0")]
    ZeroBitDepth,

    /// A frame without channels or without bytes
    #[error("WAVE file declares empty frames. channels: {channels}, block alignment: {block_align}")]
    EmptyFrame { channels: u16, block_align: u16 },

    /// Samples of all channels do not fit into one block
    #[error(
        "WAVE file specifies more bits per sample than fit into one sample. \
         bits per sample: {bits_per_sample}, channels: {channels}, block alignment: {block_align}"
    )]
    BitsExceedBlock {
        bits_per_sample: u16,
        channels: u16,
        block_align: u16,
    },

    /// Samples wider than the 32-bit working integer
    #[error("Too many bits per sample: {0}")]
    BitsTooWide(u16),
}

impl ContainerError {
    pub(crate) fn bad_magic(expected: &'static str, found: [u8; 4]) -> Self {
        Self::BadMagic {
            expected,
            found: String::from_utf8_lossy(&found).into_owned(),
        }
    }
}

/// Anything that aborts the scan of a single file
#[derive(Error, Debug)]
pub enum ScanError {
    /// Malformed container
    #[error(transparent)]
    Container(#[from] ContainerError),

    /// Short read or other I/O failure
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Buffer allocation failed
    #[error("Failed to allocate scan buffers: {0}")]
    Alloc(#[from] TryReserveError),
}

impl ScanError {
    /// Coarse classification handed to reporters
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Container(_) => ErrorKind::Container,
            Self::Io(_) => ErrorKind::Io,
            Self::Alloc(_) => ErrorKind::Resource,
        }
    }
}

/// Error classes visible through the reporting interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or unsupported WAVE file
    Container,
    /// I/O failure while reading the stream
    Io,
    /// Buffer allocation failure
    Resource,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Container => "container",
            Self::Io => "io",
            Self::Resource => "resource",
        })
    }
}
