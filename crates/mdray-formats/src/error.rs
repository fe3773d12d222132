//! Error types for mdebug section parsing.

use thiserror::Error;

/// Error type for mdebug section parsing.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Invalid magic number in the symbolic header.
    #[error("invalid symbolic header magic: expected {expected:#06x}, got {actual:#06x}")]
    InvalidMagic { expected: u16, actual: u16 },

    /// Buffer is too short to contain required data.
    #[error("buffer too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },

    /// An indexed read fell outside the image.
    #[error("truncated image: read of {len} bytes at offset {offset:#x} while parsing {context} falls outside the image ({image_len} bytes)")]
    TruncatedData {
        offset: u64,
        len: usize,
        context: &'static str,
        image_len: usize,
    },

    /// A string-table read ran off the end of the image without a NUL.
    #[error("unterminated string at offset {offset:#x}")]
    StringNotTerminated { offset: u64 },

    /// A file descriptor is marked big-endian.
    #[error("file descriptor {index} is big endian; only little-endian mdebug sections are supported")]
    UnsupportedEndianness { index: usize },
}

impl ParseError {
    /// Creates a new TooShort error.
    pub fn too_short(expected: usize, actual: usize) -> Self {
        Self::TooShort { expected, actual }
    }

    /// Creates a new TruncatedData error.
    pub fn truncated(offset: u64, len: usize, context: &'static str, image_len: usize) -> Self {
        Self::TruncatedData {
            offset,
            len,
            context,
            image_len,
        }
    }
}
