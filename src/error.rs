//! Error types for ICO packing and unpacking.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

//===========================================================================//

/// The error type for all pack, read and extract operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    /// An open, read, write or seek failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The stream ended before a record the header promised.
    #[error("unexpected end of data while reading {what}")]
    Truncated {
        /// The record being read, e.g. "ICONDIR" or "ICONDIRENTRY 3".
        what: String,
    },

    /// The data is not laid out the way the format requires.
    #[error("invalid format: {0}")]
    Format(String),

    /// An input image's PNG header could not be decoded.
    #[error("malformed PNG header in {path:?}: {source}")]
    Png {
        /// The offending input file.
        path: PathBuf,
        /// The decoder's error.
        #[source]
        source: png::DecodingError,
    },

    /// An input image is too large for the one-byte dimension fields.
    #[error(
        "image {path:?} is {width}x{height}, but ICO entries hold at most \
         256x256"
    )]
    DimensionOutOfRange {
        /// The offending input file.
        path: PathBuf,
        /// Decoded width in pixels.
        width: u32,
        /// Decoded height in pixels.
        height: u32,
    },

    /// The caller asked for something the format cannot express.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Maps an `UnexpectedEof` while reading `what` to [`Error::Truncated`],
    /// passing every other I/O error through unchanged.
    pub(crate) fn from_read(error: io::Error, what: impl Into<String>) -> Error {
        if error.kind() == io::ErrorKind::UnexpectedEof {
            Error::Truncated { what: what.into() }
        } else {
            Error::Io(error)
        }
    }
}

//===========================================================================//


//===========================================================================//
