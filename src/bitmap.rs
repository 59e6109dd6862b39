//! Bridging between ICO payloads and standalone BMP files.
//!
//! ICO entries store bitmaps as a bare BITMAPINFOHEADER followed by pixel
//! data; a `.bmp` file additionally needs the 14-byte BITMAPFILEHEADER in
//! front.  This module builds that header and sniffs payloads to guess which
//! encoding they use.

use crate::layout::{bmpfileheader, dibheader};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

//===========================================================================//

// The signature that all PNG files start with.
const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

// "BM", read as a little-endian u16.
const BMP_SIGNATURE: u32 = 0x4d42;

/// Offset of the pixel data in a synthesized BMP file: the file header plus
/// a standard 40-byte BITMAPINFOHEADER.
pub const BMP_PIXEL_OFFSET: u32 =
    (bmpfileheader::LEN + dibheader::LEN) as u32;

//===========================================================================//

/// The encoding an ICO payload appears to use.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum PayloadKind {
    /// Neither signature matched.
    Unknown,
    /// Starts with the PNG signature.
    Png,
    /// Starts with a plausible BITMAPINFOHEADER.
    Bitmap,
}

impl PayloadKind {
    /// Returns the file extension normally used for this kind of payload.
    pub fn extension(&self) -> &'static str {
        match *self {
            PayloadKind::Bitmap => "bmp",
            PayloadKind::Png | PayloadKind::Unknown => "png",
        }
    }
}

/// Guesses the encoding of an ICO payload.  This is a heuristic; a match does
/// not mean the payload will decode.
pub fn classify(payload: &[u8]) -> PayloadKind {
    if payload.starts_with(PNG_SIGNATURE) {
        PayloadKind::Png
    } else if looks_like_bitmap(payload) {
        PayloadKind::Bitmap
    } else {
        PayloadKind::Unknown
    }
}

/// Returns true if the first 40 bytes of `payload` look like a
/// BITMAPINFOHEADER: a declared header size of 40 and exactly one color
/// plane.  Payloads shorter than 40 bytes never match.
pub fn looks_like_bitmap(payload: &[u8]) -> bool {
    if payload.len() < dibheader::LEN {
        return false;
    }
    let record = &payload[..dibheader::LEN];
    dibheader::HEADER_SIZE.get(record) == dibheader::LEN as u32
        && dibheader::COLOR_PLANES.get(record) == 1
}

/// Prepends a BITMAPFILEHEADER to a raw DIB payload, producing the bytes of a
/// standalone `.bmp` file.
///
/// `payload_size` is the size recorded for the payload (normally
/// `payload.len()`), and the pixel data is assumed to follow a standard
/// 40-byte info header; neither is re-verified.
pub fn synthesize_bitmap_file(payload_size: u32, payload: &[u8]) -> Vec<u8> {
    let mut header = [0u8; bmpfileheader::LEN];
    bmpfileheader::SIGNATURE.put(&mut header, BMP_SIGNATURE);
    bmpfileheader::FILE_SIZE.put(
        &mut header,
        payload_size.wrapping_add(bmpfileheader::LEN as u32),
    );
    bmpfileheader::RESERVED1.put(&mut header, 0);
    bmpfileheader::RESERVED2.put(&mut header, 0);
    bmpfileheader::PIXEL_OFFSET.put(&mut header, BMP_PIXEL_OFFSET);
    let mut file = Vec::with_capacity(bmpfileheader::LEN + payload.len());
    file.extend_from_slice(&header);
    file.extend_from_slice(payload);
    file
}

//===========================================================================//


//===========================================================================//
