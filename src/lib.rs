//! A library for packing PNG files into ICO containers and unpacking them
//! again.
//!
//! Packing stores each PNG file verbatim as one ICO entry; unpacking writes
//! each entry's payload back out, optionally wrapping bitmap payloads in a
//! BMP file header so they open as standalone `.bmp` files.
//!
//! ```no_run
//! use favicon::{pack_files, unpack_file, ExportFormat, PackOptions, ReadOptions};
//! use std::path::Path;
//!
//! # fn main() -> favicon::Result<()> {
//! let inputs = ["icons/16.png", "icons/32.png"];
//! pack_files(&inputs, Path::new("out/favicon.ico"), &PackOptions::default())?;
//! let files = unpack_file(
//!     Path::new("out/favicon.ico"),
//!     ExportFormat::Png,
//!     &ReadOptions::default(),
//! )?;
//! assert_eq!(files.len(), 2);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

#[macro_use]
mod macros;

mod bitmap;
mod error;
mod extract;
mod icondir;
mod layout;
mod pack;
mod restype;
mod source;

#[cfg(feature = "cli")]
pub mod cli;

pub use crate::bitmap::{
    classify, looks_like_bitmap, synthesize_bitmap_file, PayloadKind,
    BMP_PIXEL_OFFSET,
};
pub use crate::error::{Error, Result};
pub use crate::extract::{
    name_root, output_path, unpack_file, ExportFormat, ExtractedFile,
    Extractor,
};
pub use crate::icondir::{IconDir, IconDirEntry, IconDirHeader, ReadOptions};
pub use crate::pack::{
    collect_input_files, pack_files, write_icon, DimensionPolicy, ImageInfo,
    PackOptions, PackPlan,
};
pub use crate::restype::{ResourceType, TypePolicy};
pub use crate::source::ReadAt;
