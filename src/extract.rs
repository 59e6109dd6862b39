//! Unpacking the payloads of an ICO file into standalone image files.

use crate::bitmap::{self, PayloadKind};
use crate::error::Result;
use crate::icondir::{IconDir, IconDirEntry, ReadOptions};
use crate::source::ReadAt;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

//===========================================================================//

/// How extracted payloads are written out.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum ExportFormat {
    /// Write every payload unmodified as `.png`.  Payloads that look like
    /// bitmaps are still written this way, with a warning.
    #[default]
    Png,
    /// Prepend a bitmap file header to every payload and write `.bmp`.
    Bitmap,
    /// Write bitmap-looking payloads as `.bmp` (with a file header) and
    /// everything else unmodified as `.png`.
    Auto,
}

/// One file written by [`Extractor::extract_all`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExtractedFile {
    /// Index of the source entry in the directory.
    pub index: usize,
    /// Where the file was written.
    pub path: PathBuf,
    /// How the payload was classified.
    pub kind: PayloadKind,
    /// Number of bytes written.
    pub len: usize,
}

/// Returns the path an entry is extracted to: `<name_root>_<W>x<H>.<ext>`,
/// with a stored dimension of 0 printed as 256.
pub fn output_path(
    name_root: &str,
    entry: &IconDirEntry,
    extension: &str,
) -> PathBuf {
    PathBuf::from(format!(
        "{}_{}x{}.{}",
        name_root,
        entry.width(),
        entry.height(),
        extension
    ))
}

/// Returns `path` with everything from the last `.` of its file name
/// removed.  A file name with no dot is kept whole; a name that starts with
/// its only dot (such as `.ico`) leaves just the directory part, so its
/// outputs are named `_<W>x<H>.<ext>` inside that directory.
pub fn name_root(path: &Path) -> String {
    let full = path.to_string_lossy().into_owned();
    let name = match path.file_name() {
        Some(name) => name.to_string_lossy(),
        None => return full,
    };
    match name.rfind('.') {
        Some(dot) if full.ends_with(&*name) => {
            full[..full.len() - (name.len() - dot)].to_string()
        }
        _ => full,
    }
}

//===========================================================================//

/// Writes the payloads of a parsed ICO directory to individual files.
///
/// Payloads are fetched with positioned reads, so the extractor never moves
/// a shared cursor in `source`.
pub struct Extractor<'a, S: ReadAt + ?Sized> {
    directory: &'a IconDir,
    source: &'a S,
}

impl<'a, S: ReadAt + ?Sized> Extractor<'a, S> {
    /// Creates an extractor for `directory`, whose payloads live in `source`.
    pub fn new(directory: &'a IconDir, source: &'a S) -> Extractor<'a, S> {
        Extractor { directory, source }
    }

    /// Renders one entry's payload in the requested format, returning the
    /// bytes to write, the extension to use, and the payload's
    /// classification.  An `index` past the last entry is an
    /// [`Error::InvalidInput`](crate::Error::InvalidInput).
    pub fn render(
        &self,
        index: usize,
        format: ExportFormat,
    ) -> Result<(Vec<u8>, &'static str, PayloadKind)> {
        let entry = match self.directory.entries().get(index) {
            Some(entry) => entry,
            None => {
                invalid_input!(
                    "Entry index {} out of range (directory has {} entries)",
                    index,
                    self.directory.entries().len()
                );
            }
        };
        let payload = entry.read_payload(self.source)?;
        let kind = bitmap::classify(&payload);
        let as_bitmap = match format {
            ExportFormat::Png => {
                if kind == PayloadKind::Bitmap {
                    tracing::warn!(
                        index,
                        "payload looks like a bitmap but is being written \
                         as .png"
                    );
                }
                false
            }
            ExportFormat::Bitmap => true,
            ExportFormat::Auto => {
                tracing::debug!(index, ?kind, "choosing output format");
                kind == PayloadKind::Bitmap
            }
        };
        if as_bitmap {
            let data =
                bitmap::synthesize_bitmap_file(entry.data_size(), &payload);
            Ok((data, "bmp", kind))
        } else {
            Ok((payload, "png", kind))
        }
    }

    /// Writes every entry, in stored order, to `<name_root>_<W>x<H>.<ext>`.
    ///
    /// File names depend only on the dimensions, so a later entry with the
    /// same size and extension as an earlier one overwrites it.  The first
    /// error stops the extraction.
    pub fn extract_all(
        &self,
        name_root: &str,
        format: ExportFormat,
    ) -> Result<Vec<ExtractedFile>> {
        let mut written = Vec::with_capacity(self.directory.entries().len());
        let mut seen = HashSet::<PathBuf>::new();
        for (index, entry) in self.directory.entries().iter().enumerate() {
            let (data, extension, kind) = self.render(index, format)?;
            let path = output_path(name_root, entry, extension);
            if !seen.insert(path.clone()) {
                tracing::debug!(index, ?path, "overwriting earlier entry");
            }
            fs::write(&path, &data)?;
            tracing::info!(index, ?path, ?kind, len = data.len(), "extracted");
            written.push(ExtractedFile { index, path, kind, len: data.len() });
        }
        Ok(written)
    }
}

/// Reads the ICO file at `path` and extracts every entry next to it, using
/// [`name_root`] of the path as the prefix of every output name.
pub fn unpack_file(
    path: &Path,
    format: ExportFormat,
    options: &ReadOptions,
) -> Result<Vec<ExtractedFile>> {
    let file = File::open(path)?;
    let directory = IconDir::read(BufReader::new(&file), options)?;
    tracing::info!(
        ?path,
        images = directory.entries().len(),
        ?format,
        "unpacking ICO file"
    );
    Extractor::new(&directory, &file).extract_all(&name_root(path), format)
}

//===========================================================================//


//===========================================================================//
