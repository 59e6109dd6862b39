//! Packing PNG files into an ICO container.
//!
//! Packing happens in two phases.  First every input is inspected (PNG header
//! for the dimensions, file metadata for the size) and a [`PackPlan`] lays
//! out the directory.  Only then is the output created and written in three
//! passes: header, directory entries, payloads.

use crate::error::{Error, Result};
use crate::icondir::{IconDir, IconDirEntry, IconDirHeader};
use crate::restype::ResourceType;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

//===========================================================================//

// The largest dimension the one-byte width/height fields can express.
const MAX_DIMENSION: u32 = 256;

//===========================================================================//

/// What to do with images wider or taller than 256 pixels.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum DimensionPolicy {
    /// Fail the whole pack with [`Error::DimensionOutOfRange`].
    #[default]
    Reject,
    /// Store the dimension as 0, the byte modern readers take to mean "256
    /// or larger, see the image data".
    Clamp,
}

/// Options controlling how images are packed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct PackOptions {
    /// Policy for dimensions above 256.
    pub dimension_policy: DimensionPolicy,
}

//===========================================================================//

/// What the packer needs to know about one input image.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImageInfo {
    /// Where the image came from, for error messages.
    pub path: PathBuf,
    /// Decoded width in pixels.
    pub width: u32,
    /// Decoded height in pixels.
    pub height: u32,
    /// Size of the whole file in bytes; stored verbatim as the payload.
    pub size: u64,
}

impl ImageInfo {
    /// Reads just enough of the PNG at `path` to learn its dimensions, and
    /// its size from the file system.
    pub fn inspect<P: AsRef<Path>>(path: P) -> Result<ImageInfo> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        let decoder = png::Decoder::new(file);
        let png_reader = match decoder.read_info() {
            Ok(png_reader) => png_reader,
            Err(png::DecodingError::IoError(error)) => {
                return Err(Error::Io(error));
            }
            Err(source) => {
                return Err(Error::Png { path: path.to_path_buf(), source });
            }
        };
        let info = png_reader.info();
        tracing::debug!(
            ?path,
            width = info.width,
            height = info.height,
            size,
            "inspected image"
        );
        Ok(ImageInfo {
            path: path.to_path_buf(),
            width: info.width,
            height: info.height,
            size,
        })
    }
}

//===========================================================================//

/// The complete layout of an ICO file, computed before anything is written.
#[derive(Clone, Debug)]
pub struct PackPlan {
    directory: IconDir,
    total_len: u64,
}

impl PackPlan {
    /// Lays out a directory for `images`, in order, with payloads packed back
    /// to back right after the directory.
    pub fn new(images: &[ImageInfo], options: &PackOptions) -> Result<PackPlan> {
        if images.is_empty() {
            invalid_input!("No images to pack");
        }
        if images.len() > (u16::MAX as usize) {
            invalid_input!(
                "Too many images (was {}, but max is {})",
                images.len(),
                u16::MAX
            );
        }
        let header = IconDirHeader::new(ResourceType::Icon, images.len() as u16);
        let mut data_offset = header.directory_len() as u64;
        let mut entries = Vec::<IconDirEntry>::with_capacity(images.len());
        for image in images.iter() {
            let width_byte = dimension_byte(image, image.width, options)?;
            let height_byte = dimension_byte(image, image.height, options)?;
            let data_end = data_offset + image.size;
            if data_end > (u32::MAX as u64) {
                invalid_data!(
                    "{:?} would end at byte {}, past the 4 GiB offset limit",
                    image.path,
                    data_end
                );
            }
            entries.push(IconDirEntry::for_png(
                width_byte,
                height_byte,
                image.size as u32,
                data_offset as u32,
            ));
            data_offset = data_end;
        }
        let directory = IconDir::from_parts(header, entries)?;
        Ok(PackPlan { directory, total_len: data_offset })
    }

    /// Returns the directory that will be written.
    pub fn directory(&self) -> &IconDir {
        &self.directory
    }

    /// Returns the size of the finished ICO file, in bytes.
    pub fn total_len(&self) -> u64 {
        self.total_len
    }
}

// Encodes one dimension for the width/height byte, where 0 means 256.
fn dimension_byte(
    image: &ImageInfo,
    value: u32,
    options: &PackOptions,
) -> Result<u8> {
    if value == 0 {
        invalid_data!("{:?} has a zero dimension", image.path);
    }
    if value < MAX_DIMENSION {
        return Ok(value as u8);
    }
    if value == MAX_DIMENSION {
        return Ok(0);
    }
    match options.dimension_policy {
        DimensionPolicy::Reject => Err(Error::DimensionOutOfRange {
            path: image.path.clone(),
            width: image.width,
            height: image.height,
        }),
        DimensionPolicy::Clamp => {
            tracing::warn!(
                path = ?image.path,
                width = image.width,
                height = image.height,
                "image is larger than 256 pixels; storing dimension as 0"
            );
            Ok(0)
        }
    }
}

//===========================================================================//

/// Writes `plan`'s directory followed by each image's bytes, read from the
/// image paths in order.  Fails if any file no longer has the size it was
/// inspected with.
pub fn write_icon<W: Write>(
    plan: &PackPlan,
    images: &[ImageInfo],
    mut writer: W,
) -> Result<()> {
    if images.len() != plan.directory().entries().len() {
        invalid_input!(
            "Plan has {} entries, but {} images were given",
            plan.directory().entries().len(),
            images.len()
        );
    }
    plan.directory().write_directory(&mut writer)?;
    for (image, entry) in images.iter().zip(plan.directory().entries()) {
        let mut data = Vec::with_capacity(entry.data_size() as usize);
        File::open(&image.path)?.read_to_end(&mut data)?;
        if data.len() as u64 != image.size {
            invalid_data!(
                "{:?} changed while packing (was {} bytes, now {})",
                image.path,
                image.size,
                data.len()
            );
        }
        writer.write_all(&data)?;
    }
    Ok(())
}

/// Packs the PNG files at `paths`, in order, into a new ICO file at
/// `output`, creating the output's parent directory if needed.
///
/// Every input is inspected before the output is created, so a bad input never
/// leaves an output file behind.  If writing fails partway, the partial
/// output is removed.
pub fn pack_files<P: AsRef<Path>>(
    paths: &[P],
    output: &Path,
    options: &PackOptions,
) -> Result<PackPlan> {
    let images = paths
        .iter()
        .map(ImageInfo::inspect)
        .collect::<Result<Vec<_>>>()?;
    let plan = PackPlan::new(&images, options)?;
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    tracing::info!(
        ?output,
        images = images.len(),
        bytes = plan.total_len(),
        "writing ICO file"
    );
    write_planned(&plan, &images, output)?;
    Ok(plan)
}

/// Creates `output` and writes `plan` into it.  On any failure after the
/// file is created, the partial output is removed before the error is
/// returned.
pub(crate) fn write_planned(
    plan: &PackPlan,
    images: &[ImageInfo],
    output: &Path,
) -> Result<()> {
    let result = File::create(output).map_err(Error::from).and_then(|file| {
        let mut writer = BufWriter::new(file);
        write_icon(plan, images, &mut writer)?;
        let file = writer.into_inner().map_err(|error| error.into_error())?;
        file.sync_all()?;
        Ok(())
    });
    if let Err(error) = result {
        if let Err(remove_error) = fs::remove_file(output) {
            tracing::warn!(
                ?output,
                %remove_error,
                "could not remove partial output"
            );
        }
        return Err(error);
    }
    Ok(())
}

/// Recursively collects every non-directory entry under `folder`.  Entries
/// are visited depth-first with the children of each directory sorted by
/// file name, so the result (and the packed entry order) does not depend on
/// the file system's listing order.
pub fn collect_input_files<P: AsRef<Path>>(folder: P) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(folder).sort_by_file_name() {
        let entry = entry.map_err(|error| match error.into_io_error() {
            Some(error) => Error::Io(error),
            None => Error::InvalidInput("filesystem loop while walking".into()),
        })?;
        if !entry.file_type().is_dir() {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{
        write_icon, write_planned, DimensionPolicy, ImageInfo, PackOptions,
        PackPlan,
    };
    use crate::error::Error;
    use std::fs::{self, File, OpenOptions};
    use std::io::Write;
    use std::path::{Path, PathBuf};

    fn image(name: &str, width: u32, height: u32, size: u64) -> ImageInfo {
        ImageInfo { path: PathBuf::from(name), width, height, size }
    }

    // Writes a minimal 1x1 grayscale PNG to `path`.
    fn write_tiny_png(path: &Path) {
        let file = File::create(path).unwrap();
        let mut encoder = png::Encoder::new(file, 1, 1);
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&[0x80]).unwrap();
        writer.finish().unwrap();
    }

    #[test]
    fn plan_two_images() {
        let images =
            [image("a.png", 16, 16, 800), image("b.png", 32, 32, 2000)];
        let plan = PackPlan::new(&images, &PackOptions::default()).unwrap();
        let header = plan.directory().header();
        assert_eq!(header.reserved(), 0);
        assert_eq!(header.type_number(), 1);
        assert_eq!(header.image_count(), 2);
        let entries = plan.directory().entries();
        assert_eq!(entries[0].width(), 16);
        assert_eq!(entries[0].height(), 16);
        assert_eq!(entries[0].data_size(), 800);
        assert_eq!(entries[0].data_offset(), 38);
        assert_eq!(entries[1].width(), 32);
        assert_eq!(entries[1].height(), 32);
        assert_eq!(entries[1].data_size(), 2000);
        assert_eq!(entries[1].data_offset(), 838);
        assert_eq!(plan.total_len(), 2838);
    }

    #[test]
    fn plan_entries_are_contiguous() {
        let images: Vec<ImageInfo> = (1..=5)
            .map(|n| image("x.png", n * 10, n * 10, (n as u64) * 123))
            .collect();
        let plan = PackPlan::new(&images, &PackOptions::default()).unwrap();
        let entries = plan.directory().entries();
        assert_eq!(entries[0].data_offset(), 6 + 16 * 5);
        for pair in entries.windows(2) {
            assert_eq!(pair[1].data_offset() as u64, pair[0].data_end());
        }
        for entry in entries {
            assert!(entry.data_end() <= plan.total_len());
            assert_eq!(entry.num_colors(), 0);
            assert_eq!(entry.color_planes(), 0);
            assert_eq!(entry.bits_per_pixel(), 0);
        }
        assert_eq!(entries[4].data_end(), plan.total_len());
    }

    #[test]
    fn dimension_of_256_is_stored_as_zero() {
        let images = [image("big.png", 256, 255, 10)];
        let plan = PackPlan::new(&images, &PackOptions::default()).unwrap();
        let entry = &plan.directory().entries()[0];
        assert_eq!(entry.width_byte(), 0);
        assert_eq!(entry.height_byte(), 255);
        assert_eq!(entry.width(), 256);
    }

    #[test]
    fn oversized_dimension_is_rejected_by_default() {
        let images = [image("huge.png", 512, 16, 10)];
        match PackPlan::new(&images, &PackOptions::default()) {
            Err(Error::DimensionOutOfRange { width, height, .. }) => {
                assert_eq!((width, height), (512, 16));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn oversized_dimension_is_clamped_on_request() {
        let images = [image("huge.png", 16, 257, 10)];
        let options =
            PackOptions { dimension_policy: DimensionPolicy::Clamp };
        let plan = PackPlan::new(&images, &options).unwrap();
        let entry = &plan.directory().entries()[0];
        assert_eq!(entry.width_byte(), 16);
        assert_eq!(entry.height_byte(), 0);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            PackPlan::new(&[], &PackOptions::default()),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn offsets_past_four_gib_are_rejected() {
        let images =
            [image("a.png", 1, 1, u32::MAX as u64), image("b.png", 1, 1, 1)];
        assert!(matches!(
            PackPlan::new(&images, &PackOptions::default()),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn write_icon_rejects_input_that_grew() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        fs::write(&path, [7u8; 20]).unwrap();
        let images = [ImageInfo { path, width: 4, height: 4, size: 16 }];
        let plan = PackPlan::new(&images, &PackOptions::default()).unwrap();
        let mut output = Vec::new();
        assert!(matches!(
            write_icon(&plan, &images, &mut output),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn input_changed_after_inspection_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("tiny.png");
        write_tiny_png(&input);
        let images = [ImageInfo::inspect(&input).unwrap()];
        assert_eq!((images[0].width, images[0].height), (1, 1));
        let plan = PackPlan::new(&images, &PackOptions::default()).unwrap();
        OpenOptions::new()
            .append(true)
            .open(&input)
            .unwrap()
            .write_all(b"trailing bytes")
            .unwrap();
        let output = dir.path().join("out.ico");
        assert!(matches!(
            write_planned(&plan, &images, &output),
            Err(Error::Format(_))
        ));
        assert!(!output.exists());
    }
}

//===========================================================================//
