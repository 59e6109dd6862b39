use crate::bitmap::{self, PayloadKind};
use crate::error::{Error, Result};
use crate::layout::{icondir, icondirentry};
use crate::restype::{ResourceType, TypePolicy};
use crate::source::{past_end, ReadAt};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

//===========================================================================//

/// Options controlling how an ICO file is read.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct ReadOptions {
    /// What to do with a type field other than icon or cursor.
    pub type_policy: TypePolicy,
}

//===========================================================================//

/// The ICONDIR header at the start of an ICO file.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct IconDirHeader {
    reserved: u16,
    restype: u16,
    image_count: u16,
}

impl IconDirHeader {
    /// Creates a header for `image_count` images of the given type.
    pub fn new(resource_type: ResourceType, image_count: u16) -> IconDirHeader {
        IconDirHeader {
            reserved: 0,
            restype: u16::from(resource_type),
            image_count,
        }
    }

    /// Returns the reserved field exactly as stored (0 in files we write).
    pub fn reserved(&self) -> u16 {
        self.reserved
    }

    /// Returns the raw type field.
    pub fn type_number(&self) -> u16 {
        self.restype
    }

    /// Returns the resource type, or `None` if the type field holds a value
    /// other than 1 or 2.
    pub fn resource_type(&self) -> Option<ResourceType> {
        ResourceType::try_from(self.restype).ok()
    }

    /// Returns the number of directory entries that follow the header.
    pub fn image_count(&self) -> u16 {
        self.image_count
    }

    /// Returns the combined size of the header and its directory entries,
    /// which is where the first payload of a packed file begins.
    pub fn directory_len(&self) -> u32 {
        (icondir::LEN + icondirentry::LEN * self.image_count as usize) as u32
    }

    pub(crate) fn decode(record: &[u8]) -> IconDirHeader {
        IconDirHeader {
            reserved: icondir::RESERVED.get(record) as u16,
            restype: icondir::RESOURCE_TYPE.get(record) as u16,
            image_count: icondir::IMAGE_COUNT.get(record) as u16,
        }
    }

    pub(crate) fn encode(&self) -> [u8; icondir::LEN] {
        let mut record = [0u8; icondir::LEN];
        icondir::RESERVED.put(&mut record, self.reserved as u32);
        icondir::RESOURCE_TYPE.put(&mut record, self.restype as u32);
        icondir::IMAGE_COUNT.put(&mut record, self.image_count as u32);
        record
    }
}

//===========================================================================//

/// One ICONDIRENTRY: the geometry and location of a single embedded image.
/// The image data itself is not held here; use [`IconDirEntry::read_payload`]
/// with the source the directory was read from.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct IconDirEntry {
    width_byte: u8,
    height_byte: u8,
    num_colors: u8,
    reserved: u8,
    color_planes: u16,
    bits_per_pixel: u16,
    data_size: u32,
    data_offset: u32,
}

impl IconDirEntry {
    /// Creates an entry for a PNG payload, the way the packer writes them:
    /// color count, color planes and bits-per-pixel are all zero.
    /// `width_byte` and `height_byte` are the encoded values, where 0 means
    /// 256.
    pub fn for_png(
        width_byte: u8,
        height_byte: u8,
        data_size: u32,
        data_offset: u32,
    ) -> IconDirEntry {
        IconDirEntry {
            width_byte,
            height_byte,
            num_colors: 0,
            reserved: 0,
            color_planes: 0,
            bits_per_pixel: 0,
            data_size,
            data_offset,
        }
    }

    /// Returns the width of the image, in pixels.
    pub fn width(&self) -> u32 {
        // A width/height byte of zero indicates a size of 256.
        if self.width_byte == 0 {
            256
        } else {
            self.width_byte as u32
        }
    }

    /// Returns the height of the image, in pixels.
    pub fn height(&self) -> u32 {
        if self.height_byte == 0 {
            256
        } else {
            self.height_byte as u32
        }
    }

    /// Returns the width byte exactly as stored.
    pub fn width_byte(&self) -> u8 {
        self.width_byte
    }

    /// Returns the height byte exactly as stored.
    pub fn height_byte(&self) -> u8 {
        self.height_byte
    }

    /// Returns the number of palette colors (informational only).
    pub fn num_colors(&self) -> u8 {
        self.num_colors
    }

    /// Returns the color planes field (the hotspot X for cursors).
    pub fn color_planes(&self) -> u16 {
        self.color_planes
    }

    /// Returns the bits-per-pixel field (the hotspot Y for cursors).
    pub fn bits_per_pixel(&self) -> u16 {
        self.bits_per_pixel
    }

    /// Returns the size of the payload, in bytes.
    pub fn data_size(&self) -> u32 {
        self.data_size
    }

    /// Returns the absolute offset of the payload's first byte.
    pub fn data_offset(&self) -> u32 {
        self.data_offset
    }

    /// Returns the offset one past the payload's last byte.
    pub fn data_end(&self) -> u64 {
        self.data_offset as u64 + self.data_size as u64
    }

    /// Reads this entry's payload from `source`.  An entry whose payload
    /// would extend past the end of `source` fails before any buffer is
    /// allocated for it.
    pub fn read_payload<S: ReadAt + ?Sized>(&self, source: &S) -> Result<Vec<u8>> {
        if self.data_end() > source.size()? {
            return Err(Error::Io(past_end(
                self.data_offset as u64,
                self.data_size as usize,
            )));
        }
        let mut data = vec![0u8; self.data_size as usize];
        source.read_exact_at(&mut data, self.data_offset as u64)?;
        Ok(data)
    }

    /// Reads this entry's payload and guesses its encoding.
    pub fn classify<S: ReadAt + ?Sized>(&self, source: &S) -> Result<PayloadKind> {
        Ok(bitmap::classify(&self.read_payload(source)?))
    }

    pub(crate) fn decode(record: &[u8]) -> IconDirEntry {
        IconDirEntry {
            width_byte: icondirentry::WIDTH.get(record) as u8,
            height_byte: icondirentry::HEIGHT.get(record) as u8,
            num_colors: icondirentry::NUM_COLORS.get(record) as u8,
            reserved: icondirentry::RESERVED.get(record) as u8,
            color_planes: icondirentry::COLOR_PLANES.get(record) as u16,
            bits_per_pixel: icondirentry::BITS_PER_PIXEL.get(record) as u16,
            data_size: icondirentry::DATA_SIZE.get(record),
            data_offset: icondirentry::DATA_OFFSET.get(record),
        }
    }

    pub(crate) fn encode(&self) -> [u8; icondirentry::LEN] {
        let mut record = [0u8; icondirentry::LEN];
        icondirentry::WIDTH.put(&mut record, self.width_byte as u32);
        icondirentry::HEIGHT.put(&mut record, self.height_byte as u32);
        icondirentry::NUM_COLORS.put(&mut record, self.num_colors as u32);
        icondirentry::RESERVED.put(&mut record, self.reserved as u32);
        icondirentry::COLOR_PLANES.put(&mut record, self.color_planes as u32);
        icondirentry::BITS_PER_PIXEL
            .put(&mut record, self.bits_per_pixel as u32);
        icondirentry::DATA_SIZE.put(&mut record, self.data_size);
        icondirentry::DATA_OFFSET.put(&mut record, self.data_offset);
        record
    }
}

//===========================================================================//

/// The directory of an ICO file: its header and entries, in stored order.
/// Built once, either by the packer or by [`IconDir::read`], and not
/// modified afterward.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct IconDir {
    header: IconDirHeader,
    entries: Vec<IconDirEntry>,
}

impl IconDir {
    /// Builds a directory from a header and its entries.  Fails if the
    /// header's image count disagrees with the number of entries.
    pub fn from_parts(
        header: IconDirHeader,
        entries: Vec<IconDirEntry>,
    ) -> Result<IconDir> {
        if header.image_count() as usize != entries.len() {
            invalid_input!(
                "Header declares {} images, but {} entries were given",
                header.image_count(),
                entries.len()
            );
        }
        Ok(IconDir { header, entries })
    }

    /// Returns the ICONDIR header.
    pub fn header(&self) -> &IconDirHeader {
        &self.header
    }

    /// Returns the entries in this directory, in stored order.
    pub fn entries(&self) -> &[IconDirEntry] {
        &self.entries
    }

    /// Reads the header and directory entries of an ICO or CUR file.  Only
    /// the directory is read; payloads stay in the source until asked for.
    pub fn read<R: Read>(mut reader: R, options: &ReadOptions) -> Result<IconDir> {
        let mut record = [0u8; icondir::LEN];
        reader
            .read_exact(&mut record)
            .map_err(|error| Error::from_read(error, "ICONDIR"))?;
        let header = IconDirHeader::decode(&record);
        options.type_policy.resolve(header.type_number())?;
        let num_entries = header.image_count() as usize;
        let mut entries = Vec::<IconDirEntry>::with_capacity(num_entries);
        for index in 0..num_entries {
            let mut record = [0u8; icondirentry::LEN];
            reader.read_exact(&mut record).map_err(|error| {
                Error::from_read(error, format!("ICONDIRENTRY {}", index))
            })?;
            let entry = IconDirEntry::decode(&record);
            tracing::debug!(
                index,
                width = entry.width(),
                height = entry.height(),
                size = entry.data_size(),
                offset = entry.data_offset(),
                "read directory entry"
            );
            entries.push(entry);
        }
        Ok(IconDir { header, entries })
    }

    /// Writes the header and directory entries, without any payloads.
    pub fn write_directory<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.header.encode())?;
        for entry in self.entries.iter() {
            writer.write_all(&entry.encode())?;
        }
        Ok(())
    }
}

//===========================================================================//


//===========================================================================//
