//! Byte layouts of the fixed-size records in ICO and BMP files.
//!
//! Every record is described once, as a table of fields, and both the
//! encoder and the decoder go through that table.  Nothing relies on the
//! host's struct layout or alignment.

use byteorder::{ByteOrder, LittleEndian};

//===========================================================================//

/// One little-endian field of a fixed-size record.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Field {
    pub(crate) name: &'static str,
    pub(crate) offset: usize,
    pub(crate) width: usize,
}

impl Field {
    const fn new(name: &'static str, offset: usize, width: usize) -> Field {
        Field { name, offset, width }
    }

    /// Decodes this field from `record`.  Panics if `record` is shorter than
    /// the field's end.
    pub(crate) fn get(&self, record: &[u8]) -> u32 {
        let bytes = &record[self.offset..][..self.width];
        match self.width {
            1 => bytes[0] as u32,
            2 => LittleEndian::read_u16(bytes) as u32,
            4 => LittleEndian::read_u32(bytes),
            _ => unreachable!("field {} has width {}", self.name, self.width),
        }
    }

    /// Encodes `value` into this field of `record`.  The value must fit the
    /// field; callers range-check before encoding.
    pub(crate) fn put(&self, record: &mut [u8], value: u32) {
        debug_assert!(
            self.width == 4 || value < (1 << (8 * self.width)),
            "value {} does not fit field {}",
            value,
            self.name
        );
        let bytes = &mut record[self.offset..][..self.width];
        match self.width {
            1 => bytes[0] = value as u8,
            2 => LittleEndian::write_u16(bytes, value as u16),
            4 => LittleEndian::write_u32(bytes, value),
            _ => unreachable!("field {} has width {}", self.name, self.width),
        }
    }
}

//===========================================================================//

/// ICONDIR: the 6-byte header at the start of every ICO file.
pub(crate) mod icondir {
    use super::Field;

    pub(crate) const LEN: usize = 6;

    pub(crate) const RESERVED: Field = Field::new("reserved", 0, 2);
    pub(crate) const RESOURCE_TYPE: Field = Field::new("type", 2, 2);
    pub(crate) const IMAGE_COUNT: Field = Field::new("image_count", 4, 2);

    #[cfg(test)]
    pub(crate) const FIELDS: &[Field] = &[RESERVED, RESOURCE_TYPE, IMAGE_COUNT];
}

/// ICONDIRENTRY: one 16-byte record per embedded image.
pub(crate) mod icondirentry {
    use super::Field;

    pub(crate) const LEN: usize = 16;

    pub(crate) const WIDTH: Field = Field::new("width", 0, 1);
    pub(crate) const HEIGHT: Field = Field::new("height", 1, 1);
    pub(crate) const NUM_COLORS: Field = Field::new("num_colors", 2, 1);
    pub(crate) const RESERVED: Field = Field::new("reserved", 3, 1);
    pub(crate) const COLOR_PLANES: Field = Field::new("color_planes", 4, 2);
    pub(crate) const BITS_PER_PIXEL: Field = Field::new("bits_per_pixel", 6, 2);
    pub(crate) const DATA_SIZE: Field = Field::new("data_size", 8, 4);
    pub(crate) const DATA_OFFSET: Field = Field::new("data_offset", 12, 4);

    #[cfg(test)]
    pub(crate) const FIELDS: &[Field] = &[
        WIDTH,
        HEIGHT,
        NUM_COLORS,
        RESERVED,
        COLOR_PLANES,
        BITS_PER_PIXEL,
        DATA_SIZE,
        DATA_OFFSET,
    ];
}

/// BITMAPFILEHEADER: the 14-byte prefix of a standalone BMP file.
pub(crate) mod bmpfileheader {
    use super::Field;

    pub(crate) const LEN: usize = 14;

    // The two signature bytes are encoded as one little-endian u16, so "BM"
    // is 0x4d42.
    pub(crate) const SIGNATURE: Field = Field::new("signature", 0, 2);
    pub(crate) const FILE_SIZE: Field = Field::new("file_size", 2, 4);
    pub(crate) const RESERVED1: Field = Field::new("reserved1", 6, 2);
    pub(crate) const RESERVED2: Field = Field::new("reserved2", 8, 2);
    pub(crate) const PIXEL_OFFSET: Field = Field::new("pixel_offset", 10, 4);

    #[cfg(test)]
    pub(crate) const FIELDS: &[Field] =
        &[SIGNATURE, FILE_SIZE, RESERVED1, RESERVED2, PIXEL_OFFSET];
}

/// The leading fields of a BITMAPINFOHEADER, enough to recognize one.
pub(crate) mod dibheader {
    use super::Field;

    /// The size of a BITMAPINFOHEADER struct, in bytes.
    pub(crate) const LEN: usize = 40;

    // Only the fields the classifier looks at; width and height (two i32s)
    // sit in between.
    pub(crate) const HEADER_SIZE: Field = Field::new("header_size", 0, 4);
    pub(crate) const COLOR_PLANES: Field = Field::new("color_planes", 12, 2);
}

//===========================================================================//


//===========================================================================//
