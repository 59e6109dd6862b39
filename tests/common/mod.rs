use std::fs;
use std::path::{Path, PathBuf};

//===========================================================================//

/// Writes a grayscale PNG of the given dimensions to `dir/name`, then pads
/// it with zeros after the IEND chunk until it is `padded_len` bytes long
/// (if given).  The padding doesn't bother a header-only decoder, and lets
/// tests pin exact payload sizes.
pub fn write_png(
    dir: &Path,
    name: &str,
    width: u32,
    height: u32,
    padded_len: Option<usize>,
) -> PathBuf {
    let mut data = Vec::<u8>::new();
    {
        let mut encoder = png::Encoder::new(&mut data, width, height);
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        let pixels: Vec<u8> =
            (0..(width * height)).map(|index| (index % 251) as u8).collect();
        writer.write_image_data(&pixels).unwrap();
        writer.finish().unwrap();
    }
    if let Some(len) = padded_len {
        assert!(
            data.len() <= len,
            "{}x{} PNG is already {} bytes, more than {}",
            width,
            height,
            data.len(),
            len
        );
        data.resize(len, 0);
    }
    let path = dir.join(name);
    fs::write(&path, &data).unwrap();
    path
}

//===========================================================================//
