extern crate favicon;

mod common;

use favicon::{
    pack_files, DimensionPolicy, Error, IconDir, PackOptions, ReadOptions,
};
use std::fs;
use std::io::Cursor;

//===========================================================================//

#[test]
fn pack_two_images_exact_layout() {
    let dir = tempfile::tempdir().unwrap();
    let small = common::write_png(dir.path(), "16.png", 16, 16, Some(800));
    let large = common::write_png(dir.path(), "32.png", 32, 32, Some(2000));
    let output = dir.path().join("out.ico");
    pack_files(&[&small, &large], &output, &PackOptions::default()).unwrap();

    let data = fs::read(&output).unwrap();
    assert_eq!(data.len(), 2838);
    // Header: reserved 0, type 1, count 2.
    assert_eq!(&data[0..6], b"\x00\x00\x01\x00\x02\x00");
    // First entry: 16x16, no palette/planes/depth, 800 bytes at offset 38.
    assert_eq!(
        &data[6..22],
        b"\x10\x10\x00\x00\x00\x00\x00\x00\x20\x03\x00\x00\x26\x00\x00\x00"
    );
    // Second entry: 32x32, 2000 bytes at offset 838.
    assert_eq!(
        &data[22..38],
        b"\x20\x20\x00\x00\x00\x00\x00\x00\xd0\x07\x00\x00\x46\x03\x00\x00"
    );
    assert_eq!(&data[38..838], fs::read(&small).unwrap().as_slice());
    assert_eq!(&data[838..], fs::read(&large).unwrap().as_slice());
}

#[test]
fn packed_offsets_are_contiguous() {
    let dir = tempfile::tempdir().unwrap();
    let paths: Vec<_> = [(1, 1), (7, 3), (48, 48), (64, 20), (255, 1)]
        .iter()
        .enumerate()
        .map(|(index, &(width, height))| {
            let name = format!("{}.png", index);
            common::write_png(dir.path(), &name, width, height, None)
        })
        .collect();
    let output = dir.path().join("out.ico");
    let plan = pack_files(&paths, &output, &PackOptions::default()).unwrap();

    let data = fs::read(&output).unwrap();
    assert_eq!(data.len() as u64, plan.total_len());
    let icondir =
        IconDir::read(Cursor::new(&data), &ReadOptions::default()).unwrap();
    assert_eq!(&icondir, plan.directory());
    let entries = icondir.entries();
    assert_eq!(entries[0].data_offset(), 6 + 16 * 5);
    for (index, entry) in entries.iter().enumerate() {
        assert!(entry.data_end() <= data.len() as u64);
        if index > 0 {
            assert_eq!(entry.data_offset() as u64, entries[index - 1].data_end());
        }
        let source = fs::read(&paths[index]).unwrap();
        assert_eq!(entry.data_size() as usize, source.len());
    }
    assert_eq!(entries[3].width(), 64);
    assert_eq!(entries[3].height(), 20);
}

#[test]
fn pack_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let input = common::write_png(dir.path(), "a.png", 8, 8, None);
    let output = dir.path().join("nested").join("deeper").join("out.ico");
    pack_files(&[&input], &output, &PackOptions::default()).unwrap();
    assert!(output.is_file());
}

#[test]
fn pack_256_stores_zero() {
    let dir = tempfile::tempdir().unwrap();
    let input = common::write_png(dir.path(), "big.png", 256, 256, None);
    let output = dir.path().join("out.ico");
    pack_files(&[&input], &output, &PackOptions::default()).unwrap();
    let data = fs::read(&output).unwrap();
    assert_eq!(data[6], 0);
    assert_eq!(data[7], 0);
}

#[test]
fn pack_oversized_image_rejected_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let ok = common::write_png(dir.path(), "ok.png", 16, 16, None);
    let huge = common::write_png(dir.path(), "huge.png", 300, 10, None);
    let output = dir.path().join("out.ico");
    let result = pack_files(&[&ok, &huge], &output, &PackOptions::default());
    match result {
        Err(Error::DimensionOutOfRange { width, height, .. }) => {
            assert_eq!((width, height), (300, 10));
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(!output.exists());
}

#[test]
fn pack_oversized_image_clamped() {
    let dir = tempfile::tempdir().unwrap();
    let huge = common::write_png(dir.path(), "huge.png", 300, 10, None);
    let output = dir.path().join("out.ico");
    let options = PackOptions { dimension_policy: DimensionPolicy::Clamp };
    pack_files(&[&huge], &output, &options).unwrap();
    let data = fs::read(&output).unwrap();
    assert_eq!(data[6], 0);
    assert_eq!(data[7], 10);
}

#[test]
fn pack_non_png_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join("notes.txt");
    fs::write(&bogus, b"definitely not a png").unwrap();
    let output = dir.path().join("out.ico");
    let result = pack_files(&[&bogus], &output, &PackOptions::default());
    assert!(matches!(result, Err(Error::Png { .. })), "{:?}", result);
    assert!(!output.exists());
}

#[test]
fn pack_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.png");
    let output = dir.path().join("out.ico");
    let result = pack_files(&[&missing], &output, &PackOptions::default());
    assert!(matches!(result, Err(Error::Io(_))), "{:?}", result);
}

#[test]
fn pack_empty_list_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.ico");
    let paths: [&std::path::Path; 0] = [];
    let result = pack_files(&paths, &output, &PackOptions::default());
    assert!(matches!(result, Err(Error::InvalidInput(_))));
    assert!(!output.exists());
}

//===========================================================================//
