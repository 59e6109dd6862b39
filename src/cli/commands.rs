use anyhow::Context;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::extract::{unpack_file, ExportFormat};
use crate::icondir::{IconDir, ReadOptions};
use crate::pack::{
    collect_input_files, pack_files, DimensionPolicy, PackOptions,
};
use crate::restype::TypePolicy;

pub(super) fn pack(
    folder: &Path,
    output: &Path,
    clamp: bool,
) -> anyhow::Result<()> {
    let files = collect_input_files(folder)
        .with_context(|| format!("failed to walk {}", folder.display()))?;
    let options = PackOptions {
        dimension_policy: if clamp {
            DimensionPolicy::Clamp
        } else {
            DimensionPolicy::Reject
        },
    };
    let plan = pack_files(&files, output, &options)
        .with_context(|| format!("failed to pack {}", output.display()))?;
    println!(
        "Packed {} images into {} ({} bytes)",
        plan.directory().entries().len(),
        output.display(),
        plan.total_len()
    );
    Ok(())
}

pub(super) fn unpack(
    ico: &Path,
    format: ExportFormat,
    strict_type: bool,
) -> anyhow::Result<()> {
    let options = ReadOptions {
        type_policy: if strict_type {
            TypePolicy::Strict
        } else {
            TypePolicy::Permissive
        },
    };
    let written = unpack_file(ico, format, &options)
        .with_context(|| format!("failed to unpack {}", ico.display()))?;
    for file in &written {
        println!("{}", file.path.display());
    }
    Ok(())
}

pub(super) fn list(ico: &Path) -> anyhow::Result<()> {
    let file = File::open(ico)
        .with_context(|| format!("failed to open {}", ico.display()))?;
    let directory =
        IconDir::read(BufReader::new(&file), &ReadOptions::default())?;
    let header = directory.header();
    match header.resource_type() {
        Some(restype) => println!("Resource type: {:?}", restype),
        None => {
            println!("Resource type: unknown ({})", header.type_number())
        }
    }
    for (index, entry) in directory.entries().iter().enumerate() {
        let kind = entry.classify(&file)?;
        println!(
            "{:5}: {}x{} {:?}, {} bytes at offset {}",
            index,
            entry.width(),
            entry.height(),
            kind,
            entry.data_size(),
            entry.data_offset()
        );
    }
    Ok(())
}
