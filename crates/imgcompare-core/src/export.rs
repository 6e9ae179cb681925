use image::RgbaImage;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::logging::log_export;
use crate::types::{CompareJob, Comparison, ComparisonKind};

/// File name of the serialized [`Comparison`] inside an export directory
pub const META_FILE_NAME: &str = "meta.json";

/// Persist a finished job: one `<metric>.png` per diff, copies of both
/// sources under the names recorded in `comparison`, and `meta.json`.
///
/// The destination is created with its parents. Any failure is wrapped in
/// [`Error::Export`].
pub fn export_comparison(
    destination: &Path,
    job: &CompareJob,
    comparison: &Comparison,
    diffs: &[(ComparisonKind, RgbaImage)],
) -> Result<()> {
    write_artifacts(destination, job, comparison, diffs).map_err(|source| Error::Export {
        path: destination.to_path_buf(),
        source: Box::new(source),
    })
}

fn write_artifacts(
    destination: &Path,
    job: &CompareJob,
    comparison: &Comparison,
    diffs: &[(ComparisonKind, RgbaImage)],
) -> Result<()> {
    fs::create_dir_all(destination)?;

    for (kind, diff) in diffs {
        let path = destination.join(format!("{}.png", kind));
        diff.save_with_format(&path, image::ImageFormat::Png)?;
        log_export(&path, Some("diff"));
    }

    copy_source(&job.source_a, &destination.join(&comparison.source_a))?;
    copy_source(&job.source_b, &destination.join(&comparison.source_b))?;

    let meta_path = destination.join(META_FILE_NAME);
    let mut writer = BufWriter::new(File::create(&meta_path)?);
    serde_json::to_writer_pretty(&mut writer, comparison)?;
    writer.flush()?;
    log_export(&meta_path, None);

    Ok(())
}

fn copy_source(source: &Path, target: &Path) -> Result<()> {
    // Exporting next to the sources must not truncate them
    if let (Ok(src), Ok(dst)) = (source.canonicalize(), target.canonicalize()) {
        if src == dst {
            return Ok(());
        }
    }

    fs::copy(source, target)?;
    log_export(target, Some("source copy"));
    Ok(())
}
