//! Pair resolution: decide which files across two roots get compared.
//!
//! Two files produce a single job. Two directories are walked in lock-step,
//! one level at a time, in sorted file-name order. A child takes part only
//! when the same name exists in both trees with the same kind (image file or
//! directory); everything else is skipped without error.

use log::debug;
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::types::{CompareJob, ComparisonKind, ImageFormat};

/// A child present in both trees
enum Matched {
    File(OsString),
    Dir(OsString),
}

/// Build the ordered job list for two roots.
///
/// With two files the export root is used as-is. With two directories every
/// matched image gets `<export_root>/<relative dir>/<file stem>` as its
/// export destination.
pub fn resolve_jobs(
    root_a: &Path,
    root_b: &Path,
    comparisons: &[ComparisonKind],
    export_root: Option<&Path>,
) -> Result<Vec<CompareJob>> {
    let meta_a = stat(root_a)?;
    let meta_b = stat(root_b)?;

    match (meta_a.is_dir(), meta_b.is_dir()) {
        (false, false) => Ok(vec![CompareJob::new(
            root_a,
            root_b,
            comparisons.to_vec(),
            export_root.map(Path::to_path_buf),
        )]),
        (true, true) => {
            let mut jobs = Vec::new();
            resolve_level(root_a, root_b, export_root, comparisons, &mut jobs)?;
            debug!(
                "Resolved {} pairs between {} and {}",
                jobs.len(),
                root_a.display(),
                root_b.display()
            );
            Ok(jobs)
        }
        _ => Err(Error::MixedSources {
            a: root_a.to_path_buf(),
            b: root_b.to_path_buf(),
        }),
    }
}

fn resolve_level(
    dir_a: &Path,
    dir_b: &Path,
    export_dir: Option<&Path>,
    comparisons: &[ComparisonKind],
    jobs: &mut Vec<CompareJob>,
) -> Result<()> {
    let matched = match_children(dir_a, dir_b)?;
    let export_names = export_names(&matched);

    for entry in &matched {
        match entry {
            Matched::File(name) => {
                let export = export_dir.map(|dir| dir.join(&export_names[name]));
                jobs.push(CompareJob::new(
                    dir_a.join(name),
                    dir_b.join(name),
                    comparisons.to_vec(),
                    export,
                ));
            }
            Matched::Dir(name) => {
                let export = export_dir.map(|dir| dir.join(name));
                resolve_level(
                    &dir_a.join(name),
                    &dir_b.join(name),
                    export.as_deref(),
                    comparisons,
                    jobs,
                )?;
            }
        }
    }

    Ok(())
}

/// Immediate children of `dir_a` that have a same-kind counterpart in `dir_b`
fn match_children(dir_a: &Path, dir_b: &Path) -> Result<Vec<Matched>> {
    // Stat alone succeeds on a directory that cannot be listed
    fs::read_dir(dir_b)?;

    let mut matched = Vec::new();

    for entry in WalkDir::new(dir_a)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(io::Error::from)?;
        let name = entry.file_name().to_os_string();
        let counterpart = dir_b.join(&name);

        let other = match fs::metadata(&counterpart) {
            Ok(other) => other,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No counterpart for {}", entry.path().display());
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let file_type = entry.file_type();
        if file_type.is_file() && other.is_file() {
            if is_image_path(entry.path()) {
                matched.push(Matched::File(name));
            }
        } else if file_type.is_dir() && other.is_dir() {
            matched.push(Matched::Dir(name));
        } else {
            debug!(
                "Skipping {}: file/directory mismatch with {}",
                entry.path().display(),
                counterpart.display()
            );
        }
    }

    Ok(matched)
}

/// Export directory name per matched file: the stem, or `<stem>_<ext>` when
/// the stem is shared with another matched file or a matched directory at
/// this level.
fn export_names(matched: &[Matched]) -> HashMap<OsString, OsString> {
    let mut files: Vec<&OsString> = Vec::new();
    let mut dirs: HashSet<&OsString> = HashSet::new();
    for entry in matched {
        match entry {
            Matched::File(name) => files.push(name),
            Matched::Dir(name) => {
                dirs.insert(name);
            }
        }
    }

    let mut stem_counts: HashMap<OsString, usize> = HashMap::new();
    for name in &files {
        *stem_counts.entry(stem_of(name)).or_default() += 1;
    }

    files
        .into_iter()
        .map(|name| {
            let stem = stem_of(name);
            let export = if stem_counts[&stem] > 1 || dirs.contains(&stem) {
                let mut with_ext = stem.clone();
                if let Some(ext) = Path::new(name).extension() {
                    with_ext.push("_");
                    with_ext.push(ext);
                }
                with_ext
            } else {
                stem
            };
            (name.clone(), export)
        })
        .collect()
}

fn stem_of(name: &OsString) -> OsString {
    Path::new(name)
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| name.clone())
}

fn stat(path: &Path) -> Result<fs::Metadata> {
    fs::metadata(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
        _ => Error::Io(e),
    })
}

/// Get image format from file extension
fn get_image_format(path: &Path) -> Option<ImageFormat> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(ImageFormat::from_extension)
}

/// Returns if the given path has a decodable image extension
pub fn is_image_path(path: &Path) -> bool {
    match get_image_format(path) {
        Some(format) => format.is_supported(),
        None => false,
    }
}

// -- Tests --
