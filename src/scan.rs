//! Input enumeration.
//!
//! Turns the input path (a single file or a directory) into the ordered list
//! of work items for a batch. Each entry already knows where its output goes,
//! so processing never has to reason about directory layout.
//!
//! ## Destinations
//!
//! ```text
//! in place              photos/a.jpg           → photos/a.jpg
//! --output out          photos/trip/a.jpg      → out/trip/a.jpg     (relative path kept)
//! --rename              photos/a.jpg           → photos/00001.jpg   (source moved)
//! --rename --output out photos/trip/a.jpg      → out/00001.jpg      (flat)
//! ```
//!
//! Rename targets are only numbered here; the actual name is picked when the
//! file is processed. An output directory that resolves to the input
//! directory counts as renaming in place.
//!
//! Hidden entries (names starting with `.`) are ignored. Directory entries are
//! sorted by file name so output order and rename numbering are reproducible.

use crate::config::BatchOptions;
use crate::process::{ImageTask, Placement};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Input path does not exist: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One item found while scanning the input.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEntry {
    /// A JPEG or PNG ready to process.
    Image(ImageTask),
    /// A file whose extension is not a supported image format.
    Unsupported(PathBuf),
    /// An entry that could not be read during traversal.
    Unreadable { path: PathBuf, reason: String },
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

/// Scan `input` and resolve the destination of every supported image.
pub fn scan(input: &Path, options: &BatchOptions) -> Result<Vec<ScanEntry>, ScanError> {
    if !input.exists() {
        return Err(ScanError::NotFound(input.to_path_buf()));
    }

    let (root, files) = if input.is_file() {
        let parent = input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf();
        (parent, vec![Ok(input.to_path_buf())])
    } else {
        (input.to_path_buf(), collect_files(input, options.recursive))
    };

    let entries = files
        .into_iter()
        .map(|file| match file {
            Err(entry) => entry,
            Ok(source) => {
                let placement = placement_for(&source, &root, options);
                match ImageTask::new(source.clone(), placement) {
                    Some(task) => ScanEntry::Image(task),
                    None => ScanEntry::Unsupported(source),
                }
            }
        })
        .collect();

    Ok(entries)
}

fn placement_for(source: &Path, root: &Path, options: &BatchOptions) -> Placement {
    match (&options.output_dir, options.rename) {
        (None, false) => Placement::InPlace,
        (Some(out), false) => Placement::Output(out.join(relative_to(source, root))),
        (None, true) => Placement::Numbered {
            dir: root.to_path_buf(),
            in_place: true,
        },
        (Some(out), true) => Placement::Numbered {
            dir: out.clone(),
            in_place: same_dir(out, root),
        },
    }
}

/// Whether both paths name the same directory once resolved. A path that
/// cannot be resolved (such as an output directory not created yet) only
/// matches itself literally.
fn same_dir(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Regular files under `dir`, in walk order. Traversal errors are returned
/// in place so the batch can report them without stopping.
fn collect_files(dir: &Path, recursive: bool) -> Vec<Result<PathBuf, ScanEntry>> {
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(if recursive { usize::MAX } else { 1 })
        .sort_by_file_name();

    walker
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_file() => Some(Ok(entry.into_path())),
            Ok(_) => None,
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| dir.to_path_buf());
                tracing::warn!(path = %path.display(), error = %err, "cannot read entry");
                Some(Err(ScanEntry::Unreadable {
                    path,
                    reason: err.to_string(),
                }))
            }
        })
        .collect()
}

/// Path of `file` below `root`; the bare file name if it is not below it.
fn relative_to(file: &Path, root: &Path) -> PathBuf {
    file.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| file.file_name().map(PathBuf::from).unwrap_or_default())
}
