//! Per-file resize pipeline and batch driver.
//!
//! Every file goes through the same linear steps:
//!
//! ```text
//! identify → decide → (resample + encode + write) | (rename | copy | skip)
//! ```
//!
//! and ends in exactly one [`FileOutcome`]. A failure is recorded on that
//! file's report and the batch moves on; nothing short of an invalid
//! invocation stops a run.
//!
//! ## Outcomes
//!
//! | Outcome | When |
//! |---|---|
//! | `Resized` | longest edge was above the limit, new file written |
//! | `Skipped` | already within the limit (or already carries its rename target) |
//! | `Renamed` | `--rename` in place, no resize needed, file moved |
//! | `Copied` | `--rename --output`, no resize needed, file copied |
//! | `Unsupported` | extension is not `.jpg`/`.jpeg`/`.png` |
//! | `Failed` | decode, encode or file-system error |
//!
//! With `dry_run` the same decisions are made (image headers are still read)
//! but nothing is written, moved, copied or removed.
//!
//! ## Rename numbering
//!
//! `--rename` targets are picked just before each file is processed, so a
//! name vacated by an earlier rename in the same batch is free again for the
//! next file. Dry runs track vacated names instead of touching the disk.

use crate::config::{BatchOptions, ResizeConfig};
use crate::imaging::{
    BackendError, Dimensions, ImageBackend, ImageFormat, ResizeParams, RustBackend,
    compute_target_size, map_quality_to_compression, should_resize,
};
use crate::naming::SequentialNamer;
use crate::scan::{self, ScanEntry, ScanError};
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why a single file could not be processed.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("no output name assigned to {0}")]
    Unnamed(PathBuf),
    #[error("cannot decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot encode {path}: {reason}")]
    Encode { path: PathBuf, reason: String },
}

impl ProcessError {
    fn from_backend(path: &Path, err: BackendError) -> Self {
        let path = path.to_path_buf();
        match err {
            BackendError::Io(source) => Self::Io { path, source },
            BackendError::Decode(reason) => Self::Decode { path, reason },
            BackendError::Encode(reason) => Self::Encode { path, reason },
        }
    }

    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Short machine-readable name of the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unnamed(_) => "unnamed",
            Self::Decode { .. } => "decode",
            Self::Io { .. } => "io",
            Self::Encode { .. } => "encode",
        }
    }
}

/// Where a task's output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Overwrite the source file.
    InPlace,
    /// Write the resized file here. Files within bounds are not copied.
    Output(PathBuf),
    /// Sequential rename into `dir`; the name is assigned when the batch
    /// reaches this file.
    Numbered { dir: PathBuf, in_place: bool },
    /// Sequential rename: the file ends up at `to` whether or not it is
    /// resized. `in_place` means the source is moved rather than copied.
    Renamed { to: PathBuf, in_place: bool },
}

/// One image to process.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTask {
    pub source: PathBuf,
    pub format: ImageFormat,
    pub placement: Placement,
}

impl ImageTask {
    /// Build a task for `source`, detecting the format from its extension.
    /// `None` when the extension is not a supported image format.
    pub fn new(source: impl Into<PathBuf>, placement: Placement) -> Option<Self> {
        let source = source.into();
        let format = ImageFormat::from_path(&source)?;
        Some(Self {
            source,
            format,
            placement,
        })
    }

    /// Path the output is written to; `None` until a numbered task has been
    /// given its name.
    pub fn destination(&self) -> Option<&Path> {
        match &self.placement {
            Placement::InPlace => Some(&self.source),
            Placement::Output(path) => Some(path),
            Placement::Numbered { .. } => None,
            Placement::Renamed { to, .. } => Some(to),
        }
    }

    /// Whether a successful run removes the file from `source`.
    fn vacates_source(&self) -> bool {
        matches!(&self.placement, Placement::Renamed { to, in_place: true } if *to != self.source)
    }
}

/// Assigns rename targets as a batch progresses.
///
/// A candidate name is taken when a file exists there, unless that file was
/// already moved away earlier in this batch (or would have been, in a dry
/// run).
#[derive(Debug, Default)]
struct RenameState {
    namer: Option<SequentialNamer>,
    vacated: HashSet<PathBuf>,
}

impl RenameState {
    fn assign(&mut self, task: &mut ImageTask) {
        let Placement::Numbered { dir, in_place } = &task.placement else {
            return;
        };
        let in_place = *in_place;
        let namer = self
            .namer
            .get_or_insert_with(|| SequentialNamer::new(dir.clone()));
        let vacated = &self.vacated;
        let to = namer.next_for(&task.source, |p| p.exists() && !vacated.contains(p));
        task.placement = Placement::Renamed { to, in_place };
    }

    fn finished(&mut self, task: &ImageTask, outcome: &FileOutcome) {
        let moved = matches!(
            outcome,
            FileOutcome::Resized { .. } | FileOutcome::Renamed { .. }
        );
        if moved && task.vacates_source() {
            self.vacated.insert(task.source.clone());
        }
    }
}

/// Final state of one file.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Resized {
        from: Dimensions,
        to: Dimensions,
    },
    Skipped {
        dimensions: Dimensions,
    },
    Renamed {
        dimensions: Dimensions,
    },
    Copied {
        dimensions: Dimensions,
    },
    Unsupported,
    Failed {
        kind: &'static str,
        #[serde(serialize_with = "serialize_display")]
        error: ProcessError,
    },
}

fn serialize_display<S: Serializer>(error: &ProcessError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(error)
}

impl FileOutcome {
    fn failed(error: ProcessError) -> Self {
        Self::Failed {
            kind: error.kind(),
            error,
        }
    }
}

/// Outcome of one file plus where it came from and went to.
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub source: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathBuf>,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Per-outcome counts for a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub resized: usize,
    pub renamed: usize,
    pub copied: usize,
    pub skipped: usize,
    pub unsupported: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Resized { .. } => self.resized += 1,
            FileOutcome::Renamed { .. } => self.renamed += 1,
            FileOutcome::Copied { .. } => self.copied += 1,
            FileOutcome::Skipped { .. } => self.skipped += 1,
            FileOutcome::Unsupported => self.unsupported += 1,
            FileOutcome::Failed { .. } => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.resized + self.renamed + self.copied + self.skipped + self.unsupported + self.failed
    }
}

/// Everything a batch did.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub dry_run: bool,
    pub config: ResizeConfig,
    pub files: Vec<FileReport>,
    pub summary: BatchSummary,
}

/// Scan `input` and process every entry with the production backend.
pub fn process(
    input: &Path,
    config: &ResizeConfig,
    options: &BatchOptions,
    on_file: impl FnMut(&FileReport),
) -> Result<BatchReport, ScanError> {
    let entries = scan::scan(input, options)?;
    Ok(process_entries(
        &RustBackend::new(),
        entries,
        config,
        options.dry_run,
        on_file,
    ))
}

/// Process scanned entries in order using a specific backend (allows testing
/// with a mock). `on_file` is called as soon as each file is finished.
pub fn process_entries(
    backend: &impl ImageBackend,
    entries: Vec<ScanEntry>,
    config: &ResizeConfig,
    dry_run: bool,
    mut on_file: impl FnMut(&FileReport),
) -> BatchReport {
    let mut files = Vec::with_capacity(entries.len());
    let mut summary = BatchSummary::default();
    let mut renames = RenameState::default();

    for entry in entries {
        let report = match entry {
            ScanEntry::Image(mut task) => {
                renames.assign(&mut task);
                let outcome = resize_image(backend, &task, config, dry_run);
                renames.finished(&task, &outcome);
                FileReport {
                    outcome,
                    destination: task.destination().map(Path::to_path_buf),
                    source: task.source,
                }
            }
            ScanEntry::Unsupported(source) => {
                debug!(path = %source.display(), "unsupported format");
                FileReport {
                    source,
                    destination: None,
                    outcome: FileOutcome::Unsupported,
                }
            }
            ScanEntry::Unreadable { path, reason } => FileReport {
                outcome: FileOutcome::failed(ProcessError::Io {
                    path: path.clone(),
                    source: std::io::Error::other(reason),
                }),
                source: path,
                destination: None,
            },
        };
        summary.record(&report.outcome);
        on_file(&report);
        files.push(report);
    }

    info!(
        files = summary.total(),
        resized = summary.resized,
        skipped = summary.skipped,
        failed = summary.failed,
        "batch finished"
    );

    BatchReport {
        dry_run,
        config: *config,
        files,
        summary,
    }
}

/// Process one image. Errors are folded into [`FileOutcome::Failed`].
pub fn resize_image(
    backend: &impl ImageBackend,
    task: &ImageTask,
    config: &ResizeConfig,
    dry_run: bool,
) -> FileOutcome {
    match try_resize_image(backend, task, config, dry_run) {
        Ok(outcome) => outcome,
        Err(error) => {
            warn!(path = %task.source.display(), %error, "failed");
            FileOutcome::failed(error)
        }
    }
}

fn try_resize_image(
    backend: &impl ImageBackend,
    task: &ImageTask,
    config: &ResizeConfig,
    dry_run: bool,
) -> Result<FileOutcome, ProcessError> {
    let source = task.source.as_path();
    let destination = task
        .destination()
        .ok_or_else(|| ProcessError::Unnamed(source.to_path_buf()))?;
    let from = backend
        .identify(source)
        .map_err(|e| ProcessError::from_backend(source, e))?;

    if !should_resize(from.width, from.height, config.max_edge) {
        debug!(path = %source.display(), longest_edge = from.longest_edge(), "within bounds");
        return relocate_unchanged(task, from, dry_run);
    }

    let (width, height) = compute_target_size(from.width, from.height, config.max_edge);
    let to = Dimensions { width, height };
    let compression = map_quality_to_compression(config.quality, task.format);
    debug!(
        path = %source.display(),
        from = %format!("{}x{}", from.width, from.height),
        to = %format!("{width}x{height}"),
        ?compression,
        "resize"
    );

    if dry_run {
        return Ok(FileOutcome::Resized { from, to });
    }

    ensure_parent(destination)?;
    backend
        .resize(&ResizeParams {
            source: source.to_path_buf(),
            output: destination.to_path_buf(),
            width,
            height,
            format: task.format,
            compression,
        })
        .map_err(|e| ProcessError::from_backend(source, e))?;

    if task.vacates_source() {
        fs::remove_file(source).map_err(ProcessError::io(source))?;
    }

    info!(path = %destination.display(), "wrote {width}x{height}");
    Ok(FileOutcome::Resized { from, to })
}

/// Handle a file that needs no resampling.
///
/// Only rename mode moves or copies such files; everywhere else they are
/// skipped untouched.
fn relocate_unchanged(
    task: &ImageTask,
    dimensions: Dimensions,
    dry_run: bool,
) -> Result<FileOutcome, ProcessError> {
    let Placement::Renamed { to, in_place } = &task.placement else {
        return Ok(FileOutcome::Skipped { dimensions });
    };
    let source = task.source.as_path();
    if to == source {
        return Ok(FileOutcome::Skipped { dimensions });
    }

    if *in_place {
        if !dry_run {
            fs::rename(source, to).map_err(ProcessError::io(source))?;
        }
        Ok(FileOutcome::Renamed { dimensions })
    } else {
        if !dry_run {
            ensure_parent(to)?;
            fs::copy(source, to).map_err(ProcessError::io(to))?;
        }
        Ok(FileOutcome::Copied { dimensions })
    }
}

fn ensure_parent(path: &Path) -> Result<(), ProcessError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(ProcessError::io(parent))
        }
        _ => Ok(()),
    }
}
