//! Sequential output names for `--rename`.
//!
//! Renamed files are numbered in processing order with a five-digit,
//! zero-padded counter and the original extension lower-cased:
//!
//! ```text
//! IMG_2041.JPG   → 00001.jpg
//! screenshot.png → 00002.png
//! DSC0001.jpeg   → 00003.jpeg
//! ```
//!
//! A number whose name is already taken by some *other* file is skipped, so
//! renaming never clobbers an existing image. A file that already carries its
//! target name keeps it.

use std::path::{Path, PathBuf};

/// Format a sequential file name: `00042` + `.png`.
///
/// `ext` is lower-cased; pass it without the leading dot.
pub fn sequential_name(index: u32, ext: &str) -> String {
    format!("{:05}.{}", index, ext.to_ascii_lowercase())
}

/// Hands out destination paths `00001.ext`, `00002.ext`, ... in one directory.
#[derive(Debug, Clone)]
pub struct SequentialNamer {
    dir: PathBuf,
    next: u32,
}

impl SequentialNamer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            next: 1,
        }
    }

    /// Next destination for `source`.
    ///
    /// Skips numbers whose path `is_taken` unless that path is `source`
    /// itself. The counter advances past the returned number, so every file
    /// in a batch consumes exactly one slot.
    pub fn next_for(&mut self, source: &Path, is_taken: impl Fn(&Path) -> bool) -> PathBuf {
        let ext = source
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();

        loop {
            let candidate = self.dir.join(sequential_name(self.next, &ext));
            self.next += 1;
            if candidate == source || !is_taken(&candidate) {
                return candidate;
            }
        }
    }
}
