//! # qq-resize
//!
//! Shrinks JPEG and PNG images so their longest edge fits the size at which
//! QQ mobile shows pictures at full resolution (542px by default). Anything
//! larger is scaled down proportionally and re-encoded; anything smaller is
//! left alone.
//!
//! # Pipeline
//!
//! Every run is a straight line, one file at a time:
//!
//! ```text
//! 1. Scan      input path  →  [ImageTask]      (file or directory → tasks with destinations)
//! 2. Decide    dimensions  →  resize or skip   (pure arithmetic)
//! 3. Process   task        →  FileOutcome      (resample + encode + write, or skip/rename/copy)
//! 4. Report    outcomes    →  tally            (text or JSON)
//! ```
//!
//! A file that fails is recorded as `Failed` and the batch carries on.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the input, filters by extension, resolves output paths |
//! | [`process`] | Per-file pipeline, batch driver, outcomes and tally |
//! | [`imaging`] | Size arithmetic, quality → compression mapping, `image`-crate backend |
//! | [`config`] | Defaults, optional TOML settings file, validation |
//! | [`naming`] | `00001.ext` sequential names for `--rename` |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Longest Edge Is Exact
//!
//! When an image is resized its longest edge becomes exactly the limit and
//! only the other edge is rounded (half away from zero). Running the tool
//! twice therefore never touches a file the second time.
//!
//! ## One Quality Knob For Two Formats
//!
//! JPEG takes the quality directly. PNG is lossless, so the same 1-100 value
//! is mapped onto a compression level: 100 means no compression, 1 means
//! maximum compression. See [`imaging::map_quality_to_compression`].
//!
//! ## No Partial Files
//!
//! Encoded output goes to a temporary file in the destination directory and
//! replaces the destination only once encoding succeeded, so overwriting in
//! place is safe even when an encode fails midway.

pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod process;
pub mod scan;
