//! Core library for batch subtitle muxing with mkvmerge.
//!
//! This crate provides deterministic discovery and pairing of video and
//! subtitle files, output staging, and a bounded fan-out/fan-in dispatcher
//! that runs one external merge job per pair and aggregates every outcome.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use submux_core::{
//!     discover_files, pair_files, stage_output, dispatch_merges,
//!     MergePlan, MergeSummary, MkvmergeExecutor,
//! };
//!
//! let dir = Path::new("/path/to/videos");
//! let display_name = submux_core::language::resolve("eng").unwrap();
//!
//! let files = discover_files(dir, "mkv", "srt").unwrap();
//! let pairs = pair_files(&files).unwrap();
//! let output_dir = stage_output(dir).unwrap();
//!
//! let plan = MergePlan {
//!     dir: dir.to_path_buf(),
//!     output_dir,
//!     language_code: "eng".to_string(),
//!     display_name: display_name.to_string(),
//! };
//! let executor = MkvmergeExecutor::default();
//! let results = dispatch_merges(&pairs, &plan, &executor, 4).unwrap();
//! let summary = MergeSummary::from_results(results);
//! println!("{}", summary);
//! ```

pub mod discovery;
pub mod dispatch;
pub mod error;
pub mod external;
pub mod language;
pub mod pairing;
pub mod reporting;
pub mod staging;

// Re-exports for public API
pub use discovery::{discover_files, DiscoveredFiles};
pub use dispatch::{default_max_jobs, dispatch_merges, JobResult, MergePlan};
pub use error::{CoreError, CoreResult};
pub use external::{check_dependency, JobError, MergeExecutor, MkvmergeExecutor, MERGE_TOOL};
pub use pairing::{pair_files, PairedJob};
pub use reporting::{JobReport, MergeSummary};
pub use staging::{stage_output, OUTPUT_DIR_NAME};
