//! Positional pairing of discovered video and subtitle files.
//!
//! Pairing is by sorted-index position, not content: index `i` of the
//! sorted video list is joined with index `i` of the sorted subtitle list.
//! Correctness therefore depends on the two sets sorting into the same
//! logical order, which is why mismatched filename stems are surfaced as
//! warnings before the user confirms the pairing.

use std::path::Path;

use crate::discovery::DiscoveredFiles;
use crate::error::{CoreError, CoreResult};

/// One unit of merge work: a video file and the subtitle file to mux into
/// it, tagged with the pairing position it originated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairedJob {
    pub index: usize,
    pub video: String,
    pub subtitle: String,
}

/// Joins the two candidate sets into an ordered sequence of `PairedJob`.
///
/// Fails with `CoreError::PairCountMismatch` when the set cardinalities
/// differ; this is a hard precondition checked before any pairing,
/// confirmation, or external action.
pub fn pair_files(files: &DiscoveredFiles) -> CoreResult<Vec<PairedJob>> {
    if files.videos.len() != files.subtitles.len() {
        return Err(CoreError::PairCountMismatch {
            videos: files.videos.len(),
            subtitles: files.subtitles.len(),
        });
    }

    let pairs: Vec<PairedJob> = files
        .videos
        .iter()
        .zip(files.subtitles.iter())
        .enumerate()
        .map(|(index, (video, subtitle))| PairedJob {
            index,
            video: video.clone(),
            subtitle: subtitle.clone(),
        })
        .collect();

    for pair in &pairs {
        if stem(&pair.video) != stem(&pair.subtitle) {
            log::warn!(
                "pair {}: '{}' and '{}' have different stems; check the pairing before confirming",
                pair.index,
                pair.video,
                pair.subtitle
            );
        }
    }

    Ok(pairs)
}

fn stem(name: &str) -> Option<&std::ffi::OsStr> {
    Path::new(name).file_stem()
}
