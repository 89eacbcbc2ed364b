//! Output directory staging.
//!
//! The destination for merged files is a fixed `output/` subdirectory of
//! the scanned directory. Staging must succeed before any merge job is
//! dispatched; a failure here is fatal to the whole run.

use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};

/// Name of the destination subdirectory created under the scanned directory.
pub const OUTPUT_DIR_NAME: &str = "output";

/// Ensures `<dir>/output` exists and returns its path.
///
/// An already-existing output directory is reused; anything else standing
/// in the way (a regular file named `output`, missing permissions, a full
/// disk) fails with `CoreError::StagingFailed`.
pub fn stage_output(dir: &Path) -> CoreResult<PathBuf> {
    let output_dir = dir.join(OUTPUT_DIR_NAME);
    std::fs::create_dir_all(&output_dir).map_err(|source| CoreError::StagingFailed {
        path: output_dir.clone(),
        source,
    })?;
    log::debug!("staged output directory {}", output_dir.display());
    Ok(output_dir)
}
