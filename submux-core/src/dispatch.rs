//! Concurrent merge dispatch.
//!
//! Fans out one external merge invocation per pair onto a bounded worker
//! pool, waits for every job to finish, and fans the outcomes back in.
//! Each job captures its own output and error independently; a failing job
//! never cancels its siblings. Results are tagged with the originating
//! pair index because completion order carries no meaning.

use std::path::PathBuf;

use rayon::prelude::*;

use crate::error::{CoreError, CoreResult};
use crate::external::{JobError, MergeExecutor, MergeInvocation};
use crate::pairing::PairedJob;

/// Everything shared by all jobs of one run: where the files live, where
/// merged output goes, and the language tag to attach.
#[derive(Debug, Clone)]
pub struct MergePlan {
    pub dir: PathBuf,
    pub output_dir: PathBuf,
    pub language_code: String,
    pub display_name: String,
}

/// Outcome of one dispatched merge, produced exactly once by the job that
/// ran it and never mutated afterwards.
#[derive(Debug)]
pub struct JobResult {
    pub index: usize,
    pub video: String,
    pub subtitle: String,
    pub stdout: Vec<u8>,
    pub error: Option<JobError>,
}

impl JobResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Runs one merge job per pair on a pool of at most `max_jobs` workers and
/// returns every job's result.
///
/// The call blocks until all launched jobs have completed (a join
/// barrier); no job is abandoned and no result is dropped or duplicated,
/// so the returned vector always has exactly one entry per pair.
pub fn dispatch_merges(
    pairs: &[PairedJob],
    plan: &MergePlan,
    executor: &dyn MergeExecutor,
    max_jobs: usize,
) -> CoreResult<Vec<JobResult>> {
    if pairs.is_empty() {
        return Ok(Vec::new());
    }

    let workers = max_jobs.max(1).min(pairs.len());
    log::info!(
        "dispatching {} merge job(s) on {} worker(s)",
        pairs.len(),
        workers
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| CoreError::WorkerPool(e.to_string()))?;

    let results: Vec<JobResult> = pool.install(|| {
        pairs
            .par_iter()
            .map(|pair| {
                let invocation = MergeInvocation::new(
                    &plan.dir,
                    &plan.output_dir,
                    pair,
                    &plan.language_code,
                    &plan.display_name,
                );
                let output = executor.execute(&invocation);
                match &output.error {
                    None => log::debug!("job {} ({}) finished", pair.index, pair.video),
                    Some(e) => log::warn!("job {} ({}) failed: {}", pair.index, pair.video, e),
                }
                JobResult {
                    index: pair.index,
                    video: pair.video.clone(),
                    subtitle: pair.subtitle.clone(),
                    stdout: output.stdout,
                    error: output.error,
                }
            })
            .collect()
    });

    debug_assert_eq!(results.len(), pairs.len());
    Ok(results)
}

/// Default worker count for the dispatch pool.
pub fn default_max_jobs() -> usize {
    num_cpus::get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::JobOutput;
    use std::path::Path;

    struct MockExecutor {
        fail_video: Option<String>,
    }

    impl MergeExecutor for MockExecutor {
        fn execute(&self, invocation: &MergeInvocation) -> JobOutput {
            if self.fail_video.as_deref() == Some(invocation.video.as_str()) {
                JobOutput {
                    stdout: b"partial output".to_vec(),
                    error: Some(JobError::NonZeroExit {
                        tool: "mock".to_string(),
                        code: 1,
                        stderr: "mock failure".to_string(),
                    }),
                }
            } else {
                JobOutput {
                    stdout: format!("merged {}", invocation.video).into_bytes(),
                    error: None,
                }
            }
        }
    }

    fn pairs(n: usize) -> Vec<PairedJob> {
        (0..n)
            .map(|i| PairedJob {
                index: i,
                video: format!("{:02}.mkv", i),
                subtitle: format!("{:02}.srt", i),
            })
            .collect()
    }

    fn plan() -> MergePlan {
        MergePlan {
            dir: Path::new("/videos").to_path_buf(),
            output_dir: Path::new("/videos/output").to_path_buf(),
            language_code: "eng".to_string(),
            display_name: "English".to_string(),
        }
    }

    #[test]
    fn one_result_per_pair() {
        let pairs = pairs(5);
        let executor = MockExecutor { fail_video: None };

        let results = dispatch_merges(&pairs, &plan(), &executor, 4).unwrap();
        assert_eq!(results.len(), 5);
        assert!(results.iter().all(JobResult::is_success));
    }

    #[test]
    fn failure_is_isolated_and_attributed() {
        let pairs = pairs(4);
        let executor = MockExecutor {
            fail_video: Some("02.mkv".to_string()),
        };

        let results = dispatch_merges(&pairs, &plan(), &executor, 2).unwrap();
        assert_eq!(results.len(), 4);

        let failed: Vec<&JobResult> = results.iter().filter(|r| !r.is_success()).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].index, 2);
        assert_eq!(failed[0].video, "02.mkv");
        // The failing job's captured stdout survives alongside its error.
        assert_eq!(failed[0].stdout, b"partial output");

        let succeeded = results.iter().filter(|r| r.is_success()).count();
        assert_eq!(succeeded, 3);
    }

    #[test]
    fn single_worker_still_runs_everything() {
        let pairs = pairs(6);
        let executor = MockExecutor { fail_video: None };

        let results = dispatch_merges(&pairs, &plan(), &executor, 1).unwrap();
        assert_eq!(results.len(), 6);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.index, i);
        }
    }

    #[test]
    fn no_pairs_means_no_results() {
        let executor = MockExecutor { fail_video: None };
        let results = dispatch_merges(&[], &plan(), &executor, 4).unwrap();
        assert!(results.is_empty());
    }
}
