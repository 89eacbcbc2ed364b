//! Aggregation of per-job merge outcomes.
//!
//! The dispatcher returns results in completion-driven order; this module
//! folds them into a summary ordered by pair index so every outcome is
//! reported, successes and failures alike, with a machine-readable JSON
//! form for scripting.

use std::fmt;

use serde::Serialize;

use crate::dispatch::JobResult;

/// Reportable outcome of one merge job.
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub index: usize,
    pub video: String,
    pub subtitle: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Raw tool stdout, lossily decoded.
    pub output: String,
}

/// Full outcome of one run: one report per dispatched pair.
#[derive(Debug, Clone, Serialize)]
pub struct MergeSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub jobs: Vec<JobReport>,
}

impl MergeSummary {
    /// Builds a summary from dispatch results, reordered by pair index so
    /// reporting is deterministic regardless of completion timing.
    pub fn from_results(mut results: Vec<JobResult>) -> Self {
        results.sort_by_key(|r| r.index);

        let jobs: Vec<JobReport> = results
            .into_iter()
            .map(|r| JobReport {
                index: r.index,
                video: r.video,
                subtitle: r.subtitle,
                ok: r.error.is_none(),
                error: r.error.map(|e| e.to_string()),
                output: String::from_utf8_lossy(&r.stdout).into_owned(),
            })
            .collect();

        let succeeded = jobs.iter().filter(|j| j.ok).count();
        MergeSummary {
            total: jobs.len(),
            succeeded,
            failed: jobs.len() - succeeded,
            jobs,
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for MergeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for job in &self.jobs {
            match &job.error {
                None => writeln!(f, "[OK]   {} + {}", job.video, job.subtitle)?,
                Some(e) => writeln!(f, "[FAIL] {} + {}: {}", job.video, job.subtitle, e)?,
            }
        }
        write!(
            f,
            "{} job(s): {} succeeded, {} failed",
            self.total, self.succeeded, self.failed
        )
    }
}
