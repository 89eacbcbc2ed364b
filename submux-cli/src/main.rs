// submux-cli/src/main.rs
//
// Entry point for the submux binary. Wires the core pipeline together:
// language validation, discovery, pairing, the confirmation gate, output
// staging, and the concurrent merge dispatch, then reports every job's
// outcome and exits non-zero if anything failed.

mod cli;
mod confirm;

use std::process;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;

use submux_core::{
    check_dependency, default_max_jobs, discover_files, dispatch_merges, language, pair_files,
    stage_output, CoreError, MergePlan, MergeSummary, MkvmergeExecutor, MERGE_TOOL,
};

use crate::cli::Cli;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::debug!("parsed arguments: {:?}", cli);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        if let Some(CoreError::LanguageNotSupported(_)) = e.downcast_ref::<CoreError>() {
            eprintln!(
                "supported languages: {}",
                language::supported_codes().join(", ")
            );
        }
        process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    // Validate the language before any filesystem work.
    let display_name = language::resolve(&cli.language)?;

    let files = discover_files(&cli.directory, &cli.video_token, &cli.subtitle_token)
        .with_context(|| format!("scanning '{}'", cli.directory.display()))?;
    let pairs = pair_files(&files)?;

    if !cli.assume_yes && !confirm::confirm_pairs(&pairs).context("reading confirmation")? {
        return Err(CoreError::Cancelled.into());
    }

    // Nothing destructive happens before this point: no directory has
    // been created and no process spawned.
    check_dependency(MERGE_TOOL)?;
    let output_dir = stage_output(&cli.directory)?;

    let plan = MergePlan {
        dir: cli.directory.clone(),
        output_dir,
        language_code: cli.language.clone(),
        display_name: display_name.to_string(),
    };
    let executor = MkvmergeExecutor::new(cli.timeout.map(Duration::from_secs));
    let max_jobs = cli.jobs.unwrap_or_else(default_max_jobs);

    let results = dispatch_merges(&pairs, &plan, &executor, max_jobs)?;
    let summary = MergeSummary::from_results(results);

    if cli.json {
        println!("{}", summary.to_json()?);
    } else {
        report(&summary);
    }

    if summary.all_succeeded() {
        Ok(())
    } else {
        Err(CoreError::MergeFailed {
            failed: summary.failed,
            total: summary.total,
        }
        .into())
    }
}

/// Prints every job's outcome in pair order: the tool's raw output for
/// successes, the error for failures. A failed job never suppresses the
/// results that come after it.
fn report(summary: &MergeSummary) {
    for job in &summary.jobs {
        if job.ok {
            println!("{} {} + {}", "[OK]".green(), job.video, job.subtitle);
            let output = job.output.trim_end();
            if !output.is_empty() {
                println!("{}", output);
            }
        } else {
            println!(
                "{} {} + {}: {}",
                "[FAIL]".red().bold(),
                job.video,
                job.subtitle,
                job.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
    println!(
        "{} job(s): {} succeeded, {} failed",
        summary.total, summary.succeeded, summary.failed
    );
}
