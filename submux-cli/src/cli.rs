// submux-cli/src/cli.rs
//
// Defines the command-line argument structure using clap.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Submux: batch subtitle muxing tool",
    long_about = "Pairs video files with subtitle files by sorted order and muxes \
                  each pair with mkvmerge via the submux-core library."
)]
pub struct Cli {
    /// Directory containing the video and subtitle files
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Substring that identifies video files (e.g. "mkv")
    #[arg(value_name = "VIDEO_TOKEN")]
    pub video_token: String,

    /// Substring that identifies subtitle files (e.g. "srt")
    #[arg(value_name = "SUBTITLE_TOKEN")]
    pub subtitle_token: String,

    /// ISO 639-2 language code for the subtitle track (e.g. "eng")
    #[arg(value_name = "LANGUAGE")]
    pub language: String,

    /// Skip the interactive confirmation prompt
    #[arg(short = 'y', long = "yes")]
    pub assume_yes: bool,

    /// Maximum number of concurrent mkvmerge processes (defaults to CPU count)
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Per-job timeout in seconds (no timeout if omitted)
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Print the run summary as JSON instead of the human-readable report
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_four_positional_args() {
        let cli = Cli::parse_from(["submux", "videos", "mkv", "srt", "eng"]);
        assert_eq!(cli.directory, PathBuf::from("videos"));
        assert_eq!(cli.video_token, "mkv");
        assert_eq!(cli.subtitle_token, "srt");
        assert_eq!(cli.language, "eng");
        assert!(!cli.assume_yes);
        assert!(cli.jobs.is_none());
        assert!(cli.timeout.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::parse_from([
            "submux", "videos", "mkv", "srt", "jpn", "--yes", "--jobs", "2", "--timeout", "300",
            "--json",
        ]);
        assert!(cli.assume_yes);
        assert_eq!(cli.jobs, Some(2));
        assert_eq!(cli.timeout, Some(300));
        assert!(cli.json);
    }

    #[test]
    fn missing_positional_args_fail_to_parse() {
        assert!(Cli::try_parse_from(["submux", "videos", "mkv", "srt"]).is_err());
        assert!(Cli::try_parse_from(["submux"]).is_err());
    }
}
