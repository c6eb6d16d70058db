//! CLI interface for the resume matcher

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::Path;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "resume-match")]
#[command(about = "Score how well a resume matches a job posting")]
#[command(long_about = "Estimate experience, compare skills and produce a tiered recommendation for a resume against a job posting. Plain text and markdown inputs are supported.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score a resume against a job posting
    Match {
        /// Path to resume file (TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job posting file (TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Output format: console, json (defaults to the configured format)
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to a file or directory
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Plan the missing skills needed to reach this match percentage
        #[arg(short, long)]
        target: Option<f64>,

        /// Write the resume with the planned skills added to this file
        #[arg(long, requires = "target")]
        enhanced: Option<PathBuf>,

        /// Skip the completion service (date ranges and skill catalog only)
        #[arg(long)]
        offline: bool,

        /// Output detailed analysis
        #[arg(short, long)]
        detailed: bool,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },

    /// List the skills recognized without the completion service
    Catalog {
        /// Only list one category (e.g. "databases", "frontend")
        #[arg(long)]
        category: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" | "text" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        _ => Err(format!("Invalid output format: {}. Supported: console, json", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_command_parses() {
        let cli = Cli::try_parse_from([
            "resume-match", "match", "--resume", "cv.md", "--job", "job.txt", "--target", "80", "--offline",
        ])
        .unwrap();

        match cli.command {
            Commands::Match { resume, target, offline, output, .. } => {
                assert_eq!(resume, PathBuf::from("cv.md"));
                assert_eq!(target, Some(80.0));
                assert!(offline);
                assert!(output.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_enhanced_output_needs_target() {
        let base = ["resume-match", "match", "-r", "cv.md", "-j", "job.txt", "--enhanced", "out.md"];
        assert!(Cli::try_parse_from(base).is_err());

        let cli = Cli::try_parse_from(base.iter().copied().chain(["--target", "85"])).unwrap();
        match cli.command {
            Commands::Match { enhanced, target, .. } => {
                assert_eq!(enhanced, Some(PathBuf::from("out.md")));
                assert_eq!(target, Some(85.0));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["resume-match", "config", "path", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Config { action: Some(ConfigAction::Path) }
        ));
    }

    #[test]
    fn test_output_format_and_extensions() {
        assert_eq!(parse_output_format("JSON"), Ok(OutputFormat::Json));
        assert!(parse_output_format("pdf").is_err());
        assert!(validate_file_extension(Path::new("cv.MD"), &["txt", "md"]).is_ok());
        assert!(validate_file_extension(Path::new("cv.pdf"), &["txt", "md"]).is_err());
        assert!(validate_file_extension(Path::new("cv"), &["txt", "md"]).is_err());
    }
}
