pub mod config_file;
pub mod format;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "comment-density",
    version,
    about = "Measure comment density across a source tree"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a directory and report its overall comment density
    Scan {
        /// Directory to scan
        #[arg(long)]
        dir: PathBuf,

        /// Language rules file (JSON, or TOML with a `.toml` extension)
        #[arg(long)]
        config: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,

        /// Compare each language's threshold against that language's own density
        #[arg(long)]
        per_language: bool,

        /// Skip hidden and git-ignored files
        #[arg(long)]
        gitignore: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scan_flags() {
        let cli = Cli::try_parse_from([
            "comment-density",
            "scan",
            "--dir",
            "src",
            "--config",
            "density.json",
            "--format",
            "json",
            "--per-language",
        ])
        .unwrap();
        let Commands::Scan {
            dir,
            config,
            format,
            per_language,
            gitignore,
        } = cli.command;
        assert_eq!(dir, PathBuf::from("src"));
        assert_eq!(config, PathBuf::from("density.json"));
        assert_eq!(format, OutputFormat::Json);
        assert!(per_language);
        assert!(!gitignore);
    }

    #[test]
    fn dir_and_config_are_required() {
        assert!(Cli::try_parse_from(["comment-density", "scan", "--dir", "src"]).is_err());
        assert!(Cli::try_parse_from(["comment-density", "scan", "--config", "c.json"]).is_err());
    }
}
