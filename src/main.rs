use clap::Parser;
use comment_density::cli::format;
use comment_density::cli::{Cli, Commands, OutputFormat};
use comment_density::scan::{self, ScanOptions, ThresholdMode};
use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            dir,
            config,
            format: output_format,
            per_language,
            gitignore,
        } => {
            let options = ScanOptions {
                respect_gitignore: gitignore,
                threshold_mode: if per_language {
                    ThresholdMode::PerLanguage
                } else {
                    ThresholdMode::Overall
                },
            };

            let result = match scan::run_scan(&config, &dir, &options) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("\x1b[31merror\x1b[0m: {}", e);
                    process::exit(2);
                }
            };

            match output_format {
                OutputFormat::Pretty => format::print_pretty(&result),
                OutputFormat::Json => format::print_json(&result),
            }

            process::exit(if result.any_exceeded() { 1 } else { 0 });
        }
    }
}
