//! Lawsuit tracker main entry point
//!
//! This is the command-line interface for retrieving lawsuit movements.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use lawsuit_tracker::config::{load_or_default, FailurePolicy};
use lawsuit_tracker::crawler::{parse_codes, retrieve, RunSummary, SearchTarget};
use lawsuit_tracker::output::{ConsoleOutput, FileOutput, OutputHandler};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Lawsuit: a web tracker that retrieves all the movements of a lawsuit
///
/// Looks each lawsuit code up on the public consultation portal and prints
/// every recorded movement, page by page, in the order the portal lists them.
/// `retrieve` is the default command, so `lawsuit <CODES>` and
/// `lawsuit retrieve <CODES>` are equivalent.
#[derive(Parser, Debug)]
#[command(name = "lawsuit")]
#[command(version)]
#[command(about = "Retrieve all the movements of the specified lawsuits", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    retrieve: RetrieveArgs,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Retrieve all the movements of the specified lawsuits
    #[command(visible_alias = "r")]
    Retrieve(RetrieveArgs),
}

#[derive(Args, Debug, Default)]
struct RetrieveArgs {
    /// Lawsuit codes, as separate arguments or a space/comma-delimited list
    #[arg(value_name = "CODES")]
    codes: Vec<String>,

    /// Save each lawsuit in a txt file
    #[arg(short, long)]
    save: bool,

    /// Directory for saved lawsuit files (overrides the configuration)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Keep crawling the remaining codes when one fails
    #[arg(long)]
    continue_on_error: bool,
}

impl Cli {
    /// Arguments of the retrieve command, whether named or implied
    fn into_retrieve(self) -> RetrieveArgs {
        match self.command {
            Some(Command::Retrieve(args)) => args,
            None => self.retrieve,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let args = cli.into_retrieve();
    let targets = targets_from(&args)?;

    let mut config = load_or_default(args.config.as_deref()).with_context(|| match &args.config {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Invalid default configuration".to_string(),
    })?;

    if let Some(dir) = &args.output_dir {
        config.output.directory = dir.display().to_string();
    }
    if args.continue_on_error {
        config.run.on_failure = FailurePolicy::Continue;
    }

    let mut outputs: Vec<Box<dyn OutputHandler>> = vec![Box::new(ConsoleOutput::stdout())];
    if args.save {
        tracing::info!("Save enabled, writing to {}", config.output.directory);
        outputs.push(Box::new(FileOutput::new(&config.output.directory)));
    }

    tracing::info!(
        "Retrieving {} lawsuit(s) from {}",
        targets.len(),
        config.portal.base_url
    );

    let summary = retrieve(&config, &targets, &mut outputs).await?;
    check_summary(&summary, targets.len())?;

    tracing::info!("Retrieved {} lawsuit(s)", summary.completed.len());
    Ok(())
}

/// Splits the positional arguments into codes, rejecting an empty list
fn targets_from(args: &RetrieveArgs) -> anyhow::Result<Vec<SearchTarget>> {
    let targets = parse_codes(&args.codes);
    if targets.is_empty() {
        bail!("Missing lawsuit code");
    }
    Ok(targets)
}

/// Turns a run with any failed code into an error, so the process exits 1
///
/// Each failure has already been logged by the crawler.
fn check_summary(summary: &RunSummary, attempted: usize) -> anyhow::Result<()> {
    if !summary.is_success() {
        bail!(
            "{} of {} lawsuit(s) failed",
            summary.failed.len(),
            attempted
        );
    }
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so that stdout carries only the movements.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("lawsuit_tracker=info,lawsuit=info,warn"),
            1 => EnvFilter::new("lawsuit_tracker=debug,lawsuit=debug,info"),
            2 => EnvFilter::new("lawsuit_tracker=trace,lawsuit=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use lawsuit_tracker::crawler::CrawlState;
    use lawsuit_tracker::{CrawlError, TrackerError};

    fn codes(args: &RetrieveArgs) -> Vec<String> {
        targets_from(args)
            .unwrap()
            .iter()
            .map(|target| target.code().to_string())
            .collect()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_save_and_codes() {
        let args = Cli::parse_from(["lawsuit", "-s", "0001,0002", "0003"]).into_retrieve();
        assert!(args.save);
        assert_eq!(codes(&args), vec!["0001", "0002", "0003"]);
    }

    #[test]
    fn test_retrieve_subcommand() {
        let args = Cli::parse_from(["lawsuit", "retrieve", "0001"]).into_retrieve();
        assert_eq!(codes(&args), vec!["0001"]);
    }

    #[test]
    fn test_retrieve_alias_with_flags() {
        let cli = Cli::parse_from(["lawsuit", "r", "-s", "-v", "0001 0002"]);
        assert_eq!(cli.verbose, 1);

        let args = cli.into_retrieve();
        assert!(args.save);
        assert_eq!(codes(&args), vec!["0001", "0002"]);
    }

    #[test]
    fn test_missing_code_is_an_error() {
        let args = Cli::parse_from(["lawsuit"]).into_retrieve();
        let err = targets_from(&args).unwrap_err();
        assert_eq!(err.to_string(), "Missing lawsuit code");

        let args = Cli::parse_from(["lawsuit", "retrieve", ", ,"]).into_retrieve();
        assert!(targets_from(&args).is_err());
    }

    #[test]
    fn test_successful_run_exits_cleanly() {
        assert!(check_summary(&RunSummary::default(), 0).is_ok());
    }

    #[test]
    fn test_failed_code_fails_the_run() {
        let summary = RunSummary {
            failed: vec![CrawlError {
                code: "0001".to_string(),
                stage: CrawlState::Paginating(1),
                source: TrackerError::Transport {
                    url: "https://portal.test/lawsuit".to_string(),
                    status: 500,
                },
            }],
            ..RunSummary::default()
        };

        let err = check_summary(&summary, 2).unwrap_err();
        assert_eq!(err.to_string(), "1 of 2 lawsuit(s) failed");
    }
}
