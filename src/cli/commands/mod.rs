use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cli::Output;
use crate::config::RenamerConfig;
use crate::parallel::{CancelToken, ExecutionStrategy};
use crate::rename::Renamer;

pub mod config;
pub mod exif;
pub mod hash;

#[derive(Parser)]
#[command(
    name = "hrenamer",
    version = crate::VERSION,
    about = "Rename files after their content hash or capture date",
    long_about = "hrenamer fingerprints files in parallel (content digest or EXIF capture \
                  timestamp) and renames them after it, never overwriting an existing file."
)]
pub struct Cli {
    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rename files after a digest of their content
    Hash(hash::HashArgs),
    /// Rename photos and videos after their capture date
    Exif(exif::ExifArgs),
    /// Inspect the effective configuration
    Config(config::ConfigArgs),
}

/// How a run ended, mapped to the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    Interrupted,
}

impl RunStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Completed => 0,
            RunStatus::Interrupted => 1,
        }
    }
}

impl Cli {
    pub async fn run(self) -> Result<RunStatus> {
        // Set up logging based on verbosity
        setup_logging(self.verbose, self.quiet);

        let config = RenamerConfig::load_with_custom_config(self.config.as_deref())?;
        if self.no_color || !config.output.color {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }

        let output = Output::new(self.verbose > 0, self.quiet);
        match self.command {
            Commands::Hash(args) => hash::execute(args, &config, output).await,
            Commands::Exif(args) => exif::execute(args, &config, output).await,
            Commands::Config(args) => {
                config::execute(args, &config, self.config.as_deref(), &output)?;
                Ok(RunStatus::Completed)
            }
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// `--jobs` when given, otherwise the configured share of the available cores
pub(crate) fn execution_strategy(jobs: Option<u32>, config: &RenamerConfig) -> ExecutionStrategy {
    let workers = match jobs {
        Some(jobs) => jobs as usize,
        None => ExecutionStrategy::calculate_optimal_workers(
            config.parallel.max_threads,
            config.parallel.thread_percentage,
        ),
    };
    ExecutionStrategy::from_jobs(workers)
}

/// Run `renamer` off the async runtime and race it against Ctrl-C.
///
/// On interrupt the workers stop picking up files and the caller is expected to
/// exit right away; jobs already running are abandoned.
pub(crate) async fn run_renamer(
    renamer: Renamer,
    inputs: Vec<PathBuf>,
    recursive: bool,
    output: Output,
) -> Result<RunStatus> {
    let cancel = CancelToken::new();
    let worker_cancel = cancel.clone();

    let mut job = tokio::task::spawn_blocking(move || {
        renamer.run(
            inputs,
            recursive,
            &worker_cancel,
            move |skipped| output.skipped(skipped),
            |report| output.report(report),
        )
    });

    tokio::select! {
        joined = &mut job => {
            let summary = joined.context("Rename task panicked")??;
            output.summary(&summary);
            Ok(RunStatus::Completed)
        }
        Ok(()) = tokio::signal::ctrl_c() => {
            cancel.cancel();
            output.interrupted();
            Ok(RunStatus::Interrupted)
        }
    }
}
