use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::cli::{Output, RunStatus};
use crate::config::RenamerConfig;
use crate::rename::{ExifTool, MoveOptions, NamingRule, Renamer};

#[derive(Args, Debug)]
pub struct ExifArgs {
    /// Photos, videos or directories to rename
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Descend into directories
    #[arg(short, long)]
    pub recursive: bool,

    /// Report planned actions without touching any file
    #[arg(short = 'n', long = "dryrun")]
    pub dry_run: bool,

    /// Worker pool size (defaults to the configured share of CPU cores)
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub jobs: Option<u32>,

    /// Move files into DIR instead of their own directory
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// exiftool executable (overrides configuration and EXIFTOOL_BIN)
    #[arg(long, value_name = "BIN")]
    pub exiftool: Option<String>,
}

pub async fn execute(args: ExifArgs, config: &RenamerConfig, output: Output) -> Result<RunStatus> {
    let bin = args.exiftool.as_deref().unwrap_or(&config.exiftool.bin);
    let exiftool = ExifTool::resolve(bin)?;
    let strategy = super::execution_strategy(args.jobs, config);

    let renamer = Renamer::new(
        Box::new(exiftool),
        NamingRule::default(),
        MoveOptions {
            dry_run: args.dry_run,
            output: args.output,
        },
        strategy,
    );
    super::run_renamer(renamer, args.paths, args.recursive, output.with_hints(true)).await
}
