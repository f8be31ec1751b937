use anyhow::Result;
use clap::{ArgGroup, Args};
use std::path::PathBuf;

use crate::cli::{Output, RunStatus};
use crate::config::RenamerConfig;
use crate::rename::{DigestFingerprinter, HashAlgorithm, MoveOptions, NamingRule, Renamer};

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("algorithm").multiple(false)))]
pub struct HashArgs {
    /// Files or directories to rename
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

    /// Use MD5 (default)
    #[arg(long, group = "algorithm")]
    pub md5: bool,
    /// Use SHA-1
    #[arg(long, group = "algorithm")]
    pub sha1: bool,
    /// Use SHA-224
    #[arg(long, group = "algorithm")]
    pub sha224: bool,
    /// Use SHA-256
    #[arg(long, group = "algorithm")]
    pub sha256: bool,
    /// Use SHA-384
    #[arg(long, group = "algorithm")]
    pub sha384: bool,
    /// Use SHA-512
    #[arg(long, group = "algorithm")]
    pub sha512: bool,

    /// Keep only the first N characters of the digest
    #[arg(short, long = "len", value_name = "N")]
    pub length: Option<usize>,

    /// Literal text placed before the digest
    #[arg(short, long, value_name = "STR", value_parser = parse_decoration)]
    pub prefix: Option<String>,

    /// Literal text placed after the digest
    #[arg(short, long, value_name = "STR", value_parser = parse_decoration)]
    pub suffix: Option<String>,

    /// Append the original extension (e.g. ".jpg")
    #[arg(short, long = "ext")]
    pub extension: bool,

    /// Move files into DIR instead of their own directory
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

fn parse_decoration(value: &str) -> Result<String, String> {
    if value.contains('/') || value.contains(std::path::MAIN_SEPARATOR) {
        Err("must not contain a path separator".to_string())
    } else {
        Ok(value.to_string())
    }
}

impl HashArgs {
    /// Algorithm picked on the command line, if any
    pub fn algorithm(&self) -> Option<HashAlgorithm> {
        [
            (self.md5, HashAlgorithm::Md5),
            (self.sha1, HashAlgorithm::Sha1),
            (self.sha224, HashAlgorithm::Sha224),
            (self.sha256, HashAlgorithm::Sha256),
            (self.sha384, HashAlgorithm::Sha384),
            (self.sha512, HashAlgorithm::Sha512),
        ]
        .into_iter()
        .find_map(|(selected, algorithm)| selected.then_some(algorithm))
    }

    /// Command-line flags layered over the configured defaults
    pub fn naming_rule(&self, config: &RenamerConfig) -> NamingRule {
        NamingRule {
            algorithm: self.algorithm().unwrap_or(config.hash.algorithm),
            length: self.length.unwrap_or(config.hash.length),
            prefix: self.prefix.clone(),
            suffix: self.suffix.clone(),
            keep_extension: self.extension || config.hash.extension,
        }
    }
}

pub async fn execute(args: HashArgs, config: &RenamerConfig, output: Output) -> Result<RunStatus> {
    let rule = args.naming_rule(config);
    let strategy = super::execution_strategy(args.jobs, config);
    tracing::debug!("naming rule: {:?}, strategy: {:?}", rule, strategy);

    let renamer = Renamer::new(
        Box::new(DigestFingerprinter::new(rule.algorithm)),
        rule,
        MoveOptions {
            dry_run: args.dry_run,
            output: args.output,
        },
        strategy,
    );
    super::run_renamer(renamer, args.paths, args.recursive, output).await
}
