use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;
use std::path::Path;

use crate::cli::Output;
use crate::config::{ConfigSource, RenamerConfig};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display current merged configuration (TOML)
    Show,
    /// List the configuration sources, lowest priority first
    Path,
}

pub fn execute(
    args: ConfigArgs,
    config: &RenamerConfig,
    custom_config: Option<&Path>,
    output: &Output,
) -> Result<()> {
    match args.command {
        ConfigCommand::Show => {
            print!("{}", config.to_toml()?);
        }
        ConfigCommand::Path => {
            for source in crate::config::core::sources(custom_config) {
                match &source {
                    ConfigSource::File(path) if path.is_file() => {
                        println!("{} {}", source, style("(found)").green())
                    }
                    ConfigSource::File(_) => println!("{} {}", source, style("(missing)").dim()),
                    ConfigSource::Defaults | ConfigSource::Env(_) => println!("{source}"),
                }
            }
            if output.is_verbose() {
                output.info("Environment variables use the HRENAMER_ prefix, nested keys use \"__\"");
            }
        }
    }
    Ok(())
}
