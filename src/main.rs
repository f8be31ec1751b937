use clap::Parser;
use std::io::Write;

use hrenamer::cli::{Cli, Output};

/// Exit code for startup and configuration errors, same as clap usage errors
const EXIT_STARTUP_ERROR: i32 = 2;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let quiet = cli.quiet;

    let code = match cli.run().await {
        Ok(status) => status.exit_code(),
        Err(err) => {
            Output::new(false, quiet).error(&format!("{err:#}"));
            EXIT_STARTUP_ERROR
        }
    };

    let _ = std::io::stdout().flush();
    // Exit without waiting for abandoned blocking jobs after an interrupt
    std::process::exit(code);
}
