//! webload-ci entry point
//!
//! Parses the command line, runs the selected build step or command and
//! turns the outcome into the process exit code:
//! - `session` - run a load session template
//! - `report` - publish an Analytics report
//! - `config` - manage global configuration
//! - `portfolios` - list known portfolios
//!
//! Errors are printed with an explanation and a suggestion, then the process
//! exits with status 1.

use clap::Parser;
use webload_ci::cli;
use webload_ci::core::error::user_friendly_error;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
