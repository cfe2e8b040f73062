//! List the portfolios WebLOAD Analytics ships with.

use anyhow::Result;
use clap::Args;

use crate::constants::{DEFAULT_PORTFOLIO, KNOWN_PORTFOLIOS};

/// Command to list known portfolio names.
#[derive(Args, Debug)]
pub struct PortfoliosCommand {}

impl PortfoliosCommand {
    pub fn execute(self) -> Result<i32> {
        for name in KNOWN_PORTFOLIOS {
            if name == DEFAULT_PORTFOLIO {
                println!("{name} (default)");
            } else {
                println!("{name}");
            }
        }
        Ok(0)
    }
}
