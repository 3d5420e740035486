use std::io::{self, Write};

use anyhow::{anyhow, Result};
use clap::Args;

use crate::Cli;
use super::open_repo;

#[derive(Args)]
pub struct ConfigArgs {
    /// Dotted key, e.g. remote.url
    key: String,

    /// New value; omit to print the current one
    value: Option<String>,
}

pub fn run(args: &ConfigArgs, _cli: &Cli) -> Result<i32> {
    let mut repo = open_repo()?;

    match args.value {
        Some(ref value) => {
            repo.config_mut()
                .set(&args.key, value)
                .map_err(|reason| anyhow!(reason))?;
            repo.save_config()?;
            Ok(0)
        }
        None => match repo.config().get(&args.key) {
            Some(value) => {
                writeln!(io::stdout().lock(), "{value}")?;
                Ok(0)
            }
            // Unset or unknown key, like `git config <key>`.
            None => Ok(1),
        },
    }
}
