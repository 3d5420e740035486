use std::io::{self, Write};

use anyhow::Result;
use clap::Args;

use crate::Cli;
use super::open_repo;

#[derive(Args)]
pub struct AddArgs {
    /// Only print the tree id
    #[arg(short, long)]
    quiet: bool,
}

pub fn run(args: &AddArgs, _cli: &Cli) -> Result<i32> {
    let repo = open_repo()?;
    let (tree, stats) = repo.snapshot_with_stats()?;

    writeln!(io::stdout().lock(), "{tree}")?;
    if !args.quiet {
        writeln!(
            io::stderr().lock(),
            "{} new, {} unchanged files; {} new, {} unchanged directories; {} bytes",
            stats.blobs_written,
            stats.blobs_reused,
            stats.trees_written,
            stats.trees_reused,
            stats.bytes,
        )?;
    }
    Ok(0)
}
