use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use texam_repository::CommitMetadata;

use crate::Cli;
use super::open_repo;

#[derive(Args)]
pub struct CommitArgs {
    /// Test this commit is submitted for (defaults to remote.test_id)
    #[arg(short = 't', long = "test", value_name = "id")]
    test_id: Option<String>,

    /// Override the author (defaults to user.username)
    #[arg(long)]
    author: Option<String>,

    /// Override the recorded machine name
    #[arg(long)]
    host: Option<String>,

    /// Only print the commit id
    #[arg(short, long)]
    quiet: bool,
}

pub fn run(args: &CommitArgs, _cli: &Cli) -> Result<i32> {
    let repo = open_repo()?;

    let author = args
        .author
        .clone()
        .unwrap_or_else(|| repo.config().user.username.clone());
    let host = args.host.clone().unwrap_or_else(hostname);
    let mut metadata = CommitMetadata::new(author, host);
    if let Some(ref test_id) = args.test_id {
        metadata = metadata.with_test_id(test_id);
    }

    let (tree, stats) = repo.snapshot_with_stats()?;
    let oid = repo.commit(tree, &metadata)?;

    writeln!(io::stdout().lock(), "{oid}")?;
    if !args.quiet {
        writeln!(
            io::stderr().lock(),
            "[{}] {} files, {} changed",
            oid.to_hex_short(7),
            stats.blobs_written + stats.blobs_reused,
            stats.blobs_written,
        )?;
    }
    Ok(0)
}

/// Name of this machine: `$HOSTNAME`, then `/etc/hostname`, then "unknown".
fn hostname() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .or_else(|| std::fs::read_to_string("/etc/hostname").ok())
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
