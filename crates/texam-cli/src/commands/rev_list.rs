use std::io::{self, Write};

use anyhow::Result;
use bstr::ByteSlice;
use clap::Args;
use texam_revwalk::ObjectWalk;

use crate::Cli;
use super::{open_repo, resolve_rev};

#[derive(Args)]
pub struct RevListArgs {
    /// Print each object's path next to its id
    #[arg(long)]
    objects: bool,

    /// Print only the number of objects
    #[arg(long)]
    count: bool,

    /// Commit to start from
    #[arg(value_name = "commit", default_value = "HEAD")]
    rev: String,
}

pub fn run(args: &RevListArgs, _cli: &Cli) -> Result<i32> {
    let repo = open_repo()?;
    let start = resolve_rev(&repo, &args.rev)?;
    let mut out = io::stdout().lock();

    let mut count = 0usize;
    for item in ObjectWalk::new(repo.store(), start) {
        let item = item?;
        count += 1;
        if args.count {
            continue;
        }
        if args.objects && !item.path.is_empty() {
            writeln!(out, "{} {}", item.oid, item.path.to_str_lossy())?;
        } else {
            writeln!(out, "{}", item.oid)?;
        }
    }

    if args.count {
        writeln!(out, "{count}")?;
    }
    Ok(0)
}
