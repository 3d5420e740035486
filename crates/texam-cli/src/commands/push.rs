use std::io::{self, Write};
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Args;
use texam_transport::{connect, Credentials, PushRequest, RemoteUrl};
use tracing::debug;

use crate::Cli;
use super::open_repo;

#[derive(Args)]
pub struct PushArgs {
    /// Upload here instead of remote.url
    #[arg(long, value_name = "url")]
    url: Option<String>,

    /// Test id sent with the upload (defaults to the one in the commit)
    #[arg(short = 't', long = "test", value_name = "id")]
    test_id: Option<String>,

    /// List what would be uploaded without sending anything
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Be quiet, only report errors
    #[arg(short, long)]
    quiet: bool,
}

pub fn run(args: &PushArgs, _cli: &Cli) -> Result<i32> {
    let repo = open_repo()?;
    let config = repo.config();

    let head = repo.head_commit()?;
    let commit = repo.store().read_commit(&head)?;
    let request = PushRequest {
        root: repo.repo_dir().to_path_buf(),
        files: repo.transfer_set()?,
        credentials: Credentials {
            username: config.user.username.clone(),
            password: config.user.password.clone(),
            test_id: args
                .test_id
                .clone()
                .or(commit.test_id)
                .or_else(|| config.remote.test_id.clone()),
        },
    };

    let mut out = io::stdout().lock();
    if args.dry_run {
        for (_, name) in request.named_files()? {
            writeln!(out, "{name}")?;
        }
        return Ok(0);
    }

    let Some(url) = args.url.as_deref().or(config.remote.url.as_deref()) else {
        bail!("no push destination; pass --url or set remote.url");
    };
    let url = RemoteUrl::parse(url)?;
    debug!(url = %url, files = request.files.len(), "pushing");
    let transport = connect(&url, Duration::from_secs(config.remote.timeout_secs))?;
    let report = transport.push(&request)?;

    if !args.quiet {
        writeln!(
            io::stderr().lock(),
            "To {}\n   {} pushed: {} files, {} bytes",
            transport.describe(),
            head.to_hex_short(7),
            report.files,
            report.bytes,
        )?;
    }
    Ok(0)
}
