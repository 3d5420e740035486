use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use texam_repository::{InitOptions, Repository};

use crate::Cli;

#[derive(Args)]
pub struct InitArgs {
    /// Student or candidate number sent with every push
    #[arg(short = 'u', long)]
    username: String,

    /// Password sent with every push
    #[arg(short = 'p', long)]
    password: String,

    /// Refuse commits that carry no test identifier
    #[arg(long)]
    require_test_id: bool,

    /// Where `push` uploads to
    #[arg(long, value_name = "url")]
    remote: Option<String>,

    /// Be quiet, only report errors
    #[arg(short, long)]
    quiet: bool,

    /// Directory to create the repository in
    directory: Option<PathBuf>,
}

pub fn run(args: &InitArgs, _cli: &Cli) -> Result<i32> {
    let target = match &args.directory {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };

    let options = InitOptions {
        require_test_id: args.require_test_id,
        remote_url: args.remote.clone(),
        ..InitOptions::new(&args.username, &args.password)
    };
    let repo = Repository::init(&target, &options)?;

    if !args.quiet {
        let mut err = io::stderr().lock();
        let mut display_path = repo.repo_dir().display().to_string();
        if !display_path.ends_with('/') {
            display_path.push('/');
        }
        writeln!(err, "Initialized empty texam repository in {display_path}")?;
    }

    Ok(0)
}
