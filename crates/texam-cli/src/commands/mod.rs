pub mod add;
pub mod cat_file;
pub mod commit;
pub mod config;
pub mod init;
pub mod ls_tree;
pub mod push;
pub mod rev_list;

use anyhow::{Context, Result};
use clap::Subcommand;
use texam_hash::ObjectId;
use texam_repository::Repository;

use crate::Cli;

#[derive(Subcommand)]
pub enum Commands {
    /// Create a texam repository in a directory
    Init(init::InitArgs),
    /// Snapshot the working tree into the object store
    Add(add::AddArgs),
    /// Snapshot the working tree and record a commit
    Commit(commit::CommitArgs),
    /// Upload the current commit and everything it reaches
    Push(push::PushArgs),
    /// List the contents of a tree object
    LsTree(ls_tree::LsTreeArgs),
    /// Provide content or type and size information for stored objects
    CatFile(cat_file::CatFileArgs),
    /// List the objects reachable from a commit
    RevList(rev_list::RevListArgs),
    /// Get and set repository options
    Config(config::ConfigArgs),
}

/// Open the repository enclosing the current directory (after `-C`).
pub fn open_repo() -> Result<Repository> {
    Ok(Repository::discover(".")?)
}

/// Resolve `HEAD`, a full id, or an abbreviated id of at least five digits.
pub fn resolve_rev(repo: &Repository, rev: &str) -> Result<ObjectId> {
    if rev == "HEAD" {
        return Ok(repo.head_commit()?);
    }
    repo.store()
        .resolve_prefix(rev)
        .with_context(|| format!("not a valid object name: '{rev}'"))
}

pub fn run(cli: Cli) -> Result<i32> {
    match &cli.command {
        Commands::Init(args) => init::run(args, &cli),
        Commands::Add(args) => add::run(args, &cli),
        Commands::Commit(args) => commit::run(args, &cli),
        Commands::Push(args) => push::run(args, &cli),
        Commands::LsTree(args) => ls_tree::run(args, &cli),
        Commands::CatFile(args) => cat_file::run(args, &cli),
        Commands::RevList(args) => rev_list::run(args, &cli),
        Commands::Config(args) => config::run(args, &cli),
    }
}
