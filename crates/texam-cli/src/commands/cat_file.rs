use std::io::{self, Write};

use anyhow::Result;
use clap::{ArgGroup, Args};
use texam_object::Object;

use crate::Cli;
use super::{open_repo, resolve_rev};

#[derive(Args)]
#[command(group(ArgGroup::new("mode").required(true).args(["type_only", "size", "pretty"])))]
pub struct CatFileArgs {
    /// Show object type
    #[arg(short = 't')]
    type_only: bool,

    /// Show object size
    #[arg(short = 's')]
    size: bool,

    /// Print the object content
    #[arg(short = 'p')]
    pretty: bool,

    /// Object to show
    #[arg(value_name = "object")]
    object: String,
}

pub fn run(args: &CatFileArgs, _cli: &Cli) -> Result<i32> {
    let repo = open_repo()?;
    let store = repo.store();
    let mut out = io::stdout().lock();

    let oid = resolve_rev(&repo, &args.object)?;

    if args.type_only || args.size {
        let (kind, size) = store.read_header(&oid)?;
        if args.type_only {
            writeln!(out, "{kind}")?;
        } else {
            writeln!(out, "{size}")?;
        }
        return Ok(0);
    }

    match store.read(&oid)? {
        Object::Blob(blob) => out.write_all(&blob.data)?,
        Object::Tree(tree) => {
            for entry in tree.iter() {
                out.write_all(format!("{} {}\t", entry.kind, entry.oid).as_bytes())?;
                out.write_all(&entry.name)?;
                out.write_all(b"\n")?;
            }
        }
        Object::Commit(commit) => out.write_all(&commit.serialize_content())?,
    }
    Ok(0)
}
