use std::io::{self, Write};

use anyhow::{bail, Result};
use bstr::ByteSlice;
use clap::Args;
use texam_hash::ObjectId;
use texam_object::Object;
use texam_store::ObjectStore;

use crate::Cli;
use super::{open_repo, resolve_rev};

#[derive(Args)]
pub struct LsTreeArgs {
    /// Recurse into sub-trees
    #[arg(short = 'r')]
    recurse: bool,

    /// Show trees when recursing
    #[arg(short = 't')]
    show_trees: bool,

    /// Show only names
    #[arg(long)]
    name_only: bool,

    /// Tree or commit to list
    #[arg(value_name = "tree-ish", default_value = "HEAD")]
    tree_ish: String,
}

pub fn run(args: &LsTreeArgs, _cli: &Cli) -> Result<i32> {
    let repo = open_repo()?;
    let store = repo.store();
    let mut out = io::stdout().lock();

    let oid = resolve_rev(&repo, &args.tree_ish)?;
    let tree_oid = match store.read(&oid)? {
        Object::Tree(_) => oid,
        Object::Commit(commit) => commit.tree,
        Object::Blob(_) => bail!("not a tree object: {} is a blob", args.tree_ish),
    };

    list_tree(store, &tree_oid, "", args, &mut out)?;
    Ok(0)
}

fn list_tree(
    store: &ObjectStore,
    tree_oid: &ObjectId,
    prefix: &str,
    args: &LsTreeArgs,
    out: &mut impl Write,
) -> Result<()> {
    let tree = store.read_tree(tree_oid)?;

    for entry in tree.iter() {
        let name = entry.name.to_str_lossy();
        let full_path = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}/{name}")
        };

        if entry.is_tree() && args.recurse {
            if args.show_trees {
                print_entry(entry.kind.as_str(), &entry.oid, &full_path, args, out)?;
            }
            list_tree(store, &entry.oid, &full_path, args, out)?;
        } else {
            print_entry(entry.kind.as_str(), &entry.oid, &full_path, args, out)?;
        }
    }
    Ok(())
}

fn print_entry(
    kind: &str,
    oid: &ObjectId,
    path: &str,
    args: &LsTreeArgs,
    out: &mut impl Write,
) -> Result<()> {
    if args.name_only {
        writeln!(out, "{path}")?;
    } else {
        writeln!(out, "{kind} {oid}\t{path}")?;
    }
    Ok(())
}
