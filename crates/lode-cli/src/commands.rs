use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use colored::Colorize;

use lode_store::{Blob, LooseObjectStore, Object, ObjectStore, TreeFormat};

use crate::cli::*;

/// Repository directory created by `init` and consulted by every other
/// command, relative to the working directory.
const LODE_DIR: &str = ".lode";

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Init(args) => cmd_init(args),
        Command::CatFile(args) => cmd_cat_file(args),
        Command::HashObject(args) => cmd_hash_object(args),
        Command::LsTree(args) => cmd_ls_tree(args),
    }
}

fn objects_root() -> PathBuf {
    Path::new(LODE_DIR).join("objects")
}

fn cmd_init(args: InitArgs) -> anyhow::Result<()> {
    let base = PathBuf::from(args.path.unwrap_or_else(|| ".".into()));
    let lode = base.join(LODE_DIR);

    for dir in ["objects", "refs"] {
        fs::create_dir_all(lode.join(dir))
            .with_context(|| format!("creating {}", lode.join(dir).display()))?;
    }
    fs::write(lode.join("HEAD"), "ref: refs/heads/master\n")
        .with_context(|| format!("writing {}", lode.join("HEAD").display()))?;

    println!(
        "{} Initialized lode repository in {}",
        "✓".green().bold(),
        lode.display().to_string().bold()
    );
    Ok(())
}

fn cmd_cat_file(args: CatFileArgs) -> anyhow::Result<()> {
    if !args.pretty {
        bail!("only pretty-printing is implemented; pass -p");
    }

    let store = LooseObjectStore::new(objects_root());
    let object = store.read_hex(&args.hash)?;

    match object {
        Object::Blob(blob) => {
            // Raw payload, no trailing newline added.
            std::io::stdout().write_all(blob.data())?;
        }
        Object::Tree(tree) => {
            print!("{}", tree.format(TreeFormat::Long));
        }
    }
    Ok(())
}

fn cmd_hash_object(args: HashObjectArgs) -> anyhow::Result<()> {
    let contents =
        fs::read(&args.file).with_context(|| format!("reading {}", args.file))?;
    let blob: Object = Blob::new(contents).into();

    let id = if args.write {
        let store = LooseObjectStore::new(objects_root());
        store.write(&blob)?
    } else {
        blob.id()
    };

    println!("{id}");
    Ok(())
}

fn cmd_ls_tree(args: LsTreeArgs) -> anyhow::Result<()> {
    let store = LooseObjectStore::new(objects_root());
    let object = store.read_hex(&args.hash)?;

    let Some(tree) = object.as_tree() else {
        bail!("object {} is a {}, not a tree", args.hash, object.kind());
    };

    let format = if args.name_only {
        TreeFormat::NameOnly
    } else {
        TreeFormat::Long
    };
    print!("{}", tree.format(format));
    Ok(())
}
