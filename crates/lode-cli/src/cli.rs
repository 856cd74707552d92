use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "lode",
    about = "lode — a minimal content-addressable object store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize a new lode repository
    Init(InitArgs),
    /// Print the contents of a stored object
    CatFile(CatFileArgs),
    /// Hash a file as a blob, optionally writing it to the store
    HashObject(HashObjectArgs),
    /// List the entries of a tree object
    LsTree(LsTreeArgs),
}

#[derive(Args)]
pub struct InitArgs {
    pub path: Option<String>,
}

#[derive(Args)]
pub struct CatFileArgs {
    /// Pretty-print the object payload based on its type
    #[arg(short = 'p')]
    pub pretty: bool,
    /// 40-character hex object identifier
    pub hash: String,
}

#[derive(Args)]
pub struct HashObjectArgs {
    /// Write the object to the store in addition to printing its identifier
    #[arg(short = 'w')]
    pub write: bool,
    pub file: String,
}

#[derive(Args)]
pub struct LsTreeArgs {
    /// List only entry names
    #[arg(long)]
    pub name_only: bool,
    /// 40-character hex object identifier
    pub hash: String,
}
