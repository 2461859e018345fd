use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tiered",
    about = "Two-tier storage: write to primary, read through to secondary",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Settings file describing both storage tiers
    #[arg(short, long, global = true, default_value = "tiered.toml")]
    pub config: PathBuf,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Store a local file in the primary tier
    Store(StoreArgs),
    /// Write an object's contents to stdout
    Cat(LocationArgs),
    /// Report whether an object exists, and in which tier
    Exists(LocationArgs),
    /// Show tier, path, size and URL of an object
    Info(LocationArgs),
    /// Delete an object (secondary objects only when allowed)
    Delete(LocationArgs),
    /// Show the effective tier configuration
    Config,
}

#[derive(Args)]
pub struct StoreArgs {
    /// File to upload
    pub source: PathBuf,
    /// Location to store it under
    pub location: String,
    #[arg(long)]
    pub content_type: Option<String>,
}

#[derive(Args)]
pub struct LocationArgs {
    pub location: String,
}
