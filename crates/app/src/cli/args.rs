pub use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "qube")]
#[command(about = "Mint encrypted Qube NFTs", version)]
pub struct Args {
    /// Path to the qube config directory (defaults to ~/.qube)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: crate::Command,
}
