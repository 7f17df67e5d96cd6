pub use clap::Parser;

use std::path::PathBuf;

use tracing_subscriber::filter::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "ctxtree")]
#[command(about = "Seed, query and stress a hierarchical namespace store")]
pub struct Args {
    /// Path to the ctxtree config directory (defaults to ~/.ctxtree)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Log level for this run, overriding the configured one
    #[arg(long, global = true)]
    pub log_level: Option<LevelFilter>,

    #[command(subcommand)]
    pub command: crate::Command,
}
