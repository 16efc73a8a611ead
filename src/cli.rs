use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "loadroom", about = "Order chat and notification client (CLI)")]
pub struct Cli {
    /// Path to config file (default: ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Join an order room and tail its chat
    Tail {
        /// Order identifier, e.g. ORD-1042
        order: String,
    },
    /// Show the newest notifications
    Notifications,
}
