use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "laketree")]
#[command(about = "Explore remote data lake namespaces as ASCII trees", long_about = None)]
pub struct Cli {
    /// JSON config listing servers and services
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch a path from a server and print its subtree
    Tree(TreeArgs),
    /// Check services and report availability
    Health(HealthArgs),
}

#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Slash-delimited starting path; empty means the root
    #[arg(default_value = "")]
    pub path: String,

    /// Backend base URL (alternative to --config with --server)
    #[arg(long)]
    pub url: Option<String>,

    /// Name of a configured server
    #[arg(long, conflicts_with = "url")]
    pub server: Option<String>,

    /// Bearer token forwarded on listing requests
    #[arg(long, env = "LAKETREE_TOKEN")]
    pub token: Option<String>,

    /// Levels to fetch below the starting path
    #[arg(short = 'L', long)]
    pub depth: Option<usize>,

    /// Pipe-separated names or globs to hide (e.g. "tmp|*.parquet")
    #[arg(short = 'I', long)]
    pub ignore: Option<String>,

    /// Show folders only
    #[arg(long)]
    pub folders_only: bool,

    /// List folders before files
    #[arg(long)]
    pub folders_first: bool,

    /// Hide entries starting with '.'
    #[arg(long)]
    pub no_hidden: bool,
}

#[derive(Args, Debug)]
pub struct HealthArgs {
    /// Service base URL to check (repeatable; adds to configured services)
    #[arg(long = "url")]
    pub urls: Vec<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 5)]
    pub timeout: u64,

    /// Keep checking on an interval instead of exiting
    #[arg(long)]
    pub watch: bool,

    /// Seconds between checks in watch mode
    #[arg(long, default_value_t = 30)]
    pub interval: u64,
}
