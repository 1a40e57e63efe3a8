//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Save every photo of an album as a link manifest or an image folder
#[derive(Parser, Debug)]
#[command(name = "album-harvest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format for command results
    #[arg(short, long, global = true, default_value = "json")]
    pub output: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Commands,
}

/// Settings that take precedence over the config file
#[derive(Args, Debug, Default, Clone)]
pub struct Overrides {
    /// Album identifier
    #[arg(short, long, global = true)]
    pub album: Option<String>,

    /// API access token
    #[arg(long, global = true, env = "ALBUM_HARVEST_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Photos per page (1-100)
    #[arg(long, global = true)]
    pub page_size: Option<u32>,

    /// Stop after this many pages
    #[arg(long, global = true)]
    pub page_limit: Option<u32>,

    /// Pause between pages in milliseconds
    #[arg(long, global = true)]
    pub delay_ms: Option<u64>,

    /// Separator between id and url in the manifest
    #[arg(long, global = true)]
    pub separator: Option<String>,

    /// Directory for link manifests
    #[arg(long, global = true)]
    pub links_dir: Option<PathBuf>,

    /// Directory for downloaded images
    #[arg(long, global = true)]
    pub images_dir: Option<PathBuf>,

    /// Extension of downloaded images
    #[arg(short, long, global = true)]
    pub format: Option<String>,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show album metadata
    Info,

    /// Write `<id><separator><url>` for every photo to `<links_dir>/<album>.txt`
    Links,

    /// Download every photo to `<images_dir>/<album>/<id>.<format>`
    Download,

    /// Print the access token held in a browser session cookie
    Token {
        /// Cookie header value (`document.cookie`)
        #[arg(long)]
        cookie: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
