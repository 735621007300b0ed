//! CLI argument parsing with clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// feedsplit: render typed feeds with renderers loaded on demand
#[derive(Parser, Debug)]
#[command(name = "feedsplit")]
#[command(version = VERSION)]
#[command(about = "Render typed feeds with renderers loaded on demand, one load per type")]
pub struct Cli {
    /// Configuration file (defaults to ./feedsplit.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a saved query response
    ///
    /// Reads `{"data":{"posts":[...]}}` (or a bare array of items) and prints
    /// the rendered units in feed order.
    Render {
        /// Response file; `-` or nothing reads stdin
        file: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Html)]
        format: Format,

        /// Items whose renderers may resolve ahead of the one being rendered
        #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
        lookahead: Option<u16>,

        /// Give up after this many milliseconds
        #[arg(long, value_name = "MS")]
        timeout_ms: Option<u64>,
    },

    /// Serve the demo query endpoint and timeline page
    Serve {
        /// Port to bind the HTTP server to (overrides the config file)
        #[arg(long)]
        port: Option<u16>,

        /// Load every configured renderer before accepting requests
        #[arg(long, default_value_t = false)]
        warm: bool,
    },

    /// Print the module hints declared in a query
    Hints {
        /// Query file; `-` or nothing reads stdin
        file: Option<PathBuf>,

        /// Print JSON instead of one line per hint
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// An HTML page with a `#timeline` element
    Html,
    /// The unit trees as a JSON array
    Json,
}

/// Parse CLI arguments from the environment
pub fn parse() -> Cli {
    Cli::parse()
}
