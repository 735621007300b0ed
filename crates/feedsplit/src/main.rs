//! feedsplit - render typed feeds with renderers loaded on demand

mod cli;
mod commands;
mod config;
mod page;
mod renderers;
mod server;
mod source;


use std::process::ExitCode;

use tokio::runtime::{Builder, Runtime};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::Commands;

/// `serve` gets a multi-threaded runtime; everything else runs on one thread
fn runtime_for(command: &Commands) -> std::io::Result<Runtime> {
    match command {
        Commands::Serve { .. } => Builder::new_multi_thread().enable_all().build(),
        _ => Builder::new_current_thread().enable_all().build(),
    }
}

fn main() -> ExitCode {
    // Initialize tracing with RUST_LOG support; stdout is reserved for output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = cli::parse();

    let runtime = match runtime_for(&cli.command) {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(async move {
        match cli.command {
            Commands::Render {
                file,
                format,
                lookahead,
                timeout_ms,
            } => commands::run_render(cli.config, file, format, lookahead, timeout_ms).await,
            Commands::Serve { port, warm } => commands::run_serve(cli.config, port, warm).await,
            Commands::Hints { file, json } => commands::run_hints(file, json).await,
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
