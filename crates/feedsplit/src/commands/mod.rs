//! CLI command implementations

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use feedsplit_core::Registry;
use tokio::io::AsyncReadExt;

use crate::config::Config;

pub mod hints;
pub mod render;
pub mod serve;

pub use hints::run_hints;
pub use render::run_render;
pub use serve::run_serve;

/// Load configuration and build a registry from its loader table
fn open_registry(config_path: Option<&Path>) -> anyhow::Result<(Config, Arc<Registry>)> {
    let (config, base_dir) = Config::load_or_default(config_path)?;
    let table = config.loader_table(&base_dir)?;
    Ok((config, Arc::new(Registry::new(table))))
}

/// Read a text input; `None` and `-` read stdin
async fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut input = String::new();
            tokio::io::stdin()
                .read_to_string(&mut input)
                .await
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

