//! Serve command - demo query endpoint and timeline page

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use feedsplit_core::{DispatchOptions, Dispatcher, Registry};
use tracing::info;

use super::open_registry;
use crate::server::{AppState, run_server};
use crate::source::DemoFeed;

/// Resolve every registered kind up front
///
/// Fails on the first kind whose renderer cannot be loaded.
pub async fn warm(registry: &Registry) -> anyhow::Result<usize> {
    let outcomes = registry.preload(registry.kinds()).await;
    let count = outcomes.len();
    for (kind, outcome) in outcomes {
        outcome.with_context(|| format!("failed to preload the {} renderer", kind))?;
    }
    Ok(count)
}

pub async fn run_serve(
    config_path: Option<PathBuf>,
    port: Option<u16>,
    warm_renderers: bool,
) -> anyhow::Result<()> {
    let (config, registry) = open_registry(config_path.as_deref())?;
    if warm_renderers {
        let count = warm(&registry).await?;
        info!(renderers = count, "renderers preloaded");
    }

    let dispatcher = Dispatcher::with_options(
        registry,
        DispatchOptions {
            lookahead: config.dispatch.lookahead,
        },
    );
    let state = AppState::new(dispatcher, Arc::new(DemoFeed));
    let port = port.unwrap_or(config.server.port);

    run_server(port, state).await.context("server error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use feedsplit_core::{EntryState, Kind};

    use crate::config::Config;

    #[tokio::test]
    async fn test_warm_resolves_every_kind() {
        let table = Config::default().loader_table(std::path::Path::new(".")).unwrap();
        let registry = Registry::new(table);
        assert_eq!(warm(&registry).await.unwrap(), Kind::ALL.len());
        for kind in Kind::ALL {
            assert_eq!(registry.entry_state(kind), EntryState::Resolved);
        }
    }

    #[tokio::test]
    async fn test_warm_reports_broken_template() {
        let dir = tempfile::tempdir().unwrap();
        let mut config_file = std::fs::File::create(dir.path().join("feedsplit.toml")).unwrap();
        config_file
            .write_all(b"[renderers.PhotoPost]\nsource = \"template\"\npath = \"missing.toml\"\n")
            .unwrap();

        let config = Config::load(&dir.path().join("feedsplit.toml")).unwrap();
        let registry = Registry::new(config.loader_table(dir.path()).unwrap());
        let err = warm(&registry).await.unwrap_err();
        assert!(format!("{:#}", err).contains("PhotoPost"));
        assert_eq!(registry.entry_state(Kind::PhotoPost), EntryState::Unresolved);
        assert_eq!(registry.entry_state(Kind::TextPost), EntryState::Resolved);
    }
}
