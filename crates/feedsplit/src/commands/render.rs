//! Render command - render a saved query response

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, anyhow};
use feedsplit_core::{DispatchOptions, Dispatcher, TypedItem};
use tracing::info;

use super::open_registry;
use crate::cli::Format;
use crate::page::Timeline;
use crate::source::{FeedSource, FileFeed};

/// Render `items` in the requested output format
pub async fn render_output(
    dispatcher: &Dispatcher,
    items: &[TypedItem],
    format: Format,
) -> anyhow::Result<String> {
    match format {
        Format::Html => {
            let mut page = Timeline::new("feedsplit");
            dispatcher.render_into(items, &mut page).await?;
            Ok(page.to_html())
        }
        Format::Json => {
            let units = dispatcher.render(items).await?;
            Ok(serde_json::to_string_pretty(&units)?)
        }
    }
}

pub async fn run_render(
    config_path: Option<PathBuf>,
    file: Option<PathBuf>,
    format: Format,
    lookahead: Option<u16>,
    timeout_ms: Option<u64>,
) -> anyhow::Result<()> {
    let (config, registry) = open_registry(config_path.as_deref())?;
    let options = DispatchOptions {
        lookahead: lookahead.map_or(config.dispatch.lookahead, usize::from),
    };
    let dispatcher = Dispatcher::with_options(registry, options);

    let source = FileFeed::from_arg(file);
    let items = source
        .fetch()
        .await
        .with_context(|| format!("failed to load feed from {}", source.describe()))?;
    info!(
        items = items.len(),
        source = %source.describe(),
        lookahead = options.lookahead,
        "rendering feed"
    );

    let render = render_output(&dispatcher, &items, format);
    let output = match timeout_ms {
        Some(ms) => tokio::time::timeout(Duration::from_millis(ms), render)
            .await
            .map_err(|_| anyhow!("render timed out after {}ms", ms))??,
        None => render.await?,
    };
    println!("{}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use feedsplit_core::{Kind, LoaderTable, Registry};

    use crate::renderers::BuiltinLoader;

    fn dispatcher() -> Dispatcher {
        let table = LoaderTable::new()
            .with(Kind::TextPost, Arc::new(BuiltinLoader))
            .with(Kind::PhotoPost, Arc::new(BuiltinLoader));
        Dispatcher::new(Arc::new(Registry::new(table)))
    }

    fn feed() -> Vec<TypedItem> {
        vec![
            TypedItem::new("TextPost", "t1").with_field("text", "hello"),
            TypedItem::new("PhotoPost", "t2").with_field("photo_url", "http://x/y.png"),
        ]
    }

    #[tokio::test]
    async fn test_render_html() {
        let html = render_output(&dispatcher(), &feed(), Format::Html).await.unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        let text = html.find("<p class=\"text\">hello</p>").unwrap();
        let photo = html.find("<img class=\"photo\" src=\"http://x/y.png\">").unwrap();
        assert!(text < photo);
    }

    #[tokio::test]
    async fn test_render_json() {
        let json = render_output(&dispatcher(), &feed(), Format::Json).await.unwrap();
        let units: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(units[0]["class"], "TextPost");
        assert_eq!(units[1]["class"], "PhotoPost");
    }

    #[tokio::test]
    async fn test_render_unknown_kind_fails() {
        let items = vec![TypedItem::new("VideoPost", "t3")];
        let err = render_output(&dispatcher(), &items, Format::Json)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("VideoPost"));
    }
}
