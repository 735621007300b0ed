//! Renderer and loader contracts
//!
//! A `Renderer` is the synchronous construction step for one item. A
//! `RendererLoader` is the asynchronous step that makes a renderer available;
//! the registry guarantees it runs at most once per kind at a time.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{LoadFailure, RenderFailure};
use crate::item::{Kind, TypedItem};
use crate::unit::Unit;

/// Render one item into one unit
///
/// Implementations must not block or suspend; all expensive setup belongs in
/// the loader.
pub trait Renderer: Send + Sync {
    fn render(&self, item: &TypedItem) -> Result<Unit, RenderFailure>;
}

/// Shared handle to a loaded renderer
pub type RendererHandle = Arc<dyn Renderer>;

/// Adapter that turns a plain function into a `Renderer`
pub struct FnRenderer<F>(pub F);

impl<F> Renderer for FnRenderer<F>
where
    F: Fn(&TypedItem) -> Result<Unit, RenderFailure> + Send + Sync,
{
    fn render(&self, item: &TypedItem) -> Result<Unit, RenderFailure> {
        (self.0)(item)
    }
}

/// Make the renderer for a kind available
///
/// The `#[async_trait]` macro keeps the trait object-safe so the registry can
/// hold loaders as `Arc<dyn RendererLoader>`.
#[async_trait]
pub trait RendererLoader: Send + Sync {
    /// Short description for logs (e.g. "builtin", a module path)
    fn describe(&self) -> String;

    async fn load(&self, kind: Kind) -> Result<RendererHandle, LoadFailure>;
}

/// The fixed `{kind -> loader}` table a registry is built from
#[derive(Clone, Default)]
pub struct LoaderTable {
    loaders: BTreeMap<Kind, Arc<dyn RendererLoader>>,
}

impl LoaderTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `loader` for `kind`, replacing any previous entry
    pub fn insert(&mut self, kind: Kind, loader: Arc<dyn RendererLoader>) -> &mut Self {
        self.loaders.insert(kind, loader);
        self
    }

    /// Builder-style `insert`
    pub fn with(mut self, kind: Kind, loader: Arc<dyn RendererLoader>) -> Self {
        self.insert(kind, loader);
        self
    }

    pub fn get(&self, kind: Kind) -> Option<&Arc<dyn RendererLoader>> {
        self.loaders.get(&kind)
    }

    /// Registered kinds in `Kind` order
    pub fn kinds(&self) -> impl Iterator<Item = Kind> + '_ {
        self.loaders.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}

impl std::fmt::Debug for LoaderTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.loaders
                    .iter()
                    .map(|(kind, loader)| (kind, loader.describe())),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    #[async_trait]
    impl RendererLoader for Fixed {
        fn describe(&self) -> String {
            "fixed".to_string()
        }

        async fn load(&self, _kind: Kind) -> Result<RendererHandle, LoadFailure> {
            Ok(Arc::new(FnRenderer(
                |item: &TypedItem| -> Result<Unit, RenderFailure> {
                    Ok(Unit::element("p").with_text(item.timestamp.clone()))
                },
            )))
        }
    }

    #[test]
    fn test_renderer_is_object_safe() {
        fn _assert_object_safe(_: Box<dyn Renderer>) {}
    }

    #[test]
    fn test_loader_is_object_safe() {
        fn _assert_object_safe(_: Box<dyn RendererLoader>) {}
    }

    #[test]
    fn test_fn_renderer() {
        let renderer = FnRenderer(|item: &TypedItem| -> Result<Unit, RenderFailure> {
            item.field_str("text")
                .map(|text| Unit::element("p").with_text(text))
                .ok_or_else(|| RenderFailure::MissingField("text".to_string()))
        });
        let ok = renderer.render(&TypedItem::new("TextPost", "t").with_field("text", "hi"));
        assert_eq!(ok.unwrap().text(), Some("hi"));
        let err = renderer.render(&TypedItem::new("TextPost", "t"));
        assert_eq!(err, Err(RenderFailure::MissingField("text".to_string())));
    }

    #[test]
    fn test_loader_table() {
        let table = LoaderTable::new().with(Kind::PhotoPost, Arc::new(Fixed));
        assert_eq!(table.len(), 1);
        assert!(table.get(Kind::PhotoPost).is_some());
        assert!(table.get(Kind::TextPost).is_none());
        assert_eq!(table.kinds().collect::<Vec<_>>(), vec![Kind::PhotoPost]);
        assert_eq!(format!("{:?}", table), r#"{PhotoPost: "fixed"}"#);
    }

    #[tokio::test]
    async fn test_loader_produces_renderer() {
        let handle = Fixed.load(Kind::TextPost).await.unwrap();
        let unit = handle.render(&TypedItem::new("TextPost", "t9")).unwrap();
        assert_eq!(unit.text(), Some("t9"));
    }
}
