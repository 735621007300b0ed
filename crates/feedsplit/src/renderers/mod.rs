//! Renderer modules and their loaders
//!
//! Two ways to make a renderer available for a kind:
//! - `BuiltinLoader`: renderers compiled into the binary
//! - `TemplateLoader`: a TOML template read from disk when the kind is first needed

use std::sync::Arc;

use async_trait::async_trait;
use feedsplit_core::{Kind, LoadFailure, RenderFailure, RendererHandle, RendererLoader, TypedItem, Unit};

pub mod photo_post;
pub mod template;
pub mod text_post;

pub use photo_post::PhotoPostRenderer;
pub use template::TemplateLoader;
pub use text_post::TextPostRenderer;

/// The compiled-in renderer for `kind`
///
/// Adding a `Kind` without a match arm here is a compile error.
pub fn builtin(kind: Kind) -> RendererHandle {
    match kind {
        Kind::TextPost => Arc::new(TextPostRenderer),
        Kind::PhotoPost => Arc::new(PhotoPostRenderer),
    }
}

/// Loader for the compiled-in renderers
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLoader;

#[async_trait]
impl RendererLoader for BuiltinLoader {
    fn describe(&self) -> String {
        "builtin".to_string()
    }

    async fn load(&self, kind: Kind) -> Result<RendererHandle, LoadFailure> {
        Ok(builtin(kind))
    }
}

/// A string field the renderer cannot do without
pub(crate) fn required_str<'a>(item: &'a TypedItem, field: &str) -> Result<&'a str, RenderFailure> {
    match item.field(field) {
        None => Err(RenderFailure::MissingField(field.to_string())),
        Some(value) => value.as_str().ok_or_else(|| RenderFailure::InvalidField {
            field: field.to_string(),
            reason: "must be a string".to_string(),
        }),
    }
}

/// `p.timestamp` shared by every post layout
pub(crate) fn timestamp(item: &TypedItem) -> Unit {
    Unit::element("p")
        .with_class("timestamp")
        .with_text(item.timestamp.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_builtin_loader_covers_every_kind() {
        for kind in Kind::ALL {
            assert!(BuiltinLoader.load(kind).await.is_ok());
        }
    }

    #[test]
    fn test_builtin_renders_matching_class() {
        let text = TypedItem::new("TextPost", "t").with_field("text", "x");
        let photo = TypedItem::new("PhotoPost", "t").with_field("photo_url", "u");
        assert_eq!(
            builtin(Kind::TextPost).render(&text).unwrap().class.as_deref(),
            Some("TextPost")
        );
        assert_eq!(
            builtin(Kind::PhotoPost).render(&photo).unwrap().class.as_deref(),
            Some("PhotoPost")
        );
    }

    #[test]
    fn test_required_str() {
        let item = TypedItem::new("TextPost", "t")
            .with_field("text", "x")
            .with_field("n", 1);
        assert_eq!(required_str(&item, "text"), Ok("x"));
        assert_eq!(
            required_str(&item, "missing"),
            Err(RenderFailure::MissingField("missing".to_string()))
        );
        assert!(matches!(
            required_str(&item, "n"),
            Err(RenderFailure::InvalidField { .. })
        ));
    }
}
