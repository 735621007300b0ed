//! Built-in `PhotoPost` renderer
//!
//! ```text
//! div.PhotoPost
//!   p.timestamp
//!   img.photo[src=photo_url]
//! ```

use feedsplit_core::{RenderFailure, Renderer, TypedItem, Unit};

use super::{required_str, timestamp};

pub struct PhotoPostRenderer;

impl Renderer for PhotoPostRenderer {
    fn render(&self, item: &TypedItem) -> Result<Unit, RenderFailure> {
        let url = required_str(item, "photo_url")?;
        if url.is_empty() {
            return Err(RenderFailure::InvalidField {
                field: "photo_url".to_string(),
                reason: "is empty".to_string(),
            });
        }
        Ok(Unit::element("div")
            .with_class("PhotoPost")
            .with_child(timestamp(item))
            .with_child(
                Unit::element("img")
                    .with_class("photo")
                    .with_attr("src", url),
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_photo_post() {
        let item = TypedItem::new("PhotoPost", "t2").with_field("photo_url", "http://x/y.png");
        let unit = PhotoPostRenderer.render(&item).unwrap();
        assert_eq!(
            unit.find_class("photo").and_then(|img| img.attr("src")),
            Some("http://x/y.png")
        );
        assert_eq!(
            unit.find_class("timestamp").and_then(Unit::text),
            Some("t2")
        );
    }

    #[test]
    fn test_empty_url_rejected() {
        let item = TypedItem::new("PhotoPost", "t2").with_field("photo_url", "");
        assert!(matches!(
            PhotoPostRenderer.render(&item),
            Err(RenderFailure::InvalidField { ref field, .. }) if field == "photo_url"
        ));
    }

    #[test]
    fn test_non_string_url_rejected() {
        let item = TypedItem::new("PhotoPost", "t2").with_field("photo_url", 42);
        assert!(matches!(
            PhotoPostRenderer.render(&item),
            Err(RenderFailure::InvalidField { .. })
        ));
    }
}
