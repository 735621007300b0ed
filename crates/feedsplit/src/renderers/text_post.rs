//! Built-in `TextPost` renderer
//!
//! ```text
//! div.TextPost
//!   p.timestamp
//!   p.text
//! ```

use feedsplit_core::{RenderFailure, Renderer, TypedItem, Unit};

use super::{required_str, timestamp};

pub struct TextPostRenderer;

impl Renderer for TextPostRenderer {
    fn render(&self, item: &TypedItem) -> Result<Unit, RenderFailure> {
        let text = required_str(item, "text")?;
        Ok(Unit::element("div")
            .with_class("TextPost")
            .with_child(timestamp(item))
            .with_child(Unit::element("p").with_class("text").with_text(text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_text_post() {
        let item = TypedItem::new("TextPost", "t1").with_field("text", "hello");
        let unit = TextPostRenderer.render(&item).unwrap();
        assert_eq!(
            unit.to_html(),
            r#"<div class="TextPost"><p class="timestamp">t1</p><p class="text">hello</p></div>"#
        );
    }

    #[test]
    fn test_missing_text() {
        let item = TypedItem::new("TextPost", "t1");
        assert_eq!(
            TextPostRenderer.render(&item),
            Err(RenderFailure::MissingField("text".to_string()))
        );
    }

    #[test]
    fn test_empty_text_is_allowed() {
        let item = TypedItem::new("TextPost", "t1").with_field("text", "");
        let unit = TextPostRenderer.render(&item).unwrap();
        assert_eq!(unit.find_class("text").and_then(Unit::text), Some(""));
    }
}
