//! Server-rendered timeline page

use feedsplit_core::{MountTarget, Unit, escape_html};

/// Mount target that collects units into `<div id="timeline">`
#[derive(Debug, Default)]
pub struct Timeline {
    title: String,
    units: Vec<Unit>,
}

impl Timeline {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            units: Vec::new(),
        }
    }

    /// The timeline fragment on its own
    pub fn body_html(&self) -> String {
        let mut html = String::from("<div id=\"timeline\">");
        for unit in &self.units {
            html.push_str(&unit.to_html());
        }
        html.push_str("</div>");
        html
    }

    /// A complete HTML document
    pub fn to_html(&self) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
            escape_html(&self.title),
            self.body_html()
        )
    }
}

impl MountTarget for Timeline {
    fn mount(&mut self, unit: Unit) {
        self.units.push(unit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_timeline() {
        let page = Timeline::new("Feed");
        assert_eq!(page.body_html(), "<div id=\"timeline\"></div>");
        assert!(page.to_html().contains("<title>Feed</title>"));
    }

    #[test]
    fn test_units_in_mount_order() {
        let mut page = Timeline::new("Feed");
        page.mount(Unit::element("div").with_class("TextPost"));
        page.mount(Unit::element("div").with_class("PhotoPost"));

        let html = page.body_html();
        let text = html.find("TextPost").unwrap();
        let photo = html.find("PhotoPost").unwrap();
        assert!(text < photo);
        assert_eq!(page.units.len(), 2);
    }

    #[test]
    fn test_title_escaped() {
        let page = Timeline::new("<Feed>");
        assert!(page.to_html().contains("<title>&lt;Feed&gt;</title>"));
    }
}
