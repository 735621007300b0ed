//! Renderable units
//!
//! A `Unit` is a small, self-contained element tree. Renderers build one per
//! item; mount targets decide what to do with it (serialize to HTML, JSON, ...).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One element in a rendered tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Unit>,
}

/// Elements that never have content or a closing tag
const VOID_TAGS: &[&str] = &["img", "br", "hr", "input", "meta", "link"];

impl Unit {
    /// Create an empty element
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            class: None,
            attrs: BTreeMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: Unit) -> Self {
        self.children.push(child);
        self
    }

    /// Attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Text content of this element (not of its children)
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Depth-first search for the first element carrying `class`, self included
    pub fn find_class(&self, class: &str) -> Option<&Unit> {
        if self.class.as_deref() == Some(class) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_class(class))
    }

    /// Serialize to an HTML fragment
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        if let Some(class) = &self.class {
            push_attr(out, "class", class);
        }
        for (name, value) in &self.attrs {
            push_attr(out, name, value);
        }
        out.push('>');

        if VOID_TAGS.contains(&self.tag.as_str()) {
            return;
        }

        if let Some(text) = &self.text {
            out.push_str(&escape_html(text));
        }
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape_html(value));
    out.push('"');
}

/// Escape text for use in HTML content and double-quoted attributes
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
