//! Template renderer modules
//!
//! A template module is a TOML file describing a post layout. It is read and
//! validated the first time its kind is resolved:
//!
//! ```toml
//! class = "PhotoPost"
//!
//! [[children]]
//! tag = "p"
//! class = "timestamp"
//! text = "timestamp"
//!
//! [[children]]
//! tag = "img"
//! class = "photo"
//! attrs = { src = "photo_url" }
//! ```
//!
//! `text` and attribute values name item fields. `timestamp` and `kind` are
//! always available; anything else comes from the item's type-specific fields.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use feedsplit_core::{Kind, LoadFailure, RenderFailure, Renderer, RendererHandle, RendererLoader, TypedItem, Unit};
use serde::Deserialize;
use tracing::debug;

use super::required_str;

/// Parsed template module
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateDef {
    #[serde(default = "default_root_tag")]
    pub tag: String,
    pub class: Option<String>,
    #[serde(default)]
    pub children: Vec<ChildDef>,
}

/// One child element bound to item fields
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChildDef {
    pub tag: String,
    pub class: Option<String>,
    /// Field whose value becomes the element text
    pub text: Option<String>,
    /// Attribute name -> field name
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    /// Skip the element instead of failing when a bound field is absent
    #[serde(default)]
    pub optional: bool,
}

fn default_root_tag() -> String {
    "div".to_string()
}

impl TemplateDef {
    /// Parse and validate module source
    pub fn parse(source: &str) -> Result<Self, String> {
        let def: TemplateDef = toml::from_str(source).map_err(|e| e.to_string())?;
        def.validate()?;
        Ok(def)
    }

    fn validate(&self) -> Result<(), String> {
        check_name("tag", &self.tag)?;
        for child in &self.children {
            check_name("tag", &child.tag)?;
            for name in child.attrs.keys() {
                check_name("attribute", name)?;
            }
        }
        Ok(())
    }
}

fn check_name(what: &str, name: &str) -> Result<(), String> {
    let valid = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(format!("invalid {} name '{}'", what, name))
    }
}

/// Renderer backed by a `TemplateDef`
#[derive(Debug)]
pub struct TemplateRenderer {
    def: TemplateDef,
}

impl TemplateRenderer {
    pub fn new(def: TemplateDef) -> Self {
        Self { def }
    }
}

fn lookup<'a>(item: &'a TypedItem, field: &str) -> Result<&'a str, RenderFailure> {
    match field {
        "timestamp" => Ok(&item.timestamp),
        "kind" => Ok(&item.kind),
        _ => required_str(item, field),
    }
}

fn render_child(child: &ChildDef, item: &TypedItem) -> Result<Unit, RenderFailure> {
    let mut unit = Unit::element(child.tag.clone());
    if let Some(class) = &child.class {
        unit = unit.with_class(class.clone());
    }
    if let Some(field) = &child.text {
        unit = unit.with_text(lookup(item, field)?);
    }
    for (attr, field) in &child.attrs {
        unit = unit.with_attr(attr.clone(), lookup(item, field)?);
    }
    Ok(unit)
}

impl Renderer for TemplateRenderer {
    fn render(&self, item: &TypedItem) -> Result<Unit, RenderFailure> {
        let mut root = Unit::element(self.def.tag.clone());
        if let Some(class) = &self.def.class {
            root = root.with_class(class.clone());
        }
        for child in &self.def.children {
            match render_child(child, item) {
                Ok(unit) => root = root.with_child(unit),
                Err(RenderFailure::MissingField(_)) if child.optional => {}
                Err(err) => return Err(err),
            }
        }
        Ok(root)
    }
}

/// Loads a `TemplateRenderer` from a module file
#[derive(Debug, Clone)]
pub struct TemplateLoader {
    path: PathBuf,
}

impl TemplateLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RendererLoader for TemplateLoader {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self, kind: Kind) -> Result<RendererHandle, LoadFailure> {
        let source = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| LoadFailure::from_io(&self.path, e))?;
        let def = TemplateDef::parse(&source).map_err(|reason| LoadFailure::Invalid {
            path: self.path.clone(),
            reason,
        })?;
        debug!(%kind, path = %self.path.display(), children = def.children.len(), "template module loaded");
        Ok(Arc::new(TemplateRenderer::new(def)))
    }
}
