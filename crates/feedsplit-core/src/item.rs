//! Feed items and the closed set of item kinds

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Item kinds known to this build
///
/// Tags outside this set are still decoded into `TypedItem::kind`; they only
/// fail when the registry is asked to resolve them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Kind {
    TextPost,
    PhotoPost,
}

impl Kind {
    /// Every known kind, in declaration order
    pub const ALL: [Kind; 2] = [Kind::TextPost, Kind::PhotoPost];

    /// The wire name of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::TextPost => "TextPost",
            Kind::PhotoPost => "PhotoPost",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by `Kind::from_str` for a tag outside `Kind::ALL`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown kind '{}'", self.0)
    }
}

impl std::error::Error for UnknownKind {}

impl FromStr for Kind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// One feed element
///
/// `kind` and `timestamp` are the only fields the dispatcher looks at.
/// Everything else belongs to the renderer for `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedItem {
    #[serde(alias = "__typename")]
    pub kind: String,
    pub timestamp: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl TypedItem {
    /// Create an item with no type-specific fields
    pub fn new(kind: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            timestamp: timestamp.into(),
            fields: Map::new(),
        }
    }

    /// Builder-style field setter
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Look up a type-specific field
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Look up a type-specific field that must be a string
    ///
    /// Returns `None` when the field is absent or not a string.
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Parse `kind` into a known `Kind`
    pub fn known_kind(&self) -> Option<Kind> {
        self.kind.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip_names() {
        for kind in Kind::ALL {
            assert_eq!(kind.as_str().parse::<Kind>(), Ok(kind));
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }

    #[test]
    fn test_kind_unknown() {
        assert_eq!(
            "VideoPost".parse::<Kind>(),
            Err(UnknownKind("VideoPost".to_string()))
        );
        // Matching is exact
        assert!("textpost".parse::<Kind>().is_err());
    }

    #[test]
    fn test_typed_item_decode_kind() {
        let item: TypedItem =
            serde_json::from_str(r#"{"kind":"TextPost","timestamp":"t1","text":"hello"}"#)
                .unwrap();
        assert_eq!(item.kind, "TextPost");
        assert_eq!(item.timestamp, "t1");
        assert_eq!(item.field_str("text"), Some("hello"));
        assert_eq!(item.known_kind(), Some(Kind::TextPost));
    }

    #[test]
    fn test_typed_item_decode_typename_alias() {
        let item: TypedItem = serde_json::from_str(
            r#"{"__typename":"PhotoPost","timestamp":"t2","photo_url":"http://x/y.png"}"#,
        )
        .unwrap();
        assert_eq!(item.kind, "PhotoPost");
        assert_eq!(item.field_str("photo_url"), Some("http://x/y.png"));
        assert!(!item.fields.contains_key("__typename"));
    }

    #[test]
    fn test_typed_item_unknown_kind_still_decodes() {
        let item: TypedItem =
            serde_json::from_str(r#"{"kind":"VideoPost","timestamp":"t3","video_url":"v"}"#)
                .unwrap();
        assert_eq!(item.kind, "VideoPost");
        assert_eq!(item.known_kind(), None);
    }

    #[test]
    fn test_typed_item_missing_timestamp_rejected() {
        let result = serde_json::from_str::<TypedItem>(r#"{"kind":"TextPost","text":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_field_str_non_string() {
        let item = TypedItem::new("TextPost", "t").with_field("likes", 3);
        assert_eq!(item.field("likes"), Some(&Value::from(3)));
        assert_eq!(item.field_str("likes"), None);
        assert_eq!(item.field_str("absent"), None);
    }
}
