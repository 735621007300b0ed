//! Feed sources
//!
//! A source produces the ordered list of typed items for one render. The
//! query endpoint's response shape is `{"data":{"posts":[...]}}`; items carry
//! their kind in `__typename` on the wire.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use feedsplit_core::{Kind, TypedItem};
use serde_json::{Map, Value, json};
use thiserror::Error;
use tokio::io::AsyncReadExt;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read feed from {origin}: {source}")]
    Read {
        origin: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid feed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("feed response has no posts")]
    MissingPosts,

    #[error("query endpoint returned errors: {}", .0.join("; "))]
    Response(Vec<String>),
}

/// Supplies the ordered feed for one render
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Human-readable origin for log lines
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<Vec<TypedItem>, SourceError>;
}

/// The two posts the demo query endpoint answers with
pub fn demo_posts(now: DateTime<Utc>) -> Vec<TypedItem> {
    let timestamp = now.to_rfc3339_opts(SecondsFormat::Secs, true);
    vec![
        TypedItem::new(Kind::TextPost.as_str(), timestamp.clone()).with_field("text", "Hello world!"),
        TypedItem::new(Kind::PhotoPost.as_str(), timestamp).with_field("photo_url", "/hackerman.png"),
    ]
}

/// In-process demo feed, timestamped at fetch time
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoFeed;

#[async_trait]
impl FeedSource for DemoFeed {
    fn describe(&self) -> String {
        "demo".to_string()
    }

    async fn fetch(&self) -> Result<Vec<TypedItem>, SourceError> {
        Ok(demo_posts(Utc::now()))
    }
}

/// A saved query response read from a file or stdin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileFeed {
    Stdin,
    Path(PathBuf),
}

impl FileFeed {
    /// `None` and `-` both mean stdin
    pub fn from_arg(arg: Option<PathBuf>) -> Self {
        match arg {
            Some(path) if path.as_os_str() != "-" => FileFeed::Path(path),
            _ => FileFeed::Stdin,
        }
    }
}

#[async_trait]
impl FeedSource for FileFeed {
    fn describe(&self) -> String {
        match self {
            FileFeed::Stdin => "stdin".to_string(),
            FileFeed::Path(path) => path.display().to_string(),
        }
    }

    async fn fetch(&self) -> Result<Vec<TypedItem>, SourceError> {
        let bytes = match self {
            FileFeed::Stdin => {
                let mut buf = Vec::new();
                let read = tokio::io::stdin().read_to_end(&mut buf).await;
                read.map(|_| buf)
            }
            FileFeed::Path(path) => tokio::fs::read(path).await,
        }
        .map_err(|source| SourceError::Read {
            origin: self.describe(),
            source,
        })?;
        decode_response(&bytes)
    }
}

/// Decode a query response into items
///
/// Accepts `{"data":{"posts":[...]}}`, `{"posts":[...]}` or a bare array.
/// A non-empty `errors` array wins over any data.
pub fn decode_response(bytes: &[u8]) -> Result<Vec<TypedItem>, SourceError> {
    let value: Value = serde_json::from_slice(bytes)?;
    let posts = match value {
        Value::Array(posts) => Value::Array(posts),
        Value::Object(mut object) => {
            if let Some(Value::Array(errors)) = object.get("errors") {
                if !errors.is_empty() {
                    return Err(SourceError::Response(
                        errors.iter().map(error_message).collect(),
                    ));
                }
            }
            let posts = match object.get_mut("data") {
                Some(Value::Object(data)) => data.remove("posts"),
                _ => object.remove("posts"),
            };
            posts.ok_or(SourceError::MissingPosts)?
        }
        _ => return Err(SourceError::MissingPosts),
    };
    Ok(serde_json::from_value(posts)?)
}

fn error_message(error: &Value) -> String {
    error
        .get("message")
        .and_then(Value::as_str)
        .map_or_else(|| error.to_string(), str::to_string)
}

/// Encode items the way the query endpoint answers
pub fn encode_response(items: &[TypedItem]) -> Value {
    let posts: Vec<Value> = items
        .iter()
        .map(|item| {
            let mut object = Map::new();
            object.insert("__typename".to_string(), Value::from(item.kind.clone()));
            object.insert("timestamp".to_string(), Value::from(item.timestamp.clone()));
            object.extend(item.fields.clone());
            Value::Object(object)
        })
        .collect();
    json!({ "data": { "posts": posts } })
}
