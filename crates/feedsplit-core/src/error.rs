//! Error types for renderer resolution and feed dispatch
//!
//! Errors are layered the same way the dispatch path is:
//! - `LoadFailure` / `RenderFailure`: what a loader or renderer reports
//! - `ResolveError`: what the registry reports for one kind
//! - `ItemError`: anything that can go wrong for one item
//! - `DispatchError`: an `ItemError` pinned to its position in the feed
//!
//! `LoadFailure` is `Clone` because a single load outcome is handed to every
//! caller waiting on the same pending entry.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::item::Kind;

/// Failure reported by a `RendererLoader`
#[derive(Debug, Clone, Error)]
pub enum LoadFailure {
    /// The module backing a kind does not exist
    #[error("module not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The module exists but could not be read
    #[error("failed to read module {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The module was read but its contents are not a valid renderer
    #[error("invalid module {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },

    /// The loader has no renderer for this kind
    #[error("loader does not provide a renderer for {0}")]
    Unsupported(Kind),
}

impl LoadFailure {
    /// Classify an I/O error raised while reading a module file
    pub fn from_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        if err.kind() == std::io::ErrorKind::NotFound {
            LoadFailure::NotFound { path }
        } else {
            LoadFailure::Io {
                path,
                source: Arc::new(err),
            }
        }
    }
}

/// Failure reported by a `Renderer` while turning an item into a unit
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderFailure {
    /// A field the renderer needs is absent
    #[error("missing field '{0}'")]
    MissingField(String),

    /// A field is present but has the wrong shape
    #[error("field '{field}' {reason}")]
    InvalidField { field: String, reason: String },
}

/// Failure to resolve a kind to a renderer
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// The kind is not part of this build, or has no registered loader
    #[error("unknown item type '{kind}'")]
    UnknownType { kind: String },

    /// The loader for a registered kind failed
    #[error("failed to load renderer for {kind}: {cause}")]
    Load {
        kind: Kind,
        #[source]
        cause: LoadFailure,
    },
}

/// Anything that can fail while processing one item
#[derive(Debug, Clone, Error)]
pub enum ItemError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A resolved renderer rejected the item
    #[error("renderer for {kind} failed: {cause}")]
    Render {
        kind: Kind,
        #[source]
        cause: RenderFailure,
    },
}

impl ItemError {
    /// True for `ResolveError::UnknownType`
    pub fn is_unknown_type(&self) -> bool {
        matches!(self, ItemError::Resolve(ResolveError::UnknownType { .. }))
    }
}

/// Which step of an item the dispatcher was in when it failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPhase {
    Resolving,
    Rendering,
}

impl fmt::Display for DispatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchPhase::Resolving => f.write_str("resolving"),
            DispatchPhase::Rendering => f.write_str("rendering"),
        }
    }
}

/// A dispatch halted at `index`
///
/// Units for items before `index` were already handed to the mount target.
#[derive(Debug, Clone, Error)]
#[error("item {index} ({kind}) failed while {phase}: {source}")]
pub struct DispatchError {
    pub index: usize,
    /// The item's kind exactly as it appeared in the feed
    pub kind: String,
    pub phase: DispatchPhase,
    #[source]
    pub source: ItemError,
}
