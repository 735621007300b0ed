//! Renderer registry
//!
//! Maps a kind to its renderer, loading on first use and caching the result.
//!
//! Each kind moves through three states:
//! - Unresolved: no entry in the table
//! - Pending: one in-flight load, shared by every caller that arrives before it completes
//! - Resolved: the cached handle
//!
//! The pending entry is inserted while the table lock is held and before the
//! load is first polled, so concurrent callers always find it. The lock is
//! never held across an `.await`. A failed load removes its entry so the next
//! resolve retries.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared, join_all};
use tracing::{debug, trace};

use crate::error::{LoadFailure, ResolveError};
use crate::item::Kind;
use crate::renderer::{LoaderTable, RendererHandle};

type PendingLoad = Shared<BoxFuture<'static, Result<RendererHandle, LoadFailure>>>;

enum Entry {
    Pending { generation: u64, load: PendingLoad },
    Resolved(RendererHandle),
}

/// Externally visible state of one kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Unresolved,
    Pending,
    Resolved,
}

/// Resolves kinds to renderers with at most one load in flight per kind
pub struct Registry {
    loaders: LoaderTable,
    entries: Mutex<HashMap<Kind, Entry>>,
    next_generation: AtomicU64,
}

impl Registry {
    /// Create a registry over a fixed loader table
    pub fn new(loaders: LoaderTable) -> Self {
        Self {
            loaders,
            entries: Mutex::new(HashMap::new()),
            next_generation: AtomicU64::new(0),
        }
    }

    /// Kinds that have a registered loader
    pub fn kinds(&self) -> Vec<Kind> {
        self.loaders.kinds().collect()
    }

    /// Current state of `kind`
    pub fn entry_state(&self, kind: Kind) -> EntryState {
        match self.lock().get(&kind) {
            None => EntryState::Unresolved,
            Some(Entry::Pending { .. }) => EntryState::Pending,
            Some(Entry::Resolved(_)) => EntryState::Resolved,
        }
    }

    /// Resolve a kind by its wire name
    ///
    /// Names outside `Kind` fail with `ResolveError::UnknownType` without
    /// touching the table.
    pub async fn resolve(&self, kind: &str) -> Result<RendererHandle, ResolveError> {
        let known = kind
            .parse::<Kind>()
            .map_err(|_| ResolveError::UnknownType {
                kind: kind.to_string(),
            })?;
        self.resolve_kind(known).await
    }

    /// Resolve a known kind
    pub async fn resolve_kind(&self, kind: Kind) -> Result<RendererHandle, ResolveError> {
        let (generation, load) = {
            let mut entries = self.lock();
            match entries.get(&kind) {
                Some(Entry::Resolved(handle)) => return Ok(handle.clone()),
                Some(Entry::Pending { generation, load }) => {
                    trace!(%kind, generation, "joining pending renderer load");
                    (*generation, load.clone())
                }
                None => {
                    let Some(loader) = self.loaders.get(kind).cloned() else {
                        return Err(ResolveError::UnknownType {
                            kind: kind.to_string(),
                        });
                    };
                    let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
                    debug!(%kind, loader = %loader.describe(), generation, "loading renderer");
                    let load = async move { loader.load(kind).await }.boxed().shared();
                    entries.insert(
                        kind,
                        Entry::Pending {
                            generation,
                            load: load.clone(),
                        },
                    );
                    (generation, load)
                }
            }
        };

        let outcome = load.await;
        self.settle(kind, generation, &outcome);
        outcome.map_err(|cause| ResolveError::Load { kind, cause })
    }

    /// Resolve several kinds concurrently
    ///
    /// Duplicates share one load. Outcomes are returned in input order.
    pub async fn preload(
        &self,
        kinds: impl IntoIterator<Item = Kind>,
    ) -> Vec<(Kind, Result<RendererHandle, ResolveError>)> {
        let pending = kinds
            .into_iter()
            .map(|kind| async move { (kind, self.resolve_kind(kind).await) });
        join_all(pending).await
    }

    /// Record the outcome of the load started under `generation`
    ///
    /// Every waiter calls this; only the first one to see its own pending
    /// entry changes the table.
    fn settle(
        &self,
        kind: Kind,
        generation: u64,
        outcome: &Result<RendererHandle, LoadFailure>,
    ) {
        let mut entries = self.lock();
        let current = matches!(
            entries.get(&kind),
            Some(Entry::Pending { generation: g, .. }) if *g == generation
        );
        if !current {
            return;
        }
        match outcome {
            Ok(handle) => {
                debug!(%kind, generation, "renderer resolved");
                entries.insert(kind, Entry::Resolved(handle.clone()));
            }
            Err(cause) => {
                debug!(%kind, generation, %cause, "renderer load failed");
                entries.remove(&kind);
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Kind, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("loaders", &self.loaders)
            .finish_non_exhaustive()
    }
}
