//! Order-preserving feed dispatcher
//!
//! Drives one feed through the registry and into a mount target:
//!
//! ```text
//! Idle -> Processing(i) -> Processing(i + 1) | Failed(i) | Done
//! ```
//!
//! Resolutions for upcoming items are started up to `lookahead` items ahead
//! of the one being rendered, but results are consumed strictly in input
//! order. An error at item `i` therefore always wins over anything that
//! happened for items after `i`.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{Instrument, debug_span, trace};

use crate::error::{DispatchError, DispatchPhase, ItemError, ResolveError};
use crate::item::{Kind, TypedItem};
use crate::mount::MountTarget;
use crate::registry::Registry;
use crate::renderer::RendererHandle;
use crate::unit::Unit;

/// Default number of items whose renderers may be resolving at once
pub const DEFAULT_LOOKAHEAD: usize = 4;

/// Tuning knobs for a `Dispatcher`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOptions {
    /// How many items ahead resolution may run; 1 means strictly serial
    pub lookahead: usize,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            lookahead: DEFAULT_LOOKAHEAD,
        }
    }
}

/// Renders whole feeds through a shared `Registry`
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    options: DispatchOptions,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_options(registry, DispatchOptions::default())
    }

    pub fn with_options(registry: Arc<Registry>, options: DispatchOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn options(&self) -> DispatchOptions {
        self.options
    }

    /// Render every item, returning units index-aligned with `items`
    pub async fn render(&self, items: &[TypedItem]) -> Result<Vec<Unit>, DispatchError> {
        let mut units = Vec::with_capacity(items.len());
        self.render_into(items, &mut units).await?;
        Ok(units)
    }

    /// Render every item into `target`, returning how many units were mounted
    ///
    /// On failure the units for items before the failing one stay mounted.
    pub async fn render_into<T>(
        &self,
        items: &[TypedItem],
        target: &mut T,
    ) -> Result<usize, DispatchError>
    where
        T: MountTarget + ?Sized,
    {
        let span = debug_span!("dispatch", items = items.len());
        self.drive(items, target).instrument(span).await
    }

    async fn drive<T>(&self, items: &[TypedItem], target: &mut T) -> Result<usize, DispatchError>
    where
        T: MountTarget + ?Sized,
    {
        let registry = &self.registry;
        let pending: Vec<_> = items
            .iter()
            .enumerate()
            .map(|(index, item)| async move { (index, item, resolve_item(registry, item).await) })
            .collect();
        let mut resolutions = stream::iter(pending)
            .buffered(self.options.lookahead.max(1))
            .boxed();

        let mut mounted = 0;
        while let Some((index, item, resolution)) = resolutions.next().await {
            let (kind, renderer) = resolution.map_err(|err| DispatchError {
                index,
                kind: item.kind.clone(),
                phase: DispatchPhase::Resolving,
                source: err.into(),
            })?;

            let unit = renderer.render(item).map_err(|cause| DispatchError {
                index,
                kind: item.kind.clone(),
                phase: DispatchPhase::Rendering,
                source: ItemError::Render { kind, cause },
            })?;

            target.mount(unit);
            mounted += 1;
            trace!(index, %kind, "unit mounted");
        }
        Ok(mounted)
    }
}

async fn resolve_item(
    registry: &Registry,
    item: &TypedItem,
) -> Result<(Kind, RendererHandle), ResolveError> {
    let kind = item
        .kind
        .parse::<Kind>()
        .map_err(|_| ResolveError::UnknownType {
            kind: item.kind.clone(),
        })?;
    let renderer = registry.resolve_kind(kind).await?;
    Ok((kind, renderer))
}
