//! feedsplit-core: type-driven renderer loading and feed dispatch
//!
//! This crate provides the pieces between a decoded feed and whatever shows it:
//! - `TypedItem` / `Kind`: feed elements and the closed set of kinds
//! - `Renderer` / `RendererLoader`: the contracts a renderer module satisfies
//! - `Registry`: kind -> renderer resolution with one load per kind
//! - `Dispatcher`: order-preserving, fail-fast rendering of a whole feed
//! - `Unit` / `MountTarget`: rendered output and where it goes

pub mod dispatch;
pub mod error;
pub mod item;
pub mod mount;
pub mod registry;
pub mod renderer;
pub mod unit;

pub use dispatch::{DEFAULT_LOOKAHEAD, DispatchOptions, Dispatcher};
pub use error::{
    DispatchError, DispatchPhase, ItemError, LoadFailure, RenderFailure, ResolveError,
};
pub use item::{Kind, TypedItem, UnknownKind};
pub use mount::MountTarget;
pub use registry::{EntryState, Registry};
pub use renderer::{FnRenderer, LoaderTable, Renderer, RendererHandle, RendererLoader};
pub use unit::{Unit, escape_html};
