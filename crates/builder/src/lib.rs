//! Placement tool for scenery templates.
//!
//! [`PlacementBuilder`] owns a template and a tool session. Pointer events
//! move a ghost preview around the map; releasing the pointer commits a real
//! build. Host callbacks never call back into the builder directly: they
//! queue completions which [`PlacementBuilder::pump`] drains once per frame.

pub mod clipboard;
pub mod placement;
pub mod plugin;
pub mod selector;
pub mod settings;

mod error;

#[cfg(test)]
mod test_support;

pub use clipboard::Clipboard;
pub use error::BuilderError;
pub use placement::{BuildReport, HostServices, Phase, PlacementBuilder, PointerEvent};
pub use plugin::{BuildCompleted, BuilderPlugin, ToolEvent};
pub use selector::RegionSelector;
pub use settings::{BuildMode, BuilderSettings, DragControl, DragMode};
