//! Scenery templates: capture a map region, transform it, and encode it for
//! the host's placement actions.
//!
//! The crate is host-agnostic. Tile reads, placement actions and tool
//! activation are consumed through the traits in [`host`]; object identity is
//! resolved through an [`objects::ObjectResolver`].

pub mod codec;
pub mod config;
pub mod coords;
pub mod element;
pub mod filter;
pub mod host;
pub mod objects;
pub mod template;
pub mod transform;

mod errors;

#[cfg(test)]
mod test_support;

pub use errors::{CodecError, TemplateError};
pub use element::{Element, ElementKind, ElementType, Slope};
pub use filter::ElementFilter;
pub use objects::{ObjectIndex, ObjectKind, ObjectResolver, SceneryShape};
pub use template::{Extent, Template};
