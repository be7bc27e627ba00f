//! Template placement state machine.
//!
//! A session runs from the tool's start event to its finish event. Every
//! pointer move or settings change removes the current ghost and submits a
//! freshly transformed copy of the template; releasing the pointer submits a
//! real build. Each element is queried and executed on its own, so a build
//! may place partially.

pub mod builder;
pub mod drag;


pub use builder::*;
pub use drag::DragState;
