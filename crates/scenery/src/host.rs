//! Services the host game provides.
//!
//! All of them run on the host's single game thread. Action results arrive
//! through callbacks that the host fires later on that same thread, so no
//! service needs to be `Send`.

use bevy::math::IVec2;

use crate::codec::{PlacementAction, RawElement};
use crate::element::ElementType;
use crate::template::Extent;

/// Tile storage and the tile-selection highlight.
pub trait MapService {
    /// Raw elements stored on the tile at tile coordinate `tile`.
    fn tile_elements(&self, tile: IVec2) -> Vec<RawElement>;

    /// Current selection highlight, in world units.
    fn tile_selection(&self) -> Option<Extent>;

    /// Replace the selection highlight; `None` clears it.
    fn set_tile_selection(&mut self, selection: Option<Extent>);
}

/// Base height of the surface on `tile`, if the tile has one.
pub fn surface_height(map: &dyn MapService, tile: IVec2) -> Option<i32> {
    map.tile_elements(tile).iter().find_map(|raw| match raw {
        RawElement::Surface { base_z } => Some(*base_z),
        _ => None,
    })
}

/// Outcome of a host query or execute call. `error == 0` is success.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActionResult {
    pub error: u32,
    pub message: Option<String>,
}

impl ActionResult {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn rejected(error: u32, message: impl Into<String>) -> Self {
        Self {
            error,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error == 0
    }
}

/// Continuation the host fires exactly once with the action's result.
pub type ActionCallback = Box<dyn FnOnce(ActionResult)>;

/// Placement legality checks and execution.
pub trait ActionService {
    /// Check whether `action` would succeed without changing the map.
    fn query(&mut self, action: &PlacementAction, done: ActionCallback);

    /// Perform `action`.
    fn execute(&mut self, action: &PlacementAction, done: ActionCallback);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHint {
    Crosshair,
    Picker,
}

/// Parameters for activating a map tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolActivation {
    pub id: &'static str,
    pub cursor: CursorHint,
    /// Restrict pointer hits to these element types; `None` hits anything.
    pub filter: Option<Vec<ElementType>>,
}

/// Pointer tool lifecycle. Once activated, the host delivers start, down,
/// move, up and finish events to whoever activated the tool.
pub trait ToolService {
    fn activate(&mut self, activation: ToolActivation);

    /// Ask the host to finish the active tool. The host answers with a
    /// finish event.
    fn cancel(&mut self);
}
