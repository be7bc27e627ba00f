//! Builder configuration snapshot.
//!
//! Hosts edit the [`BuilderSettings`] resource; `BuilderPlugin` pushes every
//! changed snapshot into the builder, which rebuilds its preview when a tool
//! session is active.

use bevy::prelude::*;

use scenery::config::Z_STEP;
use scenery::ElementFilter;

/// Default drag distance in screen pixels per height or rotation step.
pub const DEFAULT_DRAG_SENSITIVITY: i32 = 16;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildMode {
    /// Query every element first and only place the ones the host accepts.
    #[default]
    Safe,
    /// Skip the query and force placement.
    Raw,
}

/// What dragging with the pointer held down adjusts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragMode {
    #[default]
    None,
    /// Vertical drag raises or lowers the build by whole height steps.
    Height,
    /// Horizontal drag adds quarter turns.
    Rotation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragControl {
    pub mode: DragMode,
    /// Pixels per step; values below 1 are treated as 1.
    pub sensitivity: i32,
}

impl Default for DragControl {
    fn default() -> Self {
        Self {
            mode: DragMode::None,
            sensitivity: DEFAULT_DRAG_SENSITIVITY,
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct BuilderSettings {
    /// Quarter turns, 0-3.
    pub rotation: u8,
    pub mirrored: bool,
    /// Added to the target surface height, in world units.
    pub height_offset: i32,
    pub filter: ElementFilter,
    pub mode: BuildMode,
    pub show_ghost: bool,
    pub drag: DragControl,
}

impl Default for BuilderSettings {
    fn default() -> Self {
        Self {
            rotation: 0,
            mirrored: false,
            height_offset: 0,
            filter: ElementFilter::default(),
            mode: BuildMode::Safe,
            show_ghost: true,
            drag: DragControl::default(),
        }
    }
}

impl BuilderSettings {
    pub fn rotate_clockwise(&mut self) {
        self.rotation = (self.rotation + 1) & 3;
    }

    pub fn rotate_counter_clockwise(&mut self) {
        self.rotation = (self.rotation + 3) & 3;
    }

    /// Raise (or lower, for negative `steps`) by whole height steps.
    pub fn raise(&mut self, steps: i32) {
        self.height_offset += steps * Z_STEP;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_wraps() {
        let mut settings = BuilderSettings::default();
        settings.rotate_counter_clockwise();
        assert_eq!(settings.rotation, 3);
        settings.rotate_clockwise();
        settings.rotate_clockwise();
        assert_eq!(settings.rotation, 1);
    }

    #[test]
    fn test_raise_uses_height_steps() {
        let mut settings = BuilderSettings::default();
        settings.raise(2);
        settings.raise(-3);
        assert_eq!(settings.height_offset, -Z_STEP);
    }
}
