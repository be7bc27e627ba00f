//! Continuous drag control: turns pointer travel while the button is held
//! into whole height or rotation steps.

use bevy::math::IVec2;

use crate::settings::{DragControl, DragMode};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragState {
    /// Screen position where the button went down.
    origin: Option<IVec2>,
    height_steps: i32,
    rotation_steps: u8,
}

impl DragState {
    pub fn begin(&mut self, screen: IVec2) {
        *self = Self {
            origin: Some(screen),
            ..Default::default()
        };
    }

    pub fn end(&mut self) {
        *self = Self::default();
    }

    pub fn is_dragging(&self) -> bool {
        self.origin.is_some()
    }

    /// Recompute the steps for the pointer now at `screen`. Returns `true`
    /// when either step count changed.
    pub fn update(&mut self, screen: IVec2, control: &DragControl) -> bool {
        let Some(origin) = self.origin else {
            return false;
        };
        let sensitivity = control.sensitivity.max(1);
        let delta = screen - origin;
        // Screen y grows downward; dragging up raises.
        let (height, rotation) = match control.mode {
            DragMode::None => (0, 0),
            DragMode::Height => (-delta.y / sensitivity, 0),
            DragMode::Rotation => (0, (delta.x / sensitivity).rem_euclid(4) as u8),
        };
        let changed = height != self.height_steps || rotation != self.rotation_steps;
        self.height_steps = height;
        self.rotation_steps = rotation;
        changed
    }

    pub fn height_steps(&self) -> i32 {
        self.height_steps
    }

    pub fn rotation_steps(&self) -> u8 {
        self.rotation_steps
    }
}
