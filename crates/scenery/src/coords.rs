//! Integer 2-D vector helpers in world units.
//!
//! Rotation uses exact quarter-turn tables so repeated rotation never drifts.

use bevy::math::IVec2;

use crate::config::TILE_SIZE;

const SIN: [i32; 4] = [0, 1, 0, -1];
const COS: [i32; 4] = [1, 0, -1, 0];

pub fn add(a: IVec2, b: IVec2) -> IVec2 {
    IVec2::new(a.x + b.x, a.y + b.y)
}

pub fn sub(a: IVec2, b: IVec2) -> IVec2 {
    IVec2::new(a.x - b.x, a.y - b.y)
}

pub fn scale(v: IVec2, factor: i32) -> IVec2 {
    IVec2::new(v.x * factor, v.y * factor)
}

/// Snap a world position down onto the tile grid.
pub fn round(v: IVec2) -> IVec2 {
    scale(to_tile(v), TILE_SIZE)
}

/// Rotate by `steps` quarter turns (counter-clockwise in a y-up frame).
pub fn rotate(v: IVec2, steps: u8) -> IVec2 {
    let r = (steps & 3) as usize;
    IVec2::new(
        v.x * COS[r] - v.y * SIN[r],
        v.x * SIN[r] + v.y * COS[r],
    )
}

/// Reflect across the x axis.
pub fn mirror(v: IVec2) -> IVec2 {
    IVec2::new(v.x, -v.y)
}

/// World position to tile coordinate. Negative positions floor toward -inf.
pub fn to_tile(v: IVec2) -> IVec2 {
    IVec2::new(v.x.div_euclid(TILE_SIZE), v.y.div_euclid(TILE_SIZE))
}

pub fn to_world(tile: IVec2) -> IVec2 {
    scale(tile, TILE_SIZE)
}
