/// Width of one map tile in world units.
pub const TILE_SIZE: i32 = 32;

/// Height of one vertical level in world units.
pub const Z_STEP: i32 = 8;

/// Lowest base height the host accepts for placed scenery (two land levels).
pub const FLOOR_Z: i32 = 2 * Z_STEP;

/// Banner actions anchor two levels below the element's logical base height.
pub const BANNER_Z_OFFSET: i32 = 2 * Z_STEP;

/// OR'd into the footpath object argument to place a queue line.
pub const FOOTPATH_QUEUE_FLAG: u32 = 1 << 7;

/// Direction argument the host reads as "footpath has no direction".
pub const NO_DIRECTION: u8 = 0xFF;
