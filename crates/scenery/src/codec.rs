//! Element codec: host tile storage → [`Element`] and [`Element`] → host
//! action arguments.

use bevy::math::IVec2;
use serde::Serialize;

use crate::config::{BANNER_Z_OFFSET, FOOTPATH_QUEUE_FLAG, NO_DIRECTION};
use crate::element::{
    path_direction, Banner, Element, ElementKind, ElementType, Entrance, Footpath,
    FootpathAddition, FootpathRailings, FootpathSurface, LargeScenery, SmallScenery, Slope, Track,
    Wall,
};
use crate::errors::CodecError;
use crate::objects::{ObjectKind, ObjectResolver};

// =============================================================================
// Raw tile storage
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawFootpath {
    pub base_z: i32,
    /// Legacy combined footpath object.
    pub object: Option<u32>,
    pub surface_object: Option<u32>,
    pub railings_object: Option<u32>,
    pub addition: Option<u32>,
    /// Raised corners, one bit per corner clockwise from the north corner
    /// (bit 0). Edge `d` runs between corners `d` and `d + 1`.
    pub corners: u8,
    pub is_queue: bool,
    /// [`NO_DIRECTION`] when the path has none.
    pub direction: Option<u8>,
    pub is_ghost: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawSmallScenery {
    pub base_z: i32,
    pub object: u32,
    pub direction: u8,
    /// One bit per occupied quadrant.
    pub occupied_quadrants: u8,
    pub primary_colour: u8,
    pub secondary_colour: u8,
    pub tertiary_colour: u8,
    pub is_ghost: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawLargeScenery {
    pub base_z: i32,
    pub object: u32,
    pub direction: u8,
    /// Index of this tile within the multi-tile object.
    pub sequence: u8,
    pub primary_colour: u8,
    pub secondary_colour: u8,
    pub tertiary_colour: u8,
    pub is_ghost: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawWall {
    pub base_z: i32,
    pub object: u32,
    pub direction: u8,
    pub primary_colour: u8,
    pub secondary_colour: u8,
    pub tertiary_colour: u8,
    pub is_ghost: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawBanner {
    pub base_z: i32,
    pub object: u32,
    pub direction: u8,
    pub primary_colour: u8,
    pub is_ghost: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawEntrance {
    pub base_z: i32,
    pub object: u32,
    pub direction: u8,
    pub entrance_type: u8,
    pub sequence: u8,
    pub is_ghost: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTrack {
    pub base_z: i32,
    pub ride_object: u32,
    pub direction: u8,
    pub track_type: u16,
    pub sequence: u8,
    pub is_ghost: bool,
}

/// One element as the host stores it on a tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawElement {
    Surface { base_z: i32 },
    Footpath(RawFootpath),
    SmallScenery(RawSmallScenery),
    LargeScenery(RawLargeScenery),
    Wall(RawWall),
    Banner(RawBanner),
    Entrance(RawEntrance),
    Track(RawTrack),
}

// =============================================================================
// Decode
// =============================================================================

fn resolve(
    objects: &dyn ObjectResolver,
    kind: ObjectKind,
    index: u32,
) -> Result<String, CodecError> {
    objects
        .qualifier(kind, index)
        .map(str::to_string)
        .ok_or(CodecError::UnknownIndex { kind, index })
}

/// Path slope from the raised-corner mask. Only two raised corners sharing
/// an edge form a slope; every other mask reads as flat.
pub fn slope_from_corners(corners: u8) -> Slope {
    match corners & 0xF {
        0b0011 => Slope::raised(0),
        0b0110 => Slope::raised(1),
        0b1100 => Slope::raised(2),
        0b1001 => Slope::raised(3),
        _ => Slope::FLAT,
    }
}

/// Lowest occupied quadrant, or 0 for an empty mask.
fn quadrant_from_occupancy(occupied: u8) -> u8 {
    let mask = occupied & 0xF;
    if mask == 0 {
        0
    } else {
        (mask.trailing_zeros() & 3) as u8
    }
}

/// Decode one raw element found on the tile at world position `at`.
///
/// A footpath tile can yield several elements (path or surface + railings,
/// plus an addition). Surfaces, ghosts and secondary tiles of multi-tile
/// objects yield nothing. Entries whose object index does not resolve are
/// returned as errors for the caller to drop.
pub fn decode(
    raw: &RawElement,
    at: IVec2,
    objects: &dyn ObjectResolver,
) -> Vec<Result<Element, CodecError>> {
    let element = |z: i32, kind: ElementKind| Element::new(at.x, at.y, z, kind);
    match raw {
        RawElement::Surface { .. } => Vec::new(),
        RawElement::Footpath(path) if path.is_ghost => Vec::new(),
        RawElement::Footpath(path) => {
            let slope = slope_from_corners(path.corners);
            let direction = path_direction(path.direction);
            let mut out = Vec::new();
            if let Some(index) = path.object {
                out.push(resolve(objects, ObjectKind::Footpath, index).map(|qualifier| {
                    element(
                        path.base_z,
                        ElementKind::Footpath(Footpath {
                            qualifier,
                            slope,
                            is_queue: path.is_queue,
                            direction,
                        }),
                    )
                }));
            }
            if let Some(index) = path.surface_object {
                out.push(
                    resolve(objects, ObjectKind::FootpathSurface, index).map(|qualifier| {
                        element(
                            path.base_z,
                            ElementKind::FootpathSurface(FootpathSurface {
                                qualifier,
                                slope,
                                is_queue: path.is_queue,
                                direction,
                            }),
                        )
                    }),
                );
            }
            if let Some(index) = path.railings_object {
                out.push(
                    resolve(objects, ObjectKind::FootpathRailings, index).map(|qualifier| {
                        element(
                            path.base_z,
                            ElementKind::FootpathRailings(FootpathRailings { qualifier, slope }),
                        )
                    }),
                );
            }
            if let Some(index) = path.addition {
                out.push(
                    resolve(objects, ObjectKind::FootpathAddition, index).map(|qualifier| {
                        element(
                            path.base_z,
                            ElementKind::FootpathAddition(FootpathAddition { qualifier }),
                        )
                    }),
                );
            }
            out
        }
        RawElement::SmallScenery(s) if s.is_ghost => Vec::new(),
        RawElement::SmallScenery(s) => {
            vec![resolve(objects, ObjectKind::SmallScenery, s.object).map(|qualifier| {
                element(
                    s.base_z,
                    ElementKind::SmallScenery(SmallScenery {
                        qualifier,
                        direction: s.direction & 3,
                        quadrant: quadrant_from_occupancy(s.occupied_quadrants),
                        primary_colour: s.primary_colour,
                        secondary_colour: s.secondary_colour,
                        tertiary_colour: s.tertiary_colour,
                    }),
                )
            })]
        }
        RawElement::LargeScenery(l) if l.is_ghost || l.sequence != 0 => Vec::new(),
        RawElement::LargeScenery(l) => {
            vec![resolve(objects, ObjectKind::LargeScenery, l.object).map(|qualifier| {
                element(
                    l.base_z,
                    ElementKind::LargeScenery(LargeScenery {
                        qualifier,
                        direction: l.direction & 3,
                        primary_colour: l.primary_colour,
                        secondary_colour: l.secondary_colour,
                        tertiary_colour: l.tertiary_colour,
                    }),
                )
            })]
        }
        RawElement::Wall(w) if w.is_ghost => Vec::new(),
        RawElement::Wall(w) => {
            vec![resolve(objects, ObjectKind::Wall, w.object).map(|qualifier| {
                element(
                    w.base_z,
                    ElementKind::Wall(Wall {
                        qualifier,
                        edge: w.direction & 3,
                        primary_colour: w.primary_colour,
                        secondary_colour: w.secondary_colour,
                        tertiary_colour: w.tertiary_colour,
                    }),
                )
            })]
        }
        RawElement::Banner(b) if b.is_ghost => Vec::new(),
        RawElement::Banner(b) => {
            vec![resolve(objects, ObjectKind::Banner, b.object).map(|qualifier| {
                element(
                    b.base_z,
                    ElementKind::Banner(Banner {
                        qualifier,
                        direction: b.direction & 3,
                        primary_colour: b.primary_colour,
                    }),
                )
            })]
        }
        RawElement::Entrance(e) if e.is_ghost || e.sequence != 0 => Vec::new(),
        RawElement::Entrance(e) => {
            vec![resolve(objects, ObjectKind::ParkEntrance, e.object).map(|qualifier| {
                element(
                    e.base_z,
                    ElementKind::Entrance(Entrance {
                        qualifier,
                        direction: e.direction & 3,
                        entrance_type: e.entrance_type,
                    }),
                )
            })]
        }
        RawElement::Track(t) if t.is_ghost || t.sequence != 0 => Vec::new(),
        RawElement::Track(t) => {
            vec![resolve(objects, ObjectKind::Ride, t.ride_object).map(|qualifier| {
                element(
                    t.base_z,
                    ElementKind::Track(Track {
                        qualifier,
                        direction: t.direction & 3,
                        track_type: t.track_type,
                    }),
                )
            })]
        }
    }
}

// =============================================================================
// Encode
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionOp {
    Place,
    Remove,
}

/// Host action kind; every element type has a place/remove pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionKind {
    pub target: ElementType,
    pub op: ActionOp,
}

impl ActionKind {
    pub fn place(target: ElementType) -> Self {
        Self {
            target,
            op: ActionOp::Place,
        }
    }

    pub fn remove(target: ElementType) -> Self {
        Self {
            target,
            op: ActionOp::Remove,
        }
    }

    /// Name of the host action.
    pub fn name(&self) -> &'static str {
        use ActionOp::{Place, Remove};
        match (self.target, self.op) {
            (ElementType::Footpath, Place) => "footpathplace",
            (ElementType::Footpath, Remove) => "footpathremove",
            (ElementType::FootpathSurface, Place) => "footpathsurfaceplace",
            (ElementType::FootpathSurface, Remove) => "footpathsurfaceremove",
            (ElementType::FootpathRailings, Place) => "footpathrailingsplace",
            (ElementType::FootpathRailings, Remove) => "footpathrailingsremove",
            (ElementType::FootpathAddition, Place) => "footpathadditionplace",
            (ElementType::FootpathAddition, Remove) => "footpathadditionremove",
            (ElementType::SmallScenery, Place) => "smallsceneryplace",
            (ElementType::SmallScenery, Remove) => "smallsceneryremove",
            (ElementType::LargeScenery, Place) => "largesceneryplace",
            (ElementType::LargeScenery, Remove) => "largesceneryremove",
            (ElementType::Wall, Place) => "wallplace",
            (ElementType::Wall, Remove) => "wallremove",
            (ElementType::Banner, Place) => "bannerplace",
            (ElementType::Banner, Remove) => "bannerremove",
            (ElementType::Entrance, Place) => "parkentranceplace",
            (ElementType::Entrance, Remove) => "parkentranceremove",
            (ElementType::Track, Place) => "trackplace",
            (ElementType::Track, Remove) => "trackremove",
        }
    }
}

/// Arguments handed to the host action, JSON-serializable for scripted hosts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionArgs {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quadrant: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slope: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_colour: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_colour: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tertiary_colour: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tile_index: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_type: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entrance_type: Option<u8>,
    pub ghost: bool,
    /// Skip the host's legality checks (raw mode).
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementAction {
    pub kind: ActionKind,
    pub args: ActionArgs,
}

fn index_of(
    objects: &dyn ObjectResolver,
    element: &Element,
) -> Result<u32, CodecError> {
    let kind = ObjectKind::from(element.element_type());
    objects
        .index_of(kind, element.qualifier())
        .ok_or_else(|| CodecError::Unresolved {
            kind,
            qualifier: element.qualifier().to_string(),
        })
}

fn base_args(element: &Element, ghost: bool) -> ActionArgs {
    ActionArgs {
        x: element.x,
        y: element.y,
        z: element.z,
        ghost,
        ..Default::default()
    }
}

fn footpath_object(index: u32, is_queue: bool) -> u32 {
    if is_queue {
        index | FOOTPATH_QUEUE_FLAG
    } else {
        index
    }
}

/// Arguments to place `element`. Fails when its qualifier is not loaded.
pub fn encode_place(
    element: &Element,
    objects: &dyn ObjectResolver,
    ghost: bool,
) -> Result<PlacementAction, CodecError> {
    let index = index_of(objects, element)?;
    let base = base_args(element, ghost);
    let args = match &element.kind {
        ElementKind::Footpath(p) => ActionArgs {
            object: Some(footpath_object(index, p.is_queue)),
            slope: Some(p.slope.0),
            direction: Some(p.direction.unwrap_or(NO_DIRECTION)),
            ..base
        },
        ElementKind::FootpathSurface(p) => ActionArgs {
            object: Some(footpath_object(index, p.is_queue)),
            slope: Some(p.slope.0),
            direction: Some(p.direction.unwrap_or(NO_DIRECTION)),
            ..base
        },
        ElementKind::FootpathRailings(p) => ActionArgs {
            object: Some(index),
            slope: Some(p.slope.0),
            ..base
        },
        // Index 0 is reserved for "no addition".
        ElementKind::FootpathAddition(_) => ActionArgs {
            object: Some(index + 1),
            ..base
        },
        ElementKind::SmallScenery(s) => ActionArgs {
            object: Some(index),
            direction: Some(s.direction),
            quadrant: Some(s.quadrant),
            primary_colour: Some(s.primary_colour),
            secondary_colour: Some(s.secondary_colour),
            tertiary_colour: Some(s.tertiary_colour),
            ..base
        },
        ElementKind::LargeScenery(l) => ActionArgs {
            object: Some(index),
            direction: Some(l.direction),
            primary_colour: Some(l.primary_colour),
            secondary_colour: Some(l.secondary_colour),
            tertiary_colour: Some(l.tertiary_colour),
            ..base
        },
        ElementKind::Wall(w) => ActionArgs {
            object: Some(index),
            edge: Some(w.edge),
            primary_colour: Some(w.primary_colour),
            secondary_colour: Some(w.secondary_colour),
            tertiary_colour: Some(w.tertiary_colour),
            ..base
        },
        ElementKind::Banner(b) => ActionArgs {
            z: element.z - BANNER_Z_OFFSET,
            object: Some(index),
            direction: Some(b.direction),
            primary_colour: Some(b.primary_colour),
            ..base
        },
        ElementKind::Entrance(e) => ActionArgs {
            object: Some(index),
            direction: Some(e.direction),
            entrance_type: Some(e.entrance_type),
            ..base
        },
        ElementKind::Track(t) => ActionArgs {
            object: Some(index),
            direction: Some(t.direction),
            track_type: Some(t.track_type),
            ..base
        },
    };
    Ok(PlacementAction {
        kind: ActionKind::place(element.element_type()),
        args,
    })
}

/// Arguments to remove `element`. Only small scenery needs its object
/// resolved; every other type is located by position and orientation.
pub fn encode_remove(
    element: &Element,
    objects: &dyn ObjectResolver,
    ghost: bool,
) -> Result<PlacementAction, CodecError> {
    let base = base_args(element, ghost);
    let args = match &element.kind {
        ElementKind::Footpath(_)
        | ElementKind::FootpathSurface(_)
        | ElementKind::FootpathRailings(_)
        | ElementKind::FootpathAddition(_) => base,
        ElementKind::SmallScenery(s) => ActionArgs {
            object: Some(index_of(objects, element)?),
            quadrant: Some(s.quadrant),
            ..base
        },
        ElementKind::LargeScenery(l) => ActionArgs {
            direction: Some(l.direction),
            tile_index: Some(0),
            ..base
        },
        ElementKind::Wall(w) => ActionArgs {
            edge: Some(w.edge),
            ..base
        },
        ElementKind::Banner(b) => ActionArgs {
            z: element.z - BANNER_Z_OFFSET,
            direction: Some(b.direction),
            ..base
        },
        ElementKind::Entrance(e) => ActionArgs {
            direction: Some(e.direction),
            ..base
        },
        ElementKind::Track(t) => ActionArgs {
            direction: Some(t.direction),
            track_type: Some(t.track_type),
            tile_index: Some(0),
            ..base
        },
    };
    Ok(PlacementAction {
        kind: ActionKind::remove(element.element_type()),
        args,
    })
}
