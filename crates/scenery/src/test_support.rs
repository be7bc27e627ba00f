//! Shared fixtures for unit tests.

use crate::element::{Element, ElementKind, SmallScenery};
use crate::objects::{ObjectIndex, ObjectKind, SceneryShape};

pub const QUARTER: &str = "rct2.scenery_small.tl0";
pub const FULL_TILE: &str = "rct2.scenery_small.tic";
pub const DIAGONAL: &str = "rct2.scenery_small.tdf";
pub const DIAGONAL_FULL: &str = "rct2.scenery_small.tdfull";
pub const HALF_SPACE: &str = "rct2.scenery_small.thl";

pub fn objects() -> ObjectIndex {
    let plain = SceneryShape::default();
    ObjectIndex::new()
        .with(ObjectKind::Footpath, 1, "rct2.footpath.tarmac", plain)
        .with(ObjectKind::FootpathSurface, 0, "rct2.footpath_surface.tarmac", plain)
        .with(ObjectKind::FootpathRailings, 0, "rct2.footpath_railings.wood", plain)
        .with(ObjectKind::FootpathAddition, 0, "rct2.footpath_item.bench1", plain)
        .with(ObjectKind::SmallScenery, 0, QUARTER, SceneryShape::QUARTER)
        .with(ObjectKind::SmallScenery, 1, FULL_TILE, SceneryShape::FULL_TILE)
        .with(
            ObjectKind::SmallScenery,
            2,
            DIAGONAL,
            SceneryShape {
                diagonal: true,
                ..plain
            },
        )
        .with(
            ObjectKind::SmallScenery,
            3,
            DIAGONAL_FULL,
            SceneryShape {
                diagonal: true,
                full_tile: true,
                ..plain
            },
        )
        .with(
            ObjectKind::SmallScenery,
            4,
            HALF_SPACE,
            SceneryShape {
                half_space: true,
                ..plain
            },
        )
        .with(ObjectKind::LargeScenery, 0, "rct2.scenery_large.glthent", plain)
        .with(ObjectKind::Wall, 0, "rct2.scenery_wall.wallbr32", plain)
        .with(ObjectKind::Banner, 0, "rct2.banner.bn1", plain)
        .with(ObjectKind::ParkEntrance, 0, "rct2.park_entrance.pkent1", plain)
        .with(ObjectKind::Ride, 0, "rct2.ride.twist1", plain)
}

pub fn small_scenery(x: i32, y: i32, quadrant: u8, direction: u8, qualifier: &str) -> Element {
    Element::new(
        x,
        y,
        16,
        ElementKind::SmallScenery(SmallScenery {
            qualifier: qualifier.to_string(),
            direction,
            quadrant,
            primary_colour: 0,
            secondary_colour: 0,
            tertiary_colour: 0,
        }),
    )
}
