//! Portable scenery element model.
//!
//! Elements carry a stable object qualifier instead of the save-local numeric
//! index, so a template survives content reloads and travels between parks.
//! Shape facts (full tile, diagonal, half space) are never stored here; they
//! are looked up from the resolved object when a transform needs them.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::NO_DIRECTION;

// =============================================================================
// Slope
// =============================================================================

/// Packed footpath slope: bits 0-1 hold the raised edge direction, bit 2 the
/// "sloped" flag. A value of zero is a flat path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
#[serde(transparent)]
pub struct Slope(pub u8);

impl Slope {
    pub const FLAT: Slope = Slope(0);
    pub const SLOPED: u8 = 1 << 2;

    /// Sloped path raised toward `direction`.
    pub fn raised(direction: u8) -> Self {
        Slope(Self::SLOPED | (direction & 3))
    }

    pub fn is_flat(self) -> bool {
        self.0 == 0
    }

    pub fn is_sloped(self) -> bool {
        self.0 & Self::SLOPED != 0
    }

    pub fn direction(self) -> u8 {
        self.0 & 3
    }

    /// One clockwise quarter turn. Flat slopes are returned untouched.
    pub fn rotated(self) -> Self {
        if self.is_flat() {
            return self;
        }
        let sloped = self.0 & Self::SLOPED;
        let rest = self.0 ^ sloped;
        Slope(((rest + 1) & 3) | sloped)
    }

    /// Reflection across the template's x axis: north and south swap.
    pub fn mirrored(self) -> Self {
        if self.0 & 1 != 0 {
            Slope(self.0 ^ 2)
        } else {
            self
        }
    }
}

// =============================================================================
// Per-type data
// =============================================================================

/// Footpath direction as stored: the host's "no direction" sentinel becomes
/// `None`, anything else is reduced mod 4.
pub fn path_direction(raw: Option<u8>) -> Option<u8> {
    raw.filter(|d| *d != NO_DIRECTION).map(|d| d & 3)
}

fn deserialize_path_direction<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u8>, D::Error> {
    Ok(path_direction(Option::<u8>::deserialize(deserializer)?))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Footpath {
    pub qualifier: String,
    pub slope: Slope,
    pub is_queue: bool,
    /// Queue lines face a direction; plain paths have none.
    #[serde(default, deserialize_with = "deserialize_path_direction")]
    pub direction: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct FootpathSurface {
    pub qualifier: String,
    pub slope: Slope,
    pub is_queue: bool,
    #[serde(default, deserialize_with = "deserialize_path_direction")]
    pub direction: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct FootpathRailings {
    pub qualifier: String,
    pub slope: Slope,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct FootpathAddition {
    pub qualifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct SmallScenery {
    pub qualifier: String,
    pub direction: u8,
    pub quadrant: u8,
    pub primary_colour: u8,
    pub secondary_colour: u8,
    pub tertiary_colour: u8,
}

/// Only the primary tile of a large scenery object is tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct LargeScenery {
    pub qualifier: String,
    pub direction: u8,
    pub primary_colour: u8,
    pub secondary_colour: u8,
    pub tertiary_colour: u8,
}

/// A wall's direction is the tile edge it stands on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Wall {
    pub qualifier: String,
    pub edge: u8,
    pub primary_colour: u8,
    pub secondary_colour: u8,
    pub tertiary_colour: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Banner {
    pub qualifier: String,
    pub direction: u8,
    pub primary_colour: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Entrance {
    pub qualifier: String,
    pub direction: u8,
    pub entrance_type: u8,
}

/// Only the first sequence block of a track piece is tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Track {
    pub qualifier: String,
    pub direction: u8,
    pub track_type: u16,
}

// =============================================================================
// Element
// =============================================================================

/// Discriminant of [`ElementKind`], used for filters and action kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Footpath,
    FootpathSurface,
    FootpathRailings,
    FootpathAddition,
    SmallScenery,
    LargeScenery,
    Wall,
    Banner,
    Entrance,
    Track,
}

impl ElementType {
    pub const ALL: [ElementType; 10] = [
        ElementType::Footpath,
        ElementType::FootpathSurface,
        ElementType::FootpathRailings,
        ElementType::FootpathAddition,
        ElementType::SmallScenery,
        ElementType::LargeScenery,
        ElementType::Wall,
        ElementType::Banner,
        ElementType::Entrance,
        ElementType::Track,
    ];

    /// Path surfaces, railings and additions all live on a footpath tile.
    pub fn is_footpath_family(self) -> bool {
        matches!(
            self,
            ElementType::Footpath
                | ElementType::FootpathSurface
                | ElementType::FootpathRailings
                | ElementType::FootpathAddition
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    Footpath(Footpath),
    FootpathSurface(FootpathSurface),
    FootpathRailings(FootpathRailings),
    FootpathAddition(FootpathAddition),
    SmallScenery(SmallScenery),
    LargeScenery(LargeScenery),
    Wall(Wall),
    Banner(Banner),
    Entrance(Entrance),
    Track(Track),
}

impl ElementKind {
    pub fn element_type(&self) -> ElementType {
        match self {
            ElementKind::Footpath(_) => ElementType::Footpath,
            ElementKind::FootpathSurface(_) => ElementType::FootpathSurface,
            ElementKind::FootpathRailings(_) => ElementType::FootpathRailings,
            ElementKind::FootpathAddition(_) => ElementType::FootpathAddition,
            ElementKind::SmallScenery(_) => ElementType::SmallScenery,
            ElementKind::LargeScenery(_) => ElementType::LargeScenery,
            ElementKind::Wall(_) => ElementType::Wall,
            ElementKind::Banner(_) => ElementType::Banner,
            ElementKind::Entrance(_) => ElementType::Entrance,
            ElementKind::Track(_) => ElementType::Track,
        }
    }

    pub fn qualifier(&self) -> &str {
        match self {
            ElementKind::Footpath(d) => &d.qualifier,
            ElementKind::FootpathSurface(d) => &d.qualifier,
            ElementKind::FootpathRailings(d) => &d.qualifier,
            ElementKind::FootpathAddition(d) => &d.qualifier,
            ElementKind::SmallScenery(d) => &d.qualifier,
            ElementKind::LargeScenery(d) => &d.qualifier,
            ElementKind::Wall(d) => &d.qualifier,
            ElementKind::Banner(d) => &d.qualifier,
            ElementKind::Entrance(d) => &d.qualifier,
            ElementKind::Track(d) => &d.qualifier,
        }
    }
}

/// One captured scenery object anchored at a tile origin and base height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Element {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    pub fn new(x: i32, y: i32, z: i32, kind: ElementKind) -> Self {
        Self { x, y, z, kind }
    }

    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    pub fn qualifier(&self) -> &str {
        self.kind.qualifier()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_slope_never_rotates_or_mirrors() {
        assert_eq!(Slope::FLAT.rotated(), Slope::FLAT);
        assert_eq!(Slope::FLAT.mirrored(), Slope::FLAT);
    }

    #[test]
    fn test_sloped_north_rotates_to_east_keeping_flag() {
        let north = Slope::raised(0);
        let east = north.rotated();
        assert!(east.is_sloped());
        assert_eq!(east.direction(), 1);
        assert_eq!(east, Slope(0b101));
    }

    #[test]
    fn test_slope_four_rotations_is_identity() {
        for direction in 0..4 {
            let s = Slope::raised(direction);
            assert_eq!(s.rotated().rotated().rotated().rotated(), s);
        }
    }

    #[test]
    fn test_slope_mirror_swaps_odd_directions_only() {
        assert_eq!(Slope::raised(1).mirrored(), Slope::raised(3));
        assert_eq!(Slope::raised(3).mirrored(), Slope::raised(1));
        assert_eq!(Slope::raised(0).mirrored(), Slope::raised(0));
        assert_eq!(Slope::raised(2).mirrored(), Slope::raised(2));
    }

    #[test]
    fn test_element_json_is_flat_and_tagged() {
        let element = Element::new(
            32,
            64,
            16,
            ElementKind::Banner(Banner {
                qualifier: "rct2.banner.bn1".to_string(),
                direction: 2,
                primary_colour: 5,
            }),
        );
        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(json["type"], "banner");
        assert_eq!(json["x"], 32);
        assert_eq!(json["qualifier"], "rct2.banner.bn1");

        let back: Element = serde_json::from_value(json).unwrap();
        assert_eq!(back, element);
    }

    #[test]
    fn test_no_direction_sentinel_loads_as_none() {
        let json = r#"{"x":0,"y":0,"z":16,"type":"footpath","qualifier":"rct2.footpath.tarmac","slope":0,"is_queue":false,"direction":255}"#;
        let element: Element = serde_json::from_str(json).unwrap();
        let ElementKind::Footpath(path) = &element.kind else {
            panic!("expected footpath, got {:?}", element.kind);
        };
        assert_eq!(path.direction, None);

        let json = r#"{"x":0,"y":0,"z":16,"type":"footpath_surface","qualifier":"rct2.footpath_surface.tarmac","slope":0,"is_queue":true,"direction":6}"#;
        let element: Element = serde_json::from_str(json).unwrap();
        let ElementKind::FootpathSurface(surface) = &element.kind else {
            panic!("expected footpath surface, got {:?}", element.kind);
        };
        assert_eq!(surface.direction, Some(2));
    }

    #[test]
    fn test_missing_path_direction_is_none() {
        let json = r#"{"x":0,"y":0,"z":16,"type":"footpath","qualifier":"rct2.footpath.tarmac","slope":0,"is_queue":false}"#;
        let element: Element = serde_json::from_str(json).unwrap();
        assert!(matches!(&element.kind, ElementKind::Footpath(p) if p.direction.is_none()));
    }

    #[test]
    fn test_path_direction_normalizes() {
        assert_eq!(path_direction(Some(NO_DIRECTION)), None);
        assert_eq!(path_direction(Some(5)), Some(1));
        assert_eq!(path_direction(None), None);
    }

    #[test]
    fn test_footpath_family() {
        assert!(ElementType::FootpathAddition.is_footpath_family());
        assert!(ElementType::FootpathRailings.is_footpath_family());
        assert!(!ElementType::Wall.is_footpath_family());
    }
}
