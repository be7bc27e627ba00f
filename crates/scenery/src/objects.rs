//! Object identity: numeric object indices ↔ stable qualifiers.
//!
//! Tile storage refers to loaded objects by a save-local index which changes
//! whenever content is reloaded. Templates store the qualifier instead and
//! resolve it back through an [`ObjectResolver`] at placement time.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::element::ElementType;

/// Object categories the host indexes separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Footpath,
    FootpathSurface,
    FootpathRailings,
    FootpathAddition,
    SmallScenery,
    LargeScenery,
    Wall,
    Banner,
    ParkEntrance,
    Ride,
}

impl From<ElementType> for ObjectKind {
    fn from(element_type: ElementType) -> Self {
        match element_type {
            ElementType::Footpath => ObjectKind::Footpath,
            ElementType::FootpathSurface => ObjectKind::FootpathSurface,
            ElementType::FootpathRailings => ObjectKind::FootpathRailings,
            ElementType::FootpathAddition => ObjectKind::FootpathAddition,
            ElementType::SmallScenery => ObjectKind::SmallScenery,
            ElementType::LargeScenery => ObjectKind::LargeScenery,
            ElementType::Wall => ObjectKind::Wall,
            ElementType::Banner => ObjectKind::Banner,
            ElementType::Entrance => ObjectKind::ParkEntrance,
            ElementType::Track => ObjectKind::Ride,
        }
    }
}

/// Shape facts of a small scenery object, read from its object metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneryShape {
    /// Occupies the whole tile; the quadrant is meaningless.
    pub full_tile: bool,
    /// Drawn across the tile diagonal.
    pub diagonal: bool,
    /// Occupies two quadrants along one edge.
    pub half_space: bool,
}

impl SceneryShape {
    pub const QUARTER: SceneryShape = SceneryShape {
        full_tile: false,
        diagonal: false,
        half_space: false,
    };

    pub const FULL_TILE: SceneryShape = SceneryShape {
        full_tile: true,
        diagonal: false,
        half_space: false,
    };
}

/// Resolves object identity against the currently loaded content.
pub trait ObjectResolver {
    /// Qualifier of the object loaded at `index`, if any.
    fn qualifier(&self, kind: ObjectKind, index: u32) -> Option<&str>;

    /// Current index of the object named by `qualifier`, if it is loaded.
    fn index_of(&self, kind: ObjectKind, qualifier: &str) -> Option<u32>;

    /// Shape facts of a small scenery object. Unknown objects report a plain
    /// quarter-tile shape.
    fn shape(&self, qualifier: &str) -> SceneryShape;

    fn is_available(&self, kind: ObjectKind, qualifier: &str) -> bool {
        self.index_of(kind, qualifier).is_some()
    }
}

#[derive(Debug, Clone)]
struct ObjectEntry {
    qualifier: String,
    shape: SceneryShape,
}

/// In-memory object index populated by the host as content loads.
#[derive(Debug, Clone, Default)]
pub struct ObjectIndex {
    by_index: HashMap<(ObjectKind, u32), ObjectEntry>,
    by_qualifier: HashMap<(ObjectKind, String), u32>,
}

impl ObjectIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a loaded object. Re-registering an index that now holds a
    /// different object drops the stale reverse mapping.
    pub fn register(
        &mut self,
        kind: ObjectKind,
        index: u32,
        qualifier: impl Into<String>,
        shape: SceneryShape,
    ) {
        let qualifier = qualifier.into();
        if let Some(previous) = self.by_index.get(&(kind, index)) {
            if previous.qualifier != qualifier {
                debug!(
                    "ObjectIndex: {:?} index {} reused ('{}' -> '{}')",
                    kind, index, previous.qualifier, qualifier
                );
                let stale = (kind, previous.qualifier.clone());
                if self.by_qualifier.get(&stale) == Some(&index) {
                    self.by_qualifier.remove(&stale);
                }
            }
        }
        self.by_qualifier.insert((kind, qualifier.clone()), index);
        self.by_index
            .insert((kind, index), ObjectEntry { qualifier, shape });
    }

    /// Builder-style [`ObjectIndex::register`].
    pub fn with(
        mut self,
        kind: ObjectKind,
        index: u32,
        qualifier: impl Into<String>,
        shape: SceneryShape,
    ) -> Self {
        self.register(kind, index, qualifier, shape);
        self
    }

    /// Forget everything; called when the host reloads its content.
    pub fn reload(&mut self) {
        self.by_index.clear();
        self.by_qualifier.clear();
    }

    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }
}

impl ObjectResolver for ObjectIndex {
    fn qualifier(&self, kind: ObjectKind, index: u32) -> Option<&str> {
        self.by_index
            .get(&(kind, index))
            .map(|entry| entry.qualifier.as_str())
    }

    fn index_of(&self, kind: ObjectKind, qualifier: &str) -> Option<u32> {
        self.by_qualifier
            .get(&(kind, qualifier.to_string()))
            .copied()
    }

    fn shape(&self, qualifier: &str) -> SceneryShape {
        self.index_of(ObjectKind::SmallScenery, qualifier)
            .and_then(|index| self.by_index.get(&(ObjectKind::SmallScenery, index)))
            .map(|entry| entry.shape)
            .unwrap_or_default()
    }
}
