//! `Template`: a captured, position-independent group of elements.
//!
//! Every mutator returns a new template so the builder can recompute a
//! preview from the stored original on every pointer move.

use std::collections::BTreeSet;

use bevy::prelude::*;

use crate::codec;
use crate::config::TILE_SIZE;
use crate::coords;
use crate::element::Element;
use crate::errors::TemplateError;
use crate::filter::ElementFilter;
use crate::host::{surface_height, MapService};
use crate::objects::{ObjectKind, ObjectResolver};
use crate::transform;

// =============================================================================
// Extent
// =============================================================================

/// Footprint of a template or a selection, in world units.
///
/// Corners and tiles are tile origins. `Rect::end` is the origin of the last
/// tile, so a single-tile rectangle has `start == end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extent {
    Rect { start: IVec2, end: IVec2 },
    Tiles(Vec<IVec2>),
}

impl Extent {
    /// Rectangle spanning two corners given in any order.
    pub fn rect(a: IVec2, b: IVec2) -> Self {
        Extent::Rect {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Extent::Rect { .. } => false,
            Extent::Tiles(tiles) => tiles.is_empty(),
        }
    }

    /// Minimum and maximum tile origin.
    pub fn bounds(&self) -> Option<(IVec2, IVec2)> {
        match self {
            Extent::Rect { start, end } => Some((start.min(*end), start.max(*end))),
            Extent::Tiles(tiles) => {
                let first = *tiles.first()?;
                Some(
                    tiles
                        .iter()
                        .fold((first, first), |(lo, hi), t| (lo.min(*t), hi.max(*t))),
                )
            }
        }
    }

    pub fn origin(&self) -> Option<IVec2> {
        self.bounds().map(|(lo, _)| lo)
    }

    /// Width and length of the bounding box in world units; a single tile is
    /// `(TILE_SIZE, TILE_SIZE)`.
    pub fn size(&self) -> IVec2 {
        match self.bounds() {
            Some((lo, hi)) => coords::sub(hi, lo) + IVec2::splat(TILE_SIZE),
            None => IVec2::ZERO,
        }
    }

    /// Tile coordinates covered, row by row for rectangles.
    pub fn tiles(&self) -> Vec<IVec2> {
        match self {
            Extent::Rect { start, end } => {
                let lo = coords::to_tile(start.min(*end));
                let hi = coords::to_tile(start.max(*end));
                (lo.y..=hi.y)
                    .flat_map(|y| (lo.x..=hi.x).map(move |x| IVec2::new(x, y)))
                    .collect()
            }
            Extent::Tiles(tiles) => {
                let unique: BTreeSet<(i32, i32)> = tiles
                    .iter()
                    .map(|t| {
                        let tile = coords::to_tile(*t);
                        (tile.x, tile.y)
                    })
                    .collect();
                unique.into_iter().map(|(x, y)| IVec2::new(x, y)).collect()
            }
        }
    }

    pub fn translate(&self, delta: IVec2) -> Self {
        self.map(|p| coords::add(p, delta))
    }

    /// Apply a point map to every corner or tile. Rectangles are
    /// re-normalized afterwards.
    pub fn map(&self, f: impl Fn(IVec2) -> IVec2) -> Self {
        match self {
            Extent::Rect { start, end } => Extent::rect(f(*start), f(*end)),
            Extent::Tiles(tiles) => Extent::Tiles(tiles.iter().map(|t| f(*t)).collect()),
        }
    }
}

// =============================================================================
// Template
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Positions relative to the captured footprint.
    pub elements: Vec<Element>,
    /// Fixed at capture time; filtering never shrinks it.
    pub extent: Extent,
    /// Surface height under the footprint origin when captured.
    pub surface_height: i32,
}

impl Template {
    pub fn new(elements: Vec<Element>, extent: Extent, surface_height: i32) -> Self {
        Self {
            elements,
            extent,
            surface_height,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn size(&self) -> IVec2 {
        self.extent.size()
    }

    pub fn filter(&self, predicate: impl Fn(&Element) -> bool) -> Template {
        Template {
            elements: self
                .elements
                .iter()
                .filter(|e| predicate(e))
                .cloned()
                .collect(),
            extent: self.extent.clone(),
            surface_height: self.surface_height,
        }
    }

    pub fn filter_kinds(&self, filter: &ElementFilter) -> Template {
        self.filter(|e| filter.allows_element(e))
    }

    pub fn translate(&self, delta: IVec3) -> Template {
        Template {
            elements: self
                .elements
                .iter()
                .map(|e| transform::translate(e, delta))
                .collect(),
            extent: self.extent.translate(delta.truncate()),
            surface_height: self.surface_height,
        }
    }

    /// Rotate by `steps` quarter turns. The size becomes `(size.y, size.x)`
    /// for odd steps.
    pub fn rotate(&self, steps: u8, objects: &dyn ObjectResolver) -> Template {
        let mut out = self.clone();
        for _ in 0..(steps & 3) {
            let size = out.size();
            out = Template {
                elements: out
                    .elements
                    .iter()
                    .map(|e| transform::rotate(e, 1, size, objects))
                    .collect(),
                extent: out
                    .extent
                    .map(|p| transform::rotate_position(p, size)),
                surface_height: out.surface_height,
            };
        }
        out
    }

    pub fn mirror(&self, mirrored: bool, objects: &dyn ObjectResolver) -> Template {
        if !mirrored {
            return self.clone();
        }
        let size = self.size();
        Template {
            elements: self
                .elements
                .iter()
                .map(|e| transform::mirror(e, size, objects))
                .collect(),
            extent: self.extent.map(|p| transform::mirror_position(p, size)),
            surface_height: self.surface_height,
        }
    }

    /// Drop elements whose object is not loaded right now.
    pub fn filter_available(&self, objects: &dyn ObjectResolver) -> Template {
        self.filter(|e| is_loaded(e, objects))
    }

    /// Distinct qualifiers that do not resolve, sorted.
    pub fn missing_objects(&self, objects: &dyn ObjectResolver) -> Vec<String> {
        let missing: BTreeSet<&str> = self
            .elements
            .iter()
            .filter(|e| !is_loaded(e, objects))
            .map(|e| e.qualifier())
            .collect();
        missing.into_iter().map(str::to_string).collect()
    }

    /// Copy every element inside `selection` off the map.
    ///
    /// A rectangular selection yields the bounding box of the captured
    /// elements; a tile-list selection yields the tiles that held one.
    /// Positions are stored relative to that footprint's origin.
    pub fn capture(
        map: &dyn MapService,
        selection: Option<&Extent>,
        objects: &dyn ObjectResolver,
        filter: &ElementFilter,
    ) -> Result<Template, TemplateError> {
        let selection = match selection {
            Some(s) if !s.is_empty() => s,
            _ => return Err(TemplateError::EmptySelection),
        };

        let mut elements = Vec::new();
        let mut dropped = 0usize;
        for tile in selection.tiles() {
            let at = coords::to_world(tile);
            for raw in map.tile_elements(tile) {
                for decoded in codec::decode(&raw, at, objects) {
                    match decoded {
                        Ok(element) if filter.allows_element(&element) => elements.push(element),
                        Ok(_) => {}
                        Err(err) => {
                            dropped += 1;
                            warn!("Template capture: skipping element at {at}: {err}");
                        }
                    }
                }
            }
        }
        if elements.is_empty() {
            return Err(TemplateError::NothingToCopy);
        }

        let positions: Vec<IVec2> = elements.iter().map(|e| IVec2::new(e.x, e.y)).collect();
        let extent = match selection {
            Extent::Rect { .. } => {
                let lo = positions.iter().copied().fold(positions[0], IVec2::min);
                let hi = positions.iter().copied().fold(positions[0], IVec2::max);
                Extent::Rect { start: lo, end: hi }
            }
            Extent::Tiles(_) => {
                let unique: BTreeSet<(i32, i32)> =
                    positions.iter().map(|p| (p.x, p.y)).collect();
                Extent::Tiles(unique.into_iter().map(|(x, y)| IVec2::new(x, y)).collect())
            }
        };
        let origin = extent.origin().unwrap_or(IVec2::ZERO);
        let lowest = elements.iter().map(|e| e.z).min().unwrap_or(0);
        let reference = surface_height(map, coords::to_tile(origin)).unwrap_or(lowest);

        let template = Template::new(elements, extent, reference)
            .translate(IVec3::new(-origin.x, -origin.y, 0));
        let size = coords::to_tile(template.size());
        info!(
            "Template captured: {} elements, {}x{} tiles, {} skipped",
            template.len(),
            size.x,
            size.y,
            dropped
        );
        Ok(template)
    }
}

fn is_loaded(element: &Element, objects: &dyn ObjectResolver) -> bool {
    objects.is_available(ObjectKind::from(element.element_type()), element.qualifier())
}
