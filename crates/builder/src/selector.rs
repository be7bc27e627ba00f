//! Region selector: press to anchor a corner, drag to extend, release to
//! finalize. The rectangle is mirrored into the host's tile-selection
//! highlight while the drag is in progress.

use bevy::prelude::*;

use scenery::coords;
use scenery::host::MapService;
use scenery::Extent;

use crate::placement::PointerEvent;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RegionSelector {
    /// Tile origin where the drag started.
    anchor: Option<IVec2>,
    /// Last finalized selection.
    selection: Option<Extent>,
}

impl RegionSelector {
    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn selection(&self) -> Option<&Extent> {
        self.selection.as_ref()
    }

    pub fn on_down(&mut self, map: &mut dyn MapService, event: PointerEvent) {
        let Some(world) = event.world else {
            return;
        };
        let anchor = coords::round(world);
        self.anchor = Some(anchor);
        map.set_tile_selection(Some(Extent::rect(anchor, anchor)));
    }

    /// Extend the highlighted rectangle to the pointer. Off-map positions
    /// keep the last rectangle.
    pub fn on_move(&mut self, map: &mut dyn MapService, event: PointerEvent) {
        let (Some(anchor), Some(world)) = (self.anchor, event.world) else {
            return;
        };
        map.set_tile_selection(Some(Extent::rect(anchor, coords::round(world))));
    }

    /// Finalize the drag. Returns the selected rectangle, which stays
    /// highlighted.
    pub fn on_up(&mut self, map: &mut dyn MapService, event: PointerEvent) -> Option<Extent> {
        let anchor = self.anchor.take()?;
        let selection = match event.world {
            Some(world) => Extent::rect(anchor, coords::round(world)),
            None => map
                .tile_selection()
                .unwrap_or_else(|| Extent::rect(anchor, anchor)),
        };
        map.set_tile_selection(Some(selection.clone()));
        let size = selection.size();
        info!(
            "Region selected: {}x{} tiles",
            size.x / scenery::config::TILE_SIZE,
            size.y / scenery::config::TILE_SIZE
        );
        self.selection = Some(selection.clone());
        Some(selection)
    }

    /// Drop the selection and clear the highlight.
    pub fn clear(&mut self, map: &mut dyn MapService) {
        self.anchor = None;
        self.selection = None;
        map.set_tile_selection(None);
    }
}
