//! In-memory host double shared by the builder tests.
//!
//! One `FakeWorld` sits behind an `Rc<RefCell<..>>` so the same state can be
//! handed to the builder as map, action and tool service while the test keeps
//! a handle for assertions. Callbacks fire synchronously unless `deferred` is
//! set, in which case they wait for [`FakeHost::release`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use bevy::math::IVec2;

use scenery::codec::{ActionOp, PlacementAction, RawElement};
use scenery::element::{SmallScenery, Wall};
use scenery::host::{
    ActionCallback, ActionResult, ActionService, MapService, ToolActivation, ToolService,
};
use scenery::{
    Element, ElementKind, ElementType, Extent, ObjectIndex, ObjectKind, SceneryShape, Template,
};

use crate::placement::HostServices;

pub const QUARTER: &str = "rct2.scenery_small.tl0";
pub const WALL: &str = "rct2.scenery_wall.wallbr32";

/// Error code the fake host reports for rejected actions.
pub const REJECTED: u32 = 1;

#[derive(Default)]
pub struct FakeWorld {
    pub tiles: HashMap<(i32, i32), Vec<RawElement>>,
    pub selection: Option<Extent>,
    pub queries: Vec<PlacementAction>,
    pub executed: Vec<PlacementAction>,
    /// Ghost placements currently on the map.
    pub live_ghosts: Vec<PlacementAction>,
    /// Real placements on the map.
    pub placed: Vec<PlacementAction>,
    /// Positions whose place queries fail.
    pub reject_query_at: Vec<(i32, i32)>,
    pub deferred: bool,
    pub pending: Vec<(ActionResult, ActionCallback)>,
    pub activations: Vec<ToolActivation>,
    pub cancels: u32,
}

impl FakeWorld {
    fn apply(&mut self, action: &PlacementAction) {
        let args = &action.args;
        match (action.kind.op, args.ghost) {
            (ActionOp::Place, true) => self.live_ghosts.push(action.clone()),
            (ActionOp::Place, false) => self.placed.push(action.clone()),
            (ActionOp::Remove, _) => {
                let found = self.live_ghosts.iter().position(|g| {
                    g.kind.target == action.kind.target
                        && (g.args.x, g.args.y, g.args.z) == (args.x, args.y, args.z)
                });
                if let Some(i) = found {
                    self.live_ghosts.remove(i);
                }
            }
        }
    }

    /// Removal actions issued so far.
    pub fn removals(&self) -> Vec<&PlacementAction> {
        self.executed
            .iter()
            .filter(|a| a.kind.op == ActionOp::Remove)
            .collect()
    }

    pub fn placements(&self) -> Vec<&PlacementAction> {
        self.executed
            .iter()
            .filter(|a| a.kind.op == ActionOp::Place)
            .collect()
    }
}

#[derive(Clone, Default)]
pub struct FakeHost(pub Rc<RefCell<FakeWorld>>);

impl FakeHost {
    pub fn services(&self) -> HostServices {
        HostServices {
            map: Box::new(self.clone()),
            actions: Box::new(self.clone()),
            tools: Box::new(self.clone()),
        }
    }

    pub fn world(&self) -> std::cell::Ref<'_, FakeWorld> {
        self.0.borrow()
    }

    pub fn world_mut(&self) -> std::cell::RefMut<'_, FakeWorld> {
        self.0.borrow_mut()
    }

    /// Fire every deferred callback queued so far. Returns how many fired.
    pub fn release(&self) -> usize {
        let pending = std::mem::take(&mut self.0.borrow_mut().pending);
        let fired = pending.len();
        for (result, done) in pending {
            done(result);
        }
        fired
    }

    fn answer(&self, result: ActionResult, done: ActionCallback) {
        let deferred = self.0.borrow().deferred;
        if deferred {
            self.0.borrow_mut().pending.push((result, done));
        } else {
            done(result);
        }
    }
}

impl MapService for FakeHost {
    fn tile_elements(&self, tile: IVec2) -> Vec<RawElement> {
        self.0
            .borrow()
            .tiles
            .get(&(tile.x, tile.y))
            .cloned()
            .unwrap_or_default()
    }

    fn tile_selection(&self) -> Option<Extent> {
        self.0.borrow().selection.clone()
    }

    fn set_tile_selection(&mut self, selection: Option<Extent>) {
        self.0.borrow_mut().selection = selection;
    }
}

impl ActionService for FakeHost {
    fn query(&mut self, action: &PlacementAction, done: ActionCallback) {
        let result = {
            let mut world = self.0.borrow_mut();
            world.queries.push(action.clone());
            if world
                .reject_query_at
                .contains(&(action.args.x, action.args.y))
            {
                ActionResult::rejected(REJECTED, "Not enough room")
            } else {
                ActionResult::ok()
            }
        };
        self.answer(result, done);
    }

    fn execute(&mut self, action: &PlacementAction, done: ActionCallback) {
        {
            let mut world = self.0.borrow_mut();
            world.executed.push(action.clone());
            world.apply(action);
        }
        self.answer(ActionResult::ok(), done);
    }
}

impl ToolService for FakeHost {
    fn activate(&mut self, activation: ToolActivation) {
        self.0.borrow_mut().activations.push(activation);
    }

    fn cancel(&mut self) {
        self.0.borrow_mut().cancels += 1;
    }
}

pub fn objects() -> Rc<ObjectIndex> {
    Rc::new(
        ObjectIndex::new()
            .with(ObjectKind::SmallScenery, 0, QUARTER, SceneryShape::QUARTER)
            .with(ObjectKind::Wall, 0, WALL, SceneryShape::default()),
    )
}

pub fn scenery(x: i32, y: i32, quadrant: u8) -> Element {
    Element::new(
        x,
        y,
        16,
        ElementKind::SmallScenery(SmallScenery {
            qualifier: QUARTER.to_string(),
            direction: 0,
            quadrant,
            primary_colour: 0,
            secondary_colour: 0,
            tertiary_colour: 0,
        }),
    )
}

pub fn wall(x: i32, y: i32, edge: u8) -> Element {
    Element::new(
        x,
        y,
        16,
        ElementKind::Wall(Wall {
            qualifier: WALL.to_string(),
            edge,
            primary_colour: 0,
            secondary_colour: 0,
            tertiary_colour: 0,
        }),
    )
}

/// 2x2 tiles, one quarter-tile scenery per tile, surface height 16.
pub fn template_2x2() -> Template {
    Template::new(
        vec![
            scenery(0, 0, 0),
            scenery(32, 0, 0),
            scenery(0, 32, 0),
            scenery(32, 32, 0),
        ],
        Extent::rect(IVec2::ZERO, IVec2::new(32, 32)),
        16,
    )
}

pub fn count_of<'a>(
    actions: impl IntoIterator<Item = &'a PlacementAction>,
    target: ElementType,
) -> usize {
    actions
        .into_iter()
        .filter(|a| a.kind.target == target)
        .count()
}
