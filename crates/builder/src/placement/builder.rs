//! `PlacementBuilder`: ghost preview, commit and completion reconciliation.

use std::cell::RefCell;
use std::mem;
use std::rc::Rc;

use bevy::prelude::*;

use scenery::codec::{encode_place, encode_remove, PlacementAction};
use scenery::config::{FLOOR_Z, Z_STEP};
use scenery::coords;
use scenery::host::{
    surface_height, ActionCallback, ActionResult, ActionService, CursorHint, MapService,
    ToolActivation, ToolService,
};
use scenery::{Element, Extent, ObjectResolver, Template};

use crate::error::BuilderError;
use crate::settings::{BuildMode, BuilderSettings, DragMode};

use super::drag::DragState;

/// Tool id passed to the host on activation.
pub const TOOL_ID: &str = "scenery-template-builder";

// =============================================================================
// Public types
// =============================================================================

/// The host services a builder talks to.
pub struct HostServices {
    pub map: Box<dyn MapService>,
    pub actions: Box<dyn ActionService>,
    pub tools: Box<dyn ToolService>,
}

/// Pointer position delivered with tool events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    /// World position under the pointer; `None` when off the map.
    pub world: Option<IVec2>,
    /// Screen position in pixels.
    pub screen: IVec2,
}

impl PointerEvent {
    pub fn at(world: IVec2, screen: IVec2) -> Self {
        Self {
            world: Some(world),
            screen,
        }
    }

    pub fn off_map(screen: IVec2) -> Self {
        Self {
            world: None,
            screen,
        }
    }
}

/// Outcome counts of one real (non-ghost) build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub submitted: u32,
    pub placed: u32,
    pub rejected: u32,
}

impl BuildReport {
    /// Every submitted element has reported back.
    pub fn is_complete(&self) -> bool {
        self.placed + self.rejected >= self.submitted
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Previewing,
    /// A real build is waiting for host results.
    Committing,
}

// =============================================================================
// Internal state
// =============================================================================

#[derive(Debug)]
struct Session {
    phase: Phase,
    /// Snapped world position of the build origin.
    pointer: Option<IVec2>,
    /// Ghost elements the host has confirmed, in placement order.
    ghost: Vec<Element>,
    /// Tile selection shown before the session started.
    saved_selection: Option<Extent>,
    drag: DragState,
}

#[derive(Debug)]
enum State {
    Idle,
    Active(Session),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Query,
    Execute,
}

/// A host result waiting to be reconciled by [`PlacementBuilder::pump`].
struct Completion {
    generation: u64,
    ghost: bool,
    stage: Stage,
    element: Element,
    action: PlacementAction,
    result: ActionResult,
}

type Inbox = Rc<RefCell<Vec<Completion>>>;

#[derive(Debug, Clone, Copy)]
struct Commit {
    generation: u64,
    report: BuildReport,
    /// Set once the completed report has been handed out.
    done: bool,
}

// =============================================================================
// PlacementBuilder
// =============================================================================

pub struct PlacementBuilder {
    host: HostServices,
    objects: Rc<dyn ObjectResolver>,
    settings: BuilderSettings,
    template: Option<Template>,
    state: State,
    inbox: Inbox,
    /// Bumped whenever the ghost is torn down; completions from older
    /// generations are stale.
    generation: u64,
    commit: Option<Commit>,
    /// Report of a commit that completed since the last
    /// [`PlacementBuilder::take_completed_report`].
    completed: Option<BuildReport>,
}

impl PlacementBuilder {
    pub fn new(
        host: HostServices,
        objects: Rc<dyn ObjectResolver>,
        settings: BuilderSettings,
    ) -> Self {
        Self {
            host,
            objects,
            settings,
            template: None,
            state: State::Idle,
            inbox: Rc::new(RefCell::new(Vec::new())),
            generation: 0,
            commit: None,
            completed: None,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn settings(&self) -> &BuilderSettings {
        &self.settings
    }

    pub fn template(&self) -> Option<&Template> {
        self.template.as_ref()
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, State::Active(_))
    }

    pub fn phase(&self) -> Option<Phase> {
        match &self.state {
            State::Active(session) => Some(session.phase),
            State::Idle => None,
        }
    }

    /// Ghost elements currently on the map.
    pub fn ghost(&self) -> &[Element] {
        match &self.state {
            State::Active(session) => session.ghost.as_slice(),
            State::Idle => &[],
        }
    }

    /// Report of the most recent real build, complete or not.
    pub fn last_report(&self) -> Option<BuildReport> {
        self.commit.map(|c| c.report)
    }

    pub fn take_completed_report(&mut self) -> Option<BuildReport> {
        self.completed.take()
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    /// Replace the template being placed. Rebuilds the preview when active.
    pub fn set_template(&mut self, template: Option<Template>) {
        self.template = template;
        self.rebuild();
    }

    /// Apply a new settings snapshot. Rebuilds the preview when active and
    /// something changed.
    pub fn update_settings(&mut self, settings: BuilderSettings) {
        if settings == self.settings {
            return;
        }
        self.settings = settings;
        self.rebuild();
    }

    /// Ask the host to activate the placement tool.
    pub fn activate(&mut self) -> Result<(), BuilderError> {
        if self.template.is_none() {
            return Err(BuilderError::EmptyClipboard);
        }
        self.host.tools.activate(ToolActivation {
            id: TOOL_ID,
            cursor: CursorHint::Crosshair,
            filter: None,
        });
        Ok(())
    }

    /// Ask the host to finish the tool, and finish the session right away.
    pub fn cancel(&mut self) {
        if !self.is_active() {
            return;
        }
        self.host.tools.cancel();
        self.on_finish();
    }

    // -------------------------------------------------------------------------
    // Tool events
    // -------------------------------------------------------------------------

    pub fn on_start(&mut self) {
        if self.is_active() {
            return;
        }
        let saved_selection = self.host.map.tile_selection();
        self.state = State::Active(Session {
            phase: Phase::Previewing,
            pointer: None,
            ghost: Vec::new(),
            saved_selection,
            drag: DragState::default(),
        });
        info!("Template builder: session started");
    }

    pub fn on_down(&mut self, event: PointerEvent) {
        let State::Active(session) = &mut self.state else {
            return;
        };
        let Some(world) = event.world else {
            return;
        };
        session.drag.begin(event.screen);
        let snapped = coords::round(world);
        if session.pointer != Some(snapped) {
            session.pointer = Some(snapped);
            self.rebuild();
        }
    }

    pub fn on_move(&mut self, event: PointerEvent) {
        let control = self.settings.drag;
        let State::Active(session) = &mut self.state else {
            return;
        };
        if session.drag.is_dragging() && control.mode != DragMode::None {
            // The build stays anchored while a drag adjusts it.
            if session.drag.update(event.screen, &control) {
                self.rebuild();
            }
            return;
        }
        let snapped = event.world.map(coords::round);
        if snapped == session.pointer {
            return;
        }
        session.pointer = snapped;
        self.rebuild();
    }

    pub fn on_up(&mut self, _event: PointerEvent) {
        if !self.is_active() {
            return;
        }
        self.build(false);
        if let State::Active(session) = &mut self.state {
            session.drag.end();
        }
    }

    pub fn on_finish(&mut self) {
        let State::Active(session) = mem::replace(&mut self.state, State::Idle) else {
            return;
        };
        self.generation += 1;
        self.remove_elements(&session.ghost);
        self.host.map.set_tile_selection(session.saved_selection);
        info!(
            "Template builder: session finished, {} ghost elements removed",
            session.ghost.len()
        );
    }

    /// Commit a real build at the current pointer position.
    pub fn commit(&mut self) -> Result<(), BuilderError> {
        if !self.is_active() {
            return Err(BuilderError::NotActive);
        }
        if self.template.is_none() {
            return Err(BuilderError::EmptyClipboard);
        }
        self.build(false);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Build
    // -------------------------------------------------------------------------

    fn rebuild(&mut self) {
        self.build(true);
    }

    /// Tear down the ghost, then submit the template at the pointer, either
    /// as a new ghost or as a real build.
    fn build(&mut self, ghost: bool) {
        let (old_ghost, pointer, drag) = match &mut self.state {
            State::Active(session) => (mem::take(&mut session.ghost), session.pointer, session.drag),
            State::Idle => return,
        };
        self.generation += 1;
        self.remove_elements(&old_ghost);

        let Some(pointer) = pointer else {
            self.host.map.set_tile_selection(None);
            return;
        };
        let Some(template) = self.template.as_ref() else {
            return;
        };
        let placed = self.prepare(template, pointer, drag);
        self.host
            .map
            .set_tile_selection(Some(placed.extent.clone()));
        if ghost && !self.settings.show_ghost {
            return;
        }

        if !ghost {
            self.commit = Some(Commit {
                generation: self.generation,
                report: BuildReport {
                    submitted: placed.len() as u32,
                    ..Default::default()
                },
                done: false,
            });
            if let State::Active(session) = &mut self.state {
                session.phase = Phase::Committing;
            }
            info!(
                "Template builder: committing {} elements at {}",
                placed.len(),
                pointer
            );
        }
        for element in placed.elements {
            self.submit(element, ghost);
        }
        self.finish_commit_if_complete();
    }

    /// Filter, mirror, rotate and move the template onto `pointer`.
    fn prepare(&self, template: &Template, pointer: IVec2, drag: DragState) -> Template {
        let objects = self.objects.as_ref();
        let settings = &self.settings;
        let rotation = settings.rotation.wrapping_add(drag.rotation_steps()) & 3;
        let shaped = template
            .filter_kinds(&settings.filter)
            .mirror(settings.mirrored, objects)
            .rotate(rotation, objects);

        let origin = shaped.extent.origin().unwrap_or(IVec2::ZERO);
        let offset = coords::sub(pointer, origin);
        let target_height = surface_height(self.host.map.as_ref(), coords::to_tile(pointer))
            .unwrap_or(shaped.surface_height);
        let dz = target_height - shaped.surface_height
            + settings.height_offset
            + drag.height_steps() * Z_STEP;
        shaped
            .translate(IVec3::new(offset.x, offset.y, dz))
            .filter(|e| e.z >= FLOOR_Z)
    }

    fn submit(&mut self, element: Element, ghost: bool) {
        let action = match encode_place(&element, self.objects.as_ref(), ghost) {
            Ok(action) => action,
            Err(err) => {
                debug!("Template builder: skipping element: {err}");
                if !ghost {
                    self.count_commit(self.generation, |r| r.rejected += 1);
                }
                return;
            }
        };
        match self.settings.mode {
            BuildMode::Safe => {
                let done = self.completion(ghost, Stage::Query, element, action.clone());
                self.host.actions.query(&action, done);
            }
            BuildMode::Raw => {
                let mut action = action;
                action.args.force = true;
                let done = self.completion(ghost, Stage::Execute, element, action.clone());
                self.host.actions.execute(&action, done);
            }
        }
    }

    /// Callback that queues the host's answer for [`PlacementBuilder::pump`].
    fn completion(
        &self,
        ghost: bool,
        stage: Stage,
        element: Element,
        action: PlacementAction,
    ) -> ActionCallback {
        let inbox = Rc::clone(&self.inbox);
        let generation = self.generation;
        Box::new(move |result| {
            inbox.borrow_mut().push(Completion {
                generation,
                ghost,
                stage,
                element,
                action,
                result,
            });
        })
    }

    /// Best-effort removal, newest first. Results are ignored.
    fn remove_elements(&mut self, elements: &[Element]) {
        for element in elements.iter().rev() {
            self.remove_element(element);
        }
    }

    fn remove_element(&mut self, element: &Element) {
        match encode_remove(element, self.objects.as_ref(), true) {
            Ok(action) => self
                .host
                .actions
                .execute(&action, Box::new(|_: ActionResult| {})),
            Err(err) => debug!("Template builder: cannot remove ghost element: {err}"),
        }
    }

    // -------------------------------------------------------------------------
    // Completions
    // -------------------------------------------------------------------------

    /// Reconcile queued host results. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        loop {
            let batch = mem::take(&mut *self.inbox.borrow_mut());
            if batch.is_empty() {
                break;
            }
            for completion in batch {
                self.complete(completion);
                handled += 1;
            }
        }
        self.finish_commit_if_complete();
        handled
    }

    fn complete(&mut self, c: Completion) {
        let current = c.generation == self.generation;
        if !c.result.is_success() {
            debug!(
                "Template builder: {} rejected at ({}, {}, {}): error {} {}",
                c.action.kind.name(),
                c.element.x,
                c.element.y,
                c.element.z,
                c.result.error,
                c.result.message.as_deref().unwrap_or("")
            );
            if !c.ghost {
                self.count_commit(c.generation, |r| r.rejected += 1);
            }
            return;
        }

        match c.stage {
            Stage::Query => {
                if c.ghost && !current {
                    debug!("Template builder: dropping stale ghost query");
                    return;
                }
                let inbox = Rc::clone(&self.inbox);
                let Completion {
                    generation,
                    ghost,
                    element,
                    action,
                    ..
                } = c;
                let next = action.clone();
                let done: ActionCallback = Box::new(move |result| {
                    inbox.borrow_mut().push(Completion {
                        generation,
                        ghost,
                        stage: Stage::Execute,
                        element,
                        action,
                        result,
                    });
                });
                self.host.actions.execute(&next, done);
            }
            Stage::Execute if !c.ghost => {
                self.count_commit(c.generation, |r| r.placed += 1);
            }
            Stage::Execute => {
                if current {
                    if let State::Active(session) = &mut self.state {
                        session.ghost.push(c.element);
                        return;
                    }
                }
                debug!("Template builder: removing stale ghost element");
                self.remove_element(&c.element);
            }
        }
    }

    fn count_commit(&mut self, generation: u64, update: impl FnOnce(&mut BuildReport)) {
        if let Some(commit) = self.commit.as_mut() {
            if commit.generation == generation {
                update(&mut commit.report);
            }
        }
    }

    /// Publish the report of a real build once every element has answered.
    /// Also runs after the session has finished.
    fn finish_commit_if_complete(&mut self) {
        let Some(commit) = self.commit.as_mut() else {
            return;
        };
        if commit.done || !commit.report.is_complete() {
            return;
        }
        commit.done = true;
        let report = commit.report;
        if let State::Active(session) = &mut self.state {
            if session.phase == Phase::Committing {
                session.phase = Phase::Previewing;
            }
        }
        info!(
            "Template builder: build finished, {}/{} placed, {} rejected",
            report.placed, report.submitted, report.rejected
        );
        self.completed = Some(report);
    }
}
