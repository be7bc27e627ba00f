//! Bevy glue: forwards tool events and settings changes to the builder and
//! pumps its completion inbox once per frame.
//!
//! The builder talks to single-threaded host services, so the host inserts
//! it as a non-send resource:
//!
//! ```ignore
//! app.add_plugins(BuilderPlugin)
//!     .insert_non_send_resource(PlacementBuilder::new(host, objects, settings));
//! ```

use bevy::prelude::*;

use crate::clipboard::Clipboard;
use crate::placement::{BuildReport, PlacementBuilder, PointerEvent};
use crate::settings::BuilderSettings;

// =============================================================================
// Events
// =============================================================================

/// Tool lifecycle events delivered by the host while the builder's tool is
/// active.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolEvent {
    Start,
    Down(PointerEvent),
    Move(PointerEvent),
    Up(PointerEvent),
    Finish,
}

/// Sent once every submitted element of a real build has reported back.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildCompleted(pub BuildReport);

// =============================================================================
// Systems
// =============================================================================

fn forward_settings(
    settings: Res<BuilderSettings>,
    builder: Option<NonSendMut<PlacementBuilder>>,
) {
    let Some(mut builder) = builder else {
        return;
    };
    if settings.is_changed() {
        builder.update_settings(settings.clone());
    }
}

fn forward_tool_events(
    mut events: EventReader<ToolEvent>,
    builder: Option<NonSendMut<PlacementBuilder>>,
) {
    let Some(mut builder) = builder else {
        events.clear();
        return;
    };
    for event in events.read() {
        match *event {
            ToolEvent::Start => builder.on_start(),
            ToolEvent::Down(pointer) => builder.on_down(pointer),
            ToolEvent::Move(pointer) => builder.on_move(pointer),
            ToolEvent::Up(pointer) => builder.on_up(pointer),
            ToolEvent::Finish => builder.on_finish(),
        }
    }
}

fn pump_completions(
    builder: Option<NonSendMut<PlacementBuilder>>,
    mut completed: EventWriter<BuildCompleted>,
) {
    let Some(mut builder) = builder else {
        return;
    };
    builder.pump();
    if let Some(report) = builder.take_completed_report() {
        completed.send(BuildCompleted(report));
    }
}

// =============================================================================
// Plugin
// =============================================================================

pub struct BuilderPlugin;

impl Plugin for BuilderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BuilderSettings>()
            .init_resource::<Clipboard>()
            .add_event::<ToolEvent>()
            .add_event::<BuildCompleted>()
            .add_systems(
                Update,
                (forward_settings, forward_tool_events, pump_completions).chain(),
            );
    }
}
