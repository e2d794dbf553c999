use bevy::prelude::*;
use bevy::transform::TransformSystem;

use super::events::*;
use super::host::SlotTracker;
use super::settings::PlacementSettings;
use super::systems::{
    attachments::{
        apply_pending_poses, despawn_placeables, follow_anchor_bindings, hold_fixed_joints,
        sweep_orphaned_attachments,
    },
    binding::bind_placeables,
    grab::{apply_grab_signals, apply_ownership_grants, forward_grab_requests},
    notifications::log_slot_notifications,
    ownership::propagate_ownership_requests,
    triggers::{apply_trigger_events, detect_trigger_overlaps},
};

/// Ordering of the placement systems within a frame.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlacementSet {
    /// Sensor/trigger overlap tests.
    Detect,
    /// Trigger, grab and ownership events into each placer.
    Apply,
    /// Snap poses and follow joints/anchors, before transform propagation.
    Attach,
    /// Bind new placeables and sweep stale attachments, after propagation.
    Bind,
}

pub struct PlacementPlugin;

impl Plugin for PlacementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlacementSettings>()
            .init_resource::<SlotTracker>()
            .add_event::<TriggerEvent>()
            .add_event::<GrabSignal>()
            .add_event::<OwnershipGranted>()
            .add_event::<GrabOwnershipRequest>()
            .add_event::<RequestAttachedOwnership>()
            .add_event::<OwnershipRequest>()
            .add_event::<SlotNotificationEvent>()
            .add_event::<DespawnPlaceable>()
            .configure_sets(Update, (PlacementSet::Detect, PlacementSet::Apply).chain())
            .configure_sets(
                PostUpdate,
                (
                    PlacementSet::Attach.before(TransformSystem::TransformPropagate),
                    PlacementSet::Bind.after(TransformSystem::TransformPropagate),
                ),
            )
            .add_systems(
                Update,
                detect_trigger_overlaps.in_set(PlacementSet::Detect),
            )
            .add_systems(
                Update,
                (
                    apply_trigger_events,
                    apply_grab_signals,
                    apply_ownership_grants,
                    despawn_placeables,
                    forward_grab_requests,
                    propagate_ownership_requests,
                    log_slot_notifications,
                )
                    .chain()
                    .in_set(PlacementSet::Apply),
            )
            .add_systems(
                PostUpdate,
                (
                    apply_pending_poses,
                    (hold_fixed_joints, follow_anchor_bindings),
                )
                    .chain()
                    .in_set(PlacementSet::Attach),
            )
            .add_systems(
                PostUpdate,
                (bind_placeables, sweep_orphaned_attachments).in_set(PlacementSet::Bind),
            );

        info!("Placement plugin initialised");
    }
}
