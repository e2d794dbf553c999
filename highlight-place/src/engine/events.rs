use bevy::prelude::*;

use crate::placement::SlotNotification;

/// A placeable's sensor started or stopped overlapping a slot trigger.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEvent {
    Entered { object: Entity, slot: Entity },
    Exited { object: Entity, slot: Entity },
}

/// Select/unselect from the grab source.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrabSignal {
    pub object: Entity,
    pub grabbed: bool,
}

/// Replication layer granted ownership of a replicated placeable.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnershipGranted {
    pub object: Entity,
}

/// Outgoing: a replicated placeable wants to apply a grab.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrabOwnershipRequest {
    pub object: Entity,
    pub grabbed: bool,
}

/// Request ownership of `root` and everything placed onto it.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestAttachedOwnership {
    pub root: Entity,
}

/// Outgoing: exclusive write ownership wanted for `object`.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnershipRequest {
    pub object: Entity,
}

/// Hover/unhover/place/remove fired on a slot by a placeable.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotNotificationEvent {
    pub object: Entity,
    pub slot: Entity,
    pub notification: SlotNotification,
}

/// Release a placeable's attachment and highlight, then despawn it.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DespawnPlaceable {
    pub object: Entity,
}
