use bevy::prelude::*;

use crate::engine::components::{Placeable, Sleeping};
use crate::engine::events::{
    GrabOwnershipRequest, GrabSignal, OwnershipGranted, RequestAttachedOwnership,
    SlotNotificationEvent,
};
use crate::engine::host::{EcsPlacementHost, SlotTracker};

pub fn apply_grab_signals(
    mut signals: EventReader<GrabSignal>,
    mut placeables: Query<&mut Placeable>,
    mut commands: Commands,
    mut notifications: EventWriter<SlotNotificationEvent>,
    mut tracker: ResMut<SlotTracker>,
) {
    for signal in signals.read() {
        let Ok(mut placeable) = placeables.get_mut(signal.object) else {
            warn!("Grab signal for {} which is not placeable", signal.object);
            continue;
        };
        let Some((placer, gate)) = placeable.parts_mut() else {
            debug!("Grab signal for {} before its slots were bound", signal.object);
            continue;
        };

        // A grabbed body is awake again.
        if signal.grabbed {
            commands.entity(signal.object).remove::<Sleeping>();
        }
        let mut host = EcsPlacementHost::new(
            &mut commands,
            &mut notifications,
            &mut tracker,
            signal.object,
        );
        gate.signal(signal.grabbed, placer, &mut host);
    }
}

pub fn apply_ownership_grants(
    mut grants: EventReader<OwnershipGranted>,
    mut placeables: Query<&mut Placeable>,
    mut commands: Commands,
    mut notifications: EventWriter<SlotNotificationEvent>,
    mut tracker: ResMut<SlotTracker>,
) {
    for grant in grants.read() {
        let Ok(mut placeable) = placeables.get_mut(grant.object) else {
            continue;
        };
        let Some((placer, gate)) = placeable.parts_mut() else {
            continue;
        };
        let mut host = EcsPlacementHost::new(
            &mut commands,
            &mut notifications,
            &mut tracker,
            grant.object,
        );
        gate.ownership_granted(placer, &mut host);
    }
}

// Hand queued replicated grab requests to whatever networking layer listens.
pub fn forward_grab_requests(
    placeables: Query<(Entity, &Placeable)>,
    mut requests: EventWriter<GrabOwnershipRequest>,
    mut chains: EventWriter<RequestAttachedOwnership>,
) {
    for (object, placeable) in &placeables {
        let Some(queue) = placeable.requests() else {
            continue;
        };
        for grabbed in queue.drain() {
            requests.write(GrabOwnershipRequest { object, grabbed });
            // Moving the object also moves whatever is placed on it.
            if grabbed {
                chains.write(RequestAttachedOwnership { root: object });
            }
        }
    }
}
