use bevy::prelude::*;

use crate::engine::components::{
    AnchorBinding, FixedJoint, PendingPose, Placeable, SlotOccupant, TriggerDisabled,
};
use crate::engine::events::{DespawnPlaceable, SlotNotificationEvent};
use crate::engine::host::{EcsPlacementHost, SlotTracker};
use crate::placement::Pose;

pub fn apply_pending_poses(
    mut commands: Commands,
    mut bodies: Query<(Entity, &PendingPose, &mut Transform)>,
) {
    for (entity, pending, mut transform) in &mut bodies {
        pending.0.apply_to(&mut transform);
        commands.entity(entity).remove::<PendingPose>();
    }
}

// Keep each jointed body at the offset it had from its target when the joint
// was made.
pub fn hold_fixed_joints(
    mut joints: Query<&mut FixedJoint>,
    mut bodies: Query<&mut Transform, Without<FixedJoint>>,
    targets: Query<&GlobalTransform>,
) {
    for mut joint in &mut joints {
        let Ok(target_xf) = targets.get(joint.target).copied() else {
            continue;
        };
        let Ok(mut body) = bodies.get_mut(joint.body) else {
            continue;
        };
        let offset = match joint.offset {
            Some(offset) => offset,
            None => {
                let offset = GlobalTransform::from(*body).reparented_to(&target_xf);
                joint.offset = Some(offset);
                offset
            }
        };
        *body = target_xf.mul_transform(offset).compute_transform();
    }
}

pub fn follow_anchor_bindings(
    bindings: Query<&AnchorBinding>,
    anchors: Query<&GlobalTransform>,
    mut followers: Query<&mut Transform>,
) {
    for binding in &bindings {
        let Ok(anchor_xf) = anchors.get(binding.anchor) else {
            continue;
        };
        let Ok(mut follower) = followers.get_mut(binding.follower) else {
            continue;
        };
        Pose::from(anchor_xf).apply_to(&mut follower);
    }
}

// Placeables despawned without going through `DespawnPlaceable` leave their
// attachments, slot claims and hovered highlights behind; clean those up.
pub fn sweep_orphaned_attachments(
    mut commands: Commands,
    joints: Query<(Entity, &FixedJoint)>,
    anchors: Query<(Entity, &AnchorBinding)>,
    occupied: Query<(Entity, &SlotOccupant)>,
    placeables: Query<(), With<Placeable>>,
    mut tracker: ResMut<SlotTracker>,
) {
    for (joint, FixedJoint { body, .. }) in &joints {
        if !placeables.contains(*body) {
            warn!("Releasing joint {} left behind by {}", joint, body);
            commands.entity(joint).despawn();
        }
    }
    for (binding, AnchorBinding { follower, .. }) in &anchors {
        if !placeables.contains(*follower) {
            warn!("Releasing anchor binding {} left behind by {}", binding, follower);
            commands.entity(binding).despawn();
        }
    }
    for (slot, SlotOccupant(occupant)) in &occupied {
        if !placeables.contains(*occupant) {
            commands
                .entity(slot)
                .remove::<SlotOccupant>()
                .remove::<TriggerDisabled>();
        }
    }

    let (freed, unlit) = tracker.forget_missing(|object| placeables.contains(object));
    for slot in freed {
        if let Ok(mut slot) = commands.get_entity(slot) {
            slot.remove::<TriggerDisabled>();
        }
    }
    for highlight in unlit {
        if let Ok(mut highlight) = commands.get_entity(highlight) {
            highlight.insert(Visibility::Hidden);
        }
    }
}

pub fn despawn_placeables(
    mut requests: EventReader<DespawnPlaceable>,
    mut placeables: Query<&mut Placeable>,
    mut commands: Commands,
    mut notifications: EventWriter<SlotNotificationEvent>,
    mut tracker: ResMut<SlotTracker>,
) {
    for request in requests.read() {
        let Ok(mut placeable) = placeables.get_mut(request.object) else {
            continue;
        };
        if let Some((placer, _)) = placeable.parts_mut() {
            let mut host = EcsPlacementHost::new(
                &mut commands,
                &mut notifications,
                &mut tracker,
                request.object,
            );
            placer.teardown(&mut host);
        }
        commands.entity(request.object).despawn();
    }
}
