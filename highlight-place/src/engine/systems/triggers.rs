use bevy::prelude::*;

use crate::engine::components::{Overlaps, Placeable, TriggerDisabled, TriggerSensor, TriggerVolume};
use crate::engine::events::{SlotNotificationEvent, TriggerEvent};
use crate::engine::host::{EcsPlacementHost, SlotTracker};

fn scaled_half_extents(transform: &GlobalTransform, half_extents: Vec3) -> Vec3 {
    half_extents * transform.compute_transform().scale.abs()
}

/// Axis-aligned box overlap test between two centred boxes.
pub fn boxes_overlap(a_center: Vec3, a_half: Vec3, b_center: Vec3, b_half: Vec3) -> bool {
    (a_center - b_center).abs().cmple(a_half + b_half).all()
}

// Trigger source: diff each sensor's overlaps against last frame and emit
// exits before enters, both in a stable order.
pub fn detect_trigger_overlaps(
    mut sensors: Query<(Entity, &GlobalTransform, &TriggerSensor, &mut Overlaps, &Placeable)>,
    volumes: Query<(Entity, &GlobalTransform, &TriggerVolume), Without<TriggerDisabled>>,
    mut events: EventWriter<TriggerEvent>,
) {
    for (object, sensor_xf, sensor, mut overlaps, placeable) in &mut sensors {
        // Unbound placeables would drop these events; detect once bound.
        if !placeable.is_bound() {
            continue;
        }
        let sensor_center = sensor_xf.translation();
        let sensor_half = scaled_half_extents(sensor_xf, sensor.half_extents);

        let current: Vec<Entity> = volumes
            .iter()
            .filter(|(slot, _, _)| *slot != object)
            .filter(|(_, slot_xf, volume)| {
                boxes_overlap(
                    sensor_center,
                    sensor_half,
                    slot_xf.translation(),
                    scaled_half_extents(slot_xf, volume.half_extents),
                )
            })
            .map(|(slot, _, _)| slot)
            .collect();

        for slot in overlaps.0.iter().filter(|s| !current.contains(*s)) {
            events.write(TriggerEvent::Exited {
                object,
                slot: *slot,
            });
        }
        for slot in current.iter().filter(|s| !overlaps.0.contains(*s)) {
            events.write(TriggerEvent::Entered {
                object,
                slot: *slot,
            });
        }

        // Keep entry order for slots still overlapped, append new ones.
        let mut next: Vec<Entity> = overlaps
            .0
            .iter()
            .copied()
            .filter(|s| current.contains(s))
            .collect();
        for slot in current {
            if !next.contains(&slot) {
                next.push(slot);
            }
        }
        overlaps.0 = next;
    }
}

pub fn apply_trigger_events(
    mut events: EventReader<TriggerEvent>,
    mut placeables: Query<&mut Placeable>,
    mut commands: Commands,
    mut notifications: EventWriter<SlotNotificationEvent>,
    mut tracker: ResMut<SlotTracker>,
) {
    for event in events.read() {
        let (object, slot, entering) = match *event {
            TriggerEvent::Entered { object, slot } => (object, slot, true),
            TriggerEvent::Exited { object, slot } => (object, slot, false),
        };
        let Ok(mut placeable) = placeables.get_mut(object) else {
            continue;
        };
        let Some((placer, _)) = placeable.parts_mut() else {
            continue;
        };

        let mut host = EcsPlacementHost::new(
            &mut commands,
            &mut notifications,
            &mut tracker,
            object,
        );
        if entering {
            placer.on_enter(slot.into(), &mut host);
        } else {
            placer.on_exit(slot.into(), &mut host);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_boxes_overlap_and_separated_ones_do_not() {
        let half = Vec3::splat(0.5);
        assert!(boxes_overlap(Vec3::ZERO, half, Vec3::new(1.0, 0.0, 0.0), half));
        assert!(boxes_overlap(Vec3::ZERO, half, Vec3::new(0.3, 0.3, -0.3), half));
        assert!(!boxes_overlap(Vec3::ZERO, half, Vec3::new(0.0, 1.01, 0.0), half));
    }
}
