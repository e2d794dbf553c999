use bevy::prelude::*;

use crate::engine::components::{Placeable, PlacementSlot, SlotBinding, SlotGroup};
use crate::engine::layout::SlotLayoutLoader;
use crate::placement::SlotRegistry;

// Resolve each unbound placeable's slots into a registry once they exist.
// Runs after transform propagation so `SlotPose::AtSlot` sees final poses.
pub fn bind_placeables(
    mut placeables: Query<(Entity, &mut Placeable)>,
    slots: Query<(
        Entity,
        &PlacementSlot,
        Option<&GlobalTransform>,
        Option<&Name>,
        Option<&SlotGroup>,
    )>,
    layout: Option<Res<SlotLayoutLoader>>,
) {
    for (entity, mut placeable) in &mut placeables {
        if placeable.is_bound() {
            continue;
        }

        let descriptors = match &placeable.binding {
            SlotBinding::Entities(list) => list
                .iter()
                .filter_map(|slot_entity| match slots.get(*slot_entity) {
                    Ok((slot_entity, slot, transform, name, _)) => {
                        Some(slot.descriptor(slot_entity, transform, name))
                    }
                    Err(_) => {
                        warn!("{} lists {} which is not a placement slot", entity, slot_entity);
                        None
                    }
                })
                .collect::<Vec<_>>(),
            SlotBinding::Group(group) => {
                // Wait for a pending layout so the group is complete.
                if layout.as_ref().is_some_and(|l| l.is_pending()) {
                    continue;
                }
                slots
                    .iter()
                    .filter(|(_, _, _, _, g)| g.is_some_and(|g| g.0 == *group))
                    .map(|(slot_entity, slot, transform, name, _)| {
                        slot.descriptor(slot_entity, transform, name)
                    })
                    .collect::<Vec<_>>()
            }
        };

        info!("Binding {} to {} placement slots", entity, descriptors.len());
        placeable.bind(SlotRegistry::new(descriptors));
    }
}
