use bevy::prelude::*;
use std::collections::HashMap;

use super::components::{AnchorBinding, FixedJoint, PendingPose, Sleeping, SlotOccupant, TriggerDisabled};
use super::events::SlotNotificationEvent;
use crate::placement::{
    AttachmentFactory, AttachmentHandle, HighlightId, HighlightSink, NotificationSink, Pose,
    SlotId, SlotNotification, SlotOccupancy, TargetId,
};

/// Slot state shared by every placeable: which object is anchored in a slot
/// and which objects currently hover each highlight.
///
/// Updated synchronously by [`EcsPlacementHost`], so a claim made earlier in
/// a system run is seen by every later placeable in the same run.
#[derive(Resource, Debug, Default)]
pub struct SlotTracker {
    occupants: HashMap<Entity, Entity>,
    hovering: HashMap<Entity, Vec<Entity>>,
}

impl SlotTracker {
    pub fn occupant(&self, slot: Entity) -> Option<Entity> {
        self.occupants.get(&slot).copied()
    }

    /// Objects hovering `highlight`, in hover order.
    pub fn hovering(&self, highlight: Entity) -> &[Entity] {
        self.hovering.get(&highlight).map_or(&[], |objects| objects.as_slice())
    }

    fn hover(&mut self, highlight: Entity, object: Entity) {
        let objects = self.hovering.entry(highlight).or_default();
        if !objects.contains(&object) {
            objects.push(object);
        }
    }

    // True once nobody hovers `highlight`.
    fn unhover(&mut self, highlight: Entity, object: Entity) -> bool {
        let Some(objects) = self.hovering.get_mut(&highlight) else {
            return true;
        };
        objects.retain(|o| *o != object);
        if objects.is_empty() {
            self.hovering.remove(&highlight);
            true
        } else {
            false
        }
    }

    /// Drop every object for which `alive` is false. Returns the slots they
    /// were anchored in and the highlights nobody hovers any more.
    pub fn forget_missing(
        &mut self,
        alive: impl Fn(Entity) -> bool,
    ) -> (Vec<Entity>, Vec<Entity>) {
        let mut freed = Vec::new();
        self.occupants.retain(|slot, object| {
            let keep = alive(*object);
            if !keep {
                freed.push(*slot);
            }
            keep
        });

        let mut unlit = Vec::new();
        self.hovering.retain(|highlight, objects| {
            let before = objects.len();
            objects.retain(|o| alive(*o));
            if objects.is_empty() && before > 0 {
                unlit.push(*highlight);
            }
            !objects.is_empty()
        });
        (freed, unlit)
    }
}

/// Placement host backed by ECS commands for one placeable entity.
///
/// Component changes are deferred through `Commands` and land at the next
/// command flush; occupancy and hover counts go through [`SlotTracker`]
/// immediately.
pub struct EcsPlacementHost<'a, 'w, 's, 'e> {
    commands: &'a mut Commands<'w, 's>,
    notifications: &'a mut EventWriter<'e, SlotNotificationEvent>,
    tracker: &'a mut SlotTracker,
    object: Entity,
}

impl<'a, 'w, 's, 'e> EcsPlacementHost<'a, 'w, 's, 'e> {
    pub fn new(
        commands: &'a mut Commands<'w, 's>,
        notifications: &'a mut EventWriter<'e, SlotNotificationEvent>,
        tracker: &'a mut SlotTracker,
        object: Entity,
    ) -> Self {
        Self {
            commands,
            notifications,
            tracker,
            object,
        }
    }

    fn entity_commands(&mut self, entity: Entity) -> Option<EntityCommands<'_>> {
        match self.commands.get_entity(entity) {
            Ok(entity_commands) => Some(entity_commands),
            Err(_) => {
                warn!("Placement target {} no longer exists", entity);
                None
            }
        }
    }
}

impl HighlightSink for EcsPlacementHost<'_, '_, '_, '_> {
    // Highlights are shared between placeables; hide only when the last
    // hovering object lets go.
    fn set_highlight_visible(&mut self, highlight: HighlightId, visible: bool) {
        let highlight = Entity::from_bits(highlight.0);
        let visibility = if visible {
            self.tracker.hover(highlight, self.object);
            Visibility::Visible
        } else if self.tracker.unhover(highlight, self.object) {
            Visibility::Hidden
        } else {
            return;
        };
        if let Some(mut entity) = self.entity_commands(highlight) {
            entity.insert(visibility);
        }
    }
}

impl SlotOccupancy for EcsPlacementHost<'_, '_, '_, '_> {
    fn is_occupied(&self, slot: SlotId) -> bool {
        self.tracker
            .occupants
            .contains_key(&Entity::from_bits(slot.0))
    }

    fn set_occupied(&mut self, slot: SlotId, occupied: bool) {
        let slot = Entity::from_bits(slot.0);
        if occupied {
            self.tracker.occupants.insert(slot, self.object);
        } else if self.tracker.occupant(slot) == Some(self.object) {
            self.tracker.occupants.remove(&slot);
        }
    }
}

impl NotificationSink for EcsPlacementHost<'_, '_, '_, '_> {
    fn notify(&mut self, slot: SlotId, notification: SlotNotification) {
        let slot = Entity::from_bits(slot.0);
        let object = self.object;
        match notification {
            SlotNotification::Place => {
                if let Some(mut entity) = self.entity_commands(slot) {
                    entity.insert(SlotOccupant(object));
                }
            }
            SlotNotification::Remove => {
                if let Some(mut entity) = self.entity_commands(slot) {
                    entity.remove::<SlotOccupant>();
                }
            }
            SlotNotification::Hover | SlotNotification::Unhover => {}
        }
        self.notifications.write(SlotNotificationEvent {
            object,
            slot,
            notification,
        });
    }
}

impl AttachmentFactory for EcsPlacementHost<'_, '_, '_, '_> {
    fn sleep_body(&mut self) {
        let object = self.object;
        if let Some(mut entity) = self.entity_commands(object) {
            entity.insert(Sleeping);
        }
    }

    fn move_to(&mut self, pose: Pose) {
        let object = self.object;
        if let Some(mut entity) = self.entity_commands(object) {
            entity.insert(PendingPose(pose));
        }
    }

    fn create_joint(&mut self, target: TargetId) -> AttachmentHandle {
        let joint = self
            .commands
            .spawn((
                FixedJoint {
                    body: self.object,
                    target: Entity::from_bits(target.0),
                    offset: None,
                },
                Name::new("fixed_joint"),
            ))
            .id();
        AttachmentHandle(joint.to_bits())
    }

    fn create_anchor_binding(&mut self, anchor: TargetId) -> AttachmentHandle {
        let binding = self
            .commands
            .spawn((
                AnchorBinding {
                    follower: self.object,
                    anchor: Entity::from_bits(anchor.0),
                },
                Name::new("anchor_binding"),
            ))
            .id();
        AttachmentHandle(binding.to_bits())
    }

    fn destroy(&mut self, handle: AttachmentHandle) {
        if let Some(mut entity) = self.entity_commands(Entity::from_bits(handle.0)) {
            entity.despawn();
        }
    }

    fn set_trigger_enabled(&mut self, slot: SlotId, enabled: bool) {
        if let Some(mut entity) = self.entity_commands(Entity::from_bits(slot.0)) {
            if enabled {
                entity.remove::<TriggerDisabled>();
            } else {
                entity.insert(TriggerDisabled);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlight_stays_hovered_until_the_last_object_leaves() {
        let mut tracker = SlotTracker::default();
        let highlight = Entity::from_raw(1);
        let (a, b) = (Entity::from_raw(2), Entity::from_raw(3));

        tracker.hover(highlight, a);
        tracker.hover(highlight, b);
        tracker.hover(highlight, a);
        assert_eq!(tracker.hovering(highlight), &[a, b]);

        assert!(!tracker.unhover(highlight, a));
        assert!(tracker.unhover(highlight, b));
        assert!(tracker.hovering(highlight).is_empty());
    }

    #[test]
    fn forgetting_missing_objects_frees_slots_and_unlights() {
        let mut tracker = SlotTracker::default();
        let (slot, highlight, other_highlight) =
            (Entity::from_raw(1), Entity::from_raw(2), Entity::from_raw(3));
        let (gone, alive) = (Entity::from_raw(10), Entity::from_raw(11));
        tracker.occupants.insert(slot, gone);
        tracker.hover(highlight, gone);
        tracker.hover(other_highlight, gone);
        tracker.hover(other_highlight, alive);

        let (freed, unlit) = tracker.forget_missing(|object| object == alive);

        assert_eq!(freed, vec![slot]);
        assert_eq!(unlit, vec![highlight]);
        assert_eq!(tracker.occupant(slot), None);
        assert_eq!(tracker.hovering(other_highlight), &[alive]);
    }
}
