use bevy::prelude::*;
use std::fmt;

/// Identity of a slot's trigger volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub u64);

/// What a joint connects to, or the anchor transform an object follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(pub u64);

/// Handle of the highlight visual owned by the host engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HighlightId(pub u64);

impl From<Entity> for SlotId {
    fn from(entity: Entity) -> Self {
        Self(entity.to_bits())
    }
}

impl From<Entity> for TargetId {
    fn from(entity: Entity) -> Self {
        Self(entity.to_bits())
    }
}

impl From<Entity> for HighlightId {
    fn from(entity: Entity) -> Self {
        Self(entity.to_bits())
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot#{}", self.0)
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target#{}", self.0)
    }
}

/// Position and orientation an object is moved to when placed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Write this pose into a transform, keeping its scale.
    pub fn apply_to(&self, transform: &mut Transform) {
        transform.translation = self.translation;
        transform.rotation = self.rotation;
    }
}

impl From<Transform> for Pose {
    fn from(transform: Transform) -> Self {
        Self::new(transform.translation, transform.rotation)
    }
}

impl From<&GlobalTransform> for Pose {
    fn from(transform: &GlobalTransform) -> Self {
        Pose::from(transform.compute_transform())
    }
}

/// Static configuration of one placement candidate.
#[derive(Debug, Clone)]
pub struct SlotDescriptor {
    pub id: SlotId,
    pub name: Option<String>,
    /// Pose the object is snapped to before attaching, if any.
    pub pose: Option<Pose>,
    pub attach_target: TargetId,
    pub highlight: HighlightId,
    /// Put the rigid body to rest when placed here.
    pub sleep_on_place: bool,
}

impl SlotDescriptor {
    pub fn new(id: SlotId, attach_target: TargetId, highlight: HighlightId) -> Self {
        Self {
            id,
            name: None,
            pose: None,
            attach_target,
            highlight,
            sleep_on_place: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_pose(mut self, pose: Pose) -> Self {
        self.pose = Some(pose);
        self
    }

    pub fn with_sleep_on_place(mut self, sleep: bool) -> Self {
        self.sleep_on_place = sleep;
        self
    }

    /// Name for log output, falling back to the id.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.id.to_string(),
        }
    }
}

/// The fixed set of slots a movable object may be placed into.
///
/// Descriptors never change after construction. Whether a slot holds an
/// anchored object is shared between objects and lives with the host
/// (`SlotOccupancy`), not here.
#[derive(Debug, Clone, Default)]
pub struct SlotRegistry {
    slots: Vec<SlotDescriptor>,
}

impl SlotRegistry {
    pub fn new(descriptors: Vec<SlotDescriptor>) -> Self {
        let mut slots: Vec<SlotDescriptor> = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            if slots.iter().any(|s| s.id == descriptor.id) {
                warn!("Ignoring duplicate slot {} in registry", descriptor.label());
                continue;
            }
            if let Some(other) = slots
                .iter()
                .find(|s| s.attach_target == descriptor.attach_target)
            {
                warn!(
                    "Slots {} and {} share attach target {}; releases resolve to the placed slot first",
                    other.label(),
                    descriptor.label(),
                    descriptor.attach_target
                );
            }
            slots.push(descriptor);
        }
        Self { slots }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.slots.iter().any(|s| s.id == id)
    }

    pub fn get(&self, id: SlotId) -> Option<&SlotDescriptor> {
        self.slots.iter().find(|s| s.id == id)
    }

    /// Every slot attached to `target`, in registration order.
    pub fn find_by_target(&self, target: TargetId) -> impl Iterator<Item = &SlotDescriptor> {
        self.slots.iter().filter(move |s| s.attach_target == target)
    }

    /// Resolve a released attachment target back to its slot.
    ///
    /// When several slots share `target`, `hint` wins if it is one of them,
    /// otherwise the first registered match.
    pub fn resolve_target(&self, target: TargetId, hint: Option<SlotId>) -> Option<SlotId> {
        let mut first = None;
        for descriptor in self.find_by_target(target) {
            if Some(descriptor.id) == hint {
                return hint;
            }
            first.get_or_insert(descriptor.id);
        }
        first
    }

    pub fn iter(&self) -> impl Iterator<Item = &SlotDescriptor> {
        self.slots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(id: u64, target: u64) -> SlotDescriptor {
        SlotDescriptor::new(SlotId(id), TargetId(target), HighlightId(id + 100))
    }

    #[test]
    fn duplicate_slot_ids_are_dropped() {
        let registry = SlotRegistry::new(vec![slot(1, 10), slot(1, 11), slot(2, 12)]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(SlotId(1)).unwrap().attach_target, TargetId(10));
    }

    #[test]
    fn resolve_target_prefers_hint_among_shared_targets() {
        let registry = SlotRegistry::new(vec![slot(1, 10), slot(2, 10), slot(3, 11)]);
        assert_eq!(registry.resolve_target(TargetId(10), Some(SlotId(2))), Some(SlotId(2)));
        assert_eq!(registry.resolve_target(TargetId(10), Some(SlotId(3))), Some(SlotId(1)));
        assert_eq!(registry.resolve_target(TargetId(10), None), Some(SlotId(1)));
        assert_eq!(registry.resolve_target(TargetId(99), None), None);
    }

    #[test]
    fn find_by_target_keeps_registration_order() {
        let registry = SlotRegistry::new(vec![slot(3, 10), slot(1, 11), slot(2, 10)]);
        let ids: Vec<SlotId> = registry.find_by_target(TargetId(10)).map(|s| s.id).collect();
        assert_eq!(ids, vec![SlotId(3), SlotId(2)]);
    }

    #[test]
    fn pose_keeps_scale_when_applied() {
        let mut transform = Transform::from_scale(Vec3::splat(2.0));
        let pose = Pose::new(Vec3::new(1.0, 2.0, 3.0), Quat::from_rotation_y(1.0));
        pose.apply_to(&mut transform);
        assert_eq!(transform.translation, pose.translation);
        assert_eq!(transform.rotation, pose.rotation);
        assert_eq!(transform.scale, Vec3::splat(2.0));
    }
}
