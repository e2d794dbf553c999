use bevy::prelude::*;
use constants::placement::{DEFAULT_SENSOR_HALF_EXTENTS, DEFAULT_TRIGGER_HALF_EXTENTS};
use std::sync::{Arc, Mutex};

use crate::placement::{
    AttachMode, GrabGate, Pose, ReplicationClient, SlotDescriptor, SlotPlacer, SlotRegistry,
};

// Slot side

/// Where an object placed into a slot is snapped to before attaching.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SlotPose {
    /// Attach wherever the object was released.
    #[default]
    Unchanged,
    /// Snap to the slot entity's own transform.
    AtSlot,
    Fixed(Pose),
}

/// Configuration of a placement slot, carried by its trigger-volume entity.
#[derive(Component, Debug, Clone, Default)]
#[require(TriggerVolume)]
pub struct PlacementSlot {
    /// Entity whose visibility is toggled as highlight. Defaults to the slot.
    pub highlight: Option<Entity>,
    /// Joint body / anchor transform. Defaults to the slot.
    pub attach_target: Option<Entity>,
    pub pose: SlotPose,
    pub sleep_on_place: bool,
}

impl PlacementSlot {
    /// Build the core descriptor for the slot carried by `entity`.
    pub fn descriptor(
        &self,
        entity: Entity,
        transform: Option<&GlobalTransform>,
        name: Option<&Name>,
    ) -> SlotDescriptor {
        let mut descriptor = SlotDescriptor::new(
            entity.into(),
            self.attach_target.unwrap_or(entity).into(),
            self.highlight.unwrap_or(entity).into(),
        )
        .with_sleep_on_place(self.sleep_on_place);
        if let Some(name) = name {
            descriptor = descriptor.with_name(name.as_str());
        }
        let pose = match self.pose {
            SlotPose::Unchanged => None,
            SlotPose::AtSlot => transform.map(Pose::from),
            SlotPose::Fixed(pose) => Some(pose),
        };
        if let Some(pose) = pose {
            descriptor = descriptor.with_pose(pose);
        }
        descriptor
    }
}

/// Axis-aligned trigger box centred on the entity.
#[derive(Component, Debug, Clone, Copy)]
pub struct TriggerVolume {
    pub half_extents: Vec3,
}

impl Default for TriggerVolume {
    fn default() -> Self {
        Self {
            half_extents: DEFAULT_TRIGGER_HALF_EXTENTS,
        }
    }
}

/// Trigger is switched off and reports no overlaps.
#[derive(Component, Debug, Clone, Copy)]
pub struct TriggerDisabled;

/// Named set of slots a placeable can bind to as a whole.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct SlotGroup(pub String);

/// Object currently placed into this slot.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotOccupant(pub Entity);

/// Marker for highlight visuals spawned from a layout.
#[derive(Component, Debug, Clone, Copy)]
pub struct SlotHighlight;

// Placeable side

/// Which slots a placeable may use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotBinding {
    Entities(Vec<Entity>),
    Group(String),
}

/// Queue of grab requests waiting to be sent to the replication layer.
#[derive(Debug, Clone, Default)]
pub struct GrabRequestQueue(Arc<Mutex<Vec<bool>>>);

impl GrabRequestQueue {
    pub fn drain(&self) -> Vec<bool> {
        match self.0.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(_) => Vec::new(),
        }
    }
}

impl ReplicationClient for GrabRequestQueue {
    fn request_grab(&mut self, grabbed: bool) {
        if let Ok(mut queue) = self.0.lock() {
            queue.push(grabbed);
        }
    }
}

/// A movable object that can be placed into slots.
///
/// The core state machine is created once the slots in `binding` resolve.
#[derive(Component)]
#[require(TriggerSensor)]
pub struct Placeable {
    pub mode: AttachMode,
    pub binding: SlotBinding,
    placer: Option<SlotPlacer>,
    gate: GrabGate,
    requests: Option<GrabRequestQueue>,
}

impl Placeable {
    /// Placeable whose grabs apply locally.
    pub fn new(mode: AttachMode, binding: SlotBinding) -> Self {
        Self {
            mode,
            binding,
            placer: None,
            gate: GrabGate::local(),
            requests: None,
        }
    }

    /// Placeable whose grabs wait for replicated ownership.
    pub fn replicated(mode: AttachMode, binding: SlotBinding) -> Self {
        let queue = GrabRequestQueue::default();
        Self {
            mode,
            binding,
            placer: None,
            gate: GrabGate::replicated(queue.clone()),
            requests: Some(queue),
        }
    }

    pub fn placer(&self) -> Option<&SlotPlacer> {
        self.placer.as_ref()
    }

    pub fn is_bound(&self) -> bool {
        self.placer.is_some()
    }

    pub fn is_replicated(&self) -> bool {
        self.gate.is_replicated()
    }

    pub(crate) fn bind(&mut self, registry: SlotRegistry) {
        self.placer = Some(SlotPlacer::new(self.mode, registry));
    }

    pub(crate) fn parts_mut(&mut self) -> Option<(&mut SlotPlacer, &mut GrabGate)> {
        match &mut self.placer {
            Some(placer) => Some((placer, &mut self.gate)),
            None => None,
        }
    }

    pub(crate) fn requests(&self) -> Option<&GrabRequestQueue> {
        self.requests.as_ref()
    }
}

/// Sensor box carried by a placeable for trigger overlap tests.
#[derive(Component, Debug, Clone, Copy)]
#[require(Overlaps)]
pub struct TriggerSensor {
    pub half_extents: Vec3,
}

impl Default for TriggerSensor {
    fn default() -> Self {
        Self {
            half_extents: DEFAULT_SENSOR_HALF_EXTENTS,
        }
    }
}

/// Trigger volumes the sensor overlapped last frame, in entry order.
#[derive(Component, Debug, Clone, Default)]
pub struct Overlaps(pub Vec<Entity>);

// Attachments

/// Fixed joint holding `body` rigidly to `target`.
#[derive(Component, Debug, Clone, Copy)]
pub struct FixedJoint {
    pub body: Entity,
    pub target: Entity,
    /// Body pose in target space, captured on the first frame.
    pub offset: Option<Transform>,
}

/// Binding that makes `follower` track the `anchor` transform.
#[derive(Component, Debug, Clone, Copy)]
pub struct AnchorBinding {
    pub follower: Entity,
    pub anchor: Entity,
}

/// Body was put to rest on placement.
#[derive(Component, Debug, Clone, Copy)]
pub struct Sleeping;

/// Pose to write into the entity's transform before propagation.
#[derive(Component, Debug, Clone, Copy)]
pub struct PendingPose(pub Pose);
