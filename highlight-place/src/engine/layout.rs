//! Slot layouts loaded from JSON.
//!
//! ```json
//! {
//!   "slots": [
//!     { "name": "pad_left", "group": "pads", "translation": [-1.0, 0.5, 0.0] },
//!     { "name": "pad_right", "group": "pads", "translation": [1.0, 0.5, 0.0],
//!       "rotation": [0.0, 0.383, 0.0, 0.924], "half_extents": [0.2, 0.1, 0.2],
//!       "sleep_on_place": true, "snap_to_slot": false }
//!   ]
//! }
//! ```

use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
use constants::placement::{DEFAULT_TRIGGER_HALF_EXTENTS, LAYOUT_EXTENSION, layout_path};
use serde::{Deserialize, Serialize};

use super::components::{PlacementSlot, SlotGroup, SlotHighlight, SlotPose, TriggerVolume};
use super::settings::PlacementSettings;

fn identity_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

fn default_snap() -> bool {
    true
}

/// Slot layout as a Bevy asset. Mirrors the JSON structure exactly.
#[derive(Asset, TypePath, Debug, Clone, Serialize, Deserialize)]
pub struct SlotLayout {
    pub slots: Vec<SlotLayoutEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotLayoutEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub translation: [f32; 3],
    /// Quaternion as x, y, z, w.
    #[serde(default = "identity_rotation")]
    pub rotation: [f32; 4],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub half_extents: Option<[f32; 3]>,
    #[serde(default)]
    pub sleep_on_place: bool,
    /// Snap placed objects to the slot's transform.
    #[serde(default = "default_snap")]
    pub snap_to_slot: bool,
}

impl SlotLayout {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl SlotLayoutEntry {
    pub fn transform(&self) -> Transform {
        let rotation = Quat::from_array(self.rotation);
        let rotation = if rotation.length_squared() > f32::EPSILON && rotation.is_finite() {
            rotation.normalize()
        } else {
            warn!("Slot {} has an invalid rotation; using identity", self.name);
            Quat::IDENTITY
        };
        Transform::from_translation(Vec3::from_array(self.translation)).with_rotation(rotation)
    }

    pub fn half_extents(&self) -> Vec3 {
        match self.half_extents {
            Some(extents) => {
                let extents = Vec3::from_array(extents);
                if extents.is_finite() {
                    extents.max(Vec3::splat(0.001))
                } else {
                    warn!("Slot {} has invalid half extents; using default", self.name);
                    DEFAULT_TRIGGER_HALF_EXTENTS
                }
            }
            None => DEFAULT_TRIGGER_HALF_EXTENTS,
        }
    }
}

/// Spawn one slot entity (plus hidden highlight child) per layout entry.
pub fn spawn_slot_layout(commands: &mut Commands, layout: &SlotLayout) -> Vec<Entity> {
    let mut spawned = Vec::with_capacity(layout.slots.len());
    for entry in &layout.slots {
        let highlight = commands
            .spawn((
                SlotHighlight,
                Transform::default(),
                Visibility::Hidden,
                Name::new(format!("{}_highlight", entry.name)),
            ))
            .id();

        let pose = if entry.snap_to_slot {
            SlotPose::AtSlot
        } else {
            SlotPose::Unchanged
        };
        let mut slot = commands.spawn((
            Name::new(entry.name.clone()),
            entry.transform(),
            Visibility::default(),
            TriggerVolume {
                half_extents: entry.half_extents(),
            },
            PlacementSlot {
                highlight: Some(highlight),
                attach_target: None,
                pose,
                sleep_on_place: entry.sleep_on_place,
            },
        ));
        if let Some(group) = &entry.group {
            slot.insert(SlotGroup(group.clone()));
        }
        slot.add_child(highlight);
        spawned.push(slot.id());
    }
    spawned
}

/// Tracks the configured layout from load request to spawn.
#[derive(Resource, Default)]
pub struct SlotLayoutLoader {
    handle: Option<Handle<SlotLayout>>,
    spawned: bool,
}

impl SlotLayoutLoader {
    /// A layout was requested and its slots are not in the world yet.
    pub fn is_pending(&self) -> bool {
        self.handle.is_some() && !self.spawned
    }
}

pub fn start_loading_layout(
    settings: Res<PlacementSettings>,
    mut loader: ResMut<SlotLayoutLoader>,
    asset_server: Res<AssetServer>,
) {
    let Some(name) = settings.layout.as_deref() else {
        return;
    };
    let path = layout_path(name);
    info!("Loading slot layout from: {}", path);
    loader.handle = Some(asset_server.load(path));
}

pub fn spawn_layout_slots(
    mut loader: ResMut<SlotLayoutLoader>,
    layouts: Res<Assets<SlotLayout>>,
    asset_server: Res<AssetServer>,
    mut commands: Commands,
) {
    if !loader.is_pending() {
        return;
    }
    let Some(handle) = loader.handle.clone() else {
        return;
    };

    if let Some(layout) = layouts.get(&handle) {
        if layout.slots.is_empty() {
            warn!("Slot layout has no slots");
        }
        let spawned = spawn_slot_layout(&mut commands, layout);
        info!("✓ Spawned {} slots from layout", spawned.len());
        loader.spawned = true;
    } else if let LoadState::Failed(err) = asset_server.load_state(handle.id()) {
        error!("Failed to load slot layout: {}", err);
        // Unblock group bindings; they bind to whatever slots exist.
        loader.spawned = true;
    }
}

/// Loads `PlacementSettings::layout` and spawns its slots.
pub struct SlotLayoutPlugin;

impl Plugin for SlotLayoutPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(JsonAssetPlugin::<SlotLayout>::new(&[LAYOUT_EXTENSION]))
            .init_resource::<SlotLayoutLoader>()
            .add_systems(Startup, start_loading_layout)
            .add_systems(Update, spawn_layout_slots);
    }
}
