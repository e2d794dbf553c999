use bevy::math::Vec3;

/// Default half extents for slot trigger volumes spawned from a layout entry
/// that does not specify its own.
pub const DEFAULT_TRIGGER_HALF_EXTENTS: Vec3 = Vec3::new(0.15, 0.15, 0.15);

/// Default half extents for the sensor volume carried by a placeable object.
pub const DEFAULT_SENSOR_HALF_EXTENTS: Vec3 = Vec3::new(0.05, 0.05, 0.05);

/// Directory (relative to the asset root) holding slot layout manifests.
pub const RELATIVE_LAYOUT_PATH: &str = "layouts";

/// File extension registered for slot layout manifests.
pub const LAYOUT_EXTENSION: &str = "layout.json";

/// Layout file path for a named layout.
pub fn layout_path(name: &str) -> String {
    format!("{}/{}.{}", RELATIVE_LAYOUT_PATH, name, LAYOUT_EXTENSION)
}
