use bevy::prelude::*;

/// Runtime configuration for the placement plugin.
#[derive(Resource, Debug, Clone)]
pub struct PlacementSettings {
    /// Log slot notifications (place/remove at info, hover at debug).
    pub log_notifications: bool,
    /// Slot layout to load at startup, by name under the layouts directory.
    pub layout: Option<String>,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            log_notifications: true,
            layout: None,
        }
    }
}
