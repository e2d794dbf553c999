use bevy::prelude::*;

use crate::engine::events::SlotNotificationEvent;
use crate::engine::settings::PlacementSettings;
use crate::placement::SlotNotification;

pub fn log_slot_notifications(
    settings: Res<PlacementSettings>,
    mut events: EventReader<SlotNotificationEvent>,
    names: Query<&Name>,
) {
    if !settings.log_notifications {
        events.clear();
        return;
    }
    let label = |entity: Entity| match names.get(entity) {
        Ok(name) => name.to_string(),
        Err(_) => entity.to_string(),
    };
    for event in events.read() {
        match event.notification {
            SlotNotification::Hover | SlotNotification::Unhover => debug!(
                "{} {:?} {}",
                label(event.object),
                event.notification,
                label(event.slot)
            ),
            SlotNotification::Place | SlotNotification::Remove => info!(
                "{} {:?} {}",
                label(event.object),
                event.notification,
                label(event.slot)
            ),
        }
    }
}
