use super::host::{HighlightSink, NotificationSink, SlotNotification};
use super::slot::SlotDescriptor;

/// Show or hide a slot's highlight and fire the matching hover notification.
///
/// Stateless: callers make sure they call this once per transition. A
/// highlight may be shared by several objects hovering the same slot; the
/// host keeps it visible until the last of them turns it off.
pub fn set_highlight<H>(host: &mut H, slot: &SlotDescriptor, visible: bool)
where
    H: HighlightSink + NotificationSink + ?Sized,
{
    host.set_highlight_visible(slot.highlight, visible);
    let notification = if visible {
        SlotNotification::Hover
    } else {
        SlotNotification::Unhover
    };
    host.notify(slot.id, notification);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::host::recording::{HostCall, RecordingHost};
    use crate::placement::slot::{HighlightId, SlotId, TargetId};

    #[test]
    fn fires_exactly_one_matching_notification() {
        let slot = SlotDescriptor::new(SlotId(1), TargetId(2), HighlightId(3));
        let mut host = RecordingHost::default();

        set_highlight(&mut host, &slot, true);
        set_highlight(&mut host, &slot, false);

        assert_eq!(
            host.calls,
            vec![
                HostCall::Highlight(HighlightId(3), true),
                HostCall::Notify(SlotId(1), SlotNotification::Hover),
                HostCall::Highlight(HighlightId(3), false),
                HostCall::Notify(SlotId(1), SlotNotification::Unhover),
            ]
        );
    }
}
