use super::attachment::AttachmentHandle;
use super::slot::{HighlightId, Pose, SlotId, TargetId};

/// Notifications fired to a slot's listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotNotification {
    Hover,
    Unhover,
    Place,
    Remove,
}

/// Owner of highlight visuals.
pub trait HighlightSink {
    fn set_highlight_visible(&mut self, highlight: HighlightId, visible: bool);
}

/// Listeners for slot notifications, invoked synchronously.
pub trait NotificationSink {
    fn notify(&mut self, slot: SlotId, notification: SlotNotification);
}

/// Physics side of placement: the movable body and the attachments made to it.
pub trait AttachmentFactory {
    /// Put the movable body to rest.
    fn sleep_body(&mut self);

    fn move_to(&mut self, pose: Pose);

    /// Connect the movable body to `target` with a fixed joint.
    fn create_joint(&mut self, target: TargetId) -> AttachmentHandle;

    /// Bind the movable body to follow the `anchor` transform.
    fn create_anchor_binding(&mut self, anchor: TargetId) -> AttachmentHandle;

    fn destroy(&mut self, handle: AttachmentHandle);

    fn set_trigger_enabled(&mut self, slot: SlotId, enabled: bool);
}

/// Which slots hold an anchored object, shared by every object that can
/// use them.
pub trait SlotOccupancy {
    fn is_occupied(&self, slot: SlotId) -> bool;

    fn set_occupied(&mut self, slot: SlotId, occupied: bool);
}

/// Everything the placement state machine calls out to.
pub trait PlacementHost:
    HighlightSink + NotificationSink + AttachmentFactory + SlotOccupancy
{
}

impl<T> PlacementHost for T where
    T: HighlightSink + NotificationSink + AttachmentFactory + SlotOccupancy
{
}
