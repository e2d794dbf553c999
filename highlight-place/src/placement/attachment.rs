use super::slot::{SlotId, TargetId};

/// How a placed object is held in its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AttachMode {
    /// Fixed joint to the slot's body. Highlights only while grabbed; a slot
    /// holds one object by construction of the joint.
    #[default]
    Joint,
    /// Anchor-transform binding. Highlights whenever free, and disables the
    /// slot's trigger while occupied.
    Anchor,
}

/// Opaque handle of a live joint or anchor binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttachmentHandle(pub u64);

/// The physical binding made by a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attachment {
    pub slot: SlotId,
    /// What the joint/anchor resolved to when created.
    pub target: TargetId,
    pub handle: AttachmentHandle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttachmentState {
    #[default]
    Free,
    Placed(Attachment),
}

impl AttachmentState {
    pub fn is_free(&self) -> bool {
        matches!(self, AttachmentState::Free)
    }

    pub fn slot(&self) -> Option<SlotId> {
        match self {
            AttachmentState::Free => None,
            AttachmentState::Placed(attachment) => Some(attachment.slot),
        }
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        match self {
            AttachmentState::Free => None,
            AttachmentState::Placed(attachment) => Some(attachment),
        }
    }
}
