use super::slot::{SlotId, TargetId};

/// Error types for placement operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    /// Place was called while an attachment still exists.
    AlreadyPlaced { placed_in: SlotId, attempted: SlotId },
    /// The live attachment's target matches no registered slot.
    UnresolvedAttachment { target: TargetId },
    /// Place was asked for a slot this object was never configured with.
    UnknownSlot(SlotId),
    /// Another object is anchored in the slot.
    SlotOccupied(SlotId),
    /// Joint placement was asked for while the object is still held.
    HeldByGrab(SlotId),
}

impl PlacementError {
    /// Violations mean an attachment leaked or state desynced upstream.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            PlacementError::AlreadyPlaced { .. } | PlacementError::UnresolvedAttachment { .. }
        )
    }
}

impl std::fmt::Display for PlacementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlacementError::AlreadyPlaced {
                placed_in,
                attempted,
            } => write!(
                f,
                "Cannot place into {} while attached to {} (was the attachment released?)",
                attempted, placed_in
            ),
            PlacementError::UnresolvedAttachment { target } => {
                write!(f, "Attachment target {} not found in slot registry", target)
            }
            PlacementError::UnknownSlot(slot) => write!(f, "{} is not a configured slot", slot),
            PlacementError::SlotOccupied(slot) => write!(f, "{} already holds an object", slot),
            PlacementError::HeldByGrab(slot) => {
                write!(f, "Cannot place into {} while the object is grabbed", slot)
            }
        }
    }
}

impl std::error::Error for PlacementError {}
