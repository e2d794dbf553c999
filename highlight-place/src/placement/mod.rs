//! Engine-agnostic placement core.
//!
//! A movable object keeps an ordered list of the slot trigger volumes it
//! overlaps. The most recently entered one is the active candidate: it is
//! highlighted while hovering and is where the object attaches when a grab
//! is released.
//!
//! ```text
//! trigger enter/exit ──> SlotPlacer::on_enter/on_exit ──> CandidateList
//!                                 │                          │
//!                                 └──> set_highlight <── active()
//!
//! select/unselect ──> GrabGate ──> SlotPlacer::set_grabbed
//!                                   ├─ grab:    unplace()
//!                                   └─ release: place(active) / try_place()
//! ```
//!
//! Everything physical or visual goes through [`host::PlacementHost`]; the
//! core only holds opaque ids and handles.

pub mod attachment;
pub mod candidates;
pub mod error;
pub mod grab;
pub mod highlight;
pub mod host;
pub mod ownership;
pub mod placer;
pub mod slot;

pub use attachment::{AttachMode, Attachment, AttachmentHandle, AttachmentState};
pub use candidates::CandidateList;
pub use error::PlacementError;
pub use grab::{GrabGate, GrabIntegration, LocalGrab, ReplicatedGrab, ReplicationClient};
pub use host::{
    AttachmentFactory, HighlightSink, NotificationSink, PlacementHost, SlotNotification,
    SlotOccupancy,
};
pub use ownership::{OwnershipGraph, request_ownership_of_attached};
pub use placer::SlotPlacer;
pub use slot::{HighlightId, Pose, SlotDescriptor, SlotId, SlotRegistry, TargetId};
