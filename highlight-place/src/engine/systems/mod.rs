/// Resolving placeable slot bindings into registries.
pub mod binding;

/// Trigger overlap detection and enter/exit application.
pub mod triggers;

/// Grab signals, ownership grants, and replicated grab requests.
pub mod grab;

/// Pose snapping, joint/anchor following, and attachment cleanup.
pub mod attachments;

/// Ownership propagation along placement chains.
pub mod ownership;

pub mod notifications;
