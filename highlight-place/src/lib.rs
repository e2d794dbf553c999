//! Grab-and-place for movable objects: slot candidate tracking, highlight
//! feedback, and joint or anchor attachment.
//!
//! [`placement`] is the engine-agnostic state machine. [`engine`] wires it
//! into Bevy.

pub mod engine;
pub mod placement;

pub use engine::layout::SlotLayoutPlugin;
pub use engine::plugin::{PlacementPlugin, PlacementSet};
pub use engine::settings::PlacementSettings;
