//! Bevy integration for the placement core.
//!
//! Slots are trigger-volume entities carrying [`components::PlacementSlot`];
//! movable objects carry [`components::Placeable`], which owns the core
//! `SlotPlacer` once its slots resolve. Overlaps, grabs and ownership grants
//! arrive as events and are applied in [`plugin::PlacementSet`] order.

pub mod components;
pub mod events;
pub mod host;
pub mod layout;
pub mod plugin;
pub mod settings;
pub mod systems;
