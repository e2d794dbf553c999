use bevy::color::Color;

/// Base colour of a slot's highlight mesh.
pub const HIGHLIGHT_COLOUR: Color = Color::srgba(0.2, 0.9, 1.0, 0.45);

/// Colour of the slot pad itself.
pub const SLOT_PAD_COLOUR: Color = Color::srgb(0.35, 0.35, 0.4);

/// Colour of a placeable object in the sandbox scene.
pub const PLACEABLE_COLOUR: Color = Color::srgb(1.0, 0.55, 0.1);

/// Highlight mesh is scaled relative to the trigger volume so it reads as a
/// shell around the pad.
pub const HIGHLIGHT_SCALE: f32 = 1.05;
