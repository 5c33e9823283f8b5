//! Shared colors for the strata editor widgets

use iced::Color;

/// Zone fill for the main (last clicked) selection
pub const SELECTION_BLUE: Color = Color::from_rgb(0.28, 0.59, 1.0);

/// Accent red used for warning states
pub const ACCENT_RED: Color = Color::from_rgb(1.0, 0.28, 0.43);

/// Zone fill for multi-selected zones
pub const MULTI_SELECT_BLUE: Color = Color {
    r: 0.28,
    g: 0.59,
    b: 1.0,
    a: 0.45,
};

/// Zone tint for zones that a broadcast toggle would also edit
pub const BROADCAST_TINT: Color = Color {
    r: 0.28,
    g: 0.59,
    b: 1.0,
    a: 0.18,
};

pub const ZONE_BACKGROUND: Color = Color::from_rgb(0.97, 0.97, 0.97);
pub const ZONE_BORDER: Color = Color::from_rgb(0.08, 0.08, 0.08);
pub const LABEL_TEXT: Color = Color::from_rgb(0.85, 0.85, 0.85);
pub const VALUE_TEXT: Color = Color::from_rgb(0.15, 0.15, 0.15);

/// Dot drawn when every matching leaf references a sample
pub const SAMPLE_REF_OK: Color = Color::from_rgb(0.93, 0.79, 0.16);

/// Dot drawn when some matching leaf lacks a sample reference
pub const SAMPLE_REF_MISSING: Color = Color::from_rgb(0.86, 0.18, 0.18);

/// Loop glyph when every matching leaf loops
pub const LOOP_ALL: Color = Color::from_rgb(0.1, 0.1, 0.1);

/// Loop glyph when only some matching leaves loop
pub const LOOP_SOME: Color = Color::from_rgb(0.55, 0.55, 0.55);
