//! Toolkit-independent input events and chooser notifications
//!
//! The chooser consumes a plain event enum instead of wiring itself to any
//! particular toolkit's callback signatures; the canvas layer translates
//! iced events into these, and headless tests feed them directly.

/// Pointer buttons the chooser distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    /// Right button, opens the zone context menu
    Secondary,
}

/// Keys the chooser reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Ctrl, toggles zones into the multi-selection
    MultiSelect,
    /// Cmd on macOS, Ctrl elsewhere; reserved for application accelerators
    Primary,
    Shift,
    Left,
    Right,
    Up,
    Down,
}

/// One input event in widget-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32, button: PointerButton },
    PointerMoved { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
    KeyDown(Key),
    KeyUp(Key),
}

/// Notifications emitted towards the surrounding application
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChooserOutput {
    /// The active dimension-case selection changed
    SelectionChanged,
    /// An edit (resize) has been committed to the region
    RegionChanged,
    /// The user asked for the zone context menu at this position
    ContextMenu { x: f32, y: f32 },
}
