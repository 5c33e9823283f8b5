//! Shared UI widgets for the strata instrument editor
//!
//! This crate provides the iced widgets the editor builds its region panes
//! from, most prominently the dimension zone chooser.
//!
//! ## Architecture (iced 0.14 patterns)
//!
//! - **State structs**: Pure data (`ChooserState`), mutated through a single
//!   input-event entry point
//! - **View functions**: Take state + callbacks, return `Element<Message>`
//! - **Canvas Programs**: Handle custom rendering and event-to-callback
//!   translation
//!
//! ## Current Features
//!
//! - **Zone chooser**: row-per-dimension grid with zone selection,
//!   multi-selection, boundary dragging, and keyboard navigation
//! - **Broadcast settings**: widen edits to the stereo twin, all leaves of a
//!   region, or all regions, persisted to a YAML config file
//! - **Form controls**: labeled sliders, note entry, checkbox, and drop-down
//!   wrappers for parameter panes

pub mod controls;
pub mod theme;
pub mod zone_chooser;

// Re-export commonly used items
pub use controls::{bool_entry, choice_entry, note_entry, note_name, num_entry, parse_note};

pub use zone_chooser::{
    BroadcastReport, ChooserLayout, ChooserOutput, ChooserSettings, ChooserState, InputEvent,
    Key, PointerButton, ReportSeverity,
    // Constants
    DEFAULT_LABEL_WIDTH, RESIZE_GRIP_PX, ROW_HEIGHT,
};

// Settings file I/O
pub use zone_chooser::{
    chooser_settings_path, default_config_dir, load_chooser_settings, save_chooser_settings,
    CHOOSER_SETTINGS_FILENAME,
};

// View functions (idiomatic iced 0.14 pattern)
pub use zone_chooser::{chooser_height, zone_chooser};
