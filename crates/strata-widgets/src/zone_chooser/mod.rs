//! Dimension zone chooser widget
//!
//! A visual editor for the dimension-zone grid of a sampler region: one row
//! per dimension, one cell per zone, with the currently sounding leaf
//! (dimension region) highlighted.
//!
//! ## Architecture
//!
//! - **State struct**: [`ChooserState`] holds selection, focus, and drag
//!   state, and consumes toolkit-independent [`InputEvent`]s
//! - **View function**: [`zone_chooser`] takes state + region + a callback,
//!   returns `Element<Message>`
//! - **Canvas Program**: translates iced events into [`InputEvent`]s and
//!   paints the grid; it holds no editing logic of its own
//!
//! ## Interaction
//!
//! - Click a cell: select that zone (main selection, blue)
//! - Ctrl-click: toggle zones in the multi-selection (lighter blue)
//! - Drag a zone boundary: resize the adjacent zones
//! - Arrow keys: move the selection; up/down switch the focused row
//! - Right-click: selection plus a context-menu request
//!
//! Broadcast toggles in [`ChooserSettings`] widen edits to the twin stereo
//! leaf, to every leaf of the region, or to every region of the instrument.

pub mod actions;
pub mod events;
pub mod layout;
pub mod report;
pub mod resize;
pub mod settings;
pub mod state;
pub mod view;

pub use events::{ChooserOutput, InputEvent, Key, PointerButton};
pub use layout::{ChooserLayout, DEFAULT_LABEL_WIDTH, RESIZE_GRIP_PX, ROW_HEIGHT};
pub use report::{BroadcastReport, ReportSeverity};
pub use resize::{DragSide, ResizeDrag};
pub use settings::{
    chooser_settings_path, default_config_dir, load_chooser_settings, save_chooser_settings,
    ChooserSettings, CHOOSER_SETTINGS_FILENAME,
};
pub use state::ChooserState;
pub use view::{chooser_height, zone_chooser, ZoneChooserCanvas};
