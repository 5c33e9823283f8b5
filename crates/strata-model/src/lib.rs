//! In-memory sample-instrument object model
//!
//! Models the slice of a sampler's instrument format that the strata editor
//! widgets read and write: regions with up to five bit-packed dimension
//! axes, their dense 256-slot leaf tables, per-zone custom limits, and the
//! structural zone edits (split / delete).
//!
//! The widget crate never owns these objects; it mutates them in place in
//! response to user input and recomputes its own derived state afterwards.

pub mod case;
pub mod dimension;
pub mod error;
pub mod instrument;
pub mod region;

pub use case::{base_bits, case_of, index_of, matching_indices, zone_stencil, DimensionCase};
pub use dimension::{
    bits_for_zones, DimensionDef, DimensionKind, SplitPolicy, MAX_DIMENSIONS, MAX_TOTAL_BITS,
    SLOT_COUNT,
};
pub use error::ZoneError;
pub use instrument::Instrument;
pub use region::{DimensionRegion, Region};
