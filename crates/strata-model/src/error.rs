//! Error type for structural edits of the region model

use thiserror::Error;

use crate::dimension::DimensionKind;

/// Failures raised by zone-level edits of a region's dimension layout
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZoneError {
    #[error("region has no '{0}' dimension")]
    MissingDimension(DimensionKind),

    #[error("zone {zone} out of range, '{kind}' has {zones} zones")]
    ZoneOutOfRange {
        kind: DimensionKind,
        zone: u8,
        zones: u8,
    },

    #[error("'{0}' is a bit-exact dimension, its zones are fixed")]
    BitExactImmutable(DimensionKind),

    #[error("splitting '{kind}' needs {needed} bits but only {available} are free")]
    BitBudgetExhausted {
        kind: DimensionKind,
        needed: u8,
        available: u8,
    },

    #[error("'{0}' has only two zones left, delete the dimension instead")]
    TooFewZones(DimensionKind),

    #[error("region already has a '{0}' dimension")]
    DuplicateDimension(DimensionKind),

    #[error("region cannot hold more than {0} dimensions")]
    TooManyDimensions(usize),
}
