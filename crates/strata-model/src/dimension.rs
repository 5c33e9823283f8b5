//! Dimension axes of an instrument region
//!
//! A region varies its playback parameters along up to [`MAX_DIMENSIONS`]
//! axes ("dimensions"), each split into a fixed number of discrete zones.
//! The per-dimension bit widths sum to at most 8, so a region never holds
//! more than 256 leaf parameter sets.

use serde::{Deserialize, Serialize};

/// Maximum number of dimensions a region may declare
pub const MAX_DIMENSIONS: usize = 5;

/// Total bit budget shared by all dimensions of one region
pub const MAX_TOTAL_BITS: u8 = 8;

/// Number of dimension-region slots in a region's dense table (2^8)
pub const SLOT_COUNT: usize = 256;

/// Axis kinds a dimension can represent
///
/// The set mirrors the controller sources of the underlying sample format.
/// Ordering of dimensions within a region comes from the region's definition
/// list, never from these variants' discriminants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DimensionKind {
    None,
    SampleChannel,
    Layer,
    Velocity,
    ChannelAftertouch,
    ReleaseTrigger,
    KeySwitch,
    RoundRobin,
    Random,
    SmartMidi,
    RoundRobinKey,
    ModWheel,
    Breath,
    Foot,
    PortamentoTime,
    Effect1,
    Effect2,
    GenPurpose1,
    GenPurpose2,
    GenPurpose3,
    GenPurpose4,
    SustainPedal,
    Portamento,
    SostenutoPedal,
    SoftPedal,
    GenPurpose5,
    GenPurpose6,
    GenPurpose7,
    GenPurpose8,
    Effect1Depth,
    Effect2Depth,
    Effect3Depth,
    Effect4Depth,
    Effect5Depth,
}

impl DimensionKind {
    /// Display label, as shown in the chooser's left gutter
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::SampleChannel => "samplechannel",
            Self::Layer => "layer",
            Self::Velocity => "velocity",
            Self::ChannelAftertouch => "channelaftertouch",
            Self::ReleaseTrigger => "releasetrigger",
            Self::KeySwitch => "keyswitching",
            Self::RoundRobin => "roundrobin",
            Self::Random => "random",
            Self::SmartMidi => "smartmidi",
            Self::RoundRobinKey => "roundrobinkeyboard",
            Self::ModWheel => "modwheel",
            Self::Breath => "breath",
            Self::Foot => "foot",
            Self::PortamentoTime => "portamentotime",
            Self::Effect1 => "effect1",
            Self::Effect2 => "effect2",
            Self::GenPurpose1 => "genpurpose1",
            Self::GenPurpose2 => "genpurpose2",
            Self::GenPurpose3 => "genpurpose3",
            Self::GenPurpose4 => "genpurpose4",
            Self::SustainPedal => "sustainpedal",
            Self::Portamento => "portamento",
            Self::SostenutoPedal => "sostenutopedal",
            Self::SoftPedal => "softpedal",
            Self::GenPurpose5 => "genpurpose5",
            Self::GenPurpose6 => "genpurpose6",
            Self::GenPurpose7 => "genpurpose7",
            Self::GenPurpose8 => "genpurpose8",
            Self::Effect1Depth => "effect1depth",
            Self::Effect2Depth => "effect2depth",
            Self::Effect3Depth => "effect3depth",
            Self::Effect4Depth => "effect4depth",
            Self::Effect5Depth => "effect5depth",
        }
    }
}

impl std::fmt::Display for DimensionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// How a dimension's zone boundaries are determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitPolicy {
    /// Zones cover [0, 127] in equal arithmetic shares; boundaries are
    /// derived, never stored
    Uniform,
    /// Each zone stores its own upper limit (currently only meaningful for
    /// the velocity dimension)
    Custom,
    /// Zone per bit value; fixed width, boundaries can never be moved
    BitExact,
}

/// Declaration of one dimension within a region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionDef {
    pub kind: DimensionKind,
    /// Bit width of this dimension's field in the packed slot index
    pub bits: u8,
    /// Number of used zones; values decoded above this are padding
    pub zones: u8,
    pub split_policy: SplitPolicy,
    /// Width of one zone in controller units for uniform splits (128/zones)
    pub zone_size: f32,
}

impl DimensionDef {
    /// Create a definition with the minimum bit width for `zones`
    pub fn new(kind: DimensionKind, zones: u8, split_policy: SplitPolicy) -> Self {
        Self {
            kind,
            bits: bits_for_zones(zones),
            zones,
            split_policy,
            zone_size: if zones > 0 { 128.0 / zones as f32 } else { 0.0 },
        }
    }

    /// Default upper limit of zone `j` under a uniform split:
    /// `floor(128 * (j + 1) / zones) - 1`
    pub fn uniform_upper_limit(&self, zone: u8) -> u8 {
        (128.0 * (zone as f64 + 1.0) / self.zones as f64) as u8 - 1
    }

    /// Lower bound of zone `j` under a uniform split: `floor(128 * j / zones)`
    pub fn uniform_lower_bound(&self, zone: u8) -> u8 {
        (128.0 * zone as f64 / self.zones as f64) as u8
    }
}

/// Minimum number of bits needed to index `zones` zones
pub fn bits_for_zones(zones: u8) -> u8 {
    match zones {
        0 | 1 => 0,
        _ => 8 - (zones - 1).leading_zeros() as u8,
    }
}
