//! Regions and their dense dimension-region tables
//!
//! A region owns up to [`MAX_DIMENSIONS`] dimension definitions and a dense
//! table of [`SLOT_COUNT`] dimension-region slots, indexed by the packed
//! concatenation of each dimension's bit field (see [`crate::case`]). Slots
//! whose decoded case is padding are `None`.

use crate::case::{self, DimensionCase};
use crate::dimension::{
    bits_for_zones, DimensionDef, DimensionKind, SplitPolicy, MAX_DIMENSIONS, MAX_TOTAL_BITS,
    SLOT_COUNT,
};
use crate::error::ZoneError;

/// Leaf parameter set for one concrete dimension case
///
/// Only the fields the zone chooser reads and writes are modeled; the real
/// format carries dozens more playback parameters per leaf.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DimensionRegion {
    /// Custom upper limit per dimension (indexed by dimension position in
    /// the region's definition order); 0 means "no custom limit recorded"
    pub upper_limits: [u8; MAX_DIMENSIONS],
    /// Legacy single-field velocity upper limit; must be kept equal to the
    /// velocity dimension's entry in `upper_limits` whenever that is written
    pub velocity_upper_limit: u8,
    /// Referenced sample, if any
    pub sample: Option<String>,
    /// Number of sample loops
    pub loops: u32,
}

/// One key range of an instrument, with its dimension layout and leaf table
#[derive(Debug, Clone)]
pub struct Region {
    /// Lowest and highest MIDI key this region responds to (inclusive)
    pub key_range: (u8, u8),
    defs: Vec<DimensionDef>,
    slots: Vec<Option<DimensionRegion>>,
}

impl Region {
    /// Create a region with no dimensions and a single default leaf
    pub fn new(key_range: (u8, u8)) -> Self {
        let mut slots = vec![None; SLOT_COUNT];
        slots[0] = Some(DimensionRegion::default());
        Self {
            key_range,
            defs: Vec::new(),
            slots,
        }
    }

    pub fn dimension_defs(&self) -> &[DimensionDef] {
        &self.defs
    }

    pub fn dimension_count(&self) -> usize {
        self.defs.len()
    }

    /// Position of `kind` within the definition order
    pub fn dimension_index(&self, kind: DimensionKind) -> Option<usize> {
        self.defs.iter().position(|d| d.kind == kind)
    }

    pub fn dimension_definition(&self, kind: DimensionKind) -> Option<&DimensionDef> {
        self.defs.iter().find(|d| d.kind == kind)
    }

    /// Sum of all dimensions' bit widths
    pub fn total_bits(&self) -> u8 {
        self.defs.iter().map(|d| d.bits).sum()
    }

    pub fn slot(&self, index: usize) -> Option<&DimensionRegion> {
        self.slots.get(index).and_then(|s| s.as_ref())
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut DimensionRegion> {
        self.slots.get_mut(index).and_then(|s| s.as_mut())
    }

    /// Decode a slot index against this region's dimension layout
    pub fn case_of(&self, index: usize) -> Option<DimensionCase> {
        case::case_of(index, &self.defs)
    }

    /// Effective upper limit of dimension `dim` stored on slot `index`,
    /// falling back to the legacy velocity field when the modern one is unset
    pub fn upper_limit_at(&self, index: usize, dim: usize) -> Option<u8> {
        let slot = self.slot(index)?;
        let limit = slot.upper_limits[dim];
        Some(if limit != 0 {
            limit
        } else {
            slot.velocity_upper_limit
        })
    }

    /// Add a dimension, multiplying the leaf table across its zones.
    ///
    /// Existing leaves keep their slot positions (the new dimension's bit
    /// field sits above all existing ones) and are cloned into every zone of
    /// the new dimension.
    pub fn add_dimension(&mut self, def: DimensionDef) -> Result<(), ZoneError> {
        if self.defs.len() >= MAX_DIMENSIONS {
            return Err(ZoneError::TooManyDimensions(MAX_DIMENSIONS));
        }
        if self.dimension_index(def.kind).is_some() {
            return Err(ZoneError::DuplicateDimension(def.kind));
        }
        if self.total_bits() + def.bits > MAX_TOTAL_BITS {
            return Err(ZoneError::BitBudgetExhausted {
                kind: def.kind,
                needed: def.bits,
                available: MAX_TOTAL_BITS - self.total_bits(),
            });
        }

        let mut new_defs = self.defs.clone();
        new_defs.push(def);
        self.rebuild_slots(&new_defs, |case| {
            let mut source = case.clone();
            source.remove(&def.kind);
            source
        });
        Ok(())
    }

    /// Split one zone of a dimension into two.
    ///
    /// Both halves inherit the split zone's leaf parameters. If the dimension
    /// carries custom limits, the new boundary lands at the midpoint of the
    /// old zone's range. May grow the dimension's bit width; fails if the
    /// region's 8-bit budget cannot accommodate that.
    pub fn split_dimension_zone(&mut self, kind: DimensionKind, zone: u8) -> Result<(), ZoneError> {
        let dim = self
            .dimension_index(kind)
            .ok_or(ZoneError::MissingDimension(kind))?;
        let def = self.defs[dim];
        if def.split_policy == SplitPolicy::BitExact {
            return Err(ZoneError::BitExactImmutable(kind));
        }
        if zone >= def.zones {
            return Err(ZoneError::ZoneOutOfRange {
                kind,
                zone,
                zones: def.zones,
            });
        }

        let new_zones = def.zones + 1;
        let new_bits = bits_for_zones(new_zones);
        let other_bits = self.total_bits() - def.bits;
        if other_bits + new_bits > MAX_TOTAL_BITS {
            return Err(ZoneError::BitBudgetExhausted {
                kind,
                needed: new_bits,
                available: MAX_TOTAL_BITS - other_bits,
            });
        }

        let mut new_defs = self.defs.clone();
        new_defs[dim] = DimensionDef {
            bits: new_bits,
            zones: new_zones,
            zone_size: 128.0 / new_zones as f32,
            ..def
        };

        let old_defs = self.defs.clone();
        let old_slots = std::mem::replace(&mut self.slots, vec![None; SLOT_COUNT]);
        self.defs = new_defs;

        for index in 0..SLOT_COUNT {
            let Some(case) = case::case_of(index, &self.defs) else {
                continue;
            };
            let new_zone = case[&kind];
            let source_zone = if new_zone <= zone { new_zone } else { new_zone - 1 };
            let mut source = case.clone();
            source.insert(kind, source_zone);
            let old_index = case::index_of(&source, &old_defs);
            let Some(mut leaf) = old_slots[old_index].clone() else {
                continue;
            };

            // reshape custom limits around the split boundary
            if leaf.upper_limits[dim] != 0 || (kind == DimensionKind::Velocity && leaf.velocity_upper_limit != 0)
            {
                let old_upper = if leaf.upper_limits[dim] != 0 {
                    leaf.upper_limits[dim]
                } else {
                    leaf.velocity_upper_limit
                };
                if new_zone == zone {
                    let old_lower = if zone == 0 {
                        0
                    } else {
                        let mut prev = source.clone();
                        prev.insert(kind, zone - 1);
                        let prev_index = case::index_of(&prev, &old_defs);
                        old_slots[prev_index]
                            .as_ref()
                            .map(|s| {
                                if s.upper_limits[dim] != 0 {
                                    s.upper_limits[dim]
                                } else {
                                    s.velocity_upper_limit
                                }
                            })
                            .unwrap_or(0)
                            .saturating_add(1)
                    };
                    let mid = old_lower + (old_upper.saturating_sub(old_lower)) / 2;
                    leaf.upper_limits[dim] = mid;
                    if kind == DimensionKind::Velocity {
                        leaf.velocity_upper_limit = mid;
                    }
                }
            }
            self.slots[index] = Some(leaf);
        }
        Ok(())
    }

    /// Delete one zone of a dimension; later zones shift down and the
    /// following zone absorbs the deleted range.
    pub fn delete_dimension_zone(&mut self, kind: DimensionKind, zone: u8) -> Result<(), ZoneError> {
        let dim = self
            .dimension_index(kind)
            .ok_or(ZoneError::MissingDimension(kind))?;
        let def = self.defs[dim];
        if def.split_policy == SplitPolicy::BitExact {
            return Err(ZoneError::BitExactImmutable(kind));
        }
        if zone >= def.zones {
            return Err(ZoneError::ZoneOutOfRange {
                kind,
                zone,
                zones: def.zones,
            });
        }
        if def.zones <= 2 {
            return Err(ZoneError::TooFewZones(kind));
        }

        let new_zones = def.zones - 1;
        let mut new_defs = self.defs.clone();
        new_defs[dim] = DimensionDef {
            bits: bits_for_zones(new_zones),
            zones: new_zones,
            zone_size: 128.0 / new_zones as f32,
            ..def
        };

        let old_defs = std::mem::replace(&mut self.defs, new_defs);
        let old_slots = std::mem::replace(&mut self.slots, vec![None; SLOT_COUNT]);

        for index in 0..SLOT_COUNT {
            let Some(case) = case::case_of(index, &self.defs) else {
                continue;
            };
            let new_zone = case[&kind];
            let source_zone = if new_zone < zone { new_zone } else { new_zone + 1 };
            let mut source = case.clone();
            source.insert(kind, source_zone);
            let old_index = case::index_of(&source, &old_defs);
            let Some(mut leaf) = old_slots[old_index].clone() else {
                continue;
            };

            // custom limits: the new last zone must still reach 127
            let custom = leaf.upper_limits[dim] != 0
                || (kind == DimensionKind::Velocity && leaf.velocity_upper_limit != 0);
            if custom && new_zone == new_zones - 1 {
                leaf.upper_limits[dim] = 127;
                if kind == DimensionKind::Velocity {
                    leaf.velocity_upper_limit = 127;
                }
            }
            self.slots[index] = Some(leaf);
        }
        Ok(())
    }

    /// Rebuild the slot table under a new dimension layout, cloning each new
    /// case's leaf from the old case produced by `source_case`
    fn rebuild_slots(
        &mut self,
        new_defs: &[DimensionDef],
        source_case: impl Fn(&DimensionCase) -> DimensionCase,
    ) {
        let old_defs = std::mem::replace(&mut self.defs, new_defs.to_vec());
        let old_slots = std::mem::replace(&mut self.slots, vec![None; SLOT_COUNT]);
        for index in 0..SLOT_COUNT {
            let Some(case) = case::case_of(index, &self.defs) else {
                continue;
            };
            let old_index = case::index_of(&source_case(&case), &old_defs);
            self.slots[index] = old_slots[old_index].clone();
        }
    }
}
