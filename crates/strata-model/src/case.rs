//! Mapping between packed slot indices and per-dimension zone tuples
//!
//! A region's 256 dimension-region slots are indexed by the concatenation of
//! each dimension's bit field, in definition order:
//!
//! ```text
//! index = Σ zone_d << offset_d      offset_d = Σ bits of earlier dimensions
//! ```
//!
//! A "dimension case" is the decoded form: one selected zone index per
//! dimension, possibly partial. The helpers here decode, encode, and
//! enumerate sibling slots for broadcast edits.

use std::collections::BTreeMap;

use crate::dimension::{DimensionDef, DimensionKind, SLOT_COUNT};

/// Zone index selected per dimension kind; partial cases omit kinds
pub type DimensionCase = BTreeMap<DimensionKind, u8>;

/// Decode a packed slot index into a dimension case.
///
/// Returns `None` for padding slots: slots whose decoded zone index for some
/// dimension lies at or beyond that dimension's declared zone count. Callers
/// enumerating all 256 slots must skip those.
pub fn case_of(index: usize, defs: &[DimensionDef]) -> Option<DimensionCase> {
    let mut case = DimensionCase::new();
    let mut offset = 0u32;
    for def in defs {
        let zone = ((index >> offset) & ((1 << def.bits) - 1)) as u8;
        if zone >= def.zones {
            return None;
        }
        case.insert(def.kind, zone);
        offset += def.bits as u32;
    }
    // bits above the layout's total width encode nothing; such slots are
    // outside the region's table
    if index >> offset != 0 {
        return None;
    }
    Some(case)
}

/// Encode a (possibly partial) dimension case into a packed slot index.
///
/// Dimensions absent from the case contribute zero bits.
pub fn index_of(case: &DimensionCase, defs: &[DimensionDef]) -> usize {
    let mut index = 0usize;
    let mut offset = 0u32;
    for def in defs {
        if let Some(&zone) = case.get(&def.kind) {
            index |= (zone as usize) << offset;
        }
        offset += def.bits as u32;
    }
    index
}

/// Bit offset of `kind`'s field within the packed index, if the dimension
/// layout declares it
pub fn base_bits(kind: DimensionKind, defs: &[DimensionDef]) -> Option<u32> {
    let mut offset = 0u32;
    for def in defs {
        if def.kind == kind {
            return Some(offset);
        }
        offset += def.bits as u32;
    }
    None
}

/// Stencil clearing `kind`'s bit field: `index & stencil` holds every other
/// dimension fixed while zeroing this one
pub fn zone_stencil(kind: DimensionKind, defs: &[DimensionDef]) -> Option<usize> {
    let mut offset = 0u32;
    for def in defs {
        if def.kind == kind {
            return Some(!(((1usize << def.bits) - 1) << offset) & (SLOT_COUNT - 1));
        }
        offset += def.bits as u32;
    }
    None
}

/// Enumerate all valid slot indices matching a partial case: the case's
/// dimensions are pinned to their selected zones, every other dimension runs
/// over all of its zones.
///
/// Deliberately a flat O(256) scan with deduplication rather than a
/// combinatorial walk over the free dimensions; the slot count is small and
/// bounded.
pub fn matching_indices(case: &DimensionCase, defs: &[DimensionDef]) -> Vec<usize> {
    let mut stencil = SLOT_COUNT - 1;
    let mut selection = 0usize;
    let mut offset = 0u32;
    for def in defs {
        if let Some(&zone) = case.get(&def.kind) {
            stencil &= !(((1usize << def.bits) - 1) << offset);
            selection |= (zone as usize) << offset;
        }
        offset += def.bits as u32;
    }

    let mut seen = [false; SLOT_COUNT];
    let mut indices = Vec::new();
    for raw in 0..SLOT_COUNT {
        let index = (raw & stencil) | selection;
        if seen[index] {
            continue;
        }
        seen[index] = true;
        if case_of(index, defs).is_some() {
            indices.push(index);
        }
    }
    indices
}
