//! Zone-boundary resize: drag state and write policy
//!
//! A drag moves one zone's upper limit. Writing it is more involved than a
//! single field store: dimensions without custom limits are back-filled with
//! uniform defaults first, the velocity dimension keeps a modern and a
//! legacy field consistent, and the broadcast toggles replicate the write to
//! the paired stereo channel, to sibling dimension-region combinations, and
//! to other regions of the instrument with an identically shaped dimension.

use strata_model::{
    base_bits, matching_indices, DimensionDef, DimensionKind, Instrument, SLOT_COUNT,
};

use super::layout::{dim_bit_offset, dim_stencil};
use super::report::BroadcastReport;
use super::settings::ChooserSettings;

/// Which side of the dragged boundary held the main selection when the drag
/// started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSide {
    None,
    Left,
    Right,
}

/// State carried across one resize gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeDrag {
    /// Position of the resized dimension in the region's definition order
    pub dimension: usize,
    /// Value copy of the definition; the region's own record may be mutated
    /// while the edit is replicated
    pub def: DimensionDef,
    /// Zone whose upper boundary is being moved
    pub zone: u8,
    /// Candidate boundary position (`upper limit + 1`)
    pub pos: u8,
    pub min: u8,
    pub max: u8,
    pub side: DragSide,
}

impl ResizeDrag {
    /// Clamp a candidate boundary into `[min, max]`, never below 2
    /// (an upper limit of 0 for zone 0 is reserved for "no custom limit")
    pub fn clamp(&self, candidate: i32) -> u8 {
        candidate.clamp(self.min.max(2) as i32, self.max as i32) as u8
    }
}

/// Write the drag's current boundary into the instrument, honoring the
/// broadcast toggles. Returns counts of sibling regions that had to be
/// skipped during an all-regions broadcast.
pub(crate) fn apply_resize(
    drag: &ResizeDrag,
    settings: ChooserSettings,
    main_slot: usize,
    instrument: &mut Instrument,
    region_index: usize,
) -> BroadcastReport {
    let mut report = BroadcastReport::default();
    let upper_limit = drag.pos - 1;
    let kind = drag.def.kind;
    let dim = drag.dimension;

    let Some(region) = instrument.region_mut(region_index) else {
        log::warn!("apply_resize: region {} vanished", region_index);
        return report;
    };
    let defs = region.dimension_defs().to_vec();
    if dim >= defs.len() || defs[dim].kind != kind {
        log::warn!("apply_resize: dimension layout changed under the drag");
        return report;
    }
    let bitpos = dim_bit_offset(&defs, dim);
    let stencil = dim_stencil(&defs, dim);
    let base = main_slot & stencil;
    let zones = defs[dim].zones;
    let selection = (drag.zone as usize) << bitpos;

    // back-fill uniform defaults before the first custom boundary appears,
    // so the remaining zones don't end up undefined
    let modern_unset = region
        .slot(base)
        .map(|s| s.upper_limits[dim] == 0)
        .unwrap_or(false);
    if modern_unset {
        for raw in 0..SLOT_COUNT {
            for zone in 0..zones {
                let index = (raw & stencil) | ((zone as usize) << bitpos);
                if let Some(slot) = region.slot_mut(index) {
                    slot.upper_limits[dim] = drag.def.uniform_upper_limit(zone);
                }
            }
        }
    }

    if kind == DimensionKind::Velocity {
        // the legacy single-field limit is back-filled separately; both
        // representations must always end up equal
        let legacy_unset = region
            .slot(base)
            .map(|s| s.velocity_upper_limit == 0)
            .unwrap_or(false);
        if legacy_unset {
            for raw in 0..SLOT_COUNT {
                for zone in 0..zones {
                    let index = (raw & stencil) | ((zone as usize) << bitpos);
                    if let Some(slot) = region.slot_mut(index) {
                        slot.velocity_upper_limit = drag.def.uniform_upper_limit(zone);
                    }
                }
            }
        }

        let index = base | selection;
        if let Some(slot) = region.slot_mut(index) {
            slot.upper_limits[dim] = upper_limit;
            slot.velocity_upper_limit = upper_limit;
        }
        if settings.modify_both_channels {
            if let Some(stereo_bitpos) = base_bits(DimensionKind::SampleChannel, &defs) {
                if let Some(slot) = region.slot_mut(index ^ (1 << stereo_bitpos)) {
                    slot.upper_limits[dim] = upper_limit;
                    slot.velocity_upper_limit = upper_limit;
                }
            }
        }

        if settings.modify_all_dim_regions {
            for ri in 0..instrument.region_count() {
                if !settings.modify_all_regions && ri != region_index {
                    continue;
                }
                broadcast_masked_write(
                    instrument,
                    ri,
                    ri == region_index,
                    drag,
                    upper_limit,
                    true,
                    &mut report,
                );
            }
        } else if settings.modify_all_regions {
            // resolve the precise case being edited; the other dimensions'
            // bit offsets may differ structurally between regions
            let full_case = instrument
                .region(region_index)
                .and_then(|r| r.case_of(index));
            let Some(full_case) = full_case else {
                log::warn!("apply_resize: edited slot {} decodes as padding", index);
                return report;
            };
            for ri in 0..instrument.region_count() {
                if ri == region_index {
                    continue;
                }
                let Some(rgn) = instrument.region_mut(ri) else {
                    continue;
                };
                let Some(idim) = rgn.dimension_index(kind) else {
                    report.missing_dimension += 1;
                    continue;
                };
                if rgn.dimension_defs()[idim].zones != drag.def.zones {
                    report.zone_count_mismatch += 1;
                    continue;
                }
                for idx in matching_indices(&full_case, rgn.dimension_defs()) {
                    if let Some(dr) = rgn.slot_mut(idx) {
                        dr.upper_limits[idim] = upper_limit;
                        dr.velocity_upper_limit = upper_limit;
                    }
                }
            }
        }
    } else {
        // non-velocity dimensions share zone sizes across all cases, so the
        // write always covers every combination of the other dimensions
        for raw in 0..SLOT_COUNT {
            let idx = (raw & stencil) | selection;
            if let Some(slot) = region.slot_mut(idx) {
                slot.upper_limits[dim] = upper_limit;
            }
        }

        if settings.modify_all_regions {
            for ri in 0..instrument.region_count() {
                if ri == region_index {
                    continue;
                }
                broadcast_masked_write(
                    instrument,
                    ri,
                    false,
                    drag,
                    upper_limit,
                    false,
                    &mut report,
                );
            }
        }
    }

    report
}

/// Write `upper_limit` into every slot of region `ri` matching the drag's
/// zone of its dimension kind, after checking the dimension shape matches.
fn broadcast_masked_write(
    instrument: &mut Instrument,
    ri: usize,
    is_origin: bool,
    drag: &ResizeDrag,
    upper_limit: u8,
    velocity: bool,
    report: &mut BroadcastReport,
) {
    let Some(rgn) = instrument.region_mut(ri) else {
        return;
    };
    let Some(idim) = rgn.dimension_index(drag.def.kind) else {
        if !is_origin {
            report.missing_dimension += 1;
        }
        return;
    };
    if rgn.dimension_defs()[idim].zones != drag.def.zones {
        if !is_origin {
            report.zone_count_mismatch += 1;
        }
        return;
    }
    let defs = rgn.dimension_defs().to_vec();
    let bitpos = dim_bit_offset(&defs, idim);
    let stencil = dim_stencil(&defs, idim);
    let selection = (drag.zone as usize) << bitpos;
    for raw in 0..SLOT_COUNT {
        let index = (raw & stencil) | selection;
        if let Some(dr) = rgn.slot_mut(index) {
            dr.upper_limits[idim] = upper_limit;
            if velocity {
                dr.velocity_upper_limit = upper_limit;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_model::{Region, SplitPolicy};

    fn stereo_velocity_instrument() -> Instrument {
        let mut region = Region::new((36, 48));
        region
            .add_dimension(DimensionDef::new(
                DimensionKind::Velocity,
                4,
                SplitPolicy::Uniform,
            ))
            .unwrap();
        region
            .add_dimension(DimensionDef::new(
                DimensionKind::SampleChannel,
                2,
                SplitPolicy::BitExact,
            ))
            .unwrap();
        let mut instr = Instrument::new("kit");
        instr.add_region(region);
        instr
    }

    fn velocity_drag(zone: u8, pos: u8) -> ResizeDrag {
        ResizeDrag {
            dimension: 0,
            def: DimensionDef::new(DimensionKind::Velocity, 4, SplitPolicy::Uniform),
            zone,
            pos,
            min: 32,
            max: 96,
            side: DragSide::Left,
        }
    }

    #[test]
    fn test_clamp_floor_is_two() {
        let mut drag = velocity_drag(1, 64);
        drag.min = 0;
        assert_eq!(drag.clamp(0), 2);
        assert_eq!(drag.clamp(1), 2);
        assert_eq!(drag.clamp(50), 50);
        assert_eq!(drag.clamp(120), 96);
    }

    #[test]
    fn test_resize_backfills_uniform_defaults() {
        let mut instr = stereo_velocity_instrument();
        let drag = velocity_drag(1, 70);
        apply_resize(&drag, ChooserSettings::default(), 0, &mut instr, 0);
        let region = instr.region(0).unwrap();
        // untouched zones carry the uniform defaults, coverage stays
        // contiguous over [0, 127]
        assert_eq!(region.slot(0).unwrap().upper_limits[0], 31);
        assert_eq!(region.slot(1).unwrap().upper_limits[0], 69);
        assert_eq!(region.slot(2).unwrap().upper_limits[0], 95);
        assert_eq!(region.slot(3).unwrap().upper_limits[0], 127);
    }

    #[test]
    fn test_velocity_fields_stay_equal() {
        let mut instr = stereo_velocity_instrument();
        let drag = velocity_drag(1, 70);
        apply_resize(&drag, ChooserSettings::default(), 0, &mut instr, 0);
        let region = instr.region(0).unwrap();
        for zone in 0..4usize {
            let slot = region.slot(zone).unwrap();
            assert_eq!(slot.upper_limits[0], slot.velocity_upper_limit);
        }
    }

    #[test]
    fn test_stereo_broadcast_mirrors_other_channel() {
        let mut instr = stereo_velocity_instrument();
        let drag = velocity_drag(1, 70);
        let settings = ChooserSettings {
            modify_both_channels: true,
            ..Default::default()
        };
        // main case on channel 1: slot index 1<<2 | zone 1
        apply_resize(&drag, settings, 0b101, &mut instr, 0);
        let region = instr.region(0).unwrap();
        let index = 0b101;
        let mirrored = index ^ (1 << 2);
        assert_eq!(region.slot(index).unwrap().upper_limits[0], 69);
        assert_eq!(region.slot(mirrored).unwrap().upper_limits[0], 69);
    }

    #[test]
    fn test_without_stereo_toggle_other_channel_keeps_default() {
        let mut instr = stereo_velocity_instrument();
        let drag = velocity_drag(1, 70);
        apply_resize(&drag, ChooserSettings::default(), 0b101, &mut instr, 0);
        let region = instr.region(0).unwrap();
        assert_eq!(region.slot(0b101).unwrap().upper_limits[0], 69);
        // other channel got only the back-filled default
        assert_eq!(region.slot(0b001).unwrap().upper_limits[0], 63);
    }

    #[test]
    fn test_all_regions_broadcast_skips_and_reports() {
        let mut instr = stereo_velocity_instrument();
        // same shape: gets the edit
        let mut twin = Region::new((49, 60));
        twin.add_dimension(DimensionDef::new(
            DimensionKind::Velocity,
            4,
            SplitPolicy::Uniform,
        ))
        .unwrap();
        instr.add_region(twin);
        // different zone count: skipped, critical
        let mut other = Region::new((61, 72));
        other
            .add_dimension(DimensionDef::new(
                DimensionKind::Velocity,
                2,
                SplitPolicy::Uniform,
            ))
            .unwrap();
        instr.add_region(other);
        // no velocity dimension at all: skipped, minor
        instr.add_region(Region::new((73, 127)));

        let drag = velocity_drag(1, 70);
        let settings = ChooserSettings {
            modify_all_regions: true,
            ..Default::default()
        };
        let report = apply_resize(&drag, settings, 0, &mut instr, 0);
        assert_eq!(report.missing_dimension, 1);
        assert_eq!(report.zone_count_mismatch, 1);

        let twin = instr.region(1).unwrap();
        assert_eq!(twin.slot(1).unwrap().upper_limits[0], 69);
        assert_eq!(twin.slot(1).unwrap().velocity_upper_limit, 69);
        // mismatched region untouched
        let other = instr.region(2).unwrap();
        assert_eq!(other.slot(0).unwrap().upper_limits[0], 0);
    }

    #[test]
    fn test_all_dim_regions_covers_every_combination() {
        let mut instr = stereo_velocity_instrument();
        let drag = velocity_drag(2, 80);
        let settings = ChooserSettings {
            modify_all_dim_regions: true,
            ..Default::default()
        };
        apply_resize(&drag, settings, 0, &mut instr, 0);
        let region = instr.region(0).unwrap();
        // zone 2 on both channels carries the new limit
        assert_eq!(region.slot(2).unwrap().upper_limits[0], 79);
        assert_eq!(region.slot(2 | (1 << 2)).unwrap().upper_limits[0], 79);
        assert_eq!(region.slot(2 | (1 << 2)).unwrap().velocity_upper_limit, 79);
    }

    #[test]
    fn test_non_velocity_resize_covers_all_cases_without_legacy() {
        let mut region = Region::new((0, 127));
        region
            .add_dimension(DimensionDef::new(
                DimensionKind::ModWheel,
                4,
                SplitPolicy::Uniform,
            ))
            .unwrap();
        region
            .add_dimension(DimensionDef::new(
                DimensionKind::Layer,
                2,
                SplitPolicy::Uniform,
            ))
            .unwrap();
        let mut instr = Instrument::new("pad");
        instr.add_region(region);

        let drag = ResizeDrag {
            dimension: 0,
            def: DimensionDef::new(DimensionKind::ModWheel, 4, SplitPolicy::Uniform),
            zone: 0,
            pos: 20,
            min: 0,
            max: 64,
            side: DragSide::None,
        };
        apply_resize(&drag, ChooserSettings::default(), 0, &mut instr, 0);
        let region = instr.region(0).unwrap();
        for layer in 0..2usize {
            let index = layer << 2;
            assert_eq!(region.slot(index).unwrap().upper_limits[0], 19);
            // legacy velocity field untouched for non-velocity dimensions
            assert_eq!(region.slot(index).unwrap().velocity_upper_limit, 0);
        }
    }
}
