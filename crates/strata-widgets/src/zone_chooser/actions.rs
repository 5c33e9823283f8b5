//! Zone split / delete actions, with optional all-regions replication

use strata_model::{DimensionKind, Instrument, Region, ZoneError};

use super::events::ChooserOutput;
use super::report::BroadcastReport;
use super::state::ChooserState;

impl ChooserState {
    /// Split the main case's zone of the focused dimension in two.
    ///
    /// With the all-regions toggle set, the split is replicated across every
    /// region of the instrument declaring an identically shaped dimension;
    /// mismatched regions are counted in the returned report. On success the
    /// returned outputs carry the region-edited and selection-changed
    /// notifications for the surrounding application.
    pub fn split_zone(
        &mut self,
        instrument: &mut Instrument,
        region_index: usize,
    ) -> Result<(BroadcastReport, Vec<ChooserOutput>), ZoneError> {
        self.zone_action(instrument, region_index, Region::split_dimension_zone)
    }

    /// Delete the main case's zone of the focused dimension
    pub fn delete_zone(
        &mut self,
        instrument: &mut Instrument,
        region_index: usize,
    ) -> Result<(BroadcastReport, Vec<ChooserOutput>), ZoneError> {
        self.zone_action(instrument, region_index, Region::delete_dimension_zone)
    }

    fn zone_action(
        &mut self,
        instrument: &mut Instrument,
        region_index: usize,
        op: impl Fn(&mut Region, DimensionKind, u8) -> Result<(), ZoneError>,
    ) -> Result<(BroadcastReport, Vec<ChooserOutput>), ZoneError> {
        let Some(kind) = self.main_kind() else {
            log::warn!("zone_action: no dimension selected");
            return Ok((BroadcastReport::default(), Vec::new()));
        };
        let zone = self.main_case().get(&kind).copied().unwrap_or(0);
        let mut report = BroadcastReport::default();

        if !self.settings.modify_all_regions {
            let Some(region) = instrument.region_mut(region_index) else {
                log::warn!("zone_action: region {} vanished", region_index);
                return Ok((report, Vec::new()));
            };
            op(region, kind, zone)?;
        } else {
            // retain the definition by value: the origin region's own record
            // is mutated by the very operation being replicated
            let def = instrument
                .region(region_index)
                .and_then(|r| r.dimension_definition(kind).copied());
            let Some(def) = def else {
                log::warn!("zone_action: selected region lacks '{}' dimension", kind);
                return Ok((report, Vec::new()));
            };
            for ri in 0..instrument.region_count() {
                let Some(rgn) = instrument.region_mut(ri) else {
                    continue;
                };
                let Some(dimdef) = rgn.dimension_definition(kind).copied() else {
                    report.missing_dimension += 1;
                    continue;
                };
                if dimdef.zones != def.zones {
                    report.zone_count_mismatch += 1;
                    continue;
                }
                // a failure aborts here; earlier regions are not rolled back
                op(rgn, kind, zone)?;
            }
        }

        // the table was restructured, re-derive the selection against it
        let mut outputs = Vec::new();
        if let Some(region) = instrument.region(region_index) {
            outputs = self.set_region(Some(region));
        }
        outputs.push(ChooserOutput::RegionChanged);
        Ok((report, outputs))
    }
}
