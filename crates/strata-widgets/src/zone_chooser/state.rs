//! Selection bookkeeping and the input state machine
//!
//! All pointer and keyboard handling funnels through
//! [`ChooserState::handle_event`]; the canvas layer only translates toolkit
//! events and draws. The state never owns the region graph, it receives the
//! instrument mutably per event and keeps its own derived selection state
//! consistent with it.

use std::collections::{BTreeMap, BTreeSet};

use strata_model::{DimensionCase, DimensionKind, Instrument, Region, SLOT_COUNT};

use super::events::{ChooserOutput, InputEvent, Key, PointerButton};
use super::layout::{dim_bit_offset, masked_base, ChooserLayout};
use super::resize::{apply_resize, ResizeDrag};
use super::settings::ChooserSettings;

/// Widget-local state of the zone chooser
#[derive(Debug, Clone, Default)]
pub struct ChooserState {
    pub settings: ChooserSettings,
    /// Packed slot index of the main (last clicked) leaf
    main_slot: usize,
    /// Decoded form of the main selection
    main_case: DimensionCase,
    /// Dimension kind of the last clicked row
    main_kind: Option<DimensionKind>,
    /// Row owning keyboard focus
    focus_line: usize,
    /// Per-dimension multi-selected zones
    zone_selection: BTreeMap<DimensionKind, BTreeSet<u8>>,
    resize: Option<ResizeDrag>,
    cursor_in_resize_zone: bool,
    multi_select_down: bool,
    primary_down: bool,
    shift_down: bool,
}

impl ChooserState {
    pub fn new(settings: ChooserSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    pub fn main_slot(&self) -> usize {
        self.main_slot
    }

    pub fn main_case(&self) -> &DimensionCase {
        &self.main_case
    }

    pub fn main_kind(&self) -> Option<DimensionKind> {
        self.main_kind
    }

    pub fn focus_line(&self) -> usize {
        self.focus_line
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_some()
    }

    /// Drag descriptor of the resize gesture in progress, if any
    pub fn resize_drag(&self) -> Option<&ResizeDrag> {
        self.resize.as_ref()
    }

    /// Whether the pointer should show a horizontal-resize cursor
    pub fn wants_resize_cursor(&self) -> bool {
        self.resize.is_some() || self.cursor_in_resize_zone
    }

    /// Zones of `kind` currently in the multi-selection
    pub fn selected_zones(&self, kind: DimensionKind) -> Option<&BTreeSet<u8>> {
        self.zone_selection.get(&kind)
    }

    /// Adopt a (possibly different) region to display.
    ///
    /// The previous main case is carried over with each dimension's zone
    /// clamped into the new region's zone counts, so switching between
    /// similar regions keeps the selection stable.
    pub fn set_region(&mut self, region: Option<&Region>) -> Vec<ChooserOutput> {
        self.main_slot = 0;
        if let Some(region) = region {
            let mut bitcount = 0u32;
            for def in region.dimension_defs() {
                if def.bits == 0 {
                    continue;
                }
                let z = self
                    .main_case
                    .get(&def.kind)
                    .copied()
                    .unwrap_or(0)
                    .min(def.zones - 1);
                self.main_slot |= (z as usize) << bitcount;
                bitcount += def.bits as u32;
            }
            self.focus_line = self.focus_line.min(region.dimension_count().saturating_sub(1));
            if let Some(case) = region.case_of(self.main_slot) {
                self.main_case = case;
            }
        } else {
            self.main_case.clear();
            self.focus_line = 0;
        }
        vec![ChooserOutput::SelectionChanged]
    }

    /// Feed one input event through the state machine
    pub fn handle_event(
        &mut self,
        instrument: &mut Instrument,
        region_index: usize,
        layout: &ChooserLayout,
        event: InputEvent,
    ) -> Vec<ChooserOutput> {
        match event {
            InputEvent::KeyDown(key) => {
                self.set_modifier(key, true);
                Vec::new()
            }
            InputEvent::KeyUp(key) => self.on_key_up(instrument, region_index, key),
            InputEvent::PointerDown { x, y, button } => {
                self.on_pointer_down(instrument, region_index, layout, x, y, button)
            }
            InputEvent::PointerMoved { x, y } => {
                self.on_pointer_moved(instrument, region_index, layout, x, y)
            }
            InputEvent::PointerUp { x, y } => {
                self.on_pointer_up(instrument, region_index, layout, x, y)
            }
        }
    }

    fn set_modifier(&mut self, key: Key, down: bool) {
        match key {
            Key::MultiSelect => self.multi_select_down = down,
            Key::Primary => self.primary_down = down,
            Key::Shift => self.shift_down = down,
            _ => {}
        }
    }

    fn on_key_up(
        &mut self,
        instrument: &Instrument,
        region_index: usize,
        key: Key,
    ) -> Vec<ChooserOutput> {
        self.set_modifier(key, false);

        // arrow navigation yields to application accelerators using the
        // same key combinations
        if self.primary_down || self.shift_down {
            return Vec::new();
        }
        let Some(region) = instrument.region(region_index) else {
            return Vec::new();
        };
        match key {
            Key::Left => self.select_zone_by_dir(region, -1, false),
            Key::Right => self.select_zone_by_dir(region, 1, false),
            Key::Up => self.select_dimension_by_dir(region, -1),
            Key::Down => self.select_dimension_by_dir(region, 1),
            _ => Vec::new(),
        }
    }

    fn on_pointer_down(
        &mut self,
        instrument: &mut Instrument,
        region_index: usize,
        layout: &ChooserLayout,
        x: f32,
        y: f32,
        button: PointerButton,
    ) -> Vec<ChooserOutput> {
        let Some(region) = instrument.region(region_index) else {
            return Vec::new();
        };
        if !layout.in_grid(x, y, region) {
            return Vec::new();
        }

        if let Some(drag) = layout.resize_hit(region, self.main_slot, x, y) {
            // pointer capture is implicit: motion keeps updating the drag
            // until the matching pointer-up
            self.resize = Some(drag);
            self.cursor_in_resize_zone = true;
            return Vec::new();
        }

        let Some(dim) = layout.row_at(y, region) else {
            return Vec::new();
        };
        let defs = region.dimension_defs();
        let kind = defs[dim].kind;
        let zone = layout.zone_at(region, self.main_slot, dim, x);
        let base = masked_base(defs, self.main_slot, dim);
        let bitpos = dim_bit_offset(defs, dim);

        self.main_case.insert(kind, zone);
        self.main_slot = base | ((zone as usize) << bitpos);
        self.main_kind = Some(kind);
        self.focus_line = dim;

        if self.multi_select_down {
            let set = self.zone_selection.entry(kind).or_default();
            if set.contains(&zone) {
                // the selection of a dimension may shrink but never empty
                if set.len() > 1 {
                    set.remove(&zone);
                }
            } else {
                set.insert(zone);
            }
        } else {
            self.rebuild_selection_from_main_case();
        }

        let mut out = vec![ChooserOutput::SelectionChanged];
        if button == PointerButton::Secondary {
            out.push(ChooserOutput::ContextMenu { x, y });
        }
        out
    }

    fn on_pointer_moved(
        &mut self,
        instrument: &mut Instrument,
        region_index: usize,
        layout: &ChooserLayout,
        x: f32,
        y: f32,
    ) -> Vec<ChooserOutput> {
        if let Some(drag) = self.resize {
            let candidate = layout.x_to_value_rounded(x);
            let clamped = drag.clamp(candidate);
            if clamped != drag.pos {
                let mut drag = drag;
                drag.pos = clamped;
                self.resize = Some(drag);
                apply_resize(&drag, self.settings, self.main_slot, instrument, region_index);
            }
            Vec::new()
        } else {
            self.cursor_in_resize_zone = instrument
                .region(region_index)
                .and_then(|r| layout.resize_hit(r, self.main_slot, x, y))
                .is_some();
            Vec::new()
        }
    }

    fn on_pointer_up(
        &mut self,
        instrument: &mut Instrument,
        region_index: usize,
        layout: &ChooserLayout,
        x: f32,
        y: f32,
    ) -> Vec<ChooserOutput> {
        if self.resize.take().is_some() {
            self.cursor_in_resize_zone = instrument
                .region(region_index)
                .and_then(|r| layout.resize_hit(r, self.main_slot, x, y))
                .is_some();
            vec![ChooserOutput::RegionChanged]
        } else {
            Vec::new()
        }
    }

    /// Programmatic selection of one exact leaf, used by other parts of the
    /// editor to sync their selection into the chooser. Returns false (and
    /// logs) if the slot is not a valid leaf of the region.
    pub fn select_slot(&mut self, region: &Region, slot: usize) -> bool {
        if slot >= SLOT_COUNT || region.slot(slot).is_none() {
            log::warn!("select_slot: {} is not a valid dimension region slot", slot);
            return false;
        }
        self.main_slot = slot;
        self.reset_selected_zones(region);
        true
    }

    /// Re-derive the main case and collapse the multi-selection to it
    pub fn reset_selected_zones(&mut self, region: &Region) {
        self.zone_selection.clear();
        match region.case_of(self.main_slot) {
            Some(case) => {
                self.main_case = case;
                self.rebuild_selection_from_main_case();
            }
            None => {
                log::warn!(
                    "reset_selected_zones: main slot {} decodes as padding",
                    self.main_slot
                );
                self.main_case.clear();
            }
        }
    }

    fn rebuild_selection_from_main_case(&mut self) {
        self.zone_selection.clear();
        for (&kind, &zone) in &self.main_case {
            self.zone_selection.entry(kind).or_default().insert(zone);
        }
    }

    /// Move the focused dimension's selected zone one step left or right
    fn select_zone_by_dir(&mut self, region: &Region, dir: i32, add: bool) -> Vec<ChooserOutput> {
        if region.dimension_count() == 0 {
            return Vec::new();
        }
        self.focus_line = self.focus_line.min(region.dimension_count() - 1);
        let def = region.dimension_defs()[self.focus_line];
        self.main_kind = Some(def.kind);

        // always re-derive the case; a stale one from another region could
        // carry foreign dimension kinds
        let Some(case) = region.case_of(self.main_slot) else {
            log::warn!("select_zone_by_dir: slot {} decodes as padding", self.main_slot);
            return Vec::new();
        };
        self.main_case = case;

        let current = self.main_case.get(&def.kind).copied().unwrap_or(0) as i32;
        let z = (current + dir).clamp(0, def.zones as i32 - 1) as u8;
        self.main_case.insert(def.kind, z);

        let index = strata_model::index_of(&self.main_case, region.dimension_defs());
        if region.slot(index).is_none() {
            log::warn!("select_zone_by_dir: no leaf at slot {}", index);
            return Vec::new();
        }
        self.main_slot = index;

        if !add {
            self.zone_selection.clear();
        }
        for (&kind, &zone) in &self.main_case {
            self.zone_selection.entry(kind).or_default().insert(zone);
        }
        vec![ChooserOutput::SelectionChanged]
    }

    fn select_dimension_by_dir(&mut self, region: &Region, dir: i32) -> Vec<ChooserOutput> {
        if region.dimension_count() == 0 {
            return Vec::new();
        }
        let last = region.dimension_count() - 1;
        self.focus_line = (self.focus_line as i32 + dir).clamp(0, last as i32) as usize;
        self.main_kind = Some(region.dimension_defs()[self.focus_line].kind);
        Vec::new()
    }

    /// All valid leaves covered by the current multi-selection.
    ///
    /// A leaf qualifies when each of its dimensions' zones is selected; with
    /// `stereo` set the stereo-channel dimension always counts as selected.
    /// A dimension with an empty selection set counts zone 0 as selected.
    pub fn selected_dim_regions(&self, region: &Region, stereo: bool) -> Vec<usize> {
        let mut result = Vec::new();
        'slots: for index in 0..SLOT_COUNT {
            if region.slot(index).is_none() {
                continue;
            }
            let Some(case) = region.case_of(index) else {
                continue;
            };
            for (&kind, &zone) in &case {
                if stereo && kind == DimensionKind::SampleChannel {
                    continue;
                }
                match self.zone_selection.get(&kind) {
                    Some(set) if set.contains(&zone) => {}
                    Some(set) if set.is_empty() && zone == 0 => {}
                    _ => continue 'slots,
                }
            }
            result.push(index);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_model::{DimensionDef, SplitPolicy};

    fn layout() -> ChooserLayout {
        ChooserLayout {
            width: 602.0,
            label_width: 90.0,
        }
    }

    fn make_instrument() -> Instrument {
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

    fn click(state: &mut ChooserState, instr: &mut Instrument, x: f32, y: f32) -> Vec<ChooserOutput> {
        let l = layout();
        let down = state.handle_event(
            instr,
            0,
            &l,
            InputEvent::PointerDown {
                x,
                y,
                button: PointerButton::Primary,
            },
        );
        state.handle_event(instr, 0, &l, InputEvent::PointerUp { x, y });
        down
    }

    #[test]
    fn test_click_selects_zone_and_row() {
        let mut instr = make_instrument();
        let mut state = ChooserState::default();
        let l = layout();
        // velocity row, around value 80 -> zone 2 of 4
        let out = click(&mut state, &mut instr, l.value_to_x(80), 5.0);
        assert_eq!(out, vec![ChooserOutput::SelectionChanged]);
        assert_eq!(state.main_case()[&DimensionKind::Velocity], 2);
        assert_eq!(state.main_slot(), 2);
        assert_eq!(state.focus_line(), 0);

        // channel row, right half -> zone 1; velocity zone kept
        let out = click(&mut state, &mut instr, l.value_to_x(100), 30.0);
        assert_eq!(out, vec![ChooserOutput::SelectionChanged]);
        assert_eq!(state.main_case()[&DimensionKind::SampleChannel], 1);
        assert_eq!(state.main_slot(), 2 | (1 << 2));
    }

    #[test]
    fn test_right_click_opens_context_menu() {
        let mut instr = make_instrument();
        let mut state = ChooserState::default();
        let l = layout();
        let out = state.handle_event(
            &mut instr,
            0,
            &l,
            InputEvent::PointerDown {
                x: l.value_to_x(80),
                y: 5.0,
                button: PointerButton::Secondary,
            },
        );
        assert!(out.contains(&ChooserOutput::SelectionChanged));
        assert!(matches!(out[1], ChooserOutput::ContextMenu { .. }));
    }

    #[test]
    fn test_multi_select_toggles_but_never_empties() {
        let mut instr = make_instrument();
        let mut state = ChooserState::default();
        let l = layout();
        click(&mut state, &mut instr, l.value_to_x(10), 5.0); // zone 0
        state.handle_event(&mut instr, 0, &l, InputEvent::KeyDown(Key::MultiSelect));
        click(&mut state, &mut instr, l.value_to_x(80), 5.0); // add zone 2
        let zones = state.selected_zones(DimensionKind::Velocity).unwrap();
        assert!(zones.contains(&0) && zones.contains(&2));

        // ctrl-clicking a selected zone removes it again
        click(&mut state, &mut instr, l.value_to_x(80), 5.0);
        let zones = state.selected_zones(DimensionKind::Velocity).unwrap();
        assert_eq!(zones.iter().copied().collect::<Vec<_>>(), vec![0]);

        // the last selected zone cannot be deselected
        click(&mut state, &mut instr, l.value_to_x(10), 5.0);
        let zones = state.selected_zones(DimensionKind::Velocity).unwrap();
        assert_eq!(zones.iter().copied().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_resize_gesture_commits_and_notifies() {
        let mut instr = make_instrument();
        let mut state = ChooserState::default();
        let l = layout();
        // grab the boundary between velocity zones 1 and 2 (value 64)
        let grab_x = l.value_to_x(64);
        let out = state.handle_event(
            &mut instr,
            0,
            &l,
            InputEvent::PointerDown {
                x: grab_x,
                y: 5.0,
                button: PointerButton::Primary,
            },
        );
        assert!(out.is_empty());
        assert!(state.is_resizing());

        let drop_x = l.value_to_x(70);
        state.handle_event(&mut instr, 0, &l, InputEvent::PointerMoved { x: drop_x, y: 5.0 });
        let out = state.handle_event(&mut instr, 0, &l, InputEvent::PointerUp { x: drop_x, y: 5.0 });
        assert_eq!(out, vec![ChooserOutput::RegionChanged]);
        assert!(!state.is_resizing());

        let region = instr.region(0).unwrap();
        assert_eq!(region.slot(1).unwrap().upper_limits[0], 69);
        assert_eq!(region.slot(1).unwrap().velocity_upper_limit, 69);
    }

    #[test]
    fn test_resize_clamps_to_neighbors() {
        let mut instr = make_instrument();
        let mut state = ChooserState::default();
        let l = layout();
        let grab_x = l.value_to_x(64);
        state.handle_event(
            &mut instr,
            0,
            &l,
            InputEvent::PointerDown {
                x: grab_x,
                y: 5.0,
                button: PointerButton::Primary,
            },
        );
        // drag far past the right neighbor's boundary
        state.handle_event(
            &mut instr,
            0,
            &l,
            InputEvent::PointerMoved { x: l.value_to_x(127), y: 5.0 },
        );
        state.handle_event(&mut instr, 0, &l, InputEvent::PointerUp { x: grab_x, y: 5.0 });
        let region = instr.region(0).unwrap();
        // clamped to the next zone's boundary (96), stored as 95
        assert_eq!(region.slot(1).unwrap().upper_limits[0], 95);
    }

    #[test]
    fn test_resize_drag_exposes_grabbed_side() {
        use crate::zone_chooser::resize::DragSide;

        let mut instr = make_instrument();
        let mut state = ChooserState::default();
        let l = layout();
        click(&mut state, &mut instr, l.value_to_x(80), 5.0); // main case in zone 2

        // grabbing the boundary below the main zone reports the right side
        let grab_x = l.value_to_x(64);
        state.handle_event(
            &mut instr,
            0,
            &l,
            InputEvent::PointerDown {
                x: grab_x,
                y: 5.0,
                button: PointerButton::Primary,
            },
        );
        let drag = state.resize_drag().unwrap();
        assert_eq!(drag.zone, 1);
        assert_eq!(drag.side, DragSide::Right);

        state.handle_event(&mut instr, 0, &l, InputEvent::PointerUp { x: grab_x, y: 5.0 });
        assert!(state.resize_drag().is_none());
    }

    #[test]
    fn test_keyboard_navigation_clamps() {
        let mut instr = make_instrument();
        let mut state = ChooserState::default();
        let l = layout();
        click(&mut state, &mut instr, l.value_to_x(10), 5.0); // velocity zone 0

        // left at the first zone stays put
        let out = state.handle_event(&mut instr, 0, &l, InputEvent::KeyUp(Key::Left));
        assert_eq!(out, vec![ChooserOutput::SelectionChanged]);
        assert_eq!(state.main_case()[&DimensionKind::Velocity], 0);

        let out = state.handle_event(&mut instr, 0, &l, InputEvent::KeyUp(Key::Right));
        assert_eq!(out, vec![ChooserOutput::SelectionChanged]);
        assert_eq!(state.main_case()[&DimensionKind::Velocity], 1);

        // down moves focus to the channel row and clamps there
        state.handle_event(&mut instr, 0, &l, InputEvent::KeyUp(Key::Down));
        assert_eq!(state.focus_line(), 1);
        state.handle_event(&mut instr, 0, &l, InputEvent::KeyUp(Key::Down));
        assert_eq!(state.focus_line(), 1);
    }

    #[test]
    fn test_arrows_yield_to_accelerators() {
        let mut instr = make_instrument();
        let mut state = ChooserState::default();
        let l = layout();
        click(&mut state, &mut instr, l.value_to_x(80), 5.0);
        state.handle_event(&mut instr, 0, &l, InputEvent::KeyDown(Key::Shift));
        let out = state.handle_event(&mut instr, 0, &l, InputEvent::KeyUp(Key::Left));
        assert!(out.is_empty());
        assert_eq!(state.main_case()[&DimensionKind::Velocity], 2);
    }

    #[test]
    fn test_select_slot_validates() {
        let instr = make_instrument();
        let region = instr.region(0).unwrap();
        let mut state = ChooserState::default();
        assert!(state.select_slot(region, 6)); // velocity 2, channel 1
        assert_eq!(state.main_slot(), 6);
        assert_eq!(state.main_case()[&DimensionKind::Velocity], 2);
        // slot 9 lies beyond the region's 3-bit table
        assert!(!state.select_slot(region, 9));
        assert_eq!(state.main_slot(), 6);
    }

    #[test]
    fn test_set_region_clamps_previous_case() {
        let mut instr = make_instrument();
        let mut state = ChooserState::default();
        let l = layout();
        click(&mut state, &mut instr, l.value_to_x(120), 5.0); // velocity zone 3

        let mut narrow = Region::new((49, 60));
        narrow
            .add_dimension(DimensionDef::new(
                DimensionKind::Velocity,
                2,
                SplitPolicy::Uniform,
            ))
            .unwrap();
        state.set_region(Some(&narrow));
        // zone 3 clamps to the last zone of the narrower region
        assert_eq!(state.main_case()[&DimensionKind::Velocity], 1);
        assert_eq!(state.main_slot(), 1);
    }

    #[test]
    fn test_selected_dim_regions_aggregation() {
        let mut instr = make_instrument();
        let mut state = ChooserState::default();
        let l = layout();
        click(&mut state, &mut instr, l.value_to_x(10), 5.0); // velocity 0, channel 0
        state.handle_event(&mut instr, 0, &l, InputEvent::KeyDown(Key::MultiSelect));
        click(&mut state, &mut instr, l.value_to_x(80), 5.0); // + velocity 2

        let region = instr.region(0).unwrap();
        assert_eq!(state.selected_dim_regions(region, false), vec![0, 2]);
        // stereo: the channel dimension always counts as selected
        assert_eq!(state.selected_dim_regions(region, true), vec![0, 2, 4, 6]);
    }
}
