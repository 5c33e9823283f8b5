//! Geometry and hit testing for the zone chooser
//!
//! The chooser draws one 24 px row per dimension, a label gutter on the
//! left, and the zone grid spanning the rest of the width. All pixel ↔
//! controller-value mapping and pointer hit testing lives here so the state
//! machine stays free of drawing concerns.

use strata_model::{DimensionDef, DimensionKind, Region, SplitPolicy, SLOT_COUNT};

use super::resize::{DragSide, ResizeDrag};

/// Height of one dimension row
pub const ROW_HEIGHT: f32 = 24.0;

/// Half-width of the grab area around a zone boundary
pub const RESIZE_GRIP_PX: f32 = 2.0;

/// Label gutter width used until the view measures the actual labels
pub const DEFAULT_LABEL_WIDTH: f32 = 90.0;

/// Pixel geometry of one rendered chooser instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChooserLayout {
    pub width: f32,
    pub label_width: f32,
}

impl ChooserLayout {
    pub fn new(width: f32) -> Self {
        Self {
            width,
            label_width: DEFAULT_LABEL_WIDTH,
        }
    }

    /// Width of the zone grid in pixels
    pub fn grid_width(&self) -> f32 {
        self.width - self.label_width - 1.0
    }

    /// X pixel of controller value `v` (0..=128; 128 is the right edge)
    pub fn value_to_x(&self, v: u16) -> f32 {
        self.label_width + (self.grid_width() * v as f32 / 128.0 + 0.5).floor()
    }

    /// Controller value under pixel `x`, truncated (used for zone picking)
    pub fn x_to_value(&self, x: f32) -> i32 {
        ((x - self.label_width) * 128.0 / self.grid_width()) as i32
    }

    /// Controller value under pixel `x`, rounded (used while dragging)
    pub fn x_to_value_rounded(&self, x: f32) -> i32 {
        ((x - self.label_width) * 128.0 / self.grid_width() + 0.5) as i32
    }

    /// Dimension row under pixel `y`
    pub fn row_at(&self, y: f32, region: &Region) -> Option<usize> {
        if y < 0.0 {
            return None;
        }
        let row = (y / ROW_HEIGHT) as usize;
        (row < region.dimension_count()).then_some(row)
    }

    /// Whether `(x, y)` lies inside the zone grid at all
    pub fn in_grid(&self, x: f32, y: f32, region: &Region) -> bool {
        x >= self.label_width
            && x < self.width
            && y >= 0.0
            && y < region.dimension_count() as f32 * ROW_HEIGHT
    }

    /// Zone of dimension row `dim` under pixel `x`, honoring custom splits
    pub fn zone_at(&self, region: &Region, main_slot: usize, dim: usize, x: f32) -> u8 {
        let def = region.dimension_defs()[dim];
        let base = masked_base(region.dimension_defs(), main_slot, dim);
        let bitpos = dim_bit_offset(region.dimension_defs(), dim);

        if has_custom_splits(region, base, dim) {
            let val = self.x_to_value(x);
            let use_modern = region
                .slot(base)
                .map(|s| s.upper_limits[dim] != 0)
                .unwrap_or(false);
            for z in 0..def.zones {
                let index = base + ((z as usize) << bitpos);
                let Some(slot) = region.slot(index) else { continue };
                let limit = if use_modern {
                    slot.upper_limits[dim]
                } else {
                    slot.velocity_upper_limit
                };
                if val <= limit as i32 {
                    return z;
                }
            }
            def.zones - 1
        } else {
            let z = ((x - self.label_width) * def.zones as f32 / self.grid_width()) as i32;
            z.clamp(0, def.zones as i32 - 1) as u8
        }
    }

    /// Hit test a pointer position against zone boundaries.
    ///
    /// Returns the drag descriptor for the boundary within
    /// [`RESIZE_GRIP_PX`] of `x`, or `None`. Bit-exact dimensions have fixed
    /// boundaries and never produce a hit.
    pub fn resize_hit(&self, region: &Region, main_slot: usize, x: f32, y: f32) -> Option<ResizeDrag> {
        if !self.in_grid(x, y, region) {
            return None;
        }
        let dim = self.row_at(y, region)?;
        let defs = region.dimension_defs();
        let def = defs[dim];
        if def.split_policy == SplitPolicy::BitExact {
            return None;
        }

        let base = masked_base(defs, main_slot, dim);
        let bitpos = dim_bit_offset(defs, dim);
        let custom = has_custom_splits(region, base, dim);

        let mut prev_limit = 0u8;
        for zone in 0..def.zones.saturating_sub(1) {
            let limit = zone_boundary(region, base, dim, &def, zone, custom, bitpos);
            let limit_x = self.value_to_x(limit as u16);
            if x <= limit_x - RESIZE_GRIP_PX {
                break;
            }
            if x <= limit_x + RESIZE_GRIP_PX {
                let main_zone =
                    ((main_slot >> bitpos) & ((1 << def.bits) - 1)) as u8;
                let side = if main_zone == zone {
                    DragSide::Left
                } else if main_zone == zone + 1 {
                    DragSide::Right
                } else {
                    DragSide::None
                };
                let max = zone_boundary(region, base, dim, &def, zone + 1, custom, bitpos);
                return Some(ResizeDrag {
                    dimension: dim,
                    def,
                    zone,
                    pos: limit,
                    min: prev_limit,
                    max,
                    side,
                });
            }
            prev_limit = limit;
        }
        None
    }
}

/// Bit offset of dimension position `dim` within the packed slot index
pub(crate) fn dim_bit_offset(defs: &[DimensionDef], dim: usize) -> u32 {
    defs[..dim].iter().map(|d| d.bits as u32).sum()
}

/// Stencil clearing dimension position `dim`'s bit field
pub(crate) fn dim_stencil(defs: &[DimensionDef], dim: usize) -> usize {
    let bitpos = dim_bit_offset(defs, dim);
    !(((1usize << defs[dim].bits) - 1) << bitpos) & (SLOT_COUNT - 1)
}

/// `main_slot` with dimension `dim`'s bits masked away
pub(crate) fn masked_base(defs: &[DimensionDef], main_slot: usize, dim: usize) -> usize {
    main_slot & dim_stencil(defs, dim)
}

/// Whether dimension `dim` currently carries custom zone limits.
///
/// True when the base slot records a modern per-dimension limit, or, for the
/// velocity dimension, when the legacy single-field limit is set.
pub(crate) fn has_custom_splits(region: &Region, base: usize, dim: usize) -> bool {
    let def = region.dimension_defs()[dim];
    if def.split_policy == SplitPolicy::BitExact {
        return false;
    }
    let Some(slot) = region.slot(base) else {
        return false;
    };
    slot.upper_limits[dim] != 0
        || (def.kind == DimensionKind::Velocity && slot.velocity_upper_limit != 0)
}

/// Upper boundary (`upper limit + 1`) of a zone, from stored or derived limits
pub(crate) fn zone_boundary(
    region: &Region,
    base: usize,
    dim: usize,
    def: &DimensionDef,
    zone: u8,
    custom: bool,
    bitpos: u32,
) -> u8 {
    let upper = if custom {
        region
            .upper_limit_at(base + ((zone as usize) << bitpos), dim)
            .unwrap_or_else(|| def.uniform_upper_limit(zone))
    } else {
        ((zone as u16 + 1) * def.zone_size as u16).saturating_sub(1).min(127) as u8
    };
    upper.saturating_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_model::DimensionDef;

    fn region_velocity_4() -> Region {
        let mut region = Region::new((0, 127));
        region
            .add_dimension(DimensionDef::new(
                DimensionKind::Velocity,
                4,
                SplitPolicy::Uniform,
            ))
            .unwrap();
        region
    }

    fn layout() -> ChooserLayout {
        ChooserLayout {
            width: 602.0,
            label_width: 90.0,
        }
    }

    #[test]
    fn test_value_pixel_roundtrip() {
        let l = layout();
        for v in [0u16, 32, 64, 96, 128] {
            let x = l.value_to_x(v);
            assert_eq!(l.x_to_value_rounded(x), v as i32);
        }
    }

    #[test]
    fn test_uniform_zone_at() {
        let l = layout();
        let region = region_velocity_4();
        // middle of the grid falls into zone 2 of 4
        let x = l.label_width + l.grid_width() * 0.55;
        assert_eq!(l.zone_at(&region, 0, 0, x), 2);
        // far edges clamp
        assert_eq!(l.zone_at(&region, 0, 0, l.label_width), 0);
        assert_eq!(l.zone_at(&region, 0, 0, l.width - 1.0), 3);
    }

    #[test]
    fn test_custom_zone_at_uses_stored_limits() {
        let l = layout();
        let mut region = region_velocity_4();
        for (zone, limit) in [(0usize, 10u8), (1, 20), (2, 30), (3, 127)] {
            let slot = region.slot_mut(zone).unwrap();
            slot.upper_limits[0] = limit;
            slot.velocity_upper_limit = limit;
        }
        // value 25 lands in zone 2 under the custom boundaries
        let x = l.value_to_x(25);
        assert_eq!(l.zone_at(&region, 0, 0, x), 2);
    }

    #[test]
    fn test_resize_hit_on_uniform_boundary() {
        let l = layout();
        let region = region_velocity_4();
        // boundary between zones 1 and 2 sits at value 64; main case in zone 2
        let x = l.value_to_x(64);
        let drag = l.resize_hit(&region, 2, x, 5.0).unwrap();
        assert_eq!(drag.zone, 1);
        assert_eq!(drag.pos, 64);
        assert_eq!(drag.min, 32);
        assert_eq!(drag.max, 96);
        assert_eq!(drag.side, DragSide::Right);
    }

    #[test]
    fn test_resize_hit_misses_between_boundaries() {
        let l = layout();
        let region = region_velocity_4();
        let x = l.value_to_x(48);
        assert!(l.resize_hit(&region, 0, x, 5.0).is_none());
    }

    #[test]
    fn test_resize_hit_never_on_bit_exact() {
        let l = layout();
        let mut region = Region::new((0, 127));
        region
            .add_dimension(DimensionDef::new(
                DimensionKind::SampleChannel,
                2,
                SplitPolicy::BitExact,
            ))
            .unwrap();
        let x = l.value_to_x(64);
        assert!(l.resize_hit(&region, 0, x, 5.0).is_none());
    }
}
