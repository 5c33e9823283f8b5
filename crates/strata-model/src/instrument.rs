//! Instruments: ordered collections of key-mapped regions

use crate::region::Region;

/// An instrument and its regions, ordered by ascending key range
#[derive(Debug, Clone, Default)]
pub struct Instrument {
    pub name: String,
    regions: Vec<Region>,
}

impl Instrument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            regions: Vec::new(),
        }
    }

    /// Insert a region, keeping the list sorted by low key
    pub fn add_region(&mut self, region: Region) -> usize {
        let pos = self
            .regions
            .iter()
            .position(|r| r.key_range.0 > region.key_range.0)
            .unwrap_or(self.regions.len());
        self.regions.insert(pos, region);
        pos
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn region(&self, index: usize) -> Option<&Region> {
        self.regions.get(index)
    }

    pub fn region_mut(&mut self, index: usize) -> Option<&mut Region> {
        self.regions.get_mut(index)
    }

    /// Index of the region responding to a MIDI key, if any
    pub fn region_for_key(&self, key: u8) -> Option<usize> {
        self.regions
            .iter()
            .position(|r| r.key_range.0 <= key && key <= r.key_range.1)
    }

    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    pub fn regions_mut(&mut self) -> impl Iterator<Item = &mut Region> {
        self.regions.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regions_stay_sorted() {
        let mut instr = Instrument::new("piano");
        instr.add_region(Region::new((60, 72)));
        instr.add_region(Region::new((0, 59)));
        instr.add_region(Region::new((73, 127)));
        let lows: Vec<u8> = instr.regions().map(|r| r.key_range.0).collect();
        assert_eq!(lows, vec![0, 60, 73]);
    }

    #[test]
    fn test_region_for_key() {
        let mut instr = Instrument::new("piano");
        instr.add_region(Region::new((60, 72)));
        assert_eq!(instr.region_for_key(60), Some(0));
        assert_eq!(instr.region_for_key(72), Some(0));
        assert_eq!(instr.region_for_key(59), None);
    }
}
