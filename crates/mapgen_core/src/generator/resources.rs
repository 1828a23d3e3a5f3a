//! Resource seeding pass.

use serde::{Deserialize, Serialize};

use crate::map::{Map, Resource};
use crate::random::MapRng;
use crate::settings::MapSettings;

use super::{Layout, TerrainClass};

/// Chance (percent) of a land vertex holding ground water.
const GROUND_WATER_CHANCE: u32 = 70;

/// Chance (percent) of a water vertex holding fish.
const FISH_CHANCE: u32 = 40;

/// Largest amount of a single deposit.
const MAX_AMOUNT: i32 = 7;

/// Number of deposits placed, per resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceStats {
    /// Coal deposits.
    pub coal: usize,
    /// Gold deposits.
    pub gold: usize,
    /// Iron deposits.
    pub iron: usize,
    /// Granite deposits.
    pub granite: usize,
    /// Ground water vertices.
    pub water: usize,
    /// Fish vertices.
    pub fish: usize,
}

impl ResourceStats {
    /// Deposits of the four mountain resources together.
    #[must_use]
    pub const fn mountain_total(&self) -> usize {
        self.coal + self.gold + self.iron + self.granite
    }
}

/// Fill every mountain with deposits and sprinkle water and fish.
///
/// Mountain deposits are chosen by weight from the four ratios, which
/// normalization keeps from summing to zero.
pub(crate) fn seed_resources(
    map: &mut Map,
    layout: &Layout,
    settings: &MapSettings,
    rng: &mut MapRng,
) -> ResourceStats {
    let weights = [
        settings.ratio_coal,
        settings.ratio_gold,
        settings.ratio_iron,
        settings.ratio_granite,
    ];
    let mut stats = ResourceStats::default();

    for (idx, class) in layout.classes.iter().enumerate() {
        let resource = match class {
            TerrainClass::Mountain => {
                let amount = rng.range(1, MAX_AMOUNT) as u8;
                match rng.weighted_index(&weights) {
                    Some(0) => {
                        stats.coal += 1;
                        Resource::Coal(amount)
                    }
                    Some(1) => {
                        stats.gold += 1;
                        Resource::Gold(amount)
                    }
                    Some(2) => {
                        stats.iron += 1;
                        Resource::Iron(amount)
                    }
                    Some(_) => {
                        stats.granite += 1;
                        Resource::Granite(amount)
                    }
                    None => Resource::Nothing,
                }
            }
            TerrainClass::Land if rng.chance(GROUND_WATER_CHANCE) => {
                stats.water += 1;
                Resource::Water(rng.range(1, MAX_AMOUNT) as u8)
            }
            TerrainClass::Water if rng.chance(FISH_CHANCE) => {
                stats.fish += 1;
                Resource::Fish(rng.range(1, MAX_AMOUNT) as u8)
            }
            _ => Resource::Nothing,
        };
        map.resources[idx] = resource;
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::LandscapeType;
    use crate::vertex::MapExtent;

    fn mountain_layout(size: MapExtent) -> Layout {
        let mut layout = Layout::new(size.area());
        layout.classes.fill(TerrainClass::Mountain);
        layout
    }

    #[test]
    fn test_only_weighted_kinds_appear() {
        let size = MapExtent::new(16, 16);
        let mut map = Map::new(size, "t", "t", LandscapeType::Greenland);
        let layout = mountain_layout(size);
        let settings = MapSettings {
            ratio_coal: 0,
            ratio_gold: 1,
            ratio_iron: 0,
            ratio_granite: 0,
            ..Default::default()
        };
        let stats = seed_resources(&mut map, &layout, &settings, &mut MapRng::new(1));
        assert_eq!(stats.gold, size.area());
        assert_eq!(stats.mountain_total(), size.area());
        assert!(map
            .resources
            .iter()
            .all(|r| matches!(r, Resource::Gold(1..=7))));
    }

    #[test]
    fn test_normalized_zero_ratios_still_seed_mountains() {
        let size = MapExtent::new(16, 16);
        let mut map = Map::new(size, "t", "t", LandscapeType::Greenland);
        let layout = mountain_layout(size);
        let settings = MapSettings {
            ratio_coal: 0,
            ratio_gold: 0,
            ratio_iron: 0,
            ratio_granite: 0,
            ..Default::default()
        }
        .validated();
        let stats = seed_resources(&mut map, &layout, &settings, &mut MapRng::new(2));
        assert!(stats.mountain_total() > 0);
    }

    #[test]
    fn test_peaks_stay_empty() {
        let size = MapExtent::new(16, 16);
        let mut map = Map::new(size, "t", "t", LandscapeType::Greenland);
        let mut layout = Layout::new(size.area());
        layout.classes.fill(TerrainClass::Peak);
        let stats =
            seed_resources(&mut map, &layout, &MapSettings::default(), &mut MapRng::new(3));
        assert_eq!(stats, ResourceStats::default());
        assert!(map.resources.iter().all(|r| *r == Resource::Nothing));
    }
}
