//! Map settings and their normalization.
//!
//! Settings come from the lobby UI, from RON files or from the command
//! line, and any of them may be out of range. [`MapSettings::make_valid`]
//! corrects every field in place and never fails.

use serde::{Deserialize, Serialize};

use crate::error::{MapGenError, Result};
use crate::random::MapStyle;
use crate::terrain::LandscapeType;
use crate::vertex::MapExtent;

/// Maximum number of players on a map.
pub const MAX_PLAYERS: usize = 8;

/// Smallest map edge the generator supports.
pub const MIN_MAP_SIZE: u16 = 16;

/// Largest map edge the generator supports.
///
/// Kept below 255 so no vertex ever coincides with [`MapPoint::INVALID`].
///
/// [`MapPoint::INVALID`]: crate::vertex::MapPoint::INVALID
pub const MAX_MAP_SIZE: u16 = 254;

/// Name used when none was given.
pub const DEFAULT_NAME: &str = "Random";

/// Author used when none was given.
pub const DEFAULT_AUTHOR: &str = "AutoGenerated";

/// How far mountains are kept from player headquarters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MountainDistance {
    /// Mountains right next to the HQ.
    Close,
    /// A short walk away.
    #[default]
    Normal,
    /// Further out.
    Far,
    /// Far away from every HQ.
    VeryFar,
}

impl MountainDistance {
    /// Radius around each HQ that is flattened into buildable land.
    #[must_use]
    pub const fn hq_zone_radius(self) -> u16 {
        match self {
            Self::Close => 3,
            Self::Normal => 4,
            Self::Far => 6,
            Self::VeryFar => 8,
        }
    }

    /// Zone radius on a map of the given size.
    ///
    /// Capped at an eighth of the smaller edge so a full set of players
    /// cannot flatten a small map completely.
    #[must_use]
    pub fn hq_zone_radius_on(self, size: MapExtent) -> u16 {
        self.hq_zone_radius().min((size.min_dim() / 8).max(1))
    }
}

/// Number of extra islands raised on water-heavy maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IslandAmount {
    /// Hardly any.
    Few,
    /// Some.
    #[default]
    Normal,
    /// Lots.
    Many,
}

impl IslandAmount {
    /// Islands per 1000 vertices.
    #[must_use]
    pub const fn per_mille(self) -> u32 {
        match self {
            Self::Few => 1,
            Self::Normal => 3,
            Self::Many => 6,
        }
    }
}

/// Everything the generator needs to know about the requested map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    /// Map name.
    pub name: String,
    /// Map author.
    pub author: String,
    /// Requested number of players.
    pub players: u32,
    /// Map size in vertices.
    pub size: MapExtent,
    /// Land/water character.
    pub style: MapStyle,
    /// Climate.
    pub landscape: LandscapeType,
    /// Minimum HQ distance to the map center, as a fraction of half the
    /// smaller map dimension.
    pub min_player_radius: f64,
    /// Maximum HQ distance to the map center, same unit.
    pub max_player_radius: f64,
    /// Relative weight of coal deposits.
    pub ratio_coal: u32,
    /// Relative weight of gold deposits.
    pub ratio_gold: u32,
    /// Relative weight of granite deposits.
    pub ratio_granite: u32,
    /// Relative weight of iron deposits.
    pub ratio_iron: u32,
    /// River density in percent.
    pub rivers: u32,
    /// Tree density in percent.
    pub trees: u32,
    /// Stone pile density in percent.
    pub stone_piles: u32,
    /// Mountain distance from HQs.
    pub mountain_distance: MountainDistance,
    /// Island amount for water-heavy styles.
    pub islands: IslandAmount,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            author: String::new(),
            players: 2,
            size: MapExtent::new(64, 64),
            style: MapStyle::Random,
            landscape: LandscapeType::Greenland,
            min_player_radius: 0.4,
            max_player_radius: 0.7,
            ratio_coal: 40,
            ratio_gold: 9,
            ratio_granite: 15,
            ratio_iron: 36,
            rivers: 15,
            trees: 40,
            stone_piles: 5,
            mountain_distance: MountainDistance::Normal,
            islands: IslandAmount::Normal,
        }
    }
}

impl MapSettings {
    /// Parse settings from RON text. Missing fields take their defaults.
    ///
    /// The result is not normalized; call [`MapSettings::make_valid`].
    pub fn from_ron_str(text: &str) -> Result<Self> {
        ron::from_str(text).map_err(|e| MapGenError::SettingsParse {
            message: e.to_string(),
        })
    }

    /// Correct every field into the range the generator supports.
    ///
    /// Idempotent. Player radii are left alone; the generator copes with
    /// contradictory radii itself.
    pub fn make_valid(&mut self) {
        if self.name.is_empty() {
            self.name = DEFAULT_NAME.to_string();
        }
        if self.author.is_empty() {
            self.author = DEFAULT_AUTHOR.to_string();
        }

        self.players = self.players.clamp(1, MAX_PLAYERS as u32);

        // Odd sizes round down so the hex rows wrap cleanly.
        self.size.x = (self.size.x & !1).clamp(MIN_MAP_SIZE, MAX_MAP_SIZE);
        self.size.y = (self.size.y & !1).clamp(MIN_MAP_SIZE, MAX_MAP_SIZE);

        if self.total_mountain_ratio() == 0 {
            self.ratio_coal = 1;
            self.ratio_gold = 1;
            self.ratio_granite = 1;
            self.ratio_iron = 1;
        }

        self.rivers = self.rivers.min(100);
        self.trees = self.trees.min(100);
        self.stone_piles = self.stone_piles.min(100);
    }

    /// Normalized copy of these settings.
    #[must_use]
    pub fn validated(&self) -> Self {
        let mut settings = self.clone();
        settings.make_valid();
        settings
    }

    /// Sum of the four mountain resource ratios.
    #[must_use]
    pub fn total_mountain_ratio(&self) -> u64 {
        [
            self.ratio_coal,
            self.ratio_gold,
            self.ratio_granite,
            self.ratio_iron,
        ]
        .iter()
        .map(|&r| u64::from(r))
        .sum()
    }
}
