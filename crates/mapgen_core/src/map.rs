//! Generated map data.
//!
//! A [`Map`] is plain data: per-vertex layers stored row-major plus the
//! player start positions. The object layers use the classic map file
//! encoding so a world loader can take them over unchanged.

use serde::{Deserialize, Serialize};

use crate::settings::MAX_PLAYERS;
use crate::terrain::{LandscapeType, TerrainFlags, TerrainIdx, WorldDescription};
use crate::vertex::{self, MapExtent, MapPoint};

/// `object_info` value marking a headquarters; `object_type` holds the player.
pub const OI_HEADQUARTER_MASK: u8 = 0x80;
/// `object_info` value of a tree; `object_type` holds the species.
pub const OI_TREE: u8 = 0xC4;
/// `object_info` value of a stone pile; `object_type` holds its size.
pub const OI_GRANITE: u8 = 0xCC;

/// Ground resource of one vertex. The payload is the amount (1..=7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Resource {
    /// Nothing.
    #[default]
    Nothing,
    /// Ground water for wells.
    Water(u8),
    /// Fish in lakes and seas.
    Fish(u8),
    /// Coal deposit.
    Coal(u8),
    /// Iron ore deposit.
    Iron(u8),
    /// Gold deposit.
    Gold(u8),
    /// Granite deposit.
    Granite(u8),
}

impl Resource {
    /// Returns true for the four deposits found in mountains.
    #[must_use]
    pub const fn is_mountain_resource(self) -> bool {
        matches!(
            self,
            Self::Coal(_) | Self::Iron(_) | Self::Gold(_) | Self::Granite(_)
        )
    }
}

/// A generated map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Map {
    /// Map name.
    pub name: String,
    /// Map author.
    pub author: String,
    /// Size in vertices.
    pub size: MapExtent,
    /// Climate.
    pub landscape: LandscapeType,
    /// Number of players that received a start position.
    pub players: u32,
    /// Start position per player; [`MapPoint::INVALID`] when unused.
    pub positions: [MapPoint; MAX_PLAYERS],
    /// Terrain per vertex.
    pub terrain: Vec<TerrainIdx>,
    /// Height per vertex.
    pub heights: Vec<u8>,
    /// Object type per vertex.
    pub object_type: Vec<u8>,
    /// Object info per vertex.
    pub object_info: Vec<u8>,
    /// Ground resource per vertex.
    pub resources: Vec<Resource>,
    /// Harbor building sites.
    pub harbors: Vec<MapPoint>,
}

impl Map {
    /// Create an empty map with every layer zeroed and no players.
    #[must_use]
    pub fn new(size: MapExtent, name: &str, author: &str, landscape: LandscapeType) -> Self {
        let area = size.area();
        Self {
            name: name.to_string(),
            author: author.to_string(),
            size,
            landscape,
            players: 0,
            positions: [MapPoint::INVALID; MAX_PLAYERS],
            terrain: vec![TerrainIdx::default(); area],
            heights: vec![0; area],
            object_type: vec![0; area],
            object_info: vec![0; area],
            resources: vec![Resource::Nothing; area],
            harbors: Vec::new(),
        }
    }

    /// Row-major index of a vertex.
    #[must_use]
    pub fn index(&self, pt: MapPoint) -> usize {
        vertex::index(pt, self.size)
    }

    /// Place the headquarters of `player` at `pt`.
    ///
    /// # Panics
    ///
    /// Panics if `player` is not below [`MAX_PLAYERS`].
    pub fn set_headquarters(&mut self, player: usize, pt: MapPoint) {
        assert!(player < MAX_PLAYERS, "player index {player} out of range");
        let idx = self.index(pt);
        self.positions[player] = pt;
        self.object_type[idx] = player as u8;
        self.object_info[idx] = OI_HEADQUARTER_MASK;
    }

    /// Start position of a player, if assigned.
    #[must_use]
    pub fn headquarters(&self, player: usize) -> Option<MapPoint> {
        self.positions
            .get(player)
            .copied()
            .filter(|pt| pt.is_valid())
    }

    /// Returns true if the vertex carries no object.
    #[must_use]
    pub fn is_free(&self, pt: MapPoint) -> bool {
        self.object_info[self.index(pt)] == 0
    }

    /// Returns true if the terrain at `pt` has all of `flags`.
    #[must_use]
    pub fn has_terrain(&self, world: &WorldDescription, pt: MapPoint, flags: TerrainFlags) -> bool {
        world.is(self.terrain[self.index(pt)], flags)
    }

    /// Number of vertices whose `object_info` equals `info`.
    #[must_use]
    pub fn count_objects(&self, info: u8) -> usize {
        self.object_info.iter().filter(|&&i| i == info).count()
    }

    /// Number of vertices whose resource matches `pred`.
    pub fn count_resources(&self, pred: impl Fn(Resource) -> bool) -> usize {
        self.resources.iter().filter(|&&r| pred(r)).count()
    }
}
