//! Terrain catalog consumed by the generator.
//!
//! The generator never refers to a terrain by its index. It asks the
//! catalog for "a buildable land terrain of this landscape" or "a
//! shippable water terrain" and uses whatever index comes back, so game
//! data can reorder or extend the catalog freely.
//!
//! # Example RON
//!
//! ```ron
//! WorldDescription(
//!     terrain: [
//!         TerrainDesc(name: "Water", landscape: Greenland, kind: Water, flags: "SHIPPABLE"),
//!         TerrainDesc(name: "Meadow", landscape: Greenland, kind: Land, flags: "WALKABLE | BUILDABLE"),
//!     ],
//! )
//! ```

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::{MapGenError, Result};

/// Climate of a map. Every landscape has its own terrain set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LandscapeType {
    /// Green meadows and forests.
    #[default]
    Greenland,
    /// Dry land with lava.
    Wasteland,
    /// Tundra and ice.
    Winter,
}

impl LandscapeType {
    /// All landscapes, in catalog order.
    pub const ALL: [Self; 3] = [Self::Greenland, Self::Wasteland, Self::Winter];
}

/// Broad category of a terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    /// Solid ground.
    Land,
    /// Lakes and seas.
    Water,
    /// Rock that can hold mines.
    Mountain,
    /// Snow and ice peaks.
    Snow,
    /// Molten rock.
    Lava,
}

bitflags! {
    /// What a terrain allows.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct TerrainFlags: u8 {
        /// Figures can walk across it.
        const WALKABLE = 1;
        /// Buildings can stand on it.
        const BUILDABLE = 1 << 1;
        /// Mines can be built on it.
        const MINEABLE = 1 << 2;
        /// Ships can sail on it.
        const SHIPPABLE = 1 << 3;
        /// Nothing can reach it.
        const UNREACHABLE = 1 << 4;
    }
}

/// Index of a terrain inside a [`WorldDescription`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TerrainIdx(pub u8);

/// One terrain definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainDesc {
    /// Display name.
    pub name: String,
    /// Landscape the terrain belongs to.
    pub landscape: LandscapeType,
    /// Broad category.
    pub kind: TerrainKind,
    /// Capabilities.
    pub flags: TerrainFlags,
}

impl TerrainDesc {
    fn new(name: &str, landscape: LandscapeType, kind: TerrainKind, flags: TerrainFlags) -> Self {
        Self {
            name: name.to_string(),
            landscape,
            kind,
            flags,
        }
    }

    /// Returns true if this terrain has all of `flags`.
    #[must_use]
    pub fn is(&self, flags: TerrainFlags) -> bool {
        self.flags.contains(flags)
    }
}

/// Catalog of all terrains known to the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldDescription {
    /// Terrain definitions; position in this list is the [`TerrainIdx`].
    pub terrain: Vec<TerrainDesc>,
}

impl Default for WorldDescription {
    fn default() -> Self {
        Self::default_terrain()
    }
}

impl WorldDescription {
    /// Built-in catalog covering all three landscapes.
    #[must_use]
    pub fn default_terrain() -> Self {
        use LandscapeType::{Greenland, Wasteland, Winter};
        use TerrainKind::{Land, Lava, Mountain, Snow, Water};

        let land = TerrainFlags::WALKABLE | TerrainFlags::BUILDABLE;
        let mine = TerrainFlags::WALKABLE | TerrainFlags::MINEABLE;

        let terrain = vec![
            TerrainDesc::new("Steppe", Greenland, Land, TerrainFlags::WALKABLE),
            TerrainDesc::new("Water", Greenland, Water, TerrainFlags::SHIPPABLE),
            TerrainDesc::new("Meadow", Greenland, Land, land),
            TerrainDesc::new("Mountain meadow", Greenland, Land, land),
            TerrainDesc::new("Mountain", Greenland, Mountain, mine),
            TerrainDesc::new("Snow", Greenland, Snow, TerrainFlags::UNREACHABLE),
            TerrainDesc::new("Swamp", Wasteland, Water, TerrainFlags::empty()),
            TerrainDesc::new("Water", Wasteland, Water, TerrainFlags::SHIPPABLE),
            TerrainDesc::new("Pasture", Wasteland, Land, land),
            TerrainDesc::new("Mountain", Wasteland, Mountain, mine),
            TerrainDesc::new("Lava", Wasteland, Lava, TerrainFlags::UNREACHABLE),
            TerrainDesc::new("Water", Winter, Water, TerrainFlags::SHIPPABLE),
            TerrainDesc::new("Tundra", Winter, Land, land),
            TerrainDesc::new("Mountain", Winter, Mountain, mine),
            TerrainDesc::new("Ice", Winter, Snow, TerrainFlags::UNREACHABLE),
        ];
        Self { terrain }
    }

    /// Parse a catalog from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self> {
        ron::from_str(text).map_err(|e| MapGenError::CatalogParse {
            message: e.to_string(),
        })
    }

    /// Look up a terrain definition.
    #[must_use]
    pub fn get(&self, idx: TerrainIdx) -> Option<&TerrainDesc> {
        self.terrain.get(idx.0 as usize)
    }

    /// First terrain of `landscape` with the given kind and all of `flags`.
    #[must_use]
    pub fn find(
        &self,
        landscape: LandscapeType,
        kind: TerrainKind,
        flags: TerrainFlags,
    ) -> Option<TerrainIdx> {
        self.find_by(|t| t.landscape == landscape && t.kind == kind && t.is(flags))
    }

    /// First terrain of `landscape` with all of `flags`, whatever its kind.
    #[must_use]
    pub fn find_any(&self, landscape: LandscapeType, flags: TerrainFlags) -> Option<TerrainIdx> {
        self.find_by(|t| t.landscape == landscape && t.is(flags))
    }

    fn find_by(&self, pred: impl Fn(&TerrainDesc) -> bool) -> Option<TerrainIdx> {
        self.terrain
            .iter()
            .take(usize::from(u8::MAX) + 1)
            .position(pred)
            .map(|i| TerrainIdx(i as u8))
    }

    /// Returns true if the terrain exists and has all of `flags`.
    #[must_use]
    pub fn is(&self, idx: TerrainIdx, flags: TerrainFlags) -> bool {
        self.get(idx).is_some_and(|t| t.is(flags))
    }
}
