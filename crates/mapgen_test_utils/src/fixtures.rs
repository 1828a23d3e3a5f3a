//! Test fixtures and helpers.
//!
//! Pre-built settings and hand-made maps for consistent testing.

use mapgen_core::generator::RandomMapGenerator;
use mapgen_core::map::Map;
use mapgen_core::random::{MapStyle, RandomConfig};
use mapgen_core::settings::MapSettings;
use mapgen_core::terrain::{LandscapeType, TerrainFlags, TerrainKind, WorldDescription};
use mapgen_core::vertex::{self, MapExtent, MapPoint};

/// Seed used by tests that do not care about the seed.
pub const TEST_SEED: u64 = 0x1337;

/// Distance between the map border and the land ring of a sea world.
pub const SEA_WORLD_OFFSET: u16 = 7;

/// Width of the land ring of a sea world.
pub const SEA_WORLD_RING: u16 = 15;

/// Settings for a map of the given size and player count.
#[must_use]
pub fn settings(x: u16, y: u16, players: u32) -> MapSettings {
    MapSettings {
        size: MapExtent::new(x, y),
        players,
        ..Default::default()
    }
}

/// Settings with an explicit player radius band.
#[must_use]
pub fn settings_with_radii(x: u16, y: u16, players: u32, min: f64, max: f64) -> MapSettings {
    MapSettings {
        min_player_radius: min,
        max_player_radius: max,
        ..settings(x, y, players)
    }
}

/// Generator over the built-in terrain catalog.
#[must_use]
pub fn generator(style: MapStyle, seed: u64) -> RandomMapGenerator {
    RandomMapGenerator::with_default_terrain(RandomConfig::new(style, seed))
}

/// A map of open sea with a square ring of flat land and an inner lake.
#[derive(Debug, Clone)]
pub struct SeaWorld {
    /// The map.
    pub map: Map,
    /// Catalog the map's terrain refers to.
    pub world: WorldDescription,
    /// Headquarters in the middle of the top, bottom, left and right side
    /// of the ring.
    pub hqs: [MapPoint; 4],
}

/// Build a sea world.
///
/// The land ring starts [`SEA_WORLD_OFFSET`] vertices from the border and is
/// [`SEA_WORLD_RING`] vertices wide. Everything else is shippable water.
///
/// # Panics
///
/// Panics if `size` is too small to hold the ring and a lake.
#[must_use]
pub fn create_sea_world(size: MapExtent) -> SeaWorld {
    let offset = SEA_WORLD_OFFSET;
    let ring = SEA_WORLD_RING;
    assert!(
        size.min_dim() > 2 * (offset + ring),
        "sea world needs more than {} vertices per side",
        2 * (offset + ring)
    );

    let world = WorldDescription::default_terrain();
    let land = world
        .find(LandscapeType::Greenland, TerrainKind::Land, TerrainFlags::BUILDABLE)
        .expect("catalog has buildable land");
    let water = world
        .find(LandscapeType::Greenland, TerrainKind::Water, TerrainFlags::SHIPPABLE)
        .expect("catalog has shippable water");

    let mut map = Map::new(size, "Sea World", "Test", LandscapeType::Greenland);
    let inside = |v: u16, lo: u16, len: u16| v >= lo && v < len - lo;
    for idx in 0..size.area() {
        let pt = vertex::position(idx, size);
        let outer = inside(pt.x, offset, size.x) && inside(pt.y, offset, size.y);
        let lake = inside(pt.x, offset + ring, size.x) && inside(pt.y, offset + ring, size.y);
        map.terrain[idx] = if outer && !lake { land } else { water };
    }

    let mid = offset + ring / 2;
    let hqs = [
        MapPoint::new(size.x / 2, mid),
        MapPoint::new(size.x / 2, size.y - 1 - mid),
        MapPoint::new(mid, size.y / 2),
        MapPoint::new(size.x - 1 - mid, size.y / 2),
    ];
    for (player, &pt) in hqs.iter().enumerate() {
        map.set_headquarters(player, pt);
    }
    map.players = hqs.len() as u32;

    SeaWorld { map, world, hqs }
}
