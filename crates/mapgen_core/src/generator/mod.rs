//! Random map generator.
//!
//! Generates playable maps in staged passes:
//! - Height field and terrain classes shaped by the map style
//! - Symmetric headquarters placement inside a radius band
//! - Mountain deposits weighted by the resource ratios
//! - Rivers, stone piles and trees
//! - Harbor sites along the coasts
//!
//! Every pass is a plain function over the map under construction and one
//! random stream. Passes never fail: when the settings ask for more than
//! the map can hold they place less and report what they managed.

mod decoration;
mod harbors;
mod heightmap;
mod players;
mod resources;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{MapGenError, Result};
use crate::map::Map;
use crate::random::{MapStyle, RandomConfig};
use crate::settings::{MapSettings, MIN_MAP_SIZE};
use crate::terrain::{LandscapeType, TerrainFlags, TerrainIdx, TerrainKind, WorldDescription};

pub use harbors::{harbor_site_near, is_harbor_site, SeaMask, HARBOR_SPACING, MIN_SEA_SIZE};
pub use heightmap::MAX_HEIGHT;
pub use players::{RadiusBand, MIN_HQ_DISTANCE};
pub use resources::ResourceStats;

/// Coarse terrain category used while generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TerrainClass {
    /// Shippable water.
    Water,
    /// Buildable land.
    #[default]
    Land,
    /// Mineable mountain.
    Mountain,
    /// Unreachable peak.
    Peak,
}

/// The terrain used for each class on one landscape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainPalette {
    /// Shippable water.
    pub water: TerrainIdx,
    /// Buildable land.
    pub land: TerrainIdx,
    /// Mineable mountain.
    pub mountain: TerrainIdx,
    /// Unreachable peak.
    pub peak: TerrainIdx,
}

impl TerrainPalette {
    /// Look up every class by capability.
    pub fn resolve(world: &WorldDescription, landscape: LandscapeType) -> Result<Self> {
        let missing = |capability| MapGenError::MissingTerrain {
            landscape,
            capability,
        };
        Ok(Self {
            water: world
                .find(landscape, TerrainKind::Water, TerrainFlags::SHIPPABLE)
                .ok_or_else(|| missing("shippable water"))?,
            land: world
                .find(landscape, TerrainKind::Land, TerrainFlags::BUILDABLE)
                .ok_or_else(|| missing("buildable land"))?,
            mountain: world
                .find(landscape, TerrainKind::Mountain, TerrainFlags::MINEABLE)
                .ok_or_else(|| missing("mineable mountain"))?,
            peak: world
                .find_any(landscape, TerrainFlags::UNREACHABLE)
                .ok_or_else(|| missing("unreachable"))?,
        })
    }

    /// Terrain for a class.
    #[must_use]
    pub const fn terrain(&self, class: TerrainClass) -> TerrainIdx {
        match class {
            TerrainClass::Water => self.water,
            TerrainClass::Land => self.land,
            TerrainClass::Mountain => self.mountain,
            TerrainClass::Peak => self.peak,
        }
    }
}

/// Scratch state shared by the passes of one generation.
#[derive(Debug, Clone)]
pub(crate) struct Layout {
    /// Terrain class per vertex.
    pub classes: Vec<TerrainClass>,
    /// Vertices inside a headquarters zone; later passes leave them alone.
    pub reserved: Vec<bool>,
    /// Height below which vertices became water.
    pub sea_level: u8,
}

impl Layout {
    fn new(area: usize) -> Self {
        Self {
            classes: vec![TerrainClass::Land; area],
            reserved: vec![false; area],
            sea_level: 0,
        }
    }

    /// Change the class of a vertex and its terrain on the map.
    pub fn set_class(
        &mut self,
        map: &mut Map,
        palette: &TerrainPalette,
        idx: usize,
        class: TerrainClass,
    ) {
        self.classes[idx] = class;
        map.terrain[idx] = palette.terrain(class);
    }
}

/// What a generation actually produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Style after resolving [`MapStyle::Random`].
    pub style: MapStyle,
    /// Players requested after normalization.
    pub requested_players: u32,
    /// Players that received a headquarters.
    pub placed_players: u32,
    /// True if the radius band was unusable and nearest-fit placement ran.
    pub placement_fallback: bool,
    /// Water vertices after the terrain pass.
    pub water_vertices: usize,
    /// Mountain vertices after the terrain pass.
    pub mountain_vertices: usize,
    /// Deposits placed by the resource pass.
    pub resources: ResourceStats,
    /// Rivers carved.
    pub rivers: u32,
    /// Trees planted.
    pub trees: u32,
    /// Stone piles placed.
    pub stone_piles: u32,
    /// Harbor sites found.
    pub harbors: u32,
}

/// Procedural map generator.
///
/// Holds only immutable inputs, so one generator can serve many
/// [`RandomMapGenerator::create`] calls, also from several threads; each
/// call starts its own random stream from the configured seed. Clones
/// share the terrain catalog.
#[derive(Debug, Clone)]
pub struct RandomMapGenerator {
    config: RandomConfig,
    world: Arc<WorldDescription>,
    palettes: [TerrainPalette; 3],
}

impl RandomMapGenerator {
    /// Create a generator on top of a terrain catalog.
    ///
    /// # Errors
    ///
    /// Returns [`MapGenError::MissingTerrain`] if some landscape lacks a
    /// terrain the generator needs.
    pub fn new(config: RandomConfig, world: WorldDescription) -> Result<Self> {
        let palettes = [
            TerrainPalette::resolve(&world, LandscapeType::Greenland)?,
            TerrainPalette::resolve(&world, LandscapeType::Wasteland)?,
            TerrainPalette::resolve(&world, LandscapeType::Winter)?,
        ];
        Ok(Self {
            config,
            world: Arc::new(world),
            palettes,
        })
    }

    /// Same generator with another seed. The style and catalog are kept.
    #[must_use]
    pub fn with_seed(&self, seed: u64) -> Self {
        Self {
            config: RandomConfig::new(self.config.style(), seed),
            world: Arc::clone(&self.world),
            palettes: self.palettes,
        }
    }

    /// Create a generator using the built-in terrain catalog.
    ///
    /// # Panics
    ///
    /// Panics if the built-in catalog misses a required terrain.
    #[must_use]
    pub fn with_default_terrain(config: RandomConfig) -> Self {
        Self::new(config, WorldDescription::default_terrain())
            .expect("built-in terrain catalog covers every landscape")
    }

    /// Seed and style in use.
    #[must_use]
    pub const fn config(&self) -> &RandomConfig {
        &self.config
    }

    /// Terrain catalog in use.
    #[must_use]
    pub fn world(&self) -> &WorldDescription {
        &self.world
    }

    fn palette(&self, landscape: LandscapeType) -> &TerrainPalette {
        match landscape {
            LandscapeType::Greenland => &self.palettes[0],
            LandscapeType::Wasteland => &self.palettes[1],
            LandscapeType::Winter => &self.palettes[2],
        }
    }

    /// Generate a map. The settings are normalized first.
    #[must_use]
    pub fn create(&self, settings: &MapSettings) -> Map {
        self.create_with_report(settings).0
    }

    /// Generate a map and report what every pass produced.
    ///
    /// # Panics
    ///
    /// Panics if the normalized map is smaller than the minimum playable
    /// size, which normalization rules out.
    #[must_use]
    pub fn create_with_report(&self, settings: &MapSettings) -> (Map, GenerationReport) {
        let settings = settings.validated();
        let size = settings.size;
        assert!(
            size.x >= MIN_MAP_SIZE && size.y >= MIN_MAP_SIZE,
            "map size {size} below minimum playable size"
        );

        let mut rng = self.config.rng();
        // An explicit config style wins over the settings.
        let requested = match self.config.style() {
            MapStyle::Random => settings.style,
            style => style,
        };
        let style = RandomConfig::new(requested, self.config.seed()).resolve_style(&mut rng);
        let palette = *self.palette(settings.landscape);

        let mut map = Map::new(size, &settings.name, &settings.author, settings.landscape);
        let mut layout = Layout::new(size.area());

        let terrain = heightmap::build_terrain(
            &mut map,
            &mut layout,
            &palette,
            style,
            settings.islands,
            &mut rng,
        );
        debug!(
            ?style,
            water = terrain.water,
            mountain = terrain.mountain,
            sea_level = layout.sea_level,
            "Terrain pass done"
        );

        let placement =
            players::place_players(&mut map, &mut layout, &palette, &settings, &mut rng);
        debug!(
            placed = placement.placed,
            fallback = placement.fallback,
            "Player pass done"
        );
        players::restore_mountains(&mut map, &mut layout, &palette, terrain.mountain);

        let deposits = resources::seed_resources(&mut map, &layout, &settings, &mut rng);
        debug!(?deposits, "Resource pass done");

        let decoration =
            decoration::decorate(&mut map, &mut layout, &palette, &settings, &mut rng);
        debug!(
            rivers = decoration.rivers,
            trees = decoration.trees,
            stone_piles = decoration.stone_piles,
            "Decoration pass done"
        );

        let harbors = harbors::place_harbors(&mut map, &self.world);
        debug!(harbors, "Harbor pass done");

        validate(&map, &settings);

        let report = GenerationReport {
            style,
            requested_players: settings.players,
            placed_players: map.players,
            placement_fallback: placement.fallback,
            water_vertices: terrain.water,
            mountain_vertices: terrain.mountain,
            resources: deposits,
            rivers: decoration.rivers,
            trees: decoration.trees,
            stone_piles: decoration.stone_piles,
            harbors: harbors as u32,
        };
        info!(
            name = %map.name,
            size = %map.size,
            seed = self.config.seed(),
            players = map.players,
            harbors,
            "Generated random map"
        );
        (map, report)
    }
}

/// Final structural checks on a finished map.
fn validate(map: &Map, settings: &MapSettings) {
    let area = settings.size.area();
    assert_eq!(map.size, settings.size, "map size differs from settings");
    assert_eq!(map.terrain.len(), area);
    assert_eq!(map.heights.len(), area);
    assert_eq!(map.object_type.len(), area);
    assert_eq!(map.object_info.len(), area);
    assert_eq!(map.resources.len(), area);
    assert!(
        map.players >= 1 && map.players <= settings.players,
        "player count {} outside 1..={}",
        map.players,
        settings.players
    );

    #[cfg(feature = "debug-validation")]
    for (i, pt) in map.positions.iter().enumerate() {
        assert_eq!(pt.is_valid(), i < map.players as usize);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{OI_GRANITE, OI_HEADQUARTER_MASK, OI_TREE};
    use crate::settings::MAX_PLAYERS;
    use crate::vertex::{self, MapExtent, MapPoint, Position};

    fn settings(x: u16, y: u16, players: u32) -> MapSettings {
        MapSettings {
            size: MapExtent::new(x, y),
            players,
            min_player_radius: 0.2,
            max_player_radius: 0.3,
            ..Default::default()
        }
    }

    fn generator(seed: u64) -> RandomMapGenerator {
        RandomMapGenerator::with_default_terrain(RandomConfig::new(MapStyle::Random, seed))
    }

    #[test]
    fn test_correct_size() {
        let s = settings(38, 30, 1);
        let map = generator(0x1337).create(&s);
        assert_eq!(map.size, s.size);
        assert_eq!(map.terrain.len(), 38 * 30);
    }

    #[test]
    fn test_headquarters_markers() {
        let s = settings(30, 32, 2);
        let map = generator(0x1337).create(&s);
        assert_eq!(map.players, 2);
        for i in 0..2 {
            let pt = map.positions[i];
            assert!(pt.is_valid());
            let idx = map.index(pt);
            assert_eq!(map.object_type[idx], i as u8);
            assert_eq!(map.object_info[idx], OI_HEADQUARTER_MASK);
        }
        for i in 2..MAX_PLAYERS {
            assert_eq!(map.positions[i], MapPoint::INVALID);
        }
    }

    #[test]
    fn test_headquarters_on_buildable_land() {
        let g = generator(5);
        let map = g.create(&settings(48, 48, 4));
        for i in 0..map.players as usize {
            let pt = map.positions[i];
            assert!(map.has_terrain(g.world(), pt, TerrainFlags::BUILDABLE));
        }
    }

    #[test]
    fn test_report_matches_map() {
        let g = generator(77);
        let (map, report) = g.create_with_report(&MapSettings::default());
        assert_eq!(report.placed_players, map.players);
        assert_eq!(report.requested_players, 2);
        assert_ne!(report.style, MapStyle::Random);
        assert_eq!(report.trees as usize, map.count_objects(OI_TREE));
        assert_eq!(report.stone_piles as usize, map.count_objects(OI_GRANITE));
        assert_eq!(report.harbors as usize, map.harbors.len());
    }

    #[test]
    fn test_generator_reuse_is_deterministic() {
        let g = generator(4242);
        let s = MapSettings::default();
        assert_eq!(g.create(&s), g.create(&s));
    }

    #[test]
    fn test_with_seed_matches_fresh_generator() {
        let s = settings(32, 32, 2);
        let base = generator(1);
        let reseeded = base.with_seed(2);
        assert_eq!(reseeded.config().seed(), 2);
        assert_eq!(reseeded.config().style(), base.config().style());
        assert!(Arc::ptr_eq(&base.world, &reseeded.world));
        assert_eq!(reseeded.create(&s), generator(2).create(&s));
    }

    #[test]
    fn test_hq_zone_has_no_decoration() {
        let g = generator(9);
        let s = MapSettings {
            trees: 100,
            stone_piles: 100,
            ..settings(40, 40, 2)
        };
        let map = g.create(&s);
        let radius = s.mountain_distance.hq_zone_radius_on(map.size);
        for i in 0..map.players as usize {
            for pt in vertex::points_in_radius(map.positions[i], radius, map.size) {
                let info = map.object_info[map.index(pt)];
                assert!(info == 0 || info == OI_HEADQUARTER_MASK);
            }
        }
    }

    #[test]
    fn test_missing_terrain_is_reported() {
        let mut world = WorldDescription::default_terrain();
        world
            .terrain
            .retain(|t| !(t.landscape == LandscapeType::Winter && t.kind == TerrainKind::Mountain));
        let err = RandomMapGenerator::new(RandomConfig::default(), world).unwrap_err();
        assert!(matches!(
            err,
            MapGenError::MissingTerrain {
                landscape: LandscapeType::Winter,
                ..
            }
        ));
    }

    #[test]
    fn test_distance_to_center_in_band() {
        let s = settings(64, 64, 6);
        let map = generator(3).create(&s);
        let half = f64::from(map.size.min_dim() / 2);
        for i in 0..map.players as usize {
            let d = vertex::distance(Position::from(map.positions[i]), map.size.center(), map.size);
            assert!(d >= s.min_player_radius * half && d <= s.max_player_radius * half);
        }
    }
}
