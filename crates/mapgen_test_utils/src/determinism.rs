//! Determinism testing utilities.
//!
//! Generated maps must be a pure function of settings, terrain catalog and
//! seed. Sources of non-determinism include:
//!
//! - **Process-wide randomness**: every generation builds its own seeded
//!   stream from the [`RandomConfig`].
//! - **HashMap iteration order**: passes iterate vertices in index order.
//! - **Shared mutable state**: a generator holds only immutable inputs, so
//!   reusing it or sharing it between threads must not change results.
//!
//! Maps are compared by hashing their `bincode` encoding, which covers
//! every layer byte for byte.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use mapgen_core::generator::RandomMapGenerator;
use mapgen_core::map::Map;
use mapgen_core::random::RandomConfig;
use mapgen_core::settings::MapSettings;
use tracing::warn;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical maps.
    pub is_deterministic: bool,
    /// Map hash from each run.
    pub hashes: Vec<u64>,
    /// Seed used by every run.
    pub seed: u64,
}

impl DeterminismResult {
    fn from_hashes(hashes: Vec<u64>, seed: u64) -> Self {
        let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);
        if !is_deterministic {
            warn!(seed, ?hashes, "Map generation diverged");
        }
        Self {
            is_deterministic,
            hashes,
            seed,
        }
    }

    /// Get all unique hashes (should be 1 for deterministic generation).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that generation was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different maps.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Map generation is non-deterministic!\n\
                 Runs: {}\n\
                 Seed: {:#x}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.seed,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Hash every layer of a map.
///
/// # Panics
///
/// Panics if the map cannot be encoded, which cannot happen for maps built
/// by the generator.
#[must_use]
pub fn map_hash(map: &Map) -> u64 {
    let bytes = bincode::serialize(map).expect("map encodes with bincode");
    compute_hash(&bytes)
}

/// Generate the same map `runs` times, each with a fresh generator.
#[must_use]
pub fn verify_generation_determinism(
    config: RandomConfig,
    settings: &MapSettings,
    runs: usize,
) -> DeterminismResult {
    let hashes = (0..runs)
        .map(|_| map_hash(&RandomMapGenerator::with_default_terrain(config).create(settings)))
        .collect();
    DeterminismResult::from_hashes(hashes, config.seed())
}

/// Generate the same map on `threads` threads sharing one generator.
///
/// # Panics
///
/// Panics if a generation thread panics.
#[must_use]
pub fn verify_parallel_generation(
    config: RandomConfig,
    settings: &MapSettings,
    threads: usize,
) -> DeterminismResult {
    let generator = RandomMapGenerator::with_default_terrain(config);
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|_| s.spawn(|| map_hash(&generator.create(settings))))
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("generation thread panicked"))
            .collect()
    });
    DeterminismResult::from_hashes(hashes, config.seed())
}

/// Name of the first map layer that differs, if any.
#[must_use]
pub fn find_first_difference(a: &Map, b: &Map) -> Option<&'static str> {
    if a.size != b.size {
        return Some("size");
    }
    if a.positions != b.positions || a.players != b.players {
        return Some("positions");
    }
    [
        ("terrain", a.terrain == b.terrain),
        ("heights", a.heights == b.heights),
        ("object_type", a.object_type == b.object_type),
        ("object_info", a.object_info == b.object_info),
        ("resources", a.resources == b.resources),
        ("harbors", a.harbors == b.harbors),
    ]
    .into_iter()
    .find(|(_, same)| !same)
    .map(|(layer, _)| layer)
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for generation testing.
pub mod strategies {
    use mapgen_core::random::{MapStyle, RandomConfig};
    use mapgen_core::settings::{IslandAmount, MapSettings, MountainDistance, MAX_PLAYERS};
    use mapgen_core::terrain::LandscapeType;
    use mapgen_core::vertex::MapExtent;
    use proptest::prelude::*;

    /// Any map style, including [`MapStyle::Random`].
    pub fn arb_style() -> impl Strategy<Value = MapStyle> {
        prop_oneof![
            Just(MapStyle::Water),
            Just(MapStyle::Land),
            Just(MapStyle::Mixed),
            Just(MapStyle::Random),
        ]
    }

    /// Any landscape.
    pub fn arb_landscape() -> impl Strategy<Value = LandscapeType> {
        prop_oneof![
            Just(LandscapeType::Greenland),
            Just(LandscapeType::Wasteland),
            Just(LandscapeType::Winter),
        ]
    }

    /// Any generator configuration.
    pub fn arb_config() -> impl Strategy<Value = RandomConfig> {
        (arb_style(), any::<u64>()).prop_map(|(style, seed)| RandomConfig::new(style, seed))
    }

    /// Even map sizes from 32 to 64 per side.
    pub fn arb_size() -> impl Strategy<Value = MapExtent> {
        (16u16..=32, 16u16..=32).prop_map(|(x, y)| MapExtent::new(x * 2, y * 2))
    }

    /// Settings that need no normalization and leave room for every player.
    pub fn arb_settings() -> impl Strategy<Value = MapSettings> {
        (
            arb_size(),
            1..=MAX_PLAYERS as u32,
            arb_landscape(),
            (0.1f64..0.5, 0.0f64..0.4),
            (0u32..50, 0u32..50, 0u32..50, 1u32..50),
            (0u32..=100, 0u32..=100, 0u32..=100),
            prop_oneof![
                Just(MountainDistance::Close),
                Just(MountainDistance::Normal),
                Just(MountainDistance::Far),
                Just(MountainDistance::VeryFar),
            ],
            prop_oneof![
                Just(IslandAmount::Few),
                Just(IslandAmount::Normal),
                Just(IslandAmount::Many),
            ],
        )
            .prop_map(
                |(
                    size,
                    players,
                    landscape,
                    (min_r, extra_r),
                    (coal, gold, iron, granite),
                    (rivers, trees, stone_piles),
                    mountain_distance,
                    islands,
                )| MapSettings {
                    size,
                    players,
                    landscape,
                    min_player_radius: min_r,
                    max_player_radius: min_r + extra_r,
                    ratio_coal: coal,
                    ratio_gold: gold,
                    ratio_iron: iron,
                    ratio_granite: granite,
                    rivers,
                    trees,
                    stone_piles,
                    mountain_distance,
                    islands,
                    ..Default::default()
                },
            )
    }
}
