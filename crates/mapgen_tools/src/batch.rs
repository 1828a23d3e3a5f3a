//! Parallel batch generation and determinism checks.

use std::path::Path;
use std::time::Instant;

use mapgen_core::generator::{GenerationReport, RandomMapGenerator};
use mapgen_core::random::RandomConfig;
use mapgen_core::settings::MapSettings;
use mapgen_core::terrain::WorldDescription;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ToolError, ToolResult};

/// Configuration for a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of maps to generate.
    pub count: u32,
    /// Seed of the first map; later maps use the following seeds.
    pub seed_start: u64,
    /// Worker threads (0 = auto).
    pub parallel: u32,
    /// Settings shared by every map, including the map style.
    pub settings: MapSettings,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            count: 10,
            seed_start: 0,
            parallel: 0,
            settings: MapSettings::default(),
        }
    }
}

impl BatchConfig {
    /// Create a batch of `count` maps.
    #[must_use]
    pub fn new(count: u32) -> Self {
        Self {
            count,
            ..Default::default()
        }
    }

    /// Set the starting seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed_start = seed;
        self
    }

    /// Set the shared settings.
    #[must_use]
    pub fn with_settings(mut self, settings: MapSettings) -> Self {
        self.settings = settings;
        self
    }
}

/// Outcome of one map in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchEntry {
    /// Seed the map was generated with.
    pub seed: u64,
    /// What the generator produced.
    pub report: GenerationReport,
}

/// Aggregates over a whole batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Maps generated.
    pub maps: usize,
    /// Maps that placed fewer players than requested.
    pub reduced_players: usize,
    /// Maps that needed nearest-fit placement.
    pub fallback_placements: usize,
    /// Mean number of trees per map.
    pub avg_trees: f64,
    /// Mean number of mountain deposits per map.
    pub avg_deposits: f64,
    /// Mean number of harbor sites per map.
    pub avg_harbors: f64,
}

impl BatchSummary {
    /// Aggregate the entries of a batch.
    #[must_use]
    pub fn from_entries(entries: &[BatchEntry]) -> Self {
        if entries.is_empty() {
            return Self::default();
        }
        let n = entries.len() as f64;
        let mean = |f: fn(&GenerationReport) -> usize| {
            entries.iter().map(|e| f(&e.report) as f64).sum::<f64>() / n
        };
        Self {
            maps: entries.len(),
            reduced_players: entries
                .iter()
                .filter(|e| e.report.placed_players < e.report.requested_players)
                .count(),
            fallback_placements: entries
                .iter()
                .filter(|e| e.report.placement_fallback)
                .count(),
            avg_trees: mean(|r| r.trees as usize),
            avg_deposits: mean(|r| r.resources.mountain_total()),
            avg_harbors: mean(|r| r.harbors as usize),
        }
    }
}

/// Results of a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResults {
    /// Configuration used.
    pub config: BatchConfig,
    /// One entry per map, ordered by seed.
    pub entries: Vec<BatchEntry>,
    /// Aggregated statistics.
    pub summary: BatchSummary,
    /// Wall time in seconds.
    pub duration_seconds: f64,
}

impl BatchResults {
    /// Save results as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn save(&self, path: &Path) -> ToolResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ToolError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load results saved by [`BatchResults::save`].
    ///
    /// # Errors
    ///
    /// Returns an error if reading or decoding fails.
    pub fn load(path: &Path) -> ToolResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| ToolError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Generate a batch of maps in parallel.
///
/// # Errors
///
/// Returns an error if the terrain catalog misses a required terrain.
pub fn run_batch(config: BatchConfig, world: &WorldDescription) -> ToolResult<BatchResults> {
    let start = Instant::now();
    info!(count = config.count, seed = config.seed_start, "Starting batch run");

    let base = RandomMapGenerator::new(
        RandomConfig::new(config.settings.style, config.seed_start),
        world.clone(),
    )?;

    if config.parallel > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.parallel as usize)
            .build_global()
            .ok(); // Ignore if already set
    }

    let entries: Vec<BatchEntry> = (0..config.count)
        .into_par_iter()
        .map(|i| {
            let seed = config.seed_start.wrapping_add(u64::from(i));
            let (_, report) = base.with_seed(seed).create_with_report(&config.settings);
            debug!(seed, players = report.placed_players, "Map done");
            BatchEntry { seed, report }
        })
        .collect();

    let summary = BatchSummary::from_entries(&entries);
    let duration_seconds = start.elapsed().as_secs_f64();
    info!(
        "Batch complete: {} maps in {:.1}s",
        entries.len(),
        duration_seconds
    );

    Ok(BatchResults {
        config,
        entries,
        summary,
        duration_seconds,
    })
}

/// Generate one seed `runs` times in parallel and compare the maps.
///
/// # Errors
///
/// Returns [`ToolError::Nondeterministic`] if any two maps differ, or an
/// error if the terrain catalog misses a required terrain.
pub fn verify_determinism(
    config: RandomConfig,
    settings: &MapSettings,
    world: &WorldDescription,
    runs: u32,
) -> ToolResult<()> {
    let generator = RandomMapGenerator::new(config, world.clone())?;
    let maps: Vec<_> = (0..runs)
        .into_par_iter()
        .map(|_| generator.create(settings))
        .collect();

    let mut unique: Vec<&_> = Vec::new();
    for map in &maps {
        if !unique.contains(&map) {
            unique.push(map);
        }
    }
    if unique.len() > 1 {
        return Err(ToolError::Nondeterministic {
            seed: config.seed(),
            runs,
            unique: unique.len(),
        });
    }
    info!(seed = config.seed(), runs, "Generation is deterministic");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapgen_core::random::MapStyle;
    use mapgen_core::vertex::MapExtent;

    fn small() -> MapSettings {
        MapSettings {
            size: MapExtent::new(32, 32),
            ..Default::default()
        }
    }

    #[test]
    fn test_batch_config_builder() {
        let config = BatchConfig::new(5).with_seed(42).with_settings(small());
        assert_eq!(config.count, 5);
        assert_eq!(config.seed_start, 42);
        assert_eq!(config.settings.size, MapExtent::new(32, 32));
    }

    #[test]
    fn test_run_batch_small() {
        let results = run_batch(
            BatchConfig::new(4).with_seed(100).with_settings(small()),
            &WorldDescription::default_terrain(),
        )
        .unwrap();
        assert_eq!(results.entries.len(), 4);
        let seeds: Vec<u64> = results.entries.iter().map(|e| e.seed).collect();
        assert_eq!(seeds, vec![100, 101, 102, 103]);
        assert_eq!(results.summary.maps, 4);
    }

    #[test]
    fn test_batch_uses_settings_style() {
        let settings = MapSettings {
            style: MapStyle::Water,
            ..small()
        };
        let world = WorldDescription::default_terrain();
        let results = run_batch(
            BatchConfig::new(3).with_seed(20).with_settings(settings.clone()),
            &world,
        )
        .unwrap();
        for entry in &results.entries {
            assert_eq!(entry.report.style, MapStyle::Water);
            let generator =
                RandomMapGenerator::new(RandomConfig::new(MapStyle::Water, entry.seed), world.clone())
                    .unwrap();
            assert_eq!(entry.report, generator.create_with_report(&settings).1);
        }
    }

    #[test]
    fn test_batch_summary_of_nothing() {
        assert_eq!(BatchSummary::from_entries(&[]), BatchSummary::default());
    }

    #[test]
    fn test_verify_determinism() {
        verify_determinism(
            RandomConfig::new(MapStyle::Mixed, 9),
            &small(),
            &WorldDescription::default_terrain(),
            3,
        )
        .unwrap();
    }
}
