//! Seeded randomness for map generation.
//!
//! A [`RandomConfig`] is an immutable seed plus map style. Every call to
//! the generator asks it for a fresh [`MapRng`], so a generation owns its
//! random stream outright and two generations never share state.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Overall land/water character of a generated map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MapStyle {
    /// Mostly sea with scattered islands.
    Water,
    /// A single continent with a few lakes.
    Land,
    /// Land and water in similar amounts.
    Mixed,
    /// One of the other styles, chosen by the seed.
    #[default]
    Random,
}

impl MapStyle {
    /// Share of vertices (in percent) that end up below sea level.
    #[must_use]
    pub const fn water_percent(self) -> u32 {
        match self {
            Self::Water => 55,
            Self::Land => 6,
            Self::Mixed | Self::Random => 30,
        }
    }
}

/// Seed and style for one or more generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomConfig {
    style: MapStyle,
    seed: u64,
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self::new(MapStyle::Random, 0x1337)
    }
}

impl RandomConfig {
    /// Create a configuration from a style and a seed.
    #[must_use]
    pub const fn new(style: MapStyle, seed: u64) -> Self {
        Self { style, seed }
    }

    /// The seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// The requested style, possibly [`MapStyle::Random`].
    #[must_use]
    pub const fn style(&self) -> MapStyle {
        self.style
    }

    /// Start a new random stream for one generation.
    #[must_use]
    pub fn rng(&self) -> MapRng {
        MapRng::new(self.seed)
    }

    /// Resolve [`MapStyle::Random`] to a concrete style using `rng`.
    pub fn resolve_style(&self, rng: &mut MapRng) -> MapStyle {
        match self.style {
            MapStyle::Random => {
                const CHOICES: [MapStyle; 3] = [MapStyle::Water, MapStyle::Land, MapStyle::Mixed];
                CHOICES[rng.rand(CHOICES.len() as u32) as usize]
            }
            style => style,
        }
    }
}

/// Deterministic random stream for map generation.
#[derive(Debug, Clone)]
pub struct MapRng {
    inner: ChaCha8Rng,
}

impl MapRng {
    /// Create a stream from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniform value in `0..max`, or 0 when `max` is 0.
    pub fn rand(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.inner.gen_range(0..max)
    }

    /// Uniform value in the inclusive range `min..=max`.
    ///
    /// Returns `min` if the range is empty.
    pub fn range(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.inner.gen_range(min..=max)
    }

    /// Uniform float in `0.0..1.0`.
    pub fn next_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// True with the given probability in percent (clamped to 0..=100).
    pub fn chance(&mut self, percent: u32) -> bool {
        self.rand(100) < percent.min(100)
    }

    /// Pick an index with probability proportional to its weight.
    ///
    /// Returns `None` if all weights are zero.
    pub fn weighted_index(&mut self, weights: &[u32]) -> Option<usize> {
        let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
        if total == 0 {
            return None;
        }
        let mut roll = self.inner.gen_range(0..total);
        for (i, &w) in weights.iter().enumerate() {
            let w = u64::from(w);
            if roll < w {
                return Some(i);
            }
            roll -= w;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let config = RandomConfig::new(MapStyle::Land, 42);
        let mut a = config.rng();
        let mut b = config.rng();
        for _ in 0..100 {
            assert_eq!(a.rand(1000), b.rand(1000));
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = MapRng::new(1);
        let mut b = MapRng::new(2);
        let va: Vec<u32> = (0..16).map(|_| a.rand(u32::MAX)).collect();
        let vb: Vec<u32> = (0..16).map(|_| b.rand(u32::MAX)).collect();
        assert_ne!(va, vb);
    }

    #[test]
    fn test_range_bounds() {
        let mut rng = MapRng::new(7);
        for _ in 0..1000 {
            let v = rng.range(-3, 5);
            assert!((-3..=5).contains(&v));
        }
        assert_eq!(rng.range(4, 4), 4);
        assert_eq!(rng.range(9, 2), 9);
        assert_eq!(rng.rand(0), 0);
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = MapRng::new(3);
        for _ in 0..200 {
            assert!(!rng.chance(0));
            assert!(rng.chance(100));
            assert!(rng.chance(250));
        }
    }

    #[test]
    fn test_weighted_index_skips_zero_weights() {
        let mut rng = MapRng::new(11);
        for _ in 0..500 {
            let i = rng.weighted_index(&[0, 3, 0, 1]).unwrap();
            assert!(i == 1 || i == 3);
        }
        assert_eq!(rng.weighted_index(&[0, 0, 0, 0]), None);
        assert_eq!(rng.weighted_index(&[]), None);
    }

    #[test]
    fn test_random_style_resolves_to_concrete_style() {
        let config = RandomConfig::new(MapStyle::Random, 99);
        let mut rng = config.rng();
        for _ in 0..20 {
            assert_ne!(config.resolve_style(&mut rng), MapStyle::Random);
        }

        let fixed = RandomConfig::new(MapStyle::Water, 99);
        assert_eq!(fixed.resolve_style(&mut rng), MapStyle::Water);
    }
}
