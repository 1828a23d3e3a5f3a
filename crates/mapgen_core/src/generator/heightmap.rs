//! Terrain base pass: height field and terrain classes.

use crate::map::Map;
use crate::random::{MapRng, MapStyle};
use crate::settings::IslandAmount;
use crate::vertex::{self, MapExtent, Position};

use super::{Layout, TerrainClass, TerrainPalette};

/// Highest vertex height produced by the generator.
pub const MAX_HEIGHT: u8 = 60;

/// Share of vertices (percent) above which terrain turns into mountain.
const MOUNTAIN_PERCENTILE: usize = 85;

/// Share of vertices (percent) above which mountains become peaks.
const PEAK_PERCENTILE: usize = 97;

/// One hill per this many vertices.
const VERTICES_PER_HILL: usize = 40;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TerrainStats {
    pub water: usize,
    pub mountain: usize,
}

/// Build heights and terrain classes for the whole map.
pub(crate) fn build_terrain(
    map: &mut Map,
    layout: &mut Layout,
    palette: &TerrainPalette,
    style: MapStyle,
    islands: IslandAmount,
    rng: &mut MapRng,
) -> TerrainStats {
    let size = map.size;
    let area = size.area();
    let min_dim = i32::from(size.min_dim());
    let mut field = vec![0i64; area];

    let hills = (area / VERTICES_PER_HILL).max(4);
    for _ in 0..hills {
        let radius = rng.range(2, (min_dim / 4).max(3));
        let strength = rng.range(10, 40);
        raise(&mut field, size, rng, radius, strength);
    }

    if style == MapStyle::Water {
        let count = (area * islands.per_mille() as usize / 1000).max(1);
        for _ in 0..count {
            let radius = rng.range(2, (min_dim / 6).max(3));
            let strength = rng.range(40, 60);
            raise(&mut field, size, rng, radius, strength);
        }
    }

    smooth(&mut field, size);
    smooth(&mut field, size);
    normalize(&field, &mut map.heights);

    let mut sorted = map.heights.clone();
    sorted.sort_unstable();
    let sea_level = sorted[(area * style.water_percent() as usize / 100).min(area - 1)];
    let mountain_level = sorted[area * MOUNTAIN_PERCENTILE / 100];
    let peak_level = sorted[area * PEAK_PERCENTILE / 100];
    layout.sea_level = sea_level;

    let mut stats = TerrainStats::default();
    for idx in 0..area {
        let h = map.heights[idx];
        let class = if h < sea_level {
            stats.water += 1;
            TerrainClass::Water
        } else if h > peak_level {
            TerrainClass::Peak
        } else if h > mountain_level {
            stats.mountain += 1;
            TerrainClass::Mountain
        } else {
            TerrainClass::Land
        };
        layout.set_class(map, palette, idx, class);
    }
    stats
}

/// Add a round hill at a random vertex.
fn raise(field: &mut [i64], size: MapExtent, rng: &mut MapRng, radius: i32, strength: i32) {
    let center = vertex::position(rng.rand(size.area() as u32) as usize, size);
    let c = Position::from(center);
    let r_sq = i64::from(radius * radius);

    // Radius stays below half the map, so no vertex is visited twice.
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let d_sq = i64::from(dx * dx + dy * dy);
            if d_sq > r_sq {
                continue;
            }
            let pt = vertex::wrap(c + Position::new(dx, dy), size);
            field[vertex::index(pt, size)] += i64::from(strength) * (r_sq - d_sq) * 100 / r_sq;
        }
    }
}

/// Blend every vertex with its six neighbours.
fn smooth(field: &mut Vec<i64>, size: MapExtent) {
    let smoothed: Vec<i64> = (0..field.len())
        .map(|idx| {
            let pt = vertex::position(idx, size);
            let around: i64 = vertex::neighbours(pt, size)
                .iter()
                .map(|&n| field[vertex::index(n, size)])
                .sum();
            (field[idx] * 2 + around) / 8
        })
        .collect();
    *field = smoothed;
}

/// Scale the field into `0..=MAX_HEIGHT`.
fn normalize(field: &[i64], heights: &mut [u8]) {
    let min = field.iter().copied().min().unwrap_or(0);
    let max = field.iter().copied().max().unwrap_or(0);
    let span = max - min;
    for (h, &v) in heights.iter_mut().zip(field) {
        *h = if span == 0 {
            0
        } else {
            ((v - min) * i64::from(MAX_HEIGHT) / span) as u8
        };
    }
}
