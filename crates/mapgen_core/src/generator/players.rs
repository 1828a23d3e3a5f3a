//! Player placement pass.
//!
//! Headquarters are spread evenly on a circle around the map center: one
//! random start angle, equal angular steps, and one radius shared by all
//! players so the layout stays symmetric. Each target is snapped to the
//! closest usable vertex.

use std::f64::consts::TAU;

use tracing::{debug, warn};

use crate::map::Map;
use crate::random::MapRng;
use crate::settings::MapSettings;
use crate::vertex::{self, MapExtent, MapPoint, Position};

use super::{Layout, TerrainClass, TerrainPalette};

/// Minimum distance between two headquarters.
pub const MIN_HQ_DISTANCE: u64 = 4;

/// Extra cost for snapping onto a vertex that is not land.
const NON_LAND_PENALTY: f64 = 3.0;

/// Allowed HQ distances from the map center.
///
/// `min`/`max` are the configured radii scaled to vertices and are what
/// in-band checks use. `lo`/`hi` are the same values clamped to what the
/// map can actually offer and drive the choice of the target radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusBand {
    /// Smallest allowed distance.
    pub min: f64,
    /// Largest allowed distance.
    pub max: f64,
    lo: f64,
    hi: f64,
}

impl RadiusBand {
    /// Scale the configured radii to a map size.
    #[must_use]
    pub fn new(settings: &MapSettings, size: MapExtent) -> Self {
        let half = f64::from(size.min_dim() / 2);
        let reach = vertex::max_distance(size);
        let min = settings.min_player_radius * half;
        let max = settings.max_player_radius * half;
        let clamp = |v: f64, fallback: f64| if v.is_nan() { fallback } else { v.clamp(0.0, reach) };
        Self {
            min,
            max,
            lo: clamp(min, 0.0),
            hi: clamp(max, reach),
        }
    }

    /// Returns true if `distance` lies inside the band.
    #[must_use]
    pub fn contains(&self, distance: f64) -> bool {
        self.min <= distance && distance <= self.max
    }

    /// Returns true if the band cannot hold any vertex at all.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.lo > self.hi
    }

    fn target_radius(&self, rng: &mut MapRng) -> f64 {
        let roll = rng.next_f64();
        if self.is_degenerate() {
            (self.lo + self.hi) / 2.0
        } else {
            self.lo + (self.hi - self.lo) * roll
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Placement {
    pub placed: u32,
    pub fallback: bool,
}

struct Candidate {
    pt: MapPoint,
    land: bool,
}

/// Place up to `settings.players` headquarters and flatten their zones.
pub(crate) fn place_players(
    map: &mut Map,
    layout: &mut Layout,
    palette: &TerrainPalette,
    settings: &MapSettings,
    rng: &mut MapRng,
) -> Placement {
    let size = map.size;
    let center = size.center();
    let band = RadiusBand::new(settings, size);

    let all: Vec<Candidate> = (0..size.area())
        .map(|idx| Candidate {
            pt: vertex::position(idx, size),
            land: layout.classes[idx] == TerrainClass::Land,
        })
        .collect();
    let in_band: Vec<&Candidate> = all
        .iter()
        .filter(|c| band.contains(vertex::distance(c.pt.into(), center, size)))
        .collect();

    let fallback = band.is_degenerate() || in_band.is_empty();
    let pool: Vec<&Candidate> = if fallback {
        all.iter().collect()
    } else {
        in_band
    };

    let radius = band.target_radius(rng);
    let start_angle = rng.next_f64() * TAU;
    let requested = settings.players;

    let mut placed: Vec<MapPoint> = Vec::with_capacity(requested as usize);
    for i in 0..requested {
        let angle = start_angle + TAU * f64::from(i) / f64::from(requested);
        let target = vertex::wrap(
            center
                + Position::new(
                    (radius * angle.cos()).round() as i32,
                    (radius * angle.sin()).round() as i32,
                ),
            size,
        );

        let best = pool
            .iter()
            .filter(|c| {
                placed.iter().all(|&p| {
                    vertex::distance_squared(c.pt.into(), p.into(), size)
                        >= MIN_HQ_DISTANCE * MIN_HQ_DISTANCE
                })
            })
            .map(|c| {
                let penalty = if c.land { 0.0 } else { NON_LAND_PENALTY };
                (vertex::distance(c.pt.into(), target.into(), size) + penalty, c.pt)
            })
            .min_by(|a, b| a.0.total_cmp(&b.0));

        match best {
            Some((_, pt)) => placed.push(pt),
            None => warn!(player = i, "No room left for headquarters"),
        }
    }

    if (placed.len() as u32) < requested {
        warn!(
            requested,
            placed = placed.len(),
            "Reduced player count to fit the map"
        );
    }

    let zone = settings.mountain_distance.hq_zone_radius_on(size);
    for (player, &pt) in placed.iter().enumerate() {
        flatten_zone(map, layout, palette, pt, zone);
        map.set_headquarters(player, pt);
    }
    map.players = placed.len() as u32;

    Placement {
        placed: map.players,
        fallback,
    }
}

/// Turn the area around a headquarters into level buildable land.
fn flatten_zone(
    map: &mut Map,
    layout: &mut Layout,
    palette: &TerrainPalette,
    hq: MapPoint,
    radius: u16,
) {
    let height = map.heights[map.index(hq)].max(layout.sea_level);
    for pt in vertex::points_in_radius(hq, radius, map.size) {
        let idx = map.index(pt);
        layout.set_class(map, palette, idx, TerrainClass::Land);
        layout.reserved[idx] = true;
        map.heights[idx] = height;
    }
}

/// Raise mountains again if the headquarters zones flattened all of them.
///
/// Turns up to `wanted` of the highest unreserved land or peak vertices
/// into mountain. Does nothing while any mountain vertex is left. Returns
/// the number of vertices converted.
pub(crate) fn restore_mountains(
    map: &mut Map,
    layout: &mut Layout,
    palette: &TerrainPalette,
    wanted: usize,
) -> usize {
    if wanted == 0 || layout.classes.contains(&TerrainClass::Mountain) {
        return 0;
    }

    let mut candidates: Vec<usize> = (0..map.size.area())
        .filter(|&idx| !layout.reserved[idx] && layout.classes[idx] != TerrainClass::Water)
        .collect();
    candidates.sort_by(|&a, &b| map.heights[b].cmp(&map.heights[a]).then(a.cmp(&b)));
    candidates.truncate(wanted);

    for &idx in &candidates {
        layout.set_class(map, palette, idx, TerrainClass::Mountain);
    }
    debug!(
        wanted,
        restored = candidates.len(),
        "Restored mountains lost to headquarters zones"
    );
    candidates.len()
}
