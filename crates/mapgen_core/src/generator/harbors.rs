//! Harbor pass.
//!
//! A harbor needs a large, level building site whose neighbour is coast:
//! walkable ground bordering a sea. Seas are connected bodies of shippable
//! water of at least [`MIN_SEA_SIZE`] vertices, so ponds left by rivers do
//! not count.

use std::collections::VecDeque;

use crate::map::Map;
use crate::terrain::{TerrainFlags, WorldDescription};
use crate::vertex::{self, MapPoint};

/// Smallest body of shippable water that counts as a sea.
pub const MIN_SEA_SIZE: usize = 20;

/// Minimum distance between two harbors.
pub const HARBOR_SPACING: u64 = 8;

/// Largest height difference to a neighbour on a harbor site.
const MAX_SLOPE: u8 = 2;

/// Which vertices belong to a sea.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeaMask {
    sea: Vec<bool>,
}

impl SeaMask {
    /// Flood-fill the shippable water of a map.
    #[must_use]
    pub fn compute(map: &Map, world: &WorldDescription) -> Self {
        let size = map.size;
        let area = size.area();
        let shippable: Vec<bool> = map
            .terrain
            .iter()
            .map(|&t| world.is(t, TerrainFlags::SHIPPABLE))
            .collect();

        let mut sea = vec![false; area];
        let mut visited = vec![false; area];
        let mut queue = VecDeque::new();
        let mut body = Vec::new();

        for start in 0..area {
            if visited[start] || !shippable[start] {
                continue;
            }
            visited[start] = true;
            queue.push_back(start);
            body.clear();

            while let Some(idx) = queue.pop_front() {
                body.push(idx);
                for n in vertex::neighbours(vertex::position(idx, size), size) {
                    let n = vertex::index(n, size);
                    if !visited[n] && shippable[n] {
                        visited[n] = true;
                        queue.push_back(n);
                    }
                }
            }

            if body.len() >= MIN_SEA_SIZE {
                for &idx in &body {
                    sea[idx] = true;
                }
            }
        }

        Self { sea }
    }

    /// Returns true if the vertex is part of a sea.
    #[must_use]
    pub fn is_sea(&self, map: &Map, pt: MapPoint) -> bool {
        self.sea[map.index(pt)]
    }
}

/// Returns true if a harbor can be built at `pt`.
#[must_use]
pub fn is_harbor_site(map: &Map, world: &WorldDescription, sea: &SeaMask, pt: MapPoint) -> bool {
    if !map.is_free(pt) || !map.has_terrain(world, pt, TerrainFlags::BUILDABLE) {
        return false;
    }

    let height = map.heights[map.index(pt)];
    let around = vertex::neighbours(pt, map.size);
    let level = around.iter().all(|&n| {
        map.has_terrain(world, n, TerrainFlags::BUILDABLE)
            && map.heights[map.index(n)].abs_diff(height) <= MAX_SLOPE
    });
    if !level {
        return false;
    }

    around.iter().any(|&coast| {
        map.has_terrain(world, coast, TerrainFlags::WALKABLE)
            && vertex::neighbours(coast, map.size)
                .iter()
                .any(|&s| sea.is_sea(map, s))
    })
}

/// First harbor site within `radius` of `pt`, nearest first.
#[must_use]
pub fn harbor_site_near(
    map: &Map,
    world: &WorldDescription,
    sea: &SeaMask,
    pt: MapPoint,
    radius: u16,
) -> Option<MapPoint> {
    vertex::points_in_radius(pt, radius, map.size)
        .into_iter()
        .find(|&p| is_harbor_site(map, world, sea, p))
}

/// Record spaced harbor sites along every coast. Returns the count.
pub(crate) fn place_harbors(map: &mut Map, world: &WorldDescription) -> usize {
    let sea = SeaMask::compute(map, world);
    let mut sites: Vec<MapPoint> = Vec::new();

    for idx in 0..map.size.area() {
        let pt = vertex::position(idx, map.size);
        let spaced = sites.iter().all(|&s| {
            vertex::distance_squared(s.into(), pt.into(), map.size)
                >= HARBOR_SPACING * HARBOR_SPACING
        });
        if spaced && is_harbor_site(map, world, &sea, pt) {
            sites.push(pt);
        }
    }

    map.harbors = sites;
    map.harbors.len()
}
