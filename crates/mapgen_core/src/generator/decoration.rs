//! Decoration pass: rivers, stone piles and trees.

use crate::map::{Map, Resource, OI_GRANITE, OI_TREE};
use crate::random::MapRng;
use crate::settings::MapSettings;
use crate::terrain::LandscapeType;
use crate::vertex;

use super::heightmap::MAX_HEIGHT;
use super::{Layout, TerrainClass, TerrainPalette};

/// Vertices per river at 100% river density.
const VERTICES_PER_RIVER: usize = 200;

/// Attempts at finding high ground for one river source.
const SOURCE_ATTEMPTS: u32 = 20;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DecorationStats {
    pub rivers: u32,
    pub trees: u32,
    pub stone_piles: u32,
}

/// Tree species (`object_type`) available on a landscape.
fn tree_species(landscape: LandscapeType) -> &'static [u8] {
    match landscape {
        LandscapeType::Greenland => &[0x30, 0x31, 0x32, 0x33, 0x34, 0x35, 0x36, 0x37],
        LandscapeType::Wasteland => &[0x38, 0x39, 0x3A, 0x3B],
        LandscapeType::Winter => &[0x3C, 0x3D, 0x3E, 0x3F],
    }
}

pub(crate) fn decorate(
    map: &mut Map,
    layout: &mut Layout,
    palette: &TerrainPalette,
    settings: &MapSettings,
    rng: &mut MapRng,
) -> DecorationStats {
    let rivers = carve_rivers(map, layout, palette, settings.rivers, rng);
    let stone_piles = scatter(map, layout, settings.stone_piles, rng, |rng, _| {
        (rng.range(1, 6) as u8, OI_GRANITE)
    });
    let species = tree_species(map.landscape);
    let trees = scatter(map, layout, settings.trees, rng, |rng, _| {
        (species[rng.rand(species.len() as u32) as usize], OI_TREE)
    });

    DecorationStats {
        rivers,
        trees,
        stone_piles,
    }
}

/// Carve rivers running downhill from high land.
fn carve_rivers(
    map: &mut Map,
    layout: &mut Layout,
    palette: &TerrainPalette,
    density: u32,
    rng: &mut MapRng,
) -> u32 {
    if density == 0 {
        return 0;
    }
    let size = map.size;
    let area = size.area();
    let count = (area * density as usize / (VERTICES_PER_RIVER * 100)).max(1);
    let high_ground = MAX_HEIGHT / 3 * 2;
    let max_length = usize::from(size.min_dim());

    let mut carved = 0;
    for _ in 0..count {
        let source = (0..SOURCE_ATTEMPTS)
            .map(|_| rng.rand(area as u32) as usize)
            .find(|&idx| {
                !layout.reserved[idx]
                    && layout.classes[idx] == TerrainClass::Land
                    && map.heights[idx] >= high_ground
            });
        let Some(mut idx) = source else {
            continue;
        };

        let mut path: Vec<usize> = Vec::new();
        // Rivers only cross land; mountains keep their deposits.
        while path.len() < max_length
            && !layout.reserved[idx]
            && layout.classes[idx] == TerrainClass::Land
        {
            path.push(idx);
            let here = vertex::position(idx, size);
            let next = vertex::neighbours(here, size)
                .iter()
                .map(|&n| map.index(n))
                .filter(|n| !path.contains(n))
                .min_by_key(|&n| (map.heights[n], n));
            match next {
                Some(n) if map.heights[n] <= map.heights[idx] => idx = n,
                // Sink: the river ends in a pond.
                _ => break,
            }
        }

        if path.is_empty() {
            continue;
        }
        for &i in &path {
            layout.set_class(map, palette, i, TerrainClass::Water);
            map.resources[i] = Resource::Nothing;
        }
        carved += 1;
    }
    carved
}

/// Place objects on free, unreserved land with the given density.
fn scatter(
    map: &mut Map,
    layout: &Layout,
    density: u32,
    rng: &mut MapRng,
    mut object: impl FnMut(&mut MapRng, usize) -> (u8, u8),
) -> u32 {
    let mut placed = 0;
    for idx in 0..map.size.area() {
        if layout.classes[idx] != TerrainClass::Land
            || layout.reserved[idx]
            || map.object_info[idx] != 0
        {
            continue;
        }
        if !rng.chance(density) {
            continue;
        }
        let (object_type, object_info) = object(rng, idx);
        map.object_type[idx] = object_type;
        map.object_info[idx] = object_info;
        placed += 1;
    }
    placed
}
