//! End-to-end tests for the random map generator.

use mapgen_core::generator::{RadiusBand, RandomMapGenerator, MIN_HQ_DISTANCE};
use mapgen_core::map::{Resource, OI_HEADQUARTER_MASK};
use mapgen_core::random::{MapStyle, RandomConfig};
use mapgen_core::settings::{MapSettings, MountainDistance, MAX_MAP_SIZE, MAX_PLAYERS};
use mapgen_core::terrain::{LandscapeType, TerrainFlags};
use mapgen_core::vertex::{self, MapExtent, MapPoint, Position};
use mapgen_test_utils::determinism::strategies::{arb_config, arb_settings};
use mapgen_test_utils::determinism::{map_hash, verify_generation_determinism};
use mapgen_test_utils::fixtures::{generator, settings_with_radii, TEST_SEED};
use proptest::prelude::*;

fn distance_to_center(map: &mapgen_core::map::Map, player: usize) -> f64 {
    vertex::distance(
        Position::from(map.positions[player]),
        map.size.center(),
        map.size,
    )
}

// =============================================================================
// Size and headquarters
// =============================================================================

#[test]
fn test_create_correct_size() {
    let settings = settings_with_radii(38, 30, 1, 0.2, 0.3);
    let map = generator(MapStyle::Random, TEST_SEED).create(&settings);
    assert_eq!(map.size, settings.size);
}

#[test]
fn test_create_headquarters() {
    let settings = settings_with_radii(30, 32, 2, 0.2, 0.3);
    let map = generator(MapStyle::Random, TEST_SEED).create(&settings);
    assert_eq!(map.players, settings.players);

    let half = f64::from(map.size.min_dim() / 2);
    for i in 0..settings.players as usize {
        let pt = map.positions[i];
        assert_ne!(pt.x, 0xFF);
        assert_ne!(pt.y, 0xFF);

        let idx = usize::from(pt.y) * usize::from(settings.size.x) + usize::from(pt.x);
        assert_eq!(map.object_type[idx], i as u8);
        assert_eq!(map.object_info[idx], OI_HEADQUARTER_MASK);

        let d = distance_to_center(&map, i);
        assert!(d >= settings.min_player_radius * half, "player {i} too close: {d}");
        assert!(d <= settings.max_player_radius * half, "player {i} too far: {d}");
    }

    for i in settings.players as usize..MAX_PLAYERS {
        assert_eq!(map.positions[i], MapPoint::INVALID);
    }
}

#[test]
fn test_headquarters_keep_their_distance() {
    let settings = settings_with_radii(64, 64, 8, 0.4, 0.7);
    let map = generator(MapStyle::Land, 12).create(&settings);
    assert_eq!(map.players, 8);
    for a in 0..8 {
        for b in a + 1..8 {
            let d = vertex::distance_squared(
                map.positions[a].into(),
                map.positions[b].into(),
                map.size,
            );
            assert!(d >= MIN_HQ_DISTANCE * MIN_HQ_DISTANCE);
        }
    }
}

// =============================================================================
// Invalid configuration
// =============================================================================

fn wasteland(players: u32, min: f64, max: f64) -> MapSettings {
    MapSettings {
        landscape: LandscapeType::Wasteland,
        ..settings_with_radii(30, 20, players, min, max)
    }
}

#[test]
fn test_zero_players_still_places_one() {
    let map = generator(MapStyle::Random, TEST_SEED).create(&wasteland(0, 0.2, 0.3));
    assert!(map.players >= 1);
}

#[test]
fn test_too_many_players_are_reduced() {
    let map = generator(MapStyle::Random, TEST_SEED).create(&wasteland(99, 0.2, 0.3));
    assert!(map.players < 99);
    assert!(map.players as usize <= MAX_PLAYERS);
}

#[test]
fn test_out_of_range_radii_still_place_players() {
    let g = generator(MapStyle::Random, TEST_SEED);
    for (min, max) in [(-1.0, 100.0), (1.0, 100.0), (1.0, 1.0), (1.0, 0.5)] {
        let map = g.create(&wasteland(2, min, max));
        assert_ne!(map.positions[1].x, 0xFF, "radii {min}/{max}");
        assert!(map.positions[1].is_valid());
    }
}

#[test]
fn test_inverted_radii_report_fallback() {
    let g = generator(MapStyle::Random, TEST_SEED);
    let (_, report) = g.create_with_report(&wasteland(2, 1.0, 0.5));
    assert!(report.placement_fallback);
    assert!(RadiusBand::new(&wasteland(2, 1.0, 0.5), MapExtent::new(30, 20)).is_degenerate());
    let (_, report) = g.create_with_report(&wasteland(2, 0.2, 0.3));
    assert!(!report.placement_fallback);
}

#[test]
fn test_zero_ratios_still_generate() {
    let settings = MapSettings {
        ratio_coal: 0,
        ratio_gold: 0,
        ratio_granite: 0,
        ratio_iron: 0,
        ..wasteland(2, 1.0, 0.5)
    };
    let map = generator(MapStyle::Random, TEST_SEED).create(&settings);
    assert!(map.players >= 1);
}

#[test]
fn test_odd_size_is_normalized() {
    let settings = MapSettings {
        size: MapExtent::new(33, 35),
        ..wasteland(2, 0.2, 0.3)
    };
    let map = generator(MapStyle::Random, TEST_SEED).create(&settings);
    assert_eq!(map.size, MapExtent::new(32, 34));
}

#[test]
fn test_oversized_map_is_capped() {
    let settings = MapSettings {
        size: MapExtent::new(4000, 300),
        style: MapStyle::Water,
        islands: mapgen_core::settings::IslandAmount::Many,
        ..wasteland(2, 0.2, 0.3)
    };
    let map = generator(MapStyle::Water, 6).create(&settings);
    assert_eq!(map.size, MapExtent::new(MAX_MAP_SIZE, MAX_MAP_SIZE));
    for i in 0..map.players as usize {
        assert_ne!(map.positions[i], MapPoint::INVALID);
    }
}

#[test]
fn test_tiny_size_is_raised_to_minimum() {
    let settings = MapSettings {
        size: MapExtent::new(4, 0),
        ..wasteland(1, 0.2, 0.3)
    };
    let map = generator(MapStyle::Land, 3).create(&settings);
    assert_eq!(map.size, MapExtent::new(16, 16));
}

// =============================================================================
// Content
// =============================================================================

#[test]
fn test_mountains_hold_only_configured_deposits() {
    let settings = MapSettings {
        ratio_coal: 0,
        ratio_gold: 0,
        ratio_granite: 0,
        ratio_iron: 5,
        ..settings_with_radii(48, 48, 2, 0.4, 0.7)
    };
    let (map, report) = generator(MapStyle::Mixed, 8).create_with_report(&settings);
    assert!(report.resources.iron > 0);
    assert_eq!(report.resources.coal + report.resources.gold + report.resources.granite, 0);
    let mountain = map.count_resources(Resource::is_mountain_resource);
    let iron = map.count_resources(|r| matches!(r, Resource::Iron(_)));
    assert_eq!(mountain, iron);
}

#[test]
fn test_small_maps_keep_mountain_deposits() {
    for seed in 0..40 {
        for players in [2, 4, 8] {
            let settings = MapSettings {
                mountain_distance: MountainDistance::Far,
                ..settings_with_radii(16, 16, players, 0.4, 0.7)
            };
            let (map, report) = generator(MapStyle::Mixed, seed).create_with_report(&settings);
            if report.mountain_vertices == 0 {
                continue;
            }
            let deposits = map.count_resources(Resource::is_mountain_resource);
            assert!(deposits > 0, "seed {seed} players {players}: no deposits");
            assert_eq!(deposits, report.resources.mountain_total());
            for i in 0..map.players as usize {
                assert!(map.has_terrain(
                    generator(MapStyle::Mixed, seed).world(),
                    map.positions[i],
                    TerrainFlags::BUILDABLE
                ));
            }
        }
    }
}

#[test]
fn test_every_landscape_uses_its_own_terrain() {
    for landscape in LandscapeType::ALL {
        let g = generator(MapStyle::Mixed, 4);
        let settings = MapSettings {
            landscape,
            ..settings_with_radii(32, 32, 2, 0.4, 0.7)
        };
        let map = g.create(&settings);
        assert_eq!(map.landscape, landscape);
        for &t in &map.terrain {
            assert_eq!(g.world().get(t).map(|d| d.landscape), Some(landscape));
        }
    }
}

#[test]
fn test_settings_style_applies_when_config_is_random() {
    let settings = MapSettings {
        style: MapStyle::Water,
        ..Default::default()
    };
    let (_, report) = generator(MapStyle::Random, 1).create_with_report(&settings);
    assert_eq!(report.style, MapStyle::Water);
    let (_, report) = generator(MapStyle::Land, 1).create_with_report(&settings);
    assert_eq!(report.style, MapStyle::Land);
}

#[test]
fn test_water_style_finds_harbors() {
    let settings = MapSettings {
        size: MapExtent::new(96, 96),
        ..Default::default()
    };
    let (map, report) = generator(MapStyle::Water, 31).create_with_report(&settings);
    assert!(report.water_vertices > map.size.area() / 4);
    assert_eq!(report.harbors as usize, map.harbors.len());
    let g = generator(MapStyle::Water, 31);
    for &site in &map.harbors {
        assert!(map.has_terrain(g.world(), site, TerrainFlags::BUILDABLE));
    }
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_same_seed_same_map() {
    let config = RandomConfig::new(MapStyle::Random, TEST_SEED);
    verify_generation_determinism(config, &MapSettings::default(), 3).assert_deterministic();
}

#[test]
fn test_seed_changes_map() {
    let settings = MapSettings::default();
    let a = generator(MapStyle::Mixed, 1).create(&settings);
    let b = generator(MapStyle::Mixed, 2).create(&settings);
    assert_ne!(map_hash(&a), map_hash(&b));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_size_and_players_match_settings(
        config in arb_config(),
        settings in arb_settings(),
    ) {
        let map = RandomMapGenerator::with_default_terrain(config).create(&settings);
        prop_assert_eq!(map.size, settings.size);
        prop_assert!(map.players >= 1 && map.players <= settings.players);
        for i in 0..MAX_PLAYERS {
            prop_assert_eq!(map.positions[i].is_valid(), i < map.players as usize);
        }
        for i in 0..map.players as usize {
            let idx = map.index(map.positions[i]);
            prop_assert_eq!(map.object_type[idx], i as u8);
            prop_assert_eq!(map.object_info[idx], OI_HEADQUARTER_MASK);
        }
    }

    #[test]
    fn prop_generation_is_deterministic(
        config in arb_config(),
        settings in arb_settings(),
    ) {
        let g = RandomMapGenerator::with_default_terrain(config);
        prop_assert_eq!(g.create(&settings), g.create(&settings));
    }

    #[test]
    fn prop_make_valid_is_idempotent(
        x in 0u16..400,
        y in 0u16..400,
        players in 0u32..200,
        trees in 0u32..500,
    ) {
        let mut settings = MapSettings {
            size: MapExtent::new(x, y),
            players,
            trees,
            ..Default::default()
        };
        settings.make_valid();
        let once = settings.clone();
        settings.make_valid();
        prop_assert_eq!(&settings, &once);
        prop_assert!(settings.size.x % 2 == 0 && settings.size.y % 2 == 0);
        prop_assert!(settings.size.x >= 16 && settings.size.y >= 16);
        prop_assert!(settings.size.x <= MAX_MAP_SIZE && settings.size.y <= MAX_MAP_SIZE);
        prop_assert!(settings.trees <= 100);
    }
}
