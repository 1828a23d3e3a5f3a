//! ASCII map preview.
//!
//! Renders a generated map as text for quick terminal review. Odd rows are
//! indented by one column, which mirrors the staggered vertex rows.

use mapgen_core::map::{Map, OI_GRANITE, OI_HEADQUARTER_MASK, OI_TREE};
use mapgen_core::terrain::{TerrainKind, WorldDescription};

/// ANSI color codes.
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BLUE: &str = "\x1b[34m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const RED: &str = "\x1b[31m";
    pub const WHITE: &str = "\x1b[37m";
    pub const GRAY: &str = "\x1b[90m";
}

/// ASCII preview configuration.
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Use colored output (ANSI).
    pub use_color: bool,
    /// Append a legend.
    pub show_legend: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            use_color: false,
            show_legend: true,
        }
    }
}

fn cell(map: &Map, world: &WorldDescription, idx: usize) -> (char, &'static str) {
    let info = map.object_info[idx];
    if info == OI_HEADQUARTER_MASK {
        let digit = char::from_digit(u32::from(map.object_type[idx]) + 1, 10).unwrap_or('P');
        return (digit, colors::RED);
    }
    if map.harbors.iter().any(|&h| map.index(h) == idx) {
        return ('H', colors::YELLOW);
    }
    match info {
        OI_TREE => return ('T', colors::GREEN),
        OI_GRANITE => return ('o', colors::GRAY),
        _ => {}
    }
    match world.get(map.terrain[idx]).map(|t| t.kind) {
        Some(TerrainKind::Water) => ('~', colors::BLUE),
        Some(TerrainKind::Land) => ('.', colors::GREEN),
        Some(TerrainKind::Mountain) => ('^', colors::WHITE),
        Some(TerrainKind::Snow | TerrainKind::Lava) => ('A', colors::WHITE),
        None => ('?', colors::RED),
    }
}

/// Render a map, one text row per vertex row.
#[must_use]
pub fn render_ascii(map: &Map, world: &WorldDescription, config: &PreviewConfig) -> String {
    let width = usize::from(map.size.x);
    let mut out = String::with_capacity((width * 2 + 2) * usize::from(map.size.y));

    for y in 0..usize::from(map.size.y) {
        if y % 2 == 1 {
            out.push(' ');
        }
        for x in 0..width {
            let (ch, color) = cell(map, world, y * width + x);
            if config.use_color {
                out.push_str(color);
                out.push(ch);
                out.push_str(colors::RESET);
            } else {
                out.push(ch);
            }
            out.push(' ');
        }
        out.push('\n');
    }

    if config.show_legend {
        out.push_str(&format!(
            "{} {} players | 1-8 HQ  H harbor  T tree  o stone  ~ water  . land  ^ mountain  A peak\n",
            map.name, map.players
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapgen_core::terrain::LandscapeType;
    use mapgen_core::vertex::{MapExtent, MapPoint};

    #[test]
    fn test_render_marks_headquarters() {
        let world = WorldDescription::default_terrain();
        let mut map = Map::new(MapExtent::new(16, 16), "Preview", "t", LandscapeType::Greenland);
        map.set_headquarters(0, MapPoint::new(3, 2));
        let text = render_ascii(
            &map,
            &world,
            &PreviewConfig {
                use_color: false,
                show_legend: false,
            },
        );
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 16);
        assert_eq!(rows[2].chars().nth(6), Some('1'));
        assert!(rows[1].starts_with(' '));
    }
}
