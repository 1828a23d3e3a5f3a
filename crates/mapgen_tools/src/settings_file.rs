//! Settings and terrain catalogs from RON files, plus command-line
//! overrides.

use std::path::Path;

use mapgen_core::random::MapStyle;
use mapgen_core::settings::MapSettings;
use mapgen_core::terrain::{LandscapeType, WorldDescription};
use mapgen_core::vertex::MapExtent;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ToolError, ToolResult};

fn load_ron<T: DeserializeOwned>(path: &Path) -> ToolResult<T> {
    let text = std::fs::read_to_string(path).map_err(|source| ToolError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&text).map_err(|source| ToolError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load settings from a RON file. Missing fields take their defaults; the
/// result is not normalized.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_settings(path: &Path) -> ToolResult<MapSettings> {
    let settings: MapSettings = load_ron(path)?;
    debug!(path = %path.display(), size = %settings.size, "Loaded settings");
    Ok(settings)
}

/// Load a terrain catalog from a RON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_world(path: &Path) -> ToolResult<WorldDescription> {
    let world: WorldDescription = load_ron(path)?;
    debug!(path = %path.display(), terrains = world.terrain.len(), "Loaded terrain catalog");
    Ok(world)
}

/// Values given on the command line; each one replaces the file value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsOverrides {
    /// Map width.
    pub width: Option<u16>,
    /// Map height.
    pub height: Option<u16>,
    /// Player count.
    pub players: Option<u32>,
    /// Map style.
    pub style: Option<MapStyle>,
    /// Climate.
    pub landscape: Option<LandscapeType>,
    /// Map name.
    pub name: Option<String>,
}

impl SettingsOverrides {
    /// Apply the overrides to `settings`.
    pub fn apply(&self, settings: &mut MapSettings) {
        settings.size = MapExtent::new(
            self.width.unwrap_or(settings.size.x),
            self.height.unwrap_or(settings.size.y),
        );
        if let Some(players) = self.players {
            settings.players = players;
        }
        if let Some(style) = self.style {
            settings.style = style;
        }
        if let Some(landscape) = self.landscape {
            settings.landscape = landscape;
        }
        if let Some(name) = &self.name {
            settings.name.clone_from(name);
        }
    }
}

/// Settings from an optional file with overrides applied.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn resolve_settings(
    path: Option<&Path>,
    overrides: &SettingsOverrides,
) -> ToolResult<MapSettings> {
    let mut settings = match path {
        Some(path) => load_settings(path)?,
        None => MapSettings::default(),
    };
    overrides.apply(&mut settings);
    Ok(settings)
}
