//! Single map generation and export.

use std::path::Path;

use clap::ValueEnum;
use mapgen_core::generator::{GenerationReport, RandomMapGenerator};
use mapgen_core::map::Map;
use mapgen_core::settings::MapSettings;
use ron::ser::PrettyConfig;
use tracing::info;

use crate::error::{ToolError, ToolResult};

/// File format for exported maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Rusty Object Notation.
    #[default]
    Ron,
    /// JSON.
    Json,
}

impl OutputFormat {
    /// Pick a format from a file extension, if it names one.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "ron" => Some(Self::Ron),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Encode a map as text.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn export_map(map: &Map, format: OutputFormat) -> ToolResult<String> {
    Ok(match format {
        OutputFormat::Ron => ron::ser::to_string_pretty(map, PrettyConfig::new())?,
        OutputFormat::Json => serde_json::to_string_pretty(map)?,
    })
}

/// Write a map to a file.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_map(map: &Map, path: &Path, format: OutputFormat) -> ToolResult<()> {
    let text = export_map(map, format)?;
    std::fs::write(path, text).map_err(|source| ToolError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), ?format, "Wrote map");
    Ok(())
}

/// Generate one map and log a short summary.
#[must_use]
pub fn generate(generator: &RandomMapGenerator, settings: &MapSettings) -> (Map, GenerationReport) {
    let (map, report) = generator.create_with_report(settings);
    info!(
        style = ?report.style,
        players = report.placed_players,
        trees = report.trees,
        harbors = report.harbors,
        "Generation summary"
    );
    (map, report)
}
