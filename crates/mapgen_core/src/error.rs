//! Error types for map generation.

use thiserror::Error;

use crate::terrain::LandscapeType;

/// Result type alias using [`MapGenError`].
pub type Result<T> = std::result::Result<T, MapGenError>;

/// Top-level error type for the map generator.
///
/// Only inputs that arrive as text or as an external terrain catalog can
/// fail. Out-of-range settings are corrected, never reported.
#[derive(Debug, Error)]
pub enum MapGenError {
    /// Map settings text could not be parsed.
    #[error("Failed to parse map settings: {message}")]
    SettingsParse {
        /// Parser message.
        message: String,
    },

    /// Terrain catalog text could not be parsed.
    #[error("Failed to parse terrain catalog: {message}")]
    CatalogParse {
        /// Parser message.
        message: String,
    },

    /// The terrain catalog lacks a terrain the generator depends on.
    #[error("No {capability} terrain defined for landscape {landscape:?}")]
    MissingTerrain {
        /// Landscape that was searched.
        landscape: LandscapeType,
        /// Human-readable capability that was requested.
        capability: &'static str,
    },
}
