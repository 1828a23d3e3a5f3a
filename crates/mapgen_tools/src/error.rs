//! Error types for the tools.

use std::path::PathBuf;

use mapgen_core::error::MapGenError;
use thiserror::Error;

/// Errors raised by the command-line tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A file could not be read or written.
    #[error("Failed to access file '{path}': {source}")]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A RON input file is malformed.
    #[error("Failed to parse RON file '{path}': {source}")]
    Parse {
        /// Path of the file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: ron::error::SpannedError,
    },

    /// A map could not be written as RON.
    #[error("Failed to write RON: {0}")]
    Ron(#[from] ron::Error),

    /// A map or report could not be written as JSON.
    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The generator rejected its inputs.
    #[error(transparent)]
    Core(#[from] MapGenError),

    /// Repeated generation of one seed produced different maps.
    #[error("Seed {seed:#x} produced {unique} different maps in {runs} runs")]
    Nondeterministic {
        /// Seed that diverged.
        seed: u64,
        /// Number of runs.
        runs: u32,
        /// Number of distinct maps.
        unique: usize,
    },
}

/// Result type alias using [`ToolError`].
pub type ToolResult<T> = std::result::Result<T, ToolError>;
