//! # Map Generator Core
//!
//! Procedural random maps for a settlement-building strategy game.
//!
//! This crate contains **only** generation logic:
//! - No rendering
//! - No file IO
//! - No system randomness
//!
//! Every map is a pure function of its settings, the terrain catalog and a
//! seed, which makes generated maps reproducible across machines.
//!
//! ## Crate Structure
//!
//! - [`settings`] - Map settings and their normalization
//! - [`generator`] - Staged map generation
//! - [`map`] - The generated map
//! - [`terrain`] - Terrain catalog queried by capability
//! - [`vertex`] - Toroidal grid geometry
//! - [`random`] - Seeded random streams

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod error;
pub mod generator;
pub mod map;
pub mod random;
pub mod settings;
pub mod terrain;
pub mod vertex;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{MapGenError, Result};
    pub use crate::generator::{GenerationReport, RandomMapGenerator, TerrainClass};
    pub use crate::map::{Map, Resource, OI_GRANITE, OI_HEADQUARTER_MASK, OI_TREE};
    pub use crate::random::{MapRng, MapStyle, RandomConfig};
    pub use crate::settings::{IslandAmount, MapSettings, MountainDistance, MAX_PLAYERS};
    pub use crate::terrain::{LandscapeType, TerrainFlags, TerrainIdx, WorldDescription};
    pub use crate::vertex::{Fixed, MapExtent, MapPoint, Position};
}
