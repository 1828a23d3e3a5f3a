//! # Map Generator Tools
//!
//! Command-line helpers around the generator:
//! - Settings and terrain catalog loading
//! - Map export and ASCII preview
//! - Parallel batch runs and determinism checks

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod batch;
pub mod error;
pub mod generate;
pub mod preview;
pub mod settings_file;
