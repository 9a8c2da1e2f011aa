// src/config/mod.rs

//! Configuration loading and validation for csvforward.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Layer CLI / environment values on top (`overrides.rs`).
//! - Validate the merged result (`validate.rs`).

pub mod loader;
pub mod model;
pub mod overrides;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_or_default, DEFAULT_CONFIG_FILE};
pub use model::{ConfigFile, ConvertSection, HecSection, RawConfigFile, TailSection};
pub use overrides::{apply_convert_overrides, apply_tail_overrides};
