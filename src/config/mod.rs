//! Configuration module for the volume monitor
//!
//! Loads configuration from a JSON file with environment variable overrides.

mod settings;

pub use settings::*;
