//! Unified configuration loading for Drishti.
//!
//! Loads all configuration from a single TOML file. Every section and field
//! is optional; missing values fall back to defaults.

mod defaults;
mod drishti;
mod error;
mod information;
mod sensor;

// Re-export main types
pub use drishti::{DEFAULT_CONFIG_PATH, DrishtiConfig};
pub use error::ConfigLoadError;

// Re-export section types
pub use information::InformationSection;
pub use sensor::SensorSection;
