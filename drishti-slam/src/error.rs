//! Error types for Drishti

use thiserror::Error;

use crate::config::ConfigLoadError;
use crate::engine::graph::GraphError;

/// Drishti error type
#[derive(Error, Debug)]
pub enum DrishtiError {
    #[error("Pose graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigLoadError),

    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    #[error("No session is running")]
    NotRunning,
}

pub type Result<T> = std::result::Result<T, DrishtiError>;
