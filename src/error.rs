//! Error types for simulation construction and configuration loading
//!
//! Only setup can fail. Once a simulation is running, every frame is
//! infallible.

/// Errors raised while building a simulation or loading its configuration
#[derive(thiserror::Error, Debug)]
pub enum SimError {
    /// A tuning value is out of range or inconsistent
    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),

    /// Rejection sampling could not place a tree outside the exclusion disc
    #[error("Could not place tree {tree} after {attempts} attempts")]
    PlacementExhausted { tree: usize, attempts: u32 },

    /// Settings or tuning JSON failed to parse
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
