use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during geometry processing
#[derive(Error, Debug)]
pub enum Error {
    #[error("Plane fitting needs at least 3 points, got {0}")]
    InsufficientPoints(usize),

    #[error("Degenerate point set: {0}")]
    DegeneratePoints(String),
}
