// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the processing pipeline.

use std::path::PathBuf;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a single job.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or parsing the input mesh failed.
    #[error(transparent)]
    Mesh(#[from] voxcity_core::Error),

    /// Grid construction or classification failed.
    #[error(transparent)]
    Voxel(#[from] voxcity_voxel::Error),

    /// An output file could not be created or written.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding failed.
    #[error("CityJSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The pipeline configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Write {
            path: path.into(),
            source,
        }
    }
}
