// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for mesh ingestion
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading a building mesh
#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },

    #[error("Line {line}: vertex has {found} coordinates, expected 3")]
    IncompleteVertex { line: usize, found: usize },

    #[error("Line {line}: vertex index {index} out of range ({count} vertices defined)")]
    IndexOutOfRange { line: usize, index: i64, count: usize },

    #[error("Line {line}: face has {found} vertices, at least 3 are required")]
    DegenerateFace { line: usize, found: usize },

    #[error("Empty mesh: {0}")]
    EmptyMesh(String),
}
