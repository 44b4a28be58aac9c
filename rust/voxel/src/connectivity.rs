// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Voxel neighborhoods
//!
//! A [`Connectivity`] is the list of integer offsets a flood fill may step
//! along. The classifier and the surface extractor both take it as an
//! argument, so alternative neighborhoods can be compared on the same grid.

use crate::error::{Error, Result};
use std::borrow::Cow;

/// Face neighbors
pub const FACE_OFFSETS: [[i32; 3]; 6] = [
    [-1, 0, 0],
    [1, 0, 0],
    [0, -1, 0],
    [0, 1, 0],
    [0, 0, -1],
    [0, 0, 1],
];

/// Face and edge neighbors
pub const FACE_EDGE_OFFSETS: [[i32; 3]; 18] = [
    [-1, 0, 0],
    [1, 0, 0],
    [0, -1, 0],
    [0, 1, 0],
    [0, 0, -1],
    [0, 0, 1],
    // edges
    [-1, -1, 0],
    [1, -1, 0],
    [-1, 1, 0],
    [1, 1, 0],
    [-1, 0, -1],
    [1, 0, -1],
    [-1, 0, 1],
    [1, 0, 1],
    [0, -1, -1],
    [0, 1, -1],
    [0, -1, 1],
    [0, 1, 1],
];

/// Face, edge and corner neighbors
pub const FULL_OFFSETS: [[i32; 3]; 26] = [
    [-1, 0, 0],
    [1, 0, 0],
    [0, -1, 0],
    [0, 1, 0],
    [0, 0, -1],
    [0, 0, 1],
    // edges
    [-1, -1, 0],
    [1, -1, 0],
    [-1, 1, 0],
    [1, 1, 0],
    [-1, 0, -1],
    [1, 0, -1],
    [-1, 0, 1],
    [1, 0, 1],
    [0, -1, -1],
    [0, 1, -1],
    [0, -1, 1],
    [0, 1, 1],
    // corners
    [-1, -1, -1],
    [1, -1, -1],
    [-1, 1, -1],
    [1, 1, -1],
    [-1, -1, 1],
    [1, -1, 1],
    [-1, 1, 1],
    [1, 1, 1],
];

/// Immutable neighbor offset table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connectivity {
    offsets: Cow<'static, [[i32; 3]]>,
}

impl Connectivity {
    /// 6-neighborhood (shared faces)
    pub const fn six() -> Self {
        Self {
            offsets: Cow::Borrowed(&FACE_OFFSETS),
        }
    }

    /// 18-neighborhood (shared faces or edges)
    pub const fn eighteen() -> Self {
        Self {
            offsets: Cow::Borrowed(&FACE_EDGE_OFFSETS),
        }
    }

    /// 26-neighborhood (any shared point)
    pub const fn twenty_six() -> Self {
        Self {
            offsets: Cow::Borrowed(&FULL_OFFSETS),
        }
    }

    /// Standard neighborhood by size: 6, 18 or 26
    pub fn from_neighbors(count: usize) -> Result<Self> {
        match count {
            6 => Ok(Self::six()),
            18 => Ok(Self::eighteen()),
            26 => Ok(Self::twenty_six()),
            other => Err(Error::InvalidConnectivity(format!(
                "unsupported neighborhood size {other}, expected 6, 18 or 26"
            ))),
        }
    }

    /// Arbitrary offset list
    ///
    /// Offsets must be non-zero and unique. The list should be symmetric
    /// (contain `-o` for every `o`) for reachability to be symmetric; this is
    /// not enforced.
    pub fn custom(offsets: Vec<[i32; 3]>) -> Result<Self> {
        if offsets.is_empty() {
            return Err(Error::InvalidConnectivity("no offsets given".into()));
        }
        for (i, o) in offsets.iter().enumerate() {
            if *o == [0, 0, 0] {
                return Err(Error::InvalidConnectivity(
                    "the zero offset is not a neighbor".into(),
                ));
            }
            if offsets[..i].contains(o) {
                return Err(Error::InvalidConnectivity(format!(
                    "duplicate offset {o:?}"
                )));
            }
        }
        Ok(Self {
            offsets: Cow::Owned(offsets),
        })
    }

    #[inline]
    pub fn offsets(&self) -> &[[i32; 3]] {
        &self.offsets
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

impl Default for Connectivity {
    fn default() -> Self {
        Self::eighteen()
    }
}
