// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors from gridding and resampling.

use std::path::PathBuf;

use thiserror::Error;

use crate::io::read::ReadError;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("There are no valid observations to grid")]
    NoObservations,

    #[error("Grid spacing must be positive and finite; got {0}")]
    BadSpacing(f64),

    #[error("The maximum distance factor must be positive and finite; got {0}")]
    BadMaxDistance(f64),

    #[error("Bad grid region (west {west}, east {east}, south {south}, north {north}); west must be less than east and south less than north")]
    BadRegion {
        west: f64,
        east: f64,
        south: f64,
        north: f64,
    },

    #[error("Observation arrays have different lengths: {longitudes} longitudes, {latitudes} latitudes and {values} values")]
    ShapeMismatch {
        longitudes: usize,
        latitudes: usize,
        values: usize,
    },

    #[error("Grids must all have the same coordinates to be combined")]
    IncompatibleGrids,

    #[error("No grids were given to combine")]
    NoGrids,

    #[error("Error when gridding '{file}': {err}")]
    File { file: PathBuf, err: Box<GridError> },

    #[error(transparent)]
    Read(#[from] ReadError),
}
