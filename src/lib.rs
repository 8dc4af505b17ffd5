// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Quality screening and regridding of satellite trace-gas retrievals.
//!
//! MLS and OMPS profiles are read from HDF5 files, screened with each
//! product's quality criteria (bias correcting MLS ClO on the way) and
//! returned as NaN-masked arrays. GOME2 total columns are gridded onto a
//! regular latitude-longitude grid and resampled over time.

pub mod bias;
mod cli;
pub mod constants;
pub mod grid;
pub mod io;
pub(crate) mod misc;
pub mod screen;
pub mod species;
pub mod units;

// Re-exports.
pub use bias::{BiasExtrapolation, BiasTable};
pub use cli::{Satprofile, SatprofileError};
pub use grid::{Frequency, Grid, GridSeries, GridSpec, Gridder, InverseDistanceGridder, Region};
pub use io::read::{GomeColumn, MlsProfile, OmpsProfile};
pub use screen::{OmpsOzone, ScreenOptions};
pub use species::{GomeSpecies, MlsSpecies};
