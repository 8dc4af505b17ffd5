// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors from quality screening.

use thiserror::Error;

use crate::{
    bias::BiasTableError, io::read::ReadError, species::MlsSpecies,
    species::UnsupportedSpeciesError, units::UnitsError,
};

#[derive(Error, Debug)]
pub enum ScreenError {
    #[error(transparent)]
    UnsupportedSpecies(#[from] UnsupportedSpeciesError),

    #[error("{species} values have {num_levels} vertical levels, but at least {required} are required")]
    TooFewLevels {
        species: MlsSpecies,
        num_levels: usize,
        required: usize,
    },

    #[error("{what} has shape {got:?}, but {expected:?} was expected")]
    ShapeMismatch {
        what: &'static str,
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("OMPS swath-level quality flag '{0}' can't be decoded into SAA and attitude digits")]
    BadSwathFlag(i64),

    #[error("ClO values must be bias corrected, but no bias file was given")]
    MissingBiasTable,

    #[error(transparent)]
    Bias(#[from] BiasTableError),

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Units(#[from] UnitsError),
}
