// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all satprofile-related errors. This should be the *only*
//! error enum that is publicly visible.

use thiserror::Error;

use super::{common::InputFilesError, gome::GomeArgsError, mls::MlsArgsError};
use crate::{
    bias::BiasTableError, grid::GridError, io::read::ReadError, io::GlobError,
    screen::ScreenError, units::UnitsError,
};

/// The *only* publicly visible error from satprofile. Each error message should
/// include a hint on where to find more information, unless it's "generic".
#[derive(Error, Debug)]
pub enum SatprofileError {
    /// An error related to the mls subcommand.
    #[error("{0}\n\nSee for more info: satprofile mls --help")]
    Mls(String),

    /// An error related to the omps subcommand.
    #[error("{0}\n\nSee for more info: satprofile omps --help")]
    Omps(String),

    /// An error related to the gome subcommand or gridding.
    #[error("{0}\n\nSee for more info: satprofile gome --help")]
    Gome(String),

    /// An error related to reading satellite product files.
    #[error("{0}\n\nIf you don't know what this means, try turning up verbosity (-v or -vv) and maybe disabling progress bars.")]
    Read(String),

    /// An error related to the ClO bias table.
    #[error("{0}\n\nThe bias table must have a 13-line header followed by rows of a latitude and three bias values. See for more info: satprofile mls --help")]
    BiasTable(String),

    /// An error related to input files and globs.
    #[error("{0}\n\nFiles may be given as paths or glob patterns, e.g. \"MLS-Aura_L2GP-ClO_*.he5\"")]
    InputFiles(String),

    /// An error related to argument files.
    #[error("{0}\n\nArgument files must be toml or json and use the same names as the long command-line arguments (with underscores instead of dashes)")]
    ArgFile(String),

    /// A generic error that can't be clarified further with documentation, e.g.
    /// IO errors.
    #[error("{0}")]
    Generic(String),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

// Binary sub-command errors.

impl From<MlsArgsError> for SatprofileError {
    fn from(e: MlsArgsError) -> Self {
        Self::Mls(e.to_string())
    }
}

impl From<GomeArgsError> for SatprofileError {
    fn from(e: GomeArgsError) -> Self {
        Self::Gome(e.to_string())
    }
}

impl From<InputFilesError> for SatprofileError {
    fn from(e: InputFilesError) -> Self {
        Self::InputFiles(e.to_string())
    }
}

// Library errors.

impl From<ReadError> for SatprofileError {
    fn from(e: ReadError) -> Self {
        match e {
            ReadError::UnsupportedSpecies(_) | ReadError::BadFileName { .. } => {
                Self::InputFiles(e.to_string())
            }
            ReadError::DoesNotExist(_)
            | ReadError::MissingField { .. }
            | ReadError::BadShape { .. }
            | ReadError::AllFill { .. }
            | ReadError::Hdf5 { .. } => Self::Read(e.to_string()),
        }
    }
}

impl From<BiasTableError> for SatprofileError {
    fn from(e: BiasTableError) -> Self {
        Self::BiasTable(e.to_string())
    }
}

impl From<ScreenError> for SatprofileError {
    fn from(e: ScreenError) -> Self {
        match e {
            ScreenError::Read(e) => Self::from(e),
            ScreenError::Bias(e) => Self::from(e),
            ScreenError::BadSwathFlag(_) | ScreenError::Units(_) => Self::Omps(e.to_string()),
            ScreenError::UnsupportedSpecies(_)
            | ScreenError::TooFewLevels { .. }
            | ScreenError::ShapeMismatch { .. }
            | ScreenError::MissingBiasTable => Self::Mls(e.to_string()),
        }
    }
}

impl From<UnitsError> for SatprofileError {
    fn from(e: UnitsError) -> Self {
        Self::Omps(e.to_string())
    }
}

impl From<GridError> for SatprofileError {
    fn from(e: GridError) -> Self {
        match e {
            GridError::Read(e) => Self::from(e),
            _ => Self::Gome(e.to_string()),
        }
    }
}

impl From<GlobError> for SatprofileError {
    fn from(e: GlobError) -> Self {
        Self::InputFiles(e.to_string())
    }
}

// Generic errors.

impl From<std::io::Error> for SatprofileError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}

impl From<toml::ser::Error> for SatprofileError {
    fn from(e: toml::ser::Error) -> Self {
        Self::Generic(e.to_string())
    }
}

impl From<serde_json::Error> for SatprofileError {
    fn from(e: serde_json::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
