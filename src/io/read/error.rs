// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors from reading satellite product files.

use std::path::PathBuf;

use thiserror::Error;

use crate::species::UnsupportedSpeciesError;

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("File '{0}' does not exist")]
    DoesNotExist(PathBuf),

    /// An expected group or field is absent.
    #[error("Field '{field}' was not found in '{file}'")]
    MissingField { file: PathBuf, field: String },

    /// A field doesn't have the expected dimensionality or size.
    #[error("Field '{field}' in '{file}' has shape {shape:?}; expected {expected}")]
    BadShape {
        file: PathBuf,
        field: String,
        shape: Vec<usize>,
        expected: String,
    },

    /// Every value in a requested field is a fill value; the file is unusable.
    #[error("Every value of field '{field}' in '{file}' is a fill value or invalid")]
    AllFill { file: PathBuf, field: String },

    #[error("Couldn't get the {what} from the file name of '{file}'")]
    BadFileName { file: PathBuf, what: &'static str },

    #[error(transparent)]
    UnsupportedSpecies(#[from] UnsupportedSpeciesError),

    #[error("HDF5 error when reading '{file}': {err}")]
    Hdf5 { file: PathBuf, err: hdf5::Error },
}
