// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with reading and interpolating bias tables.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BiasTableError {
    #[error("Bias file '{file}' has only {num_lines} lines; expected at least {expected} header lines followed by data")]
    TooShort {
        file: PathBuf,
        num_lines: usize,
        expected: usize,
    },

    #[error("Couldn't parse '{text}' as a float on line {line_num} of bias file '{file}'")]
    ParseFloat {
        file: PathBuf,
        text: String,
        line_num: usize,
    },

    #[error("Expected a latitude and 3 bias columns on line {line_num} of bias file '{file}', but found {count} bias columns instead")]
    BadColumnCount {
        file: PathBuf,
        count: usize,
        line_num: usize,
    },

    #[error("Bias file '{file}' needs at least 2 latitude rows for interpolation, but only {count} were found")]
    TooFewRows { file: PathBuf, count: usize },

    #[error("Bias file '{file}' lists latitude {latitude} more than once")]
    DuplicateLatitude { file: PathBuf, latitude: f64 },

    #[error("Every value in bias column {channel} ({pressure} hPa) of '{file}' is missing")]
    AllMissing {
        file: PathBuf,
        channel: usize,
        pressure: f64,
    },

    #[error("Latitude {latitude} is outside of the bias table's domain ({min} to {max})")]
    OutOfDomain { latitude: f64, min: f64, max: f64 },

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
}
