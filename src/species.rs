// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The species that can be read (and screened) for each instrument.

use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};
use thiserror::Error;

lazy_static::lazy_static! {
    pub static ref MLS_SPECIES_COMMA_SEPARATED: String = MlsSpecies::iter().join(", ");

    pub static ref GOME_SPECIES_COMMA_SEPARATED: String = GomeSpecies::iter().join(", ");
}

/// MLS level 2 products (v4.2) that have screening rules. The string
/// representation is the swath name used inside MLS files and file names.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[allow(clippy::upper_case_acronyms)]
pub enum MlsSpecies {
    /// Geopotential height.
    GPH,
    Temperature,
    O3,
    H2O,
    N2O,
    ClO,
    HNO3,
}

impl MlsSpecies {
    /// Parse a species code, e.g. "ClO".
    pub fn from_code(code: &str) -> Result<MlsSpecies, UnsupportedSpeciesError> {
        MlsSpecies::from_str(code).map_err(|_| UnsupportedSpeciesError {
            code: code.to_string(),
            instrument: "MLS",
            supported: MLS_SPECIES_COMMA_SEPARATED.as_str(),
        })
    }
}

/// GOME2 total-column products. The string representation is the dataset
/// name inside the `TOTAL_COLUMNS` group.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[allow(clippy::upper_case_acronyms)]
pub enum GomeSpecies {
    O3,
    NO2,
    NO2Tropo,
    HCHO,
    H2O,
    SO2,
    BrO,
}

impl GomeSpecies {
    /// Parse a species code, e.g. "NO2Tropo".
    pub fn from_code(code: &str) -> Result<GomeSpecies, UnsupportedSpeciesError> {
        GomeSpecies::from_str(code).map_err(|_| UnsupportedSpeciesError {
            code: code.to_string(),
            instrument: "GOME2",
            supported: GOME_SPECIES_COMMA_SEPARATED.as_str(),
        })
    }
}

#[derive(Error, Debug)]
#[error("Species '{code}' is not supported for {instrument}; supported species are: {supported}")]
pub struct UnsupportedSpeciesError {
    pub code: String,
    pub instrument: &'static str,
    pub supported: &'static str,
}
