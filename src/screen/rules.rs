// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The MLS level 2 (v4.2) screening rules, one per species.
//!
//! The thresholds come from the MLS v4.2 data quality document. Every
//! threshold is a "keep when" test; anything that fails is excluded.

use ndarray::{prelude::*, Zip};

use super::ScreenError;
use crate::species::MlsSpecies;

/// The test applied to a profile's retrieval status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTest {
    /// Keep profiles with an even status (the "do not use" bit is not set).
    Even,

    /// Keep only profiles with a status of exactly 0.
    Zero,
}

impl StatusTest {
    fn passes(self, status: i32) -> bool {
        match self {
            StatusTest::Even => status % 2 == 0,
            StatusTest::Zero => status == 0,
        }
    }
}

/// Criteria over whole profiles. All of them must pass for a profile to be
/// kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileCriteria {
    /// Keep when convergence < this.
    pub max_convergence: Option<f64>,

    /// Keep when quality > this.
    pub min_quality: Option<f64>,

    pub status: StatusTest,

    /// Profiles with any of these statuses are excluded, even if they pass
    /// `status`.
    pub excluded_status: &'static [i32],
}

impl ProfileCriteria {
    /// Should a profile with these attributes be kept? NaN convergence or
    /// quality values never pass a threshold.
    pub fn passes(&self, convergence: f64, quality: f64, status: i32) -> bool {
        self.max_convergence.map_or(true, |max| convergence < max)
            && self.min_quality.map_or(true, |min| quality > min)
            && self.status.passes(status)
            && !self.excluded_status.contains(&status)
    }

    /// Evaluate the criteria for every profile.
    pub fn evaluate(
        &self,
        convergence: ArrayView1<f64>,
        quality: ArrayView1<f64>,
        status: ArrayView1<i32>,
    ) -> Array1<bool> {
        Zip::from(&convergence)
            .and(&quality)
            .and(&status)
            .map_collect(|&c, &q, &s| self.passes(c, q, s))
    }
}

/// An open pressure interval \[hPa\].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureRange {
    pub min: f64,
    pub max: f64,
}

impl PressureRange {
    pub fn contains(&self, pressure: f64) -> bool {
        self.min < pressure && pressure < self.max
    }
}

/// Pressures \[hPa\] that are excluded irrespective of [`PressureRange`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PressureBand {
    /// Exclude the open interval (min, max).
    Between(f64, f64),

    /// Exclude pressures strictly below this.
    Below(f64),
}

impl PressureBand {
    pub fn contains(&self, pressure: f64) -> bool {
        match *self {
            PressureBand::Between(min, max) => min < pressure && pressure < max,
            PressureBand::Below(max) => pressure < max,
        }
    }
}

/// An extra test for the levels at or above a pivot pressure (i.e. in the
/// lower atmosphere). A profile failing this test loses only those levels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpperLevelCriteria {
    /// \[hPa\]
    pub pivot_pressure: f64,

    /// Keep when quality > this.
    pub min_quality: f64,

    /// Keep when convergence < this.
    pub max_convergence: Option<f64>,
}

impl UpperLevelCriteria {
    pub fn applies_to(&self, pressure: f64) -> bool {
        pressure >= self.pivot_pressure
    }

    pub fn passes(&self, convergence: f64, quality: f64) -> bool {
        quality > self.min_quality && self.max_convergence.map_or(true, |max| convergence < max)
    }
}

/// Everything needed to screen one MLS species.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreeningRule {
    pub profile: ProfileCriteria,
    pub pressure: PressureRange,
    pub excluded_bands: &'static [PressureBand],
    pub upper_levels: Option<UpperLevelCriteria>,

    /// Is a latitude-dependent bias subtracted before screening?
    pub bias_corrected: bool,
}

impl ScreeningRule {
    /// Should a vertical level be kept?
    pub fn keeps_level(&self, pressure: f64) -> bool {
        self.pressure.contains(pressure) && !self.excluded_bands.iter().any(|b| b.contains(pressure))
    }

    /// Evaluate the level criteria for every level.
    pub fn level_mask(&self, pressure: ArrayView1<f64>) -> Array1<bool> {
        pressure.mapv(|p| self.keeps_level(p))
    }
}

static GPH_TEMPERATURE: ScreeningRule = ScreeningRule {
    profile: ProfileCriteria {
        max_convergence: Some(1.03),
        min_quality: Some(0.2),
        status: StatusTest::Even,
        excluded_status: &[],
    },
    pressure: PressureRange {
        min: 0.001,
        max: 261.0,
    },
    excluded_bands: &[],
    upper_levels: Some(UpperLevelCriteria {
        pivot_pressure: 100.0,
        min_quality: 0.9,
        max_convergence: None,
    }),
    bias_corrected: false,
};

static O3: ScreeningRule = ScreeningRule {
    profile: ProfileCriteria {
        max_convergence: Some(1.03),
        min_quality: Some(1.0),
        status: StatusTest::Even,
        excluded_status: &[],
    },
    pressure: PressureRange {
        min: 0.02,
        max: 261.0,
    },
    excluded_bands: &[PressureBand::Between(314.0, 318.0), PressureBand::Below(0.018)],
    upper_levels: None,
    bias_corrected: false,
};

static H2O: ScreeningRule = ScreeningRule {
    profile: ProfileCriteria {
        max_convergence: Some(2.0),
        min_quality: Some(1.45),
        status: StatusTest::Even,
        excluded_status: &[16, 32],
    },
    pressure: PressureRange {
        min: 0.002,
        max: 317.0,
    },
    excluded_bands: &[],
    upper_levels: None,
    bias_corrected: false,
};

static N2O: ScreeningRule = ScreeningRule {
    profile: ProfileCriteria {
        max_convergence: Some(2.0),
        min_quality: Some(1.0),
        status: StatusTest::Even,
        excluded_status: &[16, 32],
    },
    pressure: PressureRange {
        min: 0.45,
        max: 69.0,
    },
    excluded_bands: &[],
    upper_levels: None,
    bias_corrected: false,
};

static CLO: ScreeningRule = ScreeningRule {
    profile: ProfileCriteria {
        max_convergence: Some(1.05),
        min_quality: Some(1.3),
        status: StatusTest::Zero,
        excluded_status: &[],
    },
    pressure: PressureRange {
        min: 1.0,
        max: 147.0,
    },
    excluded_bands: &[],
    upper_levels: None,
    bias_corrected: true,
};

static HNO3: ScreeningRule = ScreeningRule {
    profile: ProfileCriteria {
        max_convergence: None,
        min_quality: None,
        status: StatusTest::Even,
        excluded_status: &[],
    },
    pressure: PressureRange {
        min: 0.001,
        max: 261.0,
    },
    excluded_bands: &[],
    upper_levels: Some(UpperLevelCriteria {
        pivot_pressure: 22.0,
        min_quality: 0.8,
        max_convergence: Some(1.03),
    }),
    bias_corrected: false,
};

impl MlsSpecies {
    /// The screening rule for this species.
    pub fn rule(self) -> &'static ScreeningRule {
        match self {
            MlsSpecies::GPH | MlsSpecies::Temperature => &GPH_TEMPERATURE,
            MlsSpecies::O3 => &O3,
            MlsSpecies::H2O => &H2O,
            MlsSpecies::N2O => &N2O,
            MlsSpecies::ClO => &CLO,
            MlsSpecies::HNO3 => &HNO3,
        }
    }
}

/// Get the screening rule for a species code, e.g. "HNO3".
pub fn rule_for_code(code: &str) -> Result<&'static ScreeningRule, ScreenError> {
    Ok(MlsSpecies::from_code(code)?.rule())
}
