// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Quality screening of satellite profiles.
//!
//! Screening evaluates boolean "keep" criteria over profiles, levels or
//! individual entries and sets every excluded entry of the value and precision
//! arrays to NaN, in place. Masks compose by the union of their exclusions, and
//! applying a mask twice is the same as applying it once.

mod error;
mod mls;
mod omps;
mod rules;

pub use error::ScreenError;
pub use mls::{apply_clo_bias, screen_mls};
pub use omps::{decode_swath_flag, screen_omps, OmpsOzone, SwathFlags};
pub use rules::{
    rule_for_code, PressureBand, PressureRange, ProfileCriteria, ScreeningRule, StatusTest,
    UpperLevelCriteria,
};

use ndarray::{prelude::*, Zip};
use serde::{Deserialize, Serialize};

use crate::bias::BiasExtrapolation;

/// Optional screening behaviour. Everything is off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenOptions {
    /// After bias correction, exclude negative ClO values.
    pub clo_drop_negative: bool,

    /// Exclude ClO profiles that aren't sunlit (solar zenith angle > 89°).
    pub clo_sunlit_only: bool,

    /// Exclude ClO profiles with a local solar time outside 10 to 16 hours.
    pub clo_midday_only: bool,

    /// Exclude OMPS UV (visible) profiles without a valid UV (visible)
    /// quality.
    pub omps_require_quality: bool,

    /// What to do with latitudes outside of the ClO bias table.
    pub bias_extrapolation: BiasExtrapolation,
}

/// Set every level of each excluded profile (rows of `values`) to NaN.
pub fn mask_profiles(mut values: ArrayViewMut2<f64>, keep: ArrayView1<bool>) {
    for (mut profile, &keep) in values.outer_iter_mut().zip(keep.iter()) {
        if !keep {
            profile.fill(f64::NAN);
        }
    }
}

/// Set each excluded level (columns of `values`) to NaN across all profiles.
pub fn mask_levels(mut values: ArrayViewMut2<f64>, keep: ArrayView1<bool>) {
    for (mut level, &keep) in values.axis_iter_mut(Axis(1)).zip(keep.iter()) {
        if !keep {
            level.fill(f64::NAN);
        }
    }
}

/// Set every excluded entry to NaN.
pub fn mask_entries(values: ArrayViewMut2<f64>, keep: ArrayView2<bool>) {
    Zip::from(values).and(keep).for_each(|v, &keep| {
        if !keep {
            *v = f64::NAN;
        }
    });
}

fn check_shape(what: &'static str, got: &[usize], expected: &[usize]) -> Result<(), ScreenError> {
    if got == expected {
        Ok(())
    } else {
        Err(ScreenError::ShapeMismatch {
            what,
            expected: expected.to_vec(),
            got: got.to_vec(),
        })
    }
}
