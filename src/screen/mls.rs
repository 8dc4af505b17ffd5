// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Screening of MLS profiles.

use std::path::Path;

use log::{debug, trace};
use ndarray::{prelude::*, Zip};

use super::{check_shape, mask_entries, mask_levels, mask_profiles, ScreenError, ScreenOptions};
use crate::{
    bias::{BiasExtrapolation, BiasTable},
    constants::{
        CLO_BIAS_LEVELS, CLO_MAX_SOLAR_ZENITH_ANGLE, CLO_MIDDAY_HOURS, CLO_MIN_LEVELS,
    },
    io::read::{MlsData, MlsGeolocation, MlsProfile},
    species::MlsSpecies,
};

impl MlsProfile {
    /// Read this file, apply the bias correction (ClO only) and screen the
    /// values and precisions. `bias_file` is only used (and required) for ClO.
    pub fn correct(
        &self,
        bias_file: Option<&Path>,
        opts: &ScreenOptions,
    ) -> Result<(MlsGeolocation, MlsData), ScreenError> {
        let (geo, mut data) = self.read()?;
        if data.species.rule().bias_corrected {
            let bias_file = bias_file.ok_or(ScreenError::MissingBiasTable)?;
            let table = BiasTable::read_file(bias_file)?;
            apply_clo_bias(&geo, &mut data, &table, opts.bias_extrapolation)?;
        }
        screen_mls(&geo, &mut data, opts)?;
        Ok((geo, data))
    }
}

/// Subtract the latitude-dependent bias of each table channel from the
/// corresponding ClO level (5, 6 and 7), in place.
pub fn apply_clo_bias(
    geo: &MlsGeolocation,
    data: &mut MlsData,
    table: &BiasTable,
    extrapolation: BiasExtrapolation,
) -> Result<(), ScreenError> {
    check_dims(geo, data)?;
    if data.num_levels < CLO_MIN_LEVELS {
        return Err(ScreenError::TooFewLevels {
            species: data.species,
            num_levels: data.num_levels,
            required: CLO_MIN_LEVELS,
        });
    }

    // Shape (num. times, 3).
    let biases = table.interpolate_all(geo.latitude.view(), extrapolation)?;
    for (i_chan, &level) in CLO_BIAS_LEVELS.iter().enumerate() {
        let mut values = data.value.column_mut(level);
        values -= &biases.column(i_chan);
    }
    debug!("Subtracted ClO biases from levels {CLO_BIAS_LEVELS:?}");
    Ok(())
}

/// Screen MLS values and precisions according to the species'
/// [`ScreeningRule`](super::ScreeningRule) and `opts`. Excluded entries become
/// NaN; nothing else changes.
pub fn screen_mls(
    geo: &MlsGeolocation,
    data: &mut MlsData,
    opts: &ScreenOptions,
) -> Result<(), ScreenError> {
    check_dims(geo, data)?;
    let rule = data.species.rule();

    let mut keep_profiles = rule.profile.evaluate(
        data.convergence.view(),
        data.quality.view(),
        data.status.view(),
    );
    if data.species == MlsSpecies::ClO {
        if opts.clo_sunlit_only {
            Zip::from(&mut keep_profiles)
                .and(&geo.solar_zenith_angle)
                .for_each(|keep, &sza| *keep &= sza <= CLO_MAX_SOLAR_ZENITH_ANGLE);
        }
        if opts.clo_midday_only {
            let (start, end) = CLO_MIDDAY_HOURS;
            Zip::from(&mut keep_profiles)
                .and(&geo.local_solar_time)
                .for_each(|keep, &lst| *keep &= (start..=end).contains(&lst));
        }
    }
    let keep_levels = rule.level_mask(geo.pressure.view());
    trace!(
        "{}: keeping {}/{} profiles, {}/{} levels",
        data.species,
        keep_profiles.iter().filter(|k| **k).count(),
        keep_profiles.len(),
        keep_levels.iter().filter(|k| **k).count(),
        keep_levels.len()
    );

    // Profiles failing the extra test lose only the levels at or above the
    // pivot pressure.
    let keep_entries = rule.upper_levels.map(|upper| {
        let passes =
            Zip::from(&data.convergence)
                .and(&data.quality)
                .map_collect(|&c, &q| upper.passes(c, q));
        let applies = geo.pressure.mapv(|p| upper.applies_to(p));
        Array2::from_shape_fn((data.num_times, data.num_levels), |(i, j)| {
            passes[i] || !applies[j]
        })
    });

    for array in [&mut data.value, &mut data.precision] {
        mask_profiles(array.view_mut(), keep_profiles.view());
        mask_levels(array.view_mut(), keep_levels.view());
        if let Some(keep_entries) = keep_entries.as_ref() {
            mask_entries(array.view_mut(), keep_entries.view());
        }
    }

    if data.species == MlsSpecies::ClO && opts.clo_drop_negative {
        Zip::from(&mut data.value)
            .and(&mut data.precision)
            .for_each(|v, p| {
                if *v < 0.0 {
                    *v = f64::NAN;
                    *p = f64::NAN;
                }
            });
    }

    Ok(())
}

/// Make sure the geolocation and data arrays agree with each other.
fn check_dims(geo: &MlsGeolocation, data: &MlsData) -> Result<(), ScreenError> {
    let (num_times, num_levels) = (data.num_times, data.num_levels);
    check_shape("MLS values", data.value.shape(), &[num_times, num_levels])?;
    check_shape("MLS precisions", data.precision.shape(), &[num_times, num_levels])?;
    check_shape("MLS convergence", data.convergence.shape(), &[num_times])?;
    check_shape("MLS quality", data.quality.shape(), &[num_times])?;
    check_shape("MLS status", data.status.shape(), &[num_times])?;
    check_shape("MLS latitudes", geo.latitude.shape(), &[num_times])?;
    check_shape("MLS solar zenith angles", geo.solar_zenith_angle.shape(), &[num_times])?;
    check_shape("MLS local solar times", geo.local_solar_time.shape(), &[num_times])?;
    check_shape("MLS pressures", geo.pressure.shape(), &[num_levels])?;
    Ok(())
}
