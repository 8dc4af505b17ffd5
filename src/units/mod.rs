// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Unit conversions.

mod error;
#[cfg(test)]
mod tests;

pub use error::UnitsError;

use ndarray::{prelude::*, Zip};

use crate::constants::BOLTZMANN_HPA_CM3;

/// The factor that converts a number density \[cm^-3\] into a volume mixing
/// ratio, given a pressure \[hPa\] and temperature \[K\].
#[inline]
pub fn vmr_factor(pressure: f64, temperature: f64) -> f64 {
    BOLTZMANN_HPA_CM3 * temperature / pressure
}

/// Convert number densities \[cm^-3\] into volume mixing ratios, in place.
/// NaNs stay NaN.
pub fn number_density_to_vmr<D: Dimension>(
    values: &mut Array<f64, D>,
    pressure: &Array<f64, D>,
    temperature: &Array<f64, D>,
) -> Result<(), UnitsError> {
    if values.shape() != pressure.shape() || values.shape() != temperature.shape() {
        return Err(UnitsError::ShapeMismatch {
            values: values.shape().to_vec(),
            pressure: pressure.shape().to_vec(),
            temperature: temperature.shape().to_vec(),
        });
    }

    Zip::from(values)
        .and(pressure)
        .and(temperature)
        .for_each(|v, &p, &t| *v *= vmr_factor(p, t));
    Ok(())
}
