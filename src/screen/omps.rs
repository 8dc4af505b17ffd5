// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Screening of OMPS ozone profiles.

use log::trace;
use ndarray::prelude::*;

use super::{check_shape, mask_profiles, ScreenError, ScreenOptions};
use crate::{
    io::read::{OmpsData, OmpsFlags, OmpsProfile},
    units::number_density_to_vmr,
};

/// Profiles with a South Atlantic Anomaly indicator at least this large are
/// excluded.
const MAX_SAA: u8 = 2;

/// Profiles with this attitude-shift indicator are excluded.
const BAD_ATTITUDE: u8 = 1;

/// Profiles with this PMC flag are excluded.
const BAD_PMC: i32 = 1;

/// Screened OMPS ozone, either as number densities \[cm^-3\] or volume mixing
/// ratios. Every array has shape (num. profiles, num. levels).
#[derive(Debug, Clone)]
pub struct OmpsOzone {
    pub uv: Array2<f64>,
    pub uv_precision: Array2<f64>,
    pub vis: Array2<f64>,
    pub vis_precision: Array2<f64>,
}

/// The two sub-flags carried by an OMPS swath-level quality flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwathFlags {
    /// South Atlantic Anomaly indicator.
    pub saa: u8,

    /// Attitude-shift indicator.
    pub attitude: u8,
}

/// Decode a swath-level quality flag. Written as decimal text, the first
/// character is the SAA indicator and the last character is the attitude
/// indicator, e.g. 20 gives an SAA of 2 and an attitude of 0. A single-digit
/// flag provides both. Negative flags can't be decoded.
pub fn decode_swath_flag(flag: i64) -> Result<SwathFlags, ScreenError> {
    let text = flag.to_string();
    let digit = |c: Option<char>| {
        c.and_then(|c| c.to_digit(10))
            .map(|d| d as u8)
            .ok_or(ScreenError::BadSwathFlag(flag))
    };
    Ok(SwathFlags {
        saa: digit(text.chars().next())?,
        attitude: digit(text.chars().last())?,
    })
}

/// Screen OMPS ozone in place. Whole profiles are excluded for polar
/// mesospheric clouds, attitude shifts and the South Atlantic Anomaly. With
/// `opts.omps_require_quality`, UV (visible) profiles without a UV (visible)
/// quality are also excluded.
pub fn screen_omps(
    data: &mut OmpsData,
    flags: &OmpsFlags,
    opts: &ScreenOptions,
) -> Result<(), ScreenError> {
    let shape = data.uv_ozone.shape().to_vec();
    let num_profiles = shape[0];
    check_shape("OMPS UV precisions", data.uv_precision.shape(), &shape)?;
    check_shape("OMPS visible ozone", data.vis_ozone.shape(), &shape)?;
    check_shape("OMPS visible precisions", data.vis_precision.shape(), &shape)?;
    check_shape(
        "OMPS swath-level quality flags",
        flags.swath_level_quality.shape(),
        &[num_profiles],
    )?;
    check_shape("OMPS PMC flags", flags.pmc_flag.shape(), &[num_profiles])?;
    check_shape("OMPS UV quality", flags.uv_quality.shape(), &[num_profiles])?;
    check_shape("OMPS visible quality", flags.vis_quality.shape(), &[num_profiles])?;

    let mut keep = Array1::from_elem(num_profiles, true);
    for ((keep, &swath), &pmc) in keep
        .iter_mut()
        .zip(flags.swath_level_quality.iter())
        .zip(flags.pmc_flag.iter())
    {
        let SwathFlags { saa, attitude } = decode_swath_flag(swath)?;
        *keep = pmc != BAD_PMC && attitude != BAD_ATTITUDE && saa < MAX_SAA;
    }
    trace!(
        "OMPS: keeping {}/{num_profiles} profiles",
        keep.iter().filter(|k| **k).count()
    );

    let (keep_uv, keep_vis) = if opts.omps_require_quality {
        (
            &keep & &flags.uv_quality.mapv(|q| !q.is_nan()),
            &keep & &flags.vis_quality.mapv(|q| !q.is_nan()),
        )
    } else {
        (keep.clone(), keep)
    };
    mask_profiles(data.uv_ozone.view_mut(), keep_uv.view());
    mask_profiles(data.uv_precision.view_mut(), keep_uv.view());
    mask_profiles(data.vis_ozone.view_mut(), keep_vis.view());
    mask_profiles(data.vis_precision.view_mut(), keep_vis.view());
    Ok(())
}

impl OmpsProfile {
    /// Read and screen this file's ozone. With `vmr`, number densities are
    /// converted to volume mixing ratios.
    pub fn correct(&self, vmr: bool, opts: &ScreenOptions) -> Result<OmpsOzone, ScreenError> {
        let mut data = self.read_data()?;
        let flags = self.read_flags()?;
        screen_omps(&mut data, &flags, opts)?;

        let OmpsData {
            pressure,
            temperature,
            mut uv_ozone,
            mut uv_precision,
            mut vis_ozone,
            mut vis_precision,
        } = data;
        if vmr {
            for array in [
                &mut uv_ozone,
                &mut uv_precision,
                &mut vis_ozone,
                &mut vis_precision,
            ] {
                number_density_to_vmr(array, &pressure, &temperature)?;
            }
        }
        Ok(OmpsOzone {
            uv: uv_ozone,
            uv_precision,
            vis: vis_ozone,
            vis_precision,
        })
    }
}
