// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to read OMPS limb profiler ozone (v2.5) files.
//!
//! Fields are spread over three groups: `DataFields`, `GeolocationFields` and
//! `AncillaryData`. Profile-valued fields have shape (num. profiles, num.
//! levels).

use std::path::{Path, PathBuf};

use ndarray::prelude::*;

use super::{clean_sentinels, replace_fill, H5Source, ReadError};
use crate::constants::OMPS_FILL_VALUE;

const DATA_FIELDS: &str = "DataFields";
const GEOLOCATION_FIELDS: &str = "GeolocationFields";
const ANCILLARY_DATA: &str = "AncillaryData";

/// A visible-ozone quality of exactly this value marks an unusable retrieval.
const BAD_VIS_QUALITY: f64 = 2.0;

/// Geolocation and auxiliary fields.
#[derive(Debug, Clone)]
pub struct OmpsAux {
    pub latitude: Array1<f64>,
    pub longitude: Array1<f64>,
    /// Retrieval altitudes \[km\]. Depending on the product version this is
    /// either per level or per profile and level.
    pub altitude: ArrayD<f64>,
    pub date: Array1<i64>,
    pub time: Array1<f64>,
    pub solar_zenith_angle: Array1<f64>,
    pub single_scatter_angle: Array1<f64>,
    pub tropopause_altitude: Array1<f64>,
    pub cloud_height: Array1<f64>,
}

/// Ozone number densities and the meteorology needed to convert them.
#[derive(Debug, Clone)]
pub struct OmpsData {
    /// \[hPa\]
    pub pressure: Array2<f64>,
    /// \[K\]
    pub temperature: Array2<f64>,
    /// UV ozone number density \[cm^-3\].
    pub uv_ozone: Array2<f64>,
    pub uv_precision: Array2<f64>,
    /// Visible ozone number density \[cm^-3\].
    pub vis_ozone: Array2<f64>,
    pub vis_precision: Array2<f64>,
}

/// Quality flags.
#[derive(Debug, Clone)]
pub struct OmpsFlags {
    /// Swath-level quality flags. Decimal digits of these integers carry
    /// separate sub-flags; see [`crate::screen::SwathFlags`].
    pub swath_level_quality: Array1<i64>,
    pub ascending_descending: Array1<i32>,
    /// Fill values have been replaced with NaN.
    pub uv_quality: Array1<f64>,
    /// Fill values and the "bad" value 2 have been replaced with NaN.
    pub vis_quality: Array1<f64>,
    /// Polar mesospheric cloud flag; 1 means the profile is affected.
    pub pmc_flag: Array1<i32>,
    pub q_uv: ArrayD<i32>,
    pub q_vis: ArrayD<i32>,
}

/// Everything else that might be useful.
#[derive(Debug, Clone)]
pub struct OmpsOther {
    pub uv_vertical_resolution: ArrayD<f64>,
    pub vis_vertical_resolution: ArrayD<f64>,
    pub event_number: Array1<i64>,
    pub surface_reflectance: ArrayD<f64>,
}

/// An OMPS file.
#[derive(Debug, Clone)]
pub struct OmpsProfile {
    path: PathBuf,
}

impl OmpsProfile {
    pub fn new<P: AsRef<Path>>(path: P) -> OmpsProfile {
        OmpsProfile {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_aux(&self) -> Result<OmpsAux, ReadError> {
        let file = H5Source::open(&self.path)?;
        let data = file.group(DATA_FIELDS)?;
        let geo = file.group(GEOLOCATION_FIELDS)?;
        let anc = file.group(ANCILLARY_DATA)?;
        Ok(OmpsAux {
            latitude: geo.read_1d("Latitude")?,
            longitude: geo.read_1d("Longitude")?,
            altitude: data.read_dyn("Altitude")?,
            date: geo.read_1d("Date")?,
            time: geo.read_1d("Time")?,
            solar_zenith_angle: geo.read_1d("SolarZenithAngle")?,
            single_scatter_angle: geo.read_1d("SingleScatterAngle")?,
            tropopause_altitude: anc.read_1d("TropopauseAltitude")?,
            cloud_height: data.read_1d("CloudHeight")?,
        })
    }

    /// Read ozone and meteorology. Invalid ozone measurements are replaced
    /// with NaN.
    pub fn read_data(&self) -> Result<OmpsData, ReadError> {
        let file = H5Source::open(&self.path)?;
        let data = file.group(DATA_FIELDS)?;
        let anc = file.group(ANCILLARY_DATA)?;

        let pressure = anc.read_2d("Pressure")?;
        let temperature = anc.read_2d("Temperature")?;
        let mut uv_ozone = data.read_2d("O3UvValue")?;
        let mut uv_precision = data.read_2d("O3UvPrecision")?;
        let mut vis_ozone = data.read_2d("O3VisValue")?;
        let mut vis_precision = data.read_2d("O3VisPrecision")?;

        let shape = uv_ozone.shape().to_vec();
        anc.check_shape("Pressure", &pressure, &shape)?;
        anc.check_shape("Temperature", &temperature, &shape)?;
        data.check_shape("O3UvPrecision", &uv_precision, &shape)?;
        data.check_shape("O3VisValue", &vis_ozone, &shape)?;
        data.check_shape("O3VisPrecision", &vis_precision, &shape)?;

        clean_sentinels(&mut uv_ozone, &mut uv_precision, OMPS_FILL_VALUE);
        clean_sentinels(&mut vis_ozone, &mut vis_precision, OMPS_FILL_VALUE);
        data.check_not_all_fill("O3UvValue", &uv_ozone)?;
        data.check_not_all_fill("O3VisValue", &vis_ozone)?;

        Ok(OmpsData {
            pressure,
            temperature,
            uv_ozone,
            uv_precision,
            vis_ozone,
            vis_precision,
        })
    }

    pub fn read_flags(&self) -> Result<OmpsFlags, ReadError> {
        let file = H5Source::open(&self.path)?;
        let data = file.group(DATA_FIELDS)?;
        let geo = file.group(GEOLOCATION_FIELDS)?;

        let mut uv_quality = data.read_1d("O3UvQuality")?;
        let mut vis_quality = data.read_1d("O3VisQuality")?;
        replace_fill(&mut uv_quality, OMPS_FILL_VALUE);
        replace_fill(&mut vis_quality, OMPS_FILL_VALUE);
        vis_quality.mapv_inplace(|q| if q == BAD_VIS_QUALITY { f64::NAN } else { q });

        Ok(OmpsFlags {
            swath_level_quality: geo.read_1d("SwathLevelQualityFlags")?,
            ascending_descending: geo.read_1d("AscendingDescendingFlag")?,
            uv_quality,
            vis_quality,
            pmc_flag: data.read_1d("ASI_PMCFlag")?,
            q_uv: data.read_dyn("Q_UV")?,
            q_vis: data.read_dyn("Q_VIS")?,
        })
    }

    pub fn read_other(&self) -> Result<OmpsOther, ReadError> {
        let file = H5Source::open(&self.path)?;
        let data = file.group(DATA_FIELDS)?;
        Ok(OmpsOther {
            uv_vertical_resolution: data.read_dyn("VertRes_O3UV")?,
            vis_vertical_resolution: data.read_dyn("VertRes_O3Vis")?,
            event_number: data.read_1d("eventNumber")?,
            surface_reflectance: data.read_dyn("sfcReflValue")?,
        })
    }
}
