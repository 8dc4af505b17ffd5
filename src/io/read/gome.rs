// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to read GOME2 level 2 trace-gas total columns (MetOp-A, -B and -C).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use ndarray::prelude::*;

use super::{H5Source, ReadError};
use crate::species::GomeSpecies;

/// Timestamp layouts seen in the fourth "_"-separated token of GOME2 file
/// names.
const TIME_FORMATS: &[&str] = &["%Y%m%d%H%M%S", "%Y%m%dT%H%M%S"];

/// Pixel geolocation and the requested total columns. Every array has one
/// element per pixel.
#[derive(Debug, Clone)]
pub struct GomeColumns {
    /// \[degrees\]
    pub latitude: Array1<f64>,
    /// \[degrees\]
    pub longitude: Array1<f64>,
    pub line_of_sight_zenith: Array1<f64>,
    pub relative_azimuth: Array1<f64>,
    pub solar_zenith: Array1<f64>,
    pub columns: BTreeMap<GomeSpecies, Array1<f64>>,
}

impl GomeColumns {
    pub fn num_pixels(&self) -> usize {
        self.latitude.len()
    }
}

/// A GOME2 file.
#[derive(Debug, Clone)]
pub struct GomeColumn {
    path: PathBuf,
}

impl GomeColumn {
    pub fn new<P: AsRef<Path>>(path: P) -> GomeColumn {
        GomeColumn {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the pixel-centre geolocation and the total columns of the
    /// requested species.
    pub fn read(&self, species: &[GomeSpecies]) -> Result<GomeColumns, ReadError> {
        let file = H5Source::open(&self.path)?;
        let geo = file.group("GEOLOCATION")?;
        let latitude: Array1<f64> = geo.read_1d("LatitudeCentre")?;
        let num_pixels = latitude.len();

        let longitude = geo.read_1d("LongitudeCentre")?;
        let line_of_sight_zenith = geo.read_1d("LineOfSightZenithAngleCentre")?;
        let relative_azimuth = geo.read_1d("RelativeAzimuthCentre")?;
        let solar_zenith = geo.read_1d("SolarZenithAngleCentre")?;
        geo.check_shape("LongitudeCentre", &longitude, &[num_pixels])?;
        geo.check_shape(
            "LineOfSightZenithAngleCentre",
            &line_of_sight_zenith,
            &[num_pixels],
        )?;
        geo.check_shape("RelativeAzimuthCentre", &relative_azimuth, &[num_pixels])?;
        geo.check_shape("SolarZenithAngleCentre", &solar_zenith, &[num_pixels])?;

        let mut columns = BTreeMap::new();
        if !species.is_empty() {
            let total_columns = file.group("TOTAL_COLUMNS")?;
            for &s in species {
                let name: &'static str = s.into();
                let column = total_columns.read_1d(name)?;
                total_columns.check_shape(name, &column, &[num_pixels])?;
                columns.insert(s, column);
            }
        }
        debug!(
            "Read {num_pixels} pixels and {} columns from '{}'",
            columns.len(),
            self.path.display()
        );

        Ok(GomeColumns {
            latitude,
            longitude,
            line_of_sight_zenith,
            relative_azimuth,
            solar_zenith,
            columns,
        })
    }
}

/// Get the acquisition time of a GOME2 file from its name. The time is the
/// fourth "_"-separated token, e.g.
/// `GOME_O3-NO2-NO2Tropo-BrO-SO2-H2O-HCHO_L2_20190101012345_...` gives
/// 2019-01-01 01:23:45. A bare date (e.g. "20190101") is taken to be midnight.
pub fn acquisition_time<P: AsRef<Path>>(path: P) -> Result<NaiveDateTime, ReadError> {
    let path = path.as_ref();
    let bad_name = || ReadError::BadFileName {
        file: path.to_path_buf(),
        what: "acquisition time",
    };
    let token = path
        .file_name()
        .and_then(|f| f.to_str())
        .and_then(|f| f.split('_').nth(3))
        .ok_or_else(bad_name)?;

    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(token, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(token, "%Y%m%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(bad_name)
}
