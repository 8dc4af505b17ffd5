// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to read MLS level 2 (v4.2) profile files.
//!
//! MLS files are HDF-EOS5. Each file holds a single swath named after its
//! species, e.g. `HDFEOS/SWATHS/ClO`, with "Geolocation Fields" and "Data
//! Fields" groups. The species is also encoded in the file name, e.g.
//! `MLS-Aura_L2GP-ClO_v04-23-c01_2019d001.he5`.

use std::path::{Path, PathBuf};

use log::debug;
use ndarray::prelude::*;

use super::{clean_sentinels, H5Group, H5Source, ReadError};
use crate::{constants::MLS_FILL_VALUE, species::MlsSpecies};

/// Geolocation fields of an MLS file. Everything is indexed by profile, except
/// `pressure`, which is indexed by vertical level.
#[derive(Debug, Clone)]
pub struct MlsGeolocation {
    /// \[degrees\]
    pub latitude: Array1<f64>,

    /// \[degrees\]
    pub longitude: Array1<f64>,

    /// The pressure of each vertical level \[hPa\].
    pub pressure: Array1<f64>,

    /// \[degrees\]
    pub line_of_sight_angle: Array1<f64>,

    /// \[hours\]
    pub local_solar_time: Array1<f64>,

    /// \[degrees\]
    pub orbit_geodetic_angle: Array1<f64>,

    /// \[degrees\]
    pub solar_zenith_angle: Array1<f64>,

    /// Seconds since 1993-01-01.
    pub time: Array1<f64>,

    pub chunk_number: Array1<i32>,
}

/// Data fields of an MLS file.
#[derive(Debug, Clone)]
pub struct MlsData {
    pub species: MlsSpecies,

    /// Retrieval convergence per profile; lower is better.
    pub convergence: Array1<f64>,

    /// Shape (num. times, num. levels). Fill values have been replaced with
    /// NaN.
    pub precision: Array2<f64>,

    /// Shape (num. times, num. levels). Values with a non-positive precision
    /// or a fill value have been replaced with NaN.
    pub value: Array2<f64>,

    /// Retrieval quality per profile; higher is better.
    pub quality: Array1<f64>,

    /// Retrieval status bit flags per profile. Even is nominal.
    pub status: Array1<i32>,

    pub num_levels: usize,

    pub num_times: usize,
}

/// An MLS file.
#[derive(Debug, Clone)]
pub struct MlsProfile {
    path: PathBuf,
    species: MlsSpecies,
}

impl MlsProfile {
    /// Set up reading an MLS file. The species is taken from the file name.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<MlsProfile, ReadError> {
        let path = path.as_ref().to_path_buf();
        let species = species_from_file_name(&path)?;
        debug!("'{}' is an MLS {species} file", path.display());
        Ok(MlsProfile { path, species })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn species(&self) -> MlsSpecies {
        self.species
    }

    fn swath_name(&self) -> String {
        format!("HDFEOS/SWATHS/{}", self.species)
    }

    /// Read the geolocation fields.
    pub fn read_geolocation(&self) -> Result<MlsGeolocation, ReadError> {
        let file = H5Source::open(&self.path)?;
        let geo = file.group(&format!("{}/Geolocation Fields", self.swath_name()))?;
        read_geolocation(&geo)
    }

    /// Read the data fields. Invalid measurements are replaced with NaN.
    pub fn read_data(&self) -> Result<MlsData, ReadError> {
        let file = H5Source::open(&self.path)?;
        let swath = file.group(&self.swath_name())?;
        let data = file.group(&format!("{}/Data Fields", self.swath_name()))?;
        read_data(self.species, &swath, &data)
    }

    /// Read both the geolocation and data fields, opening the file only once.
    pub fn read(&self) -> Result<(MlsGeolocation, MlsData), ReadError> {
        let file = H5Source::open(&self.path)?;
        let swath = file.group(&self.swath_name())?;
        let geo = file.group(&format!("{}/Geolocation Fields", self.swath_name()))?;
        let data = file.group(&format!("{}/Data Fields", self.swath_name()))?;
        Ok((
            read_geolocation(&geo)?,
            read_data(self.species, &swath, &data)?,
        ))
    }
}

fn read_geolocation(geo: &H5Group) -> Result<MlsGeolocation, ReadError> {
    Ok(MlsGeolocation {
        latitude: geo.read_1d("Latitude")?,
        longitude: geo.read_1d("Longitude")?,
        pressure: geo.read_1d("Pressure")?,
        line_of_sight_angle: geo.read_1d("LineOfSightAngle")?,
        local_solar_time: geo.read_1d("LocalSolarTime")?,
        orbit_geodetic_angle: geo.read_1d("OrbitGeodeticAngle")?,
        solar_zenith_angle: geo.read_1d("SolarZenithAngle")?,
        time: geo.read_1d("Time")?,
        chunk_number: geo.read_1d("ChunkNumber")?,
    })
}

fn read_data(
    species: MlsSpecies,
    swath: &H5Group,
    data: &H5Group,
) -> Result<MlsData, ReadError> {
    let num_levels = swath.len("nLevels")?;
    let num_times = swath.len("nTimes")?;

    let convergence = data.read_1d("Convergence")?;
    let mut precision = data.read_2d("L2gpPrecision")?;
    let mut value = data.read_2d("L2gpValue")?;
    let quality = data.read_1d("Quality")?;
    let status = data.read_1d("Status")?;

    data.check_shape("L2gpValue", &value, &[num_times, num_levels])?;
    data.check_shape("L2gpPrecision", &precision, &[num_times, num_levels])?;
    data.check_shape("Convergence", &convergence, &[num_times])?;
    data.check_shape("Quality", &quality, &[num_times])?;
    data.check_shape("Status", &status, &[num_times])?;

    clean_sentinels(&mut value, &mut precision, MLS_FILL_VALUE);
    data.check_not_all_fill("L2gpValue", &value)?;

    Ok(MlsData {
        species,
        convergence,
        precision,
        value,
        quality,
        status,
        num_levels,
        num_times,
    })
}

/// Get the species from an MLS file name. The species is the third
/// "-"-separated token, up to the first "_", e.g.
/// `MLS-Aura_L2GP-ClO_v04-23-c01_2019d001.he5` gives "ClO".
pub(super) fn species_from_file_name(path: &Path) -> Result<MlsSpecies, ReadError> {
    let code = path
        .file_name()
        .and_then(|f| f.to_str())
        .and_then(|f| f.split('-').nth(2))
        .and_then(|token| token.split('_').next())
        .ok_or_else(|| ReadError::BadFileName {
            file: path.to_path_buf(),
            what: "MLS species",
        })?;
    Ok(MlsSpecies::from_code(code)?)
}
