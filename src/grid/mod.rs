// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Gridding of scattered (longitude, latitude, value) observations onto a
//! regular latitude-longitude grid, and resampling of grids over time.
//!
//! Coordinates are treated as planar degrees (a "latlon" projection); there is
//! no wrapping at the antimeridian. Grid nodes further than
//! `max_distance_factor * spacing` from every observation are NaN, whatever
//! [`Gridder`] is used.

mod error;
mod resample;
#[cfg(test)]
mod tests;

pub use error::GridError;
pub use resample::{Frequency, GridSeries};

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, trace};
use ndarray::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{DEFAULT_GRID_REGION, DEFAULT_GRID_SPACING, DEFAULT_MAX_DISTANCE_FACTOR},
    io::read::{acquisition_time, GomeColumn},
    species::GomeSpecies,
};

/// The bounds of a grid \[degrees\]. Both bounds are grid nodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl Default for Region {
    fn default() -> Self {
        let (west, east, south, north) = DEFAULT_GRID_REGION;
        Region {
            west,
            east,
            south,
            north,
        }
    }
}

/// How to grid observations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSpec {
    pub region: Region,

    /// The desired node spacing \[degrees\]. The actual spacing is adjusted
    /// so that the region bounds are nodes.
    pub spacing: f64,

    /// Nodes further than this many `spacing`s from any observation are NaN.
    pub max_distance_factor: f64,

    /// Drop observations that are not positive before gridding.
    pub positive_only: bool,
}

impl Default for GridSpec {
    fn default() -> Self {
        GridSpec {
            region: Region::default(),
            spacing: DEFAULT_GRID_SPACING,
            max_distance_factor: DEFAULT_MAX_DISTANCE_FACTOR,
            positive_only: true,
        }
    }
}

impl GridSpec {
    pub fn validate(&self) -> Result<(), GridError> {
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(GridError::BadSpacing(self.spacing));
        }
        if !(self.max_distance_factor.is_finite() && self.max_distance_factor > 0.0) {
            return Err(GridError::BadMaxDistance(self.max_distance_factor));
        }
        let Region {
            west,
            east,
            south,
            north,
        } = self.region;
        if !(west < east && south < north) {
            return Err(GridError::BadRegion {
                west,
                east,
                south,
                north,
            });
        }
        Ok(())
    }

    /// The maximum distance between a node and its nearest observation
    /// \[degrees\].
    pub fn max_distance(&self) -> f64 {
        self.max_distance_factor * self.spacing
    }

    pub fn longitudes(&self) -> Vec<f64> {
        nodes(self.region.west, self.region.east, self.spacing)
    }

    pub fn latitudes(&self) -> Vec<f64> {
        nodes(self.region.south, self.region.north, self.spacing)
    }
}

/// Evenly spaced nodes from `start` to `end` inclusive, with a spacing as close
/// as possible to `spacing`.
fn nodes(start: f64, end: f64, spacing: f64) -> Vec<f64> {
    let num_intervals = ((end - start) / spacing).round().max(1.0) as usize;
    let step = (end - start) / num_intervals as f64;
    (0..=num_intervals)
        .map(|i| start + i as f64 * step)
        .collect()
}

/// Observations ready to be gridded. All values are finite.
#[derive(Debug, Clone)]
pub struct Observations {
    pub longitudes: Vec<f64>,
    pub latitudes: Vec<f64>,
    pub values: Vec<f64>,
}

impl Observations {
    /// Collect the usable observations. Anything with a non-finite coordinate
    /// or value is dropped, and so are values <= 0 if `positive_only`.
    pub fn new(
        longitudes: ArrayView1<f64>,
        latitudes: ArrayView1<f64>,
        values: ArrayView1<f64>,
        positive_only: bool,
    ) -> Result<Observations, GridError> {
        if longitudes.len() != latitudes.len() || longitudes.len() != values.len() {
            return Err(GridError::ShapeMismatch {
                longitudes: longitudes.len(),
                latitudes: latitudes.len(),
                values: values.len(),
            });
        }

        let mut obs = Observations {
            longitudes: vec![],
            latitudes: vec![],
            values: vec![],
        };
        for ((&lon, &lat), &value) in longitudes.iter().zip(latitudes.iter()).zip(values.iter()) {
            if !(lon.is_finite() && lat.is_finite() && value.is_finite()) {
                continue;
            }
            if positive_only && value <= 0.0 {
                continue;
            }
            obs.longitudes.push(lon);
            obs.latitudes.push(lat);
            obs.values.push(value);
        }
        trace!("{}/{} observations are usable", obs.len(), values.len());
        if obs.is_empty() {
            return Err(GridError::NoObservations);
        }
        Ok(obs)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Observations bucketed into square cells, for quick neighbour searches.
struct SpatialIndex<'a> {
    obs: &'a Observations,
    cell_size: f64,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl<'a> SpatialIndex<'a> {
    fn new(obs: &'a Observations, cell_size: f64) -> SpatialIndex<'a> {
        let mut cells: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
        for (i, (&lon, &lat)) in obs.longitudes.iter().zip(&obs.latitudes).enumerate() {
            cells
                .entry(Self::cell(lon, lat, cell_size))
                .or_default()
                .push(i);
        }
        SpatialIndex {
            obs,
            cell_size,
            cells,
        }
    }

    fn cell(lon: f64, lat: f64, cell_size: f64) -> (i64, i64) {
        (
            (lon / cell_size).floor() as i64,
            (lat / cell_size).floor() as i64,
        )
    }

    /// Call `f` with the index and distance of every observation within
    /// `cell_size` of the point.
    fn for_each_neighbour<F: FnMut(usize, f64)>(&self, lon: f64, lat: f64, mut f: F) {
        let (cx, cy) = Self::cell(lon, lat, self.cell_size);
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(indices) = self.cells.get(&(cx + dx, cy + dy)) else {
                    continue;
                };
                for &i in indices {
                    let d = (self.obs.longitudes[i] - lon).hypot(self.obs.latitudes[i] - lat);
                    if d <= self.cell_size {
                        f(i, d);
                    }
                }
            }
        }
    }

    /// Is any observation within `cell_size` of the point?
    fn has_neighbour(&self, lon: f64, lat: f64) -> bool {
        let mut found = false;
        self.for_each_neighbour(lon, lat, |_, _| found = true);
        found
    }
}

/// A regular grid. `values` has shape (num. latitudes, num. longitudes).
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub longitudes: Vec<f64>,
    pub latitudes: Vec<f64>,
    pub values: Array2<f64>,
}

impl Grid {
    /// Set every node further than `max_distance` from all observations to
    /// NaN.
    pub fn distance_mask(&mut self, obs: &Observations, max_distance: f64) {
        let index = SpatialIndex::new(obs, max_distance);
        for (mut row, &lat) in self.values.outer_iter_mut().zip(&self.latitudes) {
            for (v, &lon) in row.iter_mut().zip(&self.longitudes) {
                if !index.has_neighbour(lon, lat) {
                    *v = f64::NAN;
                }
            }
        }
    }

    /// The number of non-NaN nodes.
    pub fn num_valid(&self) -> usize {
        self.values.iter().filter(|v| !v.is_nan()).count()
    }
}

/// Something that can interpolate scattered observations onto grid nodes.
pub trait Gridder: Sync {
    /// Interpolate `obs` onto every node of the grid described by `spec`.
    /// Nodes that can't be interpolated are NaN.
    fn interpolate(&self, obs: &Observations, spec: &GridSpec) -> Grid;

    /// Interpolate, then apply the distance mask.
    fn grid(&self, obs: &Observations, spec: &GridSpec) -> Result<Grid, GridError> {
        spec.validate()?;
        let mut grid = self.interpolate(obs, spec);
        grid.distance_mask(obs, spec.max_distance());
        debug!(
            "Gridded {} observations onto {} of {} nodes",
            obs.len(),
            grid.num_valid(),
            grid.values.len()
        );
        Ok(grid)
    }
}

/// Inverse-distance-weighted interpolation using only the observations within
/// the masking radius of each node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InverseDistanceGridder {
    pub power: f64,
}

impl Default for InverseDistanceGridder {
    fn default() -> Self {
        InverseDistanceGridder { power: 2.0 }
    }
}

impl Gridder for InverseDistanceGridder {
    fn interpolate(&self, obs: &Observations, spec: &GridSpec) -> Grid {
        let longitudes = spec.longitudes();
        let latitudes = spec.latitudes();
        let index = SpatialIndex::new(obs, spec.max_distance());

        let mut values = Array2::from_elem((latitudes.len(), longitudes.len()), f64::NAN);
        values
            .outer_iter_mut()
            .into_par_iter()
            .zip(latitudes.par_iter())
            .for_each(|(mut row, &lat)| {
                for (v, &lon) in row.iter_mut().zip(&longitudes) {
                    let mut exact = None;
                    let mut weighted_sum = 0.0;
                    let mut weight_sum = 0.0;
                    index.for_each_neighbour(lon, lat, |i, d| {
                        if d == 0.0 {
                            exact = Some(obs.values[i]);
                        } else {
                            let w = d.powf(-self.power);
                            weighted_sum += w * obs.values[i];
                            weight_sum += w;
                        }
                    });
                    *v = match exact {
                        Some(value) => value,
                        None if weight_sum > 0.0 => weighted_sum / weight_sum,
                        None => f64::NAN,
                    };
                }
            });

        Grid {
            longitudes,
            latitudes,
            values,
        }
    }
}

impl GomeColumn {
    /// Read one species from this file and grid it.
    pub fn grid<G: Gridder>(
        &self,
        species: GomeSpecies,
        spec: &GridSpec,
        gridder: &G,
    ) -> Result<Grid, GridError> {
        let columns = self.read(&[species])?;
        let values = columns
            .columns
            .get(&species)
            .ok_or(GridError::NoObservations)?;
        let obs = Observations::new(
            columns.longitude.view(),
            columns.latitude.view(),
            values.view(),
            spec.positive_only,
        )?;
        gridder.grid(&obs, spec)
    }
}

/// Grid one species from each GOME2 file, in parallel. Each file's time is
/// taken from its name. The results are in the same order as `files`; a
/// failure for one file doesn't affect the others.
pub fn grid_gome_files<G: Gridder>(
    files: &[PathBuf],
    species: GomeSpecies,
    spec: &GridSpec,
    gridder: &G,
    draw_progress_bar: bool,
) -> Vec<Result<(NaiveDateTime, Grid), GridError>> {
    let pb = ProgressBar::with_draw_target(
        Some(files.len() as _),
        if draw_progress_bar {
            ProgressDrawTarget::stdout()
        } else {
            ProgressDrawTarget::hidden()
        },
    )
    .with_style(
        ProgressStyle::default_bar()
            .template(
                "{msg:17}: [{wide_bar:.blue}] {pos:2}/{len:2} files ({elapsed_precise}<{eta_precise})",
            )
            .unwrap()
            .progress_chars("=> "),
    )
    .with_position(0)
    .with_message(format!("Gridding {species}"));

    let results = files
        .par_iter()
        .progress_with(pb.clone())
        .map(|file| {
            let grid_file = || -> Result<(NaiveDateTime, Grid), GridError> {
                let time = acquisition_time(file)?;
                let grid = GomeColumn::new(file).grid(species, spec, gridder)?;
                Ok((time, grid))
            };
            grid_file().map_err(|err| GridError::File {
                file: file.clone(),
                err: Box::new(err),
            })
        })
        .collect();
    pb.finish_with_message(format!("Gridded {species}"));
    results
}
