// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Stacking grids along time and resampling them to a coarser time frequency.

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Timelike};
use log::debug;
use ndarray::prelude::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use super::{Grid, GridError};
use crate::misc::nan_mean;

/// The time buckets that grids can be resampled to.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Hourly,
    #[default]
    Daily,
    Monthly,
}

impl Frequency {
    /// The start of the bucket that contains `time`.
    pub fn floor(self, time: NaiveDateTime) -> NaiveDateTime {
        let midnight = time.date().and_time(NaiveTime::MIN);
        match self {
            Frequency::Hourly => midnight + Duration::hours(i64::from(time.hour())),
            Frequency::Daily => midnight,
            Frequency::Monthly => midnight - Duration::days(i64::from(time.day0())),
        }
    }
}

/// Grids stacked along time. `values` has shape (num. times, num. latitudes,
/// num. longitudes) and `times` is sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSeries {
    pub times: Vec<NaiveDateTime>,
    pub longitudes: Vec<f64>,
    pub latitudes: Vec<f64>,
    pub values: Array3<f64>,
}

impl GridSeries {
    /// Stack grids along time, sorted by time. Every grid must have the same
    /// coordinates.
    pub fn new(mut grids: Vec<(NaiveDateTime, Grid)>) -> Result<GridSeries, GridError> {
        grids.sort_by_key(|(time, _)| *time);
        let (longitudes, latitudes) = match grids.first() {
            Some((_, first)) => (first.longitudes.clone(), first.latitudes.clone()),
            None => return Err(GridError::NoGrids),
        };

        let mut values = Array3::from_elem(
            (grids.len(), latitudes.len(), longitudes.len()),
            f64::NAN,
        );
        let mut times = Vec::with_capacity(grids.len());
        for ((time, grid), mut slice) in grids.into_iter().zip(values.outer_iter_mut()) {
            if grid.longitudes != longitudes || grid.latitudes != latitudes {
                return Err(GridError::IncompatibleGrids);
            }
            slice.assign(&grid.values);
            times.push(time);
        }

        Ok(GridSeries {
            times,
            longitudes,
            latitudes,
            values,
        })
    }

    /// Average the grids in each time bucket, ignoring NaNs. A node without any
    /// finite values in a bucket stays NaN. The times of the result are the
    /// bucket starts.
    pub fn resample(&self, frequency: Frequency) -> GridSeries {
        // `times` is sorted, so buckets are contiguous.
        let mut buckets: Vec<(NaiveDateTime, Vec<usize>)> = vec![];
        for (i, &time) in self.times.iter().enumerate() {
            let start = frequency.floor(time);
            match buckets.last_mut() {
                Some((last, indices)) if *last == start => indices.push(i),
                _ => buckets.push((start, vec![i])),
            }
        }
        debug!(
            "Resampling {} grids into {} {frequency} buckets",
            self.times.len(),
            buckets.len()
        );

        let (_, num_lats, num_lons) = self.values.dim();
        let mut values = Array3::from_elem((buckets.len(), num_lats, num_lons), f64::NAN);
        for ((_, indices), mut out) in buckets.iter().zip(values.outer_iter_mut()) {
            for ((j, k), v) in out.indexed_iter_mut() {
                *v = nan_mean(indices.iter().map(|&i| self.values[(i, j, k)]));
            }
        }

        GridSeries {
            times: buckets.into_iter().map(|(time, _)| time).collect(),
            longitudes: self.longitudes.clone(),
            latitudes: self.latitudes.clone(),
            values,
        }
    }
}
