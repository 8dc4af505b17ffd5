// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;

use approx::assert_abs_diff_eq;
use chrono::NaiveDate;
use tempfile::TempDir;

use super::*;
use crate::io::read::tests::write_gome_file;

fn time(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2019, 1, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// A 3x3 grid from 0 to 1 degrees.
fn small_spec(max_distance_factor: f64) -> GridSpec {
    GridSpec {
        region: Region {
            west: 0.0,
            east: 1.0,
            south: 0.0,
            north: 1.0,
        },
        spacing: 0.5,
        max_distance_factor,
        positive_only: true,
    }
}

fn obs(lons: &[f64], lats: &[f64], values: &[f64]) -> Observations {
    Observations {
        longitudes: lons.to_vec(),
        latitudes: lats.to_vec(),
        values: values.to_vec(),
    }
}

/// Puts 1 everywhere.
struct ConstantGridder;

impl Gridder for ConstantGridder {
    fn interpolate(&self, _: &Observations, spec: &GridSpec) -> Grid {
        let longitudes = spec.longitudes();
        let latitudes = spec.latitudes();
        Grid {
            values: Array2::ones((latitudes.len(), longitudes.len())),
            longitudes,
            latitudes,
        }
    }
}

#[test]
fn test_default_grid_nodes() {
    let spec = GridSpec::default();
    let lons = spec.longitudes();
    let lats = spec.latitudes();
    assert_eq!(lons.len(), 3599);
    assert_eq!(lats.len(), 1796);
    assert_abs_diff_eq!(lons[0], -180.0);
    assert_abs_diff_eq!(*lons.last().unwrap(), 179.8, epsilon = 1e-9);
    assert_abs_diff_eq!(lats[0], -89.75);
    assert_abs_diff_eq!(*lats.last().unwrap(), 89.75, epsilon = 1e-9);
    assert_abs_diff_eq!(lons[1] - lons[0], 0.1, epsilon = 1e-9);
    assert_abs_diff_eq!(spec.max_distance(), 0.6, epsilon = 1e-12);
    assert!(spec.positive_only);
}

#[test]
fn test_validate_spec() {
    assert!(GridSpec::default().validate().is_ok());

    let mut spec = GridSpec::default();
    spec.spacing = 0.0;
    assert!(matches!(spec.validate(), Err(GridError::BadSpacing(_))));

    let mut spec = GridSpec::default();
    spec.max_distance_factor = f64::NAN;
    assert!(matches!(spec.validate(), Err(GridError::BadMaxDistance(_))));

    let mut spec = GridSpec::default();
    spec.region.east = -180.0;
    assert!(matches!(spec.validate(), Err(GridError::BadRegion { .. })));
}

#[test]
fn test_observations_filtering() {
    let lons = array![0.0, 1.0, 2.0, 3.0, f64::NAN];
    let lats = array![0.0, 1.0, 2.0, 3.0, 4.0];
    let values = array![5.0, -1.0, 0.0, f64::NAN, 6.0];

    let o = Observations::new(lons.view(), lats.view(), values.view(), true).unwrap();
    assert_eq!(o.values, vec![5.0]);
    assert_eq!(o.longitudes, vec![0.0]);

    let o = Observations::new(lons.view(), lats.view(), values.view(), false).unwrap();
    assert_eq!(o.values, vec![5.0, -1.0, 0.0]);
    assert_eq!(o.latitudes, vec![0.0, 1.0, 2.0]);

    let result = Observations::new(
        lons.view(),
        lats.view(),
        array![-1.0, -2.0, 0.0, 0.0, 0.0].view(),
        true,
    );
    assert!(matches!(result, Err(GridError::NoObservations)));

    let result = Observations::new(lons.view(), lats.view(), array![1.0].view(), true);
    assert!(matches!(
        result,
        Err(GridError::ShapeMismatch {
            longitudes: 5,
            latitudes: 5,
            values: 1
        })
    ));
}

#[test]
fn test_idw_single_observation() {
    let grid = InverseDistanceGridder::default()
        .grid(&obs(&[0.0], &[0.0], &[5.0]), &small_spec(1.0))
        .unwrap();
    assert_eq!(grid.longitudes, vec![0.0, 0.5, 1.0]);
    assert_eq!(grid.latitudes, vec![0.0, 0.5, 1.0]);
    // Values are indexed by (lat, lon).
    assert_abs_diff_eq!(grid.values[(0, 0)], 5.0);
    assert_abs_diff_eq!(grid.values[(0, 1)], 5.0);
    assert_abs_diff_eq!(grid.values[(1, 0)], 5.0);
    assert!(grid.values[(1, 1)].is_nan());
    assert!(grid.values[(0, 2)].is_nan());
    assert_eq!(grid.num_valid(), 3);
}

#[test]
fn test_idw_weights() {
    let grid = InverseDistanceGridder::default()
        .grid(
            &obs(&[0.0, 1.0], &[0.0, 0.0], &[1.0, 3.0]),
            &small_spec(2.0),
        )
        .unwrap();
    // On the observations.
    assert_abs_diff_eq!(grid.values[(0, 0)], 1.0);
    assert_abs_diff_eq!(grid.values[(0, 2)], 3.0);
    // Equidistant.
    assert_abs_diff_eq!(grid.values[(0, 1)], 2.0);
    assert_abs_diff_eq!(grid.values[(1, 1)], 2.0, epsilon = 1e-12);
    // Only one observation is close enough.
    assert_abs_diff_eq!(grid.values[(2, 0)], 1.0);
    assert_abs_diff_eq!(grid.values[(2, 2)], 3.0);
    assert_abs_diff_eq!(grid.values[(1, 0)], 1.0);

    // With a bigger radius, (0.5, 0) is 0.5 from the first observation and
    // ~1.12 from the second; the closer one dominates.
    let grid = InverseDistanceGridder::default()
        .grid(
            &obs(&[0.0, 1.0], &[0.0, 0.0], &[1.0, 3.0]),
            &small_spec(4.0),
        )
        .unwrap();
    assert_abs_diff_eq!(grid.values[(1, 0)], 4.0 / 3.0, epsilon = 1e-12);
}

#[test]
fn test_distance_mask_applies_to_any_gridder() {
    let grid = ConstantGridder
        .grid(&obs(&[0.0], &[0.0], &[5.0]), &small_spec(1.0))
        .unwrap();
    assert_eq!(grid.num_valid(), 3);
    assert_abs_diff_eq!(grid.values[(0, 1)], 1.0);
    assert!(grid.values[(2, 2)].is_nan());

    // A big enough radius masks nothing.
    let grid = ConstantGridder
        .grid(&obs(&[0.0], &[0.0], &[5.0]), &small_spec(4.0))
        .unwrap();
    assert_eq!(grid.num_valid(), 9);
}

#[test]
fn test_frequency_floor() {
    let t = NaiveDate::from_ymd_opt(2019, 3, 17)
        .unwrap()
        .and_hms_opt(13, 45, 12)
        .unwrap();
    let date = |m, d, h| {
        NaiveDate::from_ymd_opt(2019, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    };
    assert_eq!(Frequency::Hourly.floor(t), date(3, 17, 13));
    assert_eq!(Frequency::Daily.floor(t), date(3, 17, 0));
    assert_eq!(Frequency::Monthly.floor(t), date(3, 1, 0));

    assert_eq!(Frequency::from_str("monthly").unwrap(), Frequency::Monthly);
    assert_eq!(Frequency::default(), Frequency::Daily);
    assert!(Frequency::from_str("weekly").is_err());
}

fn grid_1x2(values: [f64; 2]) -> Grid {
    Grid {
        longitudes: vec![0.0, 1.0],
        latitudes: vec![0.0],
        values: Array2::from_shape_vec((1, 2), values.to_vec()).unwrap(),
    }
}

#[test]
fn test_grid_series_sorting_and_compatibility() {
    let series = GridSeries::new(vec![
        (time(2, 0), grid_1x2([2.0, 2.0])),
        (time(1, 0), grid_1x2([1.0, 1.0])),
    ])
    .unwrap();
    assert_eq!(series.times, vec![time(1, 0), time(2, 0)]);
    assert_eq!(series.values.dim(), (2, 1, 2));
    assert_abs_diff_eq!(series.values[(0, 0, 0)], 1.0);
    assert_abs_diff_eq!(series.values[(1, 0, 1)], 2.0);

    assert!(matches!(GridSeries::new(vec![]), Err(GridError::NoGrids)));

    let mut other = grid_1x2([1.0, 1.0]);
    other.longitudes = vec![0.0, 2.0];
    let result = GridSeries::new(vec![(time(1, 0), grid_1x2([1.0, 1.0])), (time(2, 0), other)]);
    assert!(matches!(result, Err(GridError::IncompatibleGrids)));
}

#[test]
fn test_resample_ignores_nans() {
    let series = GridSeries::new(vec![
        (time(1, 0), grid_1x2([1.0, f64::NAN])),
        (time(1, 12), grid_1x2([3.0, f64::NAN])),
        (time(2, 6), grid_1x2([f64::NAN, 4.0])),
    ])
    .unwrap();

    let daily = series.resample(Frequency::Daily);
    assert_eq!(daily.times, vec![time(1, 0), time(2, 0)]);
    assert_abs_diff_eq!(daily.values[(0, 0, 0)], 2.0);
    assert!(daily.values[(0, 0, 1)].is_nan());
    assert!(daily.values[(1, 0, 0)].is_nan());
    assert_abs_diff_eq!(daily.values[(1, 0, 1)], 4.0);

    let monthly = series.resample(Frequency::Monthly);
    assert_eq!(monthly.times, vec![time(1, 0)]);
    assert_abs_diff_eq!(monthly.values[(0, 0, 0)], 2.0);
    assert_abs_diff_eq!(monthly.values[(0, 0, 1)], 4.0);

    let hourly = series.resample(Frequency::Hourly);
    assert_eq!(hourly.times, series.times);
    assert_abs_diff_eq!(hourly.values[(1, 0, 0)], 3.0);
}

#[test]
fn test_grid_gome_files() {
    let dir = TempDir::new().unwrap();
    let lats = [0.0, 0.0, 1.0];
    let lons = [0.0, 1.0, 1.0];
    let file1 = write_gome_file(
        dir.path(),
        "GOME_O3-NO2_L2_20190101013000_A.HDF5",
        &lats,
        &lons,
        &[("NO2", vec![1.0, 3.0, -1.0])],
    );
    let file2 = write_gome_file(
        dir.path(),
        "GOME_O3-NO2_L2_20190101150000_B.HDF5",
        &lats,
        &lons,
        &[("NO2", vec![3.0, 5.0, 7.0])],
    );
    let bad_name = write_gome_file(
        dir.path(),
        "GOME.HDF5",
        &lats,
        &lons,
        &[("NO2", vec![3.0, 5.0, 7.0])],
    );
    let no_no2 = write_gome_file(
        dir.path(),
        "GOME_O3_L2_20190102000000_C.HDF5",
        &lats,
        &lons,
        &[("O3", vec![3.0, 5.0, 7.0])],
    );

    let results = grid_gome_files(
        &[file1, bad_name, file2, no_no2],
        GomeSpecies::NO2,
        &small_spec(2.0),
        &InverseDistanceGridder::default(),
        false,
    );
    assert_eq!(results.len(), 4);
    assert!(matches!(&results[1], Err(GridError::File { .. })));
    assert!(matches!(&results[3], Err(GridError::File { .. })));

    let grids: Vec<_> = results.into_iter().filter_map(Result::ok).collect();
    assert_eq!(grids.len(), 2);
    let (t1, g1) = &grids[0];
    assert_eq!(
        *t1,
        NaiveDate::from_ymd_opt(2019, 1, 1)
            .unwrap()
            .and_hms_opt(1, 30, 0)
            .unwrap()
    );
    // The negative value was dropped.
    assert_abs_diff_eq!(g1.values[(0, 0)], 1.0);
    assert_abs_diff_eq!(g1.values[(2, 2)], 3.0);

    let daily = GridSeries::new(grids).unwrap().resample(Frequency::Daily);
    assert_eq!(daily.times.len(), 1);
    assert_abs_diff_eq!(daily.values[(0, 0, 0)], 2.0);
    assert_abs_diff_eq!(daily.values[(0, 0, 2)], 4.0);
    assert_abs_diff_eq!(daily.values[(0, 2, 2)], 5.0);
}
