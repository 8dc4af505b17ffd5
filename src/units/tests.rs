// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;

use super::*;

#[test]
fn test_vmr_factor() {
    assert_abs_diff_eq!(vmr_factor(10.0, 250.0), 3.45e-18, epsilon = 1e-30);
}

#[test]
fn test_number_density_to_vmr() {
    let mut values = array![[1.0, f64::NAN], [2.0, 0.0]];
    let pressure = array![[10.0, 10.0], [100.0, 1.0]];
    let temperature = array![[250.0, 250.0], [200.0, 300.0]];
    let result = number_density_to_vmr(&mut values, &pressure, &temperature);
    assert!(result.is_ok(), "{:?}", result.unwrap_err());

    assert_abs_diff_eq!(values[(0, 0)], 3.45e-18, epsilon = 1e-30);
    assert!(values[(0, 1)].is_nan());
    assert_abs_diff_eq!(values[(1, 0)], 2.0 * 1.38e-19 * 2.0, epsilon = 1e-30);
    assert_abs_diff_eq!(values[(1, 1)], 0.0);
}

#[test]
fn test_number_density_to_vmr_shape_mismatch() {
    let mut values = Array2::<f64>::ones((2, 3));
    let pressure = Array2::<f64>::ones((2, 3));
    let temperature = Array2::<f64>::ones((3, 2));
    let result = number_density_to_vmr(&mut values, &pressure, &temperature);
    assert!(matches!(result, Err(UnitsError::ShapeMismatch { .. })));
    // Nothing was touched.
    assert_eq!(values, Array2::<f64>::ones((2, 3)));
}

#[test]
fn test_number_density_to_vmr_1d() {
    let mut values = array![1.0, 2.0, 4.0];
    let pressure = array![10.0, 20.0, 40.0];
    let temperature = array![250.0, 250.0, 250.0];
    number_density_to_vmr(&mut values, &pressure, &temperature).unwrap();
    assert_abs_diff_eq!(values, array![3.45e-18, 3.45e-18, 3.45e-18], epsilon = 1e-30);
}
