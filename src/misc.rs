// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Miscellaneous things.

use crate::constants::FILL_RELATIVE_TOLERANCE;

/// Does this value equal the supplied fill value? Fill values written as single
/// precision floats (e.g. -999.99f32) aren't exactly representable in double
/// precision, so the comparison is done with a small relative tolerance.
#[inline]
pub(crate) fn is_fill(value: f64, fill: f64) -> bool {
    (value - fill).abs() <= FILL_RELATIVE_TOLERANCE * fill.abs().max(1.0)
}

/// The mean of the finite values yielded by the iterator. If there are none,
/// NaN is returned.
pub(crate) fn nan_mean<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let (sum, count) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_is_fill_single_precision() {
        assert!(is_fill(-999.99_f32 as f64, -999.99));
        assert!(is_fill(-999.0, -999.0));
        assert!(!is_fill(-999.0, -999.99));
        assert!(!is_fill(f64::NAN, -999.0));
        assert!(!is_fill(0.0, -999.0));
    }

    #[test]
    fn test_nan_mean() {
        assert_abs_diff_eq!(nan_mean([1.0, f64::NAN, 3.0]), 2.0);
        assert!(nan_mean([f64::NAN, f64::NAN]).is_nan());
        assert!(nan_mean(std::iter::empty()).is_nan());
    }
}
