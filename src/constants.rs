// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision. Data read from files are promoted to
`f64` before any screening or conversion is done.
 */

/// The fill value used by MLS level 2 files for missing data.
pub const MLS_FILL_VALUE: f64 = -999.99;

/// The fill value used by OMPS limb profile files for missing data.
pub const OMPS_FILL_VALUE: f64 = -999.0;

/// The missing-value sentinel in the MLS ClO bias correction file.
pub const BIAS_FILL_VALUE: f64 = -999.99;

/// The relative tolerance used when comparing a value against a fill value.
/// Fill values stored as single precision don't compare exactly against their
/// double-precision counterparts.
pub(crate) const FILL_RELATIVE_TOLERANCE: f64 = 1e-6;

/// The number of header lines at the top of the MLS ClO bias correction file.
pub const BIAS_FILE_HEADER_LINES: usize = 13;

/// The pressures of the three channels in the ClO bias correction file \[hPa\].
pub const CLO_BIAS_PRESSURES: [f64; 3] = [146.78, 100.00, 68.13];

/// The MLS ClO vertical level indices that are bias corrected. These
/// correspond to [`CLO_BIAS_PRESSURES`].
pub const CLO_BIAS_LEVELS: [usize; 3] = [5, 6, 7];

/// The Boltzmann constant in the units of OMPS ancillary pressure and
/// temperature data (hPa cm^3 K^-1). Multiplying a number density \[cm^-3\] by
/// `BOLTZMANN_HPA_CM3 * T / P` gives a volume mixing ratio.
pub const BOLTZMANN_HPA_CM3: f64 = 1.38e-19;

/// GOME2 default gridding region (west, east, south, north) \[degrees\].
pub const DEFAULT_GRID_REGION: (f64, f64, f64, f64) = (-180.0, 179.8, -89.75, 89.75);

/// GOME2 default grid spacing \[degrees\].
pub const DEFAULT_GRID_SPACING: f64 = 0.1;

/// Grid nodes further than this many grid spacings from any observation are
/// masked.
pub const DEFAULT_MAX_DISTANCE_FACTOR: f64 = 6.0;

/// ClO values need at least this many vertical levels for the bias correction.
pub const CLO_MIN_LEVELS: usize = 8;

/// ClO profiles with a larger solar zenith angle are not sunlit \[degrees\].
pub const CLO_MAX_SOLAR_ZENITH_ANGLE: f64 = 89.0;

/// The local solar time window (inclusive) of "midday" ClO profiles \[hours\].
pub const CLO_MIDDAY_HOURS: (f64, f64) = (10.0, 16.0);
