// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to read the MLS ClO bias correction table and interpolate it over
//! latitude.
//!
//! The file is plain text. The first 13 lines are a free-form header. Then
//! there may be a line of column labels (the channel pressures), followed by
//! one row per latitude bin:
//!
//! ```text
//!          146.78    100.00     68.13
//! -75.0    0.0120    0.0080   -999.99
//! -65.0    0.0110    0.0070    0.0030
//! ```
//!
//! i.e. a latitude followed by the bias for each of the three channels. A
//! value of -999.99 means "missing"; missing values are filled with the
//! closest preceding valid value in the same column, and any remaining leading
//! gaps are then filled with the closest following valid value.

mod error;
#[cfg(test)]
mod tests;

pub use error::BiasTableError;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, trace};
use ndarray::prelude::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};
use vec1::Vec1;

use crate::constants::{BIAS_FILE_HEADER_LINES, BIAS_FILL_VALUE, CLO_BIAS_PRESSURES};
use crate::misc::is_fill;

/// The number of bias channels in a bias table.
pub const NUM_BIAS_CHANNELS: usize = 3;

/// What to do when a latitude falls outside of a bias table's domain.
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
pub enum BiasExtrapolation {
    /// Refuse to extrapolate; an error is returned.
    #[default]
    Error,

    /// Use the value at the nearest edge of the table.
    Clamp,

    /// Extend the first or last table segment linearly.
    Linear,
}

/// Three bias series over latitude. Latitudes are strictly increasing and no
/// bias values are missing.
#[derive(Debug, Clone)]
pub struct BiasTable {
    latitudes: Vec1<f64>,

    /// Each column has the same length as `latitudes`.
    columns: [Vec<f64>; NUM_BIAS_CHANNELS],
}

impl BiasTable {
    /// Read a bias table from a file. The file is re-read on every call; no
    /// caching is done.
    pub fn read_file<P: AsRef<Path>>(file: P) -> Result<BiasTable, BiasTableError> {
        let file = file.as_ref();
        debug!("Reading bias table '{}'", file.display());
        let mut reader = BufReader::new(File::open(file)?);
        Self::read(&mut reader, file)
    }

    fn read<T: BufRead>(reader: &mut T, file: &Path) -> Result<BiasTable, BiasTableError> {
        let mut rows: Vec<(f64, [Option<f64>; NUM_BIAS_CHANNELS])> = vec![];
        let mut num_lines = 0;
        let mut seen_labels = false;

        for (i_line, line) in reader.lines().enumerate() {
            let line = line?;
            num_lines += 1;
            if i_line < BIAS_FILE_HEADER_LINES {
                continue;
            }
            let line_num = i_line + 1;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.is_empty() {
                continue;
            }

            let floats: Result<Vec<f64>, &str> = tokens
                .iter()
                .map(|t| t.parse::<f64>().map_err(|_| *t))
                .collect();
            let floats = match floats {
                Ok(f) => f,
                // Only the first line after the header may be column labels.
                Err(_) if !seen_labels && rows.is_empty() => {
                    trace!("Treating line {line_num} as column labels: {line}");
                    seen_labels = true;
                    continue;
                }
                Err(text) => {
                    return Err(BiasTableError::ParseFloat {
                        file: file.to_path_buf(),
                        text: text.to_string(),
                        line_num,
                    })
                }
            };
            // A purely numeric label line (e.g. "146.78 100.00 68.13") has
            // one fewer column than a data line.
            if !seen_labels && rows.is_empty() && floats.len() == NUM_BIAS_CHANNELS {
                trace!("Treating line {line_num} as column labels: {line}");
                seen_labels = true;
                continue;
            }
            if floats.len() != NUM_BIAS_CHANNELS + 1 {
                return Err(BiasTableError::BadColumnCount {
                    file: file.to_path_buf(),
                    count: floats.len().saturating_sub(1),
                    line_num,
                });
            }

            let mut values = [None; NUM_BIAS_CHANNELS];
            for (value, &f) in values.iter_mut().zip(&floats[1..]) {
                if !is_fill(f, BIAS_FILL_VALUE) {
                    *value = Some(f);
                }
            }
            rows.push((floats[0], values));
        }

        if num_lines <= BIAS_FILE_HEADER_LINES {
            return Err(BiasTableError::TooShort {
                file: file.to_path_buf(),
                num_lines,
                expected: BIAS_FILE_HEADER_LINES,
            });
        }
        rows.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));
        for pair in rows.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(BiasTableError::DuplicateLatitude {
                    file: file.to_path_buf(),
                    latitude: pair[0].0,
                });
            }
        }

        let latitudes = Vec1::try_from_vec(rows.iter().map(|(lat, _)| *lat).collect())
            .map_err(|_| BiasTableError::TooFewRows {
                file: file.to_path_buf(),
                count: 0,
            })?;
        if latitudes.len() < 2 {
            return Err(BiasTableError::TooFewRows {
                file: file.to_path_buf(),
                count: latitudes.len(),
            });
        }
        let mut columns: [Vec<f64>; NUM_BIAS_CHANNELS] = Default::default();
        for (i_chan, column) in columns.iter_mut().enumerate() {
            let raw: Vec<Option<f64>> = rows.iter().map(|(_, v)| v[i_chan]).collect();
            *column = fill_forward_then_backward(&raw).ok_or_else(|| {
                BiasTableError::AllMissing {
                    file: file.to_path_buf(),
                    channel: i_chan + 1,
                    pressure: CLO_BIAS_PRESSURES[i_chan],
                }
            })?;
        }

        debug!(
            "Bias table has {} latitude rows ({} to {})",
            latitudes.len(),
            latitudes.first(),
            latitudes.last()
        );
        Ok(BiasTable { latitudes, columns })
    }

    /// The latitudes of the table rows, in increasing order \[degrees\].
    pub fn latitudes(&self) -> &[f64] {
        self.latitudes.as_slice()
    }

    /// The (filled) bias values of a channel (0, 1 or 2).
    pub fn channel(&self, channel: usize) -> &[f64] {
        &self.columns[channel]
    }

    /// Linearly interpolate a channel's bias at a latitude. A NaN latitude
    /// gives a NaN bias.
    pub fn interpolate(
        &self,
        channel: usize,
        latitude: f64,
        extrapolation: BiasExtrapolation,
    ) -> Result<f64, BiasTableError> {
        interp1d(
            self.latitudes.as_slice(),
            &self.columns[channel],
            latitude,
            extrapolation,
        )
    }

    /// Interpolate all channels at each of the supplied latitudes. The
    /// returned array has shape (num. latitudes, 3).
    pub fn interpolate_all(
        &self,
        latitudes: ArrayView1<f64>,
        extrapolation: BiasExtrapolation,
    ) -> Result<Array2<f64>, BiasTableError> {
        let mut out = Array2::zeros((latitudes.len(), NUM_BIAS_CHANNELS));
        for (mut row, &lat) in out.outer_iter_mut().zip(latitudes.iter()) {
            for (i_chan, bias) in row.iter_mut().enumerate() {
                *bias = self.interpolate(i_chan, lat, extrapolation)?;
            }
        }
        Ok(out)
    }
}

/// Fill missing values with the nearest preceding valid value, then fill any
/// leading gap with the first valid value. `None` is returned if there are no
/// valid values at all.
fn fill_forward_then_backward(values: &[Option<f64>]) -> Option<Vec<f64>> {
    let first_valid = values.iter().flatten().next().copied()?;
    let mut last = None;
    let filled = values
        .iter()
        .map(|v| {
            if let Some(v) = v {
                last = Some(*v);
            }
            last.unwrap_or(first_valid)
        })
        .collect();
    Some(filled)
}

/// Piecewise-linear interpolation of `ys` over strictly increasing `xs`.
fn interp1d(
    xs: &[f64],
    ys: &[f64],
    x: f64,
    extrapolation: BiasExtrapolation,
) -> Result<f64, BiasTableError> {
    if x.is_nan() {
        return Ok(f64::NAN);
    }
    let n = xs.len();
    let (min, max) = (xs[0], xs[n - 1]);

    let segment = if x < min || x > max {
        match extrapolation {
            BiasExtrapolation::Error => {
                return Err(BiasTableError::OutOfDomain {
                    latitude: x,
                    min,
                    max,
                })
            }
            BiasExtrapolation::Clamp => return Ok(if x < min { ys[0] } else { ys[n - 1] }),
            BiasExtrapolation::Linear => {
                if x < min {
                    0
                } else {
                    n - 2
                }
            }
        }
    } else {
        // Index of the first node >= x.
        let i = xs.partition_point(|&node| node < x);
        if i < n && xs[i] == x {
            return Ok(ys[i]);
        }
        i - 1
    };

    let (x0, x1) = (xs[segment], xs[segment + 1]);
    let (y0, y1) = (ys[segment], ys[segment + 1]);
    Ok(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
}
