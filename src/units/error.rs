// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UnitsError {
    #[error("Can't convert units: values have shape {values:?}, pressures have shape {pressure:?} and temperatures have shape {temperature:?}")]
    ShapeMismatch {
        values: Vec<usize>,
        pressure: Vec<usize>,
        temperature: Vec<usize>,
    },
}
