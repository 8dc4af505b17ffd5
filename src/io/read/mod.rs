// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to read MLS, OMPS and GOME2 products from HDF5 files.
//!
//! Every read opens the file, copies the requested fields into memory and
//! closes the file again before returning; the HDF5 handle is dropped on every
//! code path, including errors.

mod error;
mod gome;
mod mls;
mod omps;

pub use error::ReadError;
pub use gome::{acquisition_time, GomeColumn, GomeColumns};
pub use mls::{MlsData, MlsGeolocation, MlsProfile};
pub use omps::{OmpsAux, OmpsData, OmpsFlags, OmpsOther, OmpsProfile};

use std::path::{Path, PathBuf};

use hdf5::H5Type;
use log::trace;
use ndarray::prelude::*;

use crate::misc::is_fill;

/// An open HDF5 file, remembering its path for error messages.
pub(crate) struct H5Source<'a> {
    path: &'a Path,
    handle: hdf5::File,
}

impl<'a> H5Source<'a> {
    pub(crate) fn open(path: &'a Path) -> Result<H5Source<'a>, ReadError> {
        if !path.exists() {
            return Err(ReadError::DoesNotExist(path.to_path_buf()));
        }
        trace!("Opening '{}'", path.display());
        let handle = hdf5::File::open(path).map_err(|err| ReadError::Hdf5 {
            file: path.to_path_buf(),
            err,
        })?;
        Ok(H5Source { path, handle })
    }

    /// Get a group (possibly nested, e.g. "HDFEOS/SWATHS/O3") from the file.
    pub(crate) fn group(&self, name: &str) -> Result<H5Group<'a>, ReadError> {
        let group = self.handle.group(name).map_err(|err| {
            if self.handle.link_exists(name) {
                ReadError::Hdf5 {
                    file: self.path.to_path_buf(),
                    err,
                }
            } else {
                ReadError::MissingField {
                    file: self.path.to_path_buf(),
                    field: name.to_string(),
                }
            }
        })?;
        Ok(H5Group {
            path: self.path,
            name: name.to_string(),
            group,
        })
    }
}

/// A group inside an [`H5Source`].
pub(crate) struct H5Group<'a> {
    path: &'a Path,
    name: String,
    group: hdf5::Group,
}

impl H5Group<'_> {
    fn field_path(&self, field: &str) -> String {
        format!("{}/{}", self.name, field)
    }

    fn file(&self) -> PathBuf {
        self.path.to_path_buf()
    }

    fn dataset(&self, field: &str) -> Result<hdf5::Dataset, ReadError> {
        self.group.dataset(field).map_err(|err| {
            if self.group.link_exists(field) {
                ReadError::Hdf5 {
                    file: self.file(),
                    err,
                }
            } else {
                ReadError::MissingField {
                    file: self.file(),
                    field: self.field_path(field),
                }
            }
        })
    }

    /// The number of elements in a field.
    pub(crate) fn len(&self, field: &str) -> Result<usize, ReadError> {
        Ok(self.dataset(field)?.size())
    }

    /// Read a field of any dimensionality.
    pub(crate) fn read_dyn<T: H5Type>(&self, field: &str) -> Result<ArrayD<T>, ReadError> {
        let dataset = self.dataset(field)?;
        let shape = dataset.shape();
        let data: Vec<T> = dataset.read_raw().map_err(|err| ReadError::Hdf5 {
            file: self.file(),
            err,
        })?;
        trace!("Read '{}' with shape {:?}", self.field_path(field), shape);
        ArrayD::from_shape_vec(IxDyn(&shape), data).map_err(|_| ReadError::BadShape {
            file: self.file(),
            field: self.field_path(field),
            shape,
            expected: "as many elements as the dataset's shape".to_string(),
        })
    }

    pub(crate) fn read_1d<T: H5Type>(&self, field: &str) -> Result<Array1<T>, ReadError> {
        let array = self.read_dyn(field)?;
        let shape = array.shape().to_vec();
        array
            .into_dimensionality::<Ix1>()
            .map_err(|_| ReadError::BadShape {
                file: self.file(),
                field: self.field_path(field),
                shape,
                expected: "1 dimension".to_string(),
            })
    }

    pub(crate) fn read_2d<T: H5Type>(&self, field: &str) -> Result<Array2<T>, ReadError> {
        let array = self.read_dyn(field)?;
        let shape = array.shape().to_vec();
        array
            .into_dimensionality::<Ix2>()
            .map_err(|_| ReadError::BadShape {
                file: self.file(),
                field: self.field_path(field),
                shape,
                expected: "2 dimensions".to_string(),
            })
    }

    /// Return an error if `array` doesn't have the expected shape.
    pub(crate) fn check_shape<T, D: Dimension>(
        &self,
        field: &str,
        array: &Array<T, D>,
        expected: &[usize],
    ) -> Result<(), ReadError> {
        if array.shape() == expected {
            Ok(())
        } else {
            Err(ReadError::BadShape {
                file: self.file(),
                field: self.field_path(field),
                shape: array.shape().to_vec(),
                expected: format!("{expected:?}"),
            })
        }
    }

    /// Return an error if no values in `array` are finite, i.e. they are all
    /// sentinels.
    pub(crate) fn check_not_all_fill<D: Dimension>(
        &self,
        field: &str,
        array: &Array<f64, D>,
    ) -> Result<(), ReadError> {
        if array.iter().any(|v| v.is_finite()) {
            Ok(())
        } else {
            Err(ReadError::AllFill {
                file: self.file(),
                field: self.field_path(field),
            })
        }
    }
}

/// Replace invalid measurements with NaN. A value is invalid if its precision
/// is not positive or if it is the fill value. Fill-valued precisions also
/// become NaN. The precision test happens before any precision is replaced, so
/// a fill-valued precision always invalidates its value.
pub(crate) fn clean_sentinels<D: Dimension>(
    value: &mut Array<f64, D>,
    precision: &mut Array<f64, D>,
    fill: f64,
) {
    ndarray::Zip::from(value)
        .and(precision)
        .for_each(|v, p| {
            if *p <= 0.0 || is_fill(*v, fill) {
                *v = f64::NAN;
            }
            if is_fill(*p, fill) {
                *p = f64::NAN;
            }
        });
}

/// Replace fill values with NaN.
pub(crate) fn replace_fill<D: Dimension>(array: &mut Array<f64, D>, fill: f64) {
    array.mapv_inplace(|v| if is_fill(v, fill) { f64::NAN } else { v });
}
