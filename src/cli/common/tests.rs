// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use ndarray::prelude::*;
use tempfile::TempDir;

use super::*;

#[test]
fn test_process_files_skips_failures() {
    let files: Vec<PathBuf> = ["a.h5", "b.h5", "c.h5"].iter().map(PathBuf::from).collect();
    let result = process_files(&files, "Testing", false, |f: &Path| {
        if f == Path::new("b.h5") {
            Err("bad file")
        } else {
            Ok(f.to_path_buf())
        }
    });
    assert!(result.is_ok(), "{:?}", result.unwrap_err());
    assert_eq!(result.unwrap(), vec![PathBuf::from("a.h5"), PathBuf::from("c.h5")]);
}

#[test]
fn test_process_files_fails_when_everything_fails() {
    let files: Vec<PathBuf> = ["a.h5", "b.h5"].iter().map(PathBuf::from).collect();
    let result = process_files(&files, "Testing", false, |_: &Path| -> Result<(), _> {
        Err("bad file")
    });
    assert!(result.is_err());
    let err = result.unwrap_err();
    assert!(matches!(err, SatprofileError::InputFiles(_)));
    assert!(err.to_string().contains("None of the 2 input files"));
}

#[test]
fn test_no_input_files_is_an_error() {
    assert!(matches!(
        get_input_files(None),
        Err(SatprofileError::InputFiles(_))
    ));
    assert!(matches!(
        get_input_files(Some(vec![])),
        Err(SatprofileError::InputFiles(_))
    ));
}

#[test]
fn test_get_input_files_expands_globs() {
    let dir = TempDir::new().unwrap();
    for name in ["x1.he5", "x2.he5", "y.txt"] {
        std::fs::write(dir.path().join(name), "").unwrap();
    }
    let pattern = format!("{}/x*.he5", dir.path().display());
    let result = get_input_files(Some(vec![pattern]));
    assert!(result.is_ok(), "{:?}", result.unwrap_err());
    assert_eq!(
        result.unwrap(),
        vec![dir.path().join("x1.he5"), dir.path().join("x2.he5")]
    );

    let pattern = format!("{}/z*.he5", dir.path().display());
    assert!(get_input_files(Some(vec![pattern])).is_err());
}

#[test]
fn test_nan_is_written_as_null() {
    let a = array![[1.0, f64::NAN], [f64::NAN, -2.5]];
    let json = to_json_2d(a.view());
    assert_eq!(json, vec![vec![Some(1.0), None], vec![None, Some(-2.5)]]);
    assert_eq!(
        serde_json::to_string(&json).unwrap(),
        "[[1.0,null],[null,-2.5]]"
    );
}

#[test]
fn test_write_json() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("out.json");
    write_json(&file, &to_json_1d(array![0.5, f64::NAN].view())).unwrap();
    let contents = std::fs::read_to_string(&file).unwrap();
    let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(value, serde_json::json!([0.5, null]));
}
