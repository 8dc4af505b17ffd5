// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::io::{Cursor, Write};

use approx::assert_abs_diff_eq;
use indoc::indoc;
use tempfile::NamedTempFile;

use super::*;

const HEADER: &str = indoc! {"
    ; MLS v4.2 ClO bias correction
    ; line 2
    ; line 3
    ; line 4
    ; line 5
    ; line 6
    ; line 7
    ; line 8
    ; line 9
    ; line 10
    ; line 11
    ; line 12
    ; line 13
"};

fn read_str(body: &str) -> Result<BiasTable, BiasTableError> {
    let contents = format!("{HEADER}{body}");
    BiasTable::read(&mut Cursor::new(contents), Path::new("test.txt"))
}

#[test]
fn test_read_bias_table_with_labels() {
    let result = read_str(indoc! {"
                 146.78    100.00     68.13
        -20.0    0.10      0.20       0.30
          0.0    0.40      0.50       0.60
         20.0    0.70      0.80       0.90
    "});
    assert!(result.is_ok(), "{:?}", result.unwrap_err());
    let table = result.unwrap();
    assert_eq!(table.latitudes(), &[-20.0, 0.0, 20.0]);
    assert_eq!(table.channel(0), &[0.1, 0.4, 0.7]);
    assert_eq!(table.channel(1), &[0.2, 0.5, 0.8]);
    assert_eq!(table.channel(2), &[0.3, 0.6, 0.9]);
}

#[test]
fn test_read_bias_table_with_text_labels() {
    let result = read_str(indoc! {"
        Lat  p146  p100  p68
        -10.0  1.0  2.0  3.0
         10.0  4.0  5.0  6.0
    "});
    assert!(result.is_ok(), "{:?}", result.unwrap_err());
    assert_eq!(result.unwrap().latitudes(), &[-10.0, 10.0]);
}

#[test]
fn test_read_bias_table_without_labels() {
    let result = read_str(indoc! {"
        -10.0  1.0  2.0  3.0
         10.0  4.0  5.0  6.0
    "});
    assert!(result.is_ok(), "{:?}", result.unwrap_err());
    let table = result.unwrap();
    assert_eq!(table.latitudes(), &[-10.0, 10.0]);
    assert_eq!(table.channel(2), &[3.0, 6.0]);
}

#[test]
fn test_missing_values_filled_forward_then_backward() {
    let table = read_str(indoc! {"
        146.78 100.00 68.13
        -30.0  -999.99  1.0     -999.99
        -10.0  -999.99  -999.99  2.0
         10.0   5.0     -999.99 -999.99
         30.0   6.0      7.0    -999.99
    "})
    .unwrap();
    // Leading gaps are back-filled, everything else is forward-filled.
    assert_eq!(table.channel(0), &[5.0, 5.0, 5.0, 6.0]);
    assert_eq!(table.channel(1), &[1.0, 1.0, 1.0, 7.0]);
    assert_eq!(table.channel(2), &[2.0, 2.0, 2.0, 2.0]);
}

#[test]
fn test_rows_are_sorted_by_latitude() {
    let table = read_str(indoc! {"
         10.0  4.0  5.0  6.0
        -10.0  1.0  2.0  3.0
    "})
    .unwrap();
    assert_eq!(table.latitudes(), &[-10.0, 10.0]);
    assert_eq!(table.channel(0), &[1.0, 4.0]);
}

#[test]
fn test_bad_column_count() {
    let result = read_str(indoc! {"
        146.78 100.00 68.13
        -10.0  1.0  2.0  3.0
         10.0  4.0  5.0
    "});
    assert!(matches!(
        result,
        Err(BiasTableError::BadColumnCount {
            count: 2,
            line_num: 16,
            ..
        })
    ));

    let result = read_str(indoc! {"
        -10.0  1.0  2.0  3.0  4.0
         10.0  4.0  5.0  6.0  7.0
    "});
    assert!(matches!(
        result,
        Err(BiasTableError::BadColumnCount { count: 4, .. })
    ));
}

#[test]
fn test_non_numeric_data_is_an_error() {
    let result = read_str(indoc! {"
        146.78 100.00 68.13
        -10.0  1.0  2.0  3.0
         10.0  4.0  five  6.0
    "});
    match result {
        Err(BiasTableError::ParseFloat { text, line_num, .. }) => {
            assert_eq!(text, "five");
            assert_eq!(line_num, 16);
        }
        r => panic!("Unexpected result: {r:?}"),
    }
}

#[test]
fn test_too_short_and_too_few_rows() {
    let result = BiasTable::read(
        &mut Cursor::new("only\na\nfew\nlines\n"),
        Path::new("test.txt"),
    );
    assert!(matches!(result, Err(BiasTableError::TooShort { num_lines: 4, .. })));

    let result = read_str("0.0 1.0 2.0 3.0\n");
    assert!(matches!(result, Err(BiasTableError::TooFewRows { count: 1, .. })));

    let result = read_str("146.78 100.00 68.13\n");
    assert!(matches!(result, Err(BiasTableError::TooFewRows { count: 0, .. })));
}

#[test]
fn test_duplicate_latitude() {
    let result = read_str(indoc! {"
        10.0  1.0  2.0  3.0
        10.0  4.0  5.0  6.0
    "});
    assert!(matches!(
        result,
        Err(BiasTableError::DuplicateLatitude { .. })
    ));
}

#[test]
fn test_all_missing_column() {
    let result = read_str(indoc! {"
        -10.0  1.0  -999.99  3.0
         10.0  4.0  -999.99  6.0
    "});
    assert!(matches!(
        result,
        Err(BiasTableError::AllMissing { channel: 2, .. })
    ));
}

#[test]
fn test_interpolation_within_domain() {
    let table = read_str(indoc! {"
        -20.0  0.0  10.0  -1.0
          0.0  1.0  20.0  -2.0
         20.0  3.0  40.0  -4.0
    "})
    .unwrap();
    let e = BiasExtrapolation::Error;
    // Exactly on nodes.
    assert_eq!(table.interpolate(0, -20.0, e).unwrap(), 0.0);
    assert_eq!(table.interpolate(0, 0.0, e).unwrap(), 1.0);
    assert_eq!(table.interpolate(0, 20.0, e).unwrap(), 3.0);
    // Between nodes.
    assert_abs_diff_eq!(table.interpolate(0, -10.0, e).unwrap(), 0.5);
    assert_abs_diff_eq!(table.interpolate(1, 10.0, e).unwrap(), 30.0);
    assert_abs_diff_eq!(table.interpolate(2, 15.0, e).unwrap(), -3.5);
    // NaN in, NaN out.
    assert!(table.interpolate(0, f64::NAN, e).unwrap().is_nan());
}

#[test]
fn test_extrapolation_policies() {
    let table = read_str(indoc! {"
        -20.0  0.0  0.0  0.0
          0.0  1.0  1.0  1.0
         20.0  3.0  3.0  3.0
    "})
    .unwrap();

    let result = table.interpolate(0, 30.0, BiasExtrapolation::Error);
    match result {
        Err(BiasTableError::OutOfDomain { latitude, min, max }) => {
            assert_abs_diff_eq!(latitude, 30.0);
            assert_abs_diff_eq!(min, -20.0);
            assert_abs_diff_eq!(max, 20.0);
        }
        r => panic!("Unexpected result: {r:?}"),
    }
    assert!(table
        .interpolate(0, -20.5, BiasExtrapolation::Error)
        .is_err());

    assert_abs_diff_eq!(
        table.interpolate(0, 30.0, BiasExtrapolation::Clamp).unwrap(),
        3.0
    );
    assert_abs_diff_eq!(
        table
            .interpolate(0, -90.0, BiasExtrapolation::Clamp)
            .unwrap(),
        0.0
    );

    // The last segment has a slope of 0.1 per degree.
    assert_abs_diff_eq!(
        table
            .interpolate(0, 30.0, BiasExtrapolation::Linear)
            .unwrap(),
        4.0
    );
    // The first segment has a slope of 0.05 per degree.
    assert_abs_diff_eq!(
        table
            .interpolate(0, -40.0, BiasExtrapolation::Linear)
            .unwrap(),
        -1.0
    );
}

#[test]
fn test_interpolate_all() {
    let table = read_str(indoc! {"
        -10.0  1.0  2.0  3.0
         10.0  3.0  4.0  5.0
    "})
    .unwrap();
    let biases = table
        .interpolate_all(array![-10.0, 0.0, 10.0].view(), BiasExtrapolation::Error)
        .unwrap();
    assert_eq!(biases.dim(), (3, 3));
    assert_abs_diff_eq!(
        biases,
        array![[1.0, 2.0, 3.0], [2.0, 3.0, 4.0], [3.0, 4.0, 5.0]]
    );

    let result = table.interpolate_all(array![0.0, 11.0].view(), BiasExtrapolation::Error);
    assert!(result.is_err());
}

#[test]
fn test_read_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        "{HEADER}{}",
        indoc! {"
            146.78 100.00 68.13
            -10.0  1.0  2.0  3.0
             10.0  4.0  5.0  6.0
        "}
    )
    .unwrap();
    file.flush().unwrap();

    let result = BiasTable::read_file(file.path());
    assert!(result.is_ok(), "{:?}", result.unwrap_err());
    assert_eq!(result.unwrap().channel(1), &[2.0, 5.0]);

    let result = BiasTable::read_file("/does/not/exist.txt");
    assert!(matches!(result, Err(BiasTableError::IO(_))));
}

#[test]
fn test_extrapolation_from_str() {
    use std::str::FromStr;

    assert_eq!(
        BiasExtrapolation::from_str("clamp").unwrap(),
        BiasExtrapolation::Clamp
    );
    assert_eq!(
        BiasExtrapolation::from_str("linear").unwrap(),
        BiasExtrapolation::Linear
    );
    assert_eq!(
        BiasExtrapolation::from_str("error").unwrap(),
        BiasExtrapolation::Error
    );
    assert!(BiasExtrapolation::from_str("nearest").is_err());
    assert_eq!(BiasExtrapolation::default(), BiasExtrapolation::Error);
}
