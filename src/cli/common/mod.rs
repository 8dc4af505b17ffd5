// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Things shared by the `satprofile` subcommands: argument files, input file
//! expansion, per-file processing and JSON output.

#[cfg(test)]
mod tests;

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use itertools::Itertools;
use log::{debug, info, warn};
use ndarray::prelude::*;
use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use super::SatprofileError;
use crate::io::expand_globs;

lazy_static::lazy_static! {
    pub(super) static ref ARG_FILE_TYPES_COMMA_SEPARATED: String = ArgFileTypes::iter().join(", ");

    pub(super) static ref ARG_FILE_HELP: String =
        format!("All arguments may be specified in a file. Any CLI arguments override arguments set in the file. Supported formats: {}", *ARG_FILE_TYPES_COMMA_SEPARATED);
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub(super) enum ArgFileTypes {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

macro_rules! unpack_arg_file {
    ($arg_file:expr) => ({
        use std::{fs::File, io::Read, str::FromStr};

        use crate::cli::common::{ArgFileTypes, ARG_FILE_TYPES_COMMA_SEPARATED};

        debug!("Attempting to parse argument file {}", $arg_file.display());

        let mut contents = String::new();
        let arg_file_type = $arg_file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ArgFileTypes::from_str(&e).ok());

        match arg_file_type {
            Some(ArgFileTypes::Toml) => {
                debug!("Parsing toml file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match toml::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(SatprofileError::ArgFile(format!(
                            "Couldn't decode toml structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }
            Some(ArgFileTypes::Json) => {
                debug!("Parsing json file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match serde_json::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(SatprofileError::ArgFile(format!(
                            "Couldn't decode json structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }

            _ => {
                return Err(SatprofileError::ArgFile(format!(
                    "Argument file '{:?}' doesn't have a recognised file extension! Valid extensions are: {}", $arg_file, *ARG_FILE_TYPES_COMMA_SEPARATED)
                ))
            }
        }
    });
}

#[derive(Error, Debug)]
pub(super) enum InputFilesError {
    #[error("No input files were specified")]
    NoInputs,

    #[error("None of the {num_files} input files could be processed")]
    AllFailed { num_files: usize },
}

/// Turn the user's file paths and glob patterns into files.
pub(super) fn get_input_files(files: Option<Vec<String>>) -> Result<Vec<PathBuf>, SatprofileError> {
    let patterns = match files {
        Some(f) if !f.is_empty() => f,
        _ => return Err(InputFilesError::NoInputs.into()),
    };
    let files = expand_globs(&patterns)?;
    debug!("Input files: {files:#?}");
    Ok(files)
}

/// A progress bar over input files.
pub(super) fn file_progress_bar(
    num_files: usize,
    message: String,
    draw_progress_bar: bool,
) -> ProgressBar {
    ProgressBar::with_draw_target(
        Some(num_files as _),
        if draw_progress_bar {
            ProgressDrawTarget::stdout()
        } else {
            ProgressDrawTarget::hidden()
        },
    )
    .with_style(
        ProgressStyle::default_bar()
            .template(
                "{msg:17}: [{wide_bar:.blue}] {pos:2}/{len:2} files ({elapsed_precise}<{eta_precise})",
            )
            .unwrap()
            .progress_chars("=> "),
    )
    .with_position(0)
    .with_message(message)
}

/// Run `f` on every file in turn. A file that fails is logged and skipped;
/// only if every file fails is an error returned.
pub(super) fn process_files<T, E, F>(
    files: &[PathBuf],
    message: &str,
    draw_progress_bar: bool,
    mut f: F,
) -> Result<Vec<T>, SatprofileError>
where
    E: std::fmt::Display,
    F: FnMut(&Path) -> Result<T, E>,
{
    let pb = file_progress_bar(files.len(), message.to_string(), draw_progress_bar);
    let mut outputs = Vec::with_capacity(files.len());
    for file in files {
        match f(file) {
            Ok(output) => outputs.push(output),
            Err(e) => pb.suspend(|| warn!("Skipping '{}': {e}", file.display())),
        }
        pb.inc(1);
    }
    pb.finish();

    if outputs.is_empty() {
        return Err(InputFilesError::AllFailed {
            num_files: files.len(),
        }
        .into());
    }
    if outputs.len() < files.len() {
        warn!(
            "{} of {} files could not be processed",
            files.len() - outputs.len(),
            files.len()
        );
    }
    Ok(outputs)
}

/// NaN becomes `None` (`null` in JSON).
pub(super) fn finite_or_none(v: f64) -> Option<f64> {
    if v.is_nan() {
        None
    } else {
        Some(v)
    }
}

pub(super) fn to_json_1d(a: ArrayView1<f64>) -> Vec<Option<f64>> {
    a.iter().copied().map(finite_or_none).collect()
}

pub(super) fn to_json_2d(a: ArrayView2<f64>) -> Vec<Vec<Option<f64>>> {
    a.outer_iter().map(to_json_1d).collect()
}

/// Write something as pretty JSON.
pub(super) fn write_json<T: Serialize>(file: &Path, output: &T) -> Result<(), SatprofileError> {
    let mut f = BufWriter::new(File::create(file)?);
    serde_json::to_writer_pretty(&mut f, output)?;
    f.flush()?;
    info!("Wrote {}", file.display());
    Ok(())
}
