// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use clap::Parser;
use itertools::Itertools;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use super::common::{get_input_files, process_files, to_json_1d, to_json_2d, write_json, ARG_FILE_HELP};
use crate::{
    bias::BiasExtrapolation,
    io::{get_single_match_from_glob, read::MlsProfile},
    screen::{ScreenError, ScreenOptions},
    species::{MlsSpecies, MLS_SPECIES_COMMA_SEPARATED},
    SatprofileError,
};

lazy_static::lazy_static! {
    static ref FILES_HELP: String =
        format!("Paths or glob patterns of MLS level 2 files. The species is taken from each file name; supported species: {}", *MLS_SPECIES_COMMA_SEPARATED);

    static ref BIAS_EXTRAPOLATION_HELP: String =
        format!("What to do with profiles whose latitudes are outside the ClO bias table. Supported: {}. Default: {}",
                BiasExtrapolation::iter().join(", "), BiasExtrapolation::default());
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct MlsArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(short, long, multiple_values(true), help = FILES_HELP.as_str(), help_heading = "INPUT FILES")]
    pub(super) files: Option<Vec<String>>,

    /// The ClO bias correction table. Required if any input file is a ClO
    /// file. A glob pattern may be used, but it must match only one file.
    #[clap(short, long, help_heading = "INPUT FILES")]
    pub(super) bias_file: Option<String>,

    #[clap(long, help = BIAS_EXTRAPOLATION_HELP.as_str(), help_heading = "SCREENING")]
    pub(super) bias_extrapolation: Option<String>,

    /// After the bias correction, discard negative ClO values.
    #[clap(long, help_heading = "SCREENING")]
    #[serde(default)]
    pub(super) clo_drop_negative: bool,

    /// Discard ClO profiles that aren't sunlit (solar zenith angle > 89°).
    #[clap(long, help_heading = "SCREENING")]
    #[serde(default)]
    pub(super) clo_sunlit_only: bool,

    /// Discard ClO profiles with a local solar time outside 10 to 16 hours.
    #[clap(long, help_heading = "SCREENING")]
    #[serde(default)]
    pub(super) clo_midday_only: bool,

    /// Write the screened profiles to this JSON file. Discarded values are
    /// null.
    #[clap(short, long, parse(from_os_str), help_heading = "OUTPUT FILES")]
    pub(super) output: Option<PathBuf>,
}

impl MlsArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct. Where applicable, it will prefer CLI parameters over
    /// those in the file.
    pub(super) fn merge(self) -> Result<MlsArgs, SatprofileError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let MlsArgs {
                args_file: _,
                files,
                bias_file,
                bias_extrapolation,
                clo_drop_negative,
                clo_sunlit_only,
                clo_midday_only,
                output,
            } = unpack_arg_file!(arg_file);

            Ok(MlsArgs {
                args_file: None,
                files: cli_args.files.or(files),
                bias_file: cli_args.bias_file.or(bias_file),
                bias_extrapolation: cli_args.bias_extrapolation.or(bias_extrapolation),
                clo_drop_negative: cli_args.clo_drop_negative || clo_drop_negative,
                clo_sunlit_only: cli_args.clo_sunlit_only || clo_sunlit_only,
                clo_midday_only: cli_args.clo_midday_only || clo_midday_only,
                output: cli_args.output.or(output),
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn parse(self) -> Result<MlsParams, SatprofileError> {
        debug!("{:#?}", self);

        let MlsArgs {
            args_file: _,
            files,
            bias_file,
            bias_extrapolation,
            clo_drop_negative,
            clo_sunlit_only,
            clo_midday_only,
            output,
        } = self;

        let files = get_input_files(files)?;
        let bias_extrapolation = match bias_extrapolation {
            Some(s) => BiasExtrapolation::from_str(&s.to_lowercase())
                .map_err(|_| MlsArgsError::BadBiasExtrapolation(s))?,
            None => BiasExtrapolation::default(),
        };

        let has_clo = files
            .iter()
            .filter_map(|f| MlsProfile::new(f).ok())
            .any(|p| p.species() == MlsSpecies::ClO);
        let bias_file = match bias_file {
            None if has_clo => return Err(MlsArgsError::NoBiasFile.into()),
            None => None,
            Some(g) => Some(get_single_match_from_glob(&g)?),
        };

        Ok(MlsParams {
            files,
            bias_file,
            opts: ScreenOptions {
                clo_drop_negative,
                clo_sunlit_only,
                clo_midday_only,
                bias_extrapolation,
                ..Default::default()
            },
            output,
        })
    }

    pub(super) fn run(self, dry_run: bool, draw_progress_bar: bool) -> Result<(), SatprofileError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = self.parse()?;
        params.log_info();

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        params.run(draw_progress_bar)
    }
}

pub(super) struct MlsParams {
    pub(super) files: Vec<PathBuf>,
    pub(super) bias_file: Option<PathBuf>,
    pub(super) opts: ScreenOptions,
    pub(super) output: Option<PathBuf>,
}

/// One screened MLS file.
#[derive(Debug, Serialize)]
pub(super) struct MlsOutput {
    pub(super) file: PathBuf,
    pub(super) species: MlsSpecies,
    pub(super) latitude: Vec<Option<f64>>,
    pub(super) longitude: Vec<Option<f64>>,
    pub(super) pressure: Vec<Option<f64>>,
    pub(super) value: Vec<Vec<Option<f64>>>,
    pub(super) precision: Vec<Vec<Option<f64>>>,
}

impl MlsParams {
    fn log_info(&self) {
        info!("Screening {} MLS files", self.files.len());
        if let Some(bias_file) = &self.bias_file {
            info!(
                "ClO bias table: {} (extrapolation: {})",
                bias_file.display(),
                self.opts.bias_extrapolation
            );
        }
        let ScreenOptions {
            clo_drop_negative,
            clo_sunlit_only,
            clo_midday_only,
            ..
        } = self.opts;
        if clo_drop_negative || clo_sunlit_only || clo_midday_only {
            info!(
                "Extra ClO criteria: drop negative {clo_drop_negative}, sunlit only {clo_sunlit_only}, midday only {clo_midday_only}"
            );
        }
    }

    pub(super) fn run(&self, draw_progress_bar: bool) -> Result<(), SatprofileError> {
        let outputs = process_files(&self.files, "Screening MLS", draw_progress_bar, |file| {
            self.screen_file(file)
        })?;

        if let Some(output) = &self.output {
            write_json(output, &outputs)?;
        }
        Ok(())
    }

    fn screen_file(&self, file: &Path) -> Result<MlsOutput, ScreenError> {
        let profile = MlsProfile::new(file)?;
        let (geo, data) = profile.correct(self.bias_file.as_deref(), &self.opts)?;

        let num_kept = data.value.iter().filter(|v| !v.is_nan()).count();
        info!(
            "{}: kept {num_kept} of {} {} values",
            file.display(),
            data.value.len(),
            data.species
        );

        Ok(MlsOutput {
            file: file.to_path_buf(),
            species: data.species,
            latitude: to_json_1d(geo.latitude.view()),
            longitude: to_json_1d(geo.longitude.view()),
            pressure: to_json_1d(geo.pressure.view()),
            value: to_json_2d(data.value.view()),
            precision: to_json_2d(data.precision.view()),
        })
    }
}

#[derive(thiserror::Error, Debug)]
pub(super) enum MlsArgsError {
    #[error("A ClO file was given, but no bias table (--bias-file) was specified")]
    NoBiasFile,

    #[error("Unrecognised bias extrapolation '{0}'")]
    BadBiasExtrapolation(String),
}
