// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::common::{get_input_files, process_files, to_json_1d, to_json_2d, write_json, ARG_FILE_HELP};
use crate::{
    io::read::OmpsProfile,
    screen::{ScreenError, ScreenOptions},
    SatprofileError,
};

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct OmpsArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    /// Paths or glob patterns of OMPS limb profile files.
    #[clap(short, long, multiple_values(true), help_heading = "INPUT FILES")]
    pub(super) files: Option<Vec<String>>,

    /// Convert the ozone number densities to volume mixing ratios.
    #[clap(long, help_heading = "SCREENING")]
    #[serde(default)]
    pub(super) vmr: bool,

    /// Discard UV (visible) profiles that don't have a valid UV (visible)
    /// quality.
    #[clap(long, help_heading = "SCREENING")]
    #[serde(default)]
    pub(super) require_quality: bool,

    /// Write the screened ozone to this JSON file. Discarded values are null.
    #[clap(short, long, parse(from_os_str), help_heading = "OUTPUT FILES")]
    pub(super) output: Option<PathBuf>,
}

impl OmpsArgs {
    /// Consolidate the command-line arguments with those in the argument file,
    /// preferring the command line.
    pub(super) fn merge(self) -> Result<OmpsArgs, SatprofileError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let OmpsArgs {
                args_file: _,
                files,
                vmr,
                require_quality,
                output,
            } = unpack_arg_file!(arg_file);

            Ok(OmpsArgs {
                args_file: None,
                files: cli_args.files.or(files),
                vmr: cli_args.vmr || vmr,
                require_quality: cli_args.require_quality || require_quality,
                output: cli_args.output.or(output),
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn parse(self) -> Result<OmpsParams, SatprofileError> {
        debug!("{:#?}", self);

        let OmpsArgs {
            args_file: _,
            files,
            vmr,
            require_quality,
            output,
        } = self;

        Ok(OmpsParams {
            files: get_input_files(files)?,
            vmr,
            opts: ScreenOptions {
                omps_require_quality: require_quality,
                ..Default::default()
            },
            output,
        })
    }

    pub(super) fn run(self, dry_run: bool, draw_progress_bar: bool) -> Result<(), SatprofileError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = self.parse()?;
        info!(
            "Screening {} OMPS files; output units: {}",
            params.files.len(),
            params.units()
        );

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        params.run(draw_progress_bar)
    }
}

pub(super) struct OmpsParams {
    pub(super) files: Vec<PathBuf>,
    pub(super) vmr: bool,
    pub(super) opts: ScreenOptions,
    pub(super) output: Option<PathBuf>,
}

/// Screened ozone from one OMPS file.
#[derive(Debug, Serialize)]
pub(super) struct OmpsOutput {
    pub(super) file: PathBuf,
    pub(super) units: &'static str,
    pub(super) latitude: Vec<Option<f64>>,
    pub(super) longitude: Vec<Option<f64>>,
    pub(super) uv: Vec<Vec<Option<f64>>>,
    pub(super) uv_precision: Vec<Vec<Option<f64>>>,
    pub(super) vis: Vec<Vec<Option<f64>>>,
    pub(super) vis_precision: Vec<Vec<Option<f64>>>,
}

impl OmpsParams {
    fn units(&self) -> &'static str {
        if self.vmr {
            "volume mixing ratio"
        } else {
            "number density"
        }
    }

    pub(super) fn run(&self, draw_progress_bar: bool) -> Result<(), SatprofileError> {
        let outputs = process_files(&self.files, "Screening OMPS", draw_progress_bar, |file| {
            self.screen_file(file)
        })?;

        if let Some(output) = &self.output {
            write_json(output, &outputs)?;
        }
        Ok(())
    }

    fn screen_file(&self, file: &Path) -> Result<OmpsOutput, ScreenError> {
        let profile = OmpsProfile::new(file);
        let aux = profile.read_aux()?;
        let ozone = profile.correct(self.vmr, &self.opts)?;

        let count = |a: &ndarray::Array2<f64>| a.iter().filter(|v| !v.is_nan()).count();
        info!(
            "{}: kept {} of {} UV and {} of {} visible values",
            file.display(),
            count(&ozone.uv),
            ozone.uv.len(),
            count(&ozone.vis),
            ozone.vis.len()
        );

        Ok(OmpsOutput {
            file: file.to_path_buf(),
            units: self.units(),
            latitude: to_json_1d(aux.latitude.view()),
            longitude: to_json_1d(aux.longitude.view()),
            uv: to_json_2d(ozone.uv.view()),
            uv_precision: to_json_2d(ozone.uv_precision.view()),
            vis: to_json_2d(ozone.vis.view()),
            vis_precision: to_json_2d(ozone.vis_precision.view()),
        })
    }
}
