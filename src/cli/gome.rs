// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{path::PathBuf, str::FromStr};

use clap::Parser;
use itertools::Itertools;
use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use super::common::{get_input_files, to_json_2d, write_json, ARG_FILE_HELP, InputFilesError};
use crate::{
    constants::{DEFAULT_GRID_REGION, DEFAULT_GRID_SPACING, DEFAULT_MAX_DISTANCE_FACTOR},
    grid::{grid_gome_files, Frequency, GridSeries, GridSpec, InverseDistanceGridder, Region},
    species::{GomeSpecies, GOME_SPECIES_COMMA_SEPARATED},
    SatprofileError,
};

lazy_static::lazy_static! {
    static ref SPECIES_HELP: String =
        format!("The total column to grid. Supported: {}", *GOME_SPECIES_COMMA_SEPARATED);

    static ref REGION_HELP: String = {
        let (west, east, south, north) = DEFAULT_GRID_REGION;
        format!("The grid bounds: west east south north [degrees]. Default: {west} {east} {south} {north}")
    };

    static ref SPACING_HELP: String =
        format!("The grid spacing [degrees]. Default: {DEFAULT_GRID_SPACING}");

    static ref MAX_DISTANCE_HELP: String =
        format!("Grid nodes further than this many grid spacings from every observation are discarded. Default: {DEFAULT_MAX_DISTANCE_FACTOR}");

    static ref FREQUENCY_HELP: String =
        format!("The time resolution to resample the grids to. Supported: {}. Default: {}",
                Frequency::iter().join(", "), Frequency::default());
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct GomeArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    /// Paths or glob patterns of GOME2 files. Each file's acquisition time is
    /// taken from its name.
    #[clap(short, long, multiple_values(true), help_heading = "INPUT FILES")]
    pub(super) files: Option<Vec<String>>,

    #[clap(short, long, help = SPECIES_HELP.as_str(), help_heading = "GRIDDING")]
    pub(super) species: Option<String>,

    #[clap(long, number_of_values = 4, allow_hyphen_values = true, help = REGION_HELP.as_str(), help_heading = "GRIDDING")]
    pub(super) region: Option<Vec<f64>>,

    #[clap(long, help = SPACING_HELP.as_str(), help_heading = "GRIDDING")]
    pub(super) spacing: Option<f64>,

    #[clap(long, help = MAX_DISTANCE_HELP.as_str(), help_heading = "GRIDDING")]
    pub(super) max_distance_factor: Option<f64>,

    /// Also grid values that aren't positive.
    #[clap(long, help_heading = "GRIDDING")]
    #[serde(default)]
    pub(super) keep_non_positive: bool,

    /// The power of the inverse-distance weights. Default: 2
    #[clap(long, help_heading = "GRIDDING")]
    pub(super) idw_power: Option<f64>,

    #[clap(long, help = FREQUENCY_HELP.as_str(), help_heading = "GRIDDING")]
    pub(super) frequency: Option<String>,

    /// Write the resampled grids to this JSON file. Empty grid nodes are
    /// null.
    #[clap(short, long, parse(from_os_str), help_heading = "OUTPUT FILES")]
    pub(super) output: Option<PathBuf>,
}

impl GomeArgs {
    /// Consolidate the command-line arguments with those in the argument file,
    /// preferring the command line.
    pub(super) fn merge(self) -> Result<GomeArgs, SatprofileError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let GomeArgs {
                args_file: _,
                files,
                species,
                region,
                spacing,
                max_distance_factor,
                keep_non_positive,
                idw_power,
                frequency,
                output,
            } = unpack_arg_file!(arg_file);

            Ok(GomeArgs {
                args_file: None,
                files: cli_args.files.or(files),
                species: cli_args.species.or(species),
                region: cli_args.region.or(region),
                spacing: cli_args.spacing.or(spacing),
                max_distance_factor: cli_args.max_distance_factor.or(max_distance_factor),
                keep_non_positive: cli_args.keep_non_positive || keep_non_positive,
                idw_power: cli_args.idw_power.or(idw_power),
                frequency: cli_args.frequency.or(frequency),
                output: cli_args.output.or(output),
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn parse(self) -> Result<GomeParams, SatprofileError> {
        debug!("{:#?}", self);

        let GomeArgs {
            args_file: _,
            files,
            species,
            region,
            spacing,
            max_distance_factor,
            keep_non_positive,
            idw_power,
            frequency,
            output,
        } = self;

        let files = get_input_files(files)?;
        let species = match species {
            Some(s) => GomeSpecies::from_code(&s).map_err(GomeArgsError::from)?,
            None => return Err(GomeArgsError::NoSpecies.into()),
        };
        let region = match region.as_deref() {
            None => Region::default(),
            Some(&[west, east, south, north]) => Region {
                west,
                east,
                south,
                north,
            },
            Some(other) => return Err(GomeArgsError::BadRegion(other.len()).into()),
        };
        let spec = GridSpec {
            region,
            spacing: spacing.unwrap_or(DEFAULT_GRID_SPACING),
            max_distance_factor: max_distance_factor.unwrap_or(DEFAULT_MAX_DISTANCE_FACTOR),
            positive_only: !keep_non_positive,
        };
        spec.validate()?;

        let gridder = match idw_power {
            Some(power) if !(power.is_finite() && power > 0.0) => {
                return Err(GomeArgsError::BadIdwPower(power).into())
            }
            Some(power) => InverseDistanceGridder { power },
            None => InverseDistanceGridder::default(),
        };
        let frequency = match frequency {
            Some(s) => Frequency::from_str(&s.to_lowercase())
                .map_err(|_| GomeArgsError::BadFrequency(s))?,
            None => Frequency::default(),
        };

        Ok(GomeParams {
            files,
            species,
            spec,
            gridder,
            frequency,
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

        params.run(draw_progress_bar)?;
        Ok(())
    }
}

pub(super) struct GomeParams {
    pub(super) files: Vec<PathBuf>,
    pub(super) species: GomeSpecies,
    pub(super) spec: GridSpec,
    pub(super) gridder: InverseDistanceGridder,
    pub(super) frequency: Frequency,
    pub(super) output: Option<PathBuf>,
}

/// Resampled grids of one species.
#[derive(Debug, Serialize)]
pub(super) struct GomeOutput {
    pub(super) species: GomeSpecies,
    pub(super) frequency: Frequency,
    pub(super) times: Vec<String>,
    pub(super) longitudes: Vec<f64>,
    pub(super) latitudes: Vec<f64>,
    /// (time, latitude, longitude)
    pub(super) values: Vec<Vec<Vec<Option<f64>>>>,
}

impl GomeParams {
    fn log_info(&self) {
        let Region {
            west,
            east,
            south,
            north,
        } = self.spec.region;
        info!("Gridding {} from {} GOME2 files", self.species, self.files.len());
        info!(
            "Grid: west {west}, east {east}, south {south}, north {north}, spacing {}°, {} x {} nodes",
            self.spec.spacing,
            self.spec.longitudes().len(),
            self.spec.latitudes().len()
        );
        info!(
            "Nodes further than {}° from every observation are discarded",
            self.spec.max_distance()
        );
        if !self.spec.positive_only {
            info!("Keeping values that aren't positive");
        }
        info!("Resampling to {} grids", self.frequency);
    }

    pub(super) fn run(&self, draw_progress_bar: bool) -> Result<GridSeries, SatprofileError> {
        let results = grid_gome_files(
            &self.files,
            self.species,
            &self.spec,
            &self.gridder,
            draw_progress_bar,
        );

        let mut grids = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(grid) => grids.push(grid),
                Err(e) => warn!("Skipping: {e}"),
            }
        }
        if grids.is_empty() {
            return Err(InputFilesError::AllFailed {
                num_files: self.files.len(),
            }
            .into());
        }
        if grids.len() < self.files.len() {
            warn!(
                "{} of {} files could not be gridded",
                self.files.len() - grids.len(),
                self.files.len()
            );
        }

        let series = GridSeries::new(grids)?.resample(self.frequency);
        info!(
            "Made {} {} grids of {}",
            series.times.len(),
            self.frequency,
            self.species
        );

        if let Some(output) = &self.output {
            write_json(
                output,
                &GomeOutput {
                    species: self.species,
                    frequency: self.frequency,
                    times: series
                        .times
                        .iter()
                        .map(|t| t.format("%Y-%m-%dT%H:%M:%S").to_string())
                        .collect(),
                    longitudes: series.longitudes.clone(),
                    latitudes: series.latitudes.clone(),
                    values: series.values.outer_iter().map(to_json_2d).collect(),
                },
            )?;
        }
        Ok(series)
    }
}

#[derive(thiserror::Error, Debug)]
pub(super) enum GomeArgsError {
    #[error("No species (--species) was specified")]
    NoSpecies,

    #[error(transparent)]
    UnsupportedSpecies(#[from] crate::species::UnsupportedSpeciesError),

    #[error("The region needs 4 values (west east south north); got {0}")]
    BadRegion(usize),

    #[error("The inverse-distance power must be positive and finite; got {0}")]
    BadIdwPower(f64),

    #[error("Unrecognised frequency '{0}'")]
    BadFrequency(String),
}
