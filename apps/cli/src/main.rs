// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! voxcity - voxelize building meshes into room-segmented CityJSON.
//!
//! Each job is an `INPUT:OUTPUT` pair, optionally `INPUT:OUTPUT:CUBES` to also
//! dump the voxel cubes as OBJ:
//!
//! ```text
//! voxcity model.obj:model.city.json --resolution 0.25
//! voxcity a.obj:a.json b.obj:b.json:b.voxels.obj --connectivity 26
//! ```
//!
//! Defaults come from `VOXCITY_RESOLUTION`, `VOXCITY_PADDING` and
//! `VOXCITY_CONNECTIVITY`; log verbosity from `RUST_LOG`.

mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use voxcity_processing::{process_batch, Job, ObjExportOptions, PipelineConfig};
use voxcity_voxel::Connectivity;

use config::Settings;

/// Voxelize BIM meshes and segment them into rooms
#[derive(Parser, Debug)]
#[command(name = "voxcity")]
#[command(about = "Voxelize OBJ building meshes into room-segmented CityJSON", long_about = None)]
#[command(version)]
struct Cli {
    /// Jobs as INPUT:OUTPUT or INPUT:OUTPUT:CUBES
    #[arg(name = "JOB", required = true, value_parser = parse_job)]
    jobs: Vec<Job>,

    /// Voxel edge length in model units [env: VOXCITY_RESOLUTION, default 0.5]
    #[arg(short, long)]
    resolution: Option<f64>,

    /// Empty cells around the mesh bounds [env: VOXCITY_PADDING, default 2]
    #[arg(short, long)]
    padding: Option<usize>,

    /// Flood-fill neighborhood: 6, 18 or 26 [env: VOXCITY_CONNECTIVITY, default 18]
    #[arg(short, long)]
    connectivity: Option<usize>,

    /// Skip counting cells claimed by groups with different semantics
    #[arg(long)]
    no_conflicts: bool,

    /// Largest grid a job may allocate, in cells
    #[arg(long)]
    max_cells: Option<usize>,

    /// Include interior cells in OBJ cube dumps
    #[arg(long)]
    include_interior: bool,

    /// CityJSON metadata identifier
    #[arg(long, default_value = "voxcity")]
    identifier: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Print per-job reports as JSON on stdout
    #[arg(long)]
    report: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

/// Split a job on `:`, keeping drive prefixes such as `C:\` inside their path
fn split_job(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (pos, _) in value.match_indices(':') {
        let segment = &value[start..pos];
        let rest = &value[pos + 1..];
        let drive = segment.len() == 1
            && segment.as_bytes()[0].is_ascii_alphabetic()
            && (rest.starts_with('\\') || rest.starts_with('/'));
        if !drive {
            parts.push(segment);
            start = pos + 1;
        }
    }
    parts.push(&value[start..]);
    parts
}

fn parse_job(value: &str) -> std::result::Result<Job, String> {
    let parts = split_job(value);
    match parts.as_slice() {
        [input, output] if !input.is_empty() && !output.is_empty() => Ok(Job::new(*input, *output)),
        [input, output, cubes] if !input.is_empty() && !output.is_empty() && !cubes.is_empty() => {
            Ok(Job::new(*input, *output).with_obj_output(*cubes))
        }
        _ => Err(format!(
            "expected INPUT:OUTPUT or INPUT:OUTPUT:CUBES, got '{value}'"
        )),
    }
}

fn init_logging(format: LogFormat) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn pipeline_config(cli: &Cli, settings: &Settings) -> Result<PipelineConfig> {
    let neighbors = cli.connectivity.unwrap_or(settings.connectivity);
    let connectivity =
        Connectivity::from_neighbors(neighbors).context("invalid --connectivity")?;

    let defaults = PipelineConfig::default();
    let config = PipelineConfig {
        resolution: cli.resolution.unwrap_or(settings.resolution),
        padding: cli.padding.unwrap_or(settings.padding),
        connectivity,
        detect_conflicts: !cli.no_conflicts,
        max_cells: cli.max_cells.unwrap_or(defaults.max_cells),
        identifier: cli.identifier.clone(),
        obj: ObjExportOptions {
            include_interior: cli.include_interior,
        },
    };
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    let settings = Settings::from_env();
    let config = pipeline_config(&cli, &settings)?;

    tracing::info!(
        jobs = cli.jobs.len(),
        resolution = config.resolution,
        padding = config.padding,
        connectivity = config.connectivity.len(),
        "Starting voxcity"
    );

    let outcomes = process_batch(&cli.jobs, &config);

    // failures were already logged by the batch
    let reports: Vec<_> = outcomes
        .iter()
        .filter_map(|outcome| outcome.result.as_ref().ok())
        .collect();
    let failed = outcomes.len() - reports.len();

    if cli.report {
        println!(
            "{}",
            serde_json::to_string_pretty(&reports).context("failed to encode reports")?
        );
    }

    tracing::info!(
        succeeded = outcomes.len() - failed,
        failed,
        "Finished"
    );

    if failed > 0 {
        bail!("{failed} of {} jobs failed", outcomes.len());
    }
    Ok(())
}
