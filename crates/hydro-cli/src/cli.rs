use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "hydro - Hydrodynamic property prediction for macromolecular structures from a convex-hull model of the solvent-accessible surface.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute hydrodynamic coefficients for one or more PDB structures.
    Compute(ComputeArgs),
}

/// Arguments for the `compute` subcommand.
#[derive(Args, Debug)]
pub struct ComputeArgs {
    /// Input PDB files or directories of PDB files.
    #[arg(required = true, value_name = "PATH")]
    pub inputs: Vec<PathBuf>,

    /// Write results as JSON to this path instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Rolling-probe radius in Angstroms for the surface mesh.
    #[arg(long, value_name = "FLOAT", default_value_t = hydropp::engine::mesh::DEFAULT_PROBE_RADIUS)]
    pub probe_radius: f64,

    /// Number of surface sample points per sphere.
    #[arg(long, value_name = "INT", default_value_t = hydropp::engine::mesh::DEFAULT_MESH_POINTS)]
    pub mesh_points: usize,

    /// Use an external qconvex binary at this path for the convex hull
    /// instead of the built-in implementation.
    #[arg(long, value_name = "PATH")]
    pub qconvex: Option<PathBuf>,

    /// Report only the translational hydrodynamic radius per structure.
    #[arg(long)]
    pub rht_only: bool,

    /// Write the reduced atomic model of each structure as a PDB file
    /// alongside the input, for visual inspection.
    #[arg(long)]
    pub dump_model: bool,
}
