use clap::{Args, Parser, Subcommand};
use piviewer::core::io::format::StructureFormat;
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
    about = "PiViewer CLI - Detect π-π stacking between a ligand and the aromatic rings of its receptor.",
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
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect π-π stacking for one ligand in one structure file.
    Detect(DetectArgs),
    /// Run detection over a dataset list of structure codes and ligand names.
    Batch(BatchArgs),
}

/// Arguments for the `detect` subcommand.
#[derive(Args, Debug)]
pub struct DetectArgs {
    // --- Core Arguments ---
    /// Path to the complex structure file (e.g., 1acj_d1refined.pdb).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Residue name of the ligand (exact, case-sensitive).
    #[arg(short, long, required = true, value_name = "NAME")]
    pub ligand: String,

    /// Structure format. Inferred from the file extension when omitted.
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<StructureFormat>,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Criteria Overrides ---
    /// Override the maximum centroid distance in Angstroms.
    #[arg(long, value_name = "FLOAT")]
    pub max_distance: Option<f64>,

    /// Override the maximum inter-plane angle for parallel stacking, in degrees.
    #[arg(long, value_name = "FLOAT")]
    pub max_parallel: Option<f64>,

    /// Override the minimum inter-plane angle for T-shaped stacking, in degrees.
    #[arg(long, value_name = "FLOAT")]
    pub min_tshape: Option<f64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S perception.bond-tolerance=0.4
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,

    // --- Output ---
    /// Write the qualifying ring pairs to a CSV file.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Print only the pair count, or -1 when the ligand is absent.
    #[arg(long)]
    pub legacy: bool,
}

/// Arguments for the `batch` subcommand.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Dataset list: one '<code> <ligand>[,<ligand>...]' entry per line.
    #[arg(short = 'L', long, required = true, value_name = "PATH")]
    pub list: PathBuf,

    /// Directory holding the structure files.
    #[arg(short = 'd', long = "structure-dir", required = true, value_name = "DIR")]
    pub structure_dir: PathBuf,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the structure file name template; must contain '{code}'.
    #[arg(long, value_name = "TEMPLATE")]
    pub template: Option<String>,

    /// Fallback ligand name tried for every entry. Can be used multiple times.
    #[arg(long = "fallback", value_name = "NAME")]
    pub fallback: Vec<String>,

    /// Use structure codes as written instead of lower-casing them.
    #[arg(long)]
    pub keep_case: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S criteria.max-distance=4.5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,

    /// Write the per-entry summary to a CSV file.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}
