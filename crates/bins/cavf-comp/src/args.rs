use meas::{RtvfParams, ShutoffPolicy};
use std::path::PathBuf;

/// cavf command line interface arguments.
#[derive(clap::Parser, Debug)]
#[clap(
    author,
    version,
    about = "Monte Carlo view factors of axisymmetric cavities."
)]
pub struct CliArgs {
    /// Whether to print verbose information.
    #[clap(short, long, help = "Use verbose output (log level = 4)")]
    pub verbose: bool,

    /// Whether to show the timestamp in the log.
    #[clap(
        long,
        help = "Show timestamp for each log message in seconds since\nprogram starts"
    )]
    pub log_timestamp: bool,

    /// Verbosity level for the log.
    #[clap(
        long,
        help = "Setting logging verbosity level (higher for more\ndetails)\n  0 - error\n  1 - \
                warn + error\n  2 - info + warn + error\n  3 - debug + info + warn + error\n  4 - \
                trace + debug + info + warn + error\n\x08",
        default_value_t = 2
    )]
    pub log_level: u8,

    /// Number of threads used to trace the rays.
    #[clap(long, help = "Number of threads used to trace the rays")]
    pub nthreads: Option<u32>,

    /// Command to execute.
    #[clap(subcommand)]
    pub command: SubCommand,
}

/// cavf command.
#[derive(clap::Subcommand, Debug)]
pub enum SubCommand {
    /// Estimates the view factors of the cavity described in a file.
    Measure(MeasureOptions),

    /// Estimates the view factors of a four-parameter cavity.
    Four(FourOptions),

    /// Prints the discretisation of the cavity described in a file.
    Info(InfoOptions),
}

/// Adaptive shut-off of the elements.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutoff {
    /// Every element fires every pass.
    Uniform,
    /// Elements stop firing once their row and column converged.
    PerElement,
}

/// Overrides of the estimation parameters.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ParamsOverrides {
    #[clap(short, long, help = "Ray budget of one pass")]
    pub num_rays: Option<u32>,

    #[clap(short, long, help = "Relative precision target of the view factors")]
    pub precision: Option<f64>,

    #[clap(long, help = "Maximum number of passes")]
    pub max_passes: Option<u32>,

    #[clap(long, help = "Time limit of the estimation in seconds")]
    pub time_limit: Option<f64>,

    #[clap(long, value_enum, help = "Which elements fire during a pass")]
    pub shutoff: Option<Shutoff>,

    #[clap(short, long, help = "Seed of the random streams")]
    pub seed: Option<u64>,
}

impl ParamsOverrides {
    /// Replaces the parameters given on the command line.
    pub fn apply(&self, params: &mut RtvfParams) {
        if let Some(num_rays) = self.num_rays {
            params.num_rays = num_rays;
        }
        if let Some(precision) = self.precision {
            params.precision = precision;
        }
        if let Some(max_passes) = self.max_passes {
            params.max_passes = max_passes;
        }
        if let Some(limit) = self.time_limit {
            params.time_limit_secs = Some(limit);
        }
        if let Some(shutoff) = self.shutoff {
            params.shutoff = match shutoff {
                Shutoff::Uniform => ShutoffPolicy::Uniform,
                Shutoff::PerElement => ShutoffPolicy::PerElement,
            };
        }
        if let Some(seed) = self.seed {
            params.seed = seed;
        }
    }
}

#[derive(clap::Args, Debug)]
#[clap(about = "Estimate the view factors of a cavity description file (YAML or TOML).")]
pub struct MeasureOptions {
    #[clap(short, long, help = "Cavity description file")]
    pub input: PathBuf,

    #[clap(
        short,
        long,
        help = "Output file of the results. If not specified, the results\nare written next to \
                the input file."
    )]
    pub output: Option<PathBuf>,

    #[clap(flatten)]
    pub overrides: ParamsOverrides,
}

#[derive(clap::Args, Debug)]
#[clap(
    about = "Estimate the view factors of a cavity made of one frustum closed by a cone.",
    allow_negative_numbers = true
)]
pub struct FourOptions {
    #[clap(help = "Radius of the aperture")]
    pub aperture_radius: f64,

    #[clap(help = "Depth of the frustum following the aperture")]
    pub aperture_depth: f64,

    #[clap(help = "Radius at the base of the cone")]
    pub cone_radius: f64,

    #[clap(help = "Depth of the cone; 0 for a flat disk, negative for an inward cone")]
    pub cone_depth: f64,

    #[clap(long, default_value_t = 4, help = "Number of elements of the frustum")]
    pub el_fru: u32,

    #[clap(long, default_value_t = 4, help = "Number of elements of the cone")]
    pub el_con: u32,

    #[clap(
        short,
        long,
        help = "Output file of the results. If not specified, the results\nare written to the \
                current directory."
    )]
    pub output: Option<PathBuf>,

    #[clap(flatten)]
    pub overrides: ParamsOverrides,
}

#[derive(clap::Args, Debug)]
#[clap(about = "Print the elements of a cavity description file without tracing.")]
pub struct InfoOptions {
    #[clap(short, long, help = "Cavity description file")]
    pub input: PathBuf,
}
