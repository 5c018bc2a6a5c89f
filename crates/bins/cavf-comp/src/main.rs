mod args;
mod cmd_info;
mod cmd_measure;
mod io;

use args::{CliArgs, SubCommand};
use base::{cli, error::CavfError};

fn main() -> Result<(), CavfError> {
    let (args, launch_time) = cli::parse_args::<CliArgs>();
    let log_level = if args.verbose { 4 } else { args.log_level };
    cli::setup_logging(args.log_timestamp.then_some(launch_time), log_level);
    log::info!(
        "cavf {} launched at {} on {}.",
        env!("CARGO_PKG_VERSION"),
        chrono::DateTime::<chrono::Local>::from(launch_time),
        std::env::consts::OS
    );

    if let Some(nthreads) = args.nthreads {
        log::debug!("Building the thread pool with {} threads", nthreads);
        rayon::ThreadPoolBuilder::new()
            .num_threads(nthreads as usize)
            .build_global()
            .map_err(|err| {
                CavfError::new("Failed to configure the thread pool", Some(Box::new(err)))
            })?;
    }

    match args.command {
        SubCommand::Measure(opts) => cmd_measure::measure(opts),
        SubCommand::Four(opts) => cmd_measure::four(opts),
        SubCommand::Info(opts) => cmd_info::print_info(opts),
    }
}
