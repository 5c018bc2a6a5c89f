use crate::{
    args::{FourOptions, MeasureOptions},
    io::{self, Report},
};
use base::{cli::ansi, error::CavfError};
use meas::{CavityRtvf, RtvfParams, ViewFactors};
use std::path::PathBuf;

/// Estimates the view factors of the cavity described in a file.
pub fn measure(opts: MeasureOptions) -> Result<(), CavfError> {
    println!(
        "{}>{} Reading cavity description {}...",
        ansi::BRIGHT_YELLOW,
        ansi::RESET,
        opts.input.display()
    );
    let mut desc = io::load_desc(&opts.input)?;
    opts.overrides.apply(&mut desc.params);
    let rtvf = desc.into_rtvf()?;
    let output = io::output_path(opts.output, Some(&opts.input));
    run(rtvf, output)
}

/// Estimates the view factors of a four-parameter cavity.
pub fn four(opts: FourOptions) -> Result<(), CavfError> {
    let mut params = RtvfParams::default();
    opts.overrides.apply(&mut params);
    let rtvf = CavityRtvf::four_parameters(
        opts.aperture_radius,
        opts.aperture_depth,
        opts.cone_radius,
        opts.cone_depth,
        opts.el_fru,
        opts.el_con,
        params,
    )?;
    let output = io::output_path(opts.output, None);
    run(rtvf, output)
}

fn run(rtvf: CavityRtvf, output: PathBuf) -> Result<(), CavfError> {
    let params = rtvf.params();
    println!(
        "{}>{} Launch view factor estimation at {}
    • parameters:
      + elements: {}
      + rays per element and pass: {}
      + precision: {}
      + passes: {} - {}
      + shutoff: {:?}
      + weighting: {:?}
      + seed: {}
      + threads: {}",
        ansi::BRIGHT_YELLOW,
        ansi::RESET,
        chrono::Local::now(),
        rtvf.num_elements(),
        rtvf.allocation(),
        params.precision,
        params.min_passes,
        params.max_passes,
        params.shutoff,
        params.weighting,
        params.seed,
        rayon::current_num_threads(),
    );

    let vf = rtvf.run();
    print_summary(&vf);

    io::write_report(
        &Report {
            profile: rtvf.profile(),
            params: rtvf.params(),
            elements: rtvf.elements(),
            results: &vf,
        },
        &output,
    )?;
    println!(
        "    {}✓{} Results written to {}",
        ansi::BRIGHT_CYAN,
        ansi::RESET,
        output.display()
    );
    Ok(())
}

fn print_summary(vf: &ViewFactors) {
    println!(
        "    {}✓{} {:?} after {} passes ({:.3} s)",
        ansi::BRIGHT_CYAN,
        ansi::RESET,
        vf.termination,
        vf.passes,
        vf.elapsed_secs
    );
    let n = vf.n();
    print!("{:>5} {:>10} |", "", "area");
    for j in 0..n {
        print!(" {:>7}", j);
    }
    println!(" | {:>7}", "sum");
    for (i, sum) in vf.row_sums().iter().enumerate() {
        print!("{:>5} {:>10.5} |", i, vf.areas[i]);
        for j in 0..n {
            print!(" {:>7.4}", vf.get(i, j));
        }
        println!(" | {:>7.4}", sum);
    }
}
