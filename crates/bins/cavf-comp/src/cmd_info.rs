use crate::{args::InfoOptions, io};
use base::{cli::ansi, error::CavfError};
use meas::SampleSpan;

/// Prints the elements of a cavity description without tracing.
pub fn print_info(opts: InfoOptions) -> Result<(), CavfError> {
    let desc = io::load_desc(&opts.input)?;
    let rtvf = desc.into_rtvf()?;
    let profile = rtvf.profile();
    println!(
        "{}>{} Cavity {}: aperture radius {}, {} frusta, {:?} cone of depth {}",
        ansi::BRIGHT_YELLOW,
        ansi::RESET,
        opts.input.display(),
        profile.aperture_radius,
        profile.frusta.len(),
        profile.cone_kind(),
        profile.cone_depth
    );
    println!(
        "  {} {} elements, total area {:.6}, {} rays per element and pass",
        ansi::YELLOW_GT,
        rtvf.num_elements(),
        rtvf.areas().iter().sum::<f64>(),
        rtvf.allocation()
    );
    println!(
        "{:>5} {:>6} {:<14} {:>12} {:>22} {:>8}",
        "#", "object", "kind", "area", "span", "reversed"
    );
    for element in rtvf.elements() {
        let span = match element.sample_span() {
            SampleSpan::Whole => "whole".to_string(),
            SampleSpan::Axial { low, high } => format!("z [{:.4}, {:.4})", low, high),
            SampleSpan::Radial { low, high } => format!("r [{:.4}, {:.4})", low, high),
        };
        println!(
            "{:>5} {:>6} {:<14} {:>12.6} {:>22} {:>8}",
            element.index,
            element.object,
            format!("{:?}", element.kind()),
            element.area(),
            span,
            element.is_reversed()
        );
    }
    Ok(())
}
