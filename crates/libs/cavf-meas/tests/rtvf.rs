use approx::assert_relative_eq;
use cavf_meas::{
    CavityDesc, CavityRtvf, ElementKind, RtvfParams, ShutoffPolicy, Termination, ViewFactors,
};
use std::f64::consts::PI;

/// View factor between two coaxial parallel disks of radius `r` at distance
/// `h`.
fn coaxial_disks(r: f64, h: f64) -> f64 {
    let rr = r / h;
    let x = 1.0 + (1.0 + rr * rr) / (rr * rr);
    (x - (x * x - 4.0).sqrt()) / 2.0
}

fn assert_closed(vf: &ViewFactors) {
    for (i, sum) in vf.row_sums().iter().enumerate() {
        assert_relative_eq!(*sum, 1.0, epsilon = 1e-6);
        assert!(vf.samples[i] > 0);
    }
}

fn max_reciprocity_error(vf: &ViewFactors) -> f64 {
    let mut max = 0.0f64;
    for i in 0..vf.n() {
        for j in 0..vf.n() {
            max = max.max(vf.reciprocity_error(i, j));
        }
    }
    max
}

/// Closed cylinder of radius 1 and depth 2: aperture, four bands and a flat
/// terminal disk, every element of area pi.
fn closed_cylinder(params: RtvfParams) -> CavityRtvf {
    CavityRtvf::two_n_parameters(1.0, &[1.0], &[2.0], 0.0, &[4], 1, params).unwrap()
}

#[test]
fn closed_cylinder_converges() {
    let rtvf = closed_cylinder(RtvfParams {
        num_rays: 6 * 50_000,
        precision: 0.01,
        max_passes: 20,
        seed: 1,
        ..Default::default()
    });
    assert_eq!(rtvf.num_elements(), 6);
    for area in rtvf.areas() {
        assert_relative_eq!(*area, PI, epsilon = 1e-12);
    }

    let vf = rtvf.run();
    assert_eq!(vf.termination, Termination::Converged);
    assert!(vf.passes >= 2 && vf.passes <= 20);
    assert_eq!(vf.kinds[5], ElementKind::TerminalDisk);
    assert_closed(&vf);

    // Planar elements cannot see themselves.
    assert_eq!(vf.get(0, 0), 0.0);
    assert_eq!(vf.get(5, 5), 0.0);

    assert!(vf.reciprocity_error(0, 5) <= 0.01);
    assert_relative_eq!(vf.get(0, 5), coaxial_disks(1.0, 2.0), epsilon = 0.005);
    assert_relative_eq!(vf.get(5, 0), coaxial_disks(1.0, 2.0), epsilon = 0.005);
    assert!(max_reciprocity_error(&vf) <= 0.02);
}

#[test]
fn per_element_shutoff_converges() {
    let vf = closed_cylinder(RtvfParams {
        num_rays: 6 * 20_000,
        precision: 0.05,
        max_passes: 20,
        shutoff: ShutoffPolicy::PerElement,
        seed: 3,
        ..Default::default()
    })
    .run();
    assert_eq!(vf.termination, Termination::Converged);
    assert_closed(&vf);
    assert_relative_eq!(vf.get(0, 5), coaxial_disks(1.0, 2.0), epsilon = 0.01);
}

#[test]
fn four_parameters_match_two_n_parameters() {
    let params = RtvfParams {
        num_rays: 5 * 2_000,
        max_passes: 2,
        seed: 7,
        ..Default::default()
    };
    let four = CavityRtvf::four_parameters(0.5, 1.0, 1.0, 0.5, 2, 2, params.clone())
        .unwrap()
        .run();
    let two_n = CavityRtvf::two_n_parameters(0.5, &[1.0], &[1.0], 0.5, &[2], 2, params)
        .unwrap()
        .run();
    assert_eq!(four.view_factors, two_n.view_factors);
    assert_eq!(four.areas, two_n.areas);
    assert_eq!(four.samples, two_n.samples);
}

#[test]
fn outgoing_cone_cavity_is_closed() {
    let rtvf =
        CavityRtvf::four_parameters(0.5, 1.0, 1.0, 1.0, 2, 2, RtvfParams {
            num_rays: 6 * 20_000,
            max_passes: 3,
            seed: 5,
            ..Default::default()
        })
        .unwrap();
    let vf = rtvf.run();
    assert_closed(&vf);
    assert!(max_reciprocity_error(&vf) <= 0.03);
}

#[test]
fn reversed_bands_emit_into_the_cavity() {
    // The profile widens to radius 2, folds back to radius 1.5 and closes with
    // a cone pointing to the aperture.
    let rtvf = CavityRtvf::two_n_parameters(
        1.0,
        &[2.0, 1.5],
        &[2.0, -0.5],
        -0.5,
        &[2, 1],
        2,
        RtvfParams {
            num_rays: 6 * 40_000,
            max_passes: 3,
            seed: 11,
            ..Default::default()
        },
    )
    .unwrap();
    assert!(rtvf.elements()[3].is_reversed());
    assert!(rtvf.elements()[4..].iter().all(|e| e.is_reversed()));

    let vf = rtvf.run();
    assert_closed(&vf);
    assert!(max_reciprocity_error(&vf) <= 0.03);
}

#[test]
fn estimation_is_deterministic() {
    let params = RtvfParams {
        num_rays: 6 * 5_000,
        max_passes: 2,
        seed: 42,
        ..Default::default()
    };
    let a = closed_cylinder(params.clone()).run();
    let b = closed_cylinder(params).run();
    assert_eq!(a.view_factors, b.view_factors);
    assert_eq!(a.stdev, b.stdev);
}

#[test]
fn description_from_yaml() {
    let yaml = r#"
profile:
  aperture-radius: 1.0
  frusta:
    - radius: 1.0
      depth: 2.0
      elements: 4
  cone-depth: 0.0
  cone-elements: 1
params:
  num-rays: 6000
  max-passes: 2
"#;
    let desc: CavityDesc = serde_yaml::from_str(yaml).unwrap();
    let rtvf = desc.into_rtvf().unwrap();
    assert_eq!(rtvf.allocation(), 1000);
    let vf = rtvf.run();
    let out = serde_yaml::to_string(&vf).unwrap();
    assert!(out.contains("termination:"));
    assert!(out.contains("view-factors:"));
}
