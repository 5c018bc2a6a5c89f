//! Discretisation of a cavity profile into ring elements and assembly of the
//! matching scene.

use crate::{
    element::{Element, ElementShape},
    profile::{CavityProfile, ConeKind},
};
use rt::{Facing, Scene, SceneObject, Surface};

/// Returns the `i`-th of the `n + 1` points splitting `[a, b]` into `n` equal
/// parts; the last point is exactly `b`.
fn split(a: f64, b: f64, n: u32, i: u32) -> f64 {
    if i == n {
        b
    } else {
        a + i as f64 * (b - a) / n as f64
    }
}

/// Splits the profile into its ring elements, ordered from the aperture to
/// the back of the cavity.
///
/// The first element is the aperture, followed by the sub-elements of each
/// frustum then those of the terminal cone or disk.
pub fn discretize(profile: &CavityProfile) -> Vec<Element> {
    let mut elements = Vec::with_capacity(profile.num_elements());
    elements.push(Element {
        index: 0,
        object: 0,
        shape: ElementShape::ApertureDisk {
            radius: profile.aperture_radius,
        },
    });

    for (k, frustum) in profile.frusta.iter().enumerate() {
        let (r_start, z_start) = profile.frustum_start(k);
        let z_end = z_start + frustum.depth;
        let n = frustum.elements;
        for i in 0..n {
            let z0 = split(z_start, z_end, n, i);
            let z1 = split(z_start, z_end, n, i + 1);
            let shape = if r_start == frustum.radius {
                ElementShape::CylinderBand {
                    radius: r_start,
                    z0,
                    z1,
                }
            } else {
                ElementShape::FrustumBand {
                    r0: split(r_start, frustum.radius, n, i),
                    z0,
                    r1: split(r_start, frustum.radius, n, i + 1),
                    z1,
                }
            };
            elements.push(Element {
                index: elements.len(),
                object: k + 1,
                shape,
            });
        }
    }

    let object = profile.frusta.len() + 1;
    let radius = profile.cone_radius();
    let z_base = profile.max_depth();
    let z_apex = z_base + profile.cone_depth;
    let n = profile.cone_elements;
    for i in 0..n {
        let r_outer = split(radius, 0.0, n, i);
        let r_inner = split(radius, 0.0, n, i + 1);
        let shape = match profile.cone_kind() {
            ConeKind::Flat => ElementShape::TerminalDisk {
                r_inner,
                r_outer,
                z: z_base,
            },
            ConeKind::Outgoing | ConeKind::Inward => ElementShape::ConeBand {
                r0: r_outer,
                z0: split(z_base, z_apex, n, i),
                r1: r_inner,
                z1: split(z_base, z_apex, n, i + 1),
            },
        };
        elements.push(Element {
            index: elements.len(),
            object,
            shape,
        });
    }

    log::debug!(
        "[Discretizer] {} elements over {} objects",
        elements.len(),
        object + 1
    );
    elements
}

/// Builds the scene of the cavity: one black object per part of the
/// profile, indexed like [`Element::object`].
pub fn build_scene(profile: &CavityProfile) -> Scene {
    let mut scene = Scene::new();
    scene.add_object(SceneObject::black(
        "aperture",
        Surface::plate(profile.aperture_radius, 0.0, Facing::Forward),
    ));
    for (k, frustum) in profile.frusta.iter().enumerate() {
        let (r_start, z_start) = profile.frustum_start(k);
        scene.add_object(SceneObject::black(
            format!("frustum-{}", k),
            Surface::frustum(r_start, z_start, frustum.radius, z_start + frustum.depth),
        ));
    }
    let radius = profile.cone_radius();
    let z_base = profile.max_depth();
    let terminal = match profile.cone_kind() {
        ConeKind::Flat => SceneObject::black(
            "terminal-disk",
            Surface::plate(radius, z_base, Facing::Backward),
        ),
        ConeKind::Outgoing | ConeKind::Inward => SceneObject::black(
            "cone",
            Surface::frustum(radius, z_base, 0.0, z_base + profile.cone_depth),
        ),
    };
    scene.add_object(terminal);
    scene
}

/// Returns the areas of the elements, aligned with the matrix indices.
pub fn areas(elements: &[Element]) -> Vec<f64> { elements.iter().map(Element::area).collect() }

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, SampleSpan};
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use std::f64::consts::PI;

    #[test]
    fn test_closed_cylinder() {
        let profile = CavityProfile::from_lists(1.0, &[1.0], &[2.0], 0.0, &[4], 1).unwrap();
        let elements = discretize(&profile);
        assert_eq!(elements.len(), 6);
        for (i, e) in elements.iter().enumerate() {
            assert_eq!(e.index, i);
            assert_relative_eq!(e.area(), PI, epsilon = 1e-12);
        }
        assert_eq!(elements[0].kind(), ElementKind::ApertureDisk);
        assert!(elements[1..5]
            .iter()
            .all(|e| e.kind() == ElementKind::CylinderBand && e.object == 1));
        assert_eq!(elements[5].kind(), ElementKind::TerminalDisk);
        assert_eq!(elements[5].object, 2);
        assert_eq!(
            elements[2].sample_span(),
            SampleSpan::Axial {
                low: 0.5,
                high: 1.0
            }
        );

        let scene = build_scene(&profile);
        assert_eq!(scene.len(), 3);
        assert_eq!(scene.objects()[2].name, "terminal-disk");
    }

    #[test]
    fn test_equal_radii_match_explicit_cylinder() {
        // The second frustum keeps the radius of the first one.
        let profile =
            CavityProfile::from_lists(0.5, &[1.0, 1.0], &[1.0, 2.0], 1.0, &[1, 2], 1).unwrap();
        let elements = discretize(&profile);
        let explicit = ElementShape::CylinderBand {
            radius: 1.0,
            z0: 1.0,
            z1: 2.0,
        };
        assert_eq!(elements[2].shape, explicit);
        assert_relative_eq!(elements[2].area(), 2.0 * PI);
        assert_eq!(elements[2].pose(), explicit.pose());
        assert_eq!(elements[1].kind(), ElementKind::FrustumBand);
    }

    #[test]
    fn test_frustum_split() {
        let profile = CavityProfile::four_parameters(1.0, 2.0, 3.0, 1.0, 2, 1).unwrap();
        let elements = discretize(&profile);
        assert_eq!(
            elements[1].shape,
            ElementShape::FrustumBand {
                r0: 1.0,
                z0: 0.0,
                r1: 2.0,
                z1: 1.0
            }
        );
        assert_eq!(
            elements[2].shape,
            ElementShape::FrustumBand {
                r0: 2.0,
                z0: 1.0,
                r1: 3.0,
                z1: 2.0
            }
        );
        let slant = 2.0f64.sqrt();
        assert_relative_eq!(elements[1].area(), PI * 3.0 * slant);
        assert_relative_eq!(elements[2].area(), PI * 5.0 * slant);
    }

    #[test]
    fn test_cone_bands() {
        let profile = CavityProfile::from_lists(1.0, &[2.0], &[1.0], 2.0, &[1], 2).unwrap();
        let elements = discretize(&profile);
        let cone_area = |r0: f64, r1: f64| PI * (r0 + r1) * (4.0f64 + 4.0).sqrt() / 2.0;
        assert_relative_eq!(elements[2].area(), cone_area(2.0, 1.0));
        assert_relative_eq!(elements[3].area(), cone_area(1.0, 0.0));
        assert_eq!(
            elements[3].sample_span(),
            SampleSpan::Radial {
                low: 0.0,
                high: 1.0
            }
        );
        assert!(elements[2..].iter().all(|e| e.inward()));
        assert_eq!(build_scene(&profile).objects()[2].name, "cone");
    }

    #[test]
    fn test_negative_depths_build_backwards() {
        let profile =
            CavityProfile::from_lists(1.0, &[2.0, 1.5], &[2.0, -0.5], -1.0, &[1, 1], 1).unwrap();
        let elements = discretize(&profile);
        let fold = elements[2];
        assert!(fold.is_reversed());
        assert!(!fold.inward());
        assert_eq!(
            fold.sample_span(),
            SampleSpan::Axial {
                low: 1.5,
                high: 2.0
            }
        );
        let cone = elements[3];
        assert!(cone.is_reversed());
        assert_relative_eq!(cone.area(), PI * 1.5 * (1.0f64 + 2.25).sqrt());
        let pose = cone.pose();
        assert!(pose.is_reversed());
        assert_relative_eq!(pose.position.z, 1.5);
    }

    proptest! {
        #[test]
        fn prop_element_count_and_total_area(
            aperture in 0.1f64..2.0,
            parts in prop::collection::vec((0.0f64..3.0, 0.1f64..2.0, any::<bool>(), 1u32..5), 1..4),
            cone_depth in -2.0f64..2.0,
            cone_elements in 1u32..5,
        ) {
            let radii = parts.iter().map(|p| p.0).collect::<Vec<_>>();
            let depths = parts
                .iter()
                .map(|p| if p.2 { p.1 } else { -p.1 })
                .collect::<Vec<_>>();
            let counts = parts.iter().map(|p| p.3).collect::<Vec<_>>();
            let profile =
                CavityProfile::from_lists(aperture, &radii, &depths, cone_depth, &counts, cone_elements)
                    .unwrap();
            let elements = discretize(&profile);
            let expected = 1 + counts.iter().sum::<u32>() as usize + cone_elements as usize;
            prop_assert_eq!(elements.len(), expected);
            prop_assert_eq!(profile.num_elements(), expected);
            let total = areas(&elements).iter().sum::<f64>();
            prop_assert!((total - profile.total_area()).abs() <= 1e-9 * profile.total_area().max(1.0));
            prop_assert!(elements.iter().all(|e| e.area() >= 0.0));
            let scene = build_scene(&profile);
            prop_assert!(elements.iter().all(|e| e.object < scene.len()));
        }
    }
}
