//! Binning of the traced hits into a row of the view factor matrix.

use crate::element::Element;
use rt::TraceResult;

/// Distributes the energy absorbed by every object of the scene into the
/// elements making up the object.
///
/// `row` is the row of the emitting element in the per-pass matrix; every
/// entry is overwritten. Hits outside of every element span of their object
/// are dropped.
pub fn bin_hits(elements: &[Element], result: &TraceResult, row: &mut [f64]) {
    debug_assert_eq!(elements.len(), row.len(), "row length mismatch");
    for (element, entry) in elements.iter().zip(row.iter_mut()) {
        *entry = result.hits.get(element.object).map_or(0.0, |hits| {
            hits.iter()
                .filter(|(p, _)| element.contains(p))
                .map(|(_, e)| *e)
                .sum()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{discretize::discretize, profile::CavityProfile};
    use approx::assert_relative_eq;
    use base::math::DVec3;
    use rt::ObjectHits;

    fn hits(points: &[(DVec3, f64)]) -> ObjectHits {
        let mut hits = ObjectHits::default();
        for (p, e) in points {
            hits.push(*p, *e);
        }
        hits
    }

    #[test]
    fn test_binning_by_object_and_span() {
        let profile = CavityProfile::from_lists(1.0, &[1.0], &[2.0], 0.0, &[4], 2).unwrap();
        let elements = discretize(&profile);
        let result = TraceResult {
            hits: vec![
                hits(&[(DVec3::new(0.2, 0.0, 0.0), 0.25)]),
                hits(&[
                    (DVec3::new(1.0, 0.0, 0.0), 0.1),
                    (DVec3::new(0.0, 1.0, 0.5), 0.2),
                    (DVec3::new(0.0, -1.0, 0.75), 0.05),
                    (DVec3::new(-1.0, 0.0, 1.999), 0.1),
                ]),
                hits(&[
                    (DVec3::new(0.1, 0.1, 2.0), 0.1),
                    (DVec3::new(0.6, 0.0, 2.0), 0.2),
                ]),
            ],
            escaped: 0.0,
            truncated: 0.0,
        };
        let mut row = vec![f64::NAN; elements.len()];
        bin_hits(&elements, &result, &mut row);
        let expected = [0.25, 0.1, 0.25, 0.0, 0.1, 0.2, 0.1];
        for (got, want) in row.iter().zip(expected) {
            assert_relative_eq!(*got, want);
        }
    }

    #[test]
    fn test_binning_reversed_band() {
        let profile =
            CavityProfile::from_lists(1.0, &[2.0, 1.0], &[1.0, -0.5], 0.5, &[1, 2], 1).unwrap();
        let elements = discretize(&profile);
        // The folded band goes from z = 1 back to z = 0.5.
        let result = TraceResult {
            hits: vec![
                ObjectHits::default(),
                ObjectHits::default(),
                hits(&[
                    (DVec3::new(1.9, 0.0, 0.95), 0.3),
                    (DVec3::new(1.1, 0.0, 0.55), 0.4),
                    (DVec3::new(1.2, 0.0, 0.6), 0.1),
                ]),
                ObjectHits::default(),
            ],
            escaped: 0.0,
            truncated: 0.0,
        };
        let mut row = vec![0.0; elements.len()];
        bin_hits(&elements, &result, &mut row);
        assert_relative_eq!(row[2], 0.3);
        assert_relative_eq!(row[3], 0.5);
        assert_relative_eq!(row.iter().sum::<f64>(), 0.8);
    }
}
