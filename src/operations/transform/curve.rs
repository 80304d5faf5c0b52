use std::sync::Arc;

use tracing::debug;

use crate::component::PatchCollection;
use crate::geometry::surface::{Curvature, CurvatureAxis, CurvedPatch, SharedSurface};

/// Bends every patch along the enabled curvature axes.
///
/// The longitudinal bend is always applied before the spanwise one.
#[derive(Debug, Clone, Default)]
pub struct Curve {
    longitudinal: Option<Curvature>,
    spanwise: Option<Curvature>,
}

impl Curve {
    /// Creates a new `Curve` operation from the optional per-axis curvatures.
    #[must_use]
    pub fn new(longitudinal: Option<Curvature>, spanwise: Option<Curvature>) -> Self {
        Self {
            longitudinal,
            spanwise,
        }
    }

    /// Returns whether any axis is enabled.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.longitudinal.is_some() || self.spanwise.is_some()
    }

    /// Executes the bend, returning the wrapped collection.
    #[must_use]
    pub fn execute(&self, patches: &PatchCollection) -> PatchCollection {
        let mut current = patches.clone();
        let stages = [
            (CurvatureAxis::Longitudinal, &self.longitudinal),
            (CurvatureAxis::Spanwise, &self.spanwise),
        ];
        for (axis, curvature) in stages {
            let Some(curvature) = curvature else {
                continue;
            };
            debug!(?axis, patches = current.len(), "curving patches");
            current = current
                .into_iter()
                .map(|(key, surface)| {
                    let curved: SharedSurface =
                        Arc::new(CurvedPatch::new(surface, axis, curvature.clone()));
                    (key, curved)
                })
                .collect();
        }
        current
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::operations::transform::test_support::two_squares;

    #[test]
    fn inactive_curve_keeps_geometry() {
        let patches = two_squares();
        let out = Curve::default().execute(&patches);
        assert_eq!(out.len(), 2);
        assert!(Arc::ptr_eq(&out["lower"], &patches["lower"]));
    }

    #[test]
    fn longitudinal_then_spanwise() {
        let patches = two_squares();
        let along_x = Curvature::new(|x, _y| x, |_x, _y| 0.0);
        let along_y = Curvature::new(|_x, y| y, |_x, _y| 0.0);
        let out = Curve::new(Some(along_x), Some(along_y)).execute(&patches);
        assert_eq!(out.len(), 2);
        // z = 0 -> x after the first bend, then y + x after the second.
        let p = out["lower"].evaluate(0.25, 0.5).unwrap();
        assert!((p - Point3::new(0.25, 0.5, 0.75)).norm() < 1e-12);
        // The input collection is untouched.
        let q = patches["lower"].evaluate(0.25, 0.5).unwrap();
        assert!((q - Point3::new(0.25, 0.5, 0.0)).norm() < 1e-15);
    }

    #[test]
    fn order_matters_for_non_commuting_bends() {
        let patches = two_squares();
        let tilt = Curvature::new(|_x, _y| 0.0, |_x, _y| 1.0);
        let lift = Curvature::new(|x, _y| x, |_x, _y| 0.0);
        let a = Curve::new(Some(tilt.clone()), Some(lift.clone())).execute(&patches);
        let b = Curve::new(Some(lift), Some(tilt)).execute(&patches);
        let pa = a["upper"].evaluate(0.5, 0.5).unwrap();
        let pb = b["upper"].evaluate(0.5, 0.5).unwrap();
        assert!((pa - pb).norm() > 1e-3);
    }
}
