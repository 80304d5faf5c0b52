use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::math::Point3;

use super::{SharedSurface, Surface};

type ScalarField = Arc<dyn Fn(f64, f64) -> f64 + Send + Sync>;

/// The direction along which a curvature function bends a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurvatureAxis {
    /// Bends along x: the camber line is `z = f(x, y)`.
    Longitudinal,
    /// Bends along y: the camber line is `z = f(x, y)` with slope taken in y.
    Spanwise,
}

/// A user-supplied camber function together with its slope.
///
/// Both take the undeformed `(x, y)` of a point. The slope is the derivative
/// of the offset along the bending direction.
#[derive(Clone)]
pub struct Curvature {
    offset: ScalarField,
    slope: ScalarField,
}

impl Curvature {
    /// Creates a curvature from an offset function and its derivative.
    #[must_use]
    pub fn new<F, D>(offset: F, slope: D) -> Self
    where
        F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
        D: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        Self {
            offset: Arc::new(offset),
            slope: Arc::new(slope),
        }
    }

    /// Evaluates the offset at `(x, y)`.
    #[must_use]
    pub fn offset(&self, x: f64, y: f64) -> f64 {
        (self.offset)(x, y)
    }

    /// Evaluates the slope at `(x, y)`.
    #[must_use]
    pub fn slope(&self, x: f64, y: f64) -> f64 {
        (self.slope)(x, y)
    }
}

impl fmt::Debug for Curvature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Curvature").finish_non_exhaustive()
    }
}

/// Bends an underlying surface along a camber line.
///
/// The evaluated point is lifted by `f(x, y)` in z, and its existing z is
/// treated as a thickness normal to the camber line: with
/// `theta = atan(f'(x, y))`, a longitudinal bend maps
/// `(x, y, z) -> (x - z sin(theta), y, f + z cos(theta))`, and a spanwise
/// bend acts the same way on y.
#[derive(Clone)]
pub struct CurvedPatch {
    underlying: SharedSurface,
    axis: CurvatureAxis,
    curvature: Curvature,
}

impl CurvedPatch {
    /// Wraps `underlying` with a bend along `axis`.
    #[must_use]
    pub fn new(underlying: SharedSurface, axis: CurvatureAxis, curvature: Curvature) -> Self {
        Self {
            underlying,
            axis,
            curvature,
        }
    }
}

impl fmt::Debug for CurvedPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurvedPatch")
            .field("axis", &self.axis)
            .finish_non_exhaustive()
    }
}

impl Surface for CurvedPatch {
    fn evaluate(&self, r: f64, s: f64) -> Result<Point3> {
        let p = self.underlying.evaluate(r, s)?;
        let offset = self.curvature.offset(p.x, p.y);
        let theta = self.curvature.slope(p.x, p.y).atan();
        let (sin, cos) = theta.sin_cos();
        let z = offset + p.z * cos;

        Ok(match self.axis {
            CurvatureAxis::Longitudinal => Point3::new(p.x - p.z * sin, p.y, z),
            CurvatureAxis::Spanwise => Point3::new(p.x, p.y - p.z * sin, z),
        })
    }

    fn reverses_orientation(&self) -> bool {
        self.underlying.reverses_orientation()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::surface::FnSurface;

    fn flat() -> SharedSurface {
        Arc::new(FnSurface::new(|r, s| Point3::new(r, s, 0.0)))
    }

    #[test]
    fn mid_surface_follows_camber_line() {
        let bend = Curvature::new(|x, _y| 0.1 * x * x, |x, _y| 0.2 * x);
        let patch = CurvedPatch::new(flat(), CurvatureAxis::Longitudinal, bend);
        let p = patch.evaluate(0.5, 0.5).unwrap();
        assert!((p - Point3::new(0.5, 0.5, 0.025)).norm() < 1e-12);
    }

    #[test]
    fn thickness_stays_normal_to_camber() {
        let bend = Curvature::new(|x, _y| x, |_x, _y| 1.0);
        let thick: SharedSurface = Arc::new(FnSurface::new(|r, s| Point3::new(r, s, 1.0)));
        let patch = CurvedPatch::new(thick, CurvatureAxis::Longitudinal, bend);
        let p = patch.evaluate(0.0, 0.0).unwrap();
        let h = std::f64::consts::FRAC_1_SQRT_2;
        assert!((p - Point3::new(-h, 0.0, h)).norm() < 1e-12);
    }

    #[test]
    fn spanwise_bends_y() {
        let bend = Curvature::new(|_x, y| y, |_x, _y| 1.0);
        let thick: SharedSurface = Arc::new(FnSurface::new(|r, s| Point3::new(r, s, 1.0)));
        let patch = CurvedPatch::new(thick, CurvatureAxis::Spanwise, bend);
        let p = patch.evaluate(0.5, 0.0).unwrap();
        let h = std::f64::consts::FRAC_1_SQRT_2;
        assert!((p - Point3::new(0.5, -h, h)).norm() < 1e-12);
    }
}
