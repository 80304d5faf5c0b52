use crate::error::Result;
use crate::math::{rotation_matrix, Axis, Matrix3, Point3};

use super::{SharedSurface, Surface};

/// Rotates an underlying surface about a coordinate axis through the origin.
#[derive(Clone)]
pub struct RotatedPatch {
    underlying: SharedSurface,
    angle: f64,
    axis: Axis,
    matrix: Matrix3,
}

impl RotatedPatch {
    /// Wraps `underlying` with a rotation of `angle` radians about `axis`.
    #[must_use]
    pub fn new(underlying: SharedSurface, angle: f64, axis: Axis) -> Self {
        Self {
            underlying,
            angle,
            axis,
            matrix: rotation_matrix(&axis.unit(), angle),
        }
    }
}

impl std::fmt::Debug for RotatedPatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatedPatch")
            .field("angle", &self.angle)
            .field("axis", &self.axis)
            .finish_non_exhaustive()
    }
}

impl Surface for RotatedPatch {
    fn evaluate(&self, r: f64, s: f64) -> Result<Point3> {
        let p = self.underlying.evaluate(r, s)?;
        Ok(Point3::from(self.matrix * p.coords))
    }

    fn reverses_orientation(&self) -> bool {
        self.underlying.reverses_orientation()
    }
}
