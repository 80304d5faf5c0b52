use crate::error::Result;
use crate::math::{Axis, Point3};

use super::{SharedSurface, Surface};

/// Reflects an underlying surface through the coordinate plane normal to
/// `axis`, negating that coordinate.
///
/// A reflection reverses handedness, so the patch reports
/// [`Surface::reverses_orientation`] opposite to its underlying surface.
#[derive(Clone)]
pub struct MirroredPatch {
    underlying: SharedSurface,
    axis: Axis,
}

impl MirroredPatch {
    /// Wraps `underlying` with a reflection along `axis`.
    #[must_use]
    pub fn new(underlying: SharedSurface, axis: Axis) -> Self {
        Self { underlying, axis }
    }
}

impl std::fmt::Debug for MirroredPatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MirroredPatch")
            .field("axis", &self.axis)
            .finish_non_exhaustive()
    }
}

impl Surface for MirroredPatch {
    fn evaluate(&self, r: f64, s: f64) -> Result<Point3> {
        let mut p = self.underlying.evaluate(r, s)?;
        p[self.axis.index()] = -p[self.axis.index()];
        Ok(p)
    }

    fn reverses_orientation(&self) -> bool {
        !self.underlying.reverses_orientation()
    }
}
