mod cone;
mod coons;
mod curved;
mod mirrored;
mod offset;
mod revolved;
mod rotated;
mod swept;

pub use cone::ConePatch;
pub use coons::CoonsPatch;
pub use curved::{Curvature, CurvatureAxis, CurvedPatch};
pub use mirrored::MirroredPatch;
pub use offset::{Offset, OffsetPatch};
pub use revolved::RevolvedPatch;
pub use rotated::RotatedPatch;
pub use swept::SweptPatch;

use std::sync::Arc;

use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

/// A surface shared between a patch collection and the decorators wrapping it.
pub type SharedSurface = Arc<dyn Surface>;

/// Central-difference step used by the default normal.
const NORMAL_STEP: f64 = 1e-6;

/// Parameters closer than this to the domain edge are pulled inwards before
/// differencing, so collapsed edges (cone apices) still yield a normal.
const NORMAL_INSET: f64 = 1e-4;

/// Trait for parametric surfaces mapping the unit square `(r, s)` to 3D.
///
/// Behaviour outside `[0, 1] x [0, 1]` is surface-specific.
pub trait Surface: Send + Sync {
    /// Evaluates the surface at parameters `(r, s)`, returning the 3D point.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails.
    fn evaluate(&self, r: f64, s: f64) -> Result<Point3>;

    /// Computes the unit surface normal at `(r, s)`.
    ///
    /// The default implementation crosses central-difference tangents
    /// `dP/dr x dP/ds`, negated when [`Surface::reverses_orientation`] holds
    /// so the normal agrees with the tessellated winding.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails or the tangents are parallel.
    fn normal(&self, r: f64, s: f64) -> Result<Vector3> {
        let r = r.clamp(NORMAL_INSET, 1.0 - NORMAL_INSET);
        let s = s.clamp(NORMAL_INSET, 1.0 - NORMAL_INSET);
        let dr = (self.evaluate(r + NORMAL_STEP, s)? - self.evaluate(r - NORMAL_STEP, s)?)
            / (2.0 * NORMAL_STEP);
        let ds = (self.evaluate(r, s + NORMAL_STEP)? - self.evaluate(r, s - NORMAL_STEP)?)
            / (2.0 * NORMAL_STEP);
        let n = dr.cross(&ds);
        let len = n.norm();
        if len < TOLERANCE {
            return Err(GeometryError::Degenerate(format!(
                "surface normal is degenerate at ({r}, {s})"
            ))
            .into());
        }
        let n = n / len;
        Ok(if self.reverses_orientation() { -n } else { n })
    }

    /// Returns whether the surface is an odd number of reflections away from
    /// its base patch, in which case face winding must flip.
    fn reverses_orientation(&self) -> bool {
        false
    }
}

/// Adapts a plain function of `(r, s)` into a [`Surface`].
#[derive(Clone)]
pub struct FnSurface<F> {
    f: F,
}

impl<F> FnSurface<F>
where
    F: Fn(f64, f64) -> Point3 + Send + Sync,
{
    /// Wraps the given function.
    #[must_use]
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Surface for FnSurface<F>
where
    F: Fn(f64, f64) -> Point3 + Send + Sync,
{
    fn evaluate(&self, r: f64, s: f64) -> Result<Point3> {
        Ok((self.f)(r, s))
    }
}
