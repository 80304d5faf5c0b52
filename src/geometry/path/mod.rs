mod arc;
mod bezier;
mod line;
mod polyline;

pub use arc::Arc;
pub use bezier::Bezier;
pub use line::Line;
pub use polyline::Polyline;

use crate::error::Result;
use crate::math::Point3;

/// Number of chords used when a path length has no closed form.
const LENGTH_SAMPLES: usize = 32;

/// Trait for parametric paths in 3D space, defined for `t` in `[0, 1]`.
///
/// Paths bound the Coons patches and provide the profiles that are revolved
/// or swept into surfaces.
pub trait Path: Send + Sync {
    /// Evaluates the path at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails.
    fn evaluate(&self, t: f64) -> Result<Point3>;

    /// Returns the length of the path.
    ///
    /// The default implementation sums chords over a uniform sampling.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails.
    fn length(&self) -> Result<f64> {
        let mut prev = self.evaluate(0.0)?;
        let mut total = 0.0;
        for i in 1..=LENGTH_SAMPLES {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f64 / LENGTH_SAMPLES as f64;
            let p = self.evaluate(t)?;
            total += (p - prev).norm();
            prev = p;
        }
        Ok(total)
    }
}
