use crate::error::Result;
use crate::math::Point3;

use super::Surface;

/// A sector of a truncated cone about the x axis.
///
/// `r` sweeps the angle from `angle0` to `angle1`, `s` runs along the axis
/// from station `x0` (radius `r0`) to `x1` (radius `r1`):
///
/// `P(r, s) = (x(s), rho(s) * cos(theta(r)), rho(s) * sin(theta(r)))`
///
/// With `x1 > x0` the normal points away from the axis.
#[derive(Debug, Clone)]
pub struct ConePatch {
    x0: f64,
    x1: f64,
    r0: f64,
    r1: f64,
    angle0: f64,
    angle1: f64,
}

impl ConePatch {
    /// Creates a new cone sector. Angles are in radians.
    #[must_use]
    pub fn new(x0: f64, x1: f64, r0: f64, r1: f64, angle0: f64, angle1: f64) -> Self {
        Self {
            x0,
            x1,
            r0,
            r1,
            angle0,
            angle1,
        }
    }
}

impl Surface for ConePatch {
    fn evaluate(&self, r: f64, s: f64) -> Result<Point3> {
        let theta = self.angle0 + r * (self.angle1 - self.angle0);
        let x = self.x0 + s * (self.x1 - self.x0);
        let rho = self.r0 + s * (self.r1 - self.r0);
        Ok(Point3::new(x, rho * theta.cos(), rho * theta.sin()))
    }
}
