use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::Path;

/// A circular arc from `a` to `b` about the centre `c`.
///
/// The arc takes the shorter way round, in the plane spanned by `a - c`
/// and `b - c`:
///
/// `P(t) = c + cos(t * sweep) * (a - c) + sin(t * sweep) * (n x (a - c))`
///
/// where `n` is the unit normal `(a - c) x (b - c)` and `sweep` the angle
/// between the two radii.
#[derive(Debug, Clone)]
pub struct Arc {
    centre: Point3,
    start_radial: Vector3,
    binormal: Vector3,
    sweep: f64,
}

impl Arc {
    /// Creates an arc from start point `a`, end point `b` and centre `c`.
    ///
    /// # Errors
    ///
    /// Returns an error if either radius is zero, the radii differ in
    /// length, or they are parallel (the arc plane is undefined).
    pub fn new(a: Point3, b: Point3, c: Point3) -> Result<Self> {
        let ca = a - c;
        let cb = b - c;
        let ra = ca.norm();
        let rb = cb.norm();
        if ra < TOLERANCE || rb < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        if (ra - rb).abs() > 1e-9 * ra.max(1.0) {
            return Err(GeometryError::Degenerate(format!(
                "arc radii differ: |a - c| = {ra}, |b - c| = {rb}"
            ))
            .into());
        }

        let normal = ca.cross(&cb);
        let normal_len = normal.norm();
        if normal_len < TOLERANCE * ra * rb {
            return Err(
                GeometryError::Degenerate("arc radii are parallel, plane is undefined".into())
                    .into(),
            );
        }
        let normal = normal / normal_len;
        let sweep = (ca.dot(&cb) / (ra * rb)).clamp(-1.0, 1.0).acos();

        Ok(Self {
            centre: c,
            start_radial: ca,
            binormal: normal.cross(&ca),
            sweep,
        })
    }

    /// Returns the centre of the arc.
    #[must_use]
    pub fn centre(&self) -> &Point3 {
        &self.centre
    }

    /// Returns the radius of the arc.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.start_radial.norm()
    }

    /// Returns the swept angle in radians.
    #[must_use]
    pub fn sweep(&self) -> f64 {
        self.sweep
    }
}

impl Path for Arc {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        let angle = t * self.sweep;
        Ok(self.centre + self.start_radial * angle.cos() + self.binormal * angle.sin())
    }

    fn length(&self) -> Result<f64> {
        Ok(self.radius() * self.sweep)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    #[test]
    fn quarter_circle() {
        let arc = Arc::new(
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::origin(),
        )
        .unwrap();
        assert!((arc.sweep() - FRAC_PI_2).abs() < 1e-12);
        assert!((arc.evaluate(1.0).unwrap() - Point3::new(0.0, 1.0, 0.0)).norm() < 1e-12);
        let s = FRAC_PI_4.sin();
        let mid = arc.evaluate(0.5).unwrap();
        assert!((mid - Point3::new(s, s, 0.0)).norm() < 1e-12);
        assert!((arc.length().unwrap() - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn unequal_radii_rejected() {
        let r = Arc::new(
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
            Point3::origin(),
        );
        assert!(r.is_err());
    }

    #[test]
    fn half_circle_rejected() {
        let r = Arc::new(
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::origin(),
        );
        assert!(r.is_err());
    }
}
