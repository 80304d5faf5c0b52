use crate::error::Result;
use crate::math::Point3;

use super::Path;

/// A straight segment from `p0` (`t = 0`) to `p1` (`t = 1`).
#[derive(Debug, Clone)]
pub struct Line {
    p0: Point3,
    p1: Point3,
}

impl Line {
    /// Creates a new segment between two points.
    #[must_use]
    pub fn new(p0: Point3, p1: Point3) -> Self {
        Self { p0, p1 }
    }

    /// Returns the start point.
    #[must_use]
    pub fn start(&self) -> &Point3 {
        &self.p0
    }

    /// Returns the end point.
    #[must_use]
    pub fn end(&self) -> &Point3 {
        &self.p1
    }
}

impl Path for Line {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        Ok(self.p0 + (self.p1 - self.p0) * t)
    }

    fn length(&self) -> Result<f64> {
        Ok((self.p1 - self.p0).norm())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_endpoints_and_midpoint() {
        let l = Line::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 4.0, 0.0));
        assert!((l.evaluate(0.0).unwrap() - Point3::origin()).norm() < 1e-12);
        assert!((l.evaluate(0.5).unwrap() - Point3::new(1.0, 2.0, 0.0)).norm() < 1e-12);
        assert!((l.evaluate(1.0).unwrap() - Point3::new(2.0, 4.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn length_is_exact() {
        let l = Line::new(Point3::origin(), Point3::new(3.0, 4.0, 0.0));
        assert!((l.length().unwrap() - 5.0).abs() < 1e-12);
    }
}
