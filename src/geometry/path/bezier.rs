use crate::error::{GeometryError, Result};
use crate::math::Point3;

use super::Path;

/// A Bezier curve of arbitrary degree, evaluated with de Casteljau's
/// algorithm.
#[derive(Debug, Clone)]
pub struct Bezier {
    control_points: Vec<Point3>,
}

impl Bezier {
    /// Creates a Bezier curve from its control points.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two control points are given.
    pub fn new(control_points: Vec<Point3>) -> Result<Self> {
        if control_points.len() < 2 {
            return Err(GeometryError::Degenerate(
                "a Bezier curve needs at least two control points".into(),
            )
            .into());
        }
        Ok(Self { control_points })
    }
}

impl Path for Bezier {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        let mut work = self.control_points.clone();
        let n = work.len();
        for level in 1..n {
            for i in 0..n - level {
                work[i] = work[i] + (work[i + 1] - work[i]) * t;
            }
        }
        Ok(work[0])
    }
}
