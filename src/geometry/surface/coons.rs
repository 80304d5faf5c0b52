use std::sync::Arc;

use crate::error::{GeometryError, Result};
use crate::geometry::path::{Line, Path};
use crate::math::Point3;

use super::Surface;

/// Corner mismatch allowed between adjoining boundary paths.
const CORNER_TOLERANCE: f64 = 1e-6;

/// A bilinearly blended Coons patch bounded by four paths.
///
/// The boundaries follow the usual orientation: `south` runs from `p00` to
/// `p10` (`s = 0`), `north` from `p01` to `p11` (`s = 1`), `west` from `p00`
/// to `p01` (`r = 0`) and `east` from `p10` to `p11` (`r = 1`).
#[derive(Clone)]
pub struct CoonsPatch {
    north: Arc<dyn Path>,
    south: Arc<dyn Path>,
    east: Arc<dyn Path>,
    west: Arc<dyn Path>,
    p00: Point3,
    p10: Point3,
    p01: Point3,
    p11: Point3,
}

impl CoonsPatch {
    /// Creates a patch bounded by four paths.
    ///
    /// # Errors
    ///
    /// Returns an error if a path fails to evaluate or the paths do not meet
    /// at the four corners.
    pub fn from_edges(
        north: Arc<dyn Path>,
        south: Arc<dyn Path>,
        east: Arc<dyn Path>,
        west: Arc<dyn Path>,
    ) -> Result<Self> {
        let p00 = south.evaluate(0.0)?;
        let p10 = south.evaluate(1.0)?;
        let p01 = north.evaluate(0.0)?;
        let p11 = north.evaluate(1.0)?;

        let corners = [
            ("south-west", p00, west.evaluate(0.0)?),
            ("north-west", p01, west.evaluate(1.0)?),
            ("south-east", p10, east.evaluate(0.0)?),
            ("north-east", p11, east.evaluate(1.0)?),
        ];
        for (name, a, b) in corners {
            if (a - b).norm() > CORNER_TOLERANCE {
                return Err(GeometryError::Degenerate(format!(
                    "Coons boundaries do not meet at the {name} corner"
                ))
                .into());
            }
        }

        Ok(Self {
            north,
            south,
            east,
            west,
            p00,
            p10,
            p01,
            p11,
        })
    }

    /// Creates a bilinear patch from its four corner points.
    #[must_use]
    pub fn from_corners(p00: Point3, p10: Point3, p01: Point3, p11: Point3) -> Self {
        Self {
            north: Arc::new(Line::new(p01, p11)),
            south: Arc::new(Line::new(p00, p10)),
            east: Arc::new(Line::new(p10, p11)),
            west: Arc::new(Line::new(p00, p01)),
            p00,
            p10,
            p01,
            p11,
        }
    }

    /// Returns the corner points `[p00, p10, p01, p11]`.
    #[must_use]
    pub fn corners(&self) -> [Point3; 4] {
        [self.p00, self.p10, self.p01, self.p11]
    }
}

impl std::fmt::Debug for CoonsPatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoonsPatch")
            .field("corners", &self.corners())
            .finish_non_exhaustive()
    }
}

impl Surface for CoonsPatch {
    fn evaluate(&self, r: f64, s: f64) -> Result<Point3> {
        let south = self.south.evaluate(r)?.coords;
        let north = self.north.evaluate(r)?.coords;
        let west = self.west.evaluate(s)?.coords;
        let east = self.east.evaluate(s)?.coords;

        let ruled = south * (1.0 - s) + north * s + west * (1.0 - r) + east * r;
        let bilinear = self.p00.coords * ((1.0 - r) * (1.0 - s))
            + self.p10.coords * (r * (1.0 - s))
            + self.p01.coords * ((1.0 - r) * s)
            + self.p11.coords * (r * s);

        Ok(Point3::from(ruled - bilinear))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::path::Arc as ArcPath;

    fn unit_square() -> CoonsPatch {
        CoonsPatch::from_corners(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        )
    }

    #[test]
    fn corners_reproduced() {
        let patch = unit_square();
        assert!((patch.evaluate(1.0, 0.0).unwrap() - Point3::new(1.0, 0.0, 0.0)).norm() < 1e-12);
        assert!((patch.evaluate(0.0, 1.0).unwrap() - Point3::new(0.0, 1.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn bilinear_interior() {
        let patch = unit_square();
        let p = patch.evaluate(0.3, 0.6).unwrap();
        assert!((p - Point3::new(0.3, 0.6, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn curved_north_edge_followed() {
        let a = Point3::new(0.0, 1.0, 0.0);
        let b = Point3::new(1.0, 1.0, 0.0);
        let c = Point3::new(0.5, 1.5, 0.0);
        let north: Arc<dyn Path> = Arc::new(ArcPath::new(a, b, c).unwrap());
        let patch = CoonsPatch::from_edges(
            north.clone(),
            Arc::new(Line::new(Point3::origin(), Point3::new(1.0, 0.0, 0.0))),
            Arc::new(Line::new(Point3::new(1.0, 0.0, 0.0), b)),
            Arc::new(Line::new(Point3::origin(), a)),
        )
        .unwrap();
        let expected = north.evaluate(0.5).unwrap();
        assert!((patch.evaluate(0.5, 1.0).unwrap() - expected).norm() < 1e-12);
    }

    #[test]
    fn disjoint_edges_rejected() {
        let r = CoonsPatch::from_edges(
            Arc::new(Line::new(Point3::new(0.0, 1.0, 0.0), Point3::new(1.0, 1.0, 0.0))),
            Arc::new(Line::new(Point3::origin(), Point3::new(1.0, 0.0, 0.0))),
            Arc::new(Line::new(Point3::new(1.0, 0.0, 0.0), Point3::new(1.0, 1.0, 0.0))),
            Arc::new(Line::new(Point3::new(0.0, 0.0, 5.0), Point3::new(0.0, 1.0, 0.0))),
        );
        assert!(r.is_err());
    }
}
