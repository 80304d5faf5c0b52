use std::sync::Arc;

use crate::error::Result;
use crate::geometry::path::Path;
use crate::math::Point3;

use super::Surface;

/// A profile path revolved about the x axis between two angles.
///
/// The profile is read in the x-y half plane (`y` is the local radius);
/// `r` sweeps the angle and `s` runs along the profile.
#[derive(Clone)]
pub struct RevolvedPatch {
    profile: Arc<dyn Path>,
    angle0: f64,
    angle1: f64,
}

impl RevolvedPatch {
    /// Creates a revolved patch. Angles are in radians.
    #[must_use]
    pub fn new(profile: Arc<dyn Path>, angle0: f64, angle1: f64) -> Self {
        Self {
            profile,
            angle0,
            angle1,
        }
    }
}

impl std::fmt::Debug for RevolvedPatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevolvedPatch")
            .field("angle0", &self.angle0)
            .field("angle1", &self.angle1)
            .finish_non_exhaustive()
    }
}

impl Surface for RevolvedPatch {
    fn evaluate(&self, r: f64, s: f64) -> Result<Point3> {
        let theta = self.angle0 + r * (self.angle1 - self.angle0);
        let p = self.profile.evaluate(s)?;
        Ok(Point3::new(p.x, p.y * theta.cos(), p.y * theta.sin()))
    }
}
