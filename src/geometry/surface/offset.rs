use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::math::{Point3, Vector3};

use super::{SharedSurface, Surface};

/// How an [`OffsetPatch`] displaces its underlying surface.
#[derive(Clone)]
pub enum Offset {
    /// A fixed distance along the local unit normal.
    Normal(f64),
    /// A displacement computed from the evaluated point.
    Function(Arc<dyn Fn(&Point3) -> Vector3 + Send + Sync>),
}

impl Offset {
    /// Builds a function-valued offset.
    #[must_use]
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&Point3) -> Vector3 + Send + Sync + 'static,
    {
        Self::Function(Arc::new(f))
    }

    /// A constant displacement of `thickness / 2` in z: downwards for the
    /// top skin and upwards for the bottom skin, as used to thicken wings
    /// and fins from their mid surfaces.
    #[must_use]
    pub fn uniform_thickness(thickness: f64, top: bool) -> Self {
        let sign = if top { -1.0 } else { 1.0 };
        let shift = Vector3::new(0.0, 0.0, sign * thickness / 2.0);
        Self::function(move |_| shift)
    }
}

impl fmt::Debug for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal(d) => f.debug_tuple("Normal").field(d).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// Displaces an underlying surface by an [`Offset`].
#[derive(Clone)]
pub struct OffsetPatch {
    underlying: SharedSurface,
    offset: Offset,
}

impl OffsetPatch {
    /// Wraps `underlying` with the given offset.
    #[must_use]
    pub fn new(underlying: SharedSurface, offset: Offset) -> Self {
        Self { underlying, offset }
    }
}

impl fmt::Debug for OffsetPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OffsetPatch")
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

impl Surface for OffsetPatch {
    fn evaluate(&self, r: f64, s: f64) -> Result<Point3> {
        let p = self.underlying.evaluate(r, s)?;
        Ok(match &self.offset {
            Offset::Normal(distance) => p + self.underlying.normal(r, s)? * *distance,
            Offset::Function(f) => p + f(&p),
        })
    }

    fn reverses_orientation(&self) -> bool {
        self.underlying.reverses_orientation()
    }
}
