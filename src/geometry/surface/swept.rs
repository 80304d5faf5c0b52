use crate::error::{GeometryError, Result};
use crate::math::{Axis, Point3, TOLERANCE};

use super::{SharedSurface, Surface};

/// A surface swept through an ordered list of cross-section surfaces.
///
/// Each section contributes its boundary loop (south, east, north, west in
/// turn, parametrised by `s`). Sections are located along `sweep_axis` by
/// the coordinate of their centre point; `r` moves from the first section
/// to the last, blending linearly between the two bracketing perimeters.
#[derive(Clone)]
pub struct SweptPatch {
    sections: Vec<SharedSurface>,
    /// Normalised position of each section along the sweep, from 0 to 1.
    fractions: Vec<f64>,
    sweep_axis: Axis,
}

impl SweptPatch {
    /// Creates a swept patch.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two sections are given, a section
    /// fails to evaluate, or the section stations are not strictly monotonic
    /// along the sweep axis.
    pub fn new(sections: Vec<SharedSurface>, sweep_axis: Axis) -> Result<Self> {
        if sections.len() < 2 {
            return Err(
                GeometryError::Degenerate("a swept patch needs at least two sections".into())
                    .into(),
            );
        }

        let stations = sections
            .iter()
            .map(|sec| -> Result<f64> {
                Ok(sec.evaluate(0.5, 0.5)?[sweep_axis.index()])
            })
            .collect::<Result<Vec<f64>>>()?;

        let first = stations[0];
        let span = stations[stations.len() - 1] - first;
        if span.abs() < TOLERANCE {
            return Err(GeometryError::Degenerate("swept sections share one station".into()).into());
        }
        let fractions: Vec<f64> = stations.iter().map(|st| (st - first) / span).collect();
        if fractions.windows(2).any(|w| w[1] <= w[0]) {
            return Err(GeometryError::Degenerate(format!(
                "swept section stations along {sweep_axis} are not monotonic"
            ))
            .into());
        }

        Ok(Self {
            sections,
            fractions,
            sweep_axis,
        })
    }
}

impl std::fmt::Debug for SweptPatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SweptPatch")
            .field("sections", &self.sections.len())
            .field("sweep_axis", &self.sweep_axis)
            .finish()
    }
}

/// Walks the boundary loop of a section: `s` in quarters over the south,
/// east, north (reversed) and west (reversed) edges.
fn perimeter(section: &dyn Surface, s: f64) -> Result<Point3> {
    let t = 4.0 * s.clamp(0.0, 1.0);
    if t < 1.0 {
        section.evaluate(t, 0.0)
    } else if t < 2.0 {
        section.evaluate(1.0, t - 1.0)
    } else if t < 3.0 {
        section.evaluate(3.0 - t, 1.0)
    } else {
        section.evaluate(0.0, 4.0 - t)
    }
}

impl Surface for SweptPatch {
    fn evaluate(&self, r: f64, s: f64) -> Result<Point3> {
        let last = self.fractions.len() - 2;
        let index = self.fractions[1..]
            .iter()
            .position(|&f| r <= f)
            .unwrap_or(last);
        let f0 = self.fractions[index];
        let f1 = self.fractions[index + 1];
        let w = (r - f0) / (f1 - f0);

        let a = perimeter(self.sections[index].as_ref(), s)?;
        let b = perimeter(self.sections[index + 1].as_ref(), s)?;
        Ok(a + (b - a) * w)
    }
}
