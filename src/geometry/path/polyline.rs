use std::sync::Arc;

use crate::error::{GeometryError, Result};
use crate::math::{Point3, TOLERANCE};

use super::Path;

/// A chain of paths traversed end to end.
///
/// The global parameter is distributed over the segments in proportion to
/// their lengths, so `t` is proportional to arc length along the chain.
#[derive(Clone)]
pub struct Polyline {
    segments: Vec<Arc<dyn Path>>,
    /// Cumulative parameter value at the end of each segment.
    breaks: Vec<f64>,
    length: f64,
}

impl Polyline {
    /// Creates a polyline from an ordered list of segments.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty, a segment fails to evaluate,
    /// or the total length is zero.
    pub fn new(segments: Vec<Arc<dyn Path>>) -> Result<Self> {
        if segments.is_empty() {
            return Err(GeometryError::Degenerate("polyline has no segments".into()).into());
        }

        let lengths = segments
            .iter()
            .map(|seg| seg.length())
            .collect::<Result<Vec<_>>>()?;
        let length: f64 = lengths.iter().sum();
        if length < TOLERANCE {
            return Err(GeometryError::Degenerate("polyline has zero length".into()).into());
        }

        let mut running = 0.0;
        let breaks = lengths
            .iter()
            .map(|l| {
                running += l / length;
                running
            })
            .collect();

        Ok(Self {
            segments,
            breaks,
            length,
        })
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns whether the polyline has no segments (never true once built).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl std::fmt::Debug for Polyline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Polyline")
            .field("segments", &self.segments.len())
            .field("length", &self.length)
            .finish()
    }
}

impl Path for Polyline {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        let last = self.segments.len() - 1;
        let index = self.breaks.iter().position(|&b| t <= b).unwrap_or(last);
        let start = if index == 0 { 0.0 } else { self.breaks[index - 1] };
        let span = self.breaks[index] - start;
        let local = if span > TOLERANCE { (t - start) / span } else { 0.0 };
        self.segments[index].evaluate(local)
    }

    fn length(&self) -> Result<f64> {
        Ok(self.length)
    }
}
