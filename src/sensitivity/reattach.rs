use tracing::warn;

use super::{SensitivityRecord, SensitivityTable};
use crate::math::{Point3, Vector3};

/// Matching parameters for [`reattach`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReattachParams {
    /// Per-axis distance below which a stored point matches a record.
    pub tolerance: f64,
    /// Derivative components smaller than this are written as zero.
    pub zero_floor: f64,
}

impl Default for ReattachParams {
    fn default() -> Self {
        Self {
            tolerance: 1e-5,
            zero_floor: 1e-8,
        }
    }
}

/// Derivatives re-attached to a stored point set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reattachment {
    /// One derivative per stored point, in stored order. Unmatched points
    /// carry a zero vector.
    pub derivatives: Vec<Vector3>,
    /// Indices of the stored points no record matched.
    pub unmatched: Vec<usize>,
}

impl Reattachment {
    /// Returns whether every stored point found a record.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unmatched.is_empty()
    }
}

/// Matches each stored point to the first record, across `tables` in order,
/// lying within `tolerance` of it on every axis, and takes that record's
/// derivative.
pub fn reattach<'a, I>(points: &[Point3], tables: I, params: &ReattachParams) -> Reattachment
where
    I: IntoIterator<Item = &'a SensitivityTable>,
{
    let records: Vec<&SensitivityRecord> = tables
        .into_iter()
        .flat_map(|table| table.records.iter())
        .collect();

    let mut result = Reattachment {
        derivatives: Vec::with_capacity(points.len()),
        unmatched: Vec::new(),
    };
    for (index, point) in points.iter().enumerate() {
        let found = records.iter().find(|record| {
            (record.position - point)
                .iter()
                .all(|delta| delta.abs() < params.tolerance)
        });
        let derivative = match found {
            Some(record) => record
                .derivative
                .map(|d| if d.abs() < params.zero_floor { 0.0 } else { d }),
            None => {
                result.unmatched.push(index);
                Vector3::zeros()
            }
        };
        result.derivatives.push(derivative);
    }

    if let Some(first) = result.unmatched.first() {
        warn!(
            unmatched = result.unmatched.len(),
            points = points.len(),
            first,
            "stored points without a sensitivity record were given zero derivatives"
        );
    }
    result
}
