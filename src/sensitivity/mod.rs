mod reattach;
mod study;

pub use reattach::{reattach, ReattachParams, Reattachment};
pub use study::{compare_meshes, DesignParameters, SensitivityStudy, VehicleBuilder};

use crate::math::{Point3, Vector3};

/// Parameters of a sensitivity study.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensitivityParams {
    /// Relative perturbation applied to each parameter, in percent.
    pub perturbation_percent: f64,
    /// Build the perturbed geometries in parallel.
    pub parallel: bool,
}

impl Default for SensitivityParams {
    fn default() -> Self {
        Self {
            perturbation_percent: 20.0,
            parallel: true,
        }
    }
}

/// Sensitivity of one nominal vertex to one design parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensitivityRecord {
    /// Nominal vertex position.
    pub position: Point3,
    /// Perturbed minus nominal position.
    pub displacement: Vector3,
    /// Length of `displacement`.
    pub magnitude: f64,
    /// `displacement / dP`.
    pub derivative: Vector3,
}

impl SensitivityRecord {
    /// Creates a record from a nominal and perturbed position and the
    /// parameter change `dp` that produced it.
    #[must_use]
    pub fn from_positions(nominal: Point3, perturbed: Point3, dp: f64) -> Self {
        let displacement = perturbed - nominal;
        Self {
            position: nominal,
            displacement,
            magnitude: displacement.norm(),
            derivative: displacement / dp,
        }
    }
}

/// Sensitivity records of every vertex of one component with respect to one
/// parameter, in patch order and tessellation vertex order.
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityTable {
    /// Component name.
    pub component: String,
    /// Design parameter name.
    pub parameter: String,
    /// One record per nominal vertex.
    pub records: Vec<SensitivityRecord>,
}

impl SensitivityTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new(component: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            parameter: parameter.into(),
            records: Vec::new(),
        }
    }

    /// File name the table is written under. Distinct for every
    /// (component, parameter) pair, so concurrent writers never collide.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}_{}_sensitivity.csv", self.component, self.parameter)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn record_from_positions() {
        let r = SensitivityRecord::from_positions(
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.3, 0.4, 0.0),
            0.5,
        );
        assert_relative_eq!(r.displacement, Vector3::new(0.3, 0.4, 0.0), epsilon = 1e-12);
        assert_relative_eq!(r.magnitude, 0.5, epsilon = 1e-12);
        assert_relative_eq!(r.derivative, Vector3::new(0.6, 0.8, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn file_name_pairs_component_and_parameter() {
        let t = SensitivityTable::new("wing_0", "body_width");
        assert_eq!(t.file_name(), "wing_0_body_width_sensitivity.csv");
    }
}
