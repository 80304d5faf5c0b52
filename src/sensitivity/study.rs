use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, info};

use super::{SensitivityParams, SensitivityRecord, SensitivityTable};
use crate::component::{Component, Vehicle};
use crate::error::{Result, SensitivityError};
use crate::math::TOLERANCE;
use crate::tessellation::TriangleMesh;

/// Named design parameter values, in the order they are perturbed.
pub type DesignParameters = IndexMap<String, f64>;

/// Builds an untessellated vehicle from a set of design parameters.
///
/// Implemented for every `Fn(&DesignParameters) -> Result<Vehicle>` closure.
pub trait VehicleBuilder: Sync {
    /// Builds the vehicle.
    ///
    /// # Errors
    ///
    /// Returns any error raised while constructing the geometry.
    fn build(&self, parameters: &DesignParameters) -> Result<Vehicle>;
}

impl<F> VehicleBuilder for F
where
    F: Fn(&DesignParameters) -> Result<Vehicle> + Sync,
{
    fn build(&self, parameters: &DesignParameters) -> Result<Vehicle> {
        self(parameters)
    }
}

/// Computes geometric sensitivities to design parameters by finite
/// differences.
pub struct SensitivityStudy<B> {
    builder: B,
    params: SensitivityParams,
}

impl<B: VehicleBuilder> SensitivityStudy<B> {
    /// Creates a study with default parameters.
    #[must_use]
    pub fn new(builder: B) -> Self {
        Self {
            builder,
            params: SensitivityParams::default(),
        }
    }

    /// Sets the study parameters.
    #[must_use]
    pub fn with_params(mut self, params: SensitivityParams) -> Self {
        self.params = params;
        self
    }

    /// Computes the sensitivity of every component's vertices to every
    /// design parameter.
    ///
    /// Each parameter in turn is scaled by `1 + perturbation_percent / 100`
    /// with the others held at their nominal values. Tables are returned
    /// grouped by parameter, in parameter order, then component order.
    ///
    /// # Errors
    ///
    /// Returns an error if `parameters` is empty, a perturbation leaves its
    /// parameter unchanged, a build fails, or a perturbed mesh differs in
    /// topology from its nominal mesh.
    pub fn dgdp(&self, parameters: &DesignParameters) -> Result<Vec<SensitivityTable>> {
        if parameters.is_empty() {
            return Err(SensitivityError::EmptyParameters.into());
        }

        info!(parameters = parameters.len(), "generating nominal geometry");
        let nominal = self.generate(parameters)?;

        let names: Vec<&str> = parameters.keys().map(String::as_str).collect();
        let run = |name: &&str| self.perturb(&nominal, parameters, name);
        let tables: Vec<Vec<SensitivityTable>> = if self.params.parallel {
            names.par_iter().map(run).collect::<Result<_>>()?
        } else {
            names.iter().map(run).collect::<Result<_>>()?
        };
        Ok(tables.into_iter().flatten().collect())
    }

    fn generate(&self, parameters: &DesignParameters) -> Result<Vehicle> {
        let mut vehicle = self.builder.build(parameters)?;
        vehicle.generate()?;
        Ok(vehicle)
    }

    fn perturb(
        &self,
        nominal: &Vehicle,
        parameters: &DesignParameters,
        name: &str,
    ) -> Result<Vec<SensitivityTable>> {
        let mut adjusted = parameters.clone();
        let Some(value) = adjusted.get_mut(name) else {
            return Err(SensitivityError::EmptyParameters.into());
        };
        let base = *value;
        *value *= 1.0 + self.params.perturbation_percent / 100.0;
        let dp = *value - base;
        if dp.abs() < TOLERANCE {
            return Err(SensitivityError::ZeroPerturbation {
                parameter: name.to_owned(),
            }
            .into());
        }

        info!(parameter = name, nominal = base, dp, "generating perturbed geometry");
        let perturbed = self.generate(&adjusted)?;

        nominal
            .components()
            .iter()
            .map(|(component, nominal_component)| -> Result<SensitivityTable> {
                let perturbed_meshes = perturbed.component(component).map(Component::meshes);
                let mut table = SensitivityTable::new(component.clone(), name);
                for (patch, mesh) in nominal_component.meshes() {
                    let other = perturbed_meshes.and_then(|m| m.get(patch)).ok_or_else(|| {
                        SensitivityError::MissingMesh {
                            component: component.clone(),
                            patch: patch.clone(),
                        }
                    })?;
                    table
                        .records
                        .extend(compare_meshes(component, patch, mesh, other, dp)?);
                }
                debug!(
                    component = %component,
                    parameter = name,
                    records = table.records.len(),
                    "computed sensitivity table"
                );
                Ok(table)
            })
            .collect()
    }
}

/// Differences two tessellations of the same patch, one record per vertex.
///
/// # Errors
///
/// Returns an error if the meshes differ in vertex count or face indices,
/// in which case vertex `i` of one is not vertex `i` of the other.
pub fn compare_meshes(
    component: &str,
    patch: &str,
    nominal: &TriangleMesh,
    perturbed: &TriangleMesh,
    dp: f64,
) -> Result<Vec<SensitivityRecord>> {
    if !nominal.same_topology(perturbed) {
        return Err(SensitivityError::TopologyMismatch {
            component: component.to_owned(),
            patch: patch.to_owned(),
            nominal: nominal.vertex_count(),
            perturbed: perturbed.vertex_count(),
        }
        .into());
    }
    Ok(nominal
        .vertices
        .iter()
        .zip(&perturbed.vertices)
        .map(|(&p0, &p1)| SensitivityRecord::from_positions(p0, p1, dp))
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use approx::assert_relative_eq;

    use super::*;
    use crate::geometry::surface::FnSurface;
    use crate::math::{Point3, Vector3};
    use crate::tessellation::{TessellatePatch, TessellationParams};

    /// A flat `width x 1` plate whose x extent is the `width` parameter.
    fn plate(parameters: &DesignParameters) -> Result<Vehicle> {
        let width = parameters["width"];
        let mut c = Component::new("plate", "plate").with_resolution(2);
        c.add_patch(
            "face",
            Arc::new(FnSurface::new(move |r, s| Point3::new(width * r, s, 0.0))),
        )?;
        let mut v = Vehicle::new("plate");
        v.add_component(c)?;
        Ok(v)
    }

    fn width(value: f64) -> DesignParameters {
        let mut p = DesignParameters::new();
        p.insert("width".to_owned(), value);
        p
    }

    #[test]
    fn affine_patch_has_exact_derivative() {
        let tables = SensitivityStudy::new(plate).dgdp(&width(2.0)).unwrap();
        assert_eq!(tables.len(), 1);
        let table = &tables[0];
        assert_eq!(table.component, "plate");
        assert_eq!(table.parameter, "width");
        assert_eq!(table.records.len(), 13);
        for record in &table.records {
            // d(width * r)/d(width) = r = x / width
            let expected = Vector3::new(record.position.x / 2.0, 0.0, 0.0);
            assert_relative_eq!(record.derivative, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn derivative_converges_as_perturbation_shrinks() {
        // x = w^2 r has dx/dw = 2 w r; the forward difference error is w r p
        let squared = |parameters: &DesignParameters| -> Result<Vehicle> {
            let w = parameters["width"];
            let mut c = Component::new("plate", "plate").with_resolution(1);
            c.add_patch(
                "face",
                Arc::new(FnSurface::new(move |r, s| Point3::new(w * w * r, s, 0.0))),
            )?;
            let mut v = Vehicle::new("plate");
            v.add_component(c)?;
            Ok(v)
        };
        let corner_error = |percent: f64| {
            let tables = SensitivityStudy::new(squared)
                .with_params(SensitivityParams {
                    perturbation_percent: percent,
                    parallel: false,
                })
                .dgdp(&width(1.0))
                .unwrap();
            // vertex 1 is the (r, s) = (1, 0) corner
            (tables[0].records[1].derivative.x - 2.0).abs()
        };
        let coarse = corner_error(10.0);
        let fine = corner_error(1.0);
        assert_relative_eq!(coarse, 0.1, epsilon = 1e-9);
        assert_relative_eq!(fine, 0.01, epsilon = 1e-9);
    }

    #[test]
    fn tables_follow_parameter_then_component_order() {
        let builder = |parameters: &DesignParameters| -> Result<Vehicle> {
            let (a, b) = (parameters["a"], parameters["b"]);
            let mut v = Vehicle::new("pair");
            for (name, z) in [("lower", a), ("upper", b)] {
                let mut c = Component::new(name, "plate").with_resolution(1);
                c.add_patch(
                    "face",
                    Arc::new(FnSurface::new(move |r, s| Point3::new(r, s, z))),
                )?;
                v.add_component(c)?;
            }
            Ok(v)
        };
        let mut parameters = DesignParameters::new();
        parameters.insert("a".to_owned(), 1.0);
        parameters.insert("b".to_owned(), 2.0);
        let tables = SensitivityStudy::new(builder).dgdp(&parameters).unwrap();
        let keys: Vec<_> = tables
            .iter()
            .map(|t| (t.parameter.as_str(), t.component.as_str()))
            .collect();
        assert_eq!(
            keys,
            [("a", "lower"), ("a", "upper"), ("b", "lower"), ("b", "upper")]
        );
        // only the lower plate moves with a
        assert_relative_eq!(tables[0].records[0].derivative.z, 1.0, epsilon = 1e-12);
        assert_relative_eq!(tables[1].records[0].magnitude, 0.0);
    }

    #[test]
    fn topology_change_is_rejected() {
        let surface = FnSurface::new(|r, s| Point3::new(r, s, 0.0));
        let coarse = TessellatePatch::new(&surface, TessellationParams::with_resolution(2))
            .execute()
            .unwrap();
        let fine = TessellatePatch::new(&surface, TessellationParams::with_resolution(3))
            .execute()
            .unwrap();
        let err = compare_meshes("plate", "face", &coarse, &fine, 1.0).unwrap_err();
        assert!(err.to_string().contains("plate/face"));
    }

    #[test]
    fn resolution_driven_by_parameter_is_rejected() {
        let builder = |parameters: &DesignParameters| -> Result<Vehicle> {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let n = parameters["cells"] as usize;
            let mut c = Component::new("plate", "plate").with_resolution(n);
            c.add_patch("face", Arc::new(FnSurface::new(|r, s| Point3::new(r, s, 0.0))))?;
            let mut v = Vehicle::new("plate");
            v.add_component(c)?;
            Ok(v)
        };
        let mut parameters = DesignParameters::new();
        parameters.insert("cells".to_owned(), 2.0);
        let err = SensitivityStudy::new(builder)
            .with_params(SensitivityParams {
                perturbation_percent: 50.0,
                parallel: true,
            })
            .dgdp(&parameters)
            .unwrap_err();
        assert!(matches!(
            err,
            crate::GeosensError::Sensitivity(SensitivityError::TopologyMismatch { .. })
        ));
    }

    #[test]
    fn zero_parameter_cannot_be_perturbed() {
        let err = SensitivityStudy::new(plate).dgdp(&width(0.0)).unwrap_err();
        assert!(err.to_string().contains("width"));
    }

    #[test]
    fn empty_parameters_rejected() {
        assert!(SensitivityStudy::new(plate)
            .dgdp(&DesignParameters::new())
            .is_err());
    }
}
