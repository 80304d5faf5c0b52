mod mesh_properties;

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{InertiaError, Result};
use crate::math::{Matrix3, Point3, Vector3, TOLERANCE};
use crate::tessellation::TriangleSet;

/// Mass properties of a single rigid body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassProperties {
    /// Enclosed volume.
    pub volume: f64,
    /// Mass.
    pub mass: f64,
    /// Centre of gravity.
    pub cog: Point3,
    /// Inertia tensor about the centre of gravity.
    pub inertia: Matrix3,
}

/// Mass properties of an assembly, referred to its composite centre of
/// gravity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeInertia {
    /// Sum of component volumes.
    pub volume: f64,
    /// Sum of component masses.
    pub mass: f64,
    /// Mass-weighted centre of gravity.
    pub cog: Point3,
    /// Sum of component inertias shifted to [`CompositeInertia::cog`].
    pub inertia: Matrix3,
}

impl CompositeInertia {
    /// Combines component mass properties into composite properties.
    ///
    /// # Errors
    ///
    /// Returns an error if the total mass is zero (including an empty
    /// input), where the centre of gravity is undefined.
    pub fn combine<'a, I>(parts: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a MassProperties>,
    {
        let parts: Vec<&MassProperties> = parts.into_iter().collect();
        let volume: f64 = parts.iter().map(|p| p.volume).sum();
        let mass: f64 = parts.iter().map(|p| p.mass).sum();
        if mass.abs() < TOLERANCE {
            return Err(InertiaError::ZeroTotalMass.into());
        }

        let moment: Vector3 = parts.iter().map(|p| p.cog.coords * p.mass).sum();
        let cog = Point3::from(moment / mass);

        let inertia = parts
            .iter()
            .map(|p| parallel_axis(&p.inertia, p.mass, &(p.cog - cog)))
            .fold(Matrix3::zeros(), |acc, i| acc + i);

        debug!(parts = parts.len(), volume, mass, "combined mass properties");
        Ok(Self {
            volume,
            mass,
            cog,
            inertia,
        })
    }
}

/// Shifts an inertia tensor from a body's centre of gravity to a point at
/// `offset` from it: `I + m (|r|^2 E - r r^T)`.
///
/// Each diagonal entry picks up `m` times the squared distance from the
/// corresponding axis, the scalar `I + m r^2` form.
#[must_use]
pub fn parallel_axis(inertia: &Matrix3, mass: f64, offset: &Vector3) -> Matrix3 {
    inertia + (Matrix3::identity() * offset.norm_squared() - offset * offset.transpose()) * mass
}

/// One component's closed triangle surface and its material class.
#[derive(Debug, Clone, Copy)]
pub struct MassInput<'a> {
    /// Material class, the key into the density table.
    pub kind: &'a str,
    /// Closed, outward-wound triangle surface.
    pub triangles: &'a TriangleSet,
}

/// Computes composite properties of components given as triangle surfaces,
/// using the density of each component's class.
///
/// # Errors
///
/// Returns an error if a class has no density, a surface encloses no
/// volume, or the total mass is zero.
pub fn assess_inertial_properties(
    components: &IndexMap<String, MassInput<'_>>,
    densities: &HashMap<String, f64>,
) -> Result<CompositeInertia> {
    let parts = components
        .iter()
        .map(|(name, input)| -> Result<MassProperties> {
            let density = densities.get(input.kind).copied().ok_or_else(|| {
                InertiaError::MissingDensity {
                    component: name.clone(),
                    class: input.kind.to_owned(),
                }
            })?;
            MassProperties::from_triangles(&input.triangles.triangles, density)
        })
        .collect::<Result<Vec<_>>>()?;
    CompositeInertia::combine(&parts)
}
