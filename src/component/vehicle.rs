use std::collections::HashMap;

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::info;

use crate::error::{ComponentError, Result};
use crate::inertia::{assess_inertial_properties, CompositeInertia, MassInput};
use crate::tessellation::TriangleSet;

use super::{Component, MeshCollection};

/// An ordered set of uniquely named components making up one geometry.
#[derive(Debug, Clone, Default)]
pub struct Vehicle {
    name: String,
    components: IndexMap<String, Component>,
}

impl Vehicle {
    /// Creates an empty vehicle.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: IndexMap::new(),
        }
    }

    /// Returns the vehicle name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a component, keyed by its name.
    ///
    /// # Errors
    ///
    /// Returns an error if a component with the same name exists.
    pub fn add_component(&mut self, component: Component) -> Result<()> {
        let name = component.name().to_owned();
        if self.components.contains_key(&name) {
            return Err(ComponentError::DuplicateComponent(name).into());
        }
        self.components.insert(name, component);
        Ok(())
    }

    /// Returns the components in insertion order.
    #[must_use]
    pub fn components(&self) -> &IndexMap<String, Component> {
        &self.components
    }

    /// Returns a component by name.
    #[must_use]
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.get(name)
    }

    /// Returns a mutable component by name.
    pub fn component_mut(&mut self, name: &str) -> Option<&mut Component> {
        self.components.get_mut(name)
    }

    /// Tessellates every component. Components are independent and are
    /// processed in parallel.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any component.
    pub fn generate(&mut self) -> Result<()> {
        info!(vehicle = %self.name, components = self.components.len(), "generating geometry");
        self.components
            .values_mut()
            .collect::<Vec<_>>()
            .into_par_iter()
            .try_for_each(Component::tessellate)
    }

    /// Returns the meshes of every component, keyed by component name.
    #[must_use]
    pub fn meshes(&self) -> IndexMap<&str, &MeshCollection> {
        self.components
            .iter()
            .map(|(name, c)| (name.as_str(), c.meshes()))
            .collect()
    }

    /// Exports the combined triangle set of every component.
    ///
    /// # Errors
    ///
    /// Returns an error if a component has not been tessellated.
    pub fn export(&self) -> Result<IndexMap<String, TriangleSet>> {
        self.components
            .iter()
            .map(|(name, c)| -> Result<(String, TriangleSet)> {
                Ok((name.clone(), c.export()?))
            })
            .collect()
    }

    /// Computes composite inertial properties from the tessellated meshes,
    /// looking densities up by component class.
    ///
    /// # Errors
    ///
    /// Returns an error if a component is not tessellated, a density is
    /// missing, or the total mass is zero.
    pub fn inertial_properties(&self, densities: &HashMap<String, f64>) -> Result<CompositeInertia> {
        let exported = self.export()?;
        let inputs: IndexMap<String, MassInput<'_>> = self
            .components
            .iter()
            .zip(exported.values())
            .map(|((name, c), set)| {
                (
                    name.clone(),
                    MassInput {
                        kind: c.kind(),
                        triangles: set,
                    },
                )
            })
            .collect();
        assess_inertial_properties(&inputs, densities)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;
    use std::sync::Arc;

    use super::*;
    use crate::geometry::surface::FnSurface;
    use crate::math::{Axis, Point3};

    fn plate(name: &str) -> Component {
        let mut c = Component::new(name, "plate").with_resolution(2);
        c.add_patch("face", Arc::new(FnSurface::new(|r, s| Point3::new(r, s, 0.0))))
            .unwrap();
        c
    }

    #[test]
    fn duplicate_component_rejected() {
        let mut v = Vehicle::new("test");
        v.add_component(plate("a")).unwrap();
        assert!(v.add_component(plate("a")).is_err());
    }

    #[test]
    fn generate_tessellates_all_components() {
        let mut v = Vehicle::new("test");
        v.add_component(plate("a")).unwrap();
        v.add_component(plate("b")).unwrap();
        v.generate().unwrap();
        let meshes = v.meshes();
        assert_eq!(meshes.keys().copied().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(meshes["a"]["face"].face_count(), 16);
        assert_eq!(v.export().unwrap()["b"].len(), 16);
    }

    #[test]
    fn component_mut_transforms_before_generate() {
        let mut v = Vehicle::new("test");
        v.add_component(plate("a")).unwrap();
        v.component_mut("a").unwrap().rotate(FRAC_PI_2, Axis::Z);
        assert!(v.component_mut("missing").is_none());
        v.generate().unwrap();
        // the (r, s) = (1, 0) corner (1, 0, 0) turns onto the y axis
        let corner = v.meshes()["a"]["face"].vertices[1];
        assert!((corner - Point3::new(0.0, 1.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn generate_propagates_missing_resolution() {
        let mut v = Vehicle::new("test");
        let mut c = Component::new("bare", "plate");
        c.add_patch("face", Arc::new(FnSurface::new(|r, s| Point3::new(r, s, 0.0))))
            .unwrap();
        v.add_component(c).unwrap();
        assert!(v.generate().is_err());
    }
}
