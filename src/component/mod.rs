mod vehicle;

pub use vehicle::Vehicle;

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::debug;

use crate::error::{ComponentError, Result};
use crate::geometry::surface::{Curvature, CurvatureAxis, Offset, SharedSurface};
use crate::math::Axis;
use crate::operations::transform::{ApplyOffset, Curve, Mirror, Rotate};
use crate::tessellation::{
    CentroidMode, TessellatePatch, TessellationParams, TriangleMesh, TriangleSet,
};

/// Named patches in insertion order. The order fixes mesh export order.
pub type PatchCollection = IndexMap<String, SharedSurface>;

/// Tessellated meshes keyed like the patches they came from.
pub type MeshCollection = IndexMap<String, TriangleMesh>;

/// A vehicle component: a patch collection, its transform state, and the
/// meshes of its latest tessellation.
///
/// Every transform replaces the collection with new decorator surfaces and
/// discards meshes made from the previous geometry.
#[derive(Clone)]
pub struct Component {
    name: String,
    kind: String,
    patches: PatchCollection,
    longitudinal: Option<Curvature>,
    spanwise: Option<Curvature>,
    tessellation: TessellationParams,
    meshes: MeshCollection,
}

impl Component {
    /// Creates an empty component.
    ///
    /// * `kind` - Material class of the component (e.g. `"wing"`), used to
    ///   look up its density.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            patches: PatchCollection::new(),
            longitudinal: None,
            spanwise: None,
            tessellation: TessellationParams::default(),
            meshes: MeshCollection::new(),
        }
    }

    /// Sets the tessellation resolution.
    #[must_use]
    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.tessellation.resolution = Some(resolution);
        self
    }

    /// Sets the centre vertex placement.
    #[must_use]
    pub fn with_centroid_mode(mut self, mode: CentroidMode) -> Self {
        self.tessellation.centroid = mode;
        self
    }

    /// Replaces all tessellation parameters.
    #[must_use]
    pub fn with_tessellation(mut self, params: TessellationParams) -> Self {
        self.tessellation = params;
        self
    }

    /// Sets the curvature applied along `axis` by [`Component::curve`].
    #[must_use]
    pub fn with_curvature(mut self, axis: CurvatureAxis, curvature: Curvature) -> Self {
        match axis {
            CurvatureAxis::Longitudinal => self.longitudinal = Some(curvature),
            CurvatureAxis::Spanwise => self.spanwise = Some(curvature),
        }
        self
    }

    /// Adds a patch under a new key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is already taken.
    pub fn add_patch(&mut self, key: impl Into<String>, surface: SharedSurface) -> Result<()> {
        let key = key.into();
        if self.patches.contains_key(&key) {
            return Err(ComponentError::DuplicatePatch(key).into());
        }
        self.patches.insert(key, surface);
        Ok(())
    }

    /// Returns the component name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the material class.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the current patches.
    #[must_use]
    pub fn patches(&self) -> &PatchCollection {
        &self.patches
    }

    /// Returns the meshes of the latest tessellation (empty before one).
    #[must_use]
    pub fn meshes(&self) -> &MeshCollection {
        &self.meshes
    }

    /// Returns the tessellation parameters.
    #[must_use]
    pub fn tessellation(&self) -> &TessellationParams {
        &self.tessellation
    }

    /// Bends every patch by the configured curvatures, longitudinal first.
    pub fn curve(&mut self) {
        let op = Curve::new(self.longitudinal.clone(), self.spanwise.clone());
        if op.is_active() {
            self.replace_patches(op.execute(&self.patches));
        }
    }

    /// Rotates every patch by `angle` radians about `axis`.
    pub fn rotate(&mut self, angle: f64, axis: Axis) {
        let rotated = Rotate::new(angle, axis).execute(&self.patches);
        self.replace_patches(rotated);
    }

    /// Reflects every patch along `axis`, either appending the mirrored
    /// patches or replacing the originals with them.
    ///
    /// # Errors
    ///
    /// Returns an error if an appended key collides with an existing one;
    /// the component is left unchanged.
    pub fn reflect(&mut self, axis: Axis, append: bool) -> Result<()> {
        let reflected = Mirror::new(axis, append).execute(&self.patches)?;
        self.replace_patches(reflected);
        Ok(())
    }

    /// Displaces every patch by `offset`.
    pub fn offset(&mut self, offset: Offset) {
        let shifted = ApplyOffset::new(offset).execute(&self.patches);
        self.replace_patches(shifted);
    }

    /// Tessellates every patch, replacing the stored meshes.
    ///
    /// Patches whose surface is an odd number of reflections deep (the
    /// `_mirrored` patches from [`Component::reflect`]) get reversed winding,
    /// as do all patches when `flip_faces` is set.
    ///
    /// Winding follows the reflection depth of the surface, not its key. A
    /// surface added by hand under a `_mirrored` key keeps the plain fan, and
    /// a `_mirrored_mirrored` patch from two reflections flips back.
    ///
    /// # Errors
    ///
    /// Returns an error if the resolution is unset or a patch fails to
    /// evaluate.
    pub fn tessellate(&mut self) -> Result<()> {
        if self.tessellation.resolution.is_none() {
            return Err(crate::error::TessellationError::MissingResolution.into());
        }
        let base = self.tessellation;
        let entries: Vec<(&String, &SharedSurface)> = self.patches.iter().collect();
        let meshes = entries
            .par_iter()
            .map(|&(key, surface)| -> Result<(String, TriangleMesh)> {
                let params = TessellationParams {
                    flip_faces: base.flip_faces || surface.reverses_orientation(),
                    ..base
                };
                let mesh = TessellatePatch::new(surface.as_ref(), params).execute()?;
                Ok((key.clone(), mesh))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(component = %self.name, meshes = meshes.len(), "tessellated component");
        self.meshes = meshes.into_iter().collect();
        Ok(())
    }

    /// Concatenates the triangles of every mesh, in patch order.
    ///
    /// # Errors
    ///
    /// Returns an error if a patch has no mesh from the latest tessellation.
    pub fn export(&self) -> Result<TriangleSet> {
        let mut set = TriangleSet::default();
        for key in self.patches.keys() {
            let mesh = self
                .meshes
                .get(key)
                .ok_or_else(|| ComponentError::NotTessellated(self.name.clone()))?;
            set.extend_from_mesh(mesh);
        }
        Ok(set)
    }

    fn replace_patches(&mut self, patches: PatchCollection) {
        self.patches = patches;
        self.meshes.clear();
    }
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("patches", &self.patches.keys().collect::<Vec<_>>())
            .field("meshes", &self.meshes.len())
            .finish_non_exhaustive()
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} component", self.kind)
    }
}
