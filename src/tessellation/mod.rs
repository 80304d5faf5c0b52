mod tessellate_patch;

pub use tessellate_patch::TessellatePatch;

use crate::math::{Point3, Vector3};

/// How the extra vertex at the centre of each quad cell is placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CentroidMode {
    /// Average of the four corner points of the cell.
    #[default]
    Bilinear,
    /// The surface evaluated at the parametric midpoint of the cell.
    ///
    /// Cells with a collapsed edge (e.g. at a cone apex) fall back to the
    /// bilinear average.
    Exact,
}

/// Parameters controlling patch tessellation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TessellationParams {
    /// Number of quad cells along each parameter direction. Must be set.
    pub resolution: Option<usize>,
    /// Reflect every vertex through the x-z plane.
    pub mirror_y: bool,
    /// Reverse the winding of every face.
    pub flip_faces: bool,
    /// Placement of the cell centre vertices.
    pub centroid: CentroidMode,
}

impl TessellationParams {
    /// Creates parameters with the given resolution and default flags.
    #[must_use]
    pub fn with_resolution(resolution: usize) -> Self {
        Self {
            resolution: Some(resolution),
            ..Self::default()
        }
    }

    /// Returns whether faces are emitted with reversed winding.
    ///
    /// Either flag selects the reversed fan; setting both is the same as
    /// setting one.
    #[must_use]
    pub fn reverses_winding(&self) -> bool {
        self.mirror_y || self.flip_faces
    }
}

/// A triangle mesh approximation of a surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Returns the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.indices.len()
    }

    /// Iterates over the faces as vertex triples.
    pub fn triangles(&self) -> impl Iterator<Item = [Point3; 3]> + '_ {
        self.indices.iter().map(|tri| {
            [
                self.vertices[tri[0] as usize],
                self.vertices[tri[1] as usize],
                self.vertices[tri[2] as usize],
            ]
        })
    }

    /// Returns the unnormalised face normal `(v1 - v0) x (v2 - v0)`.
    #[must_use]
    pub fn face_normal(&self, face: usize) -> Vector3 {
        let [v0, v1, v2] = self.indices[face].map(|i| self.vertices[i as usize]);
        (v1 - v0).cross(&(v2 - v0))
    }

    /// Returns whether `other` has the same vertex count and face indices.
    #[must_use]
    pub fn same_topology(&self, other: &Self) -> bool {
        self.vertices.len() == other.vertices.len() && self.indices == other.indices
    }
}

/// An unindexed list of triangles, the layout of stereolithography files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleSet {
    /// The triangles, each as three vertex positions.
    pub triangles: Vec<[Point3; 3]>,
}

impl TriangleSet {
    /// Appends every face of `mesh`, in face order.
    pub fn extend_from_mesh(&mut self, mesh: &TriangleMesh) {
        self.triangles.extend(mesh.triangles());
    }

    /// Returns the number of triangles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Returns whether the set holds no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}
