use tracing::debug;

use crate::error::{Result, TessellationError};
use crate::geometry::surface::Surface;
use crate::math::{Point3, TOLERANCE};

use super::{CentroidMode, TessellationParams, TriangleMesh};

/// Tessellates a parametric patch into a triangle mesh.
///
/// The unit square is sampled on a uniform `(N + 1) x (N + 1)` grid of
/// corner points, stored first in row-major order (`s` rows, `r` columns),
/// followed by one centre vertex per cell. Each cell is fanned into four
/// triangles around its centre, so a patch yields `(N + 1)^2 + N^2` vertices
/// and `4 N^2` faces regardless of its shape. Nominal and perturbed
/// geometries therefore share vertex indices.
pub struct TessellatePatch<'a> {
    surface: &'a dyn Surface,
    params: TessellationParams,
}

impl<'a> TessellatePatch<'a> {
    /// Creates a new `TessellatePatch` operation.
    #[must_use]
    pub fn new(surface: &'a dyn Surface, params: TessellationParams) -> Self {
        Self { surface, params }
    }

    /// Executes the tessellation, returning a triangle mesh.
    ///
    /// # Errors
    ///
    /// Returns an error if the resolution is unset or zero (before any
    /// sampling), if the mesh would overflow 32-bit indices, or if the
    /// surface fails to evaluate.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn execute(&self) -> Result<TriangleMesh> {
        let n = self
            .params
            .resolution
            .ok_or(TessellationError::MissingResolution)?;
        if n == 0 {
            return Err(TessellationError::InvalidParameters(
                "resolution must be at least 1".into(),
            )
            .into());
        }

        let stride = n + 1;
        let corner_count = stride * stride;
        let vertex_count = corner_count + n * n;
        if u32::try_from(vertex_count).is_err() {
            return Err(TessellationError::InvalidParameters(format!(
                "resolution {n} overflows 32-bit vertex indices"
            ))
            .into());
        }

        let params: Vec<f64> = (0..=n).map(|i| i as f64 / n as f64).collect();

        let mut mesh = TriangleMesh::default();
        mesh.vertices.reserve(vertex_count);
        mesh.indices.reserve(4 * n * n);

        for &s in &params {
            for &r in &params {
                mesh.vertices.push(self.surface.evaluate(r, s)?);
            }
        }

        for j in 0..n {
            for i in 0..n {
                let corners = [
                    mesh.vertices[j * stride + i],
                    mesh.vertices[j * stride + i + 1],
                    mesh.vertices[(j + 1) * stride + i + 1],
                    mesh.vertices[(j + 1) * stride + i],
                ];
                let centre = match self.params.centroid {
                    CentroidMode::Exact if !has_collapsed_edge(&corners) => {
                        let r = 0.5 * (params[i] + params[i + 1]);
                        let s = 0.5 * (params[j] + params[j + 1]);
                        self.surface.evaluate(r, s)?
                    }
                    _ => bilinear_centre(&corners),
                };
                mesh.vertices.push(centre);
            }
        }

        if self.params.mirror_y {
            for v in &mut mesh.vertices {
                v.y = -v.y;
            }
        }

        let reverse = self.params.reverses_winding();
        for j in 0..n {
            for i in 0..n {
                let p00 = (j * stride + i) as u32;
                let p10 = p00 + 1;
                let p01 = ((j + 1) * stride + i) as u32;
                let p11 = p01 + 1;
                let pc = (corner_count + j * n + i) as u32;
                if reverse {
                    mesh.indices.push([p00, pc, p10]);
                    mesh.indices.push([p10, pc, p11]);
                    mesh.indices.push([p11, pc, p01]);
                    mesh.indices.push([p01, pc, p00]);
                } else {
                    mesh.indices.push([p00, p10, pc]);
                    mesh.indices.push([p10, p11, pc]);
                    mesh.indices.push([p11, p01, pc]);
                    mesh.indices.push([p01, p00, pc]);
                }
            }
        }

        debug!(
            resolution = n,
            vertices = mesh.vertices.len(),
            faces = mesh.indices.len(),
            reversed = reverse,
            "tessellated patch"
        );

        Ok(mesh)
    }
}

/// Average of the four corners of a cell.
fn bilinear_centre(corners: &[Point3; 4]) -> Point3 {
    let sum = corners[0].coords + corners[1].coords + corners[2].coords + corners[3].coords;
    Point3::from(sum * 0.25)
}

/// Whether any edge of the cell (corners in loop order) has zero length.
fn has_collapsed_edge(corners: &[Point3; 4]) -> bool {
    (0..4).any(|k| (corners[(k + 1) % 4] - corners[k]).norm() < TOLERANCE)
}
