use tracing::warn;

use super::MassProperties;
use crate::error::{GeometryError, Result};
use crate::math::{Matrix3, Point3, TOLERANCE};

/// Weights turning the accumulated face terms into the volume integrals of
/// `1, x, y, z, x^2, y^2, z^2, xy, yz, zx`.
const WEIGHTS: [f64; 10] = [
    1.0 / 6.0,
    1.0 / 24.0,
    1.0 / 24.0,
    1.0 / 24.0,
    1.0 / 60.0,
    1.0 / 60.0,
    1.0 / 60.0,
    1.0 / 120.0,
    1.0 / 120.0,
    1.0 / 120.0,
];

impl MassProperties {
    /// Computes the mass properties of a homogeneous solid bounded by a
    /// closed triangle surface.
    ///
    /// Volume integrals are reduced to sums over the faces with the
    /// divergence theorem, so the result is exact for the polyhedron the
    /// triangles describe. A surface wound inward (negative signed volume)
    /// is treated as if it were wound outward.
    ///
    /// # Errors
    ///
    /// Returns an error if the triangles enclose no volume.
    pub fn from_triangles(triangles: &[[Point3; 3]], density: f64) -> Result<Self> {
        let mut intg = [0.0_f64; 10];
        for tri in triangles {
            accumulate(&mut intg, tri);
        }
        for (value, weight) in intg.iter_mut().zip(WEIGHTS) {
            *value *= weight;
        }

        if intg[0].abs() < TOLERANCE {
            return Err(GeometryError::Degenerate(format!(
                "{} triangles enclose no volume",
                triangles.len()
            ))
            .into());
        }
        if intg[0] < 0.0 {
            warn!(volume = intg[0], "surface is wound inward, reversing");
            for value in &mut intg {
                *value = -*value;
            }
        }

        let volume = intg[0];
        let cog = Point3::new(intg[1] / volume, intg[2] / volume, intg[3] / volume);
        let (cx, cy, cz) = (cog.x, cog.y, cog.z);

        let ixx = intg[5] + intg[6] - volume * (cy * cy + cz * cz);
        let iyy = intg[4] + intg[6] - volume * (cz * cz + cx * cx);
        let izz = intg[4] + intg[5] - volume * (cx * cx + cy * cy);
        let ixy = -(intg[7] - volume * cx * cy);
        let iyz = -(intg[8] - volume * cy * cz);
        let ixz = -(intg[9] - volume * cz * cx);

        #[rustfmt::skip]
        let inertia = Matrix3::new(
            ixx, ixy, ixz,
            ixy, iyy, iyz,
            ixz, iyz, izz,
        ) * density;

        Ok(Self {
            volume,
            mass: volume * density,
            cog,
            inertia,
        })
    }
}

#[allow(clippy::many_single_char_names, clippy::similar_names)]
fn accumulate(intg: &mut [f64; 10], [p0, p1, p2]: &[Point3; 3]) {
    let (x0, y0, z0) = (p0.x, p0.y, p0.z);
    let (x1, y1, z1) = (p1.x, p1.y, p1.z);
    let (x2, y2, z2) = (p2.x, p2.y, p2.z);

    let (a1, b1, c1) = (x1 - x0, y1 - y0, z1 - z0);
    let (a2, b2, c2) = (x2 - x0, y2 - y0, z2 - z0);
    let d0 = b1 * c2 - b2 * c1;
    let d1 = a2 * c1 - a1 * c2;
    let d2 = a1 * b2 - a2 * b1;

    let x = subexpressions(x0, x1, x2);
    let y = subexpressions(y0, y1, y2);
    let z = subexpressions(z0, z1, z2);

    intg[0] += d0 * x.f1;
    intg[1] += d0 * x.f2;
    intg[2] += d1 * y.f2;
    intg[3] += d2 * z.f2;
    intg[4] += d0 * x.f3;
    intg[5] += d1 * y.f3;
    intg[6] += d2 * z.f3;
    intg[7] += d0 * (y0 * x.g0 + y1 * x.g1 + y2 * x.g2);
    intg[8] += d1 * (z0 * y.g0 + z1 * y.g1 + z2 * y.g2);
    intg[9] += d2 * (x0 * z.g0 + x1 * z.g1 + x2 * z.g2);
}

/// Per-coordinate polynomial terms of one face.
struct Terms {
    f1: f64,
    f2: f64,
    f3: f64,
    g0: f64,
    g1: f64,
    g2: f64,
}

fn subexpressions(w0: f64, w1: f64, w2: f64) -> Terms {
    let t0 = w0 + w1;
    let f1 = t0 + w2;
    let t1 = w0 * w0;
    let t2 = t1 + w1 * t0;
    let f2 = t2 + w2 * f1;
    let f3 = w0 * t1 + w1 * t2 + w2 * f2;
    Terms {
        f1,
        f2,
        f3,
        g0: f2 + w0 * (f1 + w0),
        g1: f2 + w1 * (f1 + w1),
        g2: f2 + w2 * (f1 + w2),
    }
}
