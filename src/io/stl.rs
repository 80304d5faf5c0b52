use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::math::{Vector3, TOLERANCE};
use crate::tessellation::TriangleSet;

/// Saves a triangle set as an ASCII STL file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_stl<P: AsRef<Path>>(path: P, name: &str, set: &TriangleSet) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_stl_ascii(name, set, &mut writer)?;
    writer.flush()?;
    debug!(path = %path.as_ref().display(), triangles = set.len(), "wrote STL");
    Ok(())
}

/// Writes a triangle set as an ASCII STL solid.
///
/// Facet normals follow the triangle winding. Degenerate triangles get a
/// zero normal.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_stl_ascii<W: Write>(name: &str, set: &TriangleSet, mut writer: W) -> Result<()> {
    writeln!(writer, "solid {name}")?;

    for [v0, v1, v2] in &set.triangles {
        let normal = (v1 - v0).cross(&(v2 - v0));
        let len = normal.norm();
        let n = if len > TOLERANCE {
            normal / len
        } else {
            Vector3::zeros()
        };

        writeln!(writer, "  facet normal {:.6e} {:.6e} {:.6e}", n.x, n.y, n.z)?;
        writeln!(writer, "    outer loop")?;
        for v in [v0, v1, v2] {
            writeln!(writer, "      vertex {:.6e} {:.6e} {:.6e}", v.x, v.y, v.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }

    writeln!(writer, "endsolid {name}")?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;

    #[test]
    fn writes_one_facet_per_triangle() {
        let set = TriangleSet {
            triangles: vec![
                [
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(1.0, 0.0, 0.0),
                    Point3::new(0.0, 1.0, 0.0),
                ],
                [
                    Point3::new(1.0, 0.0, 0.0),
                    Point3::new(1.0, 1.0, 0.0),
                    Point3::new(0.0, 1.0, 0.0),
                ],
            ],
        };
        let mut out = Vec::new();
        write_stl_ascii("wing", &set, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("solid wing\n"));
        assert!(text.trim_end().ends_with("endsolid wing"));
        assert_eq!(text.matches("endfacet").count(), 2);
        assert_eq!(text.matches("      vertex ").count(), 6);
        assert!(text.contains("facet normal 0.000000e0 0.000000e0 1.000000e0"));
    }

    #[test]
    fn degenerate_triangle_gets_zero_normal() {
        let p = Point3::new(1.0, 2.0, 3.0);
        let set = TriangleSet {
            triangles: vec![[p, p, p]],
        };
        let mut out = Vec::new();
        write_stl_ascii("flat", &set, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("facet normal 0.000000e0 0.000000e0 0.000000e0"));
    }
}
