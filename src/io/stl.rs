use crate::mesh::Mesh;
use std::fmt::Write;
use std::io::Cursor;

impl Mesh {
    /// Convert this Mesh to an **ASCII STL** string with the given `name`.
    ///
    /// ```rust
    /// # use tpms::{Tpms, TpmsConfig};
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let tpms = Tpms::new(TpmsConfig::default().with_resolution(10))?;
    /// let text = tpms.sheet()?.to_stl_ascii("gyroid_sheet");
    /// assert!(text.starts_with("solid gyroid_sheet"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn to_stl_ascii(&self, name: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "solid {name}");
        for (tri, n) in self.triangle_points().zip(self.face_normals()) {
            let _ = writeln!(out, "  facet normal {:.6} {:.6} {:.6}", n.x, n.y, n.z);
            out.push_str("    outer loop\n");
            for p in &tri {
                let _ = writeln!(out, "      vertex {:.6} {:.6} {:.6}", p.x, p.y, p.z);
            }
            out.push_str("    endloop\n");
            out.push_str("  endfacet\n");
        }
        let _ = writeln!(out, "endsolid {name}");
        out
    }

    /// Convert this Mesh to a **binary STL** byte vector.
    ///
    /// Binary STL has no room for a name; `_name` mirrors [`Mesh::to_stl_ascii`].
    pub fn to_stl_binary(&self, _name: &str) -> std::io::Result<Vec<u8>> {
        use stl_io::{Normal, Triangle, Vertex, write_stl};

        #[allow(clippy::unnecessary_cast)]
        let triangles: Vec<Triangle> = self
            .triangle_points()
            .zip(self.face_normals())
            .map(|(tri, n)| Triangle {
                normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: tri.map(|p| Vertex::new([p.x as f32, p.y as f32, p.z as f32])),
            })
            .collect();

        let mut cursor = Cursor::new(Vec::new());
        write_stl(&mut cursor, triangles.iter())?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use crate::mesh::tests::cuboid;
    use std::io::Cursor;

    #[test]
    fn test_ascii_stl_layout() {
        let text = cuboid(1.0, 1.0, 1.0).to_stl_ascii("box");
        assert!(text.starts_with("solid box\n"));
        assert!(text.ends_with("endsolid box\n"));
        assert_eq!(text.matches("facet normal").count(), 12);
        assert_eq!(text.matches("vertex ").count(), 36);
    }

    #[test]
    fn test_binary_stl_reads_back() {
        let mesh = cuboid(1.0, 2.0, 3.0);
        let bytes = mesh.to_stl_binary("box").unwrap();
        assert_eq!(bytes.len(), 84 + 50 * 12);

        let read = stl_io::read_stl(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(read.faces.len(), 12);
        assert_eq!(read.vertices.len(), 8);
    }
}
