//! Binary STL serialization.
//!
//! Layout: an 80-byte zero-padded ASCII banner, a little-endian u32
//! triangle count, then one 50-byte record per triangle (unit normal
//! and three vertices as f32 triples, plus a zero attribute count).
//! The total size is `84 + 50 * N`, known before a byte is written.

use crate::mesh::Mesh;
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;

/// Size of the fixed STL header in bytes.
pub const STL_HEADER_LEN: usize = 80;

/// Size of one triangle record in bytes.
pub const STL_TRIANGLE_LEN: usize = 50;

/// Serializes the given solids into one binary STL buffer.
///
/// Each mesh contributes its triangles in order; shells stay separate
/// triangle soups, nothing is unioned. Degenerate triangles get the
/// zero normal.
pub fn write_binary_stl(solids: &[&Mesh], banner: &str) -> Vec<u8> {
    fn ser(solids: &[&Mesh], banner: &str) -> std::io::Result<Vec<u8>> {
        let count: usize = solids.iter().map(|m| m.triangle_count()).sum();
        let mut wtr = Vec::with_capacity(STL_HEADER_LEN + 4 + STL_TRIANGLE_LEN * count);

        let mut header = [0u8; STL_HEADER_LEN];
        let banner = banner.as_bytes();
        let len = banner.len().min(STL_HEADER_LEN);
        header[..len].copy_from_slice(&banner[..len]);
        wtr.write_all(&header)?;
        wtr.write_u32::<LittleEndian>(count as u32)?;

        for mesh in solids {
            for (index, triangle) in mesh.triangles.iter().enumerate() {
                let normal = mesh.triangle_normal(index);
                wtr.write_f32::<LittleEndian>(normal.x as f32)?;
                wtr.write_f32::<LittleEndian>(normal.y as f32)?;
                wtr.write_f32::<LittleEndian>(normal.z as f32)?;
                for &vertex in triangle {
                    let p = mesh.vertices[vertex as usize];
                    wtr.write_f32::<LittleEndian>(p.x as f32)?;
                    wtr.write_f32::<LittleEndian>(p.y as f32)?;
                    wtr.write_f32::<LittleEndian>(p.z as f32)?;
                }
                wtr.write_u16::<LittleEndian>(0)?;
            }
        }

        Ok(wtr)
    }

    ser(solids, banner).expect("serialization should not fail when writing to a memory buffer")
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::ReadBytesExt;
    use nalgebra::Point3;

    fn single_triangle() -> Mesh {
        let mut mesh = Mesh::new();
        let a = mesh.push_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.push_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = mesh.push_vertex(Point3::new(0.0, 1.0, 0.0));
        mesh.push_triangle(a, b, c);
        mesh
    }

    #[test]
    fn test_byte_length_known_a_priori() {
        let mesh = single_triangle();
        let bytes = write_binary_stl(&[&mesh], "trackkit test");
        assert_eq!(bytes.len(), 84 + 50);

        let two = [&mesh, &mesh];
        let bytes = write_binary_stl(&two, "trackkit test");
        assert_eq!(bytes.len(), 84 + 100);
    }

    #[test]
    fn test_triangle_count_at_offset_80() {
        let mesh = single_triangle();
        let bytes = write_binary_stl(&[&mesh, &mesh], "x");
        let mut slice = &bytes[80..84];
        assert_eq!(slice.read_u32::<LittleEndian>().unwrap(), 2);
    }

    #[test]
    fn test_banner_padded_and_truncated() {
        let mesh = single_triangle();
        let bytes = write_binary_stl(&[&mesh], "hi");
        assert_eq!(&bytes[..2], b"hi");
        assert!(bytes[2..80].iter().all(|&b| b == 0));

        let long = "x".repeat(200);
        let bytes = write_binary_stl(&[&mesh], &long);
        assert_eq!(bytes.len(), 84 + 50);
        assert!(bytes[..80].iter().all(|&b| b == b'x'));
    }

    #[test]
    fn test_normals_are_unit_vectors() {
        let mesh = single_triangle();
        let bytes = write_binary_stl(&[&mesh], "");
        let mut slice = &bytes[84..96];
        let nx = slice.read_f32::<LittleEndian>().unwrap();
        let ny = slice.read_f32::<LittleEndian>().unwrap();
        let nz = slice.read_f32::<LittleEndian>().unwrap();
        let norm = (nx * nx + ny * ny + nz * nz).sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
        assert!((nz - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_triangle_gets_zero_normal() {
        let mut mesh = Mesh::new();
        let a = mesh.push_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.push_vertex(Point3::new(1.0, 0.0, 0.0));
        mesh.push_triangle(a, b, a);
        let bytes = write_binary_stl(&[&mesh], "");
        let mut slice = &bytes[84..96];
        for _ in 0..3 {
            assert_eq!(slice.read_f32::<LittleEndian>().unwrap(), 0.0);
        }
    }

    #[test]
    fn test_vertices_round_trip() {
        let mesh = single_triangle();
        let bytes = write_binary_stl(&[&mesh], "");
        let mut slice = &bytes[96..132];
        let mut read = || slice.read_f32::<LittleEndian>().unwrap();
        assert_eq!([read(), read(), read()], [0.0, 0.0, 0.0]);
        assert_eq!([read(), read(), read()], [1.0, 0.0, 0.0]);
        assert_eq!([read(), read(), read()], [0.0, 1.0, 0.0]);
        // attribute byte count closes the record
        assert_eq!(&bytes[132..134], &[0, 0]);
    }
}
