//! Triangle mesh container.

use nalgebra::{Point3, Vector3};
use trackkit_geo::bounds::Bounds;

/// An indexed triangle mesh: parallel vertex and triangle arrays.
///
/// Triangles reference the vertex array and wind counter-clockwise
/// when viewed from outside the solid.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Point3<f64>>,
    pub triangles: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            triangles: Vec::with_capacity(triangles),
        }
    }

    /// Appends a vertex and returns its index.
    pub fn push_vertex(&mut self, p: Point3<f64>) -> u32 {
        self.vertices.push(p);
        (self.vertices.len() - 1) as u32
    }

    /// Appends one triangle by vertex indices.
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        debug_assert!((a as usize) < self.vertices.len());
        debug_assert!((b as usize) < self.vertices.len());
        debug_assert!((c as usize) < self.vertices.len());
        self.triangles.push([a, b, c]);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Unit normal of a triangle, or the zero vector for a degenerate
    /// (zero-area) triangle.
    pub fn triangle_normal(&self, index: usize) -> Vector3<f64> {
        let [a, b, c] = self.triangles[index];
        let v0 = self.vertices[a as usize];
        let v1 = self.vertices[b as usize];
        let v2 = self.vertices[c as usize];
        let normal = (v1 - v0).cross(&(v2 - v0));
        let length = normal.norm();
        if length > 0.0 {
            normal / length
        } else {
            Vector3::zeros()
        }
    }

    /// Signed volume via the divergence theorem.
    ///
    /// Positive for a closed mesh with outward-facing winding; a wrong
    /// sign here means the winding is inverted.
    pub fn volume(&self) -> f64 {
        self.triangles
            .iter()
            .map(|&[a, b, c]| {
                let v0 = self.vertices[a as usize].coords;
                let v1 = self.vertices[b as usize].coords;
                let v2 = self.vertices[c as usize].coords;
                v0.dot(&v1.cross(&v2)) / 6.0
            })
            .sum()
    }

    /// Bounding box of the vertex array, if any vertices exist.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut it = self.vertices.iter();
        let first = it.next()?;
        let mut bounds = Bounds::seed(*first);
        for p in it {
            bounds.extend(p);
        }
        Some(bounds)
    }
}
