//! Distance markers.
//!
//! A marker is a small oriented box standing on the base plane,
//! slightly taller and wider than the ribbon so it reads on the
//! printed model. Markers are separate solids: they ride alongside
//! the ribbon in the artifact and are never merged into it.

use crate::mesh::Mesh;
use crate::path::build_ribbon;
use nalgebra::Point3;
use trackkit_core::constants::{MARKER_LENGTH_MM, MARKER_PADDING_MM};

/// A distance marker in model coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Marker {
    /// Fitted location; z is the ribbon height at the marker.
    pub location: Point3<f64>,
    /// Heading of the track segment the marker falls on, radians.
    pub orientation: f64,
    /// Box width across the track, `2 * buffer + 2` mm.
    pub width: f64,
}

impl Marker {
    /// Height of the marker box: ribbon height plus the padding.
    pub fn height(&self) -> f64 {
        self.location.z + MARKER_PADDING_MM
    }
}

/// Builds the oriented box solid for one marker.
///
/// The box is a two-station ribbon: the stations sit half a marker
/// length either side of the location along its heading, the ribbon
/// half-width is half the marker width, and the shared station height
/// is the box height. That yields the same closed 8-vertex,
/// 12-triangle solid with outward winding.
pub fn marker_mesh(marker: &Marker) -> Mesh {
    let height = marker.height();
    let (sin_o, cos_o) = marker.orientation.sin_cos();
    let half = MARKER_LENGTH_MM / 2.0;
    let stations = [
        Point3::new(
            marker.location.x - half * cos_o,
            marker.location.y - half * sin_o,
            height,
        ),
        Point3::new(
            marker.location.x + half * cos_o,
            marker.location.y + half * sin_o,
            height,
        ),
    ];
    build_ribbon(&stations, marker.width / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_box_dimensions() {
        let marker = Marker {
            location: Point3::new(10.0, -4.0, 6.0),
            orientation: 0.0,
            width: 12.0,
        };
        let mesh = marker_mesh(&marker);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 12);

        let bounds = mesh.bounds().unwrap();
        assert!((bounds.width() - MARKER_LENGTH_MM).abs() < 1e-12);
        assert!((bounds.depth() - 12.0).abs() < 1e-12);
        assert!(bounds.min.z.abs() < 1e-12);
        assert!((bounds.max.z - 8.0).abs() < 1e-12);
        assert!((mesh.volume() - 1.0 * 12.0 * 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_marker_rotates_with_orientation() {
        let marker = Marker {
            location: Point3::new(0.0, 0.0, 4.0),
            orientation: std::f64::consts::FRAC_PI_2,
            width: 6.0,
        };
        let bounds = marker_mesh(&marker).bounds().unwrap();
        // a quarter turn swaps the footprint axes
        assert!((bounds.width() - 6.0).abs() < 1e-12);
        assert!((bounds.depth() - MARKER_LENGTH_MM).abs() < 1e-12);
    }
}
