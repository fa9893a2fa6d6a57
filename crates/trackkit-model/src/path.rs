//! Ribbon construction.
//!
//! Walks the fitted path stations and extrudes a closed solid: four
//! vertices per accepted station (the lower and upper pair of a mitred
//! cross-section), bridged by eight triangles per segment plus a cap
//! at each end. Vertex winding is counter-clockwise viewed from
//! outside throughout.

use crate::mesh::Mesh;
use nalgebra::Point3;
use std::f64::consts::FRAC_PI_2;
use tracing::debug;

/// A turn is "acute" in the collapse test when the heading change
/// exceeds a quarter turn but is not a wrapped near-zero turn.
fn is_acute(rel: f64) -> bool {
    let a = rel.abs();
    a > FRAC_PI_2 && a < 3.0 * FRAC_PI_2
}

/// Builds the closed ribbon solid over fitted stations.
///
/// `buffer` is the ribbon half-width in model millimetres. Stations
/// whose incoming and outgoing turns are both acute are skipped
/// (oscillating segment pairs would self-intersect); the first and
/// last stations are never skipped. Requires at least two stations.
pub fn build_ribbon(stations: &[Point3<f64>], buffer: f64) -> Mesh {
    let n = stations.len();
    debug_assert!(n >= 2, "ribbon needs at least two stations");

    // Heading of the outgoing segment per station; the final station
    // repeats the incoming heading.
    let mut angles = vec![0.0; n];
    for i in 0..n {
        angles[i] = if i + 1 < n {
            let d = stations[i + 1] - stations[i];
            d.y.atan2(d.x)
        } else {
            angles[i - 1]
        };
    }
    let rel = |i: usize| if i == 0 { 0.0 } else { angles[i] - angles[i - 1] };

    let mut mesh = Mesh::with_capacity(n * 4, 4 + 8 * (n - 1));
    let mut accepted = 0usize;

    for i in 0..n {
        let r = rel(i);
        if i > 0 && i + 1 < n && is_acute(r) && is_acute(rel(i + 1)) {
            continue;
        }

        // Cross-section along the bisector of the incoming and
        // outgoing headings, offset by the mitre length. The clamp
        // bounds the spike a near-reversal would otherwise produce.
        let joint = if i == 0 { angles[0] } else { angles[i - 1] + r / 2.0 };
        let mut jointr = buffer / (r / 2.0).cos();
        if jointr.abs() > 2.0 * buffer {
            jointr = 2.0 * buffer * jointr.signum();
        }

        let (sin_joint, cos_joint) = joint.sin_cos();
        let station = stations[i];
        let lx = station.x + jointr * sin_joint;
        let ly = station.y - jointr * cos_joint;
        let rx = station.x - jointr * sin_joint;
        let ry = station.y + jointr * cos_joint;

        mesh.push_vertex(Point3::new(lx, ly, 0.0));
        mesh.push_vertex(Point3::new(rx, ry, 0.0));
        mesh.push_vertex(Point3::new(lx, ly, station.z));
        mesh.push_vertex(Point3::new(rx, ry, station.z));

        if accepted == 0 {
            mesh.push_triangle(0, 2, 3);
            mesh.push_triangle(3, 1, 0);
        } else {
            bridge_quads(&mut mesh, ((accepted - 1) * 4) as u32);
        }
        accepted += 1;
    }

    let base = ((accepted - 1) * 4) as u32;
    mesh.push_triangle(base + 2, base + 1, base + 3);
    mesh.push_triangle(base + 2, base, base + 1);

    if accepted < n {
        debug!(skipped = n - accepted, "collapsed oscillating stations");
    }
    mesh
}

/// Emits the eight triangles joining the quad at `base` to the quad at
/// `base + 4`: top, left, right and bottom strips, two triangles each.
fn bridge_quads(mesh: &mut Mesh, base: u32) {
    let i = base;
    mesh.push_triangle(i + 2, i + 6, i + 3);
    mesh.push_triangle(i + 3, i + 6, i + 7);
    mesh.push_triangle(i + 3, i + 7, i + 5);
    mesh.push_triangle(i + 3, i + 5, i + 1);
    mesh.push_triangle(i + 6, i + 2, i);
    mesh.push_triangle(i + 6, i, i + 4);
    mesh.push_triangle(i, i + 5, i + 4);
    mesh.push_triangle(i, i + 1, i + 5);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_for_straight_path() {
        let stations = [
            Point3::new(0.0, 0.0, 8.0),
            Point3::new(25.0, 0.0, 8.0),
            Point3::new(50.0, 0.0, 8.0),
        ];
        let mesh = build_ribbon(&stations, 5.0);
        assert_eq!(mesh.vertex_count(), 12);
        assert_eq!(mesh.triangle_count(), 2 + 2 + 8 * 2);
        for t in &mesh.triangles {
            for &i in t {
                assert!((i as usize) < mesh.vertex_count());
            }
        }
    }

    #[test]
    fn test_straight_ribbon_is_a_box() {
        let stations = [Point3::new(0.0, 0.0, 8.0), Point3::new(50.0, 0.0, 8.0)];
        let mesh = build_ribbon(&stations, 5.0);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 12);

        let bounds = mesh.bounds().unwrap();
        assert!((bounds.width() - 50.0).abs() < 1e-12);
        assert!((bounds.depth() - 10.0).abs() < 1e-12);
        assert!((bounds.max.z - 8.0).abs() < 1e-12);
        assert!(bounds.min.z.abs() < 1e-12);

        // positive volume doubles as a winding check
        assert!((mesh.volume() - 50.0 * 10.0 * 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_right_angle_mitre() {
        let stations = [
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(10.0, 0.0, 1.0),
            Point3::new(10.0, 10.0, 1.0),
        ];
        let mesh = build_ribbon(&stations, 1.0);
        assert_eq!(mesh.vertex_count(), 12);

        // corner cross-section sits sqrt(2) * buffer from the station
        // along the bisector normal
        let corner = Point3::new(10.0, 0.0, 0.0);
        let lower_left = mesh.vertices[4];
        let lower_right = mesh.vertices[5];
        let offset = 2.0_f64.sqrt();
        assert!(((lower_left - corner).norm() - offset).abs() < 1e-12);
        assert!(((lower_right - corner).norm() - offset).abs() < 1e-12);
        assert!((lower_left.x - 11.0).abs() < 1e-12);
        assert!((lower_left.y + 1.0).abs() < 1e-12);
        assert!((lower_right.x - 9.0).abs() < 1e-12);
        assert!((lower_right.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_mitre_clamped_at_sharp_turn() {
        // a 170 degree turn would put the mitre ~11.5 buffers out
        let stations = [
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(10.0, 0.0, 1.0),
            Point3::new(0.15, 0.9, 1.0),
            Point3::new(-10.0, 1.0, 1.0),
        ];
        let mesh = build_ribbon(&stations, 1.0);
        // every cross-section vertex stays within the 2 * buffer clamp
        // of some station
        for v in &mesh.vertices {
            let nearest = stations
                .iter()
                .map(|s| (Point3::new(v.x, v.y, 0.0) - Point3::new(s.x, s.y, 0.0)).norm())
                .fold(f64::INFINITY, f64::min);
            assert!(nearest <= 2.0 + 1e-9, "vertex {:?} at {}", v, nearest);
        }
    }

    #[test]
    fn test_oscillating_station_collapsed() {
        // zig-zag: the second station reverses and the third reverses
        // back, so the second is dropped
        let stations = [
            Point3::new(0.0, 0.0, 5.0),
            Point3::new(10.0, 0.0, 5.0),
            Point3::new(0.0, 0.5, 5.0),
            Point3::new(10.0, 1.0, 5.0),
        ];
        let mesh = build_ribbon(&stations, 1.0);
        // three cross-sections, not four
        assert_eq!(mesh.vertex_count(), 12);
        assert_eq!(mesh.triangle_count(), 2 + 2 + 8 * 2);
        // the surviving middle cross-section belongs to the third
        // station, not the dropped second one at (10, 0)
        assert!((mesh.vertices[4].y - 0.5).abs() < 1.5);
        assert!(mesh.vertices[4].x < 5.0);
    }

    #[test]
    fn test_last_station_never_skipped() {
        // reversal right at the end: the final station stays
        let stations = [
            Point3::new(0.0, 0.0, 5.0),
            Point3::new(10.0, 0.0, 5.0),
            Point3::new(0.0, 0.5, 5.0),
        ];
        let mesh = build_ribbon(&stations, 1.0);
        assert_eq!(mesh.vertex_count(), 12);
    }
}
