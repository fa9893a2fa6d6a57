//! OpenSCAD and OpenJSCAD text renditions of the generated model.
//!
//! Both emitters declare the ribbon as a `polyhedron` naming the
//! vertex and face arrays exactly as the builder emitted them, then
//! union in the marker boxes. Numbers are written with Rust's default
//! float formatting, which round-trips; whitespace is not part of the
//! contract.

use crate::marker::Marker;
use crate::mesh::Mesh;
use trackkit_core::constants::MARKER_LENGTH_MM;

/// Renders an OpenSCAD program: the ribbon polyhedron unioned with one
/// rotated cube per marker.
pub fn render_openscad(mesh: &Mesh, markers: &[Marker]) -> String {
    let mut scad = String::new();
    scad.push_str("// generated by trackkit\n");
    scad.push_str("union() {\n");
    scad.push_str("  polyhedron(\n    points=[\n");
    for p in &mesh.vertices {
        scad.push_str(&format!("      [{}, {}, {}],\n", p.x, p.y, p.z));
    }
    scad.push_str("    ],\n    faces=[\n");
    for [a, b, c] in &mesh.triangles {
        scad.push_str(&format!("      [{}, {}, {}],\n", a, b, c));
    }
    scad.push_str("    ],\n    convexity=10\n  );\n");

    for marker in markers {
        let height = marker.height();
        scad.push_str(&format!(
            "  translate([{}, {}, {}]) rotate([0, 0, {}]) cube([{}, {}, {}], center=true);\n",
            marker.location.x,
            marker.location.y,
            height / 2.0,
            marker.orientation.to_degrees(),
            MARKER_LENGTH_MM,
            marker.width,
            height,
        ));
    }
    scad.push_str("}\n");
    scad
}

/// Renders an OpenJSCAD program. In preview mode only the ribbon
/// polyhedron is returned; otherwise the markers are unioned in.
pub fn render_jscad(mesh: &Mesh, markers: &[Marker], preview: bool) -> String {
    let mut jscad = String::new();
    jscad.push_str("function main() {\n");
    jscad.push_str("  var track = polyhedron({\n    points: [\n");
    for p in &mesh.vertices {
        jscad.push_str(&format!("      [{}, {}, {}],\n", p.x, p.y, p.z));
    }
    jscad.push_str("    ],\n    triangles: [\n");
    for [a, b, c] in &mesh.triangles {
        jscad.push_str(&format!("      [{}, {}, {}],\n", a, b, c));
    }
    jscad.push_str("    ]\n  });\n");

    if preview || markers.is_empty() {
        jscad.push_str("  return track;\n}\n");
        return jscad;
    }

    jscad.push_str("  return union(track");
    for marker in markers {
        let height = marker.height();
        jscad.push_str(&format!(
            ",\n    cube({{size: [{}, {}, {}], center: true}}).rotateZ({}).translate([{}, {}, {}])",
            MARKER_LENGTH_MM,
            marker.width,
            height,
            marker.orientation.to_degrees(),
            marker.location.x,
            marker.location.y,
            height / 2.0,
        ));
    }
    jscad.push_str("\n  );\n}\n");
    jscad
}
