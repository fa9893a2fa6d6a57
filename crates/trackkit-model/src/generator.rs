//! Generation orchestrator.
//!
//! Drives the pipeline phases in order on one thread, reporting each
//! boundary to the optional progress callback, and returns the
//! [`TrackModel`] artifact. On failure exactly one error comes back
//! and no partial artifact exists.

use crate::fit::{elevation_of, project_track, FitTransform};
use crate::marker::{marker_mesh, Marker};
use crate::mesh::Mesh;
use crate::path::build_ribbon;
use crate::scad;
use crate::scanner::{scan, ScanResult};
use crate::stl::write_binary_stl;
use nalgebra::Point3;
use tracing::info;
use trackkit_core::config::GeneratorConfig;
use trackkit_core::constants::{MARKER_PADDING_MM, MIN_TRACK_POINTS};
use trackkit_core::error::GenerateError;
use trackkit_core::progress::GeneratePhase;
use trackkit_core::types::TrackPoint;
use trackkit_geo::bounds::Bounds;

const STL_BANNER: &str = concat!("trackkit ", env!("CARGO_PKG_VERSION"));

/// Printable bed dimensions carried on the artifact, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bed {
    pub x: f64,
    pub y: f64,
}

/// The generation artifact.
///
/// Owns the ribbon mesh, the markers and the fit bookkeeping; holds no
/// references back into the generation context.
#[derive(Debug, Clone)]
pub struct TrackModel {
    /// The closed ribbon solid, in model millimetres.
    pub mesh: Mesh,
    /// Distance markers, separate solids alongside the ribbon.
    pub markers: Vec<Marker>,
    /// Planar bounds after projection, before fitting.
    pub bounds: Bounds,
    /// Total raw geodesic track distance in metres.
    pub total_distance: f64,
    /// Planar fit scale, model millimetres per projected metre.
    pub scale: f64,
    /// The configured bed.
    pub bed: Bed,
}

impl TrackModel {
    /// Ribbon vertices for an external previewer.
    pub fn raw_points(&self) -> &[Point3<f64>] {
        &self.mesh.vertices
    }

    /// Ribbon triangle indices for an external previewer. No normals
    /// are exposed; previewers derive their own.
    pub fn raw_faces(&self) -> &[[u32; 3]] {
        &self.mesh.triangles
    }

    /// Serializes the ribbon and the marker boxes as one binary STL
    /// buffer; markers stay separate shells in the soup.
    pub fn to_stl(&self) -> Vec<u8> {
        let marker_solids: Vec<Mesh> = self.markers.iter().map(marker_mesh).collect();
        let mut solids: Vec<&Mesh> = Vec::with_capacity(1 + marker_solids.len());
        solids.push(&self.mesh);
        solids.extend(marker_solids.iter());
        write_binary_stl(&solids, STL_BANNER)
    }

    /// Renders the model as an OpenSCAD program.
    pub fn to_openscad(&self) -> String {
        scad::render_openscad(&self.mesh, &self.markers)
    }

    /// Renders the model as an OpenJSCAD program. With `preview` only
    /// the ribbon polyhedron is emitted; otherwise the markers are
    /// unioned in.
    pub fn to_jscad(&self, preview: bool) -> String {
        scad::render_jscad(&self.mesh, &self.markers, preview)
    }
}

/// Runs the full pipeline over parsed track points.
///
/// Inputs are not mutated. The progress callback is invoked at each
/// phase boundary from the calling thread and is never synchronised
/// with; generation runs to completion or fails, there is no
/// cancellation.
pub fn generate(
    points: &[TrackPoint],
    config: &GeneratorConfig,
    progress: Option<&dyn Fn(GeneratePhase)>,
) -> Result<TrackModel, GenerateError> {
    config.validate()?;
    if points.len() < MIN_TRACK_POINTS {
        return Err(GenerateError::InvalidOption {
            option: "points",
            reason: format!(
                "{} track point(s) supplied, at least {} required",
                points.len(),
                MIN_TRACK_POINTS
            ),
        });
    }
    let report = |phase: GeneratePhase| {
        if let Some(callback) = progress {
            callback(phase);
        }
    };

    let scanned = scan(points, config)?;
    report(GeneratePhase::Scan);

    let projected = project_track(&scanned, config);
    let planar_markers = project_markers(&scanned, points, config);
    report(GeneratePhase::Project);

    let fit = FitTransform::from_bounds(&projected.bounds, &scanned.geo_bounds, config);
    let stations: Vec<Point3<f64>> = projected.points.iter().map(|p| fit.apply(p)).collect();
    let markers: Vec<Marker> = planar_markers
        .into_iter()
        .map(|(location, orientation)| Marker {
            location: fit.apply(&location),
            orientation,
            width: 2.0 * config.buffer + MARKER_PADDING_MM,
        })
        .collect();
    report(GeneratePhase::Fit);

    let mesh = build_ribbon(&stations, config.buffer);
    report(GeneratePhase::Build);

    info!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        markers = markers.len(),
        distance_m = scanned.total_distance,
        "generated track model"
    );

    let model = TrackModel {
        mesh,
        markers,
        bounds: projected.bounds,
        total_distance: scanned.total_distance,
        scale: fit.scale,
        bed: Bed {
            x: config.bed_x,
            y: config.bed_y,
        },
    };
    report(GeneratePhase::Done);
    Ok(model)
}

/// Projects the raw markers and derives their headings.
///
/// Marker positions interpolate along the original geometry, so their
/// distance ratios come from the raw cumulative distances, not the
/// smoothed ones. The heading is the angle of the projected segment
/// the marker lies on.
fn project_markers(
    scanned: &ScanResult,
    points: &[TrackPoint],
    config: &GeneratorConfig,
) -> Vec<(Point3<f64>, f64)> {
    let total = scanned.total_distance;
    scanned
        .markers
        .iter()
        .map(|raw| {
            let ratio = if total > 0.0 { raw.distance / total } else { 0.0 };
            let location = scanned
                .projection
                .project(&elevation_of(&raw.point, config), ratio);

            let start = &points[raw.segment - 1];
            let end = &points[raw.segment];
            let start_ratio = if total > 0.0 {
                scanned.cumulative[raw.segment - 1] / total
            } else {
                0.0
            };
            let end_ratio = if total > 0.0 {
                scanned.cumulative[raw.segment] / total
            } else {
                0.0
            };
            let from = scanned
                .projection
                .project(&elevation_of(start, config), start_ratio);
            let to = scanned
                .projection
                .project(&elevation_of(end, config), end_ratio);
            let orientation = (to.y - from.y).atan2(to.x - from.x);

            (location, orientation)
        })
        .collect()
}
