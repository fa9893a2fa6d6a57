//! Forward scan of the raw track.
//!
//! One pass over the raw points produces everything the later phases
//! need: cumulative geodesic distance, the geographic bounds, the
//! interpolated marker positions, the resolved projection, and the
//! smoothed (distance-filtered) point sequence.

use crate::fit::bed_fit;
use std::f64::consts::TAU;
use tracing::{debug, warn};
use trackkit_core::config::{GeneratorConfig, ProjSource, ShapeType, SmoothType};
use trackkit_core::error::GenerateError;
use trackkit_core::types::TrackPoint;
use trackkit_geo::bounds::GeoBounds;
use trackkit_geo::geodesy;
use trackkit_geo::projection::{auto_utm_definition, MapProjection, TrackProjection};

/// Tolerance for the marker-interval comparison; keeps the final
/// marker of an exact division from being lost to rounding.
const MARKER_EPS: f64 = 1e-9;

/// A marker located on the raw track, before projection.
#[derive(Debug, Clone, Copy)]
pub struct RawMarker {
    /// Interpolated geographic location.
    pub point: TrackPoint,
    /// Cumulative raw distance at the marker, in metres.
    pub distance: f64,
    /// Index of the raw point ending the segment the marker lies on.
    pub segment: usize,
}

/// Everything the scan pass derives from the raw points.
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// Total raw geodesic distance in metres.
    pub total_distance: f64,
    /// `total_distance / 2π`, the ring profile radius.
    pub ring_radius: f64,
    /// Geographic bounds over all raw points.
    pub geo_bounds: GeoBounds,
    /// Cumulative raw distance at every raw point; starts at 0.
    pub cumulative: Vec<f64>,
    /// Markers in track order.
    pub markers: Vec<RawMarker>,
    /// The projection every later phase uses.
    pub projection: TrackProjection,
    /// Smoothing threshold in metres that was applied.
    pub min_distance: f64,
    /// Kept (smoothed) points.
    pub kept: Vec<TrackPoint>,
    /// Geodesic distance between consecutive kept points;
    /// `kept_distances[i]` spans `kept[i]` to `kept[i + 1]`.
    pub kept_distances: Vec<f64>,
    /// Sum of the kept distances.
    pub smooth_total: f64,
}

/// Scans the raw points: distances, markers, projection resolution and
/// the distance-threshold smoothing filter.
pub fn scan(points: &[TrackPoint], config: &GeneratorConfig) -> Result<ScanResult, GenerateError> {
    let mut total = 0.0;
    let mut geo_bounds = GeoBounds::seed(&points[0]);
    let mut cumulative = Vec::with_capacity(points.len());
    cumulative.push(0.0);
    let mut markers = Vec::new();

    let interval = config.marker_interval;
    // distance accumulated since the last marker
    let mut since_marker = 0.0;

    for i in 1..points.len() {
        let prev = &points[i - 1];
        let cur = &points[i];
        geo_bounds.extend(cur);
        let seg = segment_distance(prev, cur, i)?;

        if interval > 0.0 && seg > 0.0 {
            // Walk the segment, dropping a marker each time the
            // running distance reaches the interval; the residual
            // carries into the next segment so spacing stays uniform
            // across raw point boundaries.
            let mut used = 0.0;
            while since_marker + (seg - used) + MARKER_EPS >= interval {
                let need = interval - since_marker;
                let t = ((used + need) / seg).min(1.0);
                markers.push(RawMarker {
                    point: prev.lerp(cur, t),
                    distance: total + used + need,
                    segment: i,
                });
                used += need;
                since_marker = 0.0;
            }
            since_marker += seg - used;
        } else if interval > 0.0 {
            since_marker += seg;
        }

        total += seg;
        cumulative.push(total);
    }

    let ring_radius = total / TAU;
    let projection = resolve_projection(config, &geo_bounds, total, ring_radius)?;

    let min_distance = match config.smooth_type {
        SmoothType::Span => config.smooth_span,
        SmoothType::Auto => auto_min_distance(config, &geo_bounds, total, ring_radius),
    };
    debug!(
        total_m = total,
        markers = markers.len(),
        min_distance_m = min_distance,
        "scanned raw track"
    );

    let (kept, kept_distances, smooth_total) = smooth(points, &cumulative, min_distance)?;

    Ok(ScanResult {
        total_distance: total,
        ring_radius,
        geo_bounds,
        cumulative,
        markers,
        projection,
        min_distance,
        kept,
        kept_distances,
        smooth_total,
    })
}

/// Geodesic length of one raw segment.
///
/// A divergent Vincenty solution falls back to the great-circle
/// distance; generation only fails when the fallback is non-finite
/// too.
fn segment_distance(a: &TrackPoint, b: &TrackPoint, segment: usize) -> Result<f64, GenerateError> {
    let d = geodesy::vincenty(a, b);
    if d.is_finite() {
        return Ok(d);
    }
    let fallback = geodesy::haversine(a, b);
    if fallback.is_finite() {
        warn!(segment, "Vincenty iteration diverged, using great-circle distance");
        Ok(fallback)
    } else {
        Err(GenerateError::GeodesyDiverged { segment })
    }
}

fn resolve_projection(
    config: &GeneratorConfig,
    geo_bounds: &GeoBounds,
    total: f64,
    ring_radius: f64,
) -> Result<TrackProjection, GenerateError> {
    match config.shape {
        ShapeType::Linear => Ok(TrackProjection::Linear { total }),
        ShapeType::Ring => Ok(TrackProjection::Ring { radius: ring_radius }),
        ShapeType::Map => {
            let definition = match config.proj_source {
                ProjSource::Google => "GOOGLE".to_string(),
                ProjSource::Custom => config.projection.clone(),
                ProjSource::AutoUtm => {
                    auto_utm_definition(geo_bounds.mid_lon(), geo_bounds.mid_lat())
                }
            };
            debug!(definition = %definition, "resolved map projection");
            Ok(TrackProjection::Map(MapProjection::parse(&definition)?))
        }
    }
}

/// Smoothing threshold derived from a preliminary bed-fit scale:
/// adjacent stations on the final model end up at least one ribbon
/// half-width apart.
fn auto_min_distance(
    config: &GeneratorConfig,
    geo_bounds: &GeoBounds,
    total: f64,
    ring_radius: f64,
) -> f64 {
    let scale = match config.shape {
        ShapeType::Map => {
            // The preliminary extent always comes from the GOOGLE
            // transform, whatever projection was selected.
            let google = MapProjection::WebMercator;
            let corners = geo_bounds.corners().map(|(lon, lat)| google.forward(lon, lat));
            let min_x = corners.iter().map(|c| c.0).fold(f64::INFINITY, f64::min);
            let max_x = corners.iter().map(|c| c.0).fold(f64::NEG_INFINITY, f64::max);
            let min_y = corners.iter().map(|c| c.1).fold(f64::INFINITY, f64::min);
            let max_y = corners.iter().map(|c| c.1).fold(f64::NEG_INFINITY, f64::max);
            bed_fit(config, max_x - min_x, max_y - min_y)
        }
        ShapeType::Linear => bed_fit(config, total, 0.0),
        ShapeType::Ring => bed_fit(config, 2.0 * ring_radius, 2.0 * ring_radius),
    };
    if scale.is_finite() && scale > 0.0 {
        (config.buffer / scale).floor()
    } else {
        0.0
    }
}

/// Distance-threshold filter over the raw points.
///
/// The first point is always kept; each later point is kept iff it
/// lies at least `min_distance` from the last kept point. A trailing
/// point inside the threshold is dropped, except when that would leave
/// fewer than two points, in which case the final raw point is
/// force-kept so the path builder always has a segment.
fn smooth(
    points: &[TrackPoint],
    cumulative: &[f64],
    min_distance: f64,
) -> Result<(Vec<TrackPoint>, Vec<f64>, f64), GenerateError> {
    let mut kept = vec![points[0]];
    let mut distances = Vec::new();
    let mut smooth_total = 0.0;

    if min_distance <= 0.0 {
        for i in 1..points.len() {
            let d = cumulative[i] - cumulative[i - 1];
            kept.push(points[i]);
            distances.push(d);
            smooth_total += d;
        }
        return Ok((kept, distances, smooth_total));
    }

    let mut last = points[0];
    for (i, point) in points.iter().enumerate().skip(1) {
        let d = segment_distance(&last, point, i)?;
        if d >= min_distance {
            kept.push(*point);
            distances.push(d);
            smooth_total += d;
            last = *point;
        }
    }

    if kept.len() < 2 {
        let final_point = points[points.len() - 1];
        let d = segment_distance(&kept[0], &final_point, points.len() - 1)?;
        kept.push(final_point);
        distances.push(d);
        smooth_total += d;
    }

    Ok((kept, distances, smooth_total))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Degrees of longitude on the equator covering `metres`.
    fn lon_for(metres: f64) -> f64 {
        metres / 111_319.490_793
    }

    fn equator_track(step_m: f64, count: usize) -> Vec<TrackPoint> {
        (0..count)
            .map(|i| TrackPoint::new(lon_for(step_m * i as f64), 0.0, 10.0))
            .collect()
    }

    fn linear_config() -> GeneratorConfig {
        GeneratorConfig {
            shape: ShapeType::Linear,
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn test_total_distance_and_ring_radius() {
        let points = equator_track(100.0, 11);
        let result = scan(&points, &linear_config()).unwrap();
        assert!((result.total_distance - 1000.0).abs() < 0.01);
        assert!((result.ring_radius - 1000.0 / TAU).abs() < 0.01);
        assert_eq!(result.cumulative.len(), 11);
        assert!((result.cumulative[5] - 500.0).abs() < 0.01);
    }

    #[test]
    fn test_exact_interval_division_places_all_markers() {
        let points = equator_track(100.0, 11);
        for n in 1..=5 {
            let mut config = linear_config();
            let probe = scan(&points, &config).unwrap();
            config.marker_interval = probe.total_distance / f64::from(n);
            let result = scan(&points, &config).unwrap();
            assert_eq!(result.markers.len(), n as usize, "n = {}", n);
            for (k, marker) in result.markers.iter().enumerate() {
                let expected = probe.total_distance * (k + 1) as f64 / f64::from(n);
                assert!(
                    (marker.distance - expected).abs() < 1e-6,
                    "marker {} at {} expected {}",
                    k,
                    marker.distance,
                    expected
                );
            }
        }
    }

    #[test]
    fn test_residual_carries_across_segments() {
        // 3 segments of 80 m with a 100 m interval: markers at 100 m
        // and 200 m, interpolated inside the second and third segment.
        let points = equator_track(80.0, 4);
        let mut config = linear_config();
        config.marker_interval = 100.0;
        let result = scan(&points, &config).unwrap();
        assert_eq!(result.markers.len(), 2);
        assert!((result.markers[0].distance - 100.0).abs() < 0.01);
        assert!((result.markers[1].distance - 200.0).abs() < 0.01);
        assert_eq!(result.markers[0].segment, 2);
        assert_eq!(result.markers[1].segment, 3);
        // interpolated a quarter into the second segment
        assert!((result.markers[0].point.lon - lon_for(100.0)).abs() < 1e-9);
    }

    #[test]
    fn test_long_segment_yields_multiple_markers() {
        let points = vec![
            TrackPoint::new(0.0, 0.0, 0.0),
            TrackPoint::new(lon_for(350.0), 0.0, 0.0),
        ];
        let mut config = linear_config();
        config.marker_interval = 100.0;
        let result = scan(&points, &config).unwrap();
        assert_eq!(result.markers.len(), 3);
        for (k, marker) in result.markers.iter().enumerate() {
            assert!((marker.distance - 100.0 * (k + 1) as f64).abs() < 0.01);
        }
    }

    #[test]
    fn test_span_smoothing_drops_close_points() {
        let points = vec![
            TrackPoint::new(0.0, 0.0, 0.0),
            TrackPoint::new(lon_for(40.0), 0.0, 0.0),
            TrackPoint::new(lon_for(50.0), 0.0, 0.0),
            TrackPoint::new(lon_for(120.0), 0.0, 0.0),
        ];
        let mut config = linear_config();
        config.smooth_type = SmoothType::Span;
        config.smooth_span = 60.0;
        let result = scan(&points, &config).unwrap();
        assert_eq!(result.kept.len(), 2);
        assert_eq!(result.kept[1], points[3]);
        assert_eq!(result.kept_distances.len(), 1);
        assert!((result.smooth_total - 120.0).abs() < 0.01);
        // no two kept points closer than the span
        for d in &result.kept_distances {
            assert!(*d >= 60.0);
        }
    }

    #[test]
    fn test_trailing_point_dropped_inside_threshold() {
        let points = vec![
            TrackPoint::new(0.0, 0.0, 0.0),
            TrackPoint::new(lon_for(100.0), 0.0, 0.0),
            TrackPoint::new(lon_for(130.0), 0.0, 0.0),
        ];
        let mut config = linear_config();
        config.smooth_type = SmoothType::Span;
        config.smooth_span = 60.0;
        let result = scan(&points, &config).unwrap();
        // the 130 m point is only 30 m past the last kept point
        assert_eq!(result.kept.len(), 2);
        assert_eq!(result.kept[1], points[1]);
    }

    #[test]
    fn test_degenerate_filter_force_keeps_final_point() {
        let points = vec![
            TrackPoint::new(0.0, 0.0, 0.0),
            TrackPoint::new(lon_for(10.0), 0.0, 0.0),
            TrackPoint::new(lon_for(20.0), 0.0, 0.0),
        ];
        let mut config = linear_config();
        config.smooth_type = SmoothType::Span;
        config.smooth_span = 500.0;
        let result = scan(&points, &config).unwrap();
        assert_eq!(result.kept.len(), 2);
        assert_eq!(result.kept[1], points[2]);
    }

    #[test]
    fn test_auto_min_distance_linear() {
        // 111.32 m track on a 100 mm bed with a 5 mm buffer: the fit
        // scale is 90 / 111.32 and the threshold floors to 6 m.
        let points = vec![
            TrackPoint::new(0.0, 0.0, 10.0),
            TrackPoint::new(0.001, 0.0, 10.0),
        ];
        let mut config = linear_config();
        config.buffer = 5.0;
        let result = scan(&points, &config).unwrap();
        assert_eq!(result.min_distance, 6.0);
        assert_eq!(result.kept.len(), 2);
    }

    #[test]
    fn test_projection_resolution_auto_utm() {
        let points = vec![
            TrackPoint::new(-60.001, -30.0, 0.0),
            TrackPoint::new(-59.999, -30.0, 0.0),
        ];
        let mut config = GeneratorConfig::default();
        config.shape = ShapeType::Map;
        config.proj_source = ProjSource::AutoUtm;
        let result = scan(&points, &config).unwrap();
        assert_eq!(
            result.projection,
            TrackProjection::Map(MapProjection::Utm { zone: 21, south: true })
        );
    }

    #[test]
    fn test_unknown_projection_fails_generation() {
        let points = vec![
            TrackPoint::new(0.0, 0.0, 0.0),
            TrackPoint::new(0.001, 0.0, 0.0),
        ];
        let mut config = GeneratorConfig::default();
        config.shape = ShapeType::Map;
        config.proj_source = ProjSource::Custom;
        config.projection = "+proj=robin +lon_0=0".to_string();
        let err = scan(&points, &config).unwrap_err();
        assert!(matches!(err, GenerateError::Projection(_)));
    }
}
