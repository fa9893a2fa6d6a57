//! Track summary statistics.

use serde::Serialize;
use trackkit_core::types::TrackPoint;
use trackkit_geo::geodesy;

/// Derived summary of a parsed track.
#[derive(Debug, Clone, Serialize)]
pub struct TrackInfo {
    /// Track name from the document, or a placeholder.
    pub name: String,
    /// Number of points across all segments.
    pub points: usize,
    /// Total geodesic distance in metres.
    pub total_distance: f64,
    /// Lowest elevation in metres.
    pub min_elevation: f64,
    /// Highest elevation in metres.
    pub max_elevation: f64,
    /// Sum of positive elevation changes in metres.
    pub elevation_gain: f64,
    /// Sum of negative elevation changes in metres, as a positive number.
    pub elevation_loss: f64,
    /// Whether the track appears to carry real elevation data.
    ///
    /// True iff some elevation is neither exactly 0 nor exactly 1,
    /// the sentinel values emitted by recorders without a barometer.
    pub has_elevation: bool,
    /// First point of the track.
    pub start: TrackPoint,
    /// Last point of the track.
    pub end: TrackPoint,
}

impl TrackInfo {
    /// Computes the summary for an ordered, non-empty point sequence.
    pub fn summarize(name: String, points: &[TrackPoint]) -> Self {
        let mut total_distance = 0.0;
        let mut min_elevation = points[0].ele;
        let mut max_elevation = points[0].ele;
        let mut elevation_gain = 0.0;
        let mut elevation_loss = 0.0;
        let mut has_elevation = points[0].ele != 0.0 && points[0].ele != 1.0;

        for pair in points.windows(2) {
            let mut d = geodesy::vincenty(&pair[0], &pair[1]);
            if !d.is_finite() {
                d = geodesy::haversine(&pair[0], &pair[1]);
            }
            total_distance += d;

            let delta = pair[1].ele - pair[0].ele;
            if delta > 0.0 {
                elevation_gain += delta;
            } else {
                elevation_loss -= delta;
            }
            min_elevation = min_elevation.min(pair[1].ele);
            max_elevation = max_elevation.max(pair[1].ele);
            has_elevation |= pair[1].ele != 0.0 && pair[1].ele != 1.0;
        }

        Self {
            name,
            points: points.len(),
            total_distance,
            min_elevation,
            max_elevation,
            elevation_gain,
            elevation_loss,
            has_elevation,
            start: points[0],
            end: points[points.len() - 1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elevation_statistics() {
        let points = [
            TrackPoint::new(8.0, 47.0, 400.0),
            TrackPoint::new(8.001, 47.0, 450.0),
            TrackPoint::new(8.002, 47.0, 430.0),
            TrackPoint::new(8.003, 47.0, 480.0),
        ];
        let info = TrackInfo::summarize("hill".to_string(), &points);
        assert_eq!(info.points, 4);
        assert_eq!(info.min_elevation, 400.0);
        assert_eq!(info.max_elevation, 480.0);
        assert_eq!(info.elevation_gain, 100.0);
        assert_eq!(info.elevation_loss, 20.0);
        assert!(info.has_elevation);
        assert_eq!(info.start, points[0]);
        assert_eq!(info.end, points[3]);
    }

    #[test]
    fn test_sentinel_elevations_not_counted_as_real() {
        let points = [
            TrackPoint::new(8.0, 47.0, 0.0),
            TrackPoint::new(8.001, 47.0, 1.0),
            TrackPoint::new(8.002, 47.0, 0.0),
        ];
        let info = TrackInfo::summarize("flat".to_string(), &points);
        assert!(!info.has_elevation);

        let points = [
            TrackPoint::new(8.0, 47.0, 0.0),
            TrackPoint::new(8.001, 47.0, 2.0),
        ];
        let info = TrackInfo::summarize("notch".to_string(), &points);
        assert!(info.has_elevation);
    }

    #[test]
    fn test_distance_accumulates() {
        // Two equal eastward hops on the equator.
        let points = [
            TrackPoint::new(0.0, 0.0, 0.0),
            TrackPoint::new(0.001, 0.0, 0.0),
            TrackPoint::new(0.002, 0.0, 0.0),
        ];
        let info = TrackInfo::summarize("equator".to_string(), &points);
        assert!((info.total_distance - 2.0 * 111.31949).abs() < 0.01);
    }
}
