//! GPX document parsing.

use crate::info::TrackInfo;
use tracing::debug;
use trackkit_core::constants::MIN_TRACK_POINTS;
use trackkit_core::error::GpxError;
use trackkit_core::types::TrackPoint;

/// Parses a GPX document into ordered track points and a summary.
///
/// Reads the first `<trk>` element and concatenates the points of all
/// its `<trkseg>` children in document order. A point's elevation is
/// the text of its `<ele>` child, or `default_elevation` when the tag
/// is absent; with `force_default` every elevation becomes
/// `default_elevation` regardless of the document.
///
/// Errors are mutually exclusive with success:
/// [`GpxError::MalformedXml`] when the reader rejects the input,
/// [`GpxError::NoTrack`] when no `<trk>` is present, and
/// [`GpxError::TooFewPoints`] below two points.
pub fn parse_gpx(
    text: &str,
    default_elevation: f64,
    force_default: bool,
) -> Result<(Vec<TrackPoint>, TrackInfo), GpxError> {
    let document = gpx::read(text.as_bytes()).map_err(|e| GpxError::MalformedXml {
        reason: e.to_string(),
    })?;

    let track = document.tracks.first().ok_or(GpxError::NoTrack)?;
    let name = track
        .name
        .clone()
        .unwrap_or_else(|| "track".to_string());

    let mut points = Vec::new();
    for segment in &track.segments {
        for waypoint in &segment.points {
            let position = waypoint.point();
            let ele = if force_default {
                default_elevation
            } else {
                waypoint.elevation.unwrap_or(default_elevation)
            };
            points.push(TrackPoint::new(position.x(), position.y(), ele));
        }
    }

    if points.len() < MIN_TRACK_POINTS {
        return Err(GpxError::TooFewPoints {
            found: points.len(),
        });
    }

    debug!(
        name = %name,
        points = points.len(),
        segments = track.segments.len(),
        "parsed GPX track"
    );

    let info = TrackInfo::summarize(name, &points);
    Ok((points, info))
}
