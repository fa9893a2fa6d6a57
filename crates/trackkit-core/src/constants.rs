//! Shared constants for the generation pipeline.

/// Minimum number of track points required for generation.
pub const MIN_TRACK_POINTS: usize = 2;

/// Default printable bed width in millimetres.
pub const DEFAULT_BED_X_MM: f64 = 100.0;

/// Default printable bed depth in millimetres.
pub const DEFAULT_BED_Y_MM: f64 = 100.0;

/// Default ribbon half-width in millimetres.
pub const DEFAULT_BUFFER_MM: f64 = 2.0;

/// Default base thickness under the ribbon in millimetres.
pub const DEFAULT_BASE_MM: f64 = 1.0;

/// Default elevation in metres for points without an `<ele>` tag.
pub const DEFAULT_ELEVATION_M: f64 = 10.0;

/// Smallest accepted printable bed dimension in millimetres.
pub const MIN_BED_MM: f64 = 20.0;

/// Smallest accepted ribbon half-width in millimetres.
pub const MIN_BUFFER_MM: f64 = 0.5;

/// Smallest accepted vertical exaggeration factor.
pub const MIN_VERTICAL: f64 = 1.0;

/// Length of a distance-marker box along the track, in millimetres.
pub const MARKER_LENGTH_MM: f64 = 1.0;

/// Extra size added to a marker box beyond the ribbon cross-section,
/// in millimetres, so the marker protrudes from the ribbon.
pub const MARKER_PADDING_MM: f64 = 2.0;
