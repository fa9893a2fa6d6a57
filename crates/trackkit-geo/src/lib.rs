//! # Trackkit Geo
//!
//! Geographic measurement and planar projection for trackkit:
//! geodesic distance on the WGS84 ellipsoid (Vincenty inverse, with a
//! great-circle fallback), the proj4-compatible projection subset used
//! by the map shape (Web Mercator and UTM forward transforms), the
//! linear and ring profile projections, and axis-aligned bounds over
//! geographic and planar points.

pub mod bounds;
pub mod geodesy;
pub mod projection;

pub use bounds::{Bounds, GeoBounds};
pub use geodesy::{haversine, haversine_deg, vincenty, vincenty_deg};
pub use projection::{auto_utm_definition, utm_zone, MapProjection, TrackProjection};
