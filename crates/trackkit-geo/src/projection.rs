//! Planar projection of geographic coordinates.
//!
//! The map shape uses a proj4-compatible forward transform. Only the
//! definitions the pipeline can emit are supported: the "GOOGLE"
//! sentinel (spherical Web Mercator) and WGS84 UTM zones; anything
//! else is rejected with [`GeoError::UnknownProjection`]. The linear
//! and ring shapes are profile projections driven by cumulative
//! distance rather than a cartographic transform.

use crate::geodesy::{WGS84_A, WGS84_F};
use nalgebra::Point3;
use std::f64::consts::{FRAC_PI_4, TAU};
use trackkit_core::error::GeoError;
use trackkit_core::types::TrackPoint;

/// UTM scale factor on the central meridian.
const UTM_K0: f64 = 0.9996;
/// UTM false easting in metres.
const UTM_FALSE_EASTING: f64 = 500_000.0;
/// UTM false northing for the southern hemisphere in metres.
const UTM_FALSE_NORTHING: f64 = 10_000_000.0;

/// A cartographic forward transform selected from a proj4-style
/// definition string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapProjection {
    /// Spherical Web Mercator on the WGS84 semi-major axis
    /// (the "GOOGLE" sentinel, `+proj=merc`).
    WebMercator,
    /// WGS84 Universal Transverse Mercator, one 6-degree zone.
    Utm { zone: u8, south: bool },
}

impl MapProjection {
    /// Parses a proj4-style definition.
    ///
    /// Accepts the `GOOGLE` sentinel, `+proj=merc …` and
    /// `+proj=utm +zone=<1..60> [+south] …`; all other definitions
    /// fail with [`GeoError::UnknownProjection`].
    pub fn parse(definition: &str) -> Result<Self, GeoError> {
        let def = definition.trim();
        if def == "GOOGLE" {
            return Ok(Self::WebMercator);
        }

        let unknown = || GeoError::UnknownProjection {
            definition: definition.to_string(),
        };

        let mut proj = None;
        let mut zone = None;
        let mut south = false;
        for token in def.split_whitespace() {
            let token = token.strip_prefix('+').ok_or_else(unknown)?;
            match token.split_once('=') {
                Some(("proj", value)) => proj = Some(value),
                Some(("zone", value)) => {
                    zone = Some(value.parse::<u8>().map_err(|_| unknown())?)
                }
                _ if token == "south" => south = true,
                // +ellps, +datum, +units, +no_defs and friends carry no
                // information for the supported transforms
                _ => {}
            }
        }

        match proj {
            Some("merc") => Ok(Self::WebMercator),
            Some("utm") => match zone {
                Some(zone @ 1..=60) => Ok(Self::Utm { zone, south }),
                _ => Err(unknown()),
            },
            _ => Err(unknown()),
        }
    }

    /// Forward transform of (lon, lat) in degrees to planar metres.
    pub fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        match *self {
            Self::WebMercator => web_mercator_forward(lon, lat),
            Self::Utm { zone, south } => utm_forward(zone, south, lon, lat),
        }
    }
}

/// UTM zone containing a longitude.
pub fn utm_zone(lon: f64) -> u8 {
    let zone = ((lon + 180.0) / 6.0).floor() as i32 + 1;
    zone.clamp(1, 60) as u8
}

/// Synthesises the auto-UTM proj4 definition for a geographic
/// midpoint.
pub fn auto_utm_definition(lon: f64, lat: f64) -> String {
    format!(
        "+proj=utm +zone={}{} +ellps=WGS84 +datum=WGS84 +units=m +no_defs",
        utm_zone(lon),
        if lat < 0.0 { " +south" } else { "" }
    )
}

fn web_mercator_forward(lon: f64, lat: f64) -> (f64, f64) {
    let x = WGS84_A * lon.to_radians();
    let y = WGS84_A * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    (x, y)
}

/// Transverse Mercator series expansion (Snyder), good to the
/// millimetre inside a UTM zone.
fn utm_forward(zone: u8, south: bool, lon: f64, lat: f64) -> (f64, f64) {
    let e2 = WGS84_F * (2.0 - WGS84_F);
    let ep2 = e2 / (1.0 - e2);
    let lon0 = (f64::from(zone) * 6.0 - 183.0).to_radians();

    let phi = lat.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let tan_phi = sin_phi / cos_phi;

    let n = WGS84_A / (1.0 - e2 * sin_phi * sin_phi).sqrt();
    let t = tan_phi * tan_phi;
    let c = ep2 * cos_phi * cos_phi;
    let a = cos_phi * (lon.to_radians() - lon0);

    let e4 = e2 * e2;
    let e6 = e4 * e2;
    let m = WGS84_A
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * phi).sin());

    let easting = UTM_K0
        * n
        * (a + (1.0 - t + c) * a.powi(3) / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a.powi(5) / 120.0)
        + UTM_FALSE_EASTING;

    let mut northing = UTM_K0
        * (m + n
            * tan_phi
            * (a * a / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a.powi(6) / 720.0));
    if south {
        northing += UTM_FALSE_NORTHING;
    }

    (easting, northing)
}

/// Per-generation projection of track points onto the plane.
///
/// Carries everything the projection needs so no process-wide state is
/// involved: the map variant holds its transform, the profile variants
/// hold the raw track totals they were derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackProjection {
    /// Cartographic projection; the distance ratio is ignored.
    Map(MapProjection),
    /// Straight profile: `(0, ratio * total, ele)`.
    Linear { total: f64 },
    /// Circular profile of the given radius: one full turn per track.
    Ring { radius: f64 },
}

impl TrackProjection {
    /// Projects a point, with `ratio` the cumulative distance fraction
    /// along the track (smoothed for path stations, raw for markers).
    pub fn project(&self, point: &TrackPoint, ratio: f64) -> Point3<f64> {
        match *self {
            Self::Map(projection) => {
                let (x, y) = projection.forward(point.lon, point.lat);
                Point3::new(x, y, point.ele)
            }
            Self::Linear { total } => Point3::new(0.0, ratio * total, point.ele),
            Self::Ring { radius } => {
                let t = TAU * ratio;
                Point3::new(radius * t.cos(), radius * t.sin(), point.ele)
            }
        }
    }
}
