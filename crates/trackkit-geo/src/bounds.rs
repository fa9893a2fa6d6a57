//! Axis-aligned bounds over geographic and planar points.

use nalgebra::Point3;
use trackkit_core::types::TrackPoint;

/// Geographic bounding box over longitude and latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl GeoBounds {
    /// Seeds the bounds from a first point.
    pub fn seed(p: &TrackPoint) -> Self {
        Self {
            min_lon: p.lon,
            max_lon: p.lon,
            min_lat: p.lat,
            max_lat: p.lat,
        }
    }

    /// Extends the bounds to cover another point.
    pub fn extend(&mut self, p: &TrackPoint) {
        self.min_lon = self.min_lon.min(p.lon);
        self.max_lon = self.max_lon.max(p.lon);
        self.min_lat = self.min_lat.min(p.lat);
        self.max_lat = self.max_lat.max(p.lat);
    }

    /// Longitude of the midpoint.
    pub fn mid_lon(&self) -> f64 {
        (self.min_lon + self.max_lon) / 2.0
    }

    /// Latitude of the midpoint.
    pub fn mid_lat(&self) -> f64 {
        (self.min_lat + self.max_lat) / 2.0
    }

    /// The four (lon, lat) corners.
    pub fn corners(&self) -> [(f64, f64); 4] {
        [
            (self.min_lon, self.min_lat),
            (self.min_lon, self.max_lat),
            (self.max_lon, self.min_lat),
            (self.max_lon, self.max_lat),
        ]
    }
}

/// Planar bounding box over projected points, in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Bounds {
    /// Seeds the bounds from the first projected point.
    pub fn seed(p: Point3<f64>) -> Self {
        Self { min: p, max: p }
    }

    /// Extends the bounds to cover another projected point.
    pub fn extend(&mut self, p: &Point3<f64>) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Replaces the x/y extent with a caller rectangle, leaving z alone.
    pub fn set_region(&mut self, min_x: f64, max_x: f64, min_y: f64, max_y: f64) {
        self.min.x = min_x;
        self.max.x = max_x;
        self.min.y = min_y;
        self.max.y = max_y;
    }

    /// Midpoint of the x extent.
    pub fn center_x(&self) -> f64 {
        (self.min.x + self.max.x) / 2.0
    }

    /// Midpoint of the y extent.
    pub fn center_y(&self) -> f64 {
        (self.min.y + self.max.y) / 2.0
    }

    /// Width of the x extent.
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Depth of the y extent.
    pub fn depth(&self) -> f64 {
        self.max.y - self.min.y
    }
}
