//! Bulk projection and the bed-fit transform.

use crate::scanner::ScanResult;
use nalgebra::Point3;
use tracing::debug;
use trackkit_core::config::{GeneratorConfig, ProjSource, ShapeType};
use trackkit_core::types::TrackPoint;
use trackkit_geo::bounds::{Bounds, GeoBounds};
use trackkit_geo::geodesy;

/// Bed-fit scale for a planar extent: model millimetres per projected
/// metre. The bed is reduced by the ribbon width on both axes first;
/// a degenerate zero extent contributes no constraint.
pub fn bed_fit(config: &GeneratorConfig, width: f64, depth: f64) -> f64 {
    let bed_x = config.bed_x - 2.0 * config.buffer;
    let bed_y = config.bed_y - 2.0 * config.buffer;
    let sx = if width > 0.0 { bed_x / width } else { f64::INFINITY };
    let sy = if depth > 0.0 { bed_y / depth } else { f64::INFINITY };
    sx.min(sy)
}

/// The smoothed track in planar coordinates, with its bounds.
#[derive(Debug, Clone)]
pub struct ProjectedTrack {
    pub points: Vec<Point3<f64>>,
    /// Post-projection, pre-fit bounds; x/y replaced by the caller
    /// rectangle under `region_fit`.
    pub bounds: Bounds,
}

/// Projects the kept points in order, seeding and extending the planar
/// bounds as it goes.
pub fn project_track(scan: &ScanResult, config: &GeneratorConfig) -> ProjectedTrack {
    let mut points = Vec::with_capacity(scan.kept.len());
    let first = scan.projection.project(&elevation_of(&scan.kept[0], config), 0.0);
    let mut bounds = Bounds::seed(first);
    points.push(first);

    let mut cumulative = 0.0;
    for (i, kept) in scan.kept.iter().enumerate().skip(1) {
        cumulative += scan.kept_distances[i - 1];
        let ratio = if scan.smooth_total > 0.0 {
            cumulative / scan.smooth_total
        } else {
            0.0
        };
        let p = scan.projection.project(&elevation_of(kept, config), ratio);
        bounds.extend(&p);
        points.push(p);
    }

    if config.region_fit {
        bounds.set_region(
            config.region.min_x,
            config.region.max_x,
            config.region.min_y,
            config.region.max_y,
        );
    }

    ProjectedTrack { points, bounds }
}

/// Applies the elevation override, leaving the source point untouched.
pub fn elevation_of(point: &TrackPoint, config: &GeneratorConfig) -> TrackPoint {
    if config.z_override {
        TrackPoint::new(point.lon, point.lat, config.z_constant)
    } else {
        *point
    }
}

/// The centre / scale / exaggeration mapping from projected metres to
/// model millimetres.
#[derive(Debug, Clone, Copy)]
pub struct FitTransform {
    pub center_x: f64,
    pub center_y: f64,
    pub z_offset: f64,
    pub scale: f64,
    pub z_scale: f64,
    pub vertical: f64,
    pub base: f64,
}

impl FitTransform {
    /// Derives the transform from the planar bounds.
    ///
    /// The z offset drops the model to just above zero when `z_cut` is
    /// requested or the minimum sits at or below zero. Under a custom
    /// map projection the z scale is recomputed from the geographic
    /// north-south extent so vertical exaggeration stays metric even
    /// when the projection is not isotropic.
    pub fn from_bounds(bounds: &Bounds, geo_bounds: &GeoBounds, config: &GeneratorConfig) -> Self {
        let z_offset = if config.z_cut || bounds.min.z <= 0.0 {
            (bounds.min.z - 1.0).floor()
        } else {
            0.0
        };

        let scale = bed_fit(config, bounds.width(), bounds.depth());

        let z_scale = if config.shape == ShapeType::Map && config.proj_source == ProjSource::Custom
        {
            let north_south = geodesy::vincenty_deg(
                geo_bounds.min_lat,
                geo_bounds.min_lon,
                geo_bounds.max_lat,
                geo_bounds.min_lon,
            );
            if north_south.is_finite() && north_south > 0.0 {
                (config.bed_y - 2.0 * config.buffer) / north_south
            } else {
                scale
            }
        } else {
            scale
        };

        debug!(scale, z_scale, z_offset, "derived fit transform");

        Self {
            center_x: bounds.center_x(),
            center_y: bounds.center_y(),
            z_offset,
            scale,
            z_scale,
            vertical: config.vertical,
            base: config.base,
        }
    }

    /// Maps one projected point into model millimetres.
    pub fn apply(&self, p: &Point3<f64>) -> Point3<f64> {
        Point3::new(
            self.scale * (p.x - self.center_x),
            self.scale * (p.y - self.center_y),
            self.z_scale * (p.z - self.z_offset) * self.vertical + self.base,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trackkit_core::config::Region;

    #[test]
    fn test_bed_fit_picks_tighter_axis() {
        let mut config = GeneratorConfig::default();
        config.buffer = 5.0;
        // 90 mm of usable bed on both axes
        assert_eq!(bed_fit(&config, 180.0, 45.0), 0.5);
        assert_eq!(bed_fit(&config, 45.0, 180.0), 0.5);
        // a zero extent leaves the other axis in charge
        assert_eq!(bed_fit(&config, 0.0, 180.0), 0.5);
        assert_eq!(bed_fit(&config, 0.0, 0.0), f64::INFINITY);
    }

    #[test]
    fn test_fit_centres_and_scales() {
        let mut bounds = Bounds::seed(Point3::new(0.0, 0.0, 10.0));
        bounds.extend(&Point3::new(180.0, 90.0, 20.0));
        let geo = GeoBounds::seed(&TrackPoint::new(0.0, 0.0, 0.0));
        let mut config = GeneratorConfig::default();
        config.buffer = 5.0;

        let fit = FitTransform::from_bounds(&bounds, &geo, &config);
        assert_eq!(fit.scale, 0.5);
        assert_eq!(fit.z_scale, 0.5);
        assert_eq!(fit.z_offset, 0.0);

        let p = fit.apply(&Point3::new(90.0, 45.0, 10.0));
        assert_eq!(p, Point3::new(0.0, 0.0, 0.5 * 10.0 + 1.0));
        let p = fit.apply(&Point3::new(180.0, 90.0, 20.0));
        assert_eq!(p, Point3::new(45.0, 22.5, 11.0));
    }

    #[test]
    fn test_z_cut_drops_to_just_above_zero() {
        let mut bounds = Bounds::seed(Point3::new(0.0, 0.0, -3.5));
        bounds.extend(&Point3::new(10.0, 10.0, 4.0));
        let geo = GeoBounds::seed(&TrackPoint::new(0.0, 0.0, 0.0));
        let config = GeneratorConfig::default();

        // min z below zero triggers the cut without the flag
        let fit = FitTransform::from_bounds(&bounds, &geo, &config);
        assert_eq!(fit.z_offset, -5.0);
        // the lowest point ends up just above the base
        let lowest = fit.apply(&Point3::new(0.0, 5.0, -3.5));
        assert!(lowest.z > config.base);
    }

    #[test]
    fn test_region_fit_overrides_bounds() {
        let points = vec![
            TrackPoint::new(0.0, 0.0, 5.0),
            TrackPoint::new(0.001, 0.0, 5.0),
        ];
        let config = GeneratorConfig {
            shape: ShapeType::Map,
            region_fit: true,
            region: Region {
                min_x: -500.0,
                max_x: 500.0,
                min_y: -500.0,
                max_y: 500.0,
            },
            ..GeneratorConfig::default()
        };
        let scan = crate::scanner::scan(&points, &config).unwrap();
        let projected = project_track(&scan, &config);
        assert_eq!(projected.bounds.width(), 1000.0);
        assert_eq!(projected.bounds.depth(), 1000.0);
        assert_eq!(projected.bounds.center_x(), 0.0);
        // z bounds still come from the track
        assert_eq!(projected.bounds.min.z, 5.0);
    }

    #[test]
    fn test_elevation_override() {
        let mut config = GeneratorConfig::default();
        config.z_override = true;
        config.z_constant = 42.0;
        let p = TrackPoint::new(1.0, 2.0, 900.0);
        assert_eq!(elevation_of(&p, &config).ele, 42.0);
        config.z_override = false;
        assert_eq!(elevation_of(&p, &config).ele, 900.0);
    }
}
