//! # Trackkit
//!
//! A Rust toolkit that converts GPS tracks (GPX) into watertight 3D
//! solids for printing: the track becomes a raised ribbon on a flat
//! base, with optional distance markers, emitted as binary STL or as
//! OpenSCAD / OpenJSCAD programs.
//!
//! ## Architecture
//!
//! Trackkit is organized as a workspace with multiple crates:
//!
//! 1. **trackkit-core** - Core types, configuration, errors, progress
//! 2. **trackkit-geo** - WGS84 geodesy and planar projections
//! 3. **trackkit-gpx** - GPX parsing and track statistics
//! 4. **trackkit-model** - Scanner, fit, ribbon builder, emitters
//! 5. **trackkit** - Library facade and the CLI driver
//!
//! ## Features
//!
//! - **Geodesy**: Vincenty inverse distance on the WGS84 ellipsoid
//! - **Projections**: Web Mercator ("GOOGLE"), auto-derived UTM zones,
//!   linear and ring profile shapes
//! - **Mesh**: mitred ribbon cross-sections, collapse of oscillating
//!   stations, closed solids with outward winding
//! - **Markers**: oriented distance-marker boxes at a configured
//!   geodesic interval
//! - **Output**: binary STL with a known byte length, OpenSCAD and
//!   OpenJSCAD text

// Re-export the pipeline surface for driver and library consumers.
pub use trackkit_core::{
    Error, GenerateError, GeneratePhase, GeneratorConfig, GeoError, GpxError, ProgressCallback,
    ProjSource, Region, Result, ShapeType, SmoothType, TrackPoint,
};

pub use trackkit_geo as geo;
pub use trackkit_gpx::{parse_gpx, TrackInfo};
pub use trackkit_model::{generate, Bed, Marker, Mesh, TrackModel};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stdout
/// - RUST_LOG environment variable support
/// - INFO as the default level
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
