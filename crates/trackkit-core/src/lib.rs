//! # Trackkit Core
//!
//! Core types, configuration and error handling for trackkit.
//! Provides the fundamental abstractions shared by every stage of the
//! GPX-to-solid pipeline: track points, the generation configuration,
//! progress reporting and the error taxonomy.

pub mod config;
pub mod constants;
pub mod error;
pub mod progress;
pub mod types;

pub use config::{GeneratorConfig, ProjSource, Region, ShapeType, SmoothType};
pub use error::{Error, GenerateError, GeoError, GpxError, Result};
pub use progress::{GeneratePhase, ProgressCallback};
pub use types::TrackPoint;
