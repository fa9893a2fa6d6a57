//! # Trackkit Model
//!
//! Turns an ordered sequence of track points into a watertight ribbon
//! solid plus distance markers, and serializes the result.
//!
//! ## Pipeline
//!
//! ```text
//! Scanner (distances, markers, smoothing)
//!   └── Projector (map / linear / ring)
//!         └── Fit (centre, bed scale, vertical exaggeration)
//!               └── Path builder (mitred cross-sections, caps)
//!                     └── Emitters (binary STL, OpenSCAD, JSCAD)
//! ```
//!
//! [`generate`] drives the phases in order and returns the
//! [`TrackModel`] artifact; nothing else escapes a generation call.

pub mod fit;
pub mod generator;
pub mod marker;
pub mod mesh;
pub mod path;
pub mod scad;
pub mod scanner;
pub mod stl;

pub use fit::{FitTransform, ProjectedTrack};
pub use generator::{generate, Bed, TrackModel};
pub use marker::{marker_mesh, Marker};
pub use mesh::Mesh;
pub use path::build_ribbon;
pub use scanner::{scan, RawMarker, ScanResult};
pub use stl::write_binary_stl;
