//! Error handling for trackkit
//!
//! Provides error types for all layers of the pipeline:
//! - GPX errors (parsing/structure)
//! - Geographic errors (projection selection)
//! - Generation errors (option validation, geodesy)
//!
//! All error types use `thiserror` for ergonomic error handling. The
//! parser surfaces [`GpxError`]; the generator surfaces
//! [`GenerateError`]; a failed call never produces a partial artifact.

use thiserror::Error;

/// GPX parsing error type
///
/// Represents errors found while turning GPX text into an ordered
/// sequence of track points. Exactly one of these is reported per
/// failed parse; a successful parse reports none.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GpxError {
    /// Input is not well-formed GPX/XML
    #[error("input is not well-formed GPX: {reason}")]
    MalformedXml {
        /// What the underlying reader rejected.
        reason: String,
    },

    /// The document has no `<trk>` element
    #[error("no track element present in GPX document")]
    NoTrack,

    /// Fewer than two points across all track segments
    #[error("track contains {found} point(s), at least 2 are required")]
    TooFewPoints {
        /// How many points were actually found.
        found: usize,
    },
}

/// Geographic error type
///
/// Represents errors related to planar projection selection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeoError {
    /// The projection definition was not recognised
    #[error("projection not recognised: {definition}")]
    UnknownProjection {
        /// The offending definition string.
        definition: String,
    },
}

/// Generation error type
///
/// Represents errors raised while turning track points into a solid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// Projection selection failed
    #[error(transparent)]
    Projection(#[from] GeoError),

    /// A caller option violates its stated range
    #[error("invalid option '{option}': {reason}")]
    InvalidOption {
        /// Name of the offending option.
        option: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Geodesic distance diverged and the great-circle fallback was
    /// not finite either
    #[error("geodesic distance diverged on segment {segment}")]
    GeodesyDiverged {
        /// Index of the raw segment that failed.
        segment: usize,
    },
}

/// Main error type for trackkit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// GPX parsing error
    #[error(transparent)]
    Gpx(#[from] GpxError),

    /// Geographic error
    #[error(transparent)]
    Geo(#[from] GeoError),

    /// Generation error
    #[error(transparent)]
    Generate(#[from] GenerateError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a GPX parsing error
    pub fn is_gpx_error(&self) -> bool {
        matches!(self, Error::Gpx(_))
    }

    /// Check if this is a generation error
    pub fn is_generate_error(&self) -> bool {
        matches!(self, Error::Generate(_) | Error::Geo(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
