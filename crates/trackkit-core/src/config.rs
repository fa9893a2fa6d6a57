//! Generation configuration.
//!
//! One [`GeneratorConfig`] value is passed per generation. Every field
//! is typed and validated before the first pipeline phase runs; a
//! value outside its stated range fails the generation with
//! [`GenerateError::InvalidOption`] instead of producing a degenerate
//! model.

use crate::constants::{
    DEFAULT_BASE_MM, DEFAULT_BED_X_MM, DEFAULT_BED_Y_MM, DEFAULT_BUFFER_MM, DEFAULT_ELEVATION_M,
    MIN_BED_MM, MIN_BUFFER_MM, MIN_VERTICAL,
};
use crate::error::GenerateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Profile shape of the generated solid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    /// Cartographic projection of the track onto the plane.
    Map,
    /// Straight profile along cumulative distance.
    Linear,
    /// Closed circular profile along cumulative distance.
    Ring,
}

impl Default for ShapeType {
    fn default() -> Self {
        Self::Map
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Map => write!(f, "map"),
            Self::Linear => write!(f, "linear"),
            Self::Ring => write!(f, "ring"),
        }
    }
}

impl FromStr for ShapeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "map" | "0" => Ok(Self::Map),
            "linear" | "1" => Ok(Self::Linear),
            "ring" | "2" => Ok(Self::Ring),
            _ => Err(format!("unknown shape type: {}", s)),
        }
    }
}

/// Source of the cartographic projection used by [`ShapeType::Map`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjSource {
    /// Web-Mercator-like "GOOGLE" transform.
    Google,
    /// Caller-supplied proj4-style definition string.
    Custom,
    /// UTM zone derived from the track's geographic midpoint.
    AutoUtm,
}

impl Default for ProjSource {
    fn default() -> Self {
        Self::Google
    }
}

impl fmt::Display for ProjSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Google => write!(f, "google"),
            Self::Custom => write!(f, "custom"),
            Self::AutoUtm => write!(f, "utm"),
        }
    }
}

impl FromStr for ProjSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google" | "0" => Ok(Self::Google),
            "custom" | "1" => Ok(Self::Custom),
            "utm" | "auto" | "2" => Ok(Self::AutoUtm),
            _ => Err(format!("unknown projection source: {}", s)),
        }
    }
}

/// How the smoothing threshold is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmoothType {
    /// Derive the minimum inter-point distance from the bed-fit scale.
    Auto,
    /// Use [`GeneratorConfig::smooth_span`] directly.
    Span,
}

impl Default for SmoothType {
    fn default() -> Self {
        Self::Auto
    }
}

impl fmt::Display for SmoothType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Span => write!(f, "span"),
        }
    }
}

impl FromStr for SmoothType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" | "0" => Ok(Self::Auto),
            "span" | "1" => Ok(Self::Span),
            _ => Err(format!("unknown smoothing type: {}", s)),
        }
    }
}

/// Caller-supplied planar rectangle replacing the natural x/y bounds
/// when [`GeneratorConfig::region_fit`] is set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Region {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

/// Configuration for one generation call.
///
/// Linear dimensions (`buffer`, `bed_x`, `bed_y`, `base`) are model
/// millimetres; `marker_interval` and `smooth_span` are ground metres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Half-width of the ribbon in mm.
    pub buffer: f64,
    /// Vertical exaggeration factor, at least 1.
    pub vertical: f64,
    /// Printable bed width in mm, reduced by `2 * buffer` before fitting.
    pub bed_x: f64,
    /// Printable bed depth in mm, reduced by `2 * buffer` before fitting.
    pub bed_y: f64,
    /// Base thickness added to every top-vertex z, in mm.
    pub base: f64,
    /// Profile shape.
    pub shape: ShapeType,
    /// Projection source for the map shape.
    pub proj_source: ProjSource,
    /// proj4-style definition used when `proj_source` is `Custom`.
    pub projection: String,
    /// Force every elevation to `z_constant`.
    pub z_override: bool,
    /// Elevation in metres used for missing or overridden elevations.
    pub z_constant: f64,
    /// Shift z so the minimum sits just above zero.
    pub z_cut: bool,
    /// Replace the natural planar x/y bounds with `region`.
    pub region_fit: bool,
    /// Planar rectangle used when `region_fit` is set.
    pub region: Region,
    /// Geodesic spacing between distance markers in metres; 0 disables.
    pub marker_interval: f64,
    /// Smoothing threshold selection.
    pub smooth_type: SmoothType,
    /// Minimum inter-point distance in metres when `smooth_type` is `Span`.
    pub smooth_span: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            buffer: DEFAULT_BUFFER_MM,
            vertical: 1.0,
            bed_x: DEFAULT_BED_X_MM,
            bed_y: DEFAULT_BED_Y_MM,
            base: DEFAULT_BASE_MM,
            shape: ShapeType::default(),
            proj_source: ProjSource::default(),
            projection: String::new(),
            z_override: false,
            z_constant: DEFAULT_ELEVATION_M,
            z_cut: false,
            region_fit: false,
            region: Region::default(),
            marker_interval: 0.0,
            smooth_type: SmoothType::default(),
            smooth_span: 0.0,
        }
    }
}

impl GeneratorConfig {
    /// Validates every option against its stated range.
    ///
    /// Called once before phase 1; the pipeline assumes a validated
    /// configuration afterwards.
    pub fn validate(&self) -> Result<(), GenerateError> {
        if !self.vertical.is_finite() || self.vertical < MIN_VERTICAL {
            return Err(invalid(
                "vertical",
                format!("must be at least {}, got {}", MIN_VERTICAL, self.vertical),
            ));
        }
        if !self.bed_x.is_finite() || self.bed_x < MIN_BED_MM {
            return Err(invalid(
                "bedx",
                format!("must be at least {} mm, got {}", MIN_BED_MM, self.bed_x),
            ));
        }
        if !self.bed_y.is_finite() || self.bed_y < MIN_BED_MM {
            return Err(invalid(
                "bedy",
                format!("must be at least {} mm, got {}", MIN_BED_MM, self.bed_y),
            ));
        }
        if !self.buffer.is_finite() || self.buffer < MIN_BUFFER_MM {
            return Err(invalid(
                "buffer",
                format!("must be at least {} mm, got {}", MIN_BUFFER_MM, self.buffer),
            ));
        }
        if self.bed_x - 2.0 * self.buffer <= 0.0 {
            return Err(invalid(
                "buffer",
                format!(
                    "ribbon width {} mm leaves no printable bed area on a {} mm bed",
                    2.0 * self.buffer,
                    self.bed_x
                ),
            ));
        }
        if self.bed_y - 2.0 * self.buffer <= 0.0 {
            return Err(invalid(
                "buffer",
                format!(
                    "ribbon width {} mm leaves no printable bed area on a {} mm bed",
                    2.0 * self.buffer,
                    self.bed_y
                ),
            ));
        }
        if self.proj_source == ProjSource::Custom && self.projection.trim().is_empty() {
            return Err(invalid(
                "projection",
                "custom projection selected but no definition supplied".to_string(),
            ));
        }
        if !self.marker_interval.is_finite() || self.marker_interval < 0.0 {
            return Err(invalid(
                "markerInterval",
                format!("must be non-negative, got {}", self.marker_interval),
            ));
        }
        if self.smooth_type == SmoothType::Span
            && (!self.smooth_span.is_finite() || self.smooth_span < 0.0)
        {
            return Err(invalid(
                "smoothspan",
                format!("must be non-negative, got {}", self.smooth_span),
            ));
        }
        if self.region_fit
            && (self.region.max_x <= self.region.min_x || self.region.max_y <= self.region.min_y)
        {
            return Err(invalid(
                "region",
                "region rectangle must have positive width and height".to_string(),
            ));
        }
        Ok(())
    }
}

fn invalid(option: &'static str, reason: String) -> GenerateError {
    GenerateError::InvalidOption { option, reason }
}
