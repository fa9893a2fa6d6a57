//! # Trackkit GPX
//!
//! Turns GPX text into the ordered point sequence the generation
//! pipeline consumes, plus a human-facing track summary. Only the
//! first `<trk>` of a document is read; its `<trkseg>` children are
//! concatenated in document order.

pub mod info;
pub mod parser;

pub use info::TrackInfo;
pub use parser::parse_gpx;
