use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

use trackkit::{
    generate, parse_gpx, GeneratePhase, GeneratorConfig, ProjSource, Region, ShapeType,
    SmoothType,
};

/// Output artifact selection.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// Binary STL.
    Stl,
    /// OpenSCAD program.
    Openscad,
    /// OpenJSCAD program.
    Jscad,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OutputFormat::Stl => "stl",
            OutputFormat::Openscad => "openscad",
            OutputFormat::Jscad => "jscad",
        };
        f.write_str(s)
    }
}

#[derive(Parser, Debug)]
#[command(name = "trackkit", version, about = "Convert a GPX track into a 3D-printable ribbon solid")]
struct Args {
    /// Input GPX file
    #[arg(long = "in", value_name = "FILE")]
    input: PathBuf,

    /// Output file
    #[arg(long = "out", value_name = "FILE")]
    output: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Stl)]
    format: OutputFormat,

    /// Ribbon half-width in mm
    #[arg(long, default_value_t = 2.0)]
    buffer: f64,

    /// Vertical exaggeration factor (at least 1)
    #[arg(long, default_value_t = 1.0)]
    vertical: f64,

    /// Printable bed width in mm
    #[arg(long, default_value_t = 100.0)]
    bedx: f64,

    /// Printable bed depth in mm
    #[arg(long, default_value_t = 100.0)]
    bedy: f64,

    /// Base thickness in mm
    #[arg(long, default_value_t = 1.0)]
    base: f64,

    /// Profile shape: map, linear or ring (0/1/2)
    #[arg(long, default_value = "map", value_parser = ShapeType::from_str)]
    shape: ShapeType,

    /// Projection source for the map shape: google, custom or utm (0/1/2)
    #[arg(long = "proj", default_value = "google", value_parser = ProjSource::from_str)]
    proj_source: ProjSource,

    /// proj4-style definition used with --proj custom
    #[arg(long, default_value = "")]
    projection: String,

    /// Force every elevation to --zconstant
    #[arg(long)]
    zoverride: bool,

    /// Elevation in metres for missing or overridden elevations
    #[arg(long, default_value_t = 10.0)]
    zconstant: f64,

    /// Shift elevations so the minimum sits just above zero
    #[arg(long)]
    zcut: bool,

    /// Fit to the --region-* rectangle instead of the track bounds
    #[arg(long)]
    regionfit: bool,

    #[arg(long = "region-minx", default_value_t = 0.0)]
    region_min_x: f64,

    #[arg(long = "region-maxx", default_value_t = 0.0)]
    region_max_x: f64,

    #[arg(long = "region-miny", default_value_t = 0.0)]
    region_min_y: f64,

    #[arg(long = "region-maxy", default_value_t = 0.0)]
    region_max_y: f64,

    /// Geodesic marker spacing in metres; 0 disables markers
    #[arg(long = "marker-interval", default_value_t = 0.0)]
    marker_interval: f64,

    /// Smoothing threshold selection: auto or span (0/1)
    #[arg(long = "smooth", default_value = "auto", value_parser = SmoothType::from_str)]
    smooth_type: SmoothType,

    /// Minimum inter-point distance in metres with --smooth span
    #[arg(long = "smoothspan", default_value_t = 0.0)]
    smooth_span: f64,
}

impl Args {
    fn config(&self) -> GeneratorConfig {
        GeneratorConfig {
            buffer: self.buffer,
            vertical: self.vertical,
            bed_x: self.bedx,
            bed_y: self.bedy,
            base: self.base,
            shape: self.shape,
            proj_source: self.proj_source,
            projection: self.projection.clone(),
            z_override: self.zoverride,
            z_constant: self.zconstant,
            z_cut: self.zcut,
            region_fit: self.regionfit,
            region: Region {
                min_x: self.region_min_x,
                max_x: self.region_max_x,
                min_y: self.region_min_y,
                max_y: self.region_max_y,
            },
            marker_interval: self.marker_interval,
            smooth_type: self.smooth_type,
            smooth_span: self.smooth_span,
        }
    }
}

fn main() -> Result<()> {
    trackkit::init_logging()?;
    let args = Args::parse();

    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let (points, track) = parse_gpx(&text, args.zconstant, args.zoverride)
        .with_context(|| format!("parsing {}", args.input.display()))?;
    info!(
        name = %track.name,
        points = track.points,
        distance_m = track.total_distance,
        elevation = track.has_elevation,
        "parsed track"
    );

    let config = args.config();
    let progress = |phase: GeneratePhase| debug!(%phase, percent = phase.percent(), "progress");
    let model = generate(&points, &config, Some(&progress)).context("generating model")?;

    let bytes = match args.format {
        OutputFormat::Stl => model.to_stl(),
        OutputFormat::Openscad => model.to_openscad().into_bytes(),
        OutputFormat::Jscad => model.to_jscad(false).into_bytes(),
    };
    fs::write(&args.output, &bytes)
        .with_context(|| format!("writing {}", args.output.display()))?;

    info!(
        output = %args.output.display(),
        format = %args.format,
        bytes = bytes.len(),
        vertices = model.mesh.vertex_count(),
        triangles = model.mesh.triangle_count(),
        markers = model.markers.len(),
        "wrote model"
    );
    Ok(())
}
