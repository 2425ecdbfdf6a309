//! mlobject: bounding box and mask conversions for object detection data.
//!
//! Detection tools disagree on how a box is written down. YOLO stores
//! image-relative centers and extents, Pascal VOC stores absolute corners and
//! COCO stores an absolute corner plus extent. Segmentation masks come as
//! run-length encodings, polygons or dense bitmaps. This crate holds one
//! canonical form of each and derives the rest, clamped to the image.
//!
//! # Modules
//!
//! - [`geometry`]: [`BoundingBox`](geometry::BoundingBox) and its encodings
//! - [`mask`]: [`Mask`](mask::Mask), built from an RLE or from polygons
//! - [`codec`]: RLE codec and polygon tracer behind swappable traits
//! - [`error`]: Error types for mlobject operations

pub mod codec;
pub mod error;
pub mod geometry;
pub mod mask;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

pub use error::{CodecError, MlObjectError};

use codec::{CompressedRle, Polygon, Rle};
use geometry::{BoundingBox, BoxData, ImageSize, Quad};
use mask::{Mask, MaskData, MaskInput};

/// The mlobject CLI application.
#[derive(Parser)]
#[command(name = "mlobject")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert a bounding box between YOLO, VOC and COCO.
    #[command(name = "box")]
    Box(BoxArgs),

    /// Convert a mask between polygons and RLE.
    Mask(MaskArgs),
}

/// Image size and metadata shared by both subcommands.
#[derive(clap::Args)]
struct CommonArgs {
    /// Image height in pixels.
    #[arg(long)]
    height: u32,

    /// Image width in pixels.
    #[arg(long)]
    width: u32,

    /// Class label to attach.
    #[arg(long)]
    label: Option<String>,

    /// Confidence score to attach.
    #[arg(long, default_value_t = geometry::DEFAULT_CONFIDENCE)]
    confidence: f64,

    /// Output format for the result.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

impl CommonArgs {
    fn image_size(&self) -> ImageSize {
        ImageSize::new(self.height, self.width)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Arguments for the box subcommand.
#[derive(clap::Args)]
#[command(group(
    clap::ArgGroup::new("encoding")
        .required(true)
        .args(["yolo", "voc", "coco"]),
))]
struct BoxArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Relative center and size: xc,yc,w,h.
    #[arg(long, value_parser = parse_quad, allow_hyphen_values = true)]
    yolo: Option<Quad>,

    /// Absolute corners: x1,y1,x2,y2.
    #[arg(long, value_parser = parse_quad, allow_hyphen_values = true)]
    voc: Option<Quad>,

    /// Absolute corner and size: x,y,w,h.
    #[arg(long, value_parser = parse_quad, allow_hyphen_values = true)]
    coco: Option<Quad>,
}

/// Arguments for the mask subcommand.
#[derive(clap::Args)]
#[command(group(
    clap::ArgGroup::new("encoding")
        .required(true)
        .args(["polygon", "rle_counts", "rle_string"]),
))]
struct MaskArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Polygon vertices x1,y1,x2,y2,... (repeat for several contours).
    #[arg(long, value_parser = parse_polygon, allow_hyphen_values = true)]
    polygon: Vec<Polygon>,

    /// Uncompressed RLE run lengths, column-major, starting with background.
    #[arg(long, value_delimiter = ',')]
    rle_counts: Option<Vec<u32>>,

    /// COCO compressed RLE counts string.
    #[arg(long)]
    rle_string: Option<String>,
}

fn parse_numbers(s: &str) -> Result<Vec<f64>, String> {
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| format!("'{}' is not a number: {}", part.trim(), e))
        })
        .collect()
}

fn parse_quad(s: &str) -> Result<Quad, String> {
    match parse_numbers(s)?.as_slice() {
        &[a, b, c, d] => Ok((a, b, c, d)),
        other => Err(format!("expected 4 comma-separated numbers, got {}", other.len())),
    }
}

fn parse_polygon(s: &str) -> Result<Polygon, String> {
    parse_numbers(s)
}

/// JSON view of a box for the CLI.
#[derive(Serialize)]
struct BoxReport<'a> {
    yolo: Quad,
    voc: Quad,
    coco: Quad,
    data: BoxData,
    #[serde(flatten)]
    bbox: &'a BoundingBox,
}

/// JSON view of a mask for the CLI.
#[derive(Serialize)]
struct MaskReport<'a> {
    area: u64,
    bbox: Quad,
    rle: &'a Rle,
    compressed_rle: CompressedRle,
    data: MaskData,
}

/// Run the mlobject CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), MlObjectError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Box(args)) => run_box(args),
        Some(Commands::Mask(args)) => run_mask(args),
        None => {
            println!("mlobject {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Bounding box and mask conversions.");
            println!();
            println!("Run 'mlobject --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the box subcommand.
fn run_box(args: BoxArgs) -> Result<(), MlObjectError> {
    let common = args.common;
    let mut bbox = BoundingBox::from_encodings(common.image_size(), args.yolo, args.voc, args.coco)?
        .with_confidence(common.confidence);
    if let Some(label) = common.label {
        bbox = bbox.with_label(label);
    }

    match common.output {
        OutputFormat::Json => {
            let report = BoxReport {
                yolo: bbox.yolo(),
                voc: bbox.voc(),
                coco: bbox.coco(),
                data: bbox.data(),
                bbox: &bbox,
            };
            print_json(&report)?;
        }
        OutputFormat::Text => {
            println!("{}", bbox);
            println!("yolo: {}", format_quad(bbox.yolo()));
            println!("voc:  {}", format_quad(bbox.voc()));
            println!("coco: {}", format_quad(bbox.coco()));
            let (abs, rel) = (bbox.absolute(), bbox.relative());
            println!("center: {}, {} px ({}, {})", abs.xc, abs.yc, rel.xc, rel.yc);
            println!("area: {} px ({} of image)", abs.area, rel.area);
        }
    }
    Ok(())
}

/// Execute the mask subcommand.
fn run_mask(args: MaskArgs) -> Result<(), MlObjectError> {
    let common = args.common;
    let size = common.image_size();

    let rle = match (args.rle_counts, args.rle_string) {
        (Some(counts), _) => Some(Rle::new(size, counts)),
        (None, Some(counts)) => Some(Rle::from_compressed(&CompressedRle { size, counts })?),
        (None, None) => None,
    };
    let polygons = (!args.polygon.is_empty()).then_some(args.polygon);
    let input = MaskInput::first_of(rle, polygons)?;

    let mut mask = Mask::new(size, input)?.with_confidence(common.confidence);
    if let Some(label) = common.label {
        mask = mask.with_label(label);
    }

    match common.output {
        OutputFormat::Json => {
            let report = MaskReport {
                area: mask.area(),
                bbox: mask.bbox().coco(),
                rle: mask.rle(),
                compressed_rle: mask.rle().to_compressed(),
                data: mask.data(),
            };
            print_json(&report)?;
        }
        OutputFormat::Text => {
            println!("area: {}", mask.area());
            println!("bbox: {}", mask.bbox());
            println!("rle:  {}", mask.rle().to_compressed().counts);
            for (i, polygon) in mask.polygons().iter().enumerate() {
                let coords: Vec<String> = polygon.iter().map(|v| v.to_string()).collect();
                println!("polygon {}: {}", i, coords.join(","));
            }
        }
    }
    Ok(())
}

fn format_quad((a, b, c, d): Quad) -> String {
    format!("{}, {}, {}, {}", a, b, c, d)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), MlObjectError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}
