//! Regionlab: bounding-box region annotation and training dataset capture.
//!
//! Regionlab edits rectangular labeled regions over images and persists them
//! as one text label file per image. It runs in two modes:
//!
//! - **review**: walk an existing image/label directory pair, edit the
//!   regions of each image and re-save or purge entries;
//! - **capture**: pull frames from a source, annotate them, and export
//!   numbered image/label pairs into a new dataset.
//!
//! Two label schemas are supported: a 15-field corner schema in absolute
//! pixels and a 5-field normalized center-box schema.
//!
//! # Modules
//!
//! - [`label`]: Label records, the line codec and label files
//! - [`region`]: The region store (selection, moves, deletion)
//! - [`dataset`]: Paired image/label directories for review
//! - [`capture`]: Frame sources and the capture sequencer
//! - [`session`]: The annotation session driving either mode
//! - [`error`]: Error types for regionlab operations

pub mod capture;
pub mod classes;
pub mod dataset;
pub mod editor;
pub mod error;
pub mod geom;
pub mod input;
pub mod label;
pub mod logging;
pub mod overlay;
pub mod region;
pub mod script;
pub mod session;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

pub use error::RegionlabError;

use capture::ImageSequenceSource;
use classes::ClassList;
use input::{key_help, Mode};
use label::LabelSchema;
use script::RunReport;
use session::{AnnotationSession, CaptureConfig, ReviewConfig};

/// The regionlab CLI application.
#[derive(Parser)]
#[command(name = "regionlab")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Review and edit the labels of an image/label directory pair.
    #[command(after_help = key_help(Mode::Review))]
    Review(ReviewArgs),
    /// Annotate frames from a source and export them as a new dataset.
    #[command(after_help = key_help(Mode::Capture))]
    Capture(CaptureArgs),
    /// Print the class legend of a class list.
    Classes(ClassesArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Arguments for the review subcommand.
#[derive(clap::Args)]
struct ReviewArgs {
    /// Directory of images.
    images_dir: PathBuf,

    /// Directory of label files, paired with images by sorted position.
    labels_dir: PathBuf,

    /// Class list (whitespace-separated names, or a data.yaml).
    classes: PathBuf,

    /// Label schema of the label files.
    #[arg(long, value_enum, default_value_t = LabelSchema::Corner, env = "REGIONLAB_SCHEMA")]
    schema: LabelSchema,

    /// Event script to replay against the session ('-' for stdin).
    #[arg(long)]
    events: Option<PathBuf>,

    /// Output format for the run report.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    output: ReportFormat,
}

/// Arguments for the capture subcommand.
#[derive(clap::Args)]
struct CaptureArgs {
    /// Directory of frames (jpg, png or bmp), read in path order.
    source_dir: PathBuf,

    /// Class list (whitespace-separated names, or a data.yaml).
    classes: PathBuf,

    /// File name prefix for exported pairs.
    prefix: String,

    /// Label schema to export.
    #[arg(long, value_enum, default_value_t = LabelSchema::Corner, env = "REGIONLAB_SCHEMA")]
    schema: LabelSchema,

    /// Output dataset root (defaults per schema).
    #[arg(long, env = "REGIONLAB_ROOT")]
    root: Option<PathBuf>,

    /// Index of the first frame to show.
    #[arg(long, default_value_t = 0)]
    start_frame: usize,

    /// Event script to replay against the session.
    #[arg(long)]
    events: Option<PathBuf>,

    /// Output format for the run report.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    output: ReportFormat,
}

/// Arguments for the classes subcommand.
#[derive(clap::Args)]
struct ClassesArgs {
    /// Class list (whitespace-separated names, or a data.yaml).
    classes: PathBuf,
}

/// Run the regionlab CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), RegionlabError> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Some(Commands::Review(args)) => run_review(args),
        Some(Commands::Capture(args)) => run_capture(args),
        Some(Commands::Classes(args)) => run_classes(args),
        None => {
            println!("regionlab {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Bounding-box region annotation and training dataset capture.");
            println!();
            println!("Run 'regionlab --help' for usage information.");
            Ok(())
        }
    }
}

fn run_review(args: ReviewArgs) -> Result<(), RegionlabError> {
    let mut session = AnnotationSession::review(ReviewConfig {
        images_dir: args.images_dir,
        labels_dir: args.labels_dir,
        classes_path: args.classes,
        schema: args.schema,
    })?;

    let report = drive(&mut session, args.events)?;
    print_report(&report, args.output)
}

fn run_capture(args: CaptureArgs) -> Result<(), RegionlabError> {
    let source = ImageSequenceSource::open(&args.source_dir)?;
    let mut session = AnnotationSession::capture(
        CaptureConfig {
            classes_path: args.classes,
            prefix: args.prefix,
            schema: args.schema,
            root: args.root,
            start_frame: args.start_frame,
        },
        Box::new(source),
    )?;

    let report = drive(&mut session, args.events)?;
    print_report(&report, args.output)
}

fn run_classes(args: ClassesArgs) -> Result<(), RegionlabError> {
    let classes = ClassList::load(&args.classes)?;
    print!("{}", classes);
    Ok(())
}

fn drive(
    session: &mut AnnotationSession,
    events: Option<PathBuf>,
) -> Result<RunReport, RegionlabError> {
    match events {
        Some(path) => {
            let events = script::read_script(&path)?;
            script::run_events(session, &events)
        }
        None => script::run_to_end(session),
    }
}

fn print_report(report: &RunReport, format: ReportFormat) -> Result<(), RegionlabError> {
    match format {
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        ReportFormat::Text => {
            let summary = &report.session;
            println!("mode: {:?} ({} schema)", summary.mode, summary.schema);
            if let Some(entries) = summary.dataset_entries {
                println!("entries: {}", entries);
            }
            if let Some(position) = summary.position {
                println!("position: {}", position);
            }
            if let Some(image) = &summary.current_image {
                println!("image: {}", image.display());
            }
            if let Some(counter) = summary.frame_counter {
                println!("exported: {}", counter);
            }
            println!(
                "regions: {} ({} selected)",
                summary.regions, summary.selected_regions
            );
            println!(
                "stopped: {:?} after {} event(s)",
                report.stopped_by, report.events_processed
            );
        }
    }
    Ok(())
}
