use std::path::PathBuf;
use thiserror::Error;

/// The main error type for regionlab operations.
#[derive(Debug, Error)]
pub enum RegionlabError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to list directory {path}: {source}")]
    DirectoryScan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No dataset entries found in {images_dir} / {labels_dir}")]
    EmptyDataset {
        images_dir: PathBuf,
        labels_dir: PathBuf,
    },

    #[error("Dataset position {position} is out of range (valid: {first}..={last})")]
    PositionOutOfRange {
        position: usize,
        first: usize,
        last: usize,
    },

    #[error("Failed to read image dimensions from {path}: {source}")]
    ImageDimensionRead {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Image {path} is too large")]
    ImageTooLarge { path: PathBuf },

    #[error("Image {path} has zero width or height")]
    EmptyImage { path: PathBuf },

    #[error("Frame {index} has zero width or height")]
    EmptyFrame { index: usize },

    #[error("Failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode image {path}: {source}")]
    ImageEncode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to read label file {path}: {source}")]
    LabelRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read class list {path}: {message}")]
    ClassListInvalid { path: PathBuf, message: String },

    #[error("Failed to parse class map YAML from {path}: {source}")]
    ClassMapYamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Frame source {path} is unavailable: {message}")]
    FrameSourceUnavailable { path: PathBuf, message: String },

    #[error("Invalid event script line {line}: {message}")]
    EventScriptParse { line: usize, message: String },

    #[error("Failed to serialize report: {0}")]
    ReportWrite(#[from] serde_json::Error),
}
