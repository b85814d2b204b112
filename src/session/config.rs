use std::path::PathBuf;

use crate::label::LabelSchema;

/// Inputs for reviewing an existing image/label directory pair.
#[derive(Clone, Debug)]
pub struct ReviewConfig {
    pub images_dir: PathBuf,
    pub labels_dir: PathBuf,
    pub classes_path: PathBuf,
    pub schema: LabelSchema,
}

/// Inputs for capturing a new dataset from a frame source.
#[derive(Clone, Debug)]
pub struct CaptureConfig {
    pub classes_path: PathBuf,
    pub prefix: String,
    pub schema: LabelSchema,
    /// Output root; the schema's default root when `None`.
    pub root: Option<PathBuf>,
    /// Frames to skip before the first one shown.
    pub start_frame: usize,
}

impl CaptureConfig {
    pub fn resolved_root(&self) -> PathBuf {
        self.root
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.schema.default_capture_root()))
    }
}
