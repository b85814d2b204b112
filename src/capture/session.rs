use std::fs;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use log::{debug, info};
use serde::Serialize;

use super::frame::{Frame, FrameSource};
use crate::classes::ClassList;
use crate::error::RegionlabError;
use crate::label::{write_label_file, LabelCodec, LabelSchema};
use crate::region::RegionStore;

const IMAGES_SUBDIR: &str = "images";
const LABELS_SUBDIR: &str = "labels";
const CLASS_MAP_FILE: &str = "data.yaml";

/// What the capture loop does on each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum CaptureMode {
    /// Showing frames without exporting; `advance` pulls a new frame per tick.
    Browsing { advance: bool },
    /// Exporting the held frame every tick. Frames never advance here.
    Capturing,
}

impl Default for CaptureMode {
    fn default() -> Self {
        CaptureMode::Browsing { advance: true }
    }
}

impl CaptureMode {
    pub fn is_capturing(&self) -> bool {
        matches!(self, CaptureMode::Capturing)
    }

    pub fn is_advancing(&self) -> bool {
        matches!(self, CaptureMode::Browsing { advance: true })
    }
}

/// Paths written by one export.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExportedPair {
    pub counter: u64,
    pub image_path: PathBuf,
    pub label_path: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The frame stream is exhausted; the session should end.
    EndOfStream,
    /// The display needs a redraw.
    Redraw {
        advanced: bool,
        exported: Option<ExportedPair>,
    },
}

/// Turns frames into numbered image/label pairs under a root directory.
#[derive(Debug)]
pub struct CaptureSession {
    root: PathBuf,
    prefix: String,
    codec: LabelCodec,
    frame_counter: u64,
    mode: CaptureMode,
    frame: Option<Frame>,
    class_map: Option<ClassList>,
}

impl CaptureSession {
    pub fn new(root: impl Into<PathBuf>, prefix: impl Into<String>, schema: LabelSchema) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.into(),
            codec: LabelCodec::new(schema),
            frame_counter: 0,
            mode: CaptureMode::default(),
            frame: None,
            class_map: None,
        }
    }

    /// Classes to record in `data.yaml` when the schema is normalized.
    pub fn with_class_map(mut self, classes: ClassList) -> Self {
        self.class_map = Some(classes);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn schema(&self) -> LabelSchema {
        self.codec.schema()
    }

    /// Number of pairs exported so far; also the number of the next pair.
    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join(IMAGES_SUBDIR)
    }

    pub fn labels_dir(&self) -> PathBuf {
        self.root.join(LABELS_SUBDIR)
    }

    /// `<prefix><NNNNNN>` for a counter value.
    pub fn file_stem(&self, counter: u64) -> String {
        format!("{}{:06}", self.prefix, counter)
    }

    /// Creates the output directories (and class map) if missing.
    pub fn ensure_directories(&self) -> Result<(), RegionlabError> {
        for dir in [self.images_dir(), self.labels_dir()] {
            fs::create_dir_all(&dir).map_err(|source| RegionlabError::Write { path: dir, source })?;
        }

        if self.codec.schema() == LabelSchema::Normalized {
            if let Some(classes) = &self.class_map {
                let path = self.root.join(CLASS_MAP_FILE);
                if !path.exists() {
                    classes.write_data_yaml(&path)?;
                    info!("wrote {}", path.display());
                }
            }
        }

        Ok(())
    }

    /// Writes the frame as JPEG and the store as a label file, then bumps the
    /// counter. The counter is unchanged if either write fails.
    pub fn export_frame(
        &mut self,
        frame: &Frame,
        store: &RegionStore,
    ) -> Result<ExportedPair, RegionlabError> {
        self.ensure_directories()?;

        let stem = self.file_stem(self.frame_counter);
        let image_path = self.images_dir().join(format!("{stem}.jpg"));
        let label_path = self.labels_dir().join(format!("{stem}.txt"));

        frame
            .image
            .save_with_format(&image_path, ImageFormat::Jpeg)
            .map_err(|source| RegionlabError::ImageEncode {
                path: image_path.clone(),
                source,
            })?;
        write_label_file(&self.codec, &label_path, store.records())?;

        let exported = ExportedPair {
            counter: self.frame_counter,
            image_path,
            label_path,
        };
        self.frame_counter += 1;

        info!(
            "exported {} with {} region(s)",
            exported.image_path.display(),
            store.len()
        );
        Ok(exported)
    }

    pub fn toggle_export(&mut self) -> CaptureMode {
        self.mode = match self.mode {
            CaptureMode::Capturing => CaptureMode::Browsing { advance: false },
            CaptureMode::Browsing { .. } => CaptureMode::Capturing,
        };
        info!(
            "training export {}",
            if self.mode.is_capturing() { "ON" } else { "OFF" }
        );
        self.mode
    }

    pub fn toggle_advance(&mut self) -> CaptureMode {
        self.mode = match self.mode {
            CaptureMode::Browsing { advance } => CaptureMode::Browsing { advance: !advance },
            CaptureMode::Capturing => CaptureMode::Browsing { advance: true },
        };
        debug!("capture mode now {:?}", self.mode);
        self.mode
    }

    /// Pulls the next frame. Regions carry over onto it.
    ///
    /// Returns `false` at end of stream, keeping the previous frame.
    pub fn pull_frame(
        &mut self,
        source: &mut dyn FrameSource,
        store: &mut RegionStore,
    ) -> Result<bool, RegionlabError> {
        let Some(frame) = source.next_frame()? else {
            return Ok(false);
        };

        debug!("frame {} ({}x{})", frame.index, frame.image.width(), frame.image.height());
        if frame.size().is_empty() {
            return Err(RegionlabError::EmptyFrame { index: frame.index });
        }
        store.set_image_size(frame.size());
        self.frame = Some(frame);
        Ok(true)
    }

    /// One pass of the capture loop.
    pub fn tick(
        &mut self,
        source: &mut dyn FrameSource,
        store: &mut RegionStore,
    ) -> Result<TickOutcome, RegionlabError> {
        let advanced = if self.mode.is_advancing() {
            if !self.pull_frame(source, store)? {
                info!("end of frame stream after {} export(s)", self.frame_counter);
                return Ok(TickOutcome::EndOfStream);
            }
            true
        } else {
            false
        };

        let exported = match (self.mode, self.frame.take()) {
            (CaptureMode::Capturing, Some(frame)) => {
                let result = self.export_frame(&frame, store);
                self.frame = Some(frame);
                Some(result?)
            }
            (_, frame) => {
                self.frame = frame;
                None
            }
        };

        Ok(TickOutcome::Redraw { advanced, exported })
    }
}
