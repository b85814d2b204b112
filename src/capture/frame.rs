use std::path::{Path, PathBuf};

use image::RgbImage;
use log::debug;
use walkdir::WalkDir;

use crate::error::RegionlabError;
use crate::geom::ImageSize;

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// One decoded frame.
#[derive(Clone, Debug)]
pub struct Frame {
    pub image: RgbImage,
    /// Position of the frame in its source.
    pub index: usize,
}

impl Frame {
    pub fn new(image: RgbImage, index: usize) -> Self {
        Self { image, index }
    }

    pub fn size(&self) -> ImageSize {
        ImageSize::new(self.image.width(), self.image.height())
    }
}

/// Producer of frames for live capture (file, camera or video decoder).
pub trait FrameSource {
    /// The next frame, or `None` at end of stream.
    fn next_frame(&mut self) -> Result<Option<Frame>, RegionlabError>;

    /// Skips ahead from the start of the stream so the next frame returned
    /// is `index`.
    fn skip_to(&mut self, index: usize) -> Result<(), RegionlabError> {
        for _ in 0..index {
            if self.next_frame()?.is_none() {
                break;
            }
        }
        Ok(())
    }
}

/// Frames read from the still images of a directory tree, in path order.
#[derive(Clone, Debug)]
pub struct ImageSequenceSource {
    root: PathBuf,
    files: Vec<PathBuf>,
    cursor: usize,
}

impl ImageSequenceSource {
    pub fn open(root: &Path) -> Result<Self, RegionlabError> {
        if !root.is_dir() {
            return Err(RegionlabError::FrameSourceUnavailable {
                path: root.to_path_buf(),
                message: "expected a directory of images".to_string(),
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry.map_err(|source| RegionlabError::FrameSourceUnavailable {
                path: root.to_path_buf(),
                message: format!("failed while traversing directory: {source}"),
            })?;

            if entry.file_type().is_file() && has_extension(entry.path(), &IMAGE_EXTENSIONS) {
                files.push(entry.path().to_path_buf());
            }
        }
        files.sort_by_cached_key(|path| rel_string(root, path));

        debug!("{}: {} frame(s)", root.display(), files.len());
        Ok(Self {
            root: root.to_path_buf(),
            files,
            cursor: 0,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FrameSource for ImageSequenceSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, RegionlabError> {
        let Some(path) = self.files.get(self.cursor) else {
            return Ok(None);
        };

        let image = image::open(path)
            .map_err(|source| RegionlabError::ImageDecode {
                path: path.clone(),
                source,
            })?
            .to_rgb8();

        let frame = Frame::new(image, self.cursor);
        self.cursor += 1;
        Ok(Some(frame))
    }

    /// Seeks without decoding the skipped files.
    fn skip_to(&mut self, index: usize) -> Result<(), RegionlabError> {
        self.cursor = index.min(self.files.len());
        Ok(())
    }
}

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    allowed
        .iter()
        .any(|allowed_ext| ext.eq_ignore_ascii_case(allowed_ext))
}

fn rel_string(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}
