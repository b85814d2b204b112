use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::RegionlabError;
use crate::geom::ImageSize;
use crate::label::{read_label_file, write_label_file, DecodedLabels, LabelCodec};
use crate::region::RegionStore;

/// Position of the first real entry.
///
/// Positions follow a raw directory listing, in which positions 0 and 1 are
/// the `.` and `..` entries. Those two are never stored; they only offset
/// the numbering so positions match what the operator is shown.
pub const FIRST_VALID_INDEX: usize = 2;

/// One image/label pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetEntry {
    pub image_file: String,
    pub label_file: String,
}

/// What `import` read for one position.
#[derive(Clone, Debug)]
pub struct LoadedEntry {
    pub position: usize,
    pub image_path: PathBuf,
    pub label_path: PathBuf,
    pub image_size: ImageSize,
    pub labels: DecodedLabels,
}

/// Positionally paired image and label files.
#[derive(Clone, Debug)]
pub struct DatasetIndex {
    images_dir: PathBuf,
    labels_dir: PathBuf,
    entries: Vec<DatasetEntry>,
}

impl DatasetIndex {
    /// Lists both directories, sorts names lexicographically and pairs them
    /// by position.
    ///
    /// Base names are not compared. If the counts differ only the leading
    /// `min(images, labels)` positions are paired.
    pub fn scan(images_dir: &Path, labels_dir: &Path) -> Result<Self, RegionlabError> {
        let image_files = list_files(images_dir)?;
        let label_files = list_files(labels_dir)?;

        if image_files.len() != label_files.len() {
            warn!(
                "{} has {} file(s) but {} has {}; pairing the first {}",
                images_dir.display(),
                image_files.len(),
                labels_dir.display(),
                label_files.len(),
                image_files.len().min(label_files.len())
            );
        }

        let entries = image_files
            .into_iter()
            .zip(label_files)
            .map(|(image_file, label_file)| DatasetEntry {
                image_file,
                label_file,
            })
            .collect();

        Ok(Self::from_entries(images_dir, labels_dir, entries))
    }

    /// Builds an index from already-paired entries.
    pub fn from_entries(images_dir: &Path, labels_dir: &Path, entries: Vec<DatasetEntry>) -> Self {
        Self {
            images_dir: images_dir.to_path_buf(),
            labels_dir: labels_dir.to_path_buf(),
            entries,
        }
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    pub fn labels_dir(&self) -> &Path {
        &self.labels_dir
    }

    /// Listing length including the two reserved positions.
    pub fn count(&self) -> usize {
        self.entries.len() + FIRST_VALID_INDEX
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of real image/label pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Last valid position, if any entry exists.
    pub fn last_index(&self) -> Option<usize> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.count() - 1)
        }
    }

    pub fn entry(&self, position: usize) -> Option<&DatasetEntry> {
        position
            .checked_sub(FIRST_VALID_INDEX)
            .and_then(|i| self.entries.get(i))
    }

    pub fn entries(&self) -> &[DatasetEntry] {
        &self.entries
    }

    /// The position after `position`, or `position` itself at the end.
    pub fn next(&self, position: usize) -> usize {
        match self.last_index() {
            Some(last) if position < last => position + 1,
            _ => position,
        }
    }

    /// The position before `position`, or `position` itself at the start.
    pub fn prev(&self, position: usize) -> usize {
        if position > FIRST_VALID_INDEX {
            position - 1
        } else {
            position
        }
    }

    pub fn image_path(&self, position: usize) -> Result<PathBuf, RegionlabError> {
        let entry = self.checked_entry(position)?;
        Ok(self.images_dir.join(&entry.image_file))
    }

    pub fn label_path(&self, position: usize) -> Result<PathBuf, RegionlabError> {
        let entry = self.checked_entry(position)?;
        Ok(self.labels_dir.join(&entry.label_file))
    }

    /// Reads the image size and decodes the label file at `position`.
    pub fn import(&self, position: usize, codec: &LabelCodec) -> Result<LoadedEntry, RegionlabError> {
        let image_path = self.image_path(position)?;
        let label_path = self.label_path(position)?;

        let image_size = read_image_dimensions(&image_path)?;
        let labels = read_label_file(codec, &label_path)?;

        info!(
            "loaded #{} {} ({}x{}) with {} label(s)",
            position,
            image_path.display(),
            image_size.width,
            image_size.height,
            labels.records.len()
        );

        Ok(LoadedEntry {
            position,
            image_path,
            label_path,
            image_size,
            labels,
        })
    }

    /// Overwrites the label file at `position` with the store's regions.
    ///
    /// The image file is left untouched.
    pub fn export(
        &self,
        position: usize,
        codec: &LabelCodec,
        store: &RegionStore,
    ) -> Result<PathBuf, RegionlabError> {
        let label_path = self.label_path(position)?;
        write_label_file(codec, &label_path, store.records())?;
        info!(
            "saved #{} {} ({} region(s))",
            position,
            label_path.display(),
            store.len()
        );
        Ok(label_path)
    }

    /// Deletes both files at `position` and drops the entry.
    ///
    /// Later entries shift down one position.
    pub fn delete(&mut self, position: usize) -> Result<DatasetEntry, RegionlabError> {
        let image_path = self.image_path(position)?;
        let label_path = self.label_path(position)?;

        remove_if_present(&image_path)?;
        remove_if_present(&label_path)?;

        let entry = self.entries.remove(position - FIRST_VALID_INDEX);
        info!(
            "purged #{} ({} / {})",
            position, entry.image_file, entry.label_file
        );
        Ok(entry)
    }

    fn checked_entry(&self, position: usize) -> Result<&DatasetEntry, RegionlabError> {
        self.entry(position)
            .ok_or_else(|| RegionlabError::PositionOutOfRange {
                position,
                first: FIRST_VALID_INDEX,
                last: self.count().saturating_sub(1),
            })
    }
}

/// Regular file names directly inside `dir`, sorted lexicographically.
fn list_files(dir: &Path) -> Result<Vec<String>, RegionlabError> {
    let mut names = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry.map_err(|source| RegionlabError::DirectoryScan {
            path: dir.to_path_buf(),
            source: source.into(),
        })?;

        if entry.file_type().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    // Byte-wise lexicographic order: "img10" sorts before "img2".
    names.sort();
    debug!("{}: {} file(s)", dir.display(), names.len());
    Ok(names)
}

fn remove_if_present(path: &Path) -> Result<(), RegionlabError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            warn!("{} was already gone", path.display());
            Ok(())
        }
        Err(source) => Err(RegionlabError::Write {
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub(crate) fn read_image_dimensions(path: &Path) -> Result<ImageSize, RegionlabError> {
    let size = imagesize::size(path).map_err(|source| RegionlabError::ImageDimensionRead {
        path: path.to_path_buf(),
        source,
    })?;

    let (Ok(width), Ok(height)) = (u32::try_from(size.width), u32::try_from(size.height)) else {
        return Err(RegionlabError::ImageTooLarge {
            path: path.to_path_buf(),
        });
    };

    let size = ImageSize::new(width, height);
    if size.is_empty() {
        return Err(RegionlabError::EmptyImage {
            path: path.to_path_buf(),
        });
    }
    Ok(size)
}
