#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub fn bmp_bytes(width: u32, height: u32) -> Vec<u8> {
    let row_stride = (width * 3).div_ceil(4) * 4;
    let pixel_array_size = row_stride * height;
    let file_size = 54 + pixel_array_size;

    let mut bytes = Vec::with_capacity(file_size as usize);
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&file_size.to_le_bytes());
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(&54u32.to_le_bytes());

    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(&(width as i32).to_le_bytes());
    bytes.extend_from_slice(&(height as i32).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&24u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&pixel_array_size.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());

    bytes.resize(file_size as usize, 0);
    bytes
}

pub fn write_bmp(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, bmp_bytes(width, height)).expect("write bmp file");
}

pub fn write_text(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, content).expect("write text file");
}

/// One review entry: image stem, image size and label file content.
pub struct Entry<'a> {
    pub stem: &'a str,
    pub width: u32,
    pub height: u32,
    pub labels: &'a str,
}

/// Writes `<root>/images/<stem>.bmp` and `<root>/labels/<stem>.txt` for
/// every entry and returns the two directories.
pub fn write_review_dataset(root: &Path, entries: &[Entry<'_>]) -> (PathBuf, PathBuf) {
    let images_dir = root.join("images");
    let labels_dir = root.join("labels");
    fs::create_dir_all(&images_dir).expect("create images dir");
    fs::create_dir_all(&labels_dir).expect("create labels dir");

    for entry in entries {
        write_bmp(
            &images_dir.join(format!("{}.bmp", entry.stem)),
            entry.width,
            entry.height,
        );
        write_text(&labels_dir.join(format!("{}.txt", entry.stem)), entry.labels);
    }

    (images_dir, labels_dir)
}

pub fn write_classes(root: &Path, names: &[&str]) -> PathBuf {
    let path = root.join("classes.txt");
    write_text(&path, &format!("{}\n", names.join("\n")));
    path
}

/// Writes `count` frames named `frame_NNN.bmp` into `dir`.
pub fn write_frames(dir: &Path, count: usize, width: u32, height: u32) {
    for n in 0..count {
        write_bmp(&dir.join(format!("frame_{n:03}.bmp")), width, height);
    }
}
