//! Review-mode dataset indexing.
//!
//! A dataset is a pair of directories, one holding images and one holding
//! label files. Entries are paired purely by sorted position: the n-th image
//! name goes with the n-th label name, whatever the names are.

mod index;

pub use index::{DatasetEntry, DatasetIndex, LoadedEntry, FIRST_VALID_INDEX};
