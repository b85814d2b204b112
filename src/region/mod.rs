//! Regions of the current image or frame and the operations that edit them.

mod store;

pub use store::{ActiveRegion, Region, RegionStore};
