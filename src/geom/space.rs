//! Coordinate space marker types.
//!
//! These are zero-sized types (ZSTs) used as type parameters to keep screen
//! pixel geometry and image-relative geometry apart at compile time.

use std::fmt;

/// Marker type for pixel coordinates (absolute values on the image grid).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pixel {}

/// Marker type for coordinates normalized by the image size (0.0 to 1.0).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Normalized {}

impl fmt::Debug for Pixel {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl fmt::Debug for Normalized {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}
