//! Typed coordinate values using PhantomData for compile-time safety.

use std::marker::PhantomData;

use super::rect::ImageSize;
use super::{Normalized, Pixel};

/// A 2D floating-point coordinate tagged with its coordinate space.
#[derive(Clone, Copy, PartialEq)]
pub struct Coord<TSpace> {
    pub x: f64,
    pub y: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> Coord<TSpace> {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            _space: PhantomData,
        }
    }
}

impl Coord<Pixel> {
    /// Divides by the image dimensions.
    pub fn to_normalized(&self, size: ImageSize) -> Coord<Normalized> {
        Coord::new(self.x / size.width_f64(), self.y / size.height_f64())
    }
}

impl Coord<Normalized> {
    /// Scales back up by the image dimensions.
    pub fn to_pixel(&self, size: ImageSize) -> Coord<Pixel> {
        Coord::new(self.x * size.width_f64(), self.y * size.height_f64())
    }
}

impl<TSpace> std::fmt::Debug for Coord<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coord")
            .field("x", &self.x)
            .field("y", &self.y)
            .finish()
    }
}

impl<TSpace> Default for Coord<TSpace> {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}
