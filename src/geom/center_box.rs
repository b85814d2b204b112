//! Center-based box representation used by the normalized label schema.

use super::coord::Coord;
use super::rect::{ImageSize, Rect};
use super::{Normalized, Pixel};

/// An axis-aligned box described by its center and size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CenterBox<TSpace> {
    pub center: Coord<TSpace>,
    pub width: f64,
    pub height: f64,
}

impl<TSpace> CenterBox<TSpace> {
    #[inline]
    pub fn from_cxcywh(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Self {
            center: Coord::new(cx, cy),
            width,
            height,
        }
    }

    #[inline]
    pub fn to_cxcywh(&self) -> (f64, f64, f64, f64) {
        (self.center.x, self.center.y, self.width, self.height)
    }
}

impl CenterBox<Pixel> {
    /// `center = top_left + size / 2`, computed in floating point.
    pub fn from_rect(rect: Rect) -> Self {
        let width = rect.width as f64;
        let height = rect.height as f64;
        Self::from_cxcywh(
            rect.x as f64 + width / 2.0,
            rect.y as f64 + height / 2.0,
            width,
            height,
        )
    }

    pub fn to_normalized(&self, size: ImageSize) -> CenterBox<Normalized> {
        CenterBox {
            center: self.center.to_normalized(size),
            width: self.width / size.width_f64(),
            height: self.height / size.height_f64(),
        }
    }

    /// Rounds to the nearest pixel on the integer grid.
    pub fn to_rect(&self) -> Rect {
        let left = self.center.x - self.width / 2.0;
        let top = self.center.y - self.height / 2.0;
        Rect::new(
            left.round() as i32,
            top.round() as i32,
            self.width.round() as i32,
            self.height.round() as i32,
        )
    }
}

impl CenterBox<Normalized> {
    pub fn to_pixel(&self, size: ImageSize) -> CenterBox<Pixel> {
        CenterBox {
            center: self.center.to_pixel(size),
            width: self.width * size.width_f64(),
            height: self.height * size.height_f64(),
        }
    }
}
