//! Geometry shared by the region model, the editor and the label codec.
//!
//! Pointer input and region boxes live on the integer pixel grid ([`Point`],
//! [`Rect`]). The normalized label schema stores boxes as image-relative
//! centers, so conversions go through [`CenterBox`] with the [`Pixel`] and
//! [`Normalized`] space markers keeping the two apart.

mod center_box;
mod coord;
mod rect;
mod space;

pub use center_box::CenterBox;
pub use coord::Coord;
pub use rect::{ImageSize, Point, Rect};
pub use space::{Normalized, Pixel};
