//! Class index plus normalized center box records.
//!
//! ```text
//! classIndex centerX centerY width height
//! ```
//!
//! Geometry is relative to the image size, with `centerX`/`centerY` the
//! box center.

use super::{parse_f64_field, LabelParseError};
use crate::geom::{CenterBox, ImageSize, Normalized, Rect};

pub(crate) const FIELD_COUNT: usize = 5;

/// A normalized-center label record.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedRecord {
    pub class_index: usize,
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
}

impl NormalizedRecord {
    pub fn from_rect(class_index: usize, rect: Rect, size: ImageSize) -> Self {
        let mut record = Self {
            class_index,
            center_x: 0.0,
            center_y: 0.0,
            width: 0.0,
            height: 0.0,
        };
        record.set_rect(rect, size);
        record
    }

    pub fn set_rect(&mut self, rect: Rect, size: ImageSize) {
        let (cx, cy, w, h) = CenterBox::from_rect(rect).to_normalized(size).to_cxcywh();
        self.center_x = cx;
        self.center_y = cy;
        self.width = w;
        self.height = h;
    }

    pub fn center_box(&self) -> CenterBox<Normalized> {
        CenterBox::from_cxcywh(self.center_x, self.center_y, self.width, self.height)
    }

    pub fn rect(&self, size: ImageSize) -> Rect {
        self.center_box().to_pixel(size).to_rect()
    }

    pub fn encode(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.class_index,
            format_trimmed(self.center_x),
            format_trimmed(self.center_y),
            format_trimmed(self.width),
            format_trimmed(self.height),
        )
    }

    pub(crate) fn decode_tokens(tokens: &[&str]) -> Result<Self, LabelParseError> {
        debug_assert_eq!(tokens.len(), FIELD_COUNT);

        let class_index =
            tokens[0]
                .parse::<usize>()
                .map_err(|_| LabelParseError::InvalidField {
                    field: "class_index",
                    value: tokens[0].to_string(),
                    expected: "non-negative integer",
                })?;

        Ok(Self {
            class_index,
            center_x: parse_f64_field(tokens[1], "center_x")?,
            center_y: parse_f64_field(tokens[2], "center_y")?,
            width: parse_f64_field(tokens[3], "width")?,
            height: parse_f64_field(tokens[4], "height")?,
        })
    }
}

/// Six decimals with trailing zeros dropped: `0.0625`, `0.052083`, `1`.
fn format_trimmed(value: f64) -> String {
    let fixed = format!("{:.6}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_trimmed_drops_trailing_zeros() {
        assert_eq!(format_trimmed(0.0625), "0.0625");
        assert_eq!(format_trimmed(25.0 / 480.0), "0.052083");
        assert_eq!(format_trimmed(1.0), "1");
        assert_eq!(format_trimmed(0.0), "0");
        assert_eq!(format_trimmed(-0.0000001), "0");
        assert_eq!(format_trimmed(0.5), "0.5");
    }

    #[test]
    fn crop_rect_converts_to_center_record() {
        let record = NormalizedRecord::from_rect(0, Rect::new(10, 10, 40, 30), ImageSize::new(640, 480));
        assert_eq!(record.encode(), "0 0.046875 0.052083 0.0625 0.0625");
    }

    #[test]
    fn rect_recovers_pixel_geometry() {
        let size = ImageSize::new(640, 480);
        let record = NormalizedRecord::from_rect(3, Rect::new(100, 50, 64, 48), size);
        assert_eq!(record.rect(size), Rect::new(100, 50, 64, 48));
    }
}
