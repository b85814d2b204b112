//! Absolute-corner, multi-attribute label records.
//!
//! One record per line with 15 whitespace-separated fields:
//!
//! ```text
//! type truncated occluded observationAngle left top right bottom dimHeight dimWidth dimLength locX locY locZ rotationY
//! ```
//!
//! Floats are written with two decimals, the conventional precision of this
//! format.

use super::{parse_f64_field, LabelParseError};
use crate::geom::{Point, Rect};

pub(crate) const FIELD_COUNT: usize = 15;

/// Highest valid occlusion state (0 = fully visible ... 3 = unknown).
pub const MAX_OCCLUDED: i32 = 3;

/// A corner-style label record.
#[derive(Clone, Debug, PartialEq)]
pub struct CornerRecord {
    /// Object type, e.g. `Car`, `Pedestrian` or `DontCare`.
    pub kind: String,
    /// 0.0 (fully inside the image) to 1.0 (leaving the image).
    pub truncated: f64,
    /// Occlusion state in `0..=3`.
    pub occluded: i32,
    /// Observation angle in radians, `[-pi, pi]`.
    pub observation_angle: f64,
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    /// 3D object dimensions in meters.
    pub dim_height: f64,
    pub dim_width: f64,
    pub dim_length: f64,
    /// 3D location in camera coordinates, meters.
    pub loc_x: f64,
    pub loc_y: f64,
    pub loc_z: f64,
    /// Rotation around the camera Y axis, `[-pi, pi]`.
    pub rotation_y: f64,
}

impl CornerRecord {
    /// A freshly drawn region: every attribute zeroed, corners from `rect`.
    pub fn from_rect(kind: impl Into<String>, rect: Rect) -> Self {
        let mut record = Self {
            kind: kind.into(),
            truncated: 0.0,
            occluded: 0,
            observation_angle: 0.0,
            left: 0.0,
            top: 0.0,
            right: 0.0,
            bottom: 0.0,
            dim_height: 0.0,
            dim_width: 0.0,
            dim_length: 0.0,
            loc_x: 0.0,
            loc_y: 0.0,
            loc_z: 0.0,
            rotation_y: 0.0,
        };
        record.set_rect(rect);
        record
    }

    pub fn set_rect(&mut self, rect: Rect) {
        let br = rect.bottom_right();
        self.left = rect.x as f64;
        self.top = rect.y as f64;
        self.right = br.x as f64;
        self.bottom = br.y as f64;
    }

    pub fn rect(&self) -> Rect {
        Rect::from_corners(
            Point::new(self.left.round() as i32, self.top.round() as i32),
            Point::new(self.right.round() as i32, self.bottom.round() as i32),
        )
    }

    pub fn encode(&self) -> String {
        format!(
            "{} {:.2} {} {:.2} {:.2} {:.2} {:.2} {:.2} {:.2} {:.2} {:.2} {:.2} {:.2} {:.2} {:.2}",
            self.kind,
            self.truncated,
            self.occluded,
            self.observation_angle,
            self.left,
            self.top,
            self.right,
            self.bottom,
            self.dim_height,
            self.dim_width,
            self.dim_length,
            self.loc_x,
            self.loc_y,
            self.loc_z,
            self.rotation_y,
        )
    }

    pub(crate) fn decode_tokens(tokens: &[&str]) -> Result<Self, LabelParseError> {
        debug_assert_eq!(tokens.len(), FIELD_COUNT);

        let occluded = tokens[2]
            .parse::<i32>()
            .map_err(|_| LabelParseError::InvalidField {
                field: "occluded",
                value: tokens[2].to_string(),
                expected: "integer",
            })?;
        if !(0..=MAX_OCCLUDED).contains(&occluded) {
            return Err(LabelParseError::OccludedOutOfRange(occluded));
        }

        Ok(Self {
            kind: tokens[0].to_string(),
            truncated: parse_f64_field(tokens[1], "truncated")?,
            occluded,
            observation_angle: parse_f64_field(tokens[3], "observation_angle")?,
            left: parse_f64_field(tokens[4], "left")?,
            top: parse_f64_field(tokens[5], "top")?,
            right: parse_f64_field(tokens[6], "right")?,
            bottom: parse_f64_field(tokens[7], "bottom")?,
            dim_height: parse_f64_field(tokens[8], "dim_height")?,
            dim_width: parse_f64_field(tokens[9], "dim_width")?,
            dim_length: parse_f64_field(tokens[10], "dim_length")?,
            loc_x: parse_f64_field(tokens[11], "loc_x")?,
            loc_y: parse_f64_field(tokens[12], "loc_y")?,
            loc_z: parse_f64_field(tokens[13], "loc_z")?,
            rotation_y: parse_f64_field(tokens[14], "rotation_y")?,
        })
    }
}
