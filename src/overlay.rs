//! Render description of the annotation canvas.
//!
//! The engine does not draw anything; a host draws the crop rectangle, each
//! region with its caption, and a status line from an [`Overlay`].

use serde::Serialize;

use crate::classes::ClassList;
use crate::geom::Rect;
use crate::label::LabelRecord;
use crate::region::RegionStore;

/// RGB colour triple.
pub type Rgb = [u8; 3];

pub const CROP_COLOR: Rgb = [0, 255, 0];
pub const SELECTED_COLOR: Rgb = [255, 0, 0];
pub const UNSELECTED_COLOR: Rgb = [255, 255, 0];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegionShape {
    pub rect: Rect,
    pub caption: String,
    pub selected: bool,
}

impl RegionShape {
    pub fn color(&self) -> Rgb {
        if self.selected {
            SELECTED_COLOR
        } else {
            UNSELECTED_COLOR
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Overlay {
    pub crop: Rect,
    pub regions: Vec<RegionShape>,
    pub status: String,
}

impl Overlay {
    pub fn build(crop: Rect, store: &RegionStore, classes: &ClassList, status: String) -> Self {
        let regions = store
            .iter()
            .map(|region| RegionShape {
                rect: region.rect,
                caption: caption(&region.label, classes),
                selected: region.selected,
            })
            .collect();

        Self {
            crop,
            regions,
            status,
        }
    }
}

/// Corner records show their type string; normalized records show the class
/// name, or the bare index when it is outside the class list.
pub fn caption(label: &LabelRecord, classes: &ClassList) -> String {
    match label {
        LabelRecord::Corner(record) => record.kind.clone(),
        LabelRecord::Normalized(record) => classes
            .name(record.class_index)
            .map(str::to_string)
            .unwrap_or_else(|| record.class_index.to_string()),
    }
}
