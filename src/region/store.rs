use log::debug;
use serde::Serialize;

use crate::classes::ClassRef;
use crate::geom::{ImageSize, Point, Rect};
use crate::label::{LabelRecord, LabelSchema};

/// One labeled rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub label: LabelRecord,
    pub rect: Rect,
    pub selected: bool,
}

impl Region {
    fn new(label: LabelRecord, rect: Rect) -> Self {
        Self {
            label,
            rect,
            selected: false,
        }
    }
}

/// Handle to the region currently eligible for moves.
///
/// `offset` is the pointer position relative to the region's top-left at
/// selection time, so dragging keeps the grab point under the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ActiveRegion {
    pub index: usize,
    pub offset: Point,
}

/// Ordered regions for the image or frame being annotated.
#[derive(Clone, Debug)]
pub struct RegionStore {
    schema: LabelSchema,
    image_size: ImageSize,
    regions: Vec<Region>,
    active: Option<ActiveRegion>,
}

impl RegionStore {
    pub fn new(schema: LabelSchema, image_size: ImageSize) -> Self {
        Self {
            schema,
            image_size,
            regions: Vec::new(),
            active: None,
        }
    }

    pub fn schema(&self) -> LabelSchema {
        self.schema
    }

    pub fn image_size(&self) -> ImageSize {
        self.image_size
    }

    /// Empties the store for a new image or frame of the given size.
    pub fn reset(&mut self, image_size: ImageSize) {
        self.clear();
        self.image_size = image_size;
    }

    /// Adopts a new frame size, keeping the regions where they are.
    ///
    /// Label geometry is recomputed from each region's pixel rectangle, so
    /// normalized labels stay relative to the new frame.
    pub fn set_image_size(&mut self, image_size: ImageSize) {
        if image_size == self.image_size {
            return;
        }
        self.image_size = image_size;
        for region in &mut self.regions {
            region.label.set_rect(region.rect, image_size);
        }
    }

    /// Appends an unselected region for `rect` labeled with `class`.
    pub fn add(&mut self, rect: Rect, class: &ClassRef) {
        let label = LabelRecord::new(self.schema, class, rect, self.image_size);
        debug!("add region {:?} as '{}'", rect, label);
        self.regions.push(Region::new(label, rect));
    }

    /// Appends an unselected region for a decoded record.
    pub fn insert_record(&mut self, label: LabelRecord) {
        let rect = label.rect(self.image_size);
        self.regions.push(Region::new(label, rect));
    }

    /// Toggles selection of every region containing `point` and deselects
    /// the rest.
    ///
    /// Overlapping regions can end up selected together. The last region
    /// whose selection turned on becomes active; if none did, no region is
    /// active. Returns the new active handle.
    pub fn hit_test(&mut self, point: Point) -> Option<ActiveRegion> {
        self.active = None;

        for (index, region) in self.regions.iter_mut().enumerate() {
            if region.rect.contains(point) {
                region.selected = !region.selected;
                if region.selected {
                    self.active = Some(ActiveRegion {
                        index,
                        offset: point - region.rect.top_left(),
                    });
                }
            } else {
                region.selected = false;
            }
        }

        debug!("hit test at {:?} -> active {:?}", point, self.active);
        self.active
    }

    /// Moves the active region so its grab point sits under `point`.
    ///
    /// Size is preserved and the label geometry is recomputed. Returns false
    /// if there is no valid active region.
    pub fn move_active(&mut self, point: Point) -> bool {
        let Some(active) = self.active_checked() else {
            return false;
        };

        let image_size = self.image_size;
        let region = &mut self.regions[active.index];
        region.rect = region.rect.moved_to(point - active.offset);
        region.label.set_rect(region.rect, image_size);
        true
    }

    /// Stops moving without changing selection.
    pub fn release_active(&mut self) {
        self.active = None;
    }

    /// Removes every selected region. Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        let before = self.regions.len();
        self.regions.retain(|region| !region.selected);
        self.active = None;
        before - self.regions.len()
    }

    /// Removes all regions.
    pub fn clear(&mut self) {
        self.regions.clear();
        self.active = None;
    }

    /// The active handle, if it still points at a selected region.
    pub fn active(&self) -> Option<ActiveRegion> {
        self.active_checked()
    }

    fn active_checked(&self) -> Option<ActiveRegion> {
        self.active.filter(|active| {
            self.regions
                .get(active.index)
                .map(|region| region.selected)
                .unwrap_or(false)
        })
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Region> {
        self.regions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    pub fn selected_count(&self) -> usize {
        self.regions.iter().filter(|region| region.selected).count()
    }

    /// Label records in store order.
    pub fn records(&self) -> impl Iterator<Item = &LabelRecord> {
        self.regions.iter().map(|region| &region.label)
    }
}
