use std::path::Path;

use regionlab::classes::ClassRef;
use regionlab::dataset::{DatasetEntry, DatasetIndex, FIRST_VALID_INDEX};
use regionlab::geom::{ImageSize, Point, Rect};
use regionlab::label::LabelSchema;
use regionlab::region::RegionStore;
use proptest::prelude::*;

mod proptest_helpers;

const CELL: i32 = 20;

/// `count` disjoint 10x10 regions on a row, one per 20px cell.
fn row_store(count: usize) -> RegionStore {
    let mut store = RegionStore::new(LabelSchema::Corner, ImageSize::new(400, 40));
    let class = ClassRef::new(0, "Car");
    for i in 0..count as i32 {
        store.add(Rect::new(i * CELL, 0, 10, 10), &class);
    }
    store
}

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn hit_inside_one_region_toggles_only_it(
        (count, target, preselected) in (1usize..=16).prop_flat_map(|count| {
            (Just(count), 0..count, proptest::option::of(0..count))
        }),
        dx in 0..10i32,
        dy in 0..10i32,
    ) {
        let mut store = row_store(count);
        if let Some(pre) = preselected {
            store.hit_test(Point::new(pre as i32 * CELL, 0));
        }
        let was_selected = preselected == Some(target);

        let active = store.hit_test(Point::new(target as i32 * CELL + dx, dy));

        for (i, region) in store.iter().enumerate() {
            if i == target {
                prop_assert_eq!(region.selected, !was_selected);
            } else {
                prop_assert!(!region.selected);
            }
        }
        prop_assert_eq!(active.map(|a| a.index), (!was_selected).then_some(target));
    }

    #[test]
    fn hit_outside_all_regions_deselects_everything(
        count in 1usize..=16,
        preselected in 0usize..16,
        gap_x in 10..CELL,
        cell in 0usize..16,
    ) {
        let mut store = row_store(count);
        store.hit_test(Point::new((preselected % count) as i32 * CELL, 0));

        let active = store.hit_test(Point::new(cell as i32 * CELL + gap_x, 5));

        prop_assert_eq!(store.selected_count(), 0);
        prop_assert_eq!(active, None);
    }

    #[test]
    fn move_preserves_size_and_tracks_label(
        (size, rect, target) in proptest_helpers::arb_image_size().prop_flat_map(|size| {
            (Just(size), proptest_helpers::arb_rect_within(size), proptest_helpers::arb_point(size))
        }),
        normalized in any::<bool>(),
    ) {
        let schema = if normalized { LabelSchema::Normalized } else { LabelSchema::Corner };
        let mut store = RegionStore::new(schema, size);
        store.add(rect, &ClassRef::new(0, "Car"));

        let grab = rect.top_left();
        prop_assert!(store.hit_test(grab).is_some());
        prop_assert!(store.move_active(target));

        let region = store.get(0).expect("region");
        prop_assert_eq!(region.rect.width, rect.width);
        prop_assert_eq!(region.rect.height, rect.height);
        prop_assert_eq!(region.rect.top_left(), target);
        prop_assert_eq!(region.label.rect(size), region.rect);
    }

    #[test]
    fn navigation_stays_in_range(
        entries in 1usize..=10,
        steps in proptest::collection::vec(any::<bool>(), 0..40),
    ) {
        let index = DatasetIndex::from_entries(
            Path::new("images"),
            Path::new("labels"),
            (0..entries)
                .map(|i| DatasetEntry {
                    image_file: format!("{i}.png"),
                    label_file: format!("{i}.txt"),
                })
                .collect(),
        );
        let last = index.count() - 1;

        let mut position = FIRST_VALID_INDEX;
        for forward in steps {
            let next = if forward { index.next(position) } else { index.prev(position) };
            prop_assert!((FIRST_VALID_INDEX..=last).contains(&next));
            if (forward && position == last) || (!forward && position == FIRST_VALID_INDEX) {
                prop_assert_eq!(next, position);
            }
            position = next;
        }
    }
}
