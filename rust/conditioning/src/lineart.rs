// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Line-art conditioning from precise CAD geometry
//!
//! Walls, doors and windows are drawn as outlines on a white canvas after
//! fitting the dataset's bounding box into the canvas. Source Y points up,
//! so the drawing is flipped.

use crate::config::ConditioningConfig;
use crate::normalize::{Bounds, CanvasTransform};
use crate::raster::{blank_canvas, outline_rect};
use crate::types::{RawCategory, RawDataset, RawItem};
use image::GrayImage;

const BACKGROUND: u8 = 255;
const WALL_INK: u8 = 0;
const DOOR_INK: u8 = 100;
const WINDOW_OUTER_INK: u8 = 50;
const WINDOW_INNER_INK: u8 = 150;

const LOAD_BEARING_WALL_WIDTH: u32 = 4;
const WALL_WIDTH: u32 = 2;
const WINDOW_FRAME_INSET: f64 = 2.0;

/// Whether a CAD layer name marks load-bearing walls
pub fn is_load_bearing_layer(layer: &str) -> bool {
    let upper = layer.to_uppercase();
    if upper.contains("NON") || upper.contains("비내력") {
        return false;
    }
    upper.contains("LOAD") || upper.contains("BEARING") || upper.contains("내력")
}

fn is_load_bearing(item: &RawItem) -> bool {
    item.layer.as_deref().is_some_and(is_load_bearing_layer)
}

/// Render a structural line drawing of a raw dataset.
///
/// Returns `None` when the dataset has no placed items or its bounding box
/// has zero width or height.
pub fn render_lineart(dataset: &RawDataset, config: &ConditioningConfig) -> Option<GrayImage> {
    let rects: Vec<_> = dataset.placed_items().map(|(_, _, rect)| rect).collect();
    let Some(bounds) = Bounds::of_rects(&rects) else {
        tracing::debug!("No placed geometry, skipping line art");
        return None;
    };

    let Some(transform) = CanvasTransform::fit(
        bounds,
        config.canvas_width,
        config.canvas_height,
        config.lineart_margin,
        true,
    ) else {
        tracing::warn!(
            width = bounds.width(),
            height = bounds.height(),
            "Degenerate bounding box, skipping line art"
        );
        return None;
    };

    let mut canvas = blank_canvas(config.canvas_width, config.canvas_height, BACKGROUND);

    for (category, item, rect) in dataset.placed_items() {
        let bounds = transform.map_rect(&rect);
        match category {
            RawCategory::Wall => {
                let width = if is_load_bearing(item) {
                    LOAD_BEARING_WALL_WIDTH
                } else {
                    WALL_WIDTH
                };
                outline_rect(&mut canvas, bounds, width, WALL_INK);
            }
            RawCategory::Door => outline_rect(&mut canvas, bounds, 1, DOOR_INK),
            RawCategory::Window => {
                outline_rect(&mut canvas, bounds, 2, WINDOW_OUTER_INK);
                let (l, t, r, b) = bounds;
                let i = WINDOW_FRAME_INSET;
                outline_rect(&mut canvas, (l + i, t + i, r - i, b - i), 1, WINDOW_INNER_INK);
            }
        }
    }

    tracing::debug!(
        scale = transform.scale(),
        walls = dataset.walls.len(),
        doors = dataset.doors.len(),
        windows = dataset.windows.len(),
        "Rendered line art"
    );

    Some(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rect;

    fn config() -> ConditioningConfig {
        ConditioningConfig {
            canvas_width: 200,
            canvas_height: 200,
            lineart_margin: 10,
            ..Default::default()
        }
    }

    #[test]
    fn test_layer_classification() {
        assert!(is_load_bearing_layer("A-WALL-LOAD"));
        assert!(is_load_bearing_layer("내력벽"));
        assert!(!is_load_bearing_layer("A-WALL-NONLOAD"));
        assert!(!is_load_bearing_layer("비내력벽"));
        assert!(!is_load_bearing_layer("A-WALL"));
    }

    #[test]
    fn test_empty_dataset_has_no_lineart() {
        assert!(render_lineart(&RawDataset::default(), &config()).is_none());
    }

    #[test]
    fn test_zero_area_bounds_has_no_lineart() {
        let dataset = RawDataset {
            walls: vec![RawItem::new(Rect::new(0.0, 10.0, 100.0, 0.0))],
            ..Default::default()
        };
        assert!(render_lineart(&dataset, &config()).is_none());
    }

    #[test]
    fn test_wall_outline_thickness_by_layer() {
        let dataset = RawDataset {
            walls: vec![
                RawItem::new(Rect::new(0.0, 0.0, 90.0, 90.0)).with_layer("WALL-LOAD"),
                RawItem::new(Rect::new(100.0, 0.0, 80.0, 180.0)),
            ],
            ..Default::default()
        };
        let img = render_lineart(&dataset, &config()).unwrap();
        assert_eq!(img.dimensions(), (200, 200));

        // Scale 1.0: first wall spans x 10..100, load-bearing outline is 4 px
        assert_eq!(img.get_pixel(13, 150).0[0], WALL_INK);
        assert_eq!(img.get_pixel(14, 150).0[0], BACKGROUND);
        // Second wall spans x 110..190 with a 2 px outline
        assert_eq!(img.get_pixel(111, 100).0[0], WALL_INK);
        assert_eq!(img.get_pixel(112, 100).0[0], BACKGROUND);
    }

    #[test]
    fn test_window_has_double_frame() {
        let dataset = RawDataset {
            walls: vec![RawItem::new(Rect::new(0.0, 0.0, 180.0, 180.0))],
            windows: vec![RawItem::new(Rect::new(40.0, 40.0, 100.0, 100.0))],
            ..Default::default()
        };
        let img = render_lineart(&dataset, &config()).unwrap();

        // Window spans x 50..150 on the canvas
        assert_eq!(img.get_pixel(50, 100).0[0], WINDOW_OUTER_INK);
        assert_eq!(img.get_pixel(51, 100).0[0], WINDOW_OUTER_INK);
        assert_eq!(img.get_pixel(52, 100).0[0], WINDOW_INNER_INK);
        assert_eq!(img.get_pixel(53, 100).0[0], BACKGROUND);
    }
}
