// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinate normalization
//!
//! Raw CAD datasets use a bottom-left origin with Y increasing upward.
//! Interpreted floor plans and rasters use a top-left origin with Y
//! increasing downward. Element positions are treated as being in the same
//! units as the raw dataset they were derived from; only the vertical axis
//! is flipped, X passes through untouched.

use crate::types::{RawDataset, Rect, StructuralElement};

/// Largest `y + height` over all placed items of a dataset.
///
/// Returns `None` when the dataset has no placed items or the extent is not
/// strictly positive; a flip around such a value is meaningless.
pub fn source_max_y(dataset: &RawDataset) -> Option<f64> {
    dataset
        .placed_items()
        .map(|(_, _, rect)| rect.top())
        .fold(None, |acc: Option<f64>, top| Some(acc.map_or(top, |m| m.max(top))))
        .filter(|max_y| *max_y > 0.0)
}

/// Flip a rectangle vertically around `max_y`.
///
/// Applying the flip twice with the same `max_y` returns the input rectangle.
pub fn flip_rect(rect: &Rect, max_y: f64) -> Rect {
    Rect {
        y: max_y - rect.y - rect.height,
        ..*rect
    }
}

/// Convert element positions from source to target convention.
///
/// Without a max-Y the elements pass through unchanged.
pub fn normalize_elements(
    elements: &[StructuralElement],
    max_y: Option<f64>,
) -> Vec<StructuralElement> {
    let Some(max_y) = max_y else {
        tracing::warn!(
            count = elements.len(),
            "No source max-Y available, skipping vertical flip"
        );
        return elements.to_vec();
    };

    tracing::debug!(max_y, count = elements.len(), "Flipping element coordinates");
    elements
        .iter()
        .map(|element| StructuralElement {
            position: flip_rect(&element.position, max_y),
            ..element.clone()
        })
        .collect()
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Bounding box over a set of rectangles
    pub fn of_rects<'a>(rects: impl IntoIterator<Item = &'a Rect>) -> Option<Self> {
        rects.into_iter().fold(None, |acc, r| {
            let b = Bounds {
                min_x: r.x.min(r.right()),
                min_y: r.y.min(r.top()),
                max_x: r.x.max(r.right()),
                max_y: r.y.max(r.top()),
            };
            Some(match acc {
                None => b,
                Some(a) => Bounds {
                    min_x: a.min_x.min(b.min_x),
                    min_y: a.min_y.min(b.min_y),
                    max_x: a.max_x.max(b.max_x),
                    max_y: a.max_y.max(b.max_y),
                },
            })
        })
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Uniform mapping of source units onto a fixed-size canvas
#[derive(Debug, Clone, Copy)]
pub struct CanvasTransform {
    bounds: Bounds,
    scale: f64,
    margin: f64,
    flip_y: bool,
}

impl CanvasTransform {
    /// Fit `bounds` into a `width × height` canvas leaving `margin` pixels on
    /// every side. Aspect ratio is preserved.
    ///
    /// Returns `None` for a zero-area box or a canvas smaller than its margins.
    pub fn fit(bounds: Bounds, width: u32, height: u32, margin: u32, flip_y: bool) -> Option<Self> {
        let (src_w, src_h) = (bounds.width(), bounds.height());
        if src_w <= 0.0 || src_h <= 0.0 {
            return None;
        }

        let margin = margin as f64;
        let avail_w = width as f64 - 2.0 * margin;
        let avail_h = height as f64 - 2.0 * margin;
        if avail_w <= 0.0 || avail_h <= 0.0 {
            return None;
        }

        let scale = (avail_w / src_w).min(avail_h / src_h);
        Some(Self {
            bounds,
            scale,
            margin,
            flip_y,
        })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Map a source point onto the canvas
    pub fn map_point(&self, x: f64, y: f64) -> (f64, f64) {
        let cx = self.margin + (x - self.bounds.min_x) * self.scale;
        let cy = if self.flip_y {
            self.margin + (self.bounds.max_y - y) * self.scale
        } else {
            self.margin + (y - self.bounds.min_y) * self.scale
        };
        (cx, cy)
    }

    /// Map a source rectangle onto the canvas as `(left, top, right, bottom)`
    pub fn map_rect(&self, rect: &Rect) -> (f64, f64, f64, f64) {
        let (x0, y0) = self.map_point(rect.x, rect.y);
        let (x1, y1) = self.map_point(rect.right(), rect.top());
        (x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ElementType, RawItem};
    use approx::assert_relative_eq;

    fn dataset() -> RawDataset {
        RawDataset {
            walls: vec![RawItem::new(Rect::new(0.0, 0.0, 100.0, 20.0))],
            doors: vec![RawItem::new(Rect::new(40.0, 60.0, 10.0, 20.0))],
            windows: vec![RawItem::new(Rect::new(10.0, 95.0, 40.0, 5.0))],
        }
    }

    #[test]
    fn test_source_max_y() {
        assert_eq!(source_max_y(&dataset()), Some(100.0));
        assert_eq!(source_max_y(&RawDataset::default()), None);

        let flat = RawDataset {
            walls: vec![RawItem::new(Rect::new(0.0, 0.0, 10.0, 0.0))],
            ..Default::default()
        };
        assert_eq!(source_max_y(&flat), None);
    }

    #[test]
    fn test_flip_is_involutive() {
        let rect = Rect::new(3.0, 17.5, 8.0, 4.25);
        let once = flip_rect(&rect, 100.0);
        assert_relative_eq!(once.y, 78.25);
        assert_relative_eq!(once.x, rect.x);

        let twice = flip_rect(&once, 100.0);
        assert_relative_eq!(twice.y, rect.y);
    }

    #[test]
    fn test_normalize_without_max_y_passes_through() {
        let elements = vec![StructuralElement::new(
            ElementType::Pillar,
            "기둥",
            Rect::new(5.0, 5.0, 2.0, 2.0),
        )];
        let normalized = normalize_elements(&elements, None);
        assert_eq!(normalized[0].position, elements[0].position);
    }

    #[test]
    fn test_canvas_transform_preserves_aspect() {
        let bounds = Bounds::of_rects(&[Rect::new(0.0, 0.0, 200.0, 100.0)]).unwrap();
        let t = CanvasTransform::fit(bounds, 1024, 768, 50, true).unwrap();

        // Width-limited: (1024 - 100) / 200
        assert_relative_eq!(t.scale(), 4.62);

        let (x, y) = t.map_point(0.0, 100.0);
        assert_relative_eq!(x, 50.0);
        assert_relative_eq!(y, 50.0);

        let (l, top, r, bottom) = t.map_rect(&Rect::new(0.0, 0.0, 200.0, 100.0));
        assert_relative_eq!(l, 50.0);
        assert_relative_eq!(top, 50.0);
        assert_relative_eq!(r, 974.0);
        assert_relative_eq!(bottom, 512.0);
    }

    #[test]
    fn test_canvas_transform_degenerate() {
        let line = Bounds::of_rects(&[Rect::new(0.0, 5.0, 100.0, 0.0)]).unwrap();
        assert!(CanvasTransform::fit(line, 1024, 768, 50, true).is_none());

        let ok = Bounds::of_rects(&[Rect::new(0.0, 0.0, 10.0, 10.0)]).unwrap();
        assert!(CanvasTransform::fit(ok, 80, 80, 50, true).is_none());
    }
}
