// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raster drawing primitives shared by the conditioning renderers

use crate::error::Result;
use image::{GrayImage, ImageFormat, Luma};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_polygon_mut};
use imageproc::point::Point;
use imageproc::rect::Rect as PixelRect;
use std::io::Cursor;

/// Create a canvas filled with one gray level
pub fn blank_canvas(width: u32, height: u32, value: u8) -> GrayImage {
    GrayImage::from_pixel(width, height, Luma([value]))
}

/// Apply Gaussian blur to soften hard edges
///
/// A non-positive sigma leaves the image unchanged.
pub fn gaussian_blur(image: &GrayImage, sigma: f32) -> GrayImage {
    if sigma <= 0.0 {
        return image.clone();
    }
    imageproc::filter::gaussian_blur_f32(image, sigma)
}

/// Integer pixel rectangle from `(left, top, right, bottom)` canvas coordinates.
///
/// Returns `None` when the rectangle collapses to nothing.
fn pixel_rect(left: f64, top: f64, right: f64, bottom: f64) -> Option<PixelRect> {
    let (x0, y0) = (left.round() as i32, top.round() as i32);
    let (x1, y1) = (right.round() as i32, bottom.round() as i32);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(PixelRect::at(x0, y0).of_size((x1 - x0) as u32, (y1 - y0) as u32))
}

/// Fill an axis-aligned rectangle
pub fn fill_rect(image: &mut GrayImage, bounds: (f64, f64, f64, f64), value: u8) {
    let (left, top, right, bottom) = bounds;
    if let Some(rect) = pixel_rect(left, top, right, bottom) {
        draw_filled_rect_mut(image, rect, Luma([value]));
    }
}

/// Outline a rectangle with a border `thickness` pixels wide, growing inward.
///
/// Rectangles thinner than the border degrade to a filled rectangle.
pub fn outline_rect(image: &mut GrayImage, bounds: (f64, f64, f64, f64), thickness: u32, value: u8) {
    let (left, top, right, bottom) = bounds;
    for inset in 0..thickness.max(1) {
        let d = inset as f64;
        match pixel_rect(left + d, top + d, right - d, bottom - d) {
            Some(rect) => draw_hollow_rect_mut(image, rect, Luma([value])),
            None => break,
        }
    }
}

/// Fill a convex polygon given in pixel coordinates
pub fn fill_polygon(image: &mut GrayImage, vertices: &[(i32, i32)], value: u8) {
    if vertices.len() < 3 {
        return;
    }
    let mut points: Vec<Point<i32>> = vertices.iter().map(|&(x, y)| Point::new(x, y)).collect();
    // The first and last vertex must differ
    if points.first() == points.last() {
        points.pop();
    }
    draw_polygon_mut(image, &points, Luma([value]));
}

/// Paint full-width rows `y_start..y_end` with a linear ramp from `from` to `to`
pub fn vertical_gradient(image: &mut GrayImage, y_start: u32, y_end: u32, from: u8, to: u8) {
    let y_end = y_end.min(image.height());
    if y_end <= y_start {
        return;
    }
    let span = (y_end - y_start) as f64;
    for y in y_start..y_end {
        let t = (y - y_start) as f64 / span;
        let value = (from as f64 + (to as f64 - from as f64) * t).round() as u8;
        for x in 0..image.width() {
            image.put_pixel(x, y, Luma([value]));
        }
    }
}

/// Encode a grayscale raster as PNG bytes
pub fn encode_png(image: &GrayImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_rect_thickness() {
        let mut img = blank_canvas(20, 20, 255);
        outline_rect(&mut img, (2.0, 2.0, 18.0, 18.0), 2, 0);

        assert_eq!(img.get_pixel(2, 10).0[0], 0);
        assert_eq!(img.get_pixel(3, 10).0[0], 0);
        assert_eq!(img.get_pixel(4, 10).0[0], 255);
        assert_eq!(img.get_pixel(10, 10).0[0], 255);
    }

    #[test]
    fn test_degenerate_rect_is_skipped() {
        let mut img = blank_canvas(10, 10, 255);
        fill_rect(&mut img, (5.0, 5.0, 5.0, 9.0), 0);
        outline_rect(&mut img, (2.0, 2.0, 2.2, 8.0), 3, 0);

        assert!(img.pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn test_vertical_gradient_ramps() {
        let mut img = blank_canvas(4, 10, 0);
        vertical_gradient(&mut img, 0, 10, 50, 200);

        assert_eq!(img.get_pixel(0, 0).0[0], 50);
        assert!(img.get_pixel(0, 9).0[0] > img.get_pixel(0, 5).0[0]);
        assert_eq!(img.get_pixel(3, 9).0[0], img.get_pixel(0, 9).0[0]);
    }

    #[test]
    fn test_fill_polygon_closed_input() {
        let mut img = blank_canvas(10, 10, 0);
        fill_polygon(&mut img, &[(0, 0), (9, 0), (9, 9), (0, 9), (0, 0)], 80);
        assert_eq!(img.get_pixel(5, 5).0[0], 80);
    }

    #[test]
    fn test_encode_png_signature() {
        let bytes = encode_png(&blank_canvas(8, 8, 128)).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_zero_sigma_blur_is_identity() {
        let mut img = blank_canvas(6, 6, 0);
        img.put_pixel(3, 3, Luma([255]));
        assert_eq!(gaussian_blur(&img, 0.0), img);
    }
}
