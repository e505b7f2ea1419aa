// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Procedural perspective depth maps
//!
//! Used when no precise geometry is available. Each viewpoint case draws a
//! fixed one-point perspective room: bright is near, dark is far. Window
//! openings are the brightest region so the generator places light there.
//! Offsets are authored for a 768 px tall canvas and scale with the height.

use crate::config::ConditioningConfig;
use crate::raster::{blank_canvas, fill_polygon, fill_rect, gaussian_blur, vertical_gradient};
use crate::topology::RoomTopology;
use crate::viewpoint::ViewpointCase;
use image::GrayImage;

const BACKGROUND: u8 = 50;
const CEILING: u8 = 30;
const SIDE_WALL: u8 = 80;
const FAR_WALL: u8 = 40;
const KITCHEN_FAR_WALL: u8 = 60;
const WINDOW: u8 = 250;
const WINDOW_WALL: u8 = 255;
const ISLAND: u8 = 100;
const COUNTER: u8 = 180;
const ARMREST: u8 = 200;

/// Floor brightness at the horizon and at the bottom edge
const FLOOR_FAR: u8 = 50;
const FLOOR_NEAR: u8 = 200;
const GENERIC_FLOOR_NEAR: u8 = 180;
const GENERIC_CEILING: u8 = 40;

/// Main window width (percent of plan) above which it spans the far wall
const WIDE_WINDOW_WIDTH: f64 = 25.0;

/// Smallest canvas side a perspective scene is drawn on
const MIN_CANVAS_SIDE: u32 = 16;

const REFERENCE_HEIGHT: i32 = 768;

/// Canvas dimensions plus scaling of reference pixel offsets
struct Frame {
    w: i32,
    h: i32,
}

impl Frame {
    /// A vertical offset authored for the reference height
    fn dy(&self, px: i32) -> i32 {
        px * self.h / REFERENCE_HEIGHT
    }

    fn rect(&self, left: i32, top: i32, right: i32, bottom: i32) -> (f64, f64, f64, f64) {
        (left as f64, top as f64, right as f64, bottom as f64)
    }
}

/// Render the depth map of a viewpoint case.
///
/// Returns `None` when the configured canvas is too small to hold a scene.
pub fn render_depth_map(
    case: ViewpointCase,
    topology: &RoomTopology,
    config: &ConditioningConfig,
) -> Option<GrayImage> {
    let (width, height) = (config.canvas_width, config.canvas_height);
    if width < MIN_CANVAS_SIDE || height < MIN_CANVAS_SIDE {
        tracing::warn!(width, height, "Canvas too small for a depth map");
        return None;
    }

    let frame = Frame {
        w: width as i32,
        h: height as i32,
    };
    let mut canvas = blank_canvas(width, height, BACKGROUND);

    match case {
        ViewpointCase::KitchenToLiving => draw_kitchen_to_living(&mut canvas, &frame, topology),
        ViewpointCase::LivingToKitchen => draw_living_to_kitchen(&mut canvas, &frame),
        ViewpointCase::TowardWindow => draw_toward_window(&mut canvas, &frame),
        _ => draw_generic(&mut canvas, &frame),
    }

    tracing::debug!(?case, sigma = config.blur_sigma, "Rendered depth map");
    Some(gaussian_blur(&canvas, config.blur_sigma))
}

/// Floor gradient, ceiling band and the two converging side walls
fn draw_room_shell(canvas: &mut GrayImage, f: &Frame, inset: i32) {
    let (w, h) = (f.w, f.h);
    vertical_gradient(canvas, (h / 3) as u32, h as u32, FLOOR_FAR, FLOOR_NEAR);
    fill_rect(canvas, f.rect(0, 0, w, h / 4), CEILING);

    let wall_bottom = h - f.dy(50);
    fill_polygon(
        canvas,
        &[(0, h / 4), (inset, h / 3), (inset, wall_bottom), (0, h)],
        SIDE_WALL,
    );
    fill_polygon(
        canvas,
        &[(w, h / 4), (w - inset, h / 3), (w - inset, wall_bottom), (w, h)],
        SIDE_WALL,
    );
}

fn draw_far_wall(canvas: &mut GrayImage, f: &Frame, value: u8) {
    let inset = f.w / 6;
    fill_rect(
        canvas,
        f.rect(inset, f.h / 3, f.w - inset, f.h - f.dy(50)),
        value,
    );
}

fn draw_kitchen_to_living(canvas: &mut GrayImage, f: &Frame, topology: &RoomTopology) {
    let (w, h) = (f.w, f.h);
    draw_room_shell(canvas, f, w / 6);
    draw_far_wall(canvas, f, FAR_WALL);

    let window = topology.main_window();
    let opening = if window.position.width > WIDE_WINDOW_WIDTH || window.is_continuous {
        f.rect(w / 5, h / 3 + f.dy(20), w - w / 5, h - f.dy(100))
    } else {
        f.rect(w / 3, h / 3 + f.dy(30), w - w / 3, h - f.dy(120))
    };
    fill_rect(canvas, opening, WINDOW);

    // Counter in the near left corner
    fill_polygon(
        canvas,
        &[
            (0, h - f.dy(150)),
            (w / 4, h - f.dy(100)),
            (w / 4, h),
            (0, h),
        ],
        COUNTER,
    );
}

fn draw_living_to_kitchen(canvas: &mut GrayImage, f: &Frame) {
    let (w, h) = (f.w, f.h);
    draw_room_shell(canvas, f, w / 6);
    draw_far_wall(canvas, f, KITCHEN_FAR_WALL);

    fill_rect(
        canvas,
        f.rect(w / 3, h - f.dy(200), w * 2 / 3, h - f.dy(80)),
        ISLAND,
    );
    fill_rect(canvas, f.rect(0, h - f.dy(100), w / 5, h), ARMREST);
}

fn draw_toward_window(canvas: &mut GrayImage, f: &Frame) {
    let (w, h) = (f.w, f.h);
    draw_room_shell(canvas, f, w / 8);
    fill_rect(
        canvas,
        f.rect(w / 10, h / 4, w - w / 10, h - f.dy(80)),
        WINDOW_WALL,
    );
}

/// Plain living room perspective for every other viewpoint
fn draw_generic(canvas: &mut GrayImage, f: &Frame) {
    let (w, h) = (f.w, f.h);
    vertical_gradient(canvas, (h / 3) as u32, h as u32, FLOOR_FAR, GENERIC_FLOOR_NEAR);
    fill_rect(canvas, f.rect(0, 0, w, h / 3), GENERIC_CEILING);
}
