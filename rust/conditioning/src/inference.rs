// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Missing-structure inference
//!
//! CAD exports regularly lose the exterior wall layer, leaving windows
//! floating with nothing to sit in. The outermost window row is used as
//! evidence to synthesize that wall.

use crate::config::ConditioningConfig;
use crate::types::{
    DemolitionRisk, ElementOrigin, ElementType, RawDataset, Rect, StructuralElement,
};

/// Label given to a synthesized outer wall
pub const INFERRED_WALL_LABEL: &str = "외벽-추론 (창문 기반)";

const INFERRED_WALL_NOTE: &str =
    "Exterior wall is structural and cannot be demolished. Inferred from window positions.";

/// Elements synthesized from indirect evidence, plus the warnings explaining them
#[derive(Debug, Clone, Default)]
pub struct InferenceResult {
    pub elements: Vec<StructuralElement>,
    pub warnings: Vec<String>,
}

impl InferenceResult {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.warnings.is_empty()
    }
}

/// Detect windows with no wall at or above their row and synthesize the
/// missing outer wall.
///
/// Wall and window rows are compared in source coordinates. A wall counts as
/// enclosing when its Y is at or before the smallest window Y. The returned
/// wall is expressed in target coordinates when `max_y` is known.
///
/// Only the single outermost window row is repaired.
pub fn infer_outer_walls(
    dataset: &RawDataset,
    max_y: Option<f64>,
    config: &ConditioningConfig,
) -> InferenceResult {
    let windows: Vec<Rect> = dataset
        .windows
        .iter()
        .filter_map(|w| w.coordinates)
        .collect();

    let Some(min_window_y) = windows.iter().map(|w| w.y).reduce(f64::min) else {
        return InferenceResult::default();
    };

    let enclosed = dataset
        .walls
        .iter()
        .filter_map(|w| w.coordinates)
        .any(|wall| wall.y <= min_window_y);

    if enclosed {
        tracing::debug!(min_window_y, "Outer window row is enclosed by a wall");
        return InferenceResult::default();
    }

    let outer_row: Vec<&Rect> = windows.iter().filter(|w| w.y == min_window_y).collect();
    let min_x = outer_row.iter().map(|w| w.x).fold(f64::INFINITY, f64::min);
    let max_x = outer_row
        .iter()
        .map(|w| w.right())
        .fold(f64::NEG_INFINITY, f64::max);

    let thickness = config.inferred_wall_thickness;
    let wall_y = match max_y {
        Some(max_y) => max_y - min_window_y - thickness,
        None => min_window_y,
    };

    let wall = StructuralElement {
        element_type: ElementType::LoadBearingWall,
        label: INFERRED_WALL_LABEL.to_string(),
        position: Rect::new(min_x, wall_y, max_x - min_x, thickness),
        demolishable: false,
        risk: DemolitionRisk::High,
        note: Some(INFERRED_WALL_NOTE.to_string()),
        confidence: config.inferred_wall_confidence,
        origin: ElementOrigin::Inferred,
    };

    tracing::info!(
        min_x,
        max_x,
        y = wall_y,
        windows = outer_row.len(),
        "Inferred missing outer wall from window row"
    );

    let names: Vec<&str> = dataset
        .windows
        .iter()
        .filter(|w| w.coordinates.is_some_and(|c| c.y == min_window_y))
        .filter_map(|w| w.name.as_deref())
        .collect();
    let named = if names.is_empty() {
        String::new()
    } else {
        format!(" ({})", names.join(", "))
    };

    let mut warnings = vec![format!(
        "Missing outer wall detected: windows{} at Y={} have no enclosing wall. \
         Inferred a load-bearing outer wall spanning X={}..{}.",
        named, min_window_y, min_x, max_x
    )];

    let other_rows = windows
        .iter()
        .filter(|w| w.y != min_window_y)
        .map(|w| w.y.to_bits())
        .collect::<rustc_hash::FxHashSet<_>>()
        .len();
    if other_rows > 0 {
        warnings.push(format!(
            "Only the outermost window row was repaired; {} other window row(s) were not checked for missing walls.",
            other_rows
        ));
    }

    InferenceResult {
        elements: vec![wall],
        warnings,
    }
}
