// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Deterministic generation seed
//!
//! The seed must be identical across processes and platforms, so it is
//! derived from SHA-256 rather than `std`'s randomly keyed hasher.

use crate::types::FloorPlanModel;
use sha2::{Digest, Sha256};
use std::fmt::Write;

/// Canonical text the seed is derived from.
///
/// Element order, labels and positions (rounded to three decimals) are all
/// significant, followed by the viewpoint text and the estimated area.
pub fn seed_input(model: &FloorPlanModel, viewpoint: &str) -> String {
    let mut input = String::new();
    for element in &model.elements {
        let p = &element.position;
        // Writing to a String cannot fail
        let _ = write!(
            input,
            "{}:{:.3}:{:.3}:{:.3}:{:.3}:",
            element.label, p.x, p.y, p.width, p.height
        );
    }
    input.push_str(viewpoint);
    match model.estimated_area {
        Some(area) => {
            let _ = write!(input, "{:.3}", area);
        }
        None => input.push_str("none"),
    }
    input
}

/// Stable 32-bit seed for a (floor plan, viewpoint) pair
pub fn scene_seed(model: &FloorPlanModel, viewpoint: &str) -> u32 {
    let digest = Sha256::digest(seed_input(model, viewpoint).as_bytes());
    let seed = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    tracing::debug!(seed, elements = model.elements.len(), "Calculated scene seed");
    seed
}
