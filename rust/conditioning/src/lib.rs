// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor plan reasoning and structure-guidance conditioning
//!
//! This crate turns an interpreted floor plan (plus, optionally, the raw CAD
//! geometry it came from) into:
//! 1. A normalized structural model with a top-left origin
//! 2. Inferred structure the export lost, such as a missing outer wall
//! 3. A spatially consistent scene description for a camera viewpoint
//! 4. A deterministic seed and a conditioning raster (line art or depth map)
//!
//! # Usage
//!
//! ```rust,ignore
//! use floorplan_lite_conditioning::{build_conditioning, load_request, ConditioningConfig};
//!
//! let request = load_request("request.json")?;
//! let output = build_conditioning(&request, &ConditioningConfig::from_env())?;
//!
//! println!("{} (seed {})", output.scene_description, output.artifact.seed);
//! std::fs::write("conditioning.png", &output.artifact.image)?;
//! ```

pub mod config;
pub mod depth_map;
pub mod error;
pub mod inference;
pub mod lineart;
pub mod normalize;
pub mod raster;
pub mod seed;
pub mod topology;
pub mod types;
pub mod viewpoint;

// Re-export commonly used types and functions
pub use config::ConditioningConfig;
pub use depth_map::render_depth_map;
pub use error::{Error, Result};
pub use inference::{infer_outer_walls, InferenceResult};
pub use lineart::render_lineart;
pub use normalize::{flip_rect, normalize_elements, source_max_y};
pub use seed::scene_seed;
pub use topology::{extract_topology, RoomTopology};
pub use types::{
    ConditioningArtifact, ConditioningKind, ConditioningOutput, ConditioningRequest,
    DemolitionRisk, ElementOrigin, ElementType, FloorPlanModel, Point2D, RawDataset, RawItem,
    Rect, RoomCategory, StructuralElement,
};
pub use viewpoint::{
    classify_viewpoint, describe_floor_plan, describe_viewpoint, negative_hints, ViewpointCase,
};

use image::GrayImage;
use rayon::prelude::*;
use std::path::Path;

const NO_FLIP_WARNING: &str =
    "Raw dataset has no positive vertical extent; element coordinates were left unflipped.";
const NO_CONDITIONING_NOTE: &str =
    "No drawable geometry and no viewpoint given; generate without structure guidance.";
const DEGENERATE_CANVAS_NOTE: &str = "Configured canvas is too small for a depth map.";

/// Read a JSON conditioning request from disk
pub fn load_request(path: impl AsRef<Path>) -> Result<ConditioningRequest> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Bring an interpreted floor plan into the target coordinate convention
/// and repair structure the raw export lost.
///
/// Elements are flipped around the dataset's max-Y. Inferred elements and
/// their warnings are appended; existing elements are never removed.
pub fn normalize_floor_plan(
    model: FloorPlanModel,
    dataset: &RawDataset,
    config: &ConditioningConfig,
) -> FloorPlanModel {
    let max_y = source_max_y(dataset);

    let mut normalized = FloorPlanModel {
        elements: normalize_elements(&model.elements, max_y),
        ..model
    };
    if max_y.is_none() && !normalized.elements.is_empty() {
        normalized.warnings.push(NO_FLIP_WARNING.to_string());
    }

    let inferred = infer_outer_walls(dataset, max_y, config);
    if !inferred.is_empty() {
        tracing::info!(
            elements = inferred.elements.len(),
            warnings = inferred.warnings.len(),
            "Applied structure inference"
        );
    }
    for element in inferred.elements {
        normalized.append_inferred(element);
    }
    normalized.warnings.extend(inferred.warnings);

    normalized
}

/// Run the full conditioning pipeline for one request.
///
/// This runs:
/// 1. Normalization and inference (when raw geometry is attached)
/// 2. Room topology extraction
/// 3. Scene description for the viewpoint, or a whole-plan summary
/// 4. Seed derivation
/// 5. Line art when the raw geometry is drawable, else a depth map when a
///    viewpoint is given, else an empty artifact with an explanatory note
///
/// Only image encoding can fail; degenerate input yields an empty artifact.
pub fn build_conditioning(
    request: &ConditioningRequest,
    config: &ConditioningConfig,
) -> Result<ConditioningOutput> {
    let floor_plan = match &request.raw_dataset {
        Some(dataset) => normalize_floor_plan(request.floor_plan.clone(), dataset, config),
        None => request.floor_plan.clone(),
    };
    let viewpoint = request.viewpoint.as_deref().unwrap_or("");

    let topology = extract_topology(&floor_plan);
    let scene_description = if viewpoint.trim().is_empty() {
        describe_floor_plan(&floor_plan)
    } else {
        describe_viewpoint(&floor_plan, &topology, viewpoint)
    };
    let seed = scene_seed(&floor_plan, viewpoint);

    let lineart = request
        .raw_dataset
        .as_ref()
        .and_then(|dataset| render_lineart(dataset, config));

    let artifact = match lineart {
        Some(image) => encode_artifact(&image, ConditioningKind::Lineart, seed)?,
        None if !viewpoint.trim().is_empty() => {
            let case = classify_viewpoint(viewpoint);
            match render_depth_map(case, &topology, config) {
                Some(image) => encode_artifact(&image, ConditioningKind::Depth, seed)?,
                None => ConditioningArtifact::empty(seed, DEGENERATE_CANVAS_NOTE),
            }
        }
        None => ConditioningArtifact::empty(seed, NO_CONDITIONING_NOTE),
    };

    tracing::info!(
        kind = artifact.kind.as_str(),
        seed,
        elements = floor_plan.elements.len(),
        warnings = floor_plan.warnings.len(),
        "Built conditioning"
    );

    Ok(ConditioningOutput {
        negative_hints: negative_hints(&floor_plan),
        floor_plan,
        artifact,
        scene_description,
    })
}

/// Process independent requests in parallel.
///
/// Results are returned in request order.
pub fn build_conditioning_batch(
    requests: &[ConditioningRequest],
    config: &ConditioningConfig,
) -> Vec<Result<ConditioningOutput>> {
    tracing::debug!(count = requests.len(), "Building conditioning batch");
    requests
        .par_iter()
        .map(|request| build_conditioning(request, config))
        .collect()
}

fn encode_artifact(image: &GrayImage, kind: ConditioningKind, seed: u32) -> Result<ConditioningArtifact> {
    Ok(ConditioningArtifact {
        image: raster::encode_png(image)?,
        kind,
        seed,
        width: image.width(),
        height: image.height(),
        note: None,
    })
}
