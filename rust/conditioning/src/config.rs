// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conditioning configuration, optionally loaded from environment variables.

use serde::{Deserialize, Serialize};

/// Rendering and inference parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditioningConfig {
    /// Output raster width in pixels.
    pub canvas_width: u32,
    /// Output raster height in pixels.
    pub canvas_height: u32,
    /// Blank border around the line drawing in pixels.
    pub lineart_margin: u32,
    /// Gaussian sigma of the depth-map smoothing pass.
    pub blur_sigma: f32,
    /// Thickness of a synthesized outer wall, in source units.
    pub inferred_wall_thickness: f64,
    /// Confidence assigned to synthesized elements.
    pub inferred_wall_confidence: f32,
}

impl Default for ConditioningConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1024,
            canvas_height: 768,
            lineart_margin: 50,
            blur_sigma: 5.0,
            inferred_wall_thickness: 20.0,
            inferred_wall_confidence: 0.7,
        }
    }
}

impl ConditioningConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables keep their default value.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            canvas_width: parse_or(&lookup, "CONDITIONING_WIDTH", defaults.canvas_width),
            canvas_height: parse_or(&lookup, "CONDITIONING_HEIGHT", defaults.canvas_height),
            lineart_margin: parse_or(&lookup, "LINEART_MARGIN", defaults.lineart_margin),
            blur_sigma: parse_or(&lookup, "DEPTH_BLUR_SIGMA", defaults.blur_sigma),
            inferred_wall_thickness: parse_or(
                &lookup,
                "INFERRED_WALL_THICKNESS",
                defaults.inferred_wall_thickness,
            ),
            inferred_wall_confidence: parse_or(
                &lookup,
                "INFERRED_WALL_CONFIDENCE",
                defaults.inferred_wall_confidence,
            ),
        }
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    lookup(key)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_overrides_and_fallbacks() {
        let config = ConditioningConfig::from_lookup(|key| match key {
            "CONDITIONING_WIDTH" => Some("512".into()),
            "DEPTH_BLUR_SIGMA" => Some("not-a-number".into()),
            _ => None,
        });

        assert_eq!(config.canvas_width, 512);
        assert_eq!(config.canvas_height, 768);
        assert!((config.blur_sigma - 5.0).abs() < f32::EPSILON);
    }
}
