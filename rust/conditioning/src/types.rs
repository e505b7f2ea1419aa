// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for floor plan normalization and conditioning

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// A 2D point (simplified for serialization)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_nalgebra(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    pub fn from_nalgebra(p: &Point2<f64>) -> Self {
        Self { x: p.x, y: p.y }
    }

    /// Vector pointing from `self` to `other`
    pub fn delta_to(&self, other: &Point2D) -> Vector2<f64> {
        other.to_nalgebra() - self.to_nalgebra()
    }
}

/// Axis-aligned placement `{x, y, width, height}`.
///
/// Units depend on the producer: raw CAD datasets use source units with Y
/// pointing up, interpreted floor plans use percentage-of-canvas with Y
/// pointing down. Missing fields deserialize to zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    pub fn origin(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

/// One primitive from a CAD-derived structural dataset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawItem {
    pub coordinates: Option<Rect>,
    /// Source CAD layer name, if known
    pub layer: Option<String>,
    pub name: Option<String>,
}

impl RawItem {
    pub fn new(coordinates: Rect) -> Self {
        Self {
            coordinates: Some(coordinates),
            layer: None,
            name: None,
        }
    }

    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(layer.into());
        self
    }
}

/// Structural primitives grouped by category, in source coordinates (Y up)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawDataset {
    pub walls: Vec<RawItem>,
    pub doors: Vec<RawItem>,
    pub windows: Vec<RawItem>,
}

impl RawDataset {
    /// All items that carry coordinates, walls first
    pub fn placed_items(&self) -> impl Iterator<Item = (RawCategory, &RawItem, Rect)> {
        let walls = self.walls.iter().map(|i| (RawCategory::Wall, i));
        let doors = self.doors.iter().map(|i| (RawCategory::Door, i));
        let windows = self.windows.iter().map(|i| (RawCategory::Window, i));
        walls
            .chain(doors)
            .chain(windows)
            .filter_map(|(category, item)| item.coordinates.map(|rect| (category, item, rect)))
    }

    pub fn is_empty(&self) -> bool {
        self.placed_items().next().is_none()
    }
}

/// Category key of a raw dataset item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawCategory {
    Wall,
    Door,
    Window,
}

/// Structural element classification.
///
/// Unknown type names deserialize to `NonLoadBearingWall` instead of
/// rejecting the whole floor plan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum ElementType {
    LoadBearingWall,
    NonLoadBearingWall,
    Pillar,
    Beam,
    Window,
    Door,
    Plumbing,
    Electrical,
    Hvac,
}

impl ElementType {
    /// Parse a snake_case type name, ignoring case and surrounding whitespace
    pub fn parse(name: &str) -> Option<Self> {
        let element_type = match name.trim().to_lowercase().as_str() {
            "load_bearing_wall" => Self::LoadBearingWall,
            "non_load_bearing_wall" => Self::NonLoadBearingWall,
            "pillar" => Self::Pillar,
            "beam" => Self::Beam,
            "window" => Self::Window,
            "door" => Self::Door,
            "plumbing" => Self::Plumbing,
            "electrical" => Self::Electrical,
            "hvac" => Self::Hvac,
            _ => return None,
        };
        Some(element_type)
    }
}

impl From<String> for ElementType {
    fn from(name: String) -> Self {
        Self::parse(&name).unwrap_or_else(|| {
            tracing::warn!(element_type = %name, "Unknown element type, treating as non-load-bearing wall");
            Self::NonLoadBearingWall
        })
    }
}

/// Demolition risk level
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum DemolitionRisk {
    #[default]
    None,
    Low,
    Medium,
    High,
}

/// Whether an element was observed upstream or synthesized here
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ElementOrigin {
    #[default]
    Detected,
    Inferred,
}

/// Element of an interpreted floor plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuralElement {
    pub element_type: ElementType,
    pub label: String,
    pub position: Rect,
    #[serde(default = "default_demolishable", alias = "is_demolishable")]
    pub demolishable: bool,
    #[serde(default, alias = "demolition_risk")]
    pub risk: DemolitionRisk,
    #[serde(default, alias = "demolition_note")]
    pub note: Option<String>,
    /// Detection confidence (0.0 - 1.0)
    #[serde(default = "default_confidence")]
    pub confidence: f32,
    #[serde(default)]
    pub origin: ElementOrigin,
}

fn default_demolishable() -> bool {
    true
}

fn default_confidence() -> f32 {
    0.5
}

impl StructuralElement {
    pub fn new(element_type: ElementType, label: impl Into<String>, position: Rect) -> Self {
        Self {
            element_type,
            label: label.into(),
            position,
            demolishable: default_demolishable(),
            risk: DemolitionRisk::None,
            note: None,
            confidence: default_confidence(),
            origin: ElementOrigin::Detected,
        }
    }
}

/// Interpreted floor plan: elements plus scalar metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorPlanModel {
    /// Estimated floor area in pyeong
    pub estimated_area: Option<f64>,
    pub room_count: u32,
    pub bathroom_count: u32,
    #[serde(alias = "analysis_summary")]
    pub summary: String,
    pub warnings: Vec<String>,
    pub elements: Vec<StructuralElement>,
}

impl FloorPlanModel {
    /// Add an inferred element. Existing elements are never touched.
    pub fn append_inferred(&mut self, mut element: StructuralElement) {
        element.origin = ElementOrigin::Inferred;
        self.elements.push(element);
    }

    pub fn count_of(&self, element_type: ElementType) -> usize {
        self.elements
            .iter()
            .filter(|e| e.element_type == element_type)
            .count()
    }
}

/// Semantic room category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RoomCategory {
    Kitchen,
    LivingRoom,
    Bedroom,
    Bathroom,
    Entrance,
}

impl RoomCategory {
    /// Every category in classification priority order
    pub const ALL: [RoomCategory; 5] = [
        Self::Kitchen,
        Self::LivingRoom,
        Self::Bedroom,
        Self::Bathroom,
        Self::Entrance,
    ];
}

/// Kind of structure-guidance raster
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConditioningKind {
    Lineart,
    Depth,
    None,
}

impl ConditioningKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lineart => "lineart",
            Self::Depth => "depth",
            Self::None => "none",
        }
    }
}

/// Conditioning raster handed to the image generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditioningArtifact {
    /// PNG bytes; empty when `kind` is `None`
    pub image: Vec<u8>,
    pub kind: ConditioningKind,
    pub seed: u32,
    pub width: u32,
    pub height: u32,
    /// Why no conditioning is available, if that is the case
    pub note: Option<String>,
}

impl ConditioningArtifact {
    pub fn empty(seed: u32, note: impl Into<String>) -> Self {
        Self {
            image: Vec::new(),
            kind: ConditioningKind::None,
            seed,
            width: 0,
            height: 0,
            note: Some(note.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.image.is_empty()
    }
}

/// One conditioning request: a floor plan, optional raw geometry and a viewpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditioningRequest {
    pub floor_plan: FloorPlanModel,
    pub raw_dataset: Option<RawDataset>,
    pub viewpoint: Option<String>,
}

/// Everything produced for one request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditioningOutput {
    /// Normalized floor plan with inferred elements and warnings appended
    pub floor_plan: FloorPlanModel,
    pub artifact: ConditioningArtifact,
    pub scene_description: String,
    /// Terms the prompt assembler should add to the negative prompt
    pub negative_hints: Vec<String>,
}
