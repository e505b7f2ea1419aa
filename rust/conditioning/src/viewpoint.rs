// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Viewpoint classification and scene description
//!
//! A free-text viewpoint ("주방에서 거실 보는 시점", "view from kitchen
//! towards living room") is classified into a fixed set of camera setups.
//! Each setup expands into ordered scene assertions tagged with a depth
//! layer, including negative assertions for things that must stay out of
//! frame. Unrecognized viewpoints fall back to a whole-apartment summary.

use crate::topology::{is_continuous_label, Facing, RoomTopology};
use crate::types::{ElementType, FloorPlanModel, Point2D, RoomCategory};

/// Camera setups the reasoner knows how to describe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewpointCase {
    KitchenToLiving,
    LivingToKitchen,
    TowardWindow,
    AtEntrance,
    AtBedroom,
    AtBathroom,
    Unrecognized,
}

/// How a viewpoint rule recognizes its case
#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    /// Any of the keywords is present
    Any(&'static [&'static str]),
    /// Both anchors are present and the first one is the camera position
    FromTo(&'static str, &'static str),
}

impl Matcher {
    fn matches(&self, text: &str) -> bool {
        match self {
            Matcher::Any(keywords) => keywords.iter().any(|k| text.contains(k)),
            Matcher::FromTo(from, to) => source_anchor(text, from, to) == Some(*from),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ViewpointRule {
    pub case: ViewpointCase,
    pub matchers: &'static [Matcher],
}

/// Viewpoint rules in priority order; the first matching rule wins.
pub const VIEWPOINT_RULES: &[ViewpointRule] = &[
    ViewpointRule {
        case: ViewpointCase::KitchenToLiving,
        matchers: &[
            Matcher::FromTo("kitchen", "living"),
            Matcher::Any(&["주방에서"]),
        ],
    },
    ViewpointRule {
        case: ViewpointCase::LivingToKitchen,
        matchers: &[
            Matcher::FromTo("living", "kitchen"),
            Matcher::Any(&["거실에서"]),
        ],
    },
    ViewpointRule {
        case: ViewpointCase::TowardWindow,
        matchers: &[Matcher::Any(&["window", "창가"])],
    },
    ViewpointRule {
        case: ViewpointCase::AtEntrance,
        matchers: &[Matcher::Any(&["entrance", "현관"])],
    },
    ViewpointRule {
        case: ViewpointCase::AtBedroom,
        matchers: &[Matcher::Any(&["bedroom", "침실"])],
    },
    ViewpointRule {
        case: ViewpointCase::AtBathroom,
        matchers: &[Matcher::Any(&["bathroom", "욕실"])],
    },
];

/// Which of two anchors is the camera position.
///
/// The anchor following the first "from" wins; without "from", the anchor
/// mentioned first wins. `None` unless both anchors are present.
fn source_anchor<'a>(text: &str, a: &'a str, b: &'a str) -> Option<&'a str> {
    let (pos_a, pos_b) = (text.find(a)?, text.find(b)?);
    if let Some(from) = text.find("from") {
        let tail = &text[from..];
        match (tail.find(a), tail.find(b)) {
            (Some(ta), Some(tb)) => return Some(if ta <= tb { a } else { b }),
            (Some(_), None) => return Some(a),
            (None, Some(_)) => return Some(b),
            (None, None) => {}
        }
    }
    Some(if pos_a <= pos_b { a } else { b })
}

/// Classify a viewpoint text
pub fn classify_viewpoint(viewpoint: &str) -> ViewpointCase {
    let lower = viewpoint.to_lowercase();
    VIEWPOINT_RULES
        .iter()
        .find(|rule| rule.matchers.iter().any(|m| m.matches(&lower)))
        .map(|rule| rule.case)
        .unwrap_or(ViewpointCase::Unrecognized)
}

/// Camera-relative direction between two plan positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Forward,
    Backward,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Forward => "forward",
            Self::Backward => "backward",
        }
    }

    fn phrase(&self) -> &'static str {
        match self {
            Self::Left => "to the left",
            Self::Right => "to the right",
            Self::Forward => "straight ahead",
            Self::Backward => "behind",
        }
    }
}

/// Direction of `to` as seen from `from`, by the dominant axis of the delta.
///
/// Plan Y grows downward, so a negative Y delta is forward.
pub fn relative_direction(from: &Point2D, to: &Point2D) -> Direction {
    let delta = from.delta_to(to);
    if delta.x.abs() > delta.y.abs() {
        if delta.x < 0.0 {
            Direction::Left
        } else {
            Direction::Right
        }
    } else if delta.y < 0.0 {
        Direction::Forward
    } else {
        Direction::Backward
    }
}

/// Depth layer a scene assertion refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthLayer {
    Foreground,
    Midground,
    Background,
}

/// One statement about what the generated image must (not) show
#[derive(Debug, Clone, PartialEq)]
pub struct SceneAssertion {
    pub layer: Option<DepthLayer>,
    pub text: String,
    /// Something that must stay out of frame
    pub negative: bool,
}

impl SceneAssertion {
    fn context(text: impl Into<String>) -> Self {
        Self {
            layer: None,
            text: text.into(),
            negative: false,
        }
    }

    fn at(layer: DepthLayer, text: impl Into<String>) -> Self {
        Self {
            layer: Some(layer),
            text: text.into(),
            negative: false,
        }
    }

    fn absent(text: impl Into<String>) -> Self {
        Self {
            layer: None,
            text: text.into(),
            negative: true,
        }
    }
}

/// Structured scene for one viewpoint
#[derive(Debug, Clone)]
pub struct ScenePlan {
    pub case: ViewpointCase,
    /// Direction of the target room relative to the camera room, for two-room cases
    pub direction: Option<Direction>,
    pub assertions: Vec<SceneAssertion>,
}

impl ScenePlan {
    /// Assemble the assertions into one paragraph
    pub fn to_paragraph(&self) -> String {
        self.assertions
            .iter()
            .map(|a| a.text.as_str())
            .collect::<Vec<_>>()
            .join(". ")
    }
}

/// Floor area in square meters from the pyeong estimate.
///
/// A zero or negative estimate counts as unknown.
fn area_sqm(model: &FloorPlanModel) -> Option<i64> {
    model
        .estimated_area
        .filter(|pyeong| *pyeong > 0.0)
        .map(|pyeong| (pyeong * 3.3) as i64)
}

/// Build the scene plan for a viewpoint.
///
/// Returns `None` for unrecognized viewpoints.
pub fn plan_scene(
    model: &FloorPlanModel,
    topology: &RoomTopology,
    viewpoint: &str,
) -> Option<ScenePlan> {
    let case = classify_viewpoint(viewpoint);
    let sqm = area_sqm(model).unwrap_or(100);
    let main_window = topology.main_window();
    let single_window_wall = main_window.is_continuous || topology.windows.len() == 1;
    let kitchen = topology.room(RoomCategory::Kitchen).centroid;
    let living = topology.room(RoomCategory::LivingRoom).centroid;

    let mut direction = None;
    let mut scene = Vec::new();

    match case {
        ViewpointCase::KitchenToLiving => {
            let dir = relative_direction(&kitchen, &living);
            direction = Some(dir);
            scene.push(SceneAssertion::context(format!(
                "Interior photography of a {}sqm modern Korean apartment living room",
                sqm
            )));
            scene.push(SceneAssertion::context(
                "POV shot from behind kitchen counter looking at the living room",
            ));
            scene.push(SceneAssertion::context(format!(
                "Living room lies {} of the kitchen on the floor plan",
                dir.phrase()
            )));
            scene.push(SceneAssertion::at(
                DepthLayer::Foreground,
                "Kitchen counter and cabinets visible in the FOREGROUND at bottom of frame",
            ));
            scene.push(SceneAssertion::at(
                DepthLayer::Midground,
                "Living room sofa and furniture in the MIDDLE of frame",
            ));
            if single_window_wall {
                scene.push(SceneAssertion::at(
                    DepthLayer::Background,
                    "Large floor-to-ceiling window wall in the BACKGROUND spanning the far wall, one continuous window without pillars",
                ));
            } else {
                scene.push(SceneAssertion::at(
                    DepthLayer::Background,
                    "Windows visible in the BACKGROUND along the far window wall",
                ));
            }
            scene.push(SceneAssertion::absent(
                "NO kitchen appliances or sink visible, those are behind the camera",
            ));
        }
        ViewpointCase::LivingToKitchen => {
            let dir = relative_direction(&living, &kitchen);
            direction = Some(dir);
            scene.push(SceneAssertion::context(format!(
                "Interior photography of a {}sqm modern Korean apartment kitchen",
                sqm
            )));
            scene.push(SceneAssertion::context(
                "POV shot from living room sofa looking at the open kitchen",
            ));
            scene.push(SceneAssertion::context(format!(
                "Kitchen lies {} of the living room on the floor plan",
                dir.phrase()
            )));
            scene.push(SceneAssertion::at(
                DepthLayer::Foreground,
                "Sofa armrest or coffee table edge visible in the FOREGROUND at bottom of frame",
            ));
            scene.push(SceneAssertion::at(
                DepthLayer::Midground,
                "Open kitchen with island counter, cabinets, and appliances in the CENTER and BACKGROUND of frame",
            ));
            scene.push(SceneAssertion::at(
                DepthLayer::Background,
                "Kitchen sink, refrigerator, and cooking area clearly visible",
            ));
            scene.push(SceneAssertion::context(
                "Natural light coming from BEHIND the camera (from living room windows)",
            ));
            scene.push(SceneAssertion::absent(
                "NO windows directly visible in this view, windows are behind the viewer",
            ));
        }
        ViewpointCase::TowardWindow => {
            scene.push(SceneAssertion::context(format!(
                "Interior photography of a {}sqm modern Korean apartment",
                sqm
            )));
            scene.push(SceneAssertion::context("Camera facing towards the windows"));
            if single_window_wall {
                scene.push(SceneAssertion::at(
                    DepthLayer::Background,
                    "ONE large continuous floor-to-ceiling window wall DIRECTLY IN FRONT, no columns or pillars dividing the window",
                ));
            } else {
                scene.push(SceneAssertion::at(
                    DepthLayer::Background,
                    format!(
                        "{} windows on the far wall DIRECTLY IN FRONT",
                        topology.windows.len()
                    ),
                ));
            }
            scene.push(SceneAssertion::context("Bright natural light streaming in"));
        }
        ViewpointCase::AtEntrance => {
            scene.push(SceneAssertion::context(format!(
                "Interior photography of a {}sqm modern Korean apartment",
                sqm
            )));
            scene.push(SceneAssertion::context(
                "Camera at the entrance, looking into the apartment",
            ));
            let entrance = topology.room(RoomCategory::Entrance).centroid;
            let dir = relative_direction(&entrance, &living);
            direction = Some(dir);
            scene.push(SceneAssertion::at(
                DepthLayer::Midground,
                format!("Living room visible {} in the MIDDLE of frame", dir.phrase()),
            ));
            scene.push(SceneAssertion::at(
                DepthLayer::Background,
                "Windows visible in the BACKGROUND at the far end of the apartment",
            ));
        }
        ViewpointCase::AtBedroom => {
            scene.push(SceneAssertion::context(format!(
                "Interior photography of a {}sqm modern Korean apartment bedroom",
                sqm
            )));
            scene.push(SceneAssertion::context(
                "Camera at the bedroom entrance, looking into the room",
            ));
            scene.push(SceneAssertion::at(
                DepthLayer::Midground,
                "Bed visible in the center or against one wall",
            ));
            scene.push(SceneAssertion::absent(
                "NO living room or kitchen furniture visible",
            ));
        }
        ViewpointCase::AtBathroom => {
            scene.push(SceneAssertion::context(format!(
                "Interior photography of a {}sqm modern Korean apartment bathroom",
                sqm
            )));
            scene.push(SceneAssertion::context(
                "Camera at the bathroom entrance, looking inside",
            ));
            scene.push(SceneAssertion::at(
                DepthLayer::Background,
                "Vanity, shower and tiled walls in the BACKGROUND",
            ));
        }
        ViewpointCase::Unrecognized => return None,
    }

    scene.push(SceneAssertion::context(format!(
        "Apartment has {} bedrooms, {} bathrooms",
        model.room_count, model.bathroom_count
    )));

    Some(ScenePlan {
        case,
        direction,
        assertions: scene,
    })
}

/// Scene paragraph for a viewpoint; never empty.
///
/// Unrecognized viewpoints fall back to [`describe_floor_plan`].
pub fn describe_viewpoint(model: &FloorPlanModel, topology: &RoomTopology, viewpoint: &str) -> String {
    match plan_scene(model, topology, viewpoint) {
        Some(plan) => {
            let paragraph = plan.to_paragraph();
            tracing::debug!(
                case = ?plan.case,
                direction = plan.direction.map(|d| d.as_str()),
                len = paragraph.len(),
                "Assembled spatial scene description"
            );
            paragraph
        }
        None => {
            tracing::debug!(viewpoint, "Unrecognized viewpoint, using floor plan summary");
            describe_floor_plan(model)
        }
    }
}

/// Whole-apartment description from aggregate metadata; never empty.
pub fn describe_floor_plan(model: &FloorPlanModel) -> String {
    let mut parts = Vec::new();

    if let Some(sqm) = area_sqm(model) {
        parts.push(format!("a {} square meter apartment", sqm));
    }

    let mut rooms = Vec::new();
    if model.room_count > 0 {
        rooms.push(format!("{} bedrooms", model.room_count));
    }
    if model.bathroom_count > 0 {
        rooms.push(format!("{} bathrooms", model.bathroom_count));
    }
    if !rooms.is_empty() {
        parts.push(format!("with {}", rooms.join(", ")));
    }

    let mut features = Vec::new();
    if has_open_kitchen(model) {
        features.push("open-plan kitchen connected to living area".to_string());
    }
    if model.elements.iter().any(|e| mentions_living_room(&e.label)) {
        features.push("spacious living room".to_string());
    }
    if let Some(windows) = describe_windows(model) {
        features.push(windows);
    }
    if !features.is_empty() {
        parts.push(format!("featuring {}", features.join(", ")));
    }

    let summary = model.summary.to_lowercase();
    if summary.contains('넓') || summary.contains("open") {
        parts.push("with open floor plan".to_string());
    }
    if summary.contains('ㄱ') || summary.contains("l자") || summary.contains("l-shaped") {
        parts.push("L-shaped layout".to_string());
    }

    if parts.is_empty() {
        "modern apartment interior".to_string()
    } else {
        parts.join(" ")
    }
}

/// Any mention of the living room, even in a label that also names another room
fn mentions_living_room(label: &str) -> bool {
    let label = label.to_lowercase();
    label.contains("거실") || label.contains("living")
}

fn has_open_kitchen(model: &FloorPlanModel) -> bool {
    model.elements.iter().any(|e| {
        let label = e.label.to_lowercase();
        (label.contains("주방") || label.contains("kitchen"))
            && (label.contains("오픈")
                || label.contains("open")
                || e.element_type == ElementType::NonLoadBearingWall)
    })
}

fn facing_prefix(facing: Option<Facing>) -> String {
    facing
        .map(|f| format!("{}-facing ", f.as_str()))
        .unwrap_or_default()
}

fn describe_windows(model: &FloorPlanModel) -> Option<String> {
    let windows: Vec<_> = model
        .elements
        .iter()
        .filter(|e| e.element_type == ElementType::Window)
        .collect();

    match windows.as_slice() {
        [] => None,
        [only] => {
            let dir = facing_prefix(Facing::from_position(&only.position));
            if only.position.width > 30.0 || is_continuous_label(&only.label) {
                Some(format!(
                    "one large continuous floor-to-ceiling {}window wall spanning the living room without any pillars or dividers",
                    dir
                ))
            } else {
                Some(format!("single {}window with natural light", dir))
            }
        }
        [first, second] => {
            let (a, b) = (&first.position, &second.position);
            let same_wall = (a.y - b.y).abs() < 10.0 || (a.x - b.x).abs() < 10.0;
            if same_wall {
                let dir = facing_prefix(Facing::from_position(a));
                Some(format!("two {}windows on the same wall", dir))
            } else {
                Some("windows on multiple walls providing cross-ventilation".to_string())
            }
        }
        many => {
            let mut facings: Vec<&str> = Vec::new();
            for facing in many.iter().filter_map(|w| Facing::from_position(&w.position)) {
                if !facings.contains(&facing.as_str()) {
                    facings.push(facing.as_str());
                }
            }
            if facings.is_empty() {
                Some("multiple windows with natural light".to_string())
            } else {
                Some(format!(
                    "multiple windows facing {} with abundant natural light",
                    facings.join(", ")
                ))
            }
        }
    }
}

/// Negative prompt terms implied by the window layout
pub fn negative_hints(model: &FloorPlanModel) -> Vec<String> {
    let window_count = model.count_of(ElementType::Window);
    let mut hints = Vec::new();

    if window_count == 1 {
        hints.extend(
            [
                "pillars in window",
                "columns breaking window",
                "divided window",
                "mullions",
                "vertical bars in window",
                "structural divider in window",
            ]
            .map(String::from),
        );
    }
    if window_count <= 2 {
        hints.extend(
            ["extra windows", "additional windows", "multiple windows"].map(String::from),
        );
    }
    hints
}
