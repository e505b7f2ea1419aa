// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room topology extraction from element labels
//!
//! Labels are matched against a priority-ordered keyword table (Korean and
//! English). Categories without any matching element fall back to the
//! canonical layout table so every category always has a centroid.

use crate::types::{ElementType, FloorPlanModel, Point2D, Rect, RoomCategory, StructuralElement};
use nalgebra::{Point2, Vector2};

/// Keywords assigning a label to a room category
#[derive(Debug, Clone, Copy)]
pub struct RoomRule {
    pub category: RoomCategory,
    pub keywords: &'static [&'static str],
}

/// Room rules in priority order; the first matching rule wins.
pub const ROOM_RULES: &[RoomRule] = &[
    RoomRule {
        category: RoomCategory::Kitchen,
        keywords: &["주방", "kitchen"],
    },
    RoomRule {
        category: RoomCategory::LivingRoom,
        keywords: &["거실", "living"],
    },
    RoomRule {
        category: RoomCategory::Bedroom,
        keywords: &["침실", "bedroom", "방"],
    },
    RoomRule {
        category: RoomCategory::Bathroom,
        keywords: &["욕실", "bathroom", "화장실"],
    },
    RoomRule {
        category: RoomCategory::Entrance,
        keywords: &["현관", "entrance"],
    },
];

/// Label markers of a single, uninterrupted window opening
pub const CONTINUOUS_WINDOW_MARKERS: &[&str] =
    &["단일", "연속", "전면", "single", "continuous", "full-width"];

/// Assumed positions, in percent of the canvas, used when a floor plan says
/// nothing about a room.
///
/// Typical Korean apartment: entrance on the right, kitchen in the middle,
/// living room on the left by the window wall, bedrooms and bathroom along
/// the top.
pub const CANONICAL_LAYOUT: [(RoomCategory, Point2D); 5] = [
    (RoomCategory::Kitchen, Point2D { x: 60.0, y: 50.0 }),
    (RoomCategory::LivingRoom, Point2D { x: 30.0, y: 50.0 }),
    (RoomCategory::Bedroom, Point2D { x: 50.0, y: 20.0 }),
    (RoomCategory::Bathroom, Point2D { x: 75.0, y: 25.0 }),
    (RoomCategory::Entrance, Point2D { x: 85.0, y: 50.0 }),
];

/// Window assumed on the living room side when none was detected
pub const DEFAULT_WINDOW: Rect = Rect {
    x: 10.0,
    y: 50.0,
    width: 30.0,
    height: 5.0,
};

/// Default centroid of a category from [`CANONICAL_LAYOUT`]
pub fn default_centroid(category: RoomCategory) -> Point2D {
    CANONICAL_LAYOUT[category_index(category)].1
}

fn category_index(category: RoomCategory) -> usize {
    match category {
        RoomCategory::Kitchen => 0,
        RoomCategory::LivingRoom => 1,
        RoomCategory::Bedroom => 2,
        RoomCategory::Bathroom => 3,
        RoomCategory::Entrance => 4,
    }
}

/// Classify a label into a room category by case-insensitive substring match
pub fn classify_label(label: &str) -> Option<RoomCategory> {
    let lower = label.to_lowercase();
    ROOM_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| lower.contains(k)))
        .map(|rule| rule.category)
}

/// Whether a window label marks one continuous opening
pub fn is_continuous_label(label: &str) -> bool {
    let lower = label.to_lowercase();
    CONTINUOUS_WINDOW_MARKERS.iter().any(|m| lower.contains(m))
}

/// Compass facing of a window, inferred from its canvas position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    North,
    South,
    East,
    West,
}

impl Facing {
    /// Facing from a percentage-of-canvas position
    pub fn from_position(position: &Rect) -> Option<Self> {
        if position.y < 30.0 {
            Some(Self::North)
        } else if position.y > 70.0 {
            Some(Self::South)
        } else if position.x < 30.0 {
            Some(Self::West)
        } else if position.x > 70.0 {
            Some(Self::East)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
        }
    }
}

/// One room category with its members and representative point
#[derive(Debug, Clone)]
pub struct Room {
    pub category: RoomCategory,
    pub centroid: Point2D,
    pub members: Vec<StructuralElement>,
}

impl Room {
    /// True when the centroid comes from the canonical layout
    pub fn is_default(&self) -> bool {
        self.members.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct WindowInfo {
    pub label: String,
    pub position: Rect,
    pub is_continuous: bool,
    pub facing: Option<Facing>,
}

#[derive(Debug, Clone)]
pub struct DoorInfo {
    pub label: String,
    pub position: Rect,
}

/// Rooms, windows and doors of a floor plan
#[derive(Debug, Clone)]
pub struct RoomTopology {
    rooms: [Room; 5],
    pub windows: Vec<WindowInfo>,
    pub doors: Vec<DoorInfo>,
    /// True when `windows` only holds [`DEFAULT_WINDOW`]
    pub window_defaulted: bool,
}

impl RoomTopology {
    pub fn room(&self, category: RoomCategory) -> &Room {
        &self.rooms[category_index(category)]
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter()
    }

    /// First window; there is always at least one
    pub fn main_window(&self) -> &WindowInfo {
        &self.windows[0]
    }
}

/// Build the room topology of a floor plan
pub fn extract_topology(model: &FloorPlanModel) -> RoomTopology {
    let mut members: [Vec<StructuralElement>; 5] = Default::default();
    let mut windows = Vec::new();
    let mut doors = Vec::new();

    for element in &model.elements {
        match element.element_type {
            ElementType::Window => windows.push(WindowInfo {
                label: element.label.clone(),
                position: element.position,
                is_continuous: is_continuous_label(&element.label),
                facing: Facing::from_position(&element.position),
            }),
            ElementType::Door => doors.push(DoorInfo {
                label: element.label.clone(),
                position: element.position,
            }),
            _ => {}
        }

        if let Some(category) = classify_label(&element.label) {
            members[category_index(category)].push(element.clone());
        }
    }

    let rooms = RoomCategory::ALL.map(|category| {
        let members = std::mem::take(&mut members[category_index(category)]);
        let centroid = centroid_of(&members).unwrap_or_else(|| default_centroid(category));
        Room {
            category,
            centroid,
            members,
        }
    });

    let window_defaulted = windows.is_empty();
    if window_defaulted {
        windows.push(WindowInfo {
            label: "거실 창문".to_string(),
            position: DEFAULT_WINDOW,
            is_continuous: true,
            facing: Facing::from_position(&DEFAULT_WINDOW),
        });
    }

    tracing::debug!(
        windows = windows.len(),
        doors = doors.len(),
        defaulted_rooms = rooms.iter().filter(|r| r.is_default()).count(),
        "Extracted room topology"
    );

    RoomTopology {
        rooms,
        windows,
        doors,
        window_defaulted,
    }
}

/// Mean of the member positions' (x, y)
fn centroid_of(members: &[StructuralElement]) -> Option<Point2D> {
    if members.is_empty() {
        return None;
    }
    let sum: Vector2<f64> = members
        .iter()
        .map(|e| e.position.origin().to_nalgebra().coords)
        .sum();
    let mean = sum / members.len() as f64;
    Some(Point2D::from_nalgebra(&Point2::from(mean)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn element(element_type: ElementType, label: &str, x: f64, y: f64) -> StructuralElement {
        StructuralElement::new(element_type, label, Rect::new(x, y, 10.0, 2.0))
    }

    #[test]
    fn test_classify_priority() {
        // "주방" also contains "방" (bedroom); kitchen has priority
        assert_eq!(classify_label("주방 벽체"), Some(RoomCategory::Kitchen));
        assert_eq!(classify_label("Living Room Wall"), Some(RoomCategory::LivingRoom));
        assert_eq!(classify_label("안방 창문"), Some(RoomCategory::Bedroom));
        assert_eq!(classify_label("공용 화장실"), Some(RoomCategory::Bathroom));
        assert_eq!(classify_label("ENTRANCE door"), Some(RoomCategory::Entrance));
        assert_eq!(classify_label("기둥"), None);
    }

    #[test]
    fn test_centroid_is_mean_of_members() {
        let model = FloorPlanModel {
            elements: vec![
                element(ElementType::NonLoadBearingWall, "주방 벽", 40.0, 20.0),
                element(ElementType::Plumbing, "kitchen sink", 60.0, 40.0),
            ],
            ..Default::default()
        };
        let topology = extract_topology(&model);

        let kitchen = topology.room(RoomCategory::Kitchen);
        assert_eq!(kitchen.members.len(), 2);
        assert_relative_eq!(kitchen.centroid.x, 50.0);
        assert_relative_eq!(kitchen.centroid.y, 30.0);
    }

    #[test]
    fn test_every_category_has_centroid() {
        let topology = extract_topology(&FloorPlanModel::default());

        for category in RoomCategory::ALL {
            let room = topology.room(category);
            assert!(room.is_default());
            assert_eq!(room.centroid, default_centroid(category));
        }
        assert_eq!(topology.rooms().count(), 5);
    }

    #[test]
    fn test_windows_and_doors_collected() {
        let model = FloorPlanModel {
            elements: vec![
                element(ElementType::Window, "거실 전면 창", 10.0, 5.0),
                element(ElementType::Window, "bedroom window", 80.0, 50.0),
                element(ElementType::Door, "현관문", 85.0, 50.0),
            ],
            ..Default::default()
        };
        let topology = extract_topology(&model);

        assert!(!topology.window_defaulted);
        assert_eq!(topology.windows.len(), 2);
        assert!(topology.windows[0].is_continuous);
        assert_eq!(topology.windows[0].facing, Some(Facing::North));
        assert!(!topology.windows[1].is_continuous);
        assert_eq!(topology.windows[1].facing, Some(Facing::East));
        assert_eq!(topology.doors.len(), 1);
        assert_eq!(topology.room(RoomCategory::Entrance).members.len(), 1);
    }

    #[test]
    fn test_default_window_when_none_detected() {
        let topology = extract_topology(&FloorPlanModel::default());

        assert!(topology.window_defaulted);
        let window = topology.main_window();
        assert!(window.is_continuous);
        assert_eq!(window.position, DEFAULT_WINDOW);
        assert_eq!(window.facing, Some(Facing::West));
    }
}
