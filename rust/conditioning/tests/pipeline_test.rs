// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end tests of the conditioning pipeline through the public API.

use approx::assert_relative_eq;
use floorplan_lite_conditioning::{
    build_conditioning, build_conditioning_batch, flip_rect, normalize_floor_plan,
    ConditioningConfig, ConditioningKind, ConditioningRequest, DemolitionRisk, ElementOrigin,
    ElementType, FloorPlanModel, RawDataset, RawItem, Rect, StructuralElement,
};

fn small_config() -> ConditioningConfig {
    ConditioningConfig {
        canvas_width: 160,
        canvas_height: 120,
        lineart_margin: 10,
        ..Default::default()
    }
}

fn apartment() -> FloorPlanModel {
    FloorPlanModel {
        estimated_area: Some(30.0),
        room_count: 3,
        bathroom_count: 2,
        summary: "3LDK".to_string(),
        warnings: vec![],
        elements: vec![
            StructuralElement::new(ElementType::Window, "거실 전면 통창", Rect::new(10.0, 2.0, 60.0, 3.0)),
            StructuralElement::new(ElementType::NonLoadBearingWall, "주방 벽", Rect::new(70.0, 40.0, 2.0, 30.0)),
            StructuralElement::new(ElementType::Door, "현관문", Rect::new(85.0, 90.0, 8.0, 2.0)),
        ],
    }
}

#[test]
fn test_floating_window_gets_outer_wall() {
    let dataset = RawDataset {
        windows: vec![RawItem::new(Rect::new(10.0, 0.0, 40.0, 3.0))],
        ..Default::default()
    };

    let model = normalize_floor_plan(FloorPlanModel::default(), &dataset, &small_config());

    assert_eq!(model.elements.len(), 1);
    let wall = &model.elements[0];
    assert_eq!(wall.element_type, ElementType::LoadBearingWall);
    assert_eq!(wall.origin, ElementOrigin::Inferred);
    assert!(!wall.demolishable);
    assert_eq!(wall.risk, DemolitionRisk::High);
    assert_relative_eq!(wall.position.x, 10.0);
    assert_relative_eq!(wall.position.right(), 50.0);
    assert!(wall.confidence < 0.8);
    assert!(model.warnings.iter().any(|w| w.contains("Missing outer wall")));
}

#[test]
fn test_existing_elements_survive_inference() {
    let dataset = RawDataset {
        windows: vec![RawItem::new(Rect::new(10.0, 0.0, 40.0, 3.0))],
        ..Default::default()
    };

    let model = normalize_floor_plan(apartment(), &dataset, &small_config());

    assert_eq!(model.elements.len(), 4);
    let labels: Vec<_> = model.elements.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(&labels[..3], &["거실 전면 통창", "주방 벽", "현관문"]);
    assert!(model.elements[..3]
        .iter()
        .all(|e| e.origin == ElementOrigin::Detected));
}

#[test]
fn test_flip_is_an_involution() {
    let rect = Rect::new(12.5, 33.25, 7.0, 4.5);
    let twice = flip_rect(&flip_rect(&rect, 120.0), 120.0);

    assert_relative_eq!(twice.x, rect.x);
    assert_relative_eq!(twice.y, rect.y);
    assert_relative_eq!(twice.width, rect.width);
    assert_relative_eq!(twice.height, rect.height);
}

#[test]
fn test_kitchen_viewpoint_description_layers() {
    for model in [FloorPlanModel::default(), apartment()] {
        let request = ConditioningRequest {
            floor_plan: model,
            raw_dataset: None,
            viewpoint: Some("주방에서 거실 보는 시점".to_string()),
        };

        let output = build_conditioning(&request, &small_config()).unwrap();

        assert!(output.scene_description.contains("FOREGROUND"));
        assert!(output.scene_description.to_lowercase().contains("kitchen counter"));
        assert!(output.scene_description.contains("BACKGROUND"));
        assert!(output.scene_description.contains("window"));
        assert_eq!(output.artifact.kind, ConditioningKind::Depth);
    }
}

#[test]
fn test_unrecognized_viewpoint_still_describes() {
    let request = ConditioningRequest {
        floor_plan: FloorPlanModel::default(),
        raw_dataset: None,
        viewpoint: Some("드론 항공 시점".to_string()),
    };

    let output = build_conditioning(&request, &small_config()).unwrap();

    assert!(!output.scene_description.is_empty());
    assert_eq!(output.artifact.kind, ConditioningKind::Depth);
}

#[test]
fn test_empty_dataset_yields_no_lineart() {
    let request = ConditioningRequest {
        floor_plan: apartment(),
        raw_dataset: Some(RawDataset::default()),
        viewpoint: None,
    };

    let output = build_conditioning(&request, &small_config()).unwrap();

    assert_eq!(output.artifact.kind, ConditioningKind::None);
    assert!(output.artifact.image.is_empty());
    assert!(output.artifact.note.is_some());
}

#[test]
fn test_pipeline_is_deterministic() {
    let request = ConditioningRequest {
        floor_plan: apartment(),
        raw_dataset: Some(RawDataset {
            walls: vec![RawItem::new(Rect::new(0.0, 0.0, 100.0, 100.0)).with_layer("WALL-LOAD")],
            doors: vec![RawItem::new(Rect::new(80.0, 0.0, 10.0, 2.0))],
            windows: vec![RawItem::new(Rect::new(10.0, 98.0, 60.0, 2.0))],
        }),
        viewpoint: Some("view from kitchen towards living room".to_string()),
    };

    let a = build_conditioning(&request, &small_config()).unwrap();
    let b = build_conditioning(&request, &small_config()).unwrap();

    assert_eq!(a.artifact.kind, ConditioningKind::Lineart);
    assert_eq!(a.artifact.seed, b.artifact.seed);
    assert_eq!(a.artifact.image, b.artifact.image);
    assert_eq!(a.scene_description, b.scene_description);
}

#[test]
fn test_request_from_json() {
    let json = r#"{
        "floor_plan": {
            "estimated_area": 25,
            "elements": [
                {"element_type": "window", "label": "침실 창", "position": {"x": 20, "y": 5, "width": 10, "height": 2}}
            ]
        },
        "raw_dataset": {
            "walls": [{"coordinates": {"x": 0, "y": 0, "width": 50, "height": 40}}, {"layer": "A-WALL"}],
            "windows": [{"coordinates": {"x": 20, "y": 38, "width": 10, "height": 2}}]
        },
        "viewpoint": "침실"
    }"#;
    let request: ConditioningRequest = serde_json::from_str(json).unwrap();

    let output = build_conditioning(&request, &small_config()).unwrap();

    // max_y = 40: window flipped from y=5 to y=33
    assert_relative_eq!(output.floor_plan.elements[0].position.y, 33.0);
    assert_eq!(output.floor_plan.elements.len(), 1);
    assert_eq!(output.artifact.kind, ConditioningKind::Lineart);
}

#[test]
fn test_batch_keeps_request_order() {
    let requests = vec![
        ConditioningRequest {
            viewpoint: Some("창가".to_string()),
            ..Default::default()
        },
        ConditioningRequest::default(),
        ConditioningRequest {
            floor_plan: apartment(),
            viewpoint: Some("현관".to_string()),
            ..Default::default()
        },
    ];

    let outputs: Vec<_> = build_conditioning_batch(&requests, &small_config())
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    let kinds: Vec<_> = outputs.iter().map(|o| o.artifact.kind).collect();
    assert_eq!(
        kinds,
        vec![ConditioningKind::Depth, ConditioningKind::None, ConditioningKind::Depth]
    );

    let single = build_conditioning(&requests[2], &small_config()).unwrap();
    assert_eq!(outputs[2].artifact.seed, single.artifact.seed);
}
