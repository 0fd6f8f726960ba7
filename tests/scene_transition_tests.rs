use std::time::Duration;

use approx::assert_relative_eq;
use district_charts::charts::{
    Mark, NodeKey, RenderPhase, RetainedScene, SceneTarget, ease_cubic_in_out,
};
use district_charts::core::Viewport;
use district_charts::render::{CirclePrimitive, Color, TextHAlign, TextPrimitive};

const POINT: &str = "point";
const LABEL: &str = "label";

fn circle_at(cx: f64) -> CirclePrimitive {
    CirclePrimitive::new(cx, 50.0, 5.0, Color::rgb(0.2, 0.2, 0.2))
}

fn target_with(cxs: &[f64]) -> SceneTarget {
    let mut target = SceneTarget::new();
    for (slot, cx) in cxs.iter().enumerate() {
        target.circle(NodeKey::new(POINT, slot), circle_at(*cx), true);
    }
    target
}

fn sampled_cx(scene: &RetainedScene, slot: usize) -> f64 {
    match scene.node(NodeKey::new(POINT, slot)) {
        Some((Mark::Circle(circle), _)) => circle.cx,
        other => panic!("expected circle, got {other:?}"),
    }
}

#[test]
fn easing_is_symmetric_and_clamped() {
    assert_eq!(ease_cubic_in_out(0.0), 0.0);
    assert_eq!(ease_cubic_in_out(1.0), 1.0);
    assert_relative_eq!(ease_cubic_in_out(0.5), 0.5);
    assert_relative_eq!(ease_cubic_in_out(0.25) + ease_cubic_in_out(0.75), 1.0);
    assert_eq!(ease_cubic_in_out(-1.0), 0.0);
    assert_eq!(ease_cubic_in_out(2.0), 1.0);
}

#[test]
fn first_patch_places_marks_without_animation() {
    let mut scene = RetainedScene::new(Duration::from_millis(1000));
    assert_eq!(scene.phase(), RenderPhase::Uninitialized);

    scene.patch(target_with(&[10.0, 20.0]));

    assert_eq!(scene.phase(), RenderPhase::Initialized);
    assert!(scene.is_settled());
    assert_eq!(sampled_cx(&scene, 0), 10.0);
    assert_eq!(sampled_cx(&scene, 1), 20.0);
}

#[test]
fn later_patch_animates_from_current_geometry() {
    let mut scene = RetainedScene::new(Duration::from_millis(1000));
    scene.patch(target_with(&[0.0]));
    scene.patch(target_with(&[100.0]));

    assert!(!scene.is_settled());
    assert_eq!(sampled_cx(&scene, 0), 0.0);

    scene.advance(Duration::from_millis(500));
    assert_relative_eq!(sampled_cx(&scene, 0), 50.0);

    scene.advance(Duration::from_millis(500));
    assert!(scene.is_settled());
    assert_eq!(sampled_cx(&scene, 0), 100.0);
}

#[test]
fn patch_mid_transition_retargets_from_sampled_state() {
    let mut scene = RetainedScene::new(Duration::from_millis(1000));
    scene.patch(target_with(&[0.0]));
    scene.patch(target_with(&[100.0]));
    scene.advance(Duration::from_millis(500));
    let midway = sampled_cx(&scene, 0);

    scene.patch(target_with(&[0.0]));

    assert_relative_eq!(sampled_cx(&scene, 0), midway);
    scene.settle();
    assert_eq!(sampled_cx(&scene, 0), 0.0);
}

#[test]
fn entering_and_exiting_nodes() {
    let mut scene = RetainedScene::new(Duration::from_millis(1000));
    scene.patch(target_with(&[10.0, 20.0, 30.0]));
    scene.patch(target_with(&[15.0, 25.0]));

    assert_eq!(scene.slots(POINT), vec![0, 1]);
    assert_eq!(scene.len(), 2);

    scene.patch(target_with(&[15.0, 25.0, 35.0, 45.0]));
    // New keys appear at their target straight away.
    assert_eq!(sampled_cx(&scene, 3), 45.0);
}

#[test]
fn hidden_nodes_stay_in_the_scene_but_not_in_the_frame() {
    let mut scene = RetainedScene::new(Duration::ZERO);
    let mut target = target_with(&[10.0]);
    target.circle(NodeKey::new(POINT, 1), circle_at(20.0), false);
    scene.patch(target);

    assert_eq!(scene.len(), 2);
    assert_eq!(scene.visible_len(), 1);
    let frame = scene.frame(Viewport::new(100, 100));
    assert_eq!(frame.circles.len(), 1);
}

#[test]
fn blank_text_is_forced_hidden() {
    let mut target = SceneTarget::new();
    target.text(
        NodeKey::new(LABEL, 0),
        TextPrimitive::new(
            String::new(),
            0.0,
            0.0,
            11.0,
            Color::rgb(0.0, 0.0, 0.0),
            TextHAlign::Left,
        ),
        true,
    );

    assert!(!target.nodes()[0].visible);
}

#[test]
fn text_content_switches_at_transition_start() {
    let mut scene = RetainedScene::new(Duration::from_millis(1000));
    let label = |text: &str, x: f64| {
        let mut target = SceneTarget::new();
        target.text(
            NodeKey::new(LABEL, 0),
            TextPrimitive::new(
                text.to_owned(),
                x,
                0.0,
                11.0,
                Color::rgb(0.0, 0.0, 0.0),
                TextHAlign::Left,
            ),
            true,
        );
        target
    };
    scene.patch(label("before", 0.0));
    scene.patch(label("after", 100.0));

    match scene.node(NodeKey::new(LABEL, 0)) {
        Some((Mark::Text(text), true)) => {
            assert_eq!(text.text, "after");
            assert_eq!(text.x, 0.0);
        }
        other => panic!("expected visible text, got {other:?}"),
    }
}
