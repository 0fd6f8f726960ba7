use std::time::Duration;

use approx::assert_relative_eq;
use district_charts::charts::slope::{
    ROLE_CONNECTOR, ROLE_LEFT_LEGEND, ROLE_LEFT_NAME, ROLE_LEFT_POINT, ROLE_RIGHT_LEGEND,
    ROLE_RIGHT_NAME,
};
use district_charts::charts::{
    ChartRenderer, ChartSelection, DrawRequest, Mark, NodeKey, SlopeConfig, Slopegraph, Theme,
};
use district_charts::core::{CategoryCatalog, CategoryRow, Entity, EntityDataset, MetricKey};

fn catalog() -> CategoryCatalog {
    CategoryCatalog::from_rows(vec![
        CategoryRow {
            key: "cost".to_owned(),
            header: "Cost".to_owned(),
            label: "Cost per pupil".to_owned(),
            numeric_format: Some("$,.0f".to_owned()),
        },
        CategoryRow {
            key: "graduationRate".to_owned(),
            header: "Graduation".to_owned(),
            label: "Graduation rate".to_owned(),
            numeric_format: Some(".0%".to_owned()),
        },
    ])
}

fn dataset() -> EntityDataset {
    EntityDataset::from_entities(vec![
        Entity::new("State", true, false)
            .with_metric(MetricKey::Cost, 11_000.0)
            .with_metric(MetricKey::GraduationRate, 0.85),
        Entity::new("Featured", false, true)
            .with_metric(MetricKey::Cost, 14_000.0)
            .with_metric(MetricKey::GraduationRate, 0.9),
        Entity::new("Other", false, false)
            .with_metric(MetricKey::Cost, 9_000.0)
            .with_metric(MetricKey::GraduationRate, 0.7),
    ])
}

fn draw(chart: &mut Slopegraph, zero_baseline: bool) {
    let catalog = catalog();
    let dataset = dataset();
    let selection = ChartSelection {
        primary: MetricKey::Cost,
        secondary: MetricKey::GraduationRate,
        zero_baseline,
    };
    chart
        .draw(&DrawRequest {
            dataset: &dataset,
            catalog: &catalog,
            selection: &selection,
        })
        .expect("slope draw");
}

#[test]
fn both_axes_pad_their_own_metric() {
    let mut chart = Slopegraph::new(SlopeConfig::default(), Theme::default(), Duration::ZERO);
    draw(&mut chart, false);

    let (left_lo, left_hi) = chart.left_domain().expect("left");
    let (right_lo, right_hi) = chart.right_domain().expect("right");
    assert_relative_eq!(left_lo, 8_100.0, epsilon = 1e-9);
    assert_relative_eq!(left_hi, 15_400.0, epsilon = 1e-9);
    assert_relative_eq!(right_lo, 0.63, epsilon = 1e-9);
    assert_relative_eq!(right_hi, 0.99, epsilon = 1e-9);
}

#[test]
fn zero_baseline_applies_to_slopegraphs() {
    let mut chart = Slopegraph::new(SlopeConfig::default(), Theme::default(), Duration::ZERO);
    draw(&mut chart, true);

    assert_eq!(chart.left_domain().map(|d| d.0), Some(0.0));
    assert_eq!(chart.right_domain().map(|d| d.0), Some(0.0));
}

#[test]
fn connectors_run_between_the_two_axes() {
    let mut chart = Slopegraph::new(SlopeConfig::default(), Theme::default(), Duration::ZERO);
    draw(&mut chart, false);

    match chart.scene().node(NodeKey::new(ROLE_CONNECTOR, 1)) {
        Some((Mark::Line(line), true)) => {
            assert_eq!(line.x1, 160.0);
            assert_eq!(line.x2, 320.0);
            assert_eq!(line.stroke_width, 2.0);
        }
        other => panic!("expected featured connector, got {other:?}"),
    }
    match chart.scene().node(NodeKey::new(ROLE_CONNECTOR, 2)) {
        Some((Mark::Line(line), true)) => assert_eq!(line.stroke_width, 1.0),
        other => panic!("expected default connector, got {other:?}"),
    }
}

#[test]
fn reference_is_hidden_by_default() {
    let mut chart = Slopegraph::new(SlopeConfig::default(), Theme::default(), Duration::ZERO);
    draw(&mut chart, false);

    let (_, visible) = chart
        .scene()
        .node(NodeKey::new(ROLE_LEFT_POINT, 0))
        .expect("reference slot");
    assert!(!visible);

    let config = SlopeConfig {
        show_reference: true,
        ..SlopeConfig::default()
    };
    let mut chart = Slopegraph::new(config, Theme::default(), Duration::ZERO);
    draw(&mut chart, false);
    let (_, visible) = chart
        .scene()
        .node(NodeKey::new(ROLE_LEFT_POINT, 0))
        .expect("reference slot");
    assert!(visible);
}

#[test]
fn only_highlighted_districts_are_labelled() {
    let mut chart = Slopegraph::new(SlopeConfig::default(), Theme::default(), Duration::ZERO);
    draw(&mut chart, false);
    let scene = chart.scene();

    match scene.node(NodeKey::new(ROLE_LEFT_NAME, 1)) {
        Some((Mark::Text(text), true)) => assert_eq!(text.text, "Featured [$14,000]"),
        other => panic!("expected featured label, got {other:?}"),
    }
    match scene.node(NodeKey::new(ROLE_RIGHT_NAME, 1)) {
        Some((Mark::Text(text), true)) => assert_eq!(text.text, "Featured [90%]"),
        other => panic!("expected featured label, got {other:?}"),
    }
    let (_, visible) = scene
        .node(NodeKey::new(ROLE_LEFT_NAME, 2))
        .expect("default label slot");
    assert!(!visible);
}

#[test]
fn missing_categories_hide_the_legends_and_still_draw() {
    let mut chart = Slopegraph::new(
        SlopeConfig::default(),
        Theme::default(),
        Duration::from_millis(1_000),
    );
    let catalog = CategoryCatalog::default();
    let dataset = dataset();
    let selection = ChartSelection {
        primary: MetricKey::Cost,
        secondary: MetricKey::GraduationRate,
        zero_baseline: false,
    };
    let request = DrawRequest {
        dataset: &dataset,
        catalog: &catalog,
        selection: &selection,
    };
    chart.draw(&request).expect("first draw");
    chart.draw(&request).expect("second draw");

    for role in [ROLE_LEFT_LEGEND, ROLE_RIGHT_LEGEND] {
        let (_, visible) = chart
            .scene()
            .node(NodeKey::new(role, 0))
            .expect("legend slot");
        assert!(!visible, "{role} should be hidden");
    }
    let (_, visible) = chart
        .scene()
        .node(NodeKey::new(ROLE_LEFT_NAME, 1))
        .expect("featured label slot");
    assert!(visible);
}

#[test]
fn featured_reference_stays_visible_when_references_are_suppressed() {
    let dataset = EntityDataset::from_entities(vec![
        Entity::new("Both", true, true)
            .with_metric(MetricKey::Cost, 11_000.0)
            .with_metric(MetricKey::GraduationRate, 0.85),
        Entity::new("Other", false, false)
            .with_metric(MetricKey::Cost, 9_000.0)
            .with_metric(MetricKey::GraduationRate, 0.7),
    ]);
    let catalog = catalog();
    let selection = ChartSelection {
        primary: MetricKey::Cost,
        secondary: MetricKey::GraduationRate,
        zero_baseline: false,
    };
    let theme = Theme::default();
    let mut chart = Slopegraph::new(SlopeConfig::default(), theme, Duration::ZERO);
    chart
        .draw(&DrawRequest {
            dataset: &dataset,
            catalog: &catalog,
            selection: &selection,
        })
        .expect("slope draw");

    match chart.scene().node(NodeKey::new(ROLE_LEFT_POINT, 0)) {
        Some((Mark::Circle(circle), true)) => assert_eq!(circle.fill_color, theme.featured_mark),
        other => panic!("expected featured point, got {other:?}"),
    }
}
