use std::time::Duration;

use approx::assert_relative_eq;
use district_charts::charts::line_plot::{ROLE_DROP_LINE, ROLE_LEGEND, ROLE_NAME, ROLE_POINT};
use district_charts::charts::{
    ChartRenderer, ChartSelection, DrawRequest, LinePlot, LinePlotConfig, Mark, NodeKey, Theme,
};
use district_charts::core::{CategoryCatalog, CategoryRow, Entity, EntityDataset, MetricKey};

const TOP_MARGIN: f64 = 100.0;
const LEFT_MARGIN: f64 = 50.0;

fn catalog() -> CategoryCatalog {
    CategoryCatalog::from_rows(vec![CategoryRow {
        key: "cost".to_owned(),
        header: "Cost".to_owned(),
        label: "Cost per pupil".to_owned(),
        numeric_format: Some("$,.0f".to_owned()),
    }])
}

fn dataset() -> EntityDataset {
    EntityDataset::from_entities(vec![
        Entity::new("State", true, false).with_metric(MetricKey::Cost, 11_000.0),
        Entity::new("Featured", false, true).with_metric(MetricKey::Cost, 14_000.0),
        Entity::new("North", false, false).with_metric(MetricKey::Cost, 9_000.0),
        Entity::new("South", false, false).with_metric(MetricKey::Cost, 12_000.0),
    ])
}

fn drawn(config: LinePlotConfig) -> LinePlot {
    let mut chart = LinePlot::new(config, Theme::default(), Duration::ZERO);
    let catalog = catalog();
    let dataset = dataset();
    let selection = ChartSelection::default();
    chart
        .draw(&DrawRequest {
            dataset: &dataset,
            catalog: &catalog,
            selection: &selection,
        })
        .expect("line draw");
    chart
}

fn text(chart: &LinePlot, slot: usize) -> (String, f64, bool) {
    match chart.scene().node(NodeKey::new(ROLE_NAME, slot)) {
        Some((Mark::Text(text), visible)) => (text.text, text.y, visible),
        other => panic!("expected label, got {other:?}"),
    }
}

#[test]
fn domain_uses_tight_padding() {
    let chart = drawn(LinePlotConfig::default());
    let (lo, hi) = chart.domain().expect("domain");
    assert_relative_eq!(lo, 8_820.0, epsilon = 1e-9);
    assert_relative_eq!(hi, 14_280.0, epsilon = 1e-9);
}

#[test]
fn featured_label_carries_its_value() {
    let chart = drawn(LinePlotConfig::default());
    let (label, y, visible) = text(&chart, 1);
    assert_eq!(label, "Featured [$14,000]");
    assert_eq!(y, TOP_MARGIN - 32.0);
    assert!(visible);
}

#[test]
fn default_labels_stagger_one_row_apart() {
    let chart = drawn(LinePlotConfig::default());
    let (north, north_y, _) = text(&chart, 2);
    let (south, south_y, _) = text(&chart, 3);

    assert_eq!(north, "North");
    assert_eq!(south, "South");
    assert_eq!(north_y, TOP_MARGIN + 60.0);
    assert_eq!(south_y, TOP_MARGIN + 75.0);
}

#[test]
fn reference_sits_just_below_the_axis() {
    let chart = drawn(LinePlotConfig::default());
    let (label, y, visible) = text(&chart, 0);
    assert_eq!(label, "State");
    assert_eq!(y, TOP_MARGIN + 45.0);
    assert!(visible);

    match chart.scene().node(NodeKey::new(ROLE_DROP_LINE, 0)) {
        Some((Mark::Line(line), true)) => {
            assert_eq!(line.y1, TOP_MARGIN + 6.0);
            assert_eq!(line.y2, TOP_MARGIN + 34.0);
        }
        other => panic!("expected reference drop line, got {other:?}"),
    }
}

#[test]
fn points_sit_on_the_axis_inside_the_plot_width() {
    let chart = drawn(LinePlotConfig::default());
    for slot in 0..4 {
        match chart.scene().node(NodeKey::new(ROLE_POINT, slot)) {
            Some((Mark::Circle(circle), _)) => {
                assert_eq!(circle.cy, TOP_MARGIN);
                assert!(circle.cx >= LEFT_MARGIN && circle.cx <= LEFT_MARGIN + 700.0);
            }
            other => panic!("expected point, got {other:?}"),
        }
    }
}

#[test]
fn reference_can_be_hidden() {
    let chart = drawn(LinePlotConfig {
        show_reference: false,
    });
    let (_, _, visible) = text(&chart, 0);
    assert!(!visible);
}

#[test]
fn missing_category_hides_the_legend_and_still_draws() {
    let mut chart = LinePlot::new(
        LinePlotConfig::default(),
        Theme::default(),
        Duration::from_millis(1_000),
    );
    let catalog = CategoryCatalog::default();
    let dataset = dataset();
    let selection = ChartSelection::default();
    let request = DrawRequest {
        dataset: &dataset,
        catalog: &catalog,
        selection: &selection,
    };
    chart.draw(&request).expect("first draw");
    chart.draw(&request).expect("second draw");

    let (_, visible) = chart
        .scene()
        .node(NodeKey::new(ROLE_LEGEND, 0))
        .expect("legend slot");
    assert!(!visible);
    let (_, visible) = chart
        .scene()
        .node(NodeKey::new(ROLE_POINT, 1))
        .expect("featured point");
    assert!(visible);
}

#[test]
fn featured_reference_uses_the_featured_position_and_color() {
    let dataset = EntityDataset::from_entities(vec![
        Entity::new("Both", true, true).with_metric(MetricKey::Cost, 11_000.0),
        Entity::new("North", false, false).with_metric(MetricKey::Cost, 9_000.0),
    ]);
    let catalog = catalog();
    let selection = ChartSelection::default();
    let theme = Theme::default();
    let mut chart = LinePlot::new(LinePlotConfig::default(), theme, Duration::ZERO);
    chart
        .draw(&DrawRequest {
            dataset: &dataset,
            catalog: &catalog,
            selection: &selection,
        })
        .expect("line draw");

    match chart.scene().node(NodeKey::new(ROLE_NAME, 0)) {
        Some((Mark::Text(text), true)) => {
            assert_eq!(text.text, "Both [$11,000]");
            assert_eq!(text.y, TOP_MARGIN - 32.0);
            assert_eq!(text.color, theme.featured_mark);
        }
        other => panic!("expected featured label, got {other:?}"),
    }
    // The first default row still starts two rows below the axis.
    let (_, y, _) = text(&chart, 1);
    assert_eq!(y, TOP_MARGIN + 60.0);
}
