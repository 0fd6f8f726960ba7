use approx::assert_relative_eq;
use district_charts::charts::bullet::{ROLE_MARKER, ROLE_MEASURE, ROLE_RANGE, ROLE_TITLE};
use district_charts::charts::{
    BulletChart, BulletConfig, ChartRenderer, ChartSelection, DrawRequest, Mark, NodeKey,
    RenderPhase, Theme, bullet_data,
};
use district_charts::core::{CategoryCatalog, CategoryRow, Entity, EntityDataset, MetricKey};
use district_charts::render::{NullRenderer, Renderer};

fn catalog() -> CategoryCatalog {
    CategoryCatalog::from_rows(vec![CategoryRow {
        key: "classSize".to_owned(),
        header: "Class size".to_owned(),
        label: "Average class size".to_owned(),
        numeric_format: Some(",".to_owned()),
    }])
}

fn dataset() -> EntityDataset {
    EntityDataset::from_entities(vec![
        Entity::new("North", false, false).with_metric(MetricKey::ClassSize, 18.0),
        Entity::new("State", true, false).with_metric(MetricKey::ClassSize, 20.0),
        Entity::new("Featured", false, true).with_metric(MetricKey::ClassSize, 24.0),
        Entity::new("South", false, false).with_metric(MetricKey::ClassSize, 22.0),
    ])
}

fn selection() -> ChartSelection {
    ChartSelection {
        primary: MetricKey::ClassSize,
        ..ChartSelection::default()
    }
}

#[test]
fn rows_drop_the_reference_and_lead_with_featured() {
    let data = bullet_data(&dataset(), MetricKey::ClassSize);
    let titles: Vec<&str> = data.iter().map(|datum| datum.title.as_str()).collect();

    assert_eq!(titles, ["Featured", "North", "South"]);
}

#[test]
fn ranges_bracket_reference_and_padded_maximum() {
    let data = bullet_data(&dataset(), MetricKey::ClassSize);
    let north = &data[1];

    assert_eq!(north.ranges.len(), 3);
    assert_eq!(north.ranges[0], 0.0);
    assert_eq!(north.ranges[1], 20.0);
    assert_relative_eq!(north.ranges[2], 26.4, epsilon = 1e-9);
    assert_eq!(north.measures.as_slice(), &[18.0]);
    assert_eq!(north.markers.as_slice(), &[24.0]);
}

#[test]
fn missing_reference_uses_a_zero_baseline() {
    let dataset = EntityDataset::from_entities(vec![
        Entity::new("North", false, false).with_metric(MetricKey::ClassSize, 18.0),
    ]);
    let data = bullet_data(&dataset, MetricKey::ClassSize);

    assert_eq!(data.len(), 1);
    assert_eq!(data[0].ranges[1], 0.0);
    assert!(data[0].markers.is_empty());
}

#[test]
fn chart_stacks_one_row_per_district_without_animation() {
    let mut chart = BulletChart::new(BulletConfig::default(), Theme::default());
    let dataset = dataset();
    let catalog = catalog();
    let selection = selection();
    chart
        .draw(&DrawRequest {
            dataset: &dataset,
            catalog: &catalog,
            selection: &selection,
        })
        .expect("bullet draw");

    assert_eq!(chart.phase(), RenderPhase::Initialized);
    assert!(chart.scene().is_settled());
    assert_eq!(chart.viewport().width, 300);
    assert_eq!(chart.viewport().height, 3 * 35);
    assert_eq!(chart.data().len(), 3);

    let scene = chart.scene();
    assert_eq!(scene.slots(ROLE_TITLE), vec![0, 1, 2]);
    assert_eq!(scene.slots(ROLE_RANGE).len(), 9);
    assert_eq!(scene.slots(ROLE_MEASURE).len(), 3);
    assert_eq!(scene.slots(ROLE_MARKER).len(), 3);

    match scene.node(NodeKey::new(ROLE_TITLE, 1)) {
        Some((Mark::Text(text), true)) => {
            assert_eq!(text.text, "North");
            assert_eq!(text.x, 85.0);
            assert_eq!(text.y, 35.0 + 5.0 + 13.0 - 3.0);
        }
        other => panic!("expected title, got {other:?}"),
    }
}

#[test]
fn largest_range_is_painted_first_across_the_full_row() {
    let mut chart = BulletChart::new(BulletConfig::default(), Theme::default());
    let dataset = dataset();
    let catalog = catalog();
    let selection = selection();
    chart
        .draw(&DrawRequest {
            dataset: &dataset,
            catalog: &catalog,
            selection: &selection,
        })
        .expect("bullet draw");

    match chart.scene().node(NodeKey::new(ROLE_RANGE, 0)) {
        Some((Mark::Rect(rect), true)) => {
            assert_relative_eq!(rect.width, 200.0, epsilon = 1e-9);
            assert_eq!(rect.height, 13.0);
        }
        other => panic!("expected range band, got {other:?}"),
    }

    let mut backend = NullRenderer::default();
    backend.render(&chart.frame()).expect("valid frame");
}

#[test]
fn missing_category_still_draws_every_row() {
    let mut chart = BulletChart::new(BulletConfig::default(), Theme::default());
    let dataset = dataset();
    let catalog = CategoryCatalog::default();
    let selection = selection();
    let request = DrawRequest {
        dataset: &dataset,
        catalog: &catalog,
        selection: &selection,
    };
    chart.draw(&request).expect("first draw");
    chart.draw(&request).expect("second draw");

    assert_eq!(chart.scene().slots(ROLE_TITLE), vec![0, 1, 2]);
    match chart.scene().node(NodeKey::new(ROLE_TITLE, 0)) {
        Some((Mark::Text(text), true)) => assert_eq!(text.text, "Featured"),
        other => panic!("expected title, got {other:?}"),
    }
    let mut backend = NullRenderer::default();
    backend.render(&chart.frame()).expect("valid frame");
}
