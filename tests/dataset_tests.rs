use std::path::Path;

use approx::assert_relative_eq;
use district_charts::ChartError;
use district_charts::api::read_csv_rows;
use district_charts::core::{
    Entity, EntityDataset, EntityRow, MetricKey, NAME_COLUMN, TabularCell,
};
use district_charts::core::primitives::{percent_to_proportion, proportion_to_percent};
use proptest::prelude::*;
use rust_decimal::Decimal;

const HEADER: &str = "name,isReference,isFeatured,cost,lowIncome,classSize,postSecondary,teacherSalary,limitedEnglish,graduationRate,pupilAdmin,iep";

fn dataset_from_csv(body: &str) -> Result<EntityDataset, ChartError> {
    let input = format!("{HEADER}\n{body}");
    let rows: Vec<EntityRow> = read_csv_rows(input.as_bytes(), Path::new("inline.csv"))?;
    EntityDataset::from_rows(&rows)
}

fn sample() -> EntityDataset {
    dataset_from_csv(
        "State Average,true,false,100,45.5,20,60,50000,8,85,150,15\n\
         Springfield,false,true,150,30,18,70,55000,5,90,120,12\n\
         Shelbyville,false,false,120,62.25,24,40,48000,12,80,180,18\n",
    )
    .expect("sample dataset")
}

#[test]
fn reference_returns_the_flagged_row() {
    let dataset = sample();
    assert_eq!(dataset.reference().name, "State Average");
    assert!(dataset.reference().is_reference);
}

#[test]
fn reference_without_flag_returns_the_placeholder() {
    let dataset = EntityDataset::from_entities(vec![
        Entity::new("A", false, false).with_metric(MetricKey::Cost, 1.0),
    ]);

    assert!(dataset.find_reference().is_none());
    assert_eq!(dataset.reference(), &Entity::placeholder());
    assert_eq!(dataset.reference().metric(MetricKey::Cost), 0.0);
}

#[test]
fn individuals_drop_only_the_reference_and_keep_order() {
    let dataset = sample();
    let names: Vec<&str> = dataset
        .individuals()
        .iter()
        .map(|entity| entity.name.as_str())
        .collect();

    assert_eq!(names, ["Springfield", "Shelbyville"]);
    assert_eq!(dataset.individuals().len(), dataset.len() - 1);
}

#[test]
fn proportion_columns_are_stored_as_rounded_fractions() {
    let dataset = sample();
    let shelbyville = &dataset.entities()[2];

    // 62.25 / 100 rounds half away from zero at three places.
    assert_relative_eq!(shelbyville.metric(MetricKey::LowIncome), 0.623);
    assert_relative_eq!(shelbyville.metric(MetricKey::GraduationRate), 0.8);
    assert_relative_eq!(shelbyville.metric(MetricKey::Cost), 120.0);
    assert_relative_eq!(shelbyville.metric(MetricKey::PupilAdmin), 180.0);
}

#[test]
fn flags_accept_only_true_spellings() {
    let dataset = dataset_from_csv(
        "A,yes,1,1,1,1,1,1,1,1,1,1\n\
         B,TRUE,true,1,1,1,1,1,1,1,1,1\n",
    )
    .expect("dataset");

    assert!(!dataset.entities()[0].is_reference);
    assert!(!dataset.entities()[0].is_featured);
    assert!(dataset.entities()[1].is_reference);
    assert!(dataset.entities()[1].is_featured);
}

#[test]
fn invalid_numeric_field_is_a_parse_error_with_row_and_field() {
    let err = dataset_from_csv(
        "A,false,false,100,10,1,1,1,1,1,1,1\n\
         B,false,false,lots,10,1,1,1,1,1,1,1\n",
    )
    .expect_err("bad cost must fail");

    match err {
        ChartError::Parse { row, field, value } => {
            assert_eq!(row, 2);
            assert_eq!(field, "cost");
            assert_eq!(value, "lots");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn empty_numeric_field_is_rejected() {
    let err = dataset_from_csv("A,false,false,100,,1,1,1,1,1,1,1\n").expect_err("blank field");
    assert!(matches!(err, ChartError::Parse { field: "lowIncome", .. }));
}

#[test]
fn legacy_column_names_are_accepted() {
    let input = "district,isStateAverage,isFeatured,cost,lowIncome,classSize,postSecondary,teacherSalary,limitedEnglish,graduationRate,pupilAdmin,iep\n\
                 Statewide,true,false,1,1,1,1,1,1,1,1,1\n";
    let rows: Vec<EntityRow> =
        read_csv_rows(input.as_bytes(), Path::new("legacy.csv")).expect("legacy rows");
    let dataset = EntityDataset::from_rows(&rows).expect("legacy dataset");

    assert_eq!(dataset.reference().name, "Statewide");
}

#[test]
fn extent_spans_every_entity() {
    let dataset = sample();
    assert_eq!(dataset.extent(MetricKey::Cost), Some((100.0, 150.0)));
    assert_eq!(EntityDataset::default().extent(MetricKey::Cost), None);
}

#[test]
fn tabular_projection_starts_with_name_and_shows_percentages() {
    let dataset = sample();
    let rows = dataset.tabular_projection();
    let first = &rows[0];

    let columns: Vec<&str> = first.keys().map(String::as_str).collect();
    assert_eq!(columns[0], NAME_COLUMN);
    assert_eq!(columns.len(), MetricKey::COUNT + 1);
    assert!(!first.contains_key("isReference"));
    assert!(!first.contains_key("isFeatured"));

    assert_eq!(first[NAME_COLUMN], TabularCell::Text("State Average".to_owned()));
    assert_eq!(first["lowIncome"], TabularCell::Percent(45.5));
    assert_eq!(first["cost"], TabularCell::Number(100.0));
    assert_eq!(first["cost"].to_string(), "100");
}

#[test]
fn whole_percentages_keep_one_decimal_in_the_table() {
    let dataset = EntityDataset::from_entities(vec![
        Entity::new("North", false, false)
            .with_metric(MetricKey::LowIncome, 0.45)
            .with_metric(MetricKey::ClassSize, 20.0),
    ]);
    let rows = dataset.tabular_projection();

    assert_eq!(rows[0]["lowIncome"].to_string(), "45.0");
    assert_eq!(rows[0]["classSize"].to_string(), "20");
}

#[test]
fn projection_does_not_mutate_the_dataset() {
    let dataset = sample();
    let before = dataset.clone();
    let _ = dataset.tabular_projection();
    assert_eq!(dataset, before);
}

proptest! {
    #[test]
    fn proportion_round_trip_recovers_one_decimal_percentages(tenths in 0u32..=1000) {
        let percent = Decimal::new(i64::from(tenths), 1);
        let stored = percent_to_proportion(percent, "prop").expect("proportion");
        let shown = proportion_to_percent(stored);
        let expected = f64::from(tenths) / 10.0;

        prop_assert!((shown - expected).abs() <= 1e-9);
    }

    #[test]
    fn proportion_round_trip_stays_within_rounding_error(percent in 0.0f64..100.0) {
        let decimal = Decimal::from_f64_retain(percent).expect("finite decimal");
        let stored = percent_to_proportion(decimal, "prop").expect("proportion");
        let shown = proportion_to_percent(stored);

        prop_assert!((shown - percent).abs() <= 0.05 + 1e-9);
    }
}
