use district_charts::core::{Category, CategoryCatalog, CategoryRow};

fn row(key: &str, header: &str, label: &str, format: Option<&str>) -> CategoryRow {
    CategoryRow {
        key: key.to_owned(),
        header: header.to_owned(),
        label: label.to_owned(),
        numeric_format: format.map(str::to_owned),
    }
}

fn catalog() -> CategoryCatalog {
    CategoryCatalog::from_rows(vec![
        row("name", "District", "", None),
        row("cost", "Cost", "Cost per pupil", Some("$,.0f")),
        row("lowIncome", "Low income", "Low-income students", Some(".1%")),
    ])
}

#[test]
fn get_by_key_returns_the_exact_record() {
    let catalog = catalog();
    let cost = catalog.get_by_key("cost");

    assert_eq!(cost.key, "cost");
    assert_eq!(cost.header, "Cost");
    assert_eq!(cost.label, "Cost per pupil");
    assert_eq!(cost.numeric_format, "$,.0f");
    assert!(!cost.is_percent);
}

#[test]
fn percent_formats_mark_the_category_as_percent() {
    let catalog = catalog();
    assert!(catalog.get_by_key("lowIncome").is_percent);
    assert!(catalog.get_by_key("lowIncome").number_format().is_percent());
}

#[test]
fn unknown_key_yields_the_placeholder() {
    let catalog = catalog();
    let missing = catalog.get_by_key("nonexistent");

    assert!(missing.is_placeholder());
    assert_eq!(missing, &Category::placeholder());
    assert!(missing.label.is_empty());
    assert!(!catalog.contains("nonexistent"));
}

#[test]
fn catalog_keeps_source_order() {
    let catalog = catalog();
    let keys: Vec<&str> = catalog
        .categories()
        .iter()
        .map(|category| category.key.as_str())
        .collect();

    assert_eq!(keys, ["name", "cost", "lowIncome"]);
    assert_eq!(catalog.len(), 3);
    assert!(!catalog.is_empty());
}

#[test]
fn missing_format_falls_back_to_default_rendering() {
    let catalog = catalog();
    let name = catalog.get_by_key("name");

    assert_eq!(name.numeric_format, "");
    assert_eq!(name.number_format().format(1234.5), "1234.5");
}

#[test]
fn category_rows_deserialize_from_csv_headers() {
    let input = "key,header,label,numericFormat\ncost,Cost,Cost per pupil,\"$,.0f\"\n";
    let mut reader = csv::Reader::from_reader(input.as_bytes());
    let rows: Vec<CategoryRow> = reader
        .deserialize()
        .collect::<Result<_, _>>()
        .expect("category rows");

    assert_eq!(rows, vec![row("cost", "Cost", "Cost per pupil", Some("$,.0f"))]);
}
