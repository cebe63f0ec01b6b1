use approx::assert_relative_eq;
use chart_dashboard::core::{CellValue, Dataset};
use chart_dashboard::error::DashboardError;
use chart_dashboard::transform::{
    self, ALL_CATEGORIES, Aggregation, COUNT_COLUMN, CategoryFilter, DateRange, FilterSpec,
};
use chrono::NaiveDate;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, day).expect("valid date")
}

fn attendance() -> Dataset {
    Dataset::new(
        vec!["date".to_owned(), "value".to_owned(), "category".to_owned()],
        vec![
            vec![date(1).into(), 10.0.into(), "League One".into()],
            vec![date(2).into(), 20.0.into(), "League Two".into()],
            vec![date(3).into(), 30.5.into(), "League One".into()],
            vec![date(4).into(), 40.0.into(), "League Two".into()],
            vec![date(5).into(), 50.0.into(), "League One".into()],
        ],
    )
    .expect("valid dataset")
}

fn labels(dataset: &Dataset, column: &str) -> Vec<String> {
    dataset
        .column(column)
        .expect("column")
        .map(ToString::to_string)
        .collect()
}

#[test]
fn range_filter_is_inclusive_on_both_ends() {
    let filtered = transform::filter_range(&attendance(), "date", DateRange::new(date(2), date(4)))
        .expect("filter");
    assert_eq!(labels(&filtered, "date"), ["2023-01-02", "2023-01-03", "2023-01-04"]);

    let single = transform::filter_range(&attendance(), "date", DateRange::new(date(5), date(5)))
        .expect("filter");
    assert_eq!(single.len(), 1);
}

#[test]
fn reversed_range_yields_empty_dataset_with_columns() {
    let filtered = transform::filter_range(&attendance(), "date", DateRange::new(date(4), date(2)))
        .expect("reversed range is not an error");
    assert!(filtered.is_empty());
    assert_eq!(filtered.columns(), attendance().columns());
}

#[test]
fn range_outside_data_yields_empty_dataset() {
    let range = DateRange::new(
        NaiveDate::from_ymd_opt(2030, 1, 1).expect("valid date"),
        NaiveDate::from_ymd_opt(2030, 2, 1).expect("valid date"),
    );
    let filtered = transform::filter_range(&attendance(), "date", range).expect("filter");
    assert!(filtered.is_empty());
}

#[test]
fn category_filter_and_all_sentinel() {
    assert_eq!(CategoryFilter::from_selection("category", ALL_CATEGORIES), None);

    let filter = CategoryFilter::from_selection("category", "League Two").expect("filter");
    let filtered = transform::filter_category(&attendance(), &filter).expect("filter");
    assert_eq!(labels(&filtered, "value"), ["20", "40"]);

    let nothing = CategoryFilter::from_selection("category", "Premier").expect("filter");
    assert!(
        transform::filter_category(&attendance(), &nothing)
            .expect("filter")
            .is_empty()
    );
}

#[test]
fn sum_and_count_per_category() {
    let sums =
        transform::aggregate(&attendance(), &Aggregation::sum("category", "value")).expect("sum");
    assert_eq!(sums.columns(), ["category", "value"]);
    assert_eq!(labels(&sums, "category"), ["League One", "League Two"]);
    let totals = sums.numeric_column("value").expect("totals");
    assert_relative_eq!(totals[0], 90.5);
    assert_relative_eq!(totals[1], 60.0);

    let counts = transform::aggregate(&attendance(), &Aggregation::count("category")).expect("count");
    assert_eq!(counts.columns(), ["category", COUNT_COLUMN]);
    assert_eq!(counts.numeric_column(COUNT_COLUMN).expect("counts"), [3.0, 2.0]);
}

#[test]
fn aggregating_empty_dataset_yields_empty_dataset() {
    let empty = Dataset::empty(attendance().columns().to_vec());
    let counts = transform::aggregate(&empty, &Aggregation::count("category")).expect("count");
    assert!(counts.is_empty());
    assert_eq!(counts.columns(), ["category", COUNT_COLUMN]);
}

#[test]
fn sum_of_labels_is_invalid_data() {
    let result = transform::aggregate(&attendance(), &Aggregation::sum("value", "category"));
    assert!(matches!(result, Err(DashboardError::InvalidData(_))));
}

#[test]
fn pipeline_runs_range_then_category_then_aggregation() {
    let spec = FilterSpec::new("date")
        .with_range(DateRange::new(date(2), date(5)))
        .with_category(CategoryFilter::from_selection("category", "League One"))
        .with_aggregation(Some(Aggregation::sum("category", "value")));

    let derived = transform::apply(&attendance(), &spec).expect("apply");
    assert_eq!(derived.len(), 1);
    let row = derived.row(0).expect("one group");
    assert_eq!(row.get("category"), Some(&CellValue::category("League One")));
    assert_relative_eq!(
        row.get("value").and_then(CellValue::as_f64).expect("total"),
        80.5
    );
}

#[test]
fn missing_fields_are_reported() {
    let spec = FilterSpec::new("day").with_range(DateRange::new(date(1), date(2)));
    assert_eq!(
        transform::apply(&attendance(), &spec),
        Err(DashboardError::MissingField("day".to_owned()))
    );

    let reversed = FilterSpec::new("day").with_range(DateRange::new(date(2), date(1)));
    assert!(matches!(
        transform::apply(&attendance(), &reversed),
        Err(DashboardError::MissingField(_))
    ));

    let no_group = transform::aggregate(&attendance(), &Aggregation::count("team"));
    assert!(matches!(no_group, Err(DashboardError::MissingField(field)) if field == "team"));
}

#[test]
fn unfiltered_spec_returns_dataset_unchanged() {
    let derived = transform::apply(&attendance(), &FilterSpec::new("date")).expect("apply");
    assert_eq!(derived, attendance());
}
