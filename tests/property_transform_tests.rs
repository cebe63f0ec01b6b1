use chart_dashboard::core::{CellValue, Dataset};
use chart_dashboard::transform::{self, Aggregation, CategoryFilter, DateRange, FilterSpec};
use chrono::{Days, NaiveDate};
use proptest::prelude::*;

const CATEGORIES: [&str; 3] = ["North", "South", "East"];

fn day(offset: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1)
        .and_then(|start| start.checked_add_days(Days::new(offset)))
        .expect("valid date")
}

fn dataset(rows: &[(u64, f64, usize)]) -> Dataset {
    Dataset::new(
        vec!["date".to_owned(), "value".to_owned(), "category".to_owned()],
        rows.iter()
            .map(|&(offset, value, category)| {
                vec![
                    CellValue::Date(day(offset)),
                    CellValue::number(value),
                    CellValue::category(CATEGORIES[category]),
                ]
            })
            .collect(),
    )
    .expect("valid dataset")
}

fn rows_strategy() -> impl Strategy<Value = Vec<(u64, f64, usize)>> {
    prop::collection::vec((0u64..90, 0.0f64..10_000.0, 0usize..3), 0..64)
}

proptest! {
    #[test]
    fn range_filter_keeps_exactly_the_rows_in_range(
        rows in rows_strategy(),
        start in 0u64..90,
        end in 0u64..90
    ) {
        let data = dataset(&rows);
        let range = DateRange::new(day(start), day(end));
        let filtered = transform::filter_range(&data, "date", range).expect("filter");

        let expected = rows.iter().filter(|(offset, _, _)| range.contains(day(*offset))).count();
        prop_assert_eq!(filtered.len(), expected);
        prop_assert_eq!(filtered.columns(), data.columns());
        if start > end {
            prop_assert!(filtered.is_empty());
        }
    }

    #[test]
    fn category_filter_keeps_only_matching_rows(rows in rows_strategy(), pick in 0usize..3) {
        let data = dataset(&rows);
        let filter = CategoryFilter::from_selection("category", CATEGORIES[pick])
            .expect("named category filters");
        let filtered = transform::filter_category(&data, &filter).expect("filter");

        prop_assert_eq!(
            filtered.len(),
            rows.iter().filter(|(_, _, category)| *category == pick).count()
        );
        for value in filtered.column("category").expect("category column") {
            prop_assert_eq!(value.as_category(), Some(CATEGORIES[pick]));
        }
    }

    #[test]
    fn count_aggregation_partitions_every_row(rows in rows_strategy()) {
        let data = dataset(&rows);
        let counts = transform::aggregate(&data, &Aggregation::count("category")).expect("aggregate");

        let total: f64 = counts.numeric_column("count").expect("counts").iter().sum();
        prop_assert_eq!(total as usize, rows.len());
        let distinct = (0..3).filter(|pick| rows.iter().any(|row| row.2 == *pick)).count();
        prop_assert_eq!(counts.len(), distinct);
    }

    #[test]
    fn sum_aggregation_preserves_the_total(rows in rows_strategy()) {
        let data = dataset(&rows);
        let sums = transform::aggregate(&data, &Aggregation::sum("category", "value").sorted())
            .expect("aggregate");

        let expected: f64 = rows.iter().map(|row| row.1).sum();
        let total: f64 = sums.numeric_column("value").expect("sums").iter().sum();
        prop_assert!((total - expected).abs() <= 1e-6 * expected.max(1.0));

        let labels: Vec<&str> = sums
            .column("category")
            .expect("labels")
            .filter_map(CellValue::as_category)
            .collect();
        let mut sorted = labels.clone();
        sorted.sort_unstable();
        prop_assert_eq!(labels, sorted);
    }

    #[test]
    fn apply_is_pure(rows in rows_strategy(), start in 0u64..90, end in 0u64..90) {
        let data = dataset(&rows);
        let spec = FilterSpec::new("date")
            .with_range(DateRange::new(day(start), day(end)))
            .with_category(CategoryFilter::from_selection("category", "All"))
            .with_aggregation(Some(Aggregation::count("category")));

        let first = transform::apply(&data, &spec).expect("apply");
        let second = transform::apply(&data, &spec).expect("apply");
        prop_assert_eq!(first, second);
    }
}
