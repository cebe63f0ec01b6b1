use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::DatasetFields;
use crate::transform::{ALL_CATEGORIES, Aggregation, CategoryFilter, DateRange, FilterSpec};

/// Recognized user-controllable inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputName {
    DatasetKey,
    RangeStart,
    RangeEnd,
    ChartKind,
    Category,
}

impl InputName {
    pub const ALL: [Self; 5] = [
        Self::DatasetKey,
        Self::RangeStart,
        Self::RangeEnd,
        Self::ChartKind,
        Self::Category,
    ];

    const fn bit(self) -> u8 {
        match self {
            Self::DatasetKey => 1 << 0,
            Self::RangeStart => 1 << 1,
            Self::RangeEnd => 1 << 2,
            Self::ChartKind => 1 << 3,
            Self::Category => 1 << 4,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DatasetKey => "dataset_key",
            Self::RangeStart => "range_start",
            Self::RangeEnd => "range_end",
            Self::ChartKind => "chart_kind",
            Self::Category => "category",
        }
    }
}

impl fmt::Display for InputName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bitmask of inputs, used as a slot's declared dependency set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<InputName>", into = "Vec<InputName>")]
pub struct InputSet {
    bits: u8,
}

impl InputSet {
    const ALL_BITS: u8 = InputName::DatasetKey.bit()
        | InputName::RangeStart.bit()
        | InputName::RangeEnd.bit()
        | InputName::ChartKind.bit()
        | InputName::Category.bit();

    #[must_use]
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    #[must_use]
    pub const fn all() -> Self {
        Self {
            bits: Self::ALL_BITS,
        }
    }

    #[must_use]
    pub const fn from_input(input: InputName) -> Self {
        Self { bits: input.bit() }
    }

    #[must_use]
    pub const fn with_input(self, input: InputName) -> Self {
        Self {
            bits: self.bits | input.bit(),
        }
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        (self.bits & other.bits) != 0
    }

    #[must_use]
    pub const fn contains(self, input: InputName) -> bool {
        self.intersects(Self::from_input(input))
    }

    #[must_use]
    pub const fn is_superset_of(self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.bits == 0
    }

    pub fn iter(self) -> impl Iterator<Item = InputName> {
        InputName::ALL
            .into_iter()
            .filter(move |input| self.contains(*input))
    }
}

impl From<Vec<InputName>> for InputSet {
    fn from(inputs: Vec<InputName>) -> Self {
        inputs
            .into_iter()
            .fold(Self::none(), |set, input| set.with_input(input))
    }
}

impl From<InputSet> for Vec<InputName> {
    fn from(set: InputSet) -> Self {
        set.iter().collect()
    }
}

impl FromIterator<InputName> for InputSet {
    fn from_iter<T: IntoIterator<Item = InputName>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::none(), |set, input| set.with_input(input))
    }
}

/// One user interaction: a single input and its new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "input", content = "value", rename_all = "snake_case")]
pub enum InputEvent {
    DatasetKey(String),
    RangeStart(NaiveDate),
    RangeEnd(NaiveDate),
    ChartKind(String),
    Category(String),
}

impl InputEvent {
    #[must_use]
    pub fn input(&self) -> InputName {
        match self {
            Self::DatasetKey(_) => InputName::DatasetKey,
            Self::RangeStart(_) => InputName::RangeStart,
            Self::RangeEnd(_) => InputName::RangeEnd,
            Self::ChartKind(_) => InputName::ChartKind,
            Self::Category(_) => InputName::Category,
        }
    }
}

/// Current value of every recognized input.
///
/// Values change only through [`InputState::apply`], one field per event.
/// The chart kind stays a raw string: an unrecognized kind is a slot-level
/// failure at build time, not an input error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    #[serde(default = "default_dataset_key")]
    dataset_key: String,
    #[serde(default = "default_range_start")]
    range_start: NaiveDate,
    #[serde(default = "default_range_end")]
    range_end: NaiveDate,
    #[serde(default = "default_chart_kind")]
    chart_kind: String,
    #[serde(default = "default_category")]
    category: String,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            dataset_key: default_dataset_key(),
            range_start: default_range_start(),
            range_end: default_range_end(),
            chart_kind: default_chart_kind(),
            category: default_category(),
        }
    }
}

impl InputState {
    #[must_use]
    pub fn new(
        dataset_key: impl Into<String>,
        range_start: NaiveDate,
        range_end: NaiveDate,
        chart_kind: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            dataset_key: dataset_key.into(),
            range_start,
            range_end,
            chart_kind: chart_kind.into(),
            category: category.into(),
        }
    }

    /// Merges one event and reports which input it touched.
    pub fn apply(&mut self, event: InputEvent) -> InputName {
        let input = event.input();
        match event {
            InputEvent::DatasetKey(value) => self.dataset_key = value,
            InputEvent::RangeStart(value) => self.range_start = value,
            InputEvent::RangeEnd(value) => self.range_end = value,
            InputEvent::ChartKind(value) => self.chart_kind = value,
            InputEvent::Category(value) => self.category = value,
        }
        input
    }

    #[must_use]
    pub fn dataset_key(&self) -> &str {
        &self.dataset_key
    }

    #[must_use]
    pub fn range_start(&self) -> NaiveDate {
        self.range_start
    }

    #[must_use]
    pub fn range_end(&self) -> NaiveDate {
        self.range_end
    }

    #[must_use]
    pub fn chart_kind(&self) -> &str {
        &self.chart_kind
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn date_range(&self) -> DateRange {
        DateRange::new(self.range_start, self.range_end)
    }

    #[must_use]
    pub fn is_all_categories(&self) -> bool {
        self.category == ALL_CATEGORIES
    }

    /// Derives the read-only filter view for one slot.
    #[must_use]
    pub fn filter_spec(
        &self,
        fields: &DatasetFields,
        scope: FilterScope,
        aggregation: Option<Aggregation>,
    ) -> FilterSpec {
        let mut spec = FilterSpec::new(fields.date.as_str()).with_aggregation(aggregation);
        if scope.range {
            spec = spec.with_range(self.date_range());
        }
        if scope.category {
            spec = spec.with_category(CategoryFilter::from_selection(
                &fields.category,
                &self.category,
            ));
        }
        spec
    }
}

/// Which input-driven filters a slot applies before aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterScope {
    #[serde(default = "default_true")]
    pub range: bool,
    #[serde(default = "default_true")]
    pub category: bool,
}

impl Default for FilterScope {
    fn default() -> Self {
        Self::all()
    }
}

impl FilterScope {
    #[must_use]
    pub const fn all() -> Self {
        Self {
            range: true,
            category: true,
        }
    }

    #[must_use]
    pub const fn none() -> Self {
        Self {
            range: false,
            category: false,
        }
    }

    /// Inputs the scope reads.
    #[must_use]
    pub const fn inputs(self) -> InputSet {
        let mut set = InputSet::from_input(InputName::DatasetKey);
        if self.range {
            set = set
                .with_input(InputName::RangeStart)
                .with_input(InputName::RangeEnd);
        }
        if self.category {
            set = set.with_input(InputName::Category);
        }
        set
    }
}

fn default_true() -> bool {
    true
}

fn default_dataset_key() -> String {
    "data1".to_owned()
}

fn default_range_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn default_range_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 12, 31).unwrap_or(NaiveDate::MAX)
}

fn default_chart_kind() -> String {
    "line".to_owned()
}

fn default_category() -> String {
    ALL_CATEGORIES.to_owned()
}
