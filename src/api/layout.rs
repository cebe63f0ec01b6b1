use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::chart::FieldMapping;
use crate::core::DatasetFields;
use crate::error::{DashboardError, DashboardResult};
use crate::transform::Aggregation;

use super::{FilterScope, InputName, InputSet, InputState};

/// Name of one published output slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(String);

impl SlotId {
    pub const MAIN: &'static str = "main";
    pub const SUMMARY: &'static str = "summary";
    pub const TOTALS: &'static str = "totals";
    pub const DETAIL_1: &'static str = "detail-1";
    pub const DETAIL_2: &'static str = "detail-2";
    pub const STATUS: &'static str = "status";

    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SlotId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlotId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Where a chart slot takes its kind from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindSource {
    /// The `chart_kind` input.
    Input,
    /// A kind fixed by the layout; still parsed at build time.
    Fixed(String),
}

impl KindSource {
    #[must_use]
    pub fn fixed(kind: impl Into<String>) -> Self {
        Self::Fixed(kind.into())
    }

    #[must_use]
    pub fn resolve<'a>(&'a self, inputs: &'a InputState) -> &'a str {
        match self {
            Self::Input => inputs.chart_kind(),
            Self::Fixed(kind) => kind,
        }
    }

    #[must_use]
    pub fn inputs(&self) -> InputSet {
        match self {
            Self::Input => InputSet::from_input(InputName::ChartKind),
            Self::Fixed(_) => InputSet::none(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSlot {
    pub kind: KindSource,
    pub fields: FieldMapping,
    #[serde(default)]
    pub scope: FilterScope,
    #[serde(default)]
    pub aggregation: Option<Aggregation>,
    /// Colors points by category while every category is shown.
    #[serde(default)]
    pub split_by_category: bool,
}

impl ChartSlot {
    #[must_use]
    pub fn new(kind: KindSource, fields: FieldMapping) -> Self {
        Self {
            kind,
            fields,
            scope: FilterScope::all(),
            aggregation: None,
            split_by_category: false,
        }
    }

    #[must_use]
    pub fn with_scope(mut self, scope: FilterScope) -> Self {
        self.scope = scope;
        self
    }

    #[must_use]
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = Some(aggregation);
        self
    }

    #[must_use]
    pub fn split_by_category(mut self) -> Self {
        self.split_by_category = true;
        self
    }

    fn reads(&self) -> InputSet {
        let mut reads = self.scope.inputs().union(self.kind.inputs());
        if self.split_by_category {
            reads = reads.with_input(InputName::Category);
        }
        reads
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusSlot {
    #[serde(default)]
    pub scope: FilterScope,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlotContent {
    Chart(ChartSlot),
    Status(StatusSlot),
}

impl SlotContent {
    /// Inputs this content reads when evaluated.
    #[must_use]
    pub fn reads(&self) -> InputSet {
        match self {
            Self::Chart(chart) => chart.reads(),
            Self::Status(status) => status.scope.inputs(),
        }
    }
}

/// One output slot and the inputs it is declared to depend on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDefinition {
    pub id: SlotId,
    pub title: String,
    pub content: SlotContent,
    pub depends_on: InputSet,
}

impl SlotDefinition {
    /// Declares exactly the inputs the content reads.
    #[must_use]
    pub fn new(id: impl Into<SlotId>, title: impl Into<String>, content: SlotContent) -> Self {
        let depends_on = content.reads();
        Self {
            id: id.into(),
            title: title.into(),
            content,
            depends_on,
        }
    }

    #[must_use]
    pub fn with_dependencies(mut self, depends_on: InputSet) -> Self {
        self.depends_on = depends_on;
        self
    }
}

/// Ordered slot definitions: the explicit input → output dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardLayout {
    slots: Vec<SlotDefinition>,
}

impl DashboardLayout {
    /// Validates that slot ids are unique and that every slot declares each
    /// input it reads, so skipping an unaffected slot can never publish a
    /// stale value.
    pub fn new(slots: Vec<SlotDefinition>) -> DashboardResult<Self> {
        if slots.is_empty() {
            return Err(DashboardError::InvalidConfig(
                "layout needs at least one slot".to_owned(),
            ));
        }
        for (index, slot) in slots.iter().enumerate() {
            if slot.id.as_str().trim().is_empty() {
                return Err(DashboardError::InvalidConfig(
                    "slot ids must be non-empty".to_owned(),
                ));
            }
            if slots[..index].iter().any(|other| other.id == slot.id) {
                return Err(DashboardError::InvalidConfig(format!(
                    "duplicate slot id `{}`",
                    slot.id
                )));
            }
            let reads = slot.content.reads();
            if !slot.depends_on.is_superset_of(reads) {
                let undeclared: Vec<&str> = reads
                    .iter()
                    .filter(|input| !slot.depends_on.contains(*input))
                    .map(InputName::as_str)
                    .collect();
                return Err(DashboardError::InvalidConfig(format!(
                    "slot `{}` reads undeclared inputs: {}",
                    slot.id,
                    undeclared.join(", ")
                )));
            }
        }
        Ok(Self { slots })
    }

    /// Time series, category breakdowns, distributions and status.
    #[must_use]
    pub fn overview(fields: &DatasetFields) -> Self {
        let over_time = FieldMapping::new(fields.date.as_str(), fields.value.as_str());
        let per_category = FieldMapping::new(fields.category.as_str(), fields.value.as_str());
        Self {
            slots: vec![
                SlotDefinition::new(
                    SlotId::MAIN,
                    "Values over time",
                    SlotContent::Chart(
                        ChartSlot::new(KindSource::Input, over_time).split_by_category(),
                    ),
                ),
                SlotDefinition::new(
                    SlotId::SUMMARY,
                    "Rows per category",
                    SlotContent::Chart(ChartSlot::new(
                        KindSource::fixed("pie"),
                        per_category.clone(),
                    )),
                ),
                SlotDefinition::new(
                    SlotId::TOTALS,
                    "Total value per category",
                    SlotContent::Chart(
                        ChartSlot::new(KindSource::fixed("bar"), per_category.clone())
                            .with_aggregation(Aggregation::sum(
                                fields.category.as_str(),
                                fields.value.as_str(),
                            )),
                    ),
                ),
                SlotDefinition::new(
                    SlotId::DETAIL_1,
                    "Value distribution",
                    SlotContent::Chart(ChartSlot::new(
                        KindSource::fixed("histogram"),
                        per_category.clone(),
                    )),
                ),
                SlotDefinition::new(
                    SlotId::DETAIL_2,
                    "Value spread per category",
                    SlotContent::Chart(ChartSlot::new(KindSource::fixed("box"), per_category)),
                ),
                SlotDefinition::new(
                    SlotId::STATUS,
                    "Status",
                    SlotContent::Status(StatusSlot::default()),
                ),
            ],
        }
    }

    /// One unfiltered bar chart of value per category, plus status.
    #[must_use]
    pub fn single_chart(fields: &DatasetFields) -> Self {
        let per_category = FieldMapping::new(fields.category.as_str(), fields.value.as_str());
        Self {
            slots: vec![
                SlotDefinition::new(
                    SlotId::MAIN,
                    "Value per category",
                    SlotContent::Chart(
                        ChartSlot::new(KindSource::fixed("bar"), per_category)
                            .with_scope(FilterScope::none()),
                    ),
                ),
                SlotDefinition::new(
                    SlotId::STATUS,
                    "Status",
                    SlotContent::Status(StatusSlot {
                        scope: FilterScope::none(),
                    }),
                ),
            ],
        }
    }

    #[must_use]
    pub fn slots(&self) -> &[SlotDefinition] {
        &self.slots
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SlotDefinition> {
        self.slots.iter().find(|slot| slot.id.as_str() == id)
    }

    #[must_use]
    pub fn dependencies(&self, id: &str) -> Option<InputSet> {
        self.get(id).map(|slot| slot.depends_on)
    }

    /// Indexes of the slots whose dependency set contains `input`.
    #[must_use]
    pub fn affected_by(&self, input: InputName) -> SmallVec<[usize; 8]> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.depends_on.contains(input))
            .map(|(index, _)| index)
            .collect()
    }
}
