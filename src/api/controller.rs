use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::chart::{ChartSpec, ChartSpecBuilder};
use crate::core::{Dataset, DatasetFields};
use crate::data::DataProvider;
use crate::error::DashboardResult;
use crate::transform;

use super::{
    ChartSlot, DashboardLayout, InputEvent, InputName, InputState, OutputSet, SlotContent,
    SlotDefinition, SlotOutput, StatusSlot,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CycleState {
    Idle,
    Recomputing,
}

/// Read-only inputs of one slot evaluation.
///
/// Everything a slot sees comes from the snapshot taken when the cycle
/// started, so slot results never depend on event history.
struct CycleContext<'a> {
    inputs: &'a InputState,
    fields: &'a DatasetFields,
    builder: ChartSpecBuilder,
    dataset: &'a DashboardResult<Arc<Dataset>>,
}

/// Reactive input → output engine.
///
/// Each event is merged into [`InputState`] and recomputed synchronously;
/// `&mut self` serializes cycles, so no two ever overlap.
pub struct ReactiveController<P> {
    provider: P,
    layout: DashboardLayout,
    fields: DatasetFields,
    builder: ChartSpecBuilder,
    inputs: InputState,
    outputs: OutputSet,
    state: CycleState,
    cycles: u64,
    /// Set while published slots may hold a fetch failure; the next cycle
    /// then recomputes every slot instead of only the affected ones.
    fetch_failed: bool,
}

impl<P: DataProvider> ReactiveController<P> {
    /// Builds the controller and runs the initial full recompute.
    pub fn new(
        provider: P,
        layout: DashboardLayout,
        fields: DatasetFields,
        builder: ChartSpecBuilder,
        defaults: InputState,
    ) -> Self {
        let mut controller = Self {
            provider,
            layout,
            fields,
            builder,
            inputs: defaults,
            outputs: OutputSet::default(),
            state: CycleState::Idle,
            cycles: 0,
            fetch_failed: false,
        };
        controller.run_cycle(None);
        controller
    }

    /// Applies one input event and returns the newly published outputs.
    ///
    /// Resubmitting the current value still recomputes.
    pub fn handle(&mut self, event: InputEvent) -> &OutputSet {
        let changed = self.inputs.apply(event);
        self.run_cycle(Some(changed));
        &self.outputs
    }

    /// Recomputes every slot from the current inputs.
    pub fn recompute_all(&mut self) -> &OutputSet {
        self.run_cycle(None);
        &self.outputs
    }

    #[must_use]
    pub fn outputs(&self) -> &OutputSet {
        &self.outputs
    }

    #[must_use]
    pub fn inputs(&self) -> &InputState {
        &self.inputs
    }

    #[must_use]
    pub fn layout(&self) -> &DashboardLayout {
        &self.layout
    }

    #[must_use]
    pub fn state(&self) -> CycleState {
        self.state
    }

    /// Number of completed recompute cycles, the initial one included.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn run_cycle(&mut self, changed: Option<InputName>) {
        debug_assert_eq!(self.state, CycleState::Idle);
        self.state = CycleState::Recomputing;

        let snapshot = self.inputs.clone();
        let affected: SmallVec<[usize; 8]> = match changed {
            Some(input) if !self.fetch_failed => self.layout.affected_by(input),
            _ => (0..self.layout.len()).collect(),
        };
        debug!(
            cycle = self.cycles + 1,
            changed = changed.map(InputName::as_str),
            affected = affected.len(),
            "recompute cycle started"
        );

        if !affected.is_empty() {
            let dataset = self.provider.fetch(snapshot.dataset_key());
            if let Err(err) = &dataset {
                warn!(key = snapshot.dataset_key(), error = %err, "dataset fetch failed");
            }
            self.fetch_failed = dataset.is_err();
            let context = CycleContext {
                inputs: &snapshot,
                fields: &self.fields,
                builder: self.builder,
                dataset: &dataset,
            };

            let evaluated = evaluate_slots(&context, self.layout.slots(), &affected);
            let mut next = self.outputs.clone();
            for (index, output) in evaluated {
                next.insert(self.layout.slots()[index].id.clone(), output);
            }
            self.outputs = next;
        }

        self.cycles += 1;
        self.state = CycleState::Idle;
        trace!(cycle = self.cycles, "recompute cycle finished");
    }
}

#[cfg(not(feature = "parallel-recompute"))]
fn evaluate_slots(
    context: &CycleContext<'_>,
    slots: &[SlotDefinition],
    affected: &[usize],
) -> Vec<(usize, SlotOutput)> {
    affected
        .iter()
        .map(|&index| (index, evaluate_slot(context, &slots[index])))
        .collect()
}

#[cfg(feature = "parallel-recompute")]
fn evaluate_slots(
    context: &CycleContext<'_>,
    slots: &[SlotDefinition],
    affected: &[usize],
) -> Vec<(usize, SlotOutput)> {
    use rayon::prelude::*;

    affected
        .par_iter()
        .map(|&index| (index, evaluate_slot(context, &slots[index])))
        .collect()
}

/// Evaluates one slot, turning any failure into a slot-local placeholder.
fn evaluate_slot(context: &CycleContext<'_>, slot: &SlotDefinition) -> SlotOutput {
    match &slot.content {
        SlotContent::Chart(chart) => {
            let title = chart_title(slot, chart, context.inputs);
            match build_chart(context, chart, &title) {
                Ok(spec) => SlotOutput::Chart(spec),
                Err(err) => {
                    warn!(slot = %slot.id, error = %err, "slot recompute failed");
                    SlotOutput::Chart(ChartSpec::error(title, err.to_string()))
                }
            }
        }
        SlotContent::Status(status) => SlotOutput::Status(status_text(context, *status)),
    }
}

fn build_chart(
    context: &CycleContext<'_>,
    chart: &ChartSlot,
    title: &str,
) -> DashboardResult<ChartSpec> {
    let dataset = context.dataset.as_ref().map_err(|err| err.clone())?;
    let filter = context
        .inputs
        .filter_spec(context.fields, chart.scope, chart.aggregation.clone());
    let derived = transform::apply(dataset, &filter)?;

    let mut mapping = chart.fields.clone();
    if chart.split_by_category && context.inputs.is_all_categories() {
        mapping.color = Some(context.fields.category.clone());
    }

    context.builder.build(
        &derived,
        chart.kind.resolve(context.inputs),
        &mapping,
        title,
    )
}

fn chart_title(slot: &SlotDefinition, chart: &ChartSlot, inputs: &InputState) -> String {
    if chart.scope.category && !inputs.is_all_categories() {
        format!("{} - {}", slot.title, inputs.category())
    } else {
        slot.title.clone()
    }
}

fn status_text(context: &CycleContext<'_>, status: StatusSlot) -> String {
    let inputs = context.inputs;
    let dataset = match context.dataset {
        Ok(dataset) => dataset,
        Err(err) => return format!("Error: {err}"),
    };
    let filter = inputs.filter_spec(context.fields, status.scope, None);
    let rows = match transform::apply(dataset, &filter) {
        Ok(rows) => rows,
        Err(err) => return format!("Error: {err}"),
    };

    let mut text = format!("Showing {} points for {}", rows.len(), inputs.dataset_key());
    if status.scope.range {
        text.push_str(&format!(
            " from {} to {}",
            inputs.range_start(),
            inputs.range_end()
        ));
    }
    if status.scope.category && !inputs.is_all_categories() {
        text.push_str(&format!(" in {}", inputs.category()));
    }
    text
}
