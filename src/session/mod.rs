//! Interaction state over one shared [`GraphModel`].
//!
//! Every mode switch goes through `Session::enter`: the new mode is fully
//! validated first, then the previous mode is torn down (attributes restored,
//! animation cancelled) and the new one applied. A rejected switch leaves
//! the session untouched.

mod cycles;
mod filter;
mod report;
mod select;

use std::collections::HashSet;

use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, warn};

use crate::error::EngineError;
use crate::graph::{BuildSummary, GraphModel, Palette};
use crate::input::GraphInput;
use crate::layout::{LayoutConfig, LayoutProgress, LayoutRun, LayoutStrategy};
use crate::scenario::{CycleScenario, ScenarioCatalog};
use crate::wave::{FrameHandle, WaveConfig, WaveSegment, WaveSystem};

pub use cycles::{CyclePlan, NodeClass, classify_nodes};
pub use filter::FilterPlan;
pub use report::{GraphStats, Mode, NodeDetails};
pub use select::Selection;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    NodeSelected(Selection),
    SubgraphFiltered(FilterPlan),
    CycleHighlighted(CyclePlan),
}

impl InteractionState {
    pub fn mode(&self) -> Mode {
        match self {
            Self::Idle => Mode::Idle,
            Self::NodeSelected(_) => Mode::NodeSelected,
            Self::SubgraphFiltered(_) => Mode::SubgraphFiltered,
            Self::CycleHighlighted(_) => Mode::CycleHighlighted,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterSummary {
    pub packages: usize,
    pub edges: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CycleSummary {
    pub scenario: String,
    pub cycles: usize,
    pub packages: usize,
    pub edges: usize,
}

pub struct Session {
    graph: GraphModel,
    palette: Palette,
    catalog: ScenarioCatalog,
    wave_config: WaveConfig,
    state: InteractionState,
    waves: Option<WaveSystem>,
}

impl Session {
    pub fn new(graph: GraphModel, palette: Palette) -> Self {
        Self {
            graph,
            palette,
            catalog: ScenarioCatalog::default(),
            wave_config: WaveConfig::default(),
            state: InteractionState::Idle,
            waves: None,
        }
    }

    pub fn from_input(
        input: &GraphInput,
        palette: Palette,
    ) -> Result<(Self, BuildSummary), EngineError> {
        let (graph, summary) = GraphModel::from_input(input, &palette)?;
        Ok((Self::new(graph, palette), summary))
    }

    pub fn with_catalog(mut self, catalog: ScenarioCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_wave_config(mut self, config: WaveConfig) -> Self {
        self.wave_config = config;
        self
    }

    pub fn graph(&self) -> &GraphModel {
        &self.graph
    }

    pub fn catalog(&self) -> &ScenarioCatalog {
        &self.catalog
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    pub fn start_layout(
        &mut self,
        strategy: LayoutStrategy,
        config: LayoutConfig,
        seed: Option<u64>,
    ) -> LayoutRun<StdRng> {
        match seed {
            Some(seed) => LayoutRun::seeded(&mut self.graph, strategy, config, seed),
            None => LayoutRun::from_entropy(&mut self.graph, strategy, config),
        }
    }

    pub fn step_layout<R: Rng>(&mut self, run: &mut LayoutRun<R>) -> LayoutProgress {
        run.step_batch(&mut self.graph)
    }

    /// Highlights `id` and its direct neighbours. Ignored for unknown ids and
    /// while a subgraph or cycle view restricts visibility.
    pub fn select_node(&mut self, id: &str) -> Option<&Selection> {
        if matches!(
            self.state,
            InteractionState::SubgraphFiltered(_) | InteractionState::CycleHighlighted(_)
        ) {
            debug!(id, mode = %self.mode(), "selection suppressed");
            return None;
        }

        let index = self.graph.index_of(id)?;
        let selection = select::plan_selection(&self.graph, index);
        self.enter(InteractionState::NodeSelected(selection));

        match &self.state {
            InteractionState::NodeSelected(selection) => Some(selection),
            _ => None,
        }
    }

    pub fn clear_selection(&mut self) {
        if matches!(self.state, InteractionState::NodeSelected(_)) {
            self.teardown();
        }
    }

    /// Shows only the seeds plus their one-hop neighbourhood.
    pub fn apply_filter<S: AsRef<str>>(
        &mut self,
        seeds: &[S],
    ) -> Result<FilterSummary, EngineError> {
        let plan = filter::plan_filter(&self.graph, seeds).inspect_err(|error| {
            warn!(%error, "subgraph filter rejected");
        })?;
        let summary = FilterSummary {
            packages: plan.expanded.len(),
            edges: plan.edges.len(),
        };
        self.enter(InteractionState::SubgraphFiltered(plan));
        Ok(summary)
    }

    pub fn clear_filter(&mut self) {
        if matches!(self.state, InteractionState::SubgraphFiltered(_)) {
            self.teardown();
        }
    }

    /// Looks up the scenario whose queried packages equal `query` and
    /// highlights all of its cycles.
    pub fn detect_cycles<S: AsRef<str>>(
        &mut self,
        query: &[S],
    ) -> Result<CycleSummary, EngineError> {
        let plan = cycles::plan_detection(&self.graph, &self.catalog, query).inspect_err(|error| {
            warn!(%error, "cycle detection rejected");
        })?;
        self.enter(InteractionState::CycleHighlighted(plan));
        self.cycle_summary().ok_or(EngineError::CycleModeInactive)
    }

    /// Flips one cycle's visibility and returns whether it is now shown.
    pub fn toggle_cycle(&mut self, cycle_id: &str) -> Result<bool, EngineError> {
        let InteractionState::CycleHighlighted(plan) = &self.state else {
            return Err(EngineError::CycleModeInactive);
        };
        let scenario = self
            .catalog
            .get(plan.scenario)
            .ok_or(EngineError::CycleModeInactive)?;
        let cycle = scenario
            .cycle_index(cycle_id)
            .ok_or_else(|| EngineError::UnknownCycle(cycle_id.to_owned()))?;

        let mut next = plan.clone();
        next.visible[cycle] = !next.visible[cycle];
        let shown = next.visible[cycle];
        self.enter(InteractionState::CycleHighlighted(next));
        Ok(shown)
    }

    pub fn clear_cycles(&mut self) {
        if matches!(self.state, InteractionState::CycleHighlighted(_)) {
            self.teardown();
        }
    }

    pub fn reset(&mut self) {
        self.teardown();
    }

    /// Advances the cycle animation to `now_secs`; true while the host
    /// should keep requesting frames.
    pub fn frame(&mut self, now_secs: f64) -> bool {
        self.waves
            .as_mut()
            .is_some_and(|waves| waves.tick(now_secs))
    }

    pub fn wave_segments(&self) -> Vec<WaveSegment> {
        self.waves
            .as_ref()
            .map(|waves| waves.segments(&self.graph))
            .unwrap_or_default()
    }

    pub fn wave_system(&self) -> Option<&WaveSystem> {
        self.waves.as_ref()
    }

    pub fn frame_handle(&self) -> Option<FrameHandle> {
        self.waves.as_ref().map(WaveSystem::handle)
    }

    pub fn active_scenario(&self) -> Option<&CycleScenario> {
        match &self.state {
            InteractionState::CycleHighlighted(plan) => self.catalog.get(plan.scenario),
            _ => None,
        }
    }

    pub fn cycle_visibility(&self) -> Vec<(&str, bool)> {
        let InteractionState::CycleHighlighted(plan) = &self.state else {
            return Vec::new();
        };
        let Some(scenario) = self.catalog.get(plan.scenario) else {
            return Vec::new();
        };
        scenario
            .cycles
            .iter()
            .zip(&plan.visible)
            .map(|(cycle, &shown)| (cycle.id.as_str(), shown))
            .collect()
    }

    /// Nodes to highlight in side lists: the selection neighbourhood or the
    /// filtered subgraph. Empty in the other modes.
    pub fn connected(&self) -> HashSet<usize> {
        match &self.state {
            InteractionState::NodeSelected(selection) => selection.connected.clone(),
            InteractionState::SubgraphFiltered(plan) => plan.expanded.clone(),
            _ => HashSet::new(),
        }
    }

    pub fn connected_ids(&self) -> Vec<&str> {
        let mut ids = self
            .connected()
            .into_iter()
            .filter_map(|index| self.graph.id_of(index))
            .collect::<Vec<_>>();
        ids.sort_unstable();
        ids
    }

    pub fn node_details(&self, id: &str) -> Option<NodeDetails> {
        report::node_details(&self.graph, id)
    }

    pub fn stats(&self) -> GraphStats {
        let shown_cycles = match &self.state {
            InteractionState::CycleHighlighted(plan) => {
                plan.visible.iter().filter(|shown| **shown).count()
            }
            _ => 0,
        };
        report::graph_stats(&self.graph, self.mode(), shown_cycles)
    }

    pub fn known_queries(&self) -> Vec<String> {
        self.catalog.known_queries()
    }

    pub fn suggest_packages(&self, query: &str, limit: usize) -> Vec<String> {
        report::suggest_packages(&self.graph, query, limit)
    }

    fn cycle_summary(&self) -> Option<CycleSummary> {
        let scenario = self.active_scenario()?;
        let stats = self.stats();
        Some(CycleSummary {
            scenario: scenario.id.clone(),
            cycles: stats.shown_cycles,
            packages: stats.shown_packages,
            edges: stats.shown_edges,
        })
    }

    /// The only place attributes change mode: restore, then apply `next`.
    fn enter(&mut self, next: InteractionState) {
        let previous = self.mode();
        self.teardown();

        match &next {
            InteractionState::Idle => {}
            InteractionState::NodeSelected(selection) => {
                select::apply_selection(&mut self.graph, &self.palette, selection);
            }
            InteractionState::SubgraphFiltered(plan) => {
                filter::apply_filter(&mut self.graph, &self.palette, plan);
            }
            InteractionState::CycleHighlighted(plan) => {
                if let Some(scenario) = self.catalog.get(plan.scenario) {
                    cycles::apply_cycles(&mut self.graph, &self.palette, scenario, &plan.visible);
                    self.waves = Some(WaveSystem::initialize(
                        &self.graph,
                        scenario,
                        &plan.visible,
                        self.wave_config,
                    ));
                }
            }
        }

        self.state = next;
        debug!(from = %previous, to = %self.mode(), "interaction mode changed");
    }

    fn teardown(&mut self) {
        if let Some(mut waves) = self.waves.take() {
            waves.stop();
        }
        self.graph.restore_all();
        self.state = InteractionState::Idle;
    }
}
