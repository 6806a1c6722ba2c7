use std::collections::HashSet;

use eframe::egui::Color32;
use tracing::warn;

use crate::input::{CycleInput, ScenarioCatalogInput, ScenarioInput};
use crate::util::parse_hex_color;

pub const FALLBACK_CYCLE_COLOR: Color32 = Color32::from_rgb(230, 70, 70);

#[derive(Clone, Debug, PartialEq)]
pub struct Cycle {
    pub id: String,
    pub nodes: Vec<String>,
    pub edges: Vec<(String, String)>,
    pub color: Color32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CycleScenario {
    pub id: String,
    pub queried: Vec<String>,
    pub cycles: Vec<Cycle>,
    pub intermediate: Vec<String>,
}

impl CycleScenario {
    /// True when `query` names exactly the queried packages, in any order.
    pub fn matches(&self, query: &HashSet<&str>) -> bool {
        let queried = self.queried.iter().map(String::as_str).collect::<HashSet<_>>();
        queried == *query
    }

    /// Every node id the scenario refers to, first occurrence order.
    pub fn referenced_nodes(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let cycle_ids = self.cycles.iter().flat_map(|cycle| {
            cycle.nodes.iter().map(String::as_str).chain(
                cycle
                    .edges
                    .iter()
                    .flat_map(|(from, to)| [from.as_str(), to.as_str()]),
            )
        });

        self.queried
            .iter()
            .map(String::as_str)
            .chain(self.intermediate.iter().map(String::as_str))
            .chain(cycle_ids)
            .filter(|id| seen.insert(*id))
            .collect()
    }

    pub fn cycle_index(&self, cycle_id: &str) -> Option<usize> {
        self.cycles.iter().position(|cycle| cycle.id == cycle_id)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScenarioCatalog {
    scenarios: Vec<CycleScenario>,
}

impl ScenarioCatalog {
    pub fn new(scenarios: Vec<CycleScenario>) -> Self {
        Self { scenarios }
    }

    pub fn from_input(input: ScenarioCatalogInput) -> Self {
        Self::new(input.scenarios.into_iter().map(convert_scenario).collect())
    }

    pub fn scenarios(&self) -> &[CycleScenario] {
        &self.scenarios
    }

    pub fn get(&self, index: usize) -> Option<&CycleScenario> {
        self.scenarios.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn find(&self, query: &[String]) -> Option<usize> {
        let query = query.iter().map(String::as_str).collect::<HashSet<_>>();
        self.scenarios
            .iter()
            .position(|scenario| scenario.matches(&query))
    }

    /// The queried package lists of every scenario, for "did you mean" hints.
    pub fn known_queries(&self) -> Vec<String> {
        self.scenarios
            .iter()
            .map(|scenario| scenario.queried.join(", "))
            .collect()
    }
}

fn convert_cycle(scenario_id: &str, cycle: CycleInput) -> Cycle {
    let color = parse_hex_color(&cycle.color).unwrap_or_else(|| {
        warn!(
            scenario = scenario_id,
            cycle = cycle.id.as_str(),
            color = cycle.color.as_str(),
            "unparseable cycle color, using fallback"
        );
        FALLBACK_CYCLE_COLOR
    });

    Cycle {
        id: cycle.id,
        nodes: cycle.nodes,
        edges: cycle
            .edges
            .into_iter()
            .map(|edge| (edge.from, edge.to))
            .collect(),
        color,
    }
}

fn convert_scenario(scenario: ScenarioInput) -> CycleScenario {
    let cycles = scenario
        .cycles
        .into_iter()
        .map(|cycle| convert_cycle(&scenario.id, cycle))
        .collect();

    CycleScenario {
        id: scenario.id,
        queried: scenario
            .queried_packages
            .into_iter()
            .map(|id| id.trim().to_owned())
            .filter(|id| !id.is_empty())
            .collect(),
        cycles,
        intermediate: scenario.intermediate_nodes,
    }
}
