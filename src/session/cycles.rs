use std::collections::{HashMap, HashSet};

use eframe::egui::Color32;

use crate::error::EngineError;
use crate::graph::{GraphModel, Palette, Visual};
use crate::scenario::{CycleScenario, ScenarioCatalog};

const CYCLE_MEMBER_SCALE: f32 = 1.3;
const QUERIED_SCALE: f32 = 1.2;
const INTERMEDIATE_SCALE: f32 = 1.1;
const CYCLE_EDGE_SCALE: f32 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeClass {
    CycleMember(usize),
    Queried,
    Intermediate,
    Hidden,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CyclePlan {
    pub scenario: usize,
    pub visible: Vec<bool>,
}

pub(super) fn plan_detection<S: AsRef<str>>(
    graph: &GraphModel,
    catalog: &ScenarioCatalog,
    query: &[S],
) -> Result<CyclePlan, EngineError> {
    let mut seen = HashSet::new();
    let query = query
        .iter()
        .map(|id| id.as_ref().trim())
        .filter(|id| !id.is_empty() && seen.insert(*id))
        .map(str::to_owned)
        .collect::<Vec<_>>();
    if query.is_empty() {
        return Err(EngineError::EmptyQuery);
    }

    let Some(index) = catalog.find(&query) else {
        return Err(EngineError::NoMatchingScenario {
            query,
            known: catalog.known_queries(),
        });
    };
    let Some(scenario) = catalog.get(index) else {
        return Err(EngineError::NoMatchingScenario {
            query,
            known: catalog.known_queries(),
        });
    };

    let missing = scenario
        .referenced_nodes()
        .into_iter()
        .filter(|id| !graph.contains(id))
        .map(str::to_owned)
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(EngineError::ScenarioValidation {
            scenario: scenario.id.clone(),
            missing,
        });
    }

    Ok(CyclePlan {
        scenario: index,
        visible: vec![true; scenario.cycles.len()],
    })
}

/// Cycle membership wins over being queried, which wins over intermediate.
/// Overlapping cycles resolve to the first visible one in scenario order.
pub fn classify_nodes(
    graph: &GraphModel,
    scenario: &CycleScenario,
    visible: &[bool],
) -> Vec<NodeClass> {
    let mut classes = vec![NodeClass::Hidden; graph.node_count()];

    for id in &scenario.intermediate {
        if let Some(index) = graph.index_of(id) {
            classes[index] = NodeClass::Intermediate;
        }
    }
    for id in &scenario.queried {
        if let Some(index) = graph.index_of(id) {
            classes[index] = NodeClass::Queried;
        }
    }
    for (cycle_index, cycle) in scenario.cycles.iter().enumerate().rev() {
        if !visible.get(cycle_index).copied().unwrap_or(false) {
            continue;
        }
        for id in &cycle.nodes {
            if let Some(index) = graph.index_of(id) {
                classes[index] = NodeClass::CycleMember(cycle_index);
            }
        }
    }

    classes
}

fn visible_edge_colors(
    graph: &GraphModel,
    scenario: &CycleScenario,
    visible: &[bool],
) -> HashMap<usize, Color32> {
    let mut colors = HashMap::new();
    for (cycle_index, cycle) in scenario.cycles.iter().enumerate() {
        if !visible.get(cycle_index).copied().unwrap_or(false) {
            continue;
        }
        for (from, to) in &cycle.edges {
            let (Some(from), Some(to)) = (graph.index_of(from), graph.index_of(to)) else {
                continue;
            };
            if let Some(edge) = graph.edge_between(from, to) {
                colors.entry(edge).or_insert(cycle.color);
            }
        }
    }
    colors
}

pub(super) fn apply_cycles(
    graph: &mut GraphModel,
    palette: &Palette,
    scenario: &CycleScenario,
    visible: &[bool],
) {
    let classes = classify_nodes(graph, scenario, visible);
    for (index, class) in classes.into_iter().enumerate() {
        let Some(original) = graph.node(index).map(|node| node.original()) else {
            continue;
        };
        let visual = match class {
            NodeClass::CycleMember(cycle) => Visual::shown(
                scenario.cycles[cycle].color,
                original.size * CYCLE_MEMBER_SCALE,
            ),
            NodeClass::Queried => Visual::shown(palette.queried, original.size * QUERIED_SCALE),
            NodeClass::Intermediate => {
                Visual::shown(palette.intermediate, original.size * INTERMEDIATE_SCALE)
            }
            NodeClass::Hidden => Visual::hidden(palette.dimmed, original.size),
        };
        graph.set_node_visual(index, visual);
    }

    let edge_colors = visible_edge_colors(graph, scenario, visible);
    for index in 0..graph.edge_count() {
        let Some(original) = graph.edge(index).map(|edge| edge.original()) else {
            continue;
        };
        let visual = match edge_colors.get(&index) {
            Some(&color) => Visual::shown(color, original.size * CYCLE_EDGE_SCALE),
            None => Visual::hidden(original.color, original.size),
        };
        graph.set_edge_visual(index, visual);
    }
}
