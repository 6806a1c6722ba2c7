use std::collections::HashSet;

use crate::graph::{GraphModel, Palette, Visual};

const SELECTED_SCALE: f32 = 1.5;
const DEPENDENCY_SCALE: f32 = 1.2;
const DEPENDENT_SCALE: f32 = 1.1;
const INCIDENT_EDGE_SCALE: f32 = 2.5;
const OTHER_EDGE_SCALE: f32 = 0.5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub node: usize,
    pub dependencies: Vec<usize>,
    pub dependents: Vec<usize>,
    pub connected: HashSet<usize>,
}

pub(super) fn plan_selection(graph: &GraphModel, node: usize) -> Selection {
    let dependencies = graph.out_neighbors(node).to_vec();
    let dependents = graph.in_neighbors(node).to_vec();

    let mut connected = HashSet::with_capacity(1 + dependencies.len() + dependents.len());
    connected.insert(node);
    connected.extend(dependencies.iter().copied());
    connected.extend(dependents.iter().copied());

    Selection {
        node,
        dependencies,
        dependents,
        connected,
    }
}

/// A node that is both a dependency and a dependent is drawn as a dependency.
pub(super) fn apply_selection(graph: &mut GraphModel, palette: &Palette, selection: &Selection) {
    let dependencies = selection.dependencies.iter().copied().collect::<HashSet<_>>();
    let dependents = selection.dependents.iter().copied().collect::<HashSet<_>>();

    for index in 0..graph.node_count() {
        let Some(original) = graph.node(index).map(|node| node.original()) else {
            continue;
        };

        let visual = if index == selection.node {
            Visual::shown(palette.highlight, original.size * SELECTED_SCALE)
        } else if dependencies.contains(&index) {
            Visual::shown(palette.path, original.size * DEPENDENCY_SCALE)
        } else if dependents.contains(&index) {
            Visual::shown(palette.highlight, original.size * DEPENDENT_SCALE)
        } else {
            Visual::shown(palette.dimmed, original.size)
        };
        graph.set_node_visual(index, visual);
    }

    for index in 0..graph.edge_count() {
        let Some((source, target, original)) = graph
            .edge(index)
            .map(|edge| (edge.source(), edge.target(), edge.original()))
        else {
            continue;
        };

        let visual = if source == selection.node {
            Visual::shown(palette.path, original.size * INCIDENT_EDGE_SCALE)
        } else if target == selection.node {
            Visual::shown(palette.highlight, original.size * INCIDENT_EDGE_SCALE)
        } else {
            Visual::shown(palette.dimmed_edge, original.size * OTHER_EDGE_SCALE)
        };
        graph.set_edge_visual(index, visual);
    }
}
