use std::fmt;

use fuzzy_matcher::skim::SkimMatcherV2;

use crate::graph::GraphModel;
use crate::util::fuzzy_match_score;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Idle,
    NodeSelected,
    SubgraphFiltered,
    CycleHighlighted,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::NodeSelected => "node selected",
            Self::SubgraphFiltered => "subgraph",
            Self::CycleHighlighted => "cycles",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Counts shown next to the graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub mode: Mode,
    pub shown_packages: usize,
    pub shown_edges: usize,
    pub shown_cycles: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeDetails {
    pub id: String,
    pub is_base: bool,
    pub dependencies: Vec<String>,
    pub dependents: Vec<String>,
}

impl NodeDetails {
    pub fn out_degree(&self) -> usize {
        self.dependencies.len()
    }

    pub fn in_degree(&self) -> usize {
        self.dependents.len()
    }
}

fn sorted_ids(graph: &GraphModel, indices: &[usize]) -> Vec<String> {
    let mut ids = indices
        .iter()
        .filter_map(|&index| graph.id_of(index))
        .map(str::to_owned)
        .collect::<Vec<_>>();
    ids.sort_unstable();
    ids
}

pub(super) fn node_details(graph: &GraphModel, id: &str) -> Option<NodeDetails> {
    let index = graph.index_of(id)?;
    let node = graph.node(index)?;
    Some(NodeDetails {
        id: node.id().to_owned(),
        is_base: node.is_base(),
        dependencies: sorted_ids(graph, graph.out_neighbors(index)),
        dependents: sorted_ids(graph, graph.in_neighbors(index)),
    })
}

pub(super) fn graph_stats(graph: &GraphModel, mode: Mode, shown_cycles: usize) -> GraphStats {
    GraphStats {
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        mode,
        shown_packages: graph.nodes().iter().filter(|node| !node.is_hidden()).count(),
        shown_edges: graph.edges().iter().filter(|edge| !edge.is_hidden()).count(),
        shown_cycles,
    }
}

/// Best fuzzy matches for `query` among node ids, best first.
pub(super) fn suggest_packages(graph: &GraphModel, query: &str, limit: usize) -> Vec<String> {
    let query = query.trim();
    if query.is_empty() || limit == 0 {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let mut scored = graph
        .nodes()
        .iter()
        .filter_map(|node| {
            fuzzy_match_score(&matcher, node.id(), query).map(|score| (score, node.id()))
        })
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| a.1.len().cmp(&b.1.len()))
            .then_with(|| a.1.cmp(b.1))
    });
    scored
        .into_iter()
        .take(limit)
        .map(|(_, id)| id.to_owned())
        .collect()
}
