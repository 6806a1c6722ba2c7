use std::collections::HashSet;

use crate::error::EngineError;
use crate::graph::{GraphModel, Palette, Visual};

const INDUCED_EDGE_SCALE: f32 = 2.0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterPlan {
    pub seeds: Vec<usize>,
    pub expanded: HashSet<usize>,
    pub edges: Vec<usize>,
}

/// Seeds naming unknown packages are ignored; an input with no known package
/// at all is rejected.
pub(super) fn plan_filter<S: AsRef<str>>(
    graph: &GraphModel,
    seeds: &[S],
) -> Result<FilterPlan, EngineError> {
    let mut valid = Vec::new();
    let mut seen = HashSet::new();
    for seed in seeds {
        if let Some(index) = graph.index_of(seed.as_ref().trim())
            && seen.insert(index)
        {
            valid.push(index);
        }
    }

    if valid.is_empty() {
        return Err(EngineError::NoValidPackages {
            requested: seeds
                .iter()
                .map(|seed| seed.as_ref().trim().to_owned())
                .filter(|seed| !seed.is_empty())
                .collect(),
        });
    }

    let mut expanded = HashSet::new();
    for &seed in &valid {
        expanded.insert(seed);
        expanded.extend(graph.out_neighbors(seed).iter().copied());
        expanded.extend(graph.in_neighbors(seed).iter().copied());
    }

    let edges = graph
        .edges()
        .iter()
        .enumerate()
        .filter(|(_, edge)| expanded.contains(&edge.source()) && expanded.contains(&edge.target()))
        .map(|(index, _)| index)
        .collect();

    Ok(FilterPlan {
        seeds: valid,
        expanded,
        edges,
    })
}

pub(super) fn apply_filter(graph: &mut GraphModel, palette: &Palette, plan: &FilterPlan) {
    for index in 0..graph.node_count() {
        let Some(original) = graph.node(index).map(|node| node.original()) else {
            continue;
        };
        let visual = if plan.expanded.contains(&index) {
            Visual::shown(palette.highlight, original.size)
        } else {
            Visual::hidden(original.color, original.size)
        };
        graph.set_node_visual(index, visual);
    }

    let induced = plan.edges.iter().copied().collect::<HashSet<_>>();
    for index in 0..graph.edge_count() {
        let Some(original) = graph.edge(index).map(|edge| edge.original()) else {
            continue;
        };
        let visual = if induced.contains(&index) {
            Visual::shown(palette.highlight, original.size * INDUCED_EDGE_SCALE)
        } else {
            Visual::hidden(original.color, original.size)
        };
        graph.set_edge_visual(index, visual);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> GraphModel {
        let palette = Palette::default();
        let mut graph = GraphModel::new();
        for id in ["a", "b", "c", "d"] {
            graph.add_node(id, palette.node_style(false)).unwrap();
        }
        for (from, to) in [("a", "b"), ("b", "c"), ("c", "d"), ("a", "c")] {
            graph.add_edge(from, to, palette.edge_style());
        }
        graph
    }

    #[test]
    fn expansion_is_one_hop_both_directions() {
        let graph = chain();
        let plan = plan_filter(&graph, &["c"]).unwrap();

        let ids = |set: &HashSet<usize>| {
            let mut ids = set
                .iter()
                .map(|&index| graph.id_of(index).unwrap())
                .collect::<Vec<_>>();
            ids.sort_unstable();
            ids
        };
        assert_eq!(ids(&plan.expanded), vec!["a", "b", "c", "d"]);
        assert_eq!(plan.edges.len(), 4);
    }

    #[test]
    fn induced_edges_need_both_endpoints() {
        let graph = chain();
        let plan = plan_filter(&graph, &["a"]).unwrap();

        // a -> b, a -> c, and b -> c are induced; c -> d is not.
        assert_eq!(plan.expanded.len(), 3);
        assert_eq!(plan.edges.len(), 3);
        for &edge in &plan.edges {
            let edge = graph.edge(edge).unwrap();
            assert!(plan.expanded.contains(&edge.source()));
            assert!(plan.expanded.contains(&edge.target()));
        }
    }

    #[test]
    fn unknown_seeds_are_ignored_but_all_unknown_fails() {
        let graph = chain();
        let plan = plan_filter(&graph, &["nope", " d "]).unwrap();
        assert_eq!(plan.seeds, vec![graph.index_of("d").unwrap()]);

        assert_eq!(
            plan_filter(&graph, &["x", "y"]),
            Err(EngineError::NoValidPackages {
                requested: vec!["x".to_owned(), "y".to_owned()],
            })
        );
        assert!(plan_filter::<&str>(&graph, &[]).is_err());
    }
}
