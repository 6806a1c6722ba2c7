use tracing::{info, warn};

use crate::error::EngineError;
use crate::input::GraphInput;

use super::{GraphModel, Palette};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub nodes: usize,
    pub edges: usize,
    pub dropped_edges: usize,
}

impl GraphModel {
    /// Builds the model from parsed input. Node ids must be non-empty and
    /// unique; edges naming unknown nodes and repeated pairs are dropped.
    pub fn from_input(
        input: &GraphInput,
        palette: &Palette,
    ) -> Result<(Self, BuildSummary), EngineError> {
        let mut graph = Self::with_capacity(input.nodes.len(), input.edges.len());

        for node in &input.nodes {
            graph.add_node(node.id.as_str(), palette.node_style(node.is_base))?;
        }

        let edge_style = palette.edge_style();
        let mut dropped_edges = 0usize;
        for edge in &input.edges {
            if graph
                .add_edge(&edge.source, &edge.target, edge_style)
                .is_none()
            {
                dropped_edges += 1;
            }
        }

        let summary = BuildSummary {
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            dropped_edges,
        };

        if dropped_edges > 0 {
            warn!(dropped_edges, "skipped unresolvable or duplicate dependencies");
        }
        info!(
            "loaded graph: {} packages, {} dependencies",
            summary.nodes, summary.edges
        );

        Ok((graph, summary))
    }
}
