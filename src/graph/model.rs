use std::collections::HashMap;

use eframe::egui::{Color32, Vec2};

use crate::error::EngineError;

/// Mutable visual attributes of a node or edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Visual {
    pub color: Color32,
    pub size: f32,
    pub hidden: bool,
}

impl Visual {
    pub fn shown(color: Color32, size: f32) -> Self {
        Self {
            color,
            size,
            hidden: false,
        }
    }

    pub fn hidden(color: Color32, size: f32) -> Self {
        Self {
            color,
            size,
            hidden: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeStyle {
    pub is_base: bool,
    pub color: Color32,
    pub size: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStyle {
    pub color: Color32,
    pub size: f32,
}

#[derive(Clone, Debug)]
pub struct Node {
    id: String,
    is_base: bool,
    position: Vec2,
    visual: Visual,
    original: Visual,
}

impl Node {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_base(&self) -> bool {
        self.is_base
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn visual(&self) -> Visual {
        self.visual
    }

    pub fn original(&self) -> Visual {
        self.original
    }

    pub fn color(&self) -> Color32 {
        self.visual.color
    }

    pub fn size(&self) -> f32 {
        self.visual.size
    }

    pub fn is_hidden(&self) -> bool {
        self.visual.hidden
    }
}

/// A directed edge: `source` depends on `target`.
#[derive(Clone, Debug)]
pub struct Edge {
    source: usize,
    target: usize,
    visual: Visual,
    original: Visual,
}

impl Edge {
    pub fn source(&self) -> usize {
        self.source
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn visual(&self) -> Visual {
        self.visual
    }

    pub fn original(&self) -> Visual {
        self.original
    }

    pub fn is_hidden(&self) -> bool {
        self.visual.hidden
    }
}

/// Directed dependency graph with per-node and per-edge visual attributes.
///
/// Nodes are addressed by insertion index; indices stay valid for the
/// lifetime of the model since nothing is ever removed.
#[derive(Clone, Debug, Default)]
pub struct GraphModel {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index_by_id: HashMap<String, usize>,
    edge_index: HashMap<(usize, usize), usize>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            edges: Vec::with_capacity(edges),
            index_by_id: HashMap::with_capacity(nodes),
            edge_index: HashMap::with_capacity(edges),
            outgoing: Vec::with_capacity(nodes),
            incoming: Vec::with_capacity(nodes),
        }
    }

    pub fn add_node(
        &mut self,
        id: impl Into<String>,
        style: NodeStyle,
    ) -> Result<usize, EngineError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(EngineError::EmptyNodeId);
        }
        if self.index_by_id.contains_key(&id) {
            return Err(EngineError::DuplicateNode(id));
        }

        let index = self.nodes.len();
        let visual = Visual::shown(style.color, style.size);
        self.index_by_id.insert(id.clone(), index);
        self.nodes.push(Node {
            id,
            is_base: style.is_base,
            position: Vec2::ZERO,
            visual,
            original: visual,
        });
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        Ok(index)
    }

    /// Admits `source -> target` unless an endpoint is unknown or the ordered
    /// pair already exists. Returns the edge index only when a new edge was
    /// inserted.
    pub fn add_edge(&mut self, source: &str, target: &str, style: EdgeStyle) -> Option<usize> {
        let from = self.index_of(source)?;
        let to = self.index_of(target)?;
        if self.edge_index.contains_key(&(from, to)) {
            return None;
        }

        let index = self.edges.len();
        let visual = Visual::shown(style.color, style.size);
        self.edges.push(Edge {
            source: from,
            target: to,
            visual,
            original: visual,
        });
        self.edge_index.insert((from, to), index);
        self.outgoing[from].push(to);
        self.incoming[to].push(from);
        Some(index)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_by_id.contains_key(id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn node_by_id(&self, id: &str) -> Option<&Node> {
        self.index_of(id).and_then(|index| self.nodes.get(index))
    }

    pub fn edge(&self, index: usize) -> Option<&Edge> {
        self.edges.get(index)
    }

    pub fn edge_between(&self, source: usize, target: usize) -> Option<usize> {
        self.edge_index.get(&(source, target)).copied()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Dependencies of `index`.
    pub fn out_neighbors(&self, index: usize) -> &[usize] {
        self.outgoing.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Dependents of `index`.
    pub fn in_neighbors(&self, index: usize) -> &[usize] {
        self.incoming.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn id_of(&self, index: usize) -> Option<&str> {
        self.nodes.get(index).map(Node::id)
    }

    pub fn set_node_visual(&mut self, index: usize, visual: Visual) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.visual = visual;
        }
    }

    pub fn set_edge_visual(&mut self, index: usize, visual: Visual) {
        if let Some(edge) = self.edges.get_mut(index) {
            edge.visual = visual;
        }
    }

    pub(crate) fn set_position(&mut self, index: usize, position: Vec2) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.position = position;
        }
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.nodes.iter().map(Node::position)
    }

    /// Puts every node and edge back to its baseline color and size, unhidden.
    pub fn restore_all(&mut self) {
        for node in &mut self.nodes {
            node.visual = node.original;
        }
        for edge in &mut self.edges {
            edge.visual = edge.original;
        }
    }

    pub fn is_baseline(&self) -> bool {
        self.nodes.iter().all(|node| node.visual == node.original)
            && self.edges.iter().all(|edge| edge.visual == edge.original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> NodeStyle {
        NodeStyle {
            is_base: false,
            color: Color32::WHITE,
            size: 4.0,
        }
    }

    fn edge_style() -> EdgeStyle {
        EdgeStyle {
            color: Color32::GRAY,
            size: 1.0,
        }
    }

    #[test]
    fn duplicate_node_is_rejected() {
        let mut graph = GraphModel::new();
        graph.add_node("a", style()).unwrap();
        assert_eq!(
            graph.add_node("a", style()),
            Err(EngineError::DuplicateNode("a".to_owned()))
        );
        assert_eq!(graph.add_node("  ", style()), Err(EngineError::EmptyNodeId));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn edge_insertion_is_idempotent() {
        let mut graph = GraphModel::new();
        graph.add_node("a", style()).unwrap();
        graph.add_node("b", style()).unwrap();

        assert_eq!(graph.add_edge("a", "b", edge_style()), Some(0));
        assert_eq!(graph.add_edge("a", "b", edge_style()), None);
        assert_eq!(graph.add_edge("b", "a", edge_style()), Some(1));
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.out_neighbors(0), &[1]);
        assert_eq!(graph.in_neighbors(0), &[1]);
    }

    #[test]
    fn edges_with_unknown_endpoints_are_dropped() {
        let mut graph = GraphModel::new();
        graph.add_node("a", style()).unwrap();

        assert_eq!(graph.add_edge("a", "missing", edge_style()), None);
        assert_eq!(graph.add_edge("missing", "a", edge_style()), None);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn self_dependency_is_admitted_once() {
        let mut graph = GraphModel::new();
        graph.add_node("a", style()).unwrap();

        assert_eq!(graph.add_edge("a", "a", edge_style()), Some(0));
        assert_eq!(graph.add_edge("a", "a", edge_style()), None);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge_between(0, 0), Some(0));
        assert_eq!(graph.out_neighbors(0), &[0]);
        assert_eq!(graph.in_neighbors(0), &[0]);
    }

    #[test]
    fn restore_all_resets_visuals() {
        let mut graph = GraphModel::new();
        graph.add_node("a", style()).unwrap();
        graph.add_node("b", style()).unwrap();
        graph.add_edge("a", "b", edge_style());

        graph.set_node_visual(0, Visual::hidden(Color32::RED, 9.0));
        graph.set_edge_visual(0, Visual::hidden(Color32::RED, 3.0));
        assert!(!graph.is_baseline());

        graph.restore_all();
        assert!(graph.is_baseline());
        assert_eq!(graph.node(0).unwrap().color(), Color32::WHITE);
        assert!(!graph.edge(0).unwrap().is_hidden());
    }
}
