use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphInput {
    #[serde(default)]
    pub nodes: Vec<NodeInput>,
    #[serde(default)]
    pub edges: Vec<EdgeInput>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NodeInput {
    pub id: String,
    #[serde(default, rename = "isBase")]
    pub is_base: bool,
}

/// `source` depends on `target`.
#[derive(Clone, Debug, Deserialize)]
pub struct EdgeInput {
    pub source: String,
    pub target: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ScenarioCatalogInput {
    #[serde(default)]
    pub scenarios: Vec<ScenarioInput>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioInput {
    pub id: String,
    #[serde(default)]
    pub queried_packages: Vec<String>,
    #[serde(default)]
    pub cycles: Vec<CycleInput>,
    #[serde(default)]
    pub intermediate_nodes: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CycleInput {
    pub id: String,
    #[serde(default)]
    pub nodes: Vec<String>,
    #[serde(default)]
    pub edges: Vec<CycleEdgeInput>,
    #[serde(default)]
    pub color: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CycleEdgeInput {
    pub from: String,
    pub to: String,
}

pub fn parse_graph_input(raw: &str) -> Result<GraphInput> {
    serde_json::from_str(raw).context("invalid dependency graph JSON")
}

pub fn parse_scenario_catalog(raw: &str) -> Result<ScenarioCatalogInput> {
    serde_json::from_str(raw).context("invalid cycle scenario JSON")
}

pub fn load_graph_input(path: &Path) -> Result<GraphInput> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read graph file {}", path.display()))?;
    parse_graph_input(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn load_scenario_catalog(path: &Path) -> Result<ScenarioCatalogInput> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario file {}", path.display()))?;
    parse_scenario_catalog(&raw).with_context(|| format!("failed to parse {}", path.display()))
}
