mod forces;
mod overlap;
mod quadtree;

use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::graph::GraphModel;
use forces::{accumulate_attraction, accumulate_sampled_repulsion, accumulate_tree_repulsion};
use overlap::separate_overlaps;
use quadtree::QuadTree;

/// Node count from which [`LayoutStrategy::for_node_count`] switches to the
/// quadtree approximation.
pub const BARNES_HUT_THRESHOLD: usize = 2000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutStrategy {
    /// Repulsion against a bounded random sample of nodes.
    Sampled,
    /// Quadtree long-range repulsion plus a grid overlap pass at the end.
    BarnesHut,
}

impl LayoutStrategy {
    pub fn for_node_count(node_count: usize) -> Self {
        if node_count >= BARNES_HUT_THRESHOLD {
            Self::BarnesHut
        } else {
            Self::Sampled
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Sampled => "sampled",
            Self::BarnesHut => "barnes-hut",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    pub repulsion: f32,
    pub attraction: f32,
    pub damping: f32,
    pub max_speed: f32,
    pub iterations: usize,
    pub batch_size: usize,
    pub sample_size: usize,
    pub placement_scale: f32,
    pub radius_jitter: f32,
    pub offset_jitter: f32,
    pub theta: f32,
    pub min_distance: f32,
    pub overlap_passes: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            repulsion: 800.0,
            attraction: 0.01,
            damping: 0.85,
            max_speed: 30.0,
            iterations: 300,
            batch_size: 10,
            sample_size: 50,
            placement_scale: 40.0,
            radius_jitter: 0.15,
            offset_jitter: 20.0,
            theta: 0.75,
            min_distance: 12.0,
            overlap_passes: 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutProgress {
    pub iteration: usize,
    pub total: usize,
    pub done: bool,
}

impl LayoutProgress {
    pub fn fraction(self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.iteration as f32 / self.total as f32
        }
    }
}

/// Assigns every node a spot on a jittered circle, ordered by insertion index.
pub fn place_on_circle<R: Rng>(graph: &mut GraphModel, config: &LayoutConfig, rng: &mut R) {
    let n = graph.node_count();
    if n == 0 {
        return;
    }

    let base_radius = (n as f32).sqrt() * config.placement_scale;
    let radius_jitter = config.radius_jitter.max(0.0);
    let offset_jitter = config.offset_jitter.max(0.0);

    for index in 0..n {
        let angle = (index as f32 / n as f32) * TAU;
        let radius = base_radius * (1.0 + radius_jitter * (rng.r#gen::<f32>() * 2.0 - 1.0));
        let offset = vec2(
            (rng.r#gen::<f32>() * 2.0 - 1.0) * offset_jitter,
            (rng.r#gen::<f32>() * 2.0 - 1.0) * offset_jitter,
        );
        graph.set_position(index, vec2(angle.cos(), angle.sin()) * radius + offset);
    }
}

#[derive(Default)]
struct LayoutScratch {
    positions: Vec<Vec2>,
    forces: Vec<Vec2>,
}

/// A resumable force relaxation.
///
/// The host calls [`LayoutRun::step_batch`] between frames so the interface
/// keeps running; batching never changes the numbers produced for a given
/// random source.
pub struct LayoutRun<R> {
    strategy: LayoutStrategy,
    config: LayoutConfig,
    rng: R,
    velocities: Vec<Vec2>,
    scratch: LayoutScratch,
    iteration: usize,
    done: bool,
}

impl LayoutRun<StdRng> {
    pub fn seeded(
        graph: &mut GraphModel,
        strategy: LayoutStrategy,
        config: LayoutConfig,
        seed: u64,
    ) -> Self {
        Self::new(graph, strategy, config, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(
        graph: &mut GraphModel,
        strategy: LayoutStrategy,
        config: LayoutConfig,
    ) -> Self {
        Self::new(graph, strategy, config, StdRng::from_entropy())
    }
}

impl<R: Rng> LayoutRun<R> {
    /// Places every node and prepares the relaxation.
    pub fn new(
        graph: &mut GraphModel,
        strategy: LayoutStrategy,
        config: LayoutConfig,
        mut rng: R,
    ) -> Self {
        place_on_circle(graph, &config, &mut rng);
        let node_count = graph.node_count();
        debug!(
            nodes = node_count,
            strategy = strategy.label(),
            iterations = config.iterations,
            "starting layout"
        );

        Self {
            strategy,
            config,
            rng,
            velocities: vec![Vec2::ZERO; node_count],
            scratch: LayoutScratch::default(),
            iteration: 0,
            done: node_count < 2 || config.iterations == 0,
        }
    }

    pub fn strategy(&self) -> LayoutStrategy {
        self.strategy
    }

    pub fn progress(&self) -> LayoutProgress {
        LayoutProgress {
            iteration: self.iteration,
            total: self.config.iterations,
            done: self.done,
        }
    }

    /// Runs up to `batch_size` iterations, then hands control back.
    pub fn step_batch(&mut self, graph: &mut GraphModel) -> LayoutProgress {
        if self.done {
            return self.progress();
        }

        let batch = self.config.batch_size.max(1);
        let end = (self.iteration + batch).min(self.config.iterations);
        while self.iteration < end {
            self.iterate(graph);
            self.iteration += 1;
        }

        if self.iteration >= self.config.iterations {
            self.finish(graph);
        } else {
            trace!(iteration = self.iteration, "layout batch complete");
        }

        self.progress()
    }

    pub fn run_to_completion(&mut self, graph: &mut GraphModel) -> LayoutProgress {
        while !self.done {
            self.step_batch(graph);
        }
        self.progress()
    }

    fn iterate(&mut self, graph: &mut GraphModel) {
        let node_count = graph.node_count();
        if self.velocities.len() != node_count {
            self.velocities.resize(node_count, Vec2::ZERO);
        }

        let scratch = &mut self.scratch;
        scratch.positions.clear();
        scratch.positions.extend(graph.positions());
        scratch.forces.clear();
        scratch.forces.resize(node_count, Vec2::ZERO);

        let positions = &scratch.positions;
        let forces = &mut scratch.forces;

        match self.strategy {
            LayoutStrategy::Sampled => accumulate_sampled_repulsion(
                positions,
                self.config.repulsion,
                self.config.sample_size,
                &mut self.rng,
                forces,
            ),
            LayoutStrategy::BarnesHut => {
                if let Some(tree) = QuadTree::build(positions) {
                    for (index, force) in forces.iter_mut().enumerate() {
                        accumulate_tree_repulsion(
                            &tree,
                            index,
                            positions,
                            self.config.repulsion,
                            self.config.theta,
                            force,
                        );
                    }
                }
            }
        }

        accumulate_attraction(
            graph.edges().iter().map(|edge| (edge.source(), edge.target())),
            positions,
            self.config.attraction,
            forces,
        );

        let damping = self.config.damping.clamp(0.0, 0.999);
        let max_speed = self.config.max_speed.max(0.01);
        let mut next_positions = Vec::with_capacity(node_count);
        let mut centroid = Vec2::ZERO;
        for (index, force) in forces.iter().enumerate() {
            let mut velocity = (self.velocities[index] + *force) * damping;
            let speed_sq = velocity.length_sq();
            if speed_sq > max_speed * max_speed {
                velocity *= max_speed / speed_sq.sqrt();
            }
            self.velocities[index] = velocity;

            let position = positions[index] + velocity;
            centroid += position;
            next_positions.push(position);
        }

        centroid /= node_count.max(1) as f32;
        for (index, position) in next_positions.into_iter().enumerate() {
            graph.set_position(index, position - centroid);
        }
    }

    fn finish(&mut self, graph: &mut GraphModel) {
        if self.strategy == LayoutStrategy::BarnesHut && self.config.overlap_passes > 0 {
            let mut positions = graph.positions().collect::<Vec<_>>();
            separate_overlaps(
                &mut positions,
                self.config.min_distance,
                self.config.overlap_passes,
            );
            for (index, position) in positions.into_iter().enumerate() {
                graph.set_position(index, position);
            }
        }

        self.done = true;
        debug!(iterations = self.iteration, "layout finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Palette;

    fn ring(n: usize) -> GraphModel {
        let palette = Palette::default();
        let mut graph = GraphModel::new();
        for index in 0..n {
            graph
                .add_node(format!("p{index}"), palette.node_style(false))
                .unwrap();
        }
        for index in 0..n {
            let next = (index + 1) % n;
            graph.add_edge(&format!("p{index}"), &format!("p{next}"), palette.edge_style());
        }
        graph
    }

    fn mean_edge_length(graph: &GraphModel) -> f32 {
        let total = graph
            .edges()
            .iter()
            .map(|edge| {
                let a = graph.node(edge.source()).unwrap().position();
                let b = graph.node(edge.target()).unwrap().position();
                (a - b).length()
            })
            .sum::<f32>();
        total / graph.edge_count() as f32
    }

    fn mean_pair_distance(graph: &GraphModel) -> f32 {
        let positions = graph.positions().collect::<Vec<_>>();
        let mut total = 0.0;
        let mut count = 0usize;
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                total += (positions[i] - positions[j]).length();
                count += 1;
            }
        }
        total / count as f32
    }

    #[test]
    fn placement_scales_with_sqrt_of_node_count() {
        let mut graph = ring(64);
        let config = LayoutConfig {
            radius_jitter: 0.0,
            offset_jitter: 0.0,
            ..LayoutConfig::default()
        };
        place_on_circle(&mut graph, &config, &mut StdRng::seed_from_u64(1));

        let expected = 8.0 * config.placement_scale;
        for position in graph.positions() {
            assert!((position.length() - expected).abs() < 0.01);
        }
        let first = graph.node(0).unwrap().position();
        assert!((first.x - expected).abs() < 0.01 && first.y.abs() < 0.01);
    }

    #[test]
    fn connected_nodes_end_up_closer_than_average() {
        for strategy in [LayoutStrategy::Sampled, LayoutStrategy::BarnesHut] {
            let mut graph = ring(40);
            let mut run = LayoutRun::seeded(&mut graph, strategy, LayoutConfig::default(), 7);
            let progress = run.run_to_completion(&mut graph);

            assert!(progress.done);
            assert_eq!(progress.iteration, LayoutConfig::default().iterations);
            assert!(graph.positions().all(|p| p.x.is_finite() && p.y.is_finite()));
            assert!(mean_edge_length(&graph) < mean_pair_distance(&graph));
        }
    }

    #[test]
    fn batching_does_not_change_results() {
        let config = LayoutConfig {
            iterations: 45,
            sample_size: 5,
            ..LayoutConfig::default()
        };

        let mut batched = ring(30);
        let mut run = LayoutRun::seeded(&mut batched, LayoutStrategy::Sampled, config, 42);
        let mut batches = 0;
        while !run.step_batch(&mut batched).done {
            batches += 1;
        }
        assert_eq!(batches, 4);

        let mut whole = ring(30);
        LayoutRun::seeded(
            &mut whole,
            LayoutStrategy::Sampled,
            LayoutConfig {
                batch_size: 1000,
                ..config
            },
            42,
        )
        .run_to_completion(&mut whole);

        for (a, b) in batched.positions().zip(whole.positions()) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn tiny_graphs_finish_immediately() {
        let mut graph = ring(1);
        let run =
            LayoutRun::seeded(&mut graph, LayoutStrategy::Sampled, LayoutConfig::default(), 0);
        assert!(run.progress().done);
        assert_eq!(LayoutStrategy::for_node_count(10), LayoutStrategy::Sampled);
        assert_eq!(
            LayoutStrategy::for_node_count(BARNES_HUT_THRESHOLD),
            LayoutStrategy::BarnesHut
        );
    }
}
