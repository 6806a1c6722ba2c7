use eframe::egui::{Vec2, vec2};
use rand::Rng;

use super::quadtree::QuadTree;

const MIN_DISTANCE_SQ: f32 = 1.0;

fn fallback_direction(from: usize, to: usize) -> Vec2 {
    let angle = ((from as f32) * 0.618_034 + (to as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

/// Inverse-square push of `a` away from `b`.
fn repulsion_between(a: Vec2, b: Vec2, strength: f32, pair: (usize, usize)) -> Vec2 {
    let delta = a - b;
    let distance_sq = delta.length_sq();
    let direction = if distance_sq > 0.0001 * 0.0001 {
        delta / distance_sq.sqrt()
    } else {
        fallback_direction(pair.0, pair.1)
    };
    direction * (strength / distance_sq.max(MIN_DISTANCE_SQ))
}

/// Each node is pushed away from up to `sample_size` others. Below that
/// size every other node is used and no randomness is consumed.
pub(super) fn accumulate_sampled_repulsion<R: Rng>(
    positions: &[Vec2],
    strength: f32,
    sample_size: usize,
    rng: &mut R,
    forces: &mut [Vec2],
) {
    let n = positions.len();
    if n < 2 {
        return;
    }

    let others = n - 1;
    let sample_size = sample_size.max(1);

    for (index, force) in forces.iter_mut().enumerate().take(n) {
        let point = positions[index];
        if others <= sample_size {
            for (other, &other_point) in positions.iter().enumerate() {
                if other != index {
                    *force += repulsion_between(point, other_point, strength, (index, other));
                }
            }
            continue;
        }

        for _ in 0..sample_size {
            let pick = rng.gen_range(0..others);
            let other = if pick >= index { pick + 1 } else { pick };
            *force += repulsion_between(point, positions[other], strength, (index, other));
        }
    }
}

/// Barnes–Hut walk: a cell far enough away acts as one body at its center of
/// mass.
pub(super) fn accumulate_tree_repulsion(
    tree: &QuadTree,
    index: usize,
    positions: &[Vec2],
    strength: f32,
    theta: f32,
    force: &mut Vec2,
) {
    let point = positions[index];
    let mut pending = vec![tree.root()];

    while let Some(cell) = pending.pop() {
        if cell.mass <= 0.0 {
            continue;
        }

        if cell.is_leaf() {
            for &other in &cell.bodies {
                if other != index {
                    *force += repulsion_between(point, positions[other], strength, (index, other));
                }
            }
            continue;
        }

        let delta = point - cell.center_of_mass;
        let distance_sq = delta.length_sq().max(MIN_DISTANCE_SQ);
        let distance = distance_sq.sqrt();
        if !cell.square.contains(point) && cell.square.size < theta * distance {
            *force += (delta / distance) * (strength * cell.mass / distance_sq);
        } else {
            pending.extend(tree.children(cell));
        }
    }
}

/// Linear spring along every edge pulling both endpoints together.
pub(super) fn accumulate_attraction(
    edges: impl Iterator<Item = (usize, usize)>,
    positions: &[Vec2],
    strength: f32,
    forces: &mut [Vec2],
) {
    let n = positions.len();
    for (from, to) in edges {
        if from >= n || to >= n || from == to {
            continue;
        }

        let pull = (positions[to] - positions[from]) * strength;
        forces[from] += pull;
        forces[to] -= pull;
    }
}
