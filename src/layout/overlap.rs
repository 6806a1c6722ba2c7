use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};

fn cell_of(point: Vec2, cell_size: f32) -> (i32, i32) {
    (
        (point.x / cell_size).floor() as i32,
        (point.y / cell_size).floor() as i32,
    )
}

/// Pushes apart every pair closer than `min_distance`, using a uniform grid
/// with `min_distance` cells so only neighbouring cells are compared.
pub(super) fn separate_overlaps(positions: &mut [Vec2], min_distance: f32, passes: usize) {
    if positions.len() < 2 || min_distance <= 0.0 {
        return;
    }

    let mut grid: HashMap<(i32, i32), Vec<usize>> = HashMap::new();
    for _ in 0..passes {
        grid.clear();
        for (index, point) in positions.iter().enumerate() {
            grid.entry(cell_of(*point, min_distance))
                .or_default()
                .push(index);
        }

        let mut moved = false;
        for index in 0..positions.len() {
            let (cx, cy) = cell_of(positions[index], min_distance);
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let Some(bucket) = grid.get(&(cx + dx, cy + dy)) else {
                        continue;
                    };

                    for &other in bucket {
                        if other <= index {
                            continue;
                        }

                        let delta = positions[index] - positions[other];
                        let distance = delta.length();
                        if distance >= min_distance {
                            continue;
                        }

                        let direction = if distance > 0.0001 {
                            delta / distance
                        } else {
                            let angle = ((index as f32) * 0.618_034 + (other as f32) * 0.414_214)
                                * std::f32::consts::TAU;
                            vec2(angle.cos(), angle.sin())
                        };
                        let push = direction * ((min_distance - distance) * 0.5);
                        positions[index] += push;
                        positions[other] -= push;
                        moved = true;
                    }
                }
            }
        }

        if !moved {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_pair_is_pushed_to_min_distance() {
        let mut positions = vec![vec2(0.0, 0.0), vec2(2.0, 0.0), vec2(100.0, 100.0)];
        separate_overlaps(&mut positions, 12.0, 1);

        assert!(((positions[0] - positions[1]).length() - 12.0).abs() < 1e-3);
        assert_eq!(positions[2], vec2(100.0, 100.0));
    }

    #[test]
    fn pairs_across_cell_borders_are_found() {
        let mut positions = vec![vec2(11.5, 0.0), vec2(12.5, 0.0)];
        separate_overlaps(&mut positions, 12.0, 1);
        assert!((positions[1].x - positions[0].x) >= 12.0 - 1e-3);
    }

    #[test]
    fn coincident_nodes_are_separated() {
        let mut positions = vec![vec2(3.0, 3.0); 2];
        separate_overlaps(&mut positions, 10.0, 1);
        assert!(((positions[0] - positions[1]).length() - 10.0).abs() < 1e-3);
    }
}
