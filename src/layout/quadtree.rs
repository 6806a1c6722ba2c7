use eframe::egui::{Vec2, vec2};

const BUCKET_SIZE: usize = 4;
const DEPTH_LIMIT: u8 = 16;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct Square {
    pub(super) min: Vec2,
    pub(super) size: f32,
}

impl Square {
    fn around(points: &[Vec2]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(min, max), point| (min.min(*point), max.max(*point)));
        if !(min.x.is_finite() && min.y.is_finite() && max.x.is_finite() && max.y.is_finite()) {
            return None;
        }

        let size = (max - min).max_elem().max(1.0) * 1.01;
        Some(Self { min, size })
    }

    pub(super) fn contains(self, point: Vec2) -> bool {
        let max = self.min + Vec2::splat(self.size);
        point.x >= self.min.x && point.y >= self.min.y && point.x <= max.x && point.y <= max.y
    }

    fn quadrant(self, point: Vec2) -> usize {
        let mid = self.min + Vec2::splat(self.size * 0.5);
        match (point.x < mid.x, point.y < mid.y) {
            (true, true) => 0,
            (false, true) => 1,
            (true, false) => 2,
            (false, false) => 3,
        }
    }

    fn sub(self, quadrant: usize) -> Self {
        let half = self.size * 0.5;
        let offset = vec2(
            if quadrant % 2 == 1 { half } else { 0.0 },
            if quadrant >= 2 { half } else { 0.0 },
        );
        Self {
            min: self.min + offset,
            size: half,
        }
    }
}

#[derive(Debug)]
pub(super) struct Cell {
    pub(super) square: Square,
    pub(super) mass: f32,
    pub(super) center_of_mass: Vec2,
    pub(super) bodies: Vec<usize>,
    first_child: Option<usize>,
}

impl Cell {
    fn empty(square: Square) -> Self {
        Self {
            square,
            mass: 0.0,
            center_of_mass: Vec2::ZERO,
            bodies: Vec::new(),
            first_child: None,
        }
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.first_child.is_none()
    }
}

/// Barnes–Hut tree stored as a flat arena; the four children of a cell are
/// consecutive.
#[derive(Debug)]
pub(super) struct QuadTree {
    cells: Vec<Cell>,
}

impl QuadTree {
    pub(super) fn build(positions: &[Vec2]) -> Option<Self> {
        let square = Square::around(positions)?;
        let mut tree = Self {
            cells: Vec::with_capacity(positions.len() / 2 + 1),
        };
        tree.cells.push(Cell::empty(square));
        tree.fill(0, (0..positions.len()).collect(), positions, 0);
        Some(tree)
    }

    fn fill(&mut self, cell: usize, bodies: Vec<usize>, positions: &[Vec2], depth: u8) {
        let mass = bodies.len() as f32;
        let sum = bodies.iter().fold(Vec2::ZERO, |sum, &body| sum + positions[body]);
        self.cells[cell].mass = mass;
        self.cells[cell].center_of_mass = sum / mass.max(1.0);

        if bodies.len() <= BUCKET_SIZE || depth >= DEPTH_LIMIT {
            self.cells[cell].bodies = bodies;
            return;
        }

        let square = self.cells[cell].square;
        let mut quadrants: [Vec<usize>; 4] = Default::default();
        for body in bodies {
            quadrants[square.quadrant(positions[body])].push(body);
        }

        let first = self.cells.len();
        self.cells.extend((0..4).map(|quadrant| Cell::empty(square.sub(quadrant))));
        self.cells[cell].first_child = Some(first);

        for (quadrant, members) in quadrants.into_iter().enumerate() {
            if !members.is_empty() {
                self.fill(first + quadrant, members, positions, depth + 1);
            }
        }
    }

    pub(super) fn root(&self) -> &Cell {
        &self.cells[0]
    }

    pub(super) fn children(&self, cell: &Cell) -> &[Cell] {
        match cell.first_child {
            Some(first) => &self.cells[first..first + 4],
            None => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_bodies(tree: &QuadTree) -> Vec<usize> {
        let mut bodies = Vec::new();
        let mut stack = vec![tree.root()];
        while let Some(cell) = stack.pop() {
            if cell.is_leaf() {
                bodies.extend(cell.bodies.iter().copied());
            } else {
                stack.extend(tree.children(cell));
            }
        }
        bodies.sort_unstable();
        bodies
    }

    #[test]
    fn every_body_lands_in_exactly_one_leaf() {
        let positions = (0..100)
            .map(|index| vec2((index % 10) as f32 * 7.0, (index / 10) as f32 * -3.0))
            .collect::<Vec<_>>();
        let tree = QuadTree::build(&positions).unwrap();

        assert!(!tree.root().is_leaf());
        assert_eq!(tree.root().mass, 100.0);
        assert_eq!(leaf_bodies(&tree), (0..100).collect::<Vec<_>>());
        for point in &positions {
            assert!(tree.root().square.contains(*point));
        }
    }

    #[test]
    fn child_masses_add_up_to_the_parent() {
        let positions = (0..40)
            .map(|index| vec2((index * 13 % 17) as f32, (index * 7 % 11) as f32))
            .collect::<Vec<_>>();
        let tree = QuadTree::build(&positions).unwrap();

        let root = tree.root();
        let children = tree.children(root);
        assert_eq!(children.len(), 4);
        assert_eq!(children.iter().map(|cell| cell.mass).sum::<f32>(), root.mass);
    }

    #[test]
    fn coincident_bodies_stop_at_the_depth_limit() {
        let positions = vec![vec2(5.0, 5.0); 30];
        let tree = QuadTree::build(&positions).unwrap();
        assert_eq!(leaf_bodies(&tree).len(), 30);
        assert_eq!(tree.root().center_of_mass, vec2(5.0, 5.0));
    }

    #[test]
    fn empty_input_builds_nothing() {
        assert!(QuadTree::build(&[]).is_none());
    }
}
