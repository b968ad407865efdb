//! Toroidal Game of Life engine.
//!
//! The grid owns two equally sized buffers: `current`, the generation that
//! readers see, and `next`, scratch space written during [`Grid::step`].
//! Nothing in here knows about terminals, pixels or input.

use rand::Rng;

/// Width and height of a rectangle, in cells or in pixels depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Size { width, height }
    }

    pub const fn area(self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// A grid position. Signed so that shifts off the edge (and clicks that
/// land nowhere) can be represented before they are wrapped or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    /// Moves one step in `dir` without any wrapping.
    pub fn shift(self, dir: Direction) -> Coord {
        let (dx, dy) = dir.offset();
        Coord::new(self.x + dx, self.y + dy)
    }

    /// Folds a coordinate that is at most one step off an edge back onto
    /// the opposite edge.
    pub fn wrap(self, size: Size) -> Coord {
        Coord::new(wrap_axis(self.x, size.width), wrap_axis(self.y, size.height))
    }
}

fn wrap_axis(n: i32, len: u32) -> i32 {
    let len = len as i32;
    if n < 0 {
        len - 1
    } else if n >= len {
        0
    } else {
        n
    }
}

/// Cardinal directions in clockwise order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Quarter turn clockwise. Four rotations return to the start.
    pub fn rotate(self) -> Direction {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    /// Unit step as `(dx, dy)`, with y growing downwards.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }
}

/// Births and deaths produced by a single [`Grid::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepSummary {
    pub births: u64,
    pub deaths: u64,
}

/// A fixed-size toroidal field of cells with double-buffered transitions.
#[derive(Debug, Clone)]
pub struct Grid {
    size: Size,
    current: Vec<bool>,
    next: Vec<bool>,
}

impl Grid {
    /// Creates a grid with every cell dead.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Grid {
        assert!(
            width > 0 && height > 0,
            "grid dimensions must be non-zero, got {width}x{height}"
        );
        let size = Size::new(width, height);
        Grid {
            size,
            current: vec![false; size.area()],
            next: vec![false; size.area()],
        }
    }

    /// Creates a grid where each cell is independently alive with probability 1/2.
    ///
    /// # Arguments
    ///
    /// * `width` - Number of columns, at least 1
    /// * `height` - Number of rows, at least 1
    /// * `rng` - Source of the coin flips; pass a seeded one for repeatable runs
    ///
    /// # Returns
    ///
    /// A grid whose scratch buffer starts all dead.
    pub fn random<R: Rng + ?Sized>(width: u32, height: u32, rng: &mut R) -> Grid {
        let mut grid = Grid::new(width, height);
        grid.current.iter_mut().for_each(|cell| *cell = rng.gen_bool(0.5));
        grid
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    pub fn contains(&self, pos: Coord) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as u32) < self.size.width
            && (pos.y as u32) < self.size.height
    }

    fn index(&self, pos: Coord) -> usize {
        pos.y as usize * self.size.width as usize + pos.x as usize
    }

    /// State of the cell at `pos`, or `None` when it lies off the grid.
    pub fn get(&self, pos: Coord) -> Option<bool> {
        self.contains(pos).then(|| self.current[self.index(pos)])
    }

    /// Sets a cell. Positions off the grid are ignored.
    #[cfg(test)]
    pub fn set(&mut self, pos: Coord, alive: bool) {
        if self.contains(pos) {
            let idx = self.index(pos);
            self.current[idx] = alive;
        }
    }

    /// Flips a single cell. Returns `false` and leaves the grid untouched
    /// when `pos` is off the grid.
    pub fn toggle(&mut self, pos: Coord) -> bool {
        if !self.contains(pos) {
            return false;
        }
        let idx = self.index(pos);
        self.current[idx] = !self.current[idx];
        true
    }

    /// Number of live cells in the current generation.
    pub fn population(&self) -> usize {
        self.current.iter().filter(|&&alive| alive).count()
    }

    /// Iterates the current generation in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Coord, bool)> + '_ {
        let width = self.size.width as usize;
        self.current.iter().enumerate().map(move |(idx, &alive)| {
            (Coord::new((idx % width) as i32, (idx / width) as i32), alive)
        })
    }

    /// The Moore neighborhood of `pos` on the torus.
    ///
    /// For each cardinal direction the cardinal neighbor is taken, then the
    /// diagonal one is reached from it by stepping in the rotated direction.
    /// Because the rotation is a consistent quarter turn, the four passes
    /// cover every cardinal and diagonal neighbor exactly once.
    ///
    /// # Panics
    ///
    /// Panics if a wrapped coordinate lands off the grid. That can only
    /// happen if the wrap arithmetic is broken, never because of input.
    pub fn neighbors(&self, pos: Coord) -> [Coord; 8] {
        let mut out = [pos; 8];
        for (i, dir) in Direction::ALL.into_iter().enumerate() {
            let card = pos.shift(dir).wrap(self.size);
            let diag = card.shift(dir.rotate()).wrap(self.size);
            assert!(
                self.contains(card),
                "cardinal neighbor ({:2},{:2}) of {:?} is off the grid",
                card.x,
                card.y,
                pos
            );
            assert!(
                self.contains(diag),
                "diagonal neighbor ({:2},{:2}) of {:?} is off the grid",
                diag.x,
                diag.y,
                pos
            );
            out[2 * i] = card;
            out[2 * i + 1] = diag;
        }
        out
    }

    /// Counts live cells among the eight toroidal neighbors of `pos`.
    pub fn live_neighbors(&self, pos: Coord) -> u8 {
        self.neighbors(pos)
            .iter()
            .filter(|&&n| self.current[self.index(n)])
            .count() as u8
    }

    /// Advances one generation under B3/S23.
    ///
    /// Every next state is computed from `current` into `next`, and only then
    /// are the buffers exchanged, so no reader ever sees a half-updated
    /// generation. The old generation left in `next` is overwritten in full
    /// on the following step.
    pub fn step(&mut self) -> StepSummary {
        let mut summary = StepSummary::default();
        let width = self.size.width as i32;
        for y in 0..self.size.height as i32 {
            for x in 0..width {
                let pos = Coord::new(x, y);
                let idx = self.index(pos);
                let alive = self.current[idx];
                let next = match (alive, self.live_neighbors(pos)) {
                    (true, 2) | (true, 3) => true,
                    (false, 3) => {
                        summary.births += 1;
                        true
                    }
                    (true, _) => {
                        summary.deaths += 1;
                        false
                    }
                    (false, _) => false,
                };
                self.next[idx] = next;
            }
        }
        std::mem::swap(&mut self.current, &mut self.next);
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    fn grid_with(width: u32, height: u32, live: &[(i32, i32)]) -> Grid {
        let mut grid = Grid::new(width, height);
        for &(x, y) in live {
            grid.set(Coord::new(x, y), true);
        }
        grid
    }

    fn live_cells(grid: &Grid) -> HashSet<(i32, i32)> {
        grid.cells()
            .filter(|&(_, alive)| alive)
            .map(|(pos, _)| (pos.x, pos.y))
            .collect()
    }

    #[test]
    fn rotate_is_a_four_cycle() {
        for dir in Direction::ALL {
            assert_ne!(dir.rotate(), dir);
            assert_eq!(dir.rotate().rotate().rotate().rotate(), dir);
        }
    }

    #[test]
    fn neighbors_are_distinct_and_in_bounds() {
        for (w, h) in [(3, 3), (4, 3), (3, 7), (10, 6), (32, 24)] {
            let grid = Grid::new(w, h);
            for (pos, _) in grid.cells() {
                let ns = grid.neighbors(pos);
                let unique: HashSet<Coord> = ns.iter().copied().collect();
                assert_eq!(unique.len(), 8, "duplicates around {pos:?} on {w}x{h}");
                assert!(!unique.contains(&pos));
                assert!(ns.iter().all(|&n| grid.contains(n)));
            }
        }
    }

    #[test]
    fn degenerate_grids_stay_in_bounds() {
        for (w, h) in [(1, 1), (1, 5), (2, 2), (5, 1)] {
            let grid = Grid::random(w, h, &mut StdRng::seed_from_u64(7));
            for (pos, _) in grid.cells() {
                assert!(grid.neighbors(pos).iter().all(|&n| grid.contains(n)));
                assert!(grid.live_neighbors(pos) <= 8);
            }
        }
    }

    #[test]
    fn corner_neighbors_wrap_to_opposite_edges() {
        let grid = Grid::new(3, 3);
        let ns: HashSet<(i32, i32)> = grid
            .neighbors(Coord::new(0, 0))
            .iter()
            .map(|c| (c.x, c.y))
            .collect();
        for expected in [(2, 2), (2, 0), (2, 1), (0, 2), (1, 2), (1, 0), (0, 1), (1, 1)] {
            assert!(ns.contains(&expected), "missing {expected:?}");
        }
    }

    #[test]
    fn full_grid_counts_eight() {
        let mut grid = Grid::new(4, 4);
        for (pos, _) in Grid::new(4, 4).cells() {
            grid.set(pos, true);
        }
        assert_eq!(grid.live_neighbors(Coord::new(0, 3)), 8);
    }

    #[test]
    fn lonely_cell_dies() {
        let mut grid = grid_with(5, 5, &[(2, 2)]);
        let summary = grid.step();
        assert_eq!(grid.get(Coord::new(2, 2)), Some(false));
        assert_eq!(summary, StepSummary { births: 0, deaths: 1 });
    }

    #[test]
    fn survives_with_two_or_three() {
        // (2,2) has two live neighbors.
        let mut grid = grid_with(6, 6, &[(1, 1), (2, 2), (3, 3)]);
        grid.step();
        assert_eq!(grid.get(Coord::new(2, 2)), Some(true));

        // (2,2) has three live neighbors.
        let mut grid = grid_with(6, 6, &[(1, 1), (2, 2), (3, 1), (3, 3)]);
        grid.step();
        assert_eq!(grid.get(Coord::new(2, 2)), Some(true));
    }

    #[test]
    fn overcrowded_cell_dies() {
        let mut grid = grid_with(6, 6, &[(2, 2), (1, 1), (3, 1), (1, 3), (3, 3)]);
        assert_eq!(grid.live_neighbors(Coord::new(2, 2)), 4);
        grid.step();
        assert_eq!(grid.get(Coord::new(2, 2)), Some(false));
    }

    #[test]
    fn birth_needs_exactly_three() {
        let mut grid = grid_with(6, 6, &[(1, 1), (3, 1), (2, 3)]);
        grid.step();
        assert_eq!(grid.get(Coord::new(2, 2)), Some(true));

        let mut grid = grid_with(6, 6, &[(1, 1), (3, 1)]);
        grid.step();
        assert_eq!(grid.get(Coord::new(2, 2)), Some(false));
    }

    #[test]
    fn block_is_still_life() {
        let block = [(1, 1), (2, 1), (1, 2), (2, 2)];
        let mut grid = grid_with(4, 4, &block);
        let before = live_cells(&grid);
        let summary = grid.step();
        assert_eq!(live_cells(&grid), before);
        assert_eq!(summary, StepSummary::default());
    }

    #[test]
    fn blinker_oscillates() {
        let horizontal = [(1, 2), (2, 2), (3, 2)];
        let vertical: HashSet<(i32, i32)> = [(2, 1), (2, 2), (2, 3)].into_iter().collect();
        let mut grid = grid_with(5, 5, &horizontal);

        grid.step();
        assert_eq!(live_cells(&grid), vertical);

        grid.step();
        let back: HashSet<(i32, i32)> = horizontal.into_iter().collect();
        assert_eq!(live_cells(&grid), back);
    }

    #[test]
    fn glider_crosses_the_seam() {
        let glider = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];
        let mut grid = grid_with(8, 8, &glider);
        // A glider returns to its shape shifted by (1,1) every four steps;
        // 32 steps bring it all the way round an 8x8 torus.
        for _ in 0..32 {
            grid.step();
        }
        let start: HashSet<(i32, i32)> = glider.into_iter().collect();
        assert_eq!(live_cells(&grid), start);
    }

    #[test]
    fn double_toggle_restores() {
        let mut grid = Grid::random(8, 8, &mut StdRng::seed_from_u64(42));
        let before = live_cells(&grid);
        let pos = Coord::new(3, 5);
        let was = grid.get(pos);
        assert!(grid.toggle(pos));
        assert_ne!(grid.get(pos), was);
        assert!(grid.toggle(pos));
        assert_eq!(live_cells(&grid), before);
    }

    #[test]
    fn out_of_bounds_toggle_is_ignored() {
        let mut grid = Grid::random(8, 6, &mut StdRng::seed_from_u64(1));
        let before = live_cells(&grid);
        for pos in [(-1, 0), (0, -1), (8, 0), (0, 6), (100, 100)] {
            assert!(!grid.toggle(Coord::new(pos.0, pos.1)));
        }
        assert_eq!(live_cells(&grid), before);
    }

    #[test]
    fn random_fill_is_seeded() {
        let a = Grid::random(16, 16, &mut StdRng::seed_from_u64(9));
        let b = Grid::random(16, 16, &mut StdRng::seed_from_u64(9));
        assert_eq!(live_cells(&a), live_cells(&b));
        let population = a.population();
        assert!(population > 0 && population < 256);
    }

    #[test]
    #[should_panic(expected = "non-zero")]
    fn zero_sized_grid_is_rejected() {
        Grid::new(0, 4);
    }
}
