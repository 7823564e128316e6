use crate::entity::Position;
use rand::Rng;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Butterfly,
    Flower,
}

/// Passive N x N occupancy container. The relocation algorithms in
/// `entity` enforce the one-butterfly / distinct-flowers invariant; the
/// grid itself just records markers.
pub struct Grid {
    size: i32,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(size: i32) -> Self {
        Self {
            size,
            cells: vec![vec![Cell::Empty; size as usize]; size as usize],
        }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.size && pos.y < self.size
    }

    pub fn get(&self, pos: Position) -> Cell {
        if !self.contains(pos) {
            return Cell::Empty;
        }
        self.cells[pos.y as usize][pos.x as usize]
    }

    pub fn set(&mut self, pos: Position, cell: Cell) {
        if self.contains(pos) {
            self.cells[pos.y as usize][pos.x as usize] = cell;
        }
    }

    /// Resets every cell holding `kind` back to empty.
    pub fn clear(&mut self, kind: Cell) {
        for row in &mut self.cells {
            for cell in row {
                if *cell == kind {
                    *cell = Cell::Empty;
                }
            }
        }
    }

    /// Uniform rejection sampling for an empty cell. Capped rather than
    /// unbounded: on a near-full grid the loop would otherwise spin, so
    /// after the attempt budget we give up and let the caller degrade.
    pub fn random_empty<R: Rng>(&self, rng: &mut R) -> Option<Position> {
        const MAX_ATTEMPTS: usize = 1000;

        for _ in 0..MAX_ATTEMPTS {
            let pos = Position::new(rng.gen_range(0..self.size), rng.gen_range(0..self.size));
            if self.get(pos) == Cell::Empty {
                return Some(pos);
            }
        }
        None
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for cell in row {
                let glyph = match cell {
                    Cell::Empty => '.',
                    Cell::Butterfly => '@',
                    Cell::Flower => '*',
                };
                write!(f, "{} ", glyph)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_round_trip() {
        let mut grid = Grid::new(20);
        let pos = Position::new(3, 7);

        assert_eq!(grid.get(pos), Cell::Empty);
        grid.set(pos, Cell::Flower);
        assert_eq!(grid.get(pos), Cell::Flower);
        grid.set(pos, Cell::Empty);
        assert_eq!(grid.get(pos), Cell::Empty);
    }

    #[test]
    fn test_contains_bounds() {
        let grid = Grid::new(20);

        assert!(grid.contains(Position::new(0, 0)));
        assert!(grid.contains(Position::new(19, 19)));
        assert!(!grid.contains(Position::new(-1, 0)));
        assert!(!grid.contains(Position::new(0, -1)));
        assert!(!grid.contains(Position::new(20, 0)));
        assert!(!grid.contains(Position::new(0, 20)));
    }

    #[test]
    fn test_set_out_of_bounds_is_ignored() {
        let mut grid = Grid::new(20);
        grid.set(Position::new(20, 20), Cell::Flower);
        grid.set(Position::new(-1, 5), Cell::Flower);

        for y in 0..20 {
            for x in 0..20 {
                assert_eq!(grid.get(Position::new(x, y)), Cell::Empty);
            }
        }
    }

    #[test]
    fn test_clear_removes_only_that_kind() {
        let mut grid = Grid::new(20);
        grid.set(Position::new(1, 1), Cell::Butterfly);
        grid.set(Position::new(2, 2), Cell::Flower);
        grid.set(Position::new(3, 3), Cell::Flower);

        grid.clear(Cell::Flower);

        assert_eq!(grid.get(Position::new(1, 1)), Cell::Butterfly);
        assert_eq!(grid.get(Position::new(2, 2)), Cell::Empty);
        assert_eq!(grid.get(Position::new(3, 3)), Cell::Empty);
    }

    #[test]
    fn test_random_empty_only_returns_empty_cells() {
        let mut grid = Grid::new(5);
        // Leave a single empty cell so sampling has to find it
        for y in 0..5 {
            for x in 0..5 {
                grid.set(Position::new(x, y), Cell::Flower);
            }
        }
        grid.set(Position::new(2, 3), Cell::Empty);

        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let pos = grid.random_empty(&mut rng).expect("one cell is empty");
            assert_eq!(pos, Position::new(2, 3));
        }
    }

    #[test]
    fn test_random_empty_none_on_full_grid() {
        let mut grid = Grid::new(3);
        for y in 0..3 {
            for x in 0..3 {
                grid.set(Position::new(x, y), Cell::Flower);
            }
        }

        let mut rng = rand::thread_rng();
        assert_eq!(grid.random_empty(&mut rng), None);
    }
}
