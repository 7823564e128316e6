use crate::config::GameConfig;
use crate::grid::{Cell, Grid};
use log::warn;
use rand::Rng;

/// Grid coordinate. Array indices, (0, 0) at the top-left, y growing down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn moved(&self, direction: Direction) -> Self {
        match direction {
            Direction::Up => Position::new(self.x, self.y - 1),
            Direction::Down => Position::new(self.x, self.y + 1),
            Direction::Left => Position::new(self.x - 1, self.y),
            Direction::Right => Position::new(self.x + 1, self.y),
        }
    }
}

/// Screen coordinate. Pixel offset from the window centre, +y up; always a
/// pure function of a grid coordinate via `GameConfig::screen_pos`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenPos {
    pub x: i32,
    pub y: i32,
}

impl ScreenPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// The player sprite. Starts at the grid centre (the screen origin).
#[derive(Debug, Clone)]
pub struct Butterfly {
    pub position: Position,
    pub screen: ScreenPos,
}

impl Butterfly {
    pub fn new(config: &GameConfig, grid: &mut Grid) -> Self {
        let position = Position::new(config.grid_size / 2, config.grid_size / 2);
        grid.set(position, Cell::Butterfly);
        Self {
            position,
            screen: config.screen_pos(position),
        }
    }

    pub fn move_up(&mut self, config: &GameConfig, grid: &mut Grid) {
        self.step(Direction::Up, config, grid);
    }

    pub fn move_down(&mut self, config: &GameConfig, grid: &mut Grid) {
        self.step(Direction::Down, config, grid);
    }

    pub fn move_left(&mut self, config: &GameConfig, grid: &mut Grid) {
        self.step(Direction::Left, config, grid);
    }

    pub fn move_right(&mut self, config: &GameConfig, grid: &mut Grid) {
        self.step(Direction::Right, config, grid);
    }

    /// One discrete cell step. A move that fails either bound check is a
    /// silent no-op: no error, no partial state change.
    fn step(&mut self, direction: Direction, config: &GameConfig, grid: &mut Grid) {
        let next = self.position.moved(direction);
        // Grid bound is authoritative
        if !grid.contains(next) {
            return;
        }
        // Redundant legacy clamp in screen space; mirrors the grid bound
        let screen = config.screen_pos(next);
        if !config.screen_in_bounds(screen) {
            return;
        }

        // Both checks passed: commit grid marker and both coordinates together
        grid.clear(Cell::Butterfly);
        grid.set(next, Cell::Butterfly);
        self.position = next;
        self.screen = screen;
    }
}

/// A collectible target. Repositioned on collection, never recreated.
#[derive(Debug, Clone)]
pub struct Flower {
    pub position: Position,
    pub screen: ScreenPos,
}

impl Flower {
    /// Places a new flower on a random empty cell. Returns `None` when no
    /// empty cell can be found.
    pub fn spawn<R: Rng>(config: &GameConfig, grid: &mut Grid, rng: &mut R) -> Option<Self> {
        let position = grid.random_empty(rng)?;
        grid.set(position, Cell::Flower);
        Some(Self {
            position,
            screen: config.screen_pos(position),
        })
    }

    /// Relocates this flower to a random empty cell. Clears only this
    /// flower's own marker (the butterfly may already have overwritten it,
    /// and a category-wide clear would wipe the other flowers too). If
    /// sampling exhausts its attempt budget the flower stays where it is.
    pub fn respawn<R: Rng>(&mut self, config: &GameConfig, grid: &mut Grid, rng: &mut R) {
        if grid.get(self.position) == Cell::Flower {
            grid.set(self.position, Cell::Empty);
        }

        match grid.random_empty(rng) {
            Some(next) => {
                grid.set(next, Cell::Flower);
                self.position = next;
                self.screen = config.screen_pos(next);
            }
            None => {
                warn!(
                    "no empty cell found for flower respawn, leaving it at ({}, {})",
                    self.position.x, self.position.y
                );
            }
        }
    }
}
