use crate::config::GameConfig;
use crate::entity::{Butterfly, Direction, Flower};
use crate::grid::Grid;
use log::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Won,
}

/// Monotonic score counter with a win threshold. Never resets.
#[derive(Debug, Clone)]
pub struct Scoreboard {
    pub score: u32,
    pub win_threshold: u32,
}

impl Scoreboard {
    pub fn new(win_threshold: u32) -> Self {
        Self {
            score: 0,
            win_threshold,
        }
    }

    pub fn increase(&mut self) {
        self.score += 1;
    }

    pub fn is_won(&self) -> bool {
        self.score >= self.win_threshold
    }
}

/// True iff the butterfly and the flower sit on the same grid cell.
pub fn collides(butterfly: &Butterfly, flower: &Flower) -> bool {
    butterfly.position == flower.position
}

pub struct Game {
    pub config: GameConfig,
    pub grid: Grid,
    pub butterfly: Butterfly,
    pub flowers: Vec<Flower>,
    pub scoreboard: Scoreboard,
    pub state: GameState,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let mut grid = Grid::new(config.grid_size);
        let butterfly = Butterfly::new(&config, &mut grid);

        let mut rng = rand::thread_rng();
        let mut flowers = Vec::with_capacity(config.flower_count);
        for i in 0..config.flower_count {
            match Flower::spawn(&config, &mut grid, &mut rng) {
                Some(flower) => flowers.push(flower),
                None => warn!("could not place flower {}, skipping it", i),
            }
        }

        Self {
            config,
            grid,
            butterfly,
            flowers,
            scoreboard: Scoreboard::new(config.win_threshold),
            state: GameState::Playing,
        }
    }

    /// The input seam: directional key events land here between ticks.
    /// Ignored once the game is won.
    pub fn move_player(&mut self, direction: Direction) {
        if self.state != GameState::Playing {
            return;
        }
        match direction {
            Direction::Up => self.butterfly.move_up(&self.config, &mut self.grid),
            Direction::Down => self.butterfly.move_down(&self.config, &mut self.grid),
            Direction::Left => self.butterfly.move_left(&self.config, &mut self.grid),
            Direction::Right => self.butterfly.move_right(&self.config, &mut self.grid),
        }
    }

    /// One tick: check each flower for a collision, respawn and score on a
    /// hit, and transition to the terminal state once the threshold is
    /// reached. A no-op after the win.
    pub fn update(&mut self) {
        if self.state != GameState::Playing {
            return;
        }

        let mut rng = rand::thread_rng();
        for flower in &mut self.flowers {
            if collides(&self.butterfly, flower) {
                flower.respawn(&self.config, &mut self.grid, &mut rng);
                self.scoreboard.increase();
                debug!(
                    "collected a flower, score {}\n{}",
                    self.scoreboard.score, self.grid
                );

                if self.scoreboard.is_won() {
                    info!("won the game with score {}", self.scoreboard.score);
                    self.state = GameState::Won;
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Position, ScreenPos};
    use crate::grid::Cell;
    use proptest::prelude::*;

    fn direction_strategy() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    fn move_sequence_strategy() -> impl Strategy<Value = Vec<Direction>> {
        prop::collection::vec(direction_strategy(), 1..100)
    }

    /// Plants flower 0 on the butterfly's cell so the next tick registers a
    /// collision.
    fn force_collision(game: &mut Game) {
        let old = game.flowers[0].position;
        if game.grid.get(old) == Cell::Flower {
            game.grid.set(old, Cell::Empty);
        }
        let target = game.butterfly.position;
        game.flowers[0].position = target;
        game.flowers[0].screen = game.config.screen_pos(target);
    }

    proptest! {
        /// One step then its opposite restores the original coordinate
        /// whenever the first step cleared the bounds.
        #[test]
        fn prop_movement_is_locally_invertible(moves in move_sequence_strategy()) {
            let mut game = Game::new(GameConfig {
                flower_count: 0,
                ..GameConfig::default()
            });

            for direction in moves {
                let before = game.butterfly.position;
                game.move_player(direction);
                if game.butterfly.position != before {
                    game.move_player(direction.opposite());
                    prop_assert_eq!(game.butterfly.position, before);
                }
            }
        }

        /// The butterfly never leaves the grid, and its screen coordinate
        /// always equals the transform of its grid coordinate.
        #[test]
        fn prop_butterfly_stays_in_bounds(moves in move_sequence_strategy()) {
            let mut game = Game::new(GameConfig::default());
            let n = game.config.grid_size;

            for direction in moves {
                game.move_player(direction);
                let pos = game.butterfly.position;
                prop_assert!(
                    pos.x >= 0 && pos.x < n && pos.y >= 0 && pos.y < n,
                    "butterfly at ({}, {}) left the {}x{} grid",
                    pos.x, pos.y, n, n
                );
                prop_assert_eq!(game.butterfly.screen, game.config.screen_pos(pos));
            }
        }

        /// Across any interleaving of moves and ticks, no two flowers and no
        /// flower and the butterfly share a cell once the tick has settled.
        #[test]
        fn prop_entities_never_share_a_cell(moves in move_sequence_strategy()) {
            let mut game = Game::new(GameConfig::default());

            for direction in moves {
                game.move_player(direction);
                game.update();

                let mut occupied = vec![game.butterfly.position];
                for flower in &game.flowers {
                    prop_assert!(
                        !occupied.contains(&flower.position),
                        "two entities share cell ({}, {})",
                        flower.position.x, flower.position.y
                    );
                    occupied.push(flower.position);
                }
            }
        }

        /// Each confirmed collision raises the score by exactly 1, and the
        /// score never passes the threshold.
        #[test]
        fn prop_score_increases_by_one_per_collision(collections in 1usize..30) {
            let mut game = Game::new(GameConfig::default());

            for _ in 0..collections {
                if game.state != GameState::Playing {
                    break;
                }
                let before = game.scoreboard.score;
                force_collision(&mut game);
                game.update();
                prop_assert_eq!(game.scoreboard.score, before + 1);
            }

            prop_assert!(game.scoreboard.score <= game.config.win_threshold);
        }

        /// Repeated respawns always land flowers on cells that are empty
        /// beforehand and marked afterwards, pairwise distinct and off the
        /// butterfly's cell.
        #[test]
        fn prop_respawn_lands_on_a_free_cell(rounds in 1usize..50) {
            let mut game = Game::new(GameConfig::default());
            let mut rng = rand::thread_rng();

            for _ in 0..rounds {
                for i in 0..game.flowers.len() {
                    game.flowers[i].respawn(&game.config, &mut game.grid, &mut rng);
                    let pos = game.flowers[i].position;
                    prop_assert_eq!(game.grid.get(pos), Cell::Flower);
                    prop_assert_ne!(pos, game.butterfly.position);
                }

                for i in 0..game.flowers.len() {
                    for j in (i + 1)..game.flowers.len() {
                        prop_assert_ne!(
                            game.flowers[i].position,
                            game.flowers[j].position
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_initial_placement() {
        let game = Game::new(GameConfig::default());

        assert_eq!(game.state, GameState::Playing);
        assert_eq!(game.scoreboard.score, 0);
        assert_eq!(game.butterfly.position, Position::new(10, 10));
        assert_eq!(game.butterfly.screen, ScreenPos::new(0, 0));
        assert_eq!(game.grid.get(Position::new(10, 10)), Cell::Butterfly);

        assert_eq!(game.flowers.len(), 5);
        let mut occupied = vec![game.butterfly.position];
        for flower in &game.flowers {
            assert_eq!(game.grid.get(flower.position), Cell::Flower);
            assert!(!occupied.contains(&flower.position));
            occupied.push(flower.position);
        }
    }

    #[test]
    fn test_collision_requires_exact_position() {
        let config = GameConfig::default();
        let butterfly = Butterfly {
            position: Position::new(3, 4),
            screen: config.screen_pos(Position::new(3, 4)),
        };
        let mut flower = Flower {
            position: Position::new(3, 4),
            screen: config.screen_pos(Position::new(3, 4)),
        };

        assert!(collides(&butterfly, &flower));

        flower.position = Position::new(4, 4);
        assert!(!collides(&butterfly, &flower));
        flower.position = Position::new(3, 5);
        assert!(!collides(&butterfly, &flower));
    }

    #[test]
    fn test_forced_collision_relocates_flower_and_scores() {
        let mut game = Game::new(GameConfig::default());
        force_collision(&mut game);

        game.update();

        assert_eq!(game.scoreboard.score, 1);
        assert_eq!(game.state, GameState::Playing);

        let relocated = game.flowers[0].position;
        assert_ne!(relocated, game.butterfly.position);
        assert_eq!(game.grid.get(relocated), Cell::Flower);
        for other in &game.flowers[1..] {
            assert_ne!(relocated, other.position);
        }
    }

    #[test]
    fn test_boundary_moves_are_noops() {
        let config = GameConfig {
            flower_count: 0,
            ..GameConfig::default()
        };
        let mut game = Game::new(config);

        // Walk into the top-left corner
        for _ in 0..config.grid_size {
            game.move_player(Direction::Left);
            game.move_player(Direction::Up);
        }
        assert_eq!(game.butterfly.position, Position::new(0, 0));

        game.move_player(Direction::Left);
        assert_eq!(game.butterfly.position, Position::new(0, 0));
        game.move_player(Direction::Up);
        assert_eq!(game.butterfly.position, Position::new(0, 0));

        assert_eq!(game.grid.get(Position::new(0, 0)), Cell::Butterfly);
        assert_eq!(game.butterfly.screen, config.screen_pos(Position::new(0, 0)));
    }

    #[test]
    fn test_win_transition_is_terminal() {
        let mut game = Game::new(GameConfig::default());
        game.scoreboard.score = 19;

        force_collision(&mut game);
        game.update();
        assert_eq!(game.scoreboard.score, 20);
        assert_eq!(game.state, GameState::Won);

        // Further forced collisions change nothing
        force_collision(&mut game);
        game.update();
        assert_eq!(game.scoreboard.score, 20);
        assert_eq!(game.state, GameState::Won);

        // Input is ignored once terminal
        let before = game.butterfly.position;
        game.move_player(Direction::Right);
        assert_eq!(game.butterfly.position, before);
    }

    #[test]
    fn test_spawn_skips_flowers_on_a_saturated_grid() {
        // A 2x2 grid holds the butterfly plus at most 3 flowers
        let game = Game::new(GameConfig {
            grid_size: 2,
            flower_count: 10,
            ..GameConfig::default()
        });

        assert_eq!(game.flowers.len(), 3);
    }
}
