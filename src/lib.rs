pub mod config;
pub mod entity;
pub mod game;
pub mod grid;
pub mod renderer;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli_renderer;
#[cfg(target_arch = "wasm32")]
pub mod web_main;
#[cfg(target_arch = "wasm32")]
pub mod web_renderer;

pub use config::GameConfig;
pub use entity::{Butterfly, Direction, Flower, Position, ScreenPos};
pub use game::{collides, Game, GameState, Scoreboard};
pub use grid::{Cell, Grid};
pub use renderer::{Input, Renderer};

#[cfg(not(target_arch = "wasm32"))]
pub use cli_renderer::CliRenderer;
#[cfg(target_arch = "wasm32")]
pub use web_renderer::WebRenderer;
