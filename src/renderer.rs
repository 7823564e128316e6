use crate::entity::Direction;
use crate::game::Game;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Direction(Direction),
    Quit,
}

/// Trait that abstracts the platform binding.
/// This allows for different rendering backends (CLI, Web, etc.)
pub trait Renderer {
    /// Create the window and register input plumbing
    fn init(&mut self) -> io::Result<()>;

    /// Render the current game state
    fn render(&mut self, game: &Game) -> io::Result<()>;

    /// Clean up and restore terminal/display state
    fn cleanup(&mut self) -> io::Result<()>;

    /// Poll for input from the user
    fn poll_input(&mut self) -> io::Result<Option<Input>>;
}
